//! Instruction-level and cycle-accounting tests. These run against a real [`Bus`] backed by an
//! all-zero cartridge, so building a test program is just writing opcodes into the ROM image
//! before construction.

mod cycle_tests;
mod instruction_tests;

use crate::hardware::cartridge::Cartridge;
use crate::hardware::cpu::Cpu;
use crate::hardware::mmu::Bus;

/// Builds a CPU whose ROM is preloaded with `program` at `0x0100`, matching where the CPU's
/// post-boot PC points.
pub(crate) fn cpu_with_program(program: &[u8]) -> Cpu<Bus> {
    let mut rom = vec![0u8; 0x8000];
    rom[0x0100..0x0100 + program.len()].copy_from_slice(program);
    Cpu::new(Bus::new(Cartridge::new(rom)))
}

//! Machine glue (§4.7): wires cartridge, bus, and CPU together and drives the outer loop.
//!
//! Everything below construction is infallible per §7; the one fallible boundary is loading the
//! ROM image, which is why [`Emulator::from_path`]/[`Emulator::new`] return a [`Result`].
//! There is no explicit `destroy` — the [`Emulator`] owns every peripheral directly, so dropping
//! it tears down the whole machine.

use std::fs;
use std::path::Path;

use crate::config::MachineOptions;
use crate::error::MachineError;
use crate::hardware::cartridge::Cartridge;
use crate::hardware::cpu::Cpu;
use crate::hardware::mmu::Bus;
use crate::hardware::ppu::palette::{lcd_to_rgba, RgbaPalette};
use crate::io::joypad::InputKey;

/// One full 154-line PPU sweep at single speed, in M-cycles (`70224` T-cycles / 4).
pub const MCYCLES_PER_FRAME: u64 = 17_556;

/// A fully wired DMG machine: cartridge, bus (timer/PPU/DMA/joypad), and CPU.
pub struct Emulator {
    cpu: Cpu<Bus>,
    doctor_log: bool,
}

impl Emulator {
    /// Reads a ROM image from disk and constructs a machine from it.
    pub fn from_path(path: impl AsRef<Path>, options: MachineOptions) -> Result<Self, MachineError> {
        let path_ref = path.as_ref();
        let rom = fs::read(path_ref).map_err(|source| MachineError::RomLoad {
            path: path_ref.display().to_string(),
            source,
        })?;
        Self::new(rom, options)
    }

    /// Constructs a machine from an in-memory ROM image.
    pub fn new(rom: Vec<u8>, options: MachineOptions) -> Result<Self, MachineError> {
        if rom.len() < 0x150 {
            return Err(MachineError::RomTooSmall { len: rom.len() });
        }

        let cartridge = Cartridge::new(rom);
        let bus = Bus::new(cartridge);
        let mut cpu = Cpu::new(bus);

        if let Some(boot) = options.boot_override {
            let regs = cpu.registers_mut();
            regs.a = boot.a;
            regs.b = boot.b;
            regs.c = boot.c;
            regs.d = boot.d;
            regs.e = boot.e;
            regs.f = crate::hardware::registers::Flags::from_bits_truncate(boot.f);
            regs.h = boot.h;
            regs.l = boot.l;
            regs.sp = boot.sp;
            regs.pc = boot.pc;
        }

        log::info!("Machine constructed, entry point {:#06X}", cpu.registers().pc);
        Ok(Emulator { cpu, doctor_log: options.doctor_log })
    }

    pub fn set_button(&mut self, key: InputKey, pressed: bool) {
        self.cpu.mmu_mut().set_button(key, pressed);
    }

    /// Runs exactly one CPU instruction (or one M-cycle of HALT/interrupt-service progress).
    pub fn step_instruction(&mut self) {
        if self.doctor_log {
            log::debug!("{}", self.doctor_line());
        }
        self.cpu.step();
    }

    /// Runs instructions until the PPU completes a frame, or until twice a frame's worth of
    /// M-cycles have passed without one (the safety margin that keeps the outer loop making
    /// progress while the LCD is disabled).
    pub fn run_to_frame_boundary(&mut self) {
        self.reset_frame_done();
        let budget = self.cpu.mcycles() + 2 * MCYCLES_PER_FRAME;
        loop {
            self.step_instruction();
            if self.frame_done() || self.cpu.mcycles() >= budget {
                break;
            }
        }
    }

    pub fn frame_done(&self) -> bool {
        self.cpu.mmu().ppu().frame_done()
    }

    pub fn reset_frame_done(&mut self) {
        self.cpu.mmu_mut().reset_frame_done();
    }

    pub fn frames_completed(&self) -> u64 {
        self.cpu.mmu().ppu().frames_completed()
    }

    pub fn mcycles(&self) -> u64 {
        self.cpu.mcycles()
    }

    /// Copies the 160x144 framebuffer out as RGBA8, applying `rgba_palette` and clipping to
    /// `(width, height)` if the target is smaller than native resolution (§6).
    pub fn copy_framebuffer_rgba(&self, pixels: &mut [u8], width: usize, height: usize, rgba_palette: &RgbaPalette) {
        lcd_to_rgba(self.cpu.mmu().ppu().frame_buffer(), pixels, width, height, rgba_palette);
    }

    /// A Game-Boy-Doctor-style line: every 8-bit register, F, SP, PC, and the four bytes at PC,
    /// read through [`crate::hardware::mmu::MemoryMapper::peek`] so the debug surface never
    /// perturbs machine state (§6).
    fn doctor_line(&self) -> String {
        use crate::hardware::mmu::MemoryMapper;

        let regs = self.cpu.registers();
        let pc = regs.pc;
        let mmu = self.cpu.mmu();
        format!(
            "A:{:02X} F:{:02X} B:{:02X} C:{:02X} D:{:02X} E:{:02X} H:{:02X} L:{:02X} SP:{:04X} PC:{:04X} PCMEM:{:02X},{:02X},{:02X},{:02X}",
            regs.a,
            regs.f.bits(),
            regs.b,
            regs.c,
            regs.d,
            regs.e,
            regs.h,
            regs.l,
            regs.sp,
            pc,
            mmu.peek(pc),
            mmu.peek(pc.wrapping_add(1)),
            mmu.peek(pc.wrapping_add(2)),
            mmu.peek(pc.wrapping_add(3)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blank_rom() -> Vec<u8> {
        vec![0u8; 0x8000]
    }

    #[test]
    fn boot_state_matches_dmg0_defaults() {
        let emu = Emulator::new(blank_rom(), MachineOptions::default()).unwrap();
        let regs = emu.cpu.registers();
        assert_eq!(regs.a, 0x01);
        assert_eq!(regs.b, 0xFF);
        assert_eq!(regs.c, 0x13);
        assert_eq!(regs.sp, 0xFFFE);
        assert_eq!(regs.pc, 0x0100);
        assert!(!emu.cpu.ime());
    }

    #[test]
    fn rom_too_small_fails_construction() {
        let result = Emulator::new(vec![0u8; 16], MachineOptions::default());
        assert!(matches!(result, Err(MachineError::RomTooSmall { len: 16 })));
    }

    #[test]
    fn boot_override_replaces_defaults() {
        let options = MachineOptions {
            boot_override: Some(crate::config::BootOverride { pc: 0xC000, sp: 0xDFFF, ..Default::default() }),
            doctor_log: false,
        };
        let emu = Emulator::new(blank_rom(), options).unwrap();
        assert_eq!(emu.cpu.registers().pc, 0xC000);
        assert_eq!(emu.cpu.registers().sp, 0xDFFF);
    }

    #[test]
    fn add_with_carry_scenario() {
        let mut rom = blank_rom();
        // LD A,0xF0; ADD A,0x20
        rom[0x100] = 0x3E;
        rom[0x101] = 0xF0;
        rom[0x102] = 0xC6;
        rom[0x103] = 0x20;
        let mut emu = Emulator::new(rom, MachineOptions::default()).unwrap();

        emu.step_instruction();
        emu.step_instruction();

        let regs = emu.cpu.registers();
        assert_eq!(regs.a, 0x10);
        assert!(!regs.zf());
        assert!(!regs.n());
        assert!(!regs.h());
        assert!(regs.cf());
        assert_eq!(regs.pc, 0x104);
        assert_eq!(emu.mcycles(), 4);
    }
}

//! The Sharp SM83 decoder/executor: operand decoding, the instruction step loop, and interrupt
//! servicing. Every memory access goes through [`Cpu::tick_read`]/[`Cpu::tick_write`] (or
//! [`Cpu::internal_delay`] for accesses that spend a cycle without touching the bus), which is
//! what makes the cycle counts fall out of the implementation rather than needing to be
//! bookkept by hand per instruction.

mod alu;
pub mod operand;

#[cfg(test)]
mod tests;

use crate::hardware::cpu::operand::{operand_for_field, Cond, Operand, Post};
use crate::hardware::mmu::MemoryMapper;
use crate::hardware::registers::{Reg16, Reg8, Registers};
use crate::io::interrupts::InterruptFlags;

#[derive(Debug)]
pub struct Cpu<M: MemoryMapper> {
    pub registers: Registers,
    ime: bool,
    ei_pending: bool,
    halted: bool,
    halt_bug: bool,
    stopped: bool,
    mcycles: u64,
    mmu: M,
}

impl<M: MemoryMapper> Cpu<M> {
    /// Boots directly past the bootrom into the DMG-0 post-boot register state (§8 scenario 1),
    /// since this core doesn't model the bootrom itself.
    pub fn new(mmu: M) -> Self {
        let mut registers = Registers::new();
        registers.a = 0x01;
        registers.b = 0xFF;
        registers.c = 0x13;
        registers.d = 0x00;
        registers.e = 0xC1;
        registers.h = 0x84;
        registers.l = 0x03;
        registers.sp = 0xFFFE;
        registers.pc = 0x0100;

        Cpu { registers, ime: false, ei_pending: false, halted: false, halt_bug: false, stopped: false, mcycles: 0, mmu }
    }

    pub fn registers(&self) -> &Registers {
        &self.registers
    }

    pub fn registers_mut(&mut self) -> &mut Registers {
        &mut self.registers
    }

    pub fn ime(&self) -> bool {
        self.ime
    }

    pub fn is_halted(&self) -> bool {
        self.halted
    }

    pub fn mcycles(&self) -> u64 {
        self.mcycles
    }

    pub fn mmu(&self) -> &M {
        &self.mmu
    }

    pub fn mmu_mut(&mut self) -> &mut M {
        &mut self.mmu
    }

    /// Runs exactly one instruction step, per the interrupt-poll / HALT-STOP / EI-delay / fetch
    /// / dispatch order.
    pub fn step(&mut self) {
        if self.stopped {
            return;
        }

        let active = self.mmu.active_interrupts();
        if (self.ime || self.halted) && active != 0 {
            self.halted = false;
            if self.ime {
                self.service_interrupt(active);
                return;
            }
        }

        if self.halted {
            self.internal_delay();
            return;
        }

        if self.ei_pending {
            self.ime = true;
            self.ei_pending = false;
        }

        let opcode = self.fetch_opcode();
        if opcode == 0xCB {
            let cb_opcode = self.fetch_imm8();
            self.execute_cb(cb_opcode);
        } else {
            self.execute(opcode);
        }
    }

    /// Lowest-numbered set bit wins; clears that bit in IF, clears IME, and pushes PC to the
    /// matching vector. Five M-cycles total, no instruction retired.
    fn service_interrupt(&mut self, active: u8) {
        let interrupt = InterruptFlags::PRIORITY_ORDER
            .iter()
            .copied()
            .find(|flag| active & flag.bits() != 0)
            .expect("service_interrupt called with no active interrupt bits");
        self.mmu
            .clear_interrupt_flag(interrupt.bits().trailing_zeros() as u8);
        self.ime = false;
        self.internal_delay();
        let pc = self.registers.pc;
        self.push16(pc);
        self.registers.pc = interrupt.vector();
        self.internal_delay();
    }

    fn tick_read(&mut self, address: u16) -> u8 {
        self.mcycles += 1;
        self.mmu.read_byte(address)
    }

    fn tick_write(&mut self, address: u16, value: u8) {
        self.mcycles += 1;
        self.mmu.write_byte(address, value);
    }

    fn internal_delay(&mut self) {
        self.mcycles += 1;
        self.mmu.do_m_cycle();
    }

    /// Reads the opcode at PC. PC advances afterwards unless the halt bug is in effect, in which
    /// case this same byte is re-read as the next opcode too.
    fn fetch_opcode(&mut self) -> u8 {
        let pc = self.registers.pc;
        let opcode = self.tick_read(pc);
        if self.halt_bug {
            self.halt_bug = false;
        } else {
            self.registers.pc = pc.wrapping_add(1);
        }
        opcode
    }

    fn fetch_imm8(&mut self) -> u8 {
        let pc = self.registers.pc;
        self.registers.pc = pc.wrapping_add(1);
        self.tick_read(pc)
    }

    fn fetch_imm16(&mut self) -> u16 {
        let lo = self.fetch_imm8();
        let hi = self.fetch_imm8();
        (hi as u16) << 8 | lo as u16
    }

    /// One internal delay, then writes `value`'s high byte followed by its low byte, one M-cycle
    /// each, decrementing SP before each write. Shared by `PUSH`, `CALL`, `RST`, and interrupt
    /// service.
    fn push16(&mut self, value: u16) {
        self.internal_delay();
        self.registers.sp = self.registers.sp.wrapping_sub(1);
        self.tick_write(self.registers.sp, (value >> 8) as u8);
        self.registers.sp = self.registers.sp.wrapping_sub(1);
        self.tick_write(self.registers.sp, value as u8);
    }

    fn pop16(&mut self) -> u16 {
        let lo = self.tick_read(self.registers.sp);
        self.registers.sp = self.registers.sp.wrapping_add(1);
        let hi = self.tick_read(self.registers.sp);
        self.registers.sp = self.registers.sp.wrapping_add(1);
        (hi as u16) << 8 | lo as u16
    }

    fn read_reg8(&self, reg: Reg8) -> u8 {
        match reg {
            Reg8::A => self.registers.a,
            Reg8::B => self.registers.b,
            Reg8::C => self.registers.c,
            Reg8::D => self.registers.d,
            Reg8::E => self.registers.e,
            Reg8::H => self.registers.h,
            Reg8::L => self.registers.l,
        }
    }

    fn write_reg8(&mut self, reg: Reg8, value: u8) {
        match reg {
            Reg8::A => self.registers.a = value,
            Reg8::B => self.registers.b = value,
            Reg8::C => self.registers.c = value,
            Reg8::D => self.registers.d = value,
            Reg8::E => self.registers.e = value,
            Reg8::H => self.registers.h = value,
            Reg8::L => self.registers.l = value,
        }
    }

    fn read_reg16(&self, reg: Reg16) -> u16 {
        match reg {
            Reg16::AF => self.registers.af(),
            Reg16::BC => self.registers.bc(),
            Reg16::DE => self.registers.de(),
            Reg16::HL => self.registers.hl(),
            Reg16::SP => self.registers.sp,
        }
    }

    fn write_reg16(&mut self, reg: Reg16, value: u16) {
        match reg {
            Reg16::AF => self.registers.set_af(value),
            Reg16::BC => self.registers.set_bc(value),
            Reg16::DE => self.registers.set_de(value),
            Reg16::HL => self.registers.set_hl(value),
            Reg16::SP => self.registers.sp = value,
        }
    }

    fn apply_post(&mut self, post: Post) {
        match post {
            Post::None => {}
            Post::Inc => self.registers.set_hl(self.registers.hl().wrapping_add(1)),
            Post::Dec => self.registers.set_hl(self.registers.hl().wrapping_sub(1)),
        }
    }

    fn check_cond(&self, cond: Cond) -> bool {
        match cond {
            Cond::NotZero => !self.registers.zf(),
            Cond::Zero => self.registers.zf(),
            Cond::NotCarry => !self.registers.cf(),
            Cond::Carry => self.registers.cf(),
            Cond::Always => true,
        }
    }

    /// Resolves an [`Operand`] to its value. Every variant that touches the bus or fetches an
    /// immediate spends exactly the M-cycles that operation costs on real hardware; this is the
    /// mechanism that makes instruction timing fall out of the code instead of a side table.
    fn get_u8(&mut self, operand: Operand) -> u8 {
        match operand {
            Operand::Reg8(r) => self.read_reg8(r),
            Operand::IndHL(post) => {
                let addr = self.registers.hl();
                let value = self.tick_read(addr);
                self.apply_post(post);
                value
            }
            Operand::IndBC => self.tick_read(self.registers.bc()),
            Operand::IndDE => self.tick_read(self.registers.de()),
            Operand::ImmU8 => self.fetch_imm8(),
            Operand::MemImm8 => {
                let offset = self.fetch_imm8();
                self.tick_read(0xFF00 | offset as u16)
            }
            Operand::MemImm16 => {
                let addr = self.fetch_imm16();
                self.tick_read(addr)
            }
            Operand::MemC => self.tick_read(0xFF00 | self.registers.c as u16),
        }
    }

    fn set_u8(&mut self, operand: Operand, value: u8) {
        match operand {
            Operand::Reg8(r) => self.write_reg8(r, value),
            Operand::IndHL(post) => {
                let addr = self.registers.hl();
                self.tick_write(addr, value);
                self.apply_post(post);
            }
            Operand::IndBC => self.tick_write(self.registers.bc(), value),
            Operand::IndDE => self.tick_write(self.registers.de(), value),
            Operand::ImmU8 => unreachable!("ImmU8 is never a write target"),
            Operand::MemImm8 => {
                let offset = self.fetch_imm8();
                self.tick_write(0xFF00 | offset as u16, value);
            }
            Operand::MemImm16 => {
                let addr = self.fetch_imm16();
                self.tick_write(addr, value);
            }
            Operand::MemC => self.tick_write(0xFF00 | self.registers.c as u16, value),
        }
    }

    fn ld8(&mut self, dst: Operand, src: Operand) {
        let value = self.get_u8(src);
        self.set_u8(dst, value);
    }

    /// `0x40..=0x7F` minus `0x76` (HALT): `LD r,r'`, including the `(HL)` source/destination
    /// forms.
    fn ld_r_r(&mut self, opcode: u8) {
        let dst = operand_for_field(opcode >> 3);
        let src = operand_for_field(opcode);
        self.ld8(dst, src);
    }

    fn ld_rr_d16(&mut self, reg: Reg16) {
        let value = self.fetch_imm16();
        self.write_reg16(reg, value);
    }

    fn ld_mem_sp(&mut self) {
        let addr = self.fetch_imm16();
        let sp = self.registers.sp;
        self.tick_write(addr, sp as u8);
        self.tick_write(addr.wrapping_add(1), (sp >> 8) as u8);
    }

    fn inc8(&mut self, operand: Operand) {
        let value = self.get_u8(operand);
        let result = value.wrapping_add(1);
        self.registers.set_zf(result == 0);
        self.registers.set_n(false);
        self.registers.set_h((value & 0xF) == 0xF);
        self.set_u8(operand, result);
    }

    fn dec8(&mut self, operand: Operand) {
        let value = self.get_u8(operand);
        let result = value.wrapping_sub(1);
        self.registers.set_zf(result == 0);
        self.registers.set_n(true);
        self.registers.set_h((value & 0xF) == 0);
        self.set_u8(operand, result);
    }

    fn inc16(&mut self, reg: Reg16) {
        let value = self.read_reg16(reg).wrapping_add(1);
        self.write_reg16(reg, value);
        self.internal_delay();
    }

    fn dec16(&mut self, reg: Reg16) {
        let value = self.read_reg16(reg).wrapping_sub(1);
        self.write_reg16(reg, value);
        self.internal_delay();
    }

    fn add_hl_rr(&mut self, reg: Reg16) {
        let hl = self.registers.hl();
        let value = self.read_reg16(reg);
        let (result, carry) = hl.overflowing_add(value);
        let half = (hl & 0x0FFF) + (value & 0x0FFF) > 0x0FFF;
        self.registers.set_hl(result);
        self.registers.set_n(false);
        self.registers.set_h(half);
        self.registers.set_cf(carry);
        self.internal_delay();
    }

    fn add_a(&mut self, value: u8, use_carry: bool) {
        let carry_in = if use_carry && self.registers.cf() { 1 } else { 0 };
        let a = self.registers.a;
        let (r1, c1) = a.overflowing_add(value);
        let (result, c2) = r1.overflowing_add(carry_in);
        let half = (a & 0xF) + (value & 0xF) + carry_in > 0xF;
        self.registers.a = result;
        self.registers.set_zf(result == 0);
        self.registers.set_n(false);
        self.registers.set_h(half);
        self.registers.set_cf(c1 || c2);
    }

    fn sub_core(&mut self, value: u8, use_carry: bool) -> u8 {
        let carry_in = if use_carry && self.registers.cf() { 1 } else { 0 };
        let a = self.registers.a;
        let (r1, b1) = a.overflowing_sub(value);
        let (result, b2) = r1.overflowing_sub(carry_in);
        let half = (a & 0xF) < (value & 0xF) + carry_in;
        self.registers.set_zf(result == 0);
        self.registers.set_n(true);
        self.registers.set_h(half);
        self.registers.set_cf(b1 || b2);
        result
    }

    fn sub_a(&mut self, value: u8, use_carry: bool) {
        let result = self.sub_core(value, use_carry);
        self.registers.a = result;
    }

    fn cp_a(&mut self, value: u8) {
        self.sub_core(value, false);
    }

    fn and_a(&mut self, value: u8) {
        self.registers.a &= value;
        self.registers.set_zf(self.registers.a == 0);
        self.registers.set_n(false);
        self.registers.set_h(true);
        self.registers.set_cf(false);
    }

    fn xor_a(&mut self, value: u8) {
        self.registers.a ^= value;
        self.registers.set_zf(self.registers.a == 0);
        self.registers.set_n(false);
        self.registers.set_h(false);
        self.registers.set_cf(false);
    }

    fn or_a(&mut self, value: u8) {
        self.registers.a |= value;
        self.registers.set_zf(self.registers.a == 0);
        self.registers.set_n(false);
        self.registers.set_h(false);
        self.registers.set_cf(false);
    }

    fn alu_a(&mut self, opcode: u8) {
        let operand = operand_for_field(opcode);
        let value = self.get_u8(operand);
        match (opcode >> 3) & 0x7 {
            0 => self.add_a(value, false),
            1 => self.add_a(value, true),
            2 => self.sub_a(value, false),
            3 => self.sub_a(value, true),
            4 => self.and_a(value),
            5 => self.xor_a(value),
            6 => self.or_a(value),
            7 => self.cp_a(value),
            _ => unreachable!(),
        }
    }

    fn jr(&mut self, cond: Cond) {
        let offset = self.fetch_imm8() as i8;
        if self.check_cond(cond) {
            self.internal_delay();
            self.registers.pc = self.registers.pc.wrapping_add(offset as u16);
        }
    }

    fn jp(&mut self, cond: Cond) {
        let addr = self.fetch_imm16();
        if self.check_cond(cond) {
            self.internal_delay();
            self.registers.pc = addr;
        }
    }

    fn jp_hl(&mut self) {
        self.registers.pc = self.registers.hl();
    }

    fn call(&mut self, cond: Cond) {
        let addr = self.fetch_imm16();
        if self.check_cond(cond) {
            let pc = self.registers.pc;
            self.push16(pc);
            self.registers.pc = addr;
        }
    }

    fn ret(&mut self, cond: Cond) {
        if cond != Cond::Always {
            self.internal_delay();
        }
        if self.check_cond(cond) {
            let addr = self.pop16();
            self.registers.pc = addr;
            self.internal_delay();
        }
    }

    fn reti(&mut self) {
        self.ret(Cond::Always);
        self.ime = true;
    }

    fn rst(&mut self, vector: u16) {
        let pc = self.registers.pc;
        self.push16(pc);
        self.registers.pc = vector;
    }

    fn push_rr(&mut self, reg: Reg16) {
        let value = self.read_reg16(reg);
        self.push16(value);
    }

    fn pop_rr(&mut self, reg: Reg16) {
        let value = self.pop16();
        self.write_reg16(reg, value);
    }

    fn daa(&mut self) {
        let mut a = self.registers.a;
        let mut carry = self.registers.cf();
        if !self.registers.n() {
            if carry || a > 0x99 {
                a = a.wrapping_add(0x60);
                carry = true;
            }
            if self.registers.h() || (a & 0x0F) > 0x09 {
                a = a.wrapping_add(0x06);
            }
        } else {
            if carry {
                a = a.wrapping_sub(0x60);
            }
            if self.registers.h() {
                a = a.wrapping_sub(0x06);
            }
        }
        self.registers.a = a;
        self.registers.set_zf(a == 0);
        self.registers.set_h(false);
        self.registers.set_cf(carry);
    }

    fn cpl(&mut self) {
        self.registers.a = !self.registers.a;
        self.registers.set_n(true);
        self.registers.set_h(true);
    }

    fn scf(&mut self) {
        self.registers.set_n(false);
        self.registers.set_h(false);
        self.registers.set_cf(true);
    }

    fn ccf(&mut self) {
        self.registers.set_n(false);
        self.registers.set_h(false);
        let cf = self.registers.cf();
        self.registers.set_cf(!cf);
    }

    fn add_sp_e8(&mut self) {
        let offset = self.fetch_imm8() as i8 as i16 as u16;
        let sp = self.registers.sp;
        let half = (sp & 0xF) + (offset & 0xF) > 0xF;
        let full = (sp & 0xFF) + (offset & 0xFF) > 0xFF;
        self.registers.sp = sp.wrapping_add(offset);
        self.registers.set_zf(false);
        self.registers.set_n(false);
        self.registers.set_h(half);
        self.registers.set_cf(full);
        self.internal_delay();
        self.internal_delay();
    }

    fn ld_hl_sp_e8(&mut self) {
        let offset = self.fetch_imm8() as i8 as i16 as u16;
        let sp = self.registers.sp;
        let half = (sp & 0xF) + (offset & 0xF) > 0xF;
        let full = (sp & 0xFF) + (offset & 0xFF) > 0xFF;
        self.registers.set_hl(sp.wrapping_add(offset));
        self.registers.set_zf(false);
        self.registers.set_n(false);
        self.registers.set_h(half);
        self.registers.set_cf(full);
        self.internal_delay();
    }

    fn ld_sp_hl(&mut self) {
        self.registers.sp = self.registers.hl();
        self.internal_delay();
    }

    /// Flags HALT-bug (PC fails to advance on the next fetch) when IME is clear and an interrupt
    /// is already pending at the moment HALT executes; in that case the CPU never actually
    /// enters HALTED, it just suppresses the next PC increment.
    fn halt(&mut self) {
        let active = self.mmu.active_interrupts();
        if !self.ime && active != 0 {
            self.halt_bug = true;
        } else {
            self.halted = true;
        }
    }

    /// STOP semantics are intentionally minimal in this core: the padding byte is consumed and
    /// the CPU parks, with no joypad-driven wake path.
    fn stop(&mut self) {
        let _ = self.fetch_imm8();
        self.stopped = true;
    }

    fn ei(&mut self) {
        self.ei_pending = true;
    }

    fn di(&mut self) {
        self.ime = false;
        self.ei_pending = false;
    }

    fn illegal_opcode(&mut self, opcode: u8) {
        log::warn!("illegal opcode {:#04X} at PC {:#06X}", opcode, self.registers.pc.wrapping_sub(1));
    }

    fn execute(&mut self, opcode: u8) {
        match opcode {
            0x76 => self.halt(),
            0x40..=0x7F => self.ld_r_r(opcode),
            0x80..=0xBF => self.alu_a(opcode),
            _ => self.execute_other(opcode),
        }
    }

    fn execute_other(&mut self, opcode: u8) {
        match opcode {
            0x00 => {}
            0x01 => self.ld_rr_d16(Reg16::BC),
            0x02 => self.ld8(Operand::IndBC, Operand::Reg8(Reg8::A)),
            0x03 => self.inc16(Reg16::BC),
            0x04 => self.inc8(Operand::Reg8(Reg8::B)),
            0x05 => self.dec8(Operand::Reg8(Reg8::B)),
            0x06 => self.ld8(Operand::Reg8(Reg8::B), Operand::ImmU8),
            0x07 => self.rlca(),
            0x08 => self.ld_mem_sp(),
            0x09 => self.add_hl_rr(Reg16::BC),
            0x0A => self.ld8(Operand::Reg8(Reg8::A), Operand::IndBC),
            0x0B => self.dec16(Reg16::BC),
            0x0C => self.inc8(Operand::Reg8(Reg8::C)),
            0x0D => self.dec8(Operand::Reg8(Reg8::C)),
            0x0E => self.ld8(Operand::Reg8(Reg8::C), Operand::ImmU8),
            0x0F => self.rrca(),

            0x10 => self.stop(),
            0x11 => self.ld_rr_d16(Reg16::DE),
            0x12 => self.ld8(Operand::IndDE, Operand::Reg8(Reg8::A)),
            0x13 => self.inc16(Reg16::DE),
            0x14 => self.inc8(Operand::Reg8(Reg8::D)),
            0x15 => self.dec8(Operand::Reg8(Reg8::D)),
            0x16 => self.ld8(Operand::Reg8(Reg8::D), Operand::ImmU8),
            0x17 => self.rla(),
            0x18 => self.jr(Cond::Always),
            0x19 => self.add_hl_rr(Reg16::DE),
            0x1A => self.ld8(Operand::Reg8(Reg8::A), Operand::IndDE),
            0x1B => self.dec16(Reg16::DE),
            0x1C => self.inc8(Operand::Reg8(Reg8::E)),
            0x1D => self.dec8(Operand::Reg8(Reg8::E)),
            0x1E => self.ld8(Operand::Reg8(Reg8::E), Operand::ImmU8),
            0x1F => self.rra(),

            0x20 => self.jr(Cond::NotZero),
            0x21 => self.ld_rr_d16(Reg16::HL),
            0x22 => self.ld8(Operand::IndHL(Post::Inc), Operand::Reg8(Reg8::A)),
            0x23 => self.inc16(Reg16::HL),
            0x24 => self.inc8(Operand::Reg8(Reg8::H)),
            0x25 => self.dec8(Operand::Reg8(Reg8::H)),
            0x26 => self.ld8(Operand::Reg8(Reg8::H), Operand::ImmU8),
            0x27 => self.daa(),
            0x28 => self.jr(Cond::Zero),
            0x29 => self.add_hl_rr(Reg16::HL),
            0x2A => self.ld8(Operand::Reg8(Reg8::A), Operand::IndHL(Post::Inc)),
            0x2B => self.dec16(Reg16::HL),
            0x2C => self.inc8(Operand::Reg8(Reg8::L)),
            0x2D => self.dec8(Operand::Reg8(Reg8::L)),
            0x2E => self.ld8(Operand::Reg8(Reg8::L), Operand::ImmU8),
            0x2F => self.cpl(),

            0x30 => self.jr(Cond::NotCarry),
            0x31 => self.ld_rr_d16(Reg16::SP),
            0x32 => self.ld8(Operand::IndHL(Post::Dec), Operand::Reg8(Reg8::A)),
            0x33 => self.inc16(Reg16::SP),
            0x34 => self.inc8(Operand::IndHL(Post::None)),
            0x35 => self.dec8(Operand::IndHL(Post::None)),
            0x36 => self.ld8(Operand::IndHL(Post::None), Operand::ImmU8),
            0x37 => self.scf(),
            0x38 => self.jr(Cond::Carry),
            0x39 => self.add_hl_rr(Reg16::SP),
            0x3A => self.ld8(Operand::Reg8(Reg8::A), Operand::IndHL(Post::Dec)),
            0x3B => self.dec16(Reg16::SP),
            0x3C => self.inc8(Operand::Reg8(Reg8::A)),
            0x3D => self.dec8(Operand::Reg8(Reg8::A)),
            0x3E => self.ld8(Operand::Reg8(Reg8::A), Operand::ImmU8),
            0x3F => self.ccf(),

            0xC0 => self.ret(Cond::NotZero),
            0xC1 => self.pop_rr(Reg16::BC),
            0xC2 => self.jp(Cond::NotZero),
            0xC3 => self.jp(Cond::Always),
            0xC4 => self.call(Cond::NotZero),
            0xC5 => self.push_rr(Reg16::BC),
            0xC6 => {
                let value = self.get_u8(Operand::ImmU8);
                self.add_a(value, false);
            }
            0xC7 => self.rst(0x00),
            0xC8 => self.ret(Cond::Zero),
            0xC9 => self.ret(Cond::Always),
            0xCA => self.jp(Cond::Zero),
            0xCC => self.call(Cond::Zero),
            0xCD => self.call(Cond::Always),
            0xCE => {
                let value = self.get_u8(Operand::ImmU8);
                self.add_a(value, true);
            }
            0xCF => self.rst(0x08),

            0xD0 => self.ret(Cond::NotCarry),
            0xD1 => self.pop_rr(Reg16::DE),
            0xD2 => self.jp(Cond::NotCarry),
            0xD4 => self.call(Cond::NotCarry),
            0xD5 => self.push_rr(Reg16::DE),
            0xD6 => {
                let value = self.get_u8(Operand::ImmU8);
                self.sub_a(value, false);
            }
            0xD7 => self.rst(0x10),
            0xD8 => self.ret(Cond::Carry),
            0xD9 => self.reti(),
            0xDA => self.jp(Cond::Carry),
            0xDC => self.call(Cond::Carry),
            0xDE => {
                let value = self.get_u8(Operand::ImmU8);
                self.sub_a(value, true);
            }
            0xDF => self.rst(0x18),

            0xE0 => self.ld8(Operand::MemImm8, Operand::Reg8(Reg8::A)),
            0xE1 => self.pop_rr(Reg16::HL),
            0xE2 => self.ld8(Operand::MemC, Operand::Reg8(Reg8::A)),
            0xE5 => self.push_rr(Reg16::HL),
            0xE6 => {
                let value = self.get_u8(Operand::ImmU8);
                self.and_a(value);
            }
            0xE7 => self.rst(0x20),
            0xE8 => self.add_sp_e8(),
            0xE9 => self.jp_hl(),
            0xEA => self.ld8(Operand::MemImm16, Operand::Reg8(Reg8::A)),
            0xEE => {
                let value = self.get_u8(Operand::ImmU8);
                self.xor_a(value);
            }
            0xEF => self.rst(0x28),

            0xF0 => self.ld8(Operand::Reg8(Reg8::A), Operand::MemImm8),
            0xF1 => self.pop_rr(Reg16::AF),
            0xF2 => self.ld8(Operand::Reg8(Reg8::A), Operand::MemC),
            0xF3 => self.di(),
            0xF5 => self.push_rr(Reg16::AF),
            0xF6 => {
                let value = self.get_u8(Operand::ImmU8);
                self.or_a(value);
            }
            0xF7 => self.rst(0x30),
            0xF8 => self.ld_hl_sp_e8(),
            0xF9 => self.ld_sp_hl(),
            0xFA => self.ld8(Operand::Reg8(Reg8::A), Operand::MemImm16),
            0xFB => self.ei(),
            0xFE => {
                let value = self.get_u8(Operand::ImmU8);
                self.cp_a(value);
            }
            0xFF => self.rst(0x38),

            _ => self.illegal_opcode(opcode),
        }
    }

    /// `0xCB xx`: bits 7..6 select rotate/shift (`00`), `BIT` (`01`), `RES` (`10`), or `SET`
    /// (`11`); bits 5..3 select the bit literal (for BIT/RES/SET) or the rotate/shift variant;
    /// bits 2..0 select the operand via [`operand_for_field`].
    fn execute_cb(&mut self, opcode: u8) {
        let operand = operand_for_field(opcode);
        let bit = (opcode >> 3) & 0x7;
        match opcode >> 6 {
            0 => self.cb_shift_rotate(opcode, operand),
            1 => {
                let value = self.get_u8(operand);
                self.registers.set_zf((value & (1 << bit)) == 0);
                self.registers.set_n(false);
                self.registers.set_h(true);
            }
            2 => {
                let value = self.get_u8(operand);
                self.set_u8(operand, value & !(1 << bit));
            }
            3 => {
                let value = self.get_u8(operand);
                self.set_u8(operand, value | (1 << bit));
            }
            _ => unreachable!(),
        }
    }

    fn cb_shift_rotate(&mut self, opcode: u8, operand: Operand) {
        match (opcode >> 3) & 0x7 {
            0 => self.rlc(operand),
            1 => self.rrc(operand),
            2 => self.rl(operand),
            3 => self.rr(operand),
            4 => self.sla(operand),
            5 => self.sra(operand),
            6 => self.swap(operand),
            7 => self.srl(operand),
            _ => unreachable!(),
        }
    }
}

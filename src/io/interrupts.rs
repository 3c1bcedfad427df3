//! The `IE`/`IF` interrupt fabric shared by the CPU, timer, PPU, and joypad.

use bitflags::*;

bitflags! {
    #[derive(Default)]
    pub struct InterruptFlags: u8 {
        /// V-Blank, serviced at `0x0040`.
        const VBLANK = 0b0000_0001;
        /// LCD STAT, serviced at `0x0048`.
        const LCD    = 0b0000_0010;
        /// Timer overflow, serviced at `0x0050`.
        const TIMER  = 0b0000_0100;
        /// Serial transfer complete, serviced at `0x0058`.
        const SERIAL = 0b0000_1000;
        /// Joypad edge, serviced at `0x0060`.
        const JOYPAD = 0b0001_0000;
    }
}

impl InterruptFlags {
    /// Interrupts in priority order, lowest bit first, as serviced by the CPU.
    pub const PRIORITY_ORDER: [InterruptFlags; 5] = [
        InterruptFlags::VBLANK,
        InterruptFlags::LCD,
        InterruptFlags::TIMER,
        InterruptFlags::SERIAL,
        InterruptFlags::JOYPAD,
    ];

    /// The entry-point address the CPU jumps to when servicing this interrupt.
    pub fn vector(self) -> u16 {
        match self {
            InterruptFlags::VBLANK => 0x0040,
            InterruptFlags::LCD => 0x0048,
            InterruptFlags::TIMER => 0x0050,
            InterruptFlags::SERIAL => 0x0058,
            InterruptFlags::JOYPAD => 0x0060,
            _ => unreachable!("vector() called on a non-singular InterruptFlags value"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_order_is_lowest_bit_first() {
        let bits: Vec<u8> = InterruptFlags::PRIORITY_ORDER.iter().map(|f| f.bits()).collect();
        assert_eq!(bits, vec![0x01, 0x02, 0x04, 0x08, 0x10]);
    }

    #[test]
    fn vector_addresses_match_hardware() {
        assert_eq!(InterruptFlags::VBLANK.vector(), 0x0040);
        assert_eq!(InterruptFlags::JOYPAD.vector(), 0x0060);
    }
}

//! Memory bank controller behavior for the ROM address space (`0x0000..=0x7FFF`).
//!
//! Only MBC0 (no banking) and the subset of MBC1 banking this core models are implemented,
//! per the Non-goals on MBC2/3/5/7.

const ROM_BANK_SIZE: usize = 0x4000;

#[derive(Debug, Clone)]
pub enum Mbc {
    /// No banking: reads of `0x4000..=0x7FFF` always return the second 16KiB of the ROM.
    None,
    /// 5-bit ROM bank register. RAM-enable is accepted but otherwise has no effect: this core
    /// carries no external cartridge RAM.
    Mbc1 { rom_bank: u8 },
}

impl Mbc {
    /// Picks a banking mode from the cartridge-type header byte, falling back to no banking
    /// for anything this core doesn't model rather than refusing to load the ROM.
    pub fn from_cartridge_type(cartridge_type: u8) -> Self {
        match cartridge_type {
            0x00 => Mbc::None,
            0x01..=0x03 => Mbc::Mbc1 { rom_bank: 1 },
            other => {
                log::warn!(
                    "Cartridge type {:#04X} is not implemented by this core, falling back to no banking",
                    other
                );
                Mbc::None
            }
        }
    }

    pub fn read(&self, rom: &[u8], address: u16) -> u8 {
        let offset = match (self, address) {
            (_, 0x0000..=0x3FFF) => address as usize,
            (Mbc::None, 0x4000..=0x7FFF) => address as usize,
            (Mbc::Mbc1 { rom_bank }, 0x4000..=0x7FFF) => {
                (*rom_bank as usize) * ROM_BANK_SIZE + (address as usize - ROM_BANK_SIZE)
            }
            _ => unreachable!("Mbc::read called with address outside of ROM space"),
        };

        rom.get(offset).copied().unwrap_or(0xFF)
    }

    pub fn write(&mut self, address: u16, value: u8) {
        match (self, address) {
            (Mbc::None, _) => {
                log::trace!("Ignored write of {:#04X} to read-only cartridge at {:#06X}", value, address);
            }
            (Mbc::Mbc1 { .. }, 0x0000..=0x1FFF) => {
                // RAM-enable, ignored: this core carries no external cartridge RAM.
            }
            (Mbc::Mbc1 { rom_bank }, 0x2000..=0x3FFF) => {
                let bank = value & 0x1F;
                *rom_bank = if bank == 0 { 1 } else { bank };
            }
            (Mbc::Mbc1 { .. }, 0x4000..=0x7FFF) => {
                log::trace!("Ignored write of {:#04X} to MBC1 upper bank-select region", value);
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mbc0_never_banks() {
        let rom = vec![0xAAu8; 0x8000];
        let mbc = Mbc::None;
        assert_eq!(mbc.read(&rom, 0x4000), 0xAA);
    }

    #[test]
    fn mbc1_bank_zero_promotes_to_one() {
        let mut mbc = Mbc::Mbc1 { rom_bank: 1 };
        mbc.write(0x2100, 0x00);
        assert!(matches!(mbc, Mbc::Mbc1 { rom_bank: 1 }));
    }

    #[test]
    fn mbc1_selects_bank() {
        let mut rom = vec![0u8; ROM_BANK_SIZE * 3];
        rom[ROM_BANK_SIZE * 2] = 0x42;
        let mut mbc = Mbc::Mbc1 { rom_bank: 1 };
        mbc.write(0x2100, 0x02);
        assert_eq!(mbc.read(&rom, 0x4000), 0x42);
    }
}

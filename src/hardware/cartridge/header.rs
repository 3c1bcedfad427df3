//! Parsing of the cartridge header at `0x0100..=0x014F`.
//!
//! Everything here is descriptive only: the header tells us which [`crate::hardware::cartridge::mbc::Mbc`]
//! kind to pick, but is otherwise just logged, never enforced against the ROM contents.

pub const HEADER_START: u16 = 0x0100;
pub const HEADER_END: u16 = 0x014F;

#[derive(Debug, Default, Clone)]
pub struct CartridgeHeader {
    /// Upper case ASCII, up to 16 characters, zero filled if shorter.
    pub title: String,
    /// Specifies which Memory Bank Controller (if any) is used in the cartridge.
    pub cartridge_type: u8,
    /// Specifies the ROM Size of the cartridge. Typically calculated as `32KB shl N`.
    pub rom_size: u8,
    /// Specifies the size of the external RAM in the cartridge (if any).
    pub ram_size: u8,
    /// Specifies the games company/publisher code in range 00-FFh.
    pub old_licensee_code: u8,
    /// Contains an 8 bit checksum across the cartridge header bytes 0134-014C.
    pub header_checksum: u8,
}

impl CartridgeHeader {
    pub fn new(rom: &[u8]) -> Self {
        let header = CartridgeHeader {
            title: read_title(rom),
            cartridge_type: rom.get(0x147).copied().unwrap_or(0),
            rom_size: rom.get(0x148).copied().unwrap_or(0),
            ram_size: rom.get(0x149).copied().unwrap_or(0),
            old_licensee_code: rom.get(0x14B).copied().unwrap_or(0),
            header_checksum: rom.get(0x14D).copied().unwrap_or(0),
        };

        log::info!(
            "Loaded cartridge `{}` (type={:#04X}, rom_size={:#04X}, ram_size={:#04X})",
            header.title,
            header.cartridge_type,
            header.rom_size,
            header.ram_size
        );

        header
    }
}

fn read_title(rom: &[u8]) -> String {
    let end = rom.len().min(0x144);
    let start = rom.len().min(0x134);
    String::from_utf8_lossy(&rom[start..end])
        .trim_matches(char::from(0))
        .to_owned()
}

#[cfg(test)]
mod tests {
    use super::read_title;

    #[test]
    fn test_read_title() {
        let mut test = vec![0u8; 0x200];
        for (loc, i) in [0x48, 0x65, 0x6c, 0x6c, 0x6f, 0x20, 0x57, 0x6f, 0x72, 0x00, 0x00]
            .iter()
            .enumerate()
        {
            test[0x134 + loc] = *i;
        }
        assert_eq!("Hello Wor", read_title(&test));
    }

    #[test]
    fn test_read_title_short_rom_does_not_panic() {
        let test = vec![0u8; 0x10];
        assert_eq!("", read_title(&test));
    }
}

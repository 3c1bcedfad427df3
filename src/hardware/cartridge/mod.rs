//! Byte-addressable view of the cartridge image with bank switching.

pub mod header;
pub mod mbc;

use header::CartridgeHeader;
use mbc::Mbc;

pub struct Cartridge {
    rom: Vec<u8>,
    mbc: Mbc,
    header: CartridgeHeader,
}

impl Cartridge {
    pub fn new(rom: Vec<u8>) -> Self {
        let header = CartridgeHeader::new(&rom);
        let mbc = Mbc::from_cartridge_type(header.cartridge_type);

        Cartridge { rom, mbc, header }
    }

    pub fn header(&self) -> &CartridgeHeader {
        &self.header
    }

    #[inline]
    pub fn read(&self, address: u16) -> u8 {
        self.mbc.read(&self.rom, address)
    }

    #[inline]
    pub fn write(&mut self, address: u16, value: u8) {
        self.mbc.write(address, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_bank_zero_directly() {
        let mut rom = vec![0u8; 0x8000];
        rom[0x10] = 0x55;
        let cart = Cartridge::new(rom);

        assert_eq!(cart.read(0x10), 0x55);
    }
}

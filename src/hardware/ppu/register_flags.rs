//! Bitflag views of the PPU's two control registers, `LCDC` (`0xFF40`) and `STAT` (`0xFF41`).

use bitflags::*;

bitflags! {
    /// `LCDC` (`0xFF40`). Unlike VRAM, the PPU never locks this register, so it can be
    /// modified mid-scanline.
    #[derive(Default)]
    pub struct Lcdc: u8 {
        /// Bit 0: when clear, background and window render as color 0 and the window bit is ignored.
        const BG_WINDOW_PRIORITY   = 0b0000_0001;
        /// Bit 1: toggles object (sprite) rendering.
        const OBJ_ENABLE           = 0b0000_0010;
        /// Bit 2: object size, 0 = 8x8, 1 = 8x16.
        const OBJ_SIZE             = 0b0000_0100;
        /// Bit 3: 0 = background uses tilemap `0x9800`, 1 = `0x9C00`.
        const BG_TILE_MAP          = 0b0000_1000;
        /// Bit 4: tile data addressing mode. 0 = `0x8800` (signed), 1 = `0x8000` (unsigned).
        const BG_WINDOW_TILE_DATA  = 0b0001_0000;
        /// Bit 5: window enable.
        const WINDOW_ENABLE        = 0b0010_0000;
        /// Bit 6: 0 = window uses tilemap `0x9800`, 1 = `0x9C00`.
        const WINDOW_TILE_MAP      = 0b0100_0000;
        /// Bit 7: master LCD/PPU enable.
        const LCD_ENABLE           = 0b1000_0000;
    }
}

bitflags! {
    /// `STAT` (`0xFF41`). Bits 0-1 mirror the current PPU mode; bit 7 always reads high.
    #[derive(Default)]
    pub struct Stat: u8 {
        const MODE_LOW              = 0b0000_0001;
        const MODE_HIGH              = 0b0000_0010;
        /// `1` iff `LYC == LY` (read-only).
        const COINCIDENCE_FLAG      = 0b0000_0100;
        const MODE_0_HBLANK_INT     = 0b0000_1000;
        const MODE_1_VBLANK_INT     = 0b0001_0000;
        const MODE_2_OAMSCAN_INT    = 0b0010_0000;
        const LYC_INT               = 0b0100_0000;
    }
}

impl Stat {
    pub fn set_mode_bits(&mut self, mode_bits: u8) {
        self.bits = (self.bits & !0x03) | (mode_bits & 0x03);
    }
}

bitflags! {
    /// OAM attribute byte (byte 3 of each 4-byte sprite entry).
    #[derive(Default)]
    pub struct AttributeFlags: u8 {
        /// 0 = `OBP0`, 1 = `OBP1`.
        const PALETTE_NUMBER     = 0b0001_0000;
        /// Horizontally mirrored when set.
        const X_FLIP             = 0b0010_0000;
        /// Vertically mirrored when set.
        const Y_FLIP             = 0b0100_0000;
        /// `1`: object is hidden behind non-zero background/window colors.
        const BG_WINDOW_PRIORITY = 0b1000_0000;
    }
}

//! Joypad (`P1`, `0xFF00`) register: button state exposed through a selectable nibble.

use bitflags::*;

pub const JOYPAD_REGISTER: u16 = 0xFF00;

#[derive(Debug, Copy, Clone, PartialOrd, PartialEq)]
pub enum InputKey {
    Right,
    Left,
    Up,
    Down,
    A,
    B,
    Select,
    Start,
}

#[derive(Debug, Clone)]
pub struct Joypad {
    pressed_buttons: JoypadFlags,
    pressed_directions: JoypadFlags,
    selected_mode: JoypadFlags,
}

impl Joypad {
    pub fn new() -> Self {
        Joypad {
            pressed_buttons: JoypadFlags::empty(),
            pressed_directions: JoypadFlags::empty(),
            selected_mode: JoypadFlags::from_bits_truncate(0xFF),
        }
    }

    /// Current `P1` value for whichever group (buttons, directions) is selected.
    pub fn read(&self) -> u8 {
        !self.selected_mode.bits() | 0xC0
    }

    /// Only bits 4-5 (the group-select bits) are writable; the rest are ignored.
    pub fn write(&mut self, value: u8) {
        self.selected_mode = JoypadFlags::from_bits_truncate(!value & 0b0011_0000);
        self.update_flags();
    }

    pub fn set_button(&mut self, input: InputKey, pressed: bool) {
        let flag = input.flag();
        let group = if input.is_direction() {
            &mut self.pressed_directions
        } else {
            &mut self.pressed_buttons
        };
        group.set(flag, pressed);
        self.update_flags();
    }

    fn update_flags(&mut self) {
        self.selected_mode = JoypadFlags::from_bits_truncate(self.selected_mode.bits() & 0b0011_0000);
        if self.selected_mode.contains(JoypadFlags::DIRECTION_SELECT) {
            self.selected_mode.insert(self.pressed_directions);
        }
        if self.selected_mode.contains(JoypadFlags::BUTTON_SELECT) {
            self.selected_mode.insert(self.pressed_buttons);
        }
    }
}

impl InputKey {
    fn is_direction(self) -> bool {
        matches!(self, InputKey::Right | InputKey::Left | InputKey::Up | InputKey::Down)
    }

    fn flag(self) -> JoypadFlags {
        match self {
            InputKey::Right | InputKey::A => JoypadFlags::RIGHT_A,
            InputKey::Left | InputKey::B => JoypadFlags::LEFT_B,
            InputKey::Up | InputKey::Select => JoypadFlags::UP_SELECT,
            InputKey::Down | InputKey::Start => JoypadFlags::DOWN_START,
        }
    }
}

bitflags! {
    #[derive(Default)]
    struct JoypadFlags: u8 {
        const RIGHT_A          = 0b0000_0001;
        const LEFT_B           = 0b0000_0010;
        const UP_SELECT        = 0b0000_0100;
        const DOWN_START       = 0b0000_1000;
        const DIRECTION_SELECT = 0b0001_0000;
        const BUTTON_SELECT    = 0b0010_0000;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unpressed_reads_as_high() {
        let joypad = Joypad::new();
        assert_eq!(joypad.read() & 0x0F, 0x0F);
    }

    #[test]
    fn pressed_direction_clears_bit_when_selected() {
        let mut joypad = Joypad::new();
        joypad.write(0b0010_0000); // select directions (active low -> DIRECTION_SELECT bit set)
        joypad.set_button(InputKey::Down, true);
        assert_eq!(joypad.read() & 0b1000, 0);
    }
}

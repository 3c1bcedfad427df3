//! Core of a cycle-accurate Game Boy (DMG) emulator: the coupled simulation of the Sharp SM83
//! CPU, the memory-mapped bus, the timer unit, and the picture-processing unit, synchronized at
//! M-cycle granularity (§2). ROM loading, windowing, audio, and CGB extensions are left to a
//! front-end crate; this crate only exposes the interfaces in §6.

pub mod config;
pub mod emulator;
pub mod error;
pub mod hardware;
mod io;

pub use crate::config::{BootOverride, MachineOptions, MachineOptionsBuilder};
pub use crate::emulator::Emulator;
pub use crate::error::MachineError;
pub use crate::hardware::ppu::palette::{DmgColor, RgbaPalette};
pub use crate::io::joypad::InputKey;

//! A CHIP-8 interpreter core.
//!
//! [`Emulator`] owns the whole machine: memory, registers, stack, timers,
//! keypad and framebuffer. A driver calls [`Emulator::fetch`] and
//! [`Emulator::decode_execute`] (or [`Emulator::step`] for both) at its own
//! instruction rate and [`Emulator::tick_timers`] at 60 Hz. Rendering, input
//! and sound are left to the driver, which reads the framebuffer through
//! [`Emulator::display`] and reports keys through [`Emulator::set_key`].
//!
//! ```
//! use chip8_vm::Emulator;
//!
//! let rom = [0x60u8, 0x2A, 0x12, 0x02]; // LD V0, 0x2A; JP 0x202
//! let mut emu = Emulator::load_rom(&rom[..]).unwrap();
//! emu.step().unwrap();
//! assert_eq!(emu.registers()[0], 0x2A);
//! ```

pub mod config;
pub mod emulator;
pub mod error;
pub mod instruction;

pub use config::{Config, EdgeMode};
pub use emulator::{Emulator, DISPLAY_HEIGHT, DISPLAY_WIDTH};
pub use error::{DecodeError, LoadError};
pub use instruction::Instruction;

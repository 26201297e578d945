pub use chip8::{Chip8, Exit};
pub use config::{Config, Quirks};
pub use constants::CLOCK_SPEED;
pub use error::{Error, Fault, Result};
pub use memory::Memory;
pub use peripherals::{Display, Frame, FrameBuffer, KeyState, Keypad};
pub use registers::Registers;
pub use timers::{TimerMode, TimerPair};

mod chip8;
mod config;
pub mod constants;
mod error;
mod instruction;
mod memory;
mod opcode;
mod operations;
mod peripherals;
mod registers;
mod timers;

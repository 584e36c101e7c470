pub mod config;
pub mod cpu;
pub mod decoder;
pub mod error;
pub mod instructions;
pub mod machine;

mod font;
mod keypad;
mod registers;
mod stack;

pub use crate::config::Chip8Config;
pub use crate::decoder::{disassemble, Chip8Decoder};
pub use crate::error::{Chip8Error, Result};
pub use crate::instructions::Chip8Instruction;
pub use crate::keypad::{Keypad, KEY_COUNT};
pub use crate::machine::{Chip8Machine, StepOutcome};
pub use crate::registers::Chip8Registers;
pub use crate::stack::{Chip8Stack, StackError};
pub use chipvm_core::SpritePolicy;

/// Total addressable memory.
pub const MEMORY_SIZE: usize = 0x1000;
/// Programs are loaded, and start executing, here.
pub const PROGRAM_START: u16 = 0x200;
/// Largest program image that fits between `PROGRAM_START` and the end of memory.
pub const MAX_PROGRAM_SIZE: usize = MEMORY_SIZE - PROGRAM_START as usize;
pub const DISPLAY_WIDTH: usize = 64;
pub const DISPLAY_HEIGHT: usize = 32;

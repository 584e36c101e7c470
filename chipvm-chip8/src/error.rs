use chipvm_core::{DisplayError, MemoryError};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Chip8Error {
    #[error("program is {length} bytes, only {capacity} fit in memory")]
    ProgramTooLarge { length: usize, capacity: usize },
    #[error("unknown opcode 0x{opcode:04X} at 0x{address:04X}")]
    UnknownOpcode { address: u16, opcode: u16 },
    #[error("call at 0x{address:04X} overflows the call stack")]
    StackOverflow { address: u16 },
    #[error("return at 0x{address:04X} with an empty call stack")]
    StackUnderflow { address: u16 },
    #[error("write to reserved memory at 0x{address:04X}")]
    ReservedMemoryWrite { address: u16 },
    #[error(transparent)]
    Memory(#[from] MemoryError),
    #[error(transparent)]
    Display(#[from] DisplayError),
}

pub type Result<T> = std::result::Result<T, Chip8Error>;

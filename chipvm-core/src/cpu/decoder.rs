use thiserror::Error;

use crate::cpu::opcode::OpcodeError;
use crate::cpu::Instruction;

#[derive(Debug, Error, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DecodeError {
    #[error("invalid opcode 0x{0:04X}")]
    InvalidOpcode(u64),
    #[error(transparent)]
    Opcode(#[from] OpcodeError),
}

pub type Result<T> = std::result::Result<T, DecodeError>;

pub trait DecodeOne {
    type Instruction: Instruction;

    fn decode_one(&self, bytes: &[u8]) -> Result<Self::Instruction>;
}

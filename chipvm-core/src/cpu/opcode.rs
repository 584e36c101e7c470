use num_traits::{ToPrimitive, Unsigned};
use std::{fmt, ops};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OpcodeError {
    #[error("{0} index {1} out of bounds, must be [0, {2})")]
    IndexOutOfBounds(&'static str, usize, usize),
    #[error("opcode needs {needed} bytes, only {available} available")]
    Truncated { needed: usize, available: usize },
}

pub type Result<T> = std::result::Result<T, OpcodeError>;

/// Integer widths an instruction word can be stored in.
pub trait OpcodeValue:
    Copy
    + fmt::Debug
    + Unsigned
    + ToPrimitive
    + ops::BitAnd<Self, Output = Self>
    + ops::Shr<usize, Output = Self>
{
    const MASK_BYTE: Self;
    const MASK_NYBBLE: Self;

    const WIDTH_BYTES: usize = std::mem::size_of::<Self>();
    const WIDTH_NYBBLES: usize = Self::WIDTH_BYTES * 2;
}

impl OpcodeValue for u16 {
    const MASK_BYTE: Self = 0x00FF;
    const MASK_NYBBLE: Self = 0x000F;
}

#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Opcode<T: OpcodeValue> {
    value: T,
}

pub type Opcode16 = Opcode<u16>;

impl<T: OpcodeValue> Opcode<T> {
    pub fn new(value: T) -> Self {
        Self { value }
    }

    pub fn value(&self) -> T {
        self.value
    }

    fn field(&self, kind: &'static str, idx: usize, count: usize, mask: T, bits: usize) -> Result<u8> {
        if idx >= count {
            return Err(OpcodeError::IndexOutOfBounds(kind, idx, count));
        }
        let shift = idx * bits;
        // A byte or nybble mask always fits in a u8.
        ((self.value >> shift) & mask)
            .to_u8()
            .ok_or(OpcodeError::IndexOutOfBounds(kind, idx, count))
    }

    /// Byte `idx`, counting from the least significant byte.
    pub fn try_get_byte(&self, idx: usize) -> Result<u8> {
        self.field("byte", idx, T::WIDTH_BYTES, T::MASK_BYTE, 8)
    }

    /// Nybble `idx`, counting from the least significant nybble. For a
    /// 16-bit opcode `0xABCD`, nybble 3 is `0xA` and nybble 0 is `0xD`.
    pub fn try_get_nybble(&self, idx: usize) -> Result<u8> {
        self.field("nybble", idx, T::WIDTH_NYBBLES, T::MASK_NYBBLE, 4)
    }
}

impl fmt::Debug for Opcode16 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:04X}", self.value)
    }
}

impl Opcode16 {
    /// Reads a big-endian word from the front of `bytes`.
    pub fn from_be_bytes(bytes: &[u8]) -> Result<Self> {
        match bytes {
            [hi, lo, ..] => Ok(Self::new(u16::from_be_bytes([*hi, *lo]))),
            _ => Err(OpcodeError::Truncated {
                needed: 2,
                available: bytes.len(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draw_word_fields() {
        let op = Opcode16::new(0xD125);
        assert_eq!(op.try_get_nybble(3), Ok(0xD));
        assert_eq!(op.try_get_nybble(2), Ok(0x1));
        assert_eq!(op.try_get_nybble(1), Ok(0x2));
        assert_eq!(op.try_get_nybble(0), Ok(0x5));
        assert_eq!(op.try_get_byte(1), Ok(0xD1));
        assert_eq!(op.try_get_byte(0), Ok(0x25));
    }

    #[test]
    fn fields_past_the_word_are_errors() {
        let op = Opcode16::new(0xFFFF);
        assert_eq!(
            op.try_get_nybble(4),
            Err(OpcodeError::IndexOutOfBounds("nybble", 4, 4))
        );
        assert_eq!(
            op.try_get_byte(2),
            Err(OpcodeError::IndexOutOfBounds("byte", 2, 2))
        );
    }

    #[test]
    fn from_be_bytes_reads_the_leading_word() {
        let op = Opcode16::from_be_bytes(&[0xF3, 0x0A, 0xFF]).unwrap();
        assert_eq!(op.value(), 0xF30A);
        assert_eq!(format!("{:?}", op), "0xF30A");

        assert_eq!(
            Opcode16::from_be_bytes(&[0x12]),
            Err(OpcodeError::Truncated {
                needed: 2,
                available: 1
            })
        );
        assert_eq!(
            Opcode16::from_be_bytes(&[]),
            Err(OpcodeError::Truncated {
                needed: 2,
                available: 0
            })
        );
    }
}

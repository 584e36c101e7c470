use std::fmt;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MemoryError {
    #[error("access of {length} byte(s) at 0x{address:04X} exceeds memory size 0x{size:04X}")]
    OutOfBounds {
        address: usize,
        length: usize,
        size: usize,
    },
}

pub type Result<T> = std::result::Result<T, MemoryError>;

/// Fixed-size byte-addressable memory, owned by a single machine.
#[derive(Clone)]
pub struct Ram<const N: usize> {
    buffer: [u8; N],
}

impl<const N: usize> fmt::Debug for Ram<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ram[0x{:X} bytes]", N)
    }
}

impl<const N: usize> Default for Ram<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> Ram<N> {
    pub fn new() -> Self {
        Self { buffer: [0; N] }
    }

    pub const fn size(&self) -> usize {
        N
    }

    fn check(&self, address: usize, length: usize) -> Result<()> {
        match address.checked_add(length) {
            Some(end) if end <= N => Ok(()),
            _ => Err(MemoryError::OutOfBounds {
                address,
                length,
                size: N,
            }),
        }
    }

    pub fn read(&self, address: usize, length: usize) -> Result<&[u8]> {
        self.check(address, length)?;
        tracing::trace!(length, address = format_args!("0x{:04X}", address), "read");
        Ok(&self.buffer[address..address + length])
    }

    /// Writes all of `data` at `address`, or nothing if any byte would land
    /// outside of memory.
    pub fn write(&mut self, address: usize, data: &[u8]) -> Result<()> {
        self.check(address, data.len())?;
        tracing::trace!(
            length = data.len(),
            address = format_args!("0x{:04X}", address),
            "write"
        );
        self.buffer[address..address + data.len()].copy_from_slice(data);
        Ok(())
    }

    pub fn clear(&mut self) {
        self.buffer.fill(0);
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_then_read() {
        let mut ram = Ram::<16>::new();
        ram.write(4, &[0xDE, 0xAD]).unwrap();
        assert_eq!(ram.read(3, 4).unwrap(), &[0x00, 0xDE, 0xAD, 0x00]);
    }

    #[test]
    fn out_of_bounds_write_leaves_memory_untouched() {
        let mut ram = Ram::<16>::new();
        let err = ram.write(15, &[1, 2]).unwrap_err();
        assert_eq!(
            err,
            MemoryError::OutOfBounds {
                address: 15,
                length: 2,
                size: 16
            }
        );
        assert!(ram.as_slice().iter().all(|&b| b == 0));
    }

    #[test]
    fn reads_up_to_the_last_byte() {
        let ram = Ram::<16>::new();
        assert!(ram.read(14, 2).is_ok());
        assert!(ram.read(15, 2).is_err());
        assert!(ram.read(usize::MAX, 2).is_err());
        assert!(ram.read(16, 0).is_ok());
    }

    #[test]
    fn clear_zeroes_everything() {
        let mut ram = Ram::<8>::new();
        ram.write(0, &[0xFF; 8]).unwrap();
        ram.clear();
        assert_eq!(ram.as_slice(), &[0; 8]);
        assert_eq!(ram.size(), 8);
        assert_eq!(format!("{:?}", ram), "Ram[0x8 bytes]");
    }
}

use std::fmt;

use thiserror::Error;

pub const STACK_DEPTH: usize = 16;

#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum StackError {
    #[error("call stack is full (16 frames)")]
    Overflow,
    #[error("call stack is empty")]
    Underflow,
}

#[derive(Clone, PartialEq, Eq)]
pub struct Chip8Stack {
    stack_pointer: u8,
    slots: [u16; STACK_DEPTH],
}

impl fmt::Debug for Chip8Stack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.frames().iter().map(|addr| format!("0x{:04X}", addr)))
            .finish()
    }
}

impl Default for Chip8Stack {
    fn default() -> Self {
        Self::new()
    }
}

impl Chip8Stack {
    pub fn new() -> Self {
        Chip8Stack {
            stack_pointer: 0,
            slots: [0; STACK_DEPTH],
        }
    }

    pub fn depth(&self) -> usize {
        usize::from(self.stack_pointer)
    }

    /// Return addresses currently on the stack, oldest first.
    pub fn frames(&self) -> &[u16] {
        &self.slots[..self.depth()]
    }

    pub fn push(&mut self, address: u16) -> Result<(), StackError> {
        if self.depth() == STACK_DEPTH {
            return Err(StackError::Overflow);
        }
        self.slots[self.depth()] = address;
        self.stack_pointer += 1;
        Ok(())
    }

    pub fn pop(&mut self) -> Result<u16, StackError> {
        if self.stack_pointer == 0 {
            return Err(StackError::Underflow);
        }
        self.stack_pointer -= 1;
        Ok(self.slots[self.depth()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_pop_is_lifo() {
        let mut stack = Chip8Stack::new();
        stack.push(0x202).unwrap();
        stack.push(0x30A).unwrap();
        assert_eq!(stack.frames(), &[0x202, 0x30A]);
        assert_eq!(format!("{:?}", stack), r#"["0x0202", "0x030A"]"#);
        assert_eq!(stack.pop(), Ok(0x30A));
        assert_eq!(stack.pop(), Ok(0x202));
        assert_eq!(stack.pop(), Err(StackError::Underflow));
    }

    #[test]
    fn seventeenth_push_overflows() {
        let mut stack = Chip8Stack::new();
        for frame in 0..STACK_DEPTH as u16 {
            stack.push(0x200 + frame * 2).unwrap();
        }
        assert_eq!(stack.push(0x400), Err(StackError::Overflow));
        assert_eq!(stack.depth(), STACK_DEPTH);
        assert_eq!(stack.frames().last(), Some(&0x21E));
    }
}

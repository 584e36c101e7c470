pub mod cpu;

mod display;
mod machine;
mod oscillator;
mod storage;

pub use crate::cpu::decoder::{DecodeError, DecodeOne};
pub use crate::cpu::opcode::{Opcode16, OpcodeError};
pub use crate::cpu::Instruction;
pub use crate::display::{DisplayError, MonochromeDisplay, SpritePolicy};
pub use crate::machine::{Machine, MachineError};
pub use crate::oscillator::{Oscillator, OscillatorError};
pub use crate::storage::{MemoryError, Ram};

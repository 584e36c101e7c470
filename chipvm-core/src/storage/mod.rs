mod ram;

pub use ram::{MemoryError, Ram};

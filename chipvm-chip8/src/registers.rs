use crate::PROGRAM_START;

#[derive(Clone, Debug, PartialEq, Eq)]
#[allow(non_snake_case)]
pub struct Chip8Registers {
    /// General-purpose registers V0 - VF. VF doubles as the flags register.
    V: [u8; 16],
    /// Index register, used for memory addressing.
    pub VI: u16,
    pub PC: u16,

    /// Delay timer register.
    pub DT: u8,

    /// Sound timer register.
    pub ST: u8,
}

impl Default for Chip8Registers {
    fn default() -> Self {
        Self::new()
    }
}

impl Chip8Registers {
    pub fn new() -> Self {
        Chip8Registers {
            V: [0; 16],
            VI: 0,
            PC: PROGRAM_START,
            DT: 0,
            ST: 0,
        }
    }

    pub fn v(&self, idx: u8) -> u8 {
        self.V[usize::from(idx & 0x0F)]
    }

    pub fn set_v(&mut self, idx: u8, value: u8) {
        self.V[usize::from(idx & 0x0F)] = value;
    }

    /// V0 through V`last` inclusive.
    pub fn v_range(&self, last: u8) -> &[u8] {
        &self.V[..=usize::from(last & 0x0F)]
    }

    pub fn flag(&self) -> u8 {
        self.V[0xF]
    }

    pub fn set_flag(&mut self, flag: bool) {
        self.V[0xF] = flag as u8;
    }

    /// Counts both timers down by one. Returns `true` when the sound timer
    /// reached zero on this tick.
    pub fn tick_timers(&mut self) -> bool {
        self.DT = self.DT.saturating_sub(1);
        if self.ST > 0 {
            self.ST -= 1;
            return self.ST == 0;
        }
        false
    }
}

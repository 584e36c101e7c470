use chipvm_core::{MonochromeDisplay, Ram, SpritePolicy};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::{Chip8Error, Result};
use crate::font::{FONT_ADDRESS, GLYPH_BYTES};
use crate::instructions::Chip8Instruction;
use crate::keypad::Keypad;
use crate::registers::Chip8Registers;
use crate::stack::{Chip8Stack, StackError};
use crate::{DISPLAY_HEIGHT, DISPLAY_WIDTH, MEMORY_SIZE, PROGRAM_START};

pub type Chip8RAM = Ram<MEMORY_SIZE>;
pub type Chip8Display = MonochromeDisplay<DISPLAY_WIDTH, DISPLAY_HEIGHT>;

/// Everything an instruction may touch outside of the CPU itself.
pub(crate) struct Peripherals<'a> {
    pub ram: &'a mut Chip8RAM,
    pub display: &'a mut Chip8Display,
    pub keypad: &'a Keypad,
    pub sprite_policy: SpritePolicy,
}

/// Side effects of one executed instruction that the caller has to act on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Effects {
    pub redraw: bool,
    pub clear: bool,
    pub waiting_for_key: bool,
}

#[derive(Debug)]
pub struct Chip8CPU {
    regs: Chip8Registers,
    stack: Chip8Stack,
    rng: StdRng,
}

fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

fn ensure_writable(address: u16) -> Result<()> {
    if address < PROGRAM_START {
        return Err(Chip8Error::ReservedMemoryWrite { address });
    }
    Ok(())
}

impl Chip8CPU {
    pub fn new(seed: Option<u64>) -> Self {
        Chip8CPU {
            regs: Chip8Registers::new(),
            stack: Chip8Stack::new(),
            rng: seeded_rng(seed),
        }
    }

    pub fn reset(&mut self, seed: Option<u64>) {
        *self = Self::new(seed);
    }

    pub fn regs(&self) -> &Chip8Registers {
        &self.regs
    }

    pub fn regs_mut(&mut self) -> &mut Chip8Registers {
        &mut self.regs
    }

    pub fn stack(&self) -> &Chip8Stack {
        &self.stack
    }

    /// Applies `ins`, which was fetched from the current PC. Every check runs
    /// before the first write, so a failed instruction leaves the machine
    /// exactly as it found it.
    pub(crate) fn execute(
        &mut self,
        ins: Chip8Instruction,
        io: &mut Peripherals<'_>,
    ) -> Result<Effects> {
        use Chip8Instruction::*;

        let pc = self.regs.PC;
        let next = pc.wrapping_add(2);
        let skip = pc.wrapping_add(4);
        let skip_if = |cond: bool| if cond { skip } else { next };
        let mut effects = Effects::default();

        self.regs.PC = match ins {
            ClearScreen => {
                io.display.clear();
                effects.clear = true;
                next
            }
            // The frame holds the word after the call, and the return moves
            // one word past it.
            Return => {
                let frame = self.stack.pop().map_err(|err| match err {
                    StackError::Underflow => Chip8Error::StackUnderflow { address: pc },
                    StackError::Overflow => Chip8Error::StackOverflow { address: pc },
                })?;
                frame.wrapping_add(2)
            }
            ExecuteMachineSubroutine { .. } => {
                return Err(Chip8Error::UnknownOpcode {
                    address: pc,
                    opcode: ins.opcode(),
                })
            }
            Jump { addr } => addr,
            Call { addr } => {
                self.stack
                    .push(next)
                    .map_err(|_| Chip8Error::StackOverflow { address: pc })?;
                addr
            }
            SkipIfEqual { vx_idx, value } => skip_if(self.regs.v(vx_idx) == value),
            SkipIfNotEqual { vx_idx, value } => skip_if(self.regs.v(vx_idx) != value),
            SkipIfRegEqual { vx_idx, vy_idx } => {
                skip_if(self.regs.v(vx_idx) == self.regs.v(vy_idx))
            }
            SetReg { vx_idx, value } => {
                self.regs.set_v(vx_idx, value);
                next
            }
            AddReg { vx_idx, value } => {
                self.regs.set_v(vx_idx, self.regs.v(vx_idx).wrapping_add(value));
                next
            }
            SetRegReg { vx_idx, vy_idx } => {
                self.regs.set_v(vx_idx, self.regs.v(vy_idx));
                next
            }
            OrRegReg { vx_idx, vy_idx } => {
                self.regs.set_v(vx_idx, self.regs.v(vx_idx) | self.regs.v(vy_idx));
                next
            }
            AndRegReg { vx_idx, vy_idx } => {
                self.regs.set_v(vx_idx, self.regs.v(vx_idx) & self.regs.v(vy_idx));
                next
            }
            XorRegReg { vx_idx, vy_idx } => {
                self.regs.set_v(vx_idx, self.regs.v(vx_idx) ^ self.regs.v(vy_idx));
                next
            }
            // VF is written before Vx throughout the 8XY_ family, so when X is
            // F the arithmetic result wins over the flag.
            AddRegReg { vx_idx, vy_idx } => {
                let (sum, carry) = self.regs.v(vx_idx).overflowing_add(self.regs.v(vy_idx));
                self.regs.set_flag(carry);
                self.regs.set_v(vx_idx, sum);
                next
            }
            SubRegReg { vx_idx, vy_idx } => {
                let (diff, borrow) = self.regs.v(vx_idx).overflowing_sub(self.regs.v(vy_idx));
                self.regs.set_flag(!borrow);
                self.regs.set_v(vx_idx, diff);
                next
            }
            ShiftRightReg { vx_idx, .. } => {
                let vx = self.regs.v(vx_idx);
                self.regs.set_flag(vx & 0x01 != 0);
                self.regs.set_v(vx_idx, vx >> 1);
                next
            }
            SubRegRegReverse { vx_idx, vy_idx } => {
                let (diff, borrow) = self.regs.v(vy_idx).overflowing_sub(self.regs.v(vx_idx));
                self.regs.set_flag(!borrow);
                self.regs.set_v(vx_idx, diff);
                next
            }
            ShiftLeftReg { vx_idx, .. } => {
                let vx = self.regs.v(vx_idx);
                self.regs.set_flag(vx & 0x80 != 0);
                self.regs.set_v(vx_idx, vx << 1);
                next
            }
            SkipIfRegNotEqual { vx_idx, vy_idx } => {
                skip_if(self.regs.v(vx_idx) != self.regs.v(vy_idx))
            }
            SetVI { addr } => {
                self.regs.VI = addr;
                next
            }
            JumpPlusV0 { addr } => addr + u16::from(self.regs.v(0x0)),
            Random { vx_idx, mask } => {
                self.regs.set_v(vx_idx, self.rng.gen::<u8>() & mask);
                next
            }
            Draw {
                vx_idx,
                vy_idx,
                num_bytes,
            } => {
                let x = usize::from(self.regs.v(vx_idx));
                let y = usize::from(self.regs.v(vy_idx));
                let rows = io.ram.read(usize::from(self.regs.VI), usize::from(num_bytes))?;
                let collision = io.display.draw_sprite(x, y, rows, io.sprite_policy)?;
                self.regs.set_flag(collision);
                effects.redraw = true;
                next
            }
            SkipIfKeyPressed { vx_idx } => skip_if(io.keypad.is_pressed(self.regs.v(vx_idx))),
            SkipIfKeyNotPressed { vx_idx } => {
                skip_if(!io.keypad.is_pressed(self.regs.v(vx_idx)))
            }
            GetDelayTimer { vx_idx } => {
                self.regs.set_v(vx_idx, self.regs.DT);
                next
            }
            WaitForKey { vx_idx } => match io.keypad.last_pressed() {
                Some(key) => {
                    self.regs.set_v(vx_idx, key);
                    next
                }
                None => {
                    effects.waiting_for_key = true;
                    pc
                }
            },
            SetDelayTimer { vx_idx } => {
                self.regs.DT = self.regs.v(vx_idx);
                next
            }
            SetSoundTimer { vx_idx } => {
                self.regs.ST = self.regs.v(vx_idx);
                next
            }
            AddRegVI { vx_idx } => {
                let sum = u32::from(self.regs.VI) + u32::from(self.regs.v(vx_idx));
                self.regs.set_flag(sum > 0x0FFF);
                self.regs.VI = self.regs.VI.wrapping_add(u16::from(self.regs.v(vx_idx)));
                next
            }
            SetVIDigit { vx_idx } => {
                self.regs.VI = FONT_ADDRESS + u16::from(self.regs.v(vx_idx)) * GLYPH_BYTES;
                next
            }
            StoreBCD { vx_idx } => {
                let vx = self.regs.v(vx_idx);
                ensure_writable(self.regs.VI)?;
                io.ram
                    .write(usize::from(self.regs.VI), &[vx / 100, vx / 10 % 10, vx % 10])?;
                next
            }
            StoreRegs { vx_idx } => {
                ensure_writable(self.regs.VI)?;
                io.ram
                    .write(usize::from(self.regs.VI), self.regs.v_range(vx_idx))?;
                self.regs.VI = self.regs.VI.wrapping_add(u16::from(vx_idx) + 1);
                next
            }
            LoadRegs { vx_idx } => {
                let values = io.ram.read(usize::from(self.regs.VI), usize::from(vx_idx) + 1)?;
                for (idx, value) in (0u8..).zip(values) {
                    self.regs.set_v(idx, *value);
                }
                next
            }
        };
        Ok(effects)
    }
}

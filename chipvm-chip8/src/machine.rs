use chipvm_core::{DecodeOne, Machine};

use crate::config::Chip8Config;
use crate::cpu::{Chip8CPU, Chip8Display, Chip8RAM, Peripherals};
use crate::decoder::Chip8Decoder;
use crate::error::{Chip8Error, Result};
use crate::font::{FONT, FONT_ADDRESS};
use crate::keypad::{Keypad, KEY_COUNT};
use crate::registers::Chip8Registers;
use crate::stack::Chip8Stack;
use crate::{DISPLAY_HEIGHT, DISPLAY_WIDTH, MAX_PROGRAM_SIZE, PROGRAM_START};

const PIXEL_ON: [u8; 3] = [0xFF, 0xFF, 0xFF];
const PIXEL_OFF: [u8; 3] = [0x00, 0x00, 0x00];

/// What a single successful `step` asks of the surrounding presenter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StepOutcome {
    /// A sprite was drawn; the display buffer changed.
    pub redraw: bool,
    /// The display was cleared by `00E0`.
    pub clear: bool,
    /// The sound timer reached zero on this cycle.
    pub beep_stopped: bool,
    /// `FX0A` is waiting for a key; the PC did not move and timers did not tick.
    pub waiting_for_key: bool,
}

#[derive(Debug)]
pub struct Chip8Machine {
    config: Chip8Config,
    cpu: Chip8CPU,
    ram: Chip8RAM,
    display: Chip8Display,
    keypad: Keypad,
    decoder: Chip8Decoder,
}

impl Default for Chip8Machine {
    fn default() -> Self {
        Self::new(Chip8Config::default())
    }
}

impl Chip8Machine {
    pub fn new(config: Chip8Config) -> Chip8Machine {
        let mut machine = Chip8Machine {
            config,
            cpu: Chip8CPU::new(config.seed),
            ram: Chip8RAM::new(),
            display: Chip8Display::new(),
            keypad: Keypad::new(),
            decoder: Chip8Decoder {},
        };
        machine.reset();
        machine
    }

    pub fn config(&self) -> &Chip8Config {
        &self.config
    }

    /// Returns every piece of state to power-on values and reinstalls the
    /// font glyphs at the bottom of memory.
    pub fn reset(&mut self) {
        tracing::debug!(config = ?self.config, "resetting CHIP-8 machine");
        self.cpu.reset(self.config.seed);
        self.ram.clear();
        let font_start = usize::from(FONT_ADDRESS);
        if let Err(err) = self.ram.write(font_start, &FONT) {
            // Only reachable if the font table outgrows memory.
            tracing::error!(error = %err, "failed to install font");
        }
        self.display.clear();
        self.keypad.release_all();
    }

    /// Copies `program` to the start of program space. Registers, stack and
    /// display are left as they are.
    pub fn load_program(&mut self, program: &[u8]) -> Result<()> {
        if program.len() > MAX_PROGRAM_SIZE {
            return Err(Chip8Error::ProgramTooLarge {
                length: program.len(),
                capacity: MAX_PROGRAM_SIZE,
            });
        }
        self.ram.write(usize::from(PROGRAM_START), program)?;
        tracing::debug!(
            length = program.len(),
            address = format_args!("0x{:04X}", PROGRAM_START),
            "loaded program"
        );
        Ok(())
    }

    /// Runs one fetch, decode, execute and timer cycle.
    pub fn step(&mut self) -> Result<StepOutcome> {
        let pc = self.cpu.regs().PC;
        let word = self.ram.read(usize::from(pc), 2)?;
        let opcode = u16::from_be_bytes([word[0], word[1]]);
        let ins = match self.decoder.decode_one(word) {
            Ok(ins) => ins,
            Err(err) => {
                tracing::warn!(
                    address = format_args!("0x{:04X}", pc),
                    opcode = format_args!("0x{:04X}", opcode),
                    error = %err,
                    "unknown opcode"
                );
                return Err(Chip8Error::UnknownOpcode {
                    address: pc,
                    opcode,
                });
            }
        };
        tracing::trace!(
            address = format_args!("0x{:04X}", pc),
            opcode = format_args!("0x{:04X}", opcode),
            "{}",
            ins
        );

        let mut io = Peripherals {
            ram: &mut self.ram,
            display: &mut self.display,
            keypad: &self.keypad,
            sprite_policy: self.config.sprite_policy,
        };
        let effects = self.cpu.execute(ins, &mut io).map_err(|err| {
            tracing::warn!(
                address = format_args!("0x{:04X}", pc),
                opcode = format_args!("0x{:04X}", opcode),
                instruction = %ins,
                error = %err,
                "instruction failed"
            );
            err
        })?;

        let mut outcome = StepOutcome {
            redraw: effects.redraw,
            clear: effects.clear,
            waiting_for_key: effects.waiting_for_key,
            beep_stopped: false,
        };
        if effects.waiting_for_key {
            return Ok(outcome);
        }
        if self.cpu.regs_mut().tick_timers() {
            tracing::info!("beep stopped");
            outcome.beep_stopped = true;
        }
        Ok(outcome)
    }

    /// Moves past the word at the PC without executing it. Runners use this
    /// to continue after a faulting instruction.
    pub fn skip(&mut self) {
        let regs = self.cpu.regs_mut();
        regs.PC = regs.PC.wrapping_add(2);
        tracing::debug!(address = format_args!("0x{:04X}", regs.PC), "skipped");
    }

    pub fn program_counter(&self) -> u16 {
        self.cpu.regs().PC
    }

    pub fn registers(&self) -> &Chip8Registers {
        self.cpu.regs()
    }

    pub fn registers_mut(&mut self) -> &mut Chip8Registers {
        self.cpu.regs_mut()
    }

    pub fn stack(&self) -> &Chip8Stack {
        self.cpu.stack()
    }

    pub fn memory(&self) -> &[u8] {
        self.ram.as_slice()
    }

    pub fn display(&self) -> &Chip8Display {
        &self.display
    }

    pub fn keypad(&self) -> &Keypad {
        &self.keypad
    }

    pub fn keypad_mut(&mut self) -> &mut Keypad {
        &mut self.keypad
    }

    /// Replaces the whole key latch, index `n` being hex key `n`.
    pub fn set_keys(&mut self, keys: [bool; KEY_COUNT]) {
        self.keypad.set(keys);
    }
}

impl Machine for Chip8Machine {
    type Outcome = StepOutcome;
    type Error = Chip8Error;

    fn reset(&mut self) {
        Chip8Machine::reset(self)
    }

    fn load(&mut self, program: &[u8]) -> Result<()> {
        self.load_program(program)
    }

    fn step(&mut self) -> Result<StepOutcome> {
        Chip8Machine::step(self)
    }

    fn frame(&self) -> (usize, usize, Vec<u8>) {
        (
            DISPLAY_WIDTH,
            DISPLAY_HEIGHT,
            self.display.to_rgb(PIXEL_ON, PIXEL_OFF),
        )
    }
}

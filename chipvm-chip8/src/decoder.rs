use chipvm_core::cpu::decoder::{DecodeError, DecodeOne, Result};
use chipvm_core::{Instruction, Opcode16};

use crate::instructions::Chip8Instruction;

#[derive(Clone, Copy, Debug, Default)]
pub struct Chip8Decoder {}

impl DecodeOne for Chip8Decoder {
    type Instruction = Chip8Instruction;

    fn decode_one(&self, bytes: &[u8]) -> Result<Self::Instruction> {
        use Chip8Instruction::*;

        let opcode = Opcode16::from_be_bytes(bytes)?;
        let family = opcode.try_get_nybble(3)?;
        let vx_idx = opcode.try_get_nybble(2)?;
        let vy_idx = opcode.try_get_nybble(1)?;
        let n = opcode.try_get_nybble(0)?;
        let kk = opcode.try_get_byte(0)?;
        let addr = opcode.value() & 0x0FFF;

        let ins = match (family, kk, n) {
            (0x0, _, _) => match opcode.value() {
                0x00E0 => ClearScreen,
                0x00EE => Return,
                _ => ExecuteMachineSubroutine { addr },
            },
            (0x1, _, _) => Jump { addr },
            (0x2, _, _) => Call { addr },
            (0x3, _, _) => SkipIfEqual { vx_idx, value: kk },
            (0x4, _, _) => SkipIfNotEqual { vx_idx, value: kk },
            (0x5, _, 0x0) => SkipIfRegEqual { vx_idx, vy_idx },
            (0x6, _, _) => SetReg { vx_idx, value: kk },
            (0x7, _, _) => AddReg { vx_idx, value: kk },
            (0x8, _, 0x0) => SetRegReg { vx_idx, vy_idx },
            (0x8, _, 0x1) => OrRegReg { vx_idx, vy_idx },
            (0x8, _, 0x2) => AndRegReg { vx_idx, vy_idx },
            (0x8, _, 0x3) => XorRegReg { vx_idx, vy_idx },
            (0x8, _, 0x4) => AddRegReg { vx_idx, vy_idx },
            (0x8, _, 0x5) => SubRegReg { vx_idx, vy_idx },
            (0x8, _, 0x6) => ShiftRightReg { vx_idx, vy_idx },
            (0x8, _, 0x7) => SubRegRegReverse { vx_idx, vy_idx },
            (0x8, _, 0xE) => ShiftLeftReg { vx_idx, vy_idx },
            (0x9, _, 0x0) => SkipIfRegNotEqual { vx_idx, vy_idx },
            (0xA, _, _) => SetVI { addr },
            (0xB, _, _) => JumpPlusV0 { addr },
            (0xC, _, _) => Random { vx_idx, mask: kk },
            (0xD, _, _) => Draw {
                vx_idx,
                vy_idx,
                num_bytes: n,
            },
            (0xE, 0x9E, _) => SkipIfKeyPressed { vx_idx },
            (0xE, 0xA1, _) => SkipIfKeyNotPressed { vx_idx },
            (0xF, 0x07, _) => GetDelayTimer { vx_idx },
            (0xF, 0x0A, _) => WaitForKey { vx_idx },
            (0xF, 0x15, _) => SetDelayTimer { vx_idx },
            (0xF, 0x18, _) => SetSoundTimer { vx_idx },
            (0xF, 0x1E, _) => AddRegVI { vx_idx },
            (0xF, 0x29, _) => SetVIDigit { vx_idx },
            (0xF, 0x33, _) => StoreBCD { vx_idx },
            (0xF, 0x55, _) => StoreRegs { vx_idx },
            (0xF, 0x65, _) => LoadRegs { vx_idx },
            _ => Err(DecodeError::InvalidOpcode(opcode.value() as u64))?,
        };
        Ok(ins)
    }
}

/// Walks `bytes` two at a time, decoding each word as if it were loaded at
/// `base`. A trailing odd byte is reported as a decode error.
pub fn disassemble(
    bytes: &[u8],
    base: u16,
) -> impl Iterator<Item = (u16, Result<Chip8Instruction>)> + '_ {
    let decoder = Chip8Decoder {};
    let mut offset = 0;
    std::iter::from_fn(move || {
        let rest = bytes.get(offset..).filter(|rest| !rest.is_empty())?;
        let address = base.wrapping_add(offset as u16);
        let decoded = decoder.decode_one(rest);
        offset += decoded.as_ref().map_or(2, |ins| ins.len_bytes());
        Some((address, decoded))
    })
}

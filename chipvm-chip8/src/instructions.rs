use std::fmt;

use chipvm_core::Instruction;

/// One decoded CHIP-8 instruction. Register operands are register indices
/// (0x0 - 0xF), addresses are 12-bit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Chip8Instruction {
    ClearScreen, // 0x00E0
    Return,      // 0x00EE
    ExecuteMachineSubroutine {
        addr: u16,
    }, // 0x0NNN except 0x00E0 and 0x00EE
    Jump {
        addr: u16,
    }, // 0x1NNN
    Call {
        addr: u16,
    }, // 0x2NNN
    SkipIfEqual {
        vx_idx: u8,
        value: u8,
    }, // 0x3XNN
    SkipIfNotEqual {
        vx_idx: u8,
        value: u8,
    }, // 0x4XNN
    SkipIfRegEqual {
        vx_idx: u8,
        vy_idx: u8,
    }, // 0x5XY0
    SetReg {
        vx_idx: u8,
        value: u8,
    }, // 0x6XNN
    AddReg {
        vx_idx: u8,
        value: u8,
    }, // 0x7XNN
    SetRegReg {
        vx_idx: u8,
        vy_idx: u8,
    }, // 0x8XY0
    OrRegReg {
        vx_idx: u8,
        vy_idx: u8,
    }, // 0x8XY1
    AndRegReg {
        vx_idx: u8,
        vy_idx: u8,
    }, // 0x8XY2
    XorRegReg {
        vx_idx: u8,
        vy_idx: u8,
    }, // 0x8XY3
    AddRegReg {
        vx_idx: u8,
        vy_idx: u8,
    }, // 0x8XY4
    SubRegReg {
        vx_idx: u8,
        vy_idx: u8,
    }, // 0x8XY5
    ShiftRightReg {
        vx_idx: u8,
        vy_idx: u8,
    }, // 0x8XY6
    SubRegRegReverse {
        vx_idx: u8,
        vy_idx: u8,
    }, // 0x8XY7
    ShiftLeftReg {
        vx_idx: u8,
        vy_idx: u8,
    }, // 0x8XYE
    SkipIfRegNotEqual {
        vx_idx: u8,
        vy_idx: u8,
    }, // 0x9XY0
    SetVI {
        addr: u16,
    }, // 0xANNN
    JumpPlusV0 {
        addr: u16,
    }, // 0xBNNN
    Random {
        vx_idx: u8,
        mask: u8,
    }, // 0xCXNN
    Draw {
        vx_idx: u8,
        vy_idx: u8,
        num_bytes: u8,
    }, // 0xDXYN
    SkipIfKeyPressed {
        vx_idx: u8,
    }, // 0xEX9E
    SkipIfKeyNotPressed {
        vx_idx: u8,
    }, // 0xEXA1
    GetDelayTimer {
        vx_idx: u8,
    }, // 0xFX07
    WaitForKey {
        vx_idx: u8,
    }, // 0xFX0A
    SetDelayTimer {
        vx_idx: u8,
    }, // 0xFX15
    SetSoundTimer {
        vx_idx: u8,
    }, // 0xFX18
    AddRegVI {
        vx_idx: u8,
    }, // 0xFX1E
    SetVIDigit {
        vx_idx: u8,
    }, // 0xFX29
    StoreBCD {
        vx_idx: u8,
    }, // 0xFX33
    StoreRegs {
        vx_idx: u8,
    }, // 0xFX55
    LoadRegs {
        vx_idx: u8,
    }, // 0xFX65
}

fn xnn(family: u16, x: u8, nn: u8) -> u16 {
    family << 12 | (x as u16 & 0xF) << 8 | nn as u16
}

fn xyn(family: u16, x: u8, y: u8, n: u8) -> u16 {
    family << 12 | (x as u16 & 0xF) << 8 | (y as u16 & 0xF) << 4 | (n as u16 & 0xF)
}

impl Chip8Instruction {
    /// The instruction word this instruction decodes from.
    pub fn opcode(&self) -> u16 {
        use Chip8Instruction::*;

        match *self {
            ClearScreen => 0x00E0,
            Return => 0x00EE,
            ExecuteMachineSubroutine { addr } => addr & 0x0FFF,
            Jump { addr } => 0x1000 | (addr & 0x0FFF),
            Call { addr } => 0x2000 | (addr & 0x0FFF),
            SkipIfEqual { vx_idx, value } => xnn(0x3, vx_idx, value),
            SkipIfNotEqual { vx_idx, value } => xnn(0x4, vx_idx, value),
            SkipIfRegEqual { vx_idx, vy_idx } => xyn(0x5, vx_idx, vy_idx, 0x0),
            SetReg { vx_idx, value } => xnn(0x6, vx_idx, value),
            AddReg { vx_idx, value } => xnn(0x7, vx_idx, value),
            SetRegReg { vx_idx, vy_idx } => xyn(0x8, vx_idx, vy_idx, 0x0),
            OrRegReg { vx_idx, vy_idx } => xyn(0x8, vx_idx, vy_idx, 0x1),
            AndRegReg { vx_idx, vy_idx } => xyn(0x8, vx_idx, vy_idx, 0x2),
            XorRegReg { vx_idx, vy_idx } => xyn(0x8, vx_idx, vy_idx, 0x3),
            AddRegReg { vx_idx, vy_idx } => xyn(0x8, vx_idx, vy_idx, 0x4),
            SubRegReg { vx_idx, vy_idx } => xyn(0x8, vx_idx, vy_idx, 0x5),
            ShiftRightReg { vx_idx, vy_idx } => xyn(0x8, vx_idx, vy_idx, 0x6),
            SubRegRegReverse { vx_idx, vy_idx } => xyn(0x8, vx_idx, vy_idx, 0x7),
            ShiftLeftReg { vx_idx, vy_idx } => xyn(0x8, vx_idx, vy_idx, 0xE),
            SkipIfRegNotEqual { vx_idx, vy_idx } => xyn(0x9, vx_idx, vy_idx, 0x0),
            SetVI { addr } => 0xA000 | (addr & 0x0FFF),
            JumpPlusV0 { addr } => 0xB000 | (addr & 0x0FFF),
            Random { vx_idx, mask } => xnn(0xC, vx_idx, mask),
            Draw {
                vx_idx,
                vy_idx,
                num_bytes,
            } => xyn(0xD, vx_idx, vy_idx, num_bytes),
            SkipIfKeyPressed { vx_idx } => xnn(0xE, vx_idx, 0x9E),
            SkipIfKeyNotPressed { vx_idx } => xnn(0xE, vx_idx, 0xA1),
            GetDelayTimer { vx_idx } => xnn(0xF, vx_idx, 0x07),
            WaitForKey { vx_idx } => xnn(0xF, vx_idx, 0x0A),
            SetDelayTimer { vx_idx } => xnn(0xF, vx_idx, 0x15),
            SetSoundTimer { vx_idx } => xnn(0xF, vx_idx, 0x18),
            AddRegVI { vx_idx } => xnn(0xF, vx_idx, 0x1E),
            SetVIDigit { vx_idx } => xnn(0xF, vx_idx, 0x29),
            StoreBCD { vx_idx } => xnn(0xF, vx_idx, 0x33),
            StoreRegs { vx_idx } => xnn(0xF, vx_idx, 0x55),
            LoadRegs { vx_idx } => xnn(0xF, vx_idx, 0x65),
        }
    }
}

/// Assembles `instructions` into a big-endian program image.
pub fn assemble(instructions: &[Chip8Instruction]) -> Vec<u8> {
    instructions
        .iter()
        .flat_map(|ins| ins.opcode().to_be_bytes())
        .collect()
}

impl Instruction for Chip8Instruction {
    fn len_bytes(&self) -> usize {
        2
    }
}

impl fmt::Display for Chip8Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Chip8Instruction::*;

        match *self {
            ClearScreen => write!(f, "CLS"),
            Return => write!(f, "RET"),
            ExecuteMachineSubroutine { addr } => write!(f, "SYS 0x{:03X}", addr),
            Jump { addr } => write!(f, "JP 0x{:03X}", addr),
            Call { addr } => write!(f, "CALL 0x{:03X}", addr),
            SkipIfEqual { vx_idx, value } => write!(f, "SE V{:X}, 0x{:02X}", vx_idx, value),
            SkipIfNotEqual { vx_idx, value } => write!(f, "SNE V{:X}, 0x{:02X}", vx_idx, value),
            SkipIfRegEqual { vx_idx, vy_idx } => write!(f, "SE V{:X}, V{:X}", vx_idx, vy_idx),
            SetReg { vx_idx, value } => write!(f, "LD V{:X}, 0x{:02X}", vx_idx, value),
            AddReg { vx_idx, value } => write!(f, "ADD V{:X}, 0x{:02X}", vx_idx, value),
            SetRegReg { vx_idx, vy_idx } => write!(f, "LD V{:X}, V{:X}", vx_idx, vy_idx),
            OrRegReg { vx_idx, vy_idx } => write!(f, "OR V{:X}, V{:X}", vx_idx, vy_idx),
            AndRegReg { vx_idx, vy_idx } => write!(f, "AND V{:X}, V{:X}", vx_idx, vy_idx),
            XorRegReg { vx_idx, vy_idx } => write!(f, "XOR V{:X}, V{:X}", vx_idx, vy_idx),
            AddRegReg { vx_idx, vy_idx } => write!(f, "ADD V{:X}, V{:X}", vx_idx, vy_idx),
            SubRegReg { vx_idx, vy_idx } => write!(f, "SUB V{:X}, V{:X}", vx_idx, vy_idx),
            ShiftRightReg { vx_idx, vy_idx } => write!(f, "SHR V{:X}, V{:X}", vx_idx, vy_idx),
            SubRegRegReverse { vx_idx, vy_idx } => write!(f, "SUBN V{:X}, V{:X}", vx_idx, vy_idx),
            ShiftLeftReg { vx_idx, vy_idx } => write!(f, "SHL V{:X}, V{:X}", vx_idx, vy_idx),
            SkipIfRegNotEqual { vx_idx, vy_idx } => write!(f, "SNE V{:X}, V{:X}", vx_idx, vy_idx),
            SetVI { addr } => write!(f, "LD VI, 0x{:03X}", addr),
            JumpPlusV0 { addr } => write!(f, "JP V0, 0x{:03X}", addr),
            Random { vx_idx, mask } => write!(f, "RND V{:X}, 0x{:02X}", vx_idx, mask),
            Draw {
                vx_idx,
                vy_idx,
                num_bytes,
            } => write!(f, "DRW V{:X}, V{:X}, 0x{:X}", vx_idx, vy_idx, num_bytes),
            SkipIfKeyPressed { vx_idx } => write!(f, "SKP V{:X}", vx_idx),
            SkipIfKeyNotPressed { vx_idx } => write!(f, "SKNP V{:X}", vx_idx),
            GetDelayTimer { vx_idx } => write!(f, "LD V{:X}, DT", vx_idx),
            WaitForKey { vx_idx } => write!(f, "LD V{:X}, KEY", vx_idx),
            SetDelayTimer { vx_idx } => write!(f, "LD DT, V{:X}", vx_idx),
            SetSoundTimer { vx_idx } => write!(f, "LD ST, V{:X}", vx_idx),
            AddRegVI { vx_idx } => write!(f, "ADD VI, V{:X}", vx_idx),
            SetVIDigit { vx_idx } => write!(f, "LD VI, DIG[V{:X}]", vx_idx),
            StoreBCD { vx_idx } => write!(f, "LD [VI], BCD(V{:X})", vx_idx),
            StoreRegs { vx_idx } => write!(f, "LD [VI..VI+{}], V[0..{:X}]", vx_idx, vx_idx),
            LoadRegs { vx_idx } => write!(f, "LD V[0..{:X}], [VI..VI+{}]", vx_idx, vx_idx),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mnemonics() {
        let cases = [
            (Chip8Instruction::ClearScreen, "CLS"),
            (Chip8Instruction::Jump { addr: 0x234 }, "JP 0x234"),
            (
                Chip8Instruction::SetReg {
                    vx_idx: 0xA,
                    value: 0x2A,
                },
                "LD VA, 0x2A",
            ),
            (
                Chip8Instruction::Draw {
                    vx_idx: 0,
                    vy_idx: 1,
                    num_bytes: 5,
                },
                "DRW V0, V1, 0x5",
            ),
            (Chip8Instruction::StoreBCD { vx_idx: 0xA }, "LD [VI], BCD(VA)"),
            (
                Chip8Instruction::LoadRegs { vx_idx: 3 },
                "LD V[0..3], [VI..VI+3]",
            ),
        ];
        for (instruction, expected) in cases {
            assert_eq!(instruction.to_string(), expected);
        }
    }

    #[test]
    fn assemble_is_big_endian() {
        let program = assemble(&[
            Chip8Instruction::SetReg {
                vx_idx: 0xA,
                value: 0x02,
            },
            Chip8Instruction::StoreBCD { vx_idx: 0xA },
        ]);
        assert_eq!(program, vec![0x6A, 0x02, 0xFA, 0x33]);
    }

    #[test]
    fn operand_fields_are_masked() {
        let jump = Chip8Instruction::Jump { addr: 0xF123 };
        assert_eq!(jump.opcode(), 0x1123);
        let draw = Chip8Instruction::Draw {
            vx_idx: 0x12,
            vy_idx: 0x3,
            num_bytes: 0x1F,
        };
        assert_eq!(draw.opcode(), 0xD23F);
    }
}

use std::fmt;

use crate::error::DecodeError;

#[inline(always)]
fn nibble_h(b: u8) -> u8 {
    (b >> 4) & 0xF
}

#[inline(always)]
fn nibble_l(b: u8) -> u8 {
    b & 0xF
}

#[inline(always)]
fn nnn(a: u8, b: u8) -> u16 {
    (((a as u16) << 8) | (b as u16)) & 0xFFF
}

/// A decoded chip-8 instruction.
///
/// Register operands are indexes into V0 - VF, addresses are already masked
/// to 12 bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    /// 00E0
    ClearScreen,
    /// 00EE
    Return,
    /// 1NNN
    Jump(u16),
    /// 2NNN
    Call(u16),
    /// 3XNN
    SkipEqByte(usize, u8),
    /// 4XNN
    SkipNeByte(usize, u8),
    /// 5XY0
    SkipEqReg(usize, usize),
    /// 6XNN
    LoadByte(usize, u8),
    /// 7XNN
    AddByte(usize, u8),
    /// 8XY0
    LoadReg(usize, usize),
    /// 8XY1
    Or(usize, usize),
    /// 8XY2
    And(usize, usize),
    /// 8XY3
    Xor(usize, usize),
    /// 8XY4
    AddReg(usize, usize),
    /// 8XY5
    SubReg(usize, usize),
    /// 8XY6
    ShiftRight(usize, usize),
    /// 8XY7
    SubNeg(usize, usize),
    /// 8XYE
    ShiftLeft(usize, usize),
    /// 9XY0
    SkipNeReg(usize, usize),
    /// ANNN
    LoadIndex(u16),
    /// BNNN
    JumpOffset(u16),
    /// CXNN
    Random(usize, u8),
    /// DXYN
    Draw(usize, usize, u8),
    /// EX9E
    SkipKeyPressed(usize),
    /// EXA1
    SkipKeyNotPressed(usize),
    /// FX07
    LoadDelay(usize),
    /// FX0A
    WaitKey(usize),
    /// FX15
    SetDelay(usize),
    /// FX18
    SetSound(usize),
    /// FX1E
    AddIndex(usize),
    /// FX29; I points at the glyph for the low nibble of VX, inside the
    /// font area at 0x50 (`0x50 + (VX & 0xF) * 5`)
    LoadFont(usize),
    /// FX33
    StoreBcd(usize),
    /// FX55
    StoreRegisters(usize),
    /// FX65
    LoadRegisters(usize),
}

impl Instruction {
    /// Decode a 16-bit instruction word.
    ///
    /// Every word either maps to an instruction or to
    /// [`DecodeError::UnknownOpcode`]; machine code subroutines (0NNN) are not
    /// supported and fall in the second group.
    pub fn decode(word: u16) -> Result<Self, DecodeError> {
        let [a, b] = word.to_be_bytes();
        let x = nibble_l(a) as usize;
        let y = nibble_h(b) as usize;
        let n = nibble_l(b);

        let instruction = match nibble_h(a) {
            0x0 if word == 0x00E0 => Instruction::ClearScreen,
            0x0 if word == 0x00EE => Instruction::Return,
            0x1 => Instruction::Jump(nnn(a, b)),
            0x2 => Instruction::Call(nnn(a, b)),
            0x3 => Instruction::SkipEqByte(x, b),
            0x4 => Instruction::SkipNeByte(x, b),
            0x5 if n == 0x0 => Instruction::SkipEqReg(x, y),
            0x6 => Instruction::LoadByte(x, b),
            0x7 => Instruction::AddByte(x, b),
            0x8 => match n {
                0x0 => Instruction::LoadReg(x, y),
                0x1 => Instruction::Or(x, y),
                0x2 => Instruction::And(x, y),
                0x3 => Instruction::Xor(x, y),
                0x4 => Instruction::AddReg(x, y),
                0x5 => Instruction::SubReg(x, y),
                0x6 => Instruction::ShiftRight(x, y),
                0x7 => Instruction::SubNeg(x, y),
                0xE => Instruction::ShiftLeft(x, y),
                _ => return Err(DecodeError::UnknownOpcode(word)),
            },
            0x9 if n == 0x0 => Instruction::SkipNeReg(x, y),
            0xA => Instruction::LoadIndex(nnn(a, b)),
            0xB => Instruction::JumpOffset(nnn(a, b)),
            0xC => Instruction::Random(x, b),
            0xD => Instruction::Draw(x, y, n),
            0xE if b == 0x9E => Instruction::SkipKeyPressed(x),
            0xE if b == 0xA1 => Instruction::SkipKeyNotPressed(x),
            0xF if b == 0x07 => Instruction::LoadDelay(x),
            0xF if b == 0x0A => Instruction::WaitKey(x),
            0xF if b == 0x15 => Instruction::SetDelay(x),
            0xF if b == 0x18 => Instruction::SetSound(x),
            0xF if b == 0x1E => Instruction::AddIndex(x),
            0xF if b == 0x29 => Instruction::LoadFont(x),
            0xF if b == 0x33 => Instruction::StoreBcd(x),
            0xF if b == 0x55 => Instruction::StoreRegisters(x),
            0xF if b == 0x65 => Instruction::LoadRegisters(x),
            _ => return Err(DecodeError::UnknownOpcode(word)),
        };

        Ok(instruction)
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Instruction::ClearScreen => write!(f, "CLS"),
            Instruction::Return => write!(f, "RET"),
            Instruction::Jump(addr) => write!(f, "JP {:#05X}", addr),
            Instruction::Call(addr) => write!(f, "CALL {:#05X}", addr),
            Instruction::SkipEqByte(x, nn) => write!(f, "SE V{:X}, {:#04X}", x, nn),
            Instruction::SkipNeByte(x, nn) => write!(f, "SNE V{:X}, {:#04X}", x, nn),
            Instruction::SkipEqReg(x, y) => write!(f, "SE V{:X}, V{:X}", x, y),
            Instruction::LoadByte(x, nn) => write!(f, "LD V{:X}, {:#04X}", x, nn),
            Instruction::AddByte(x, nn) => write!(f, "ADD V{:X}, {:#04X}", x, nn),
            Instruction::LoadReg(x, y) => write!(f, "LD V{:X}, V{:X}", x, y),
            Instruction::Or(x, y) => write!(f, "OR V{:X}, V{:X}", x, y),
            Instruction::And(x, y) => write!(f, "AND V{:X}, V{:X}", x, y),
            Instruction::Xor(x, y) => write!(f, "XOR V{:X}, V{:X}", x, y),
            Instruction::AddReg(x, y) => write!(f, "ADD V{:X}, V{:X}", x, y),
            Instruction::SubReg(x, y) => write!(f, "SUB V{:X}, V{:X}", x, y),
            Instruction::ShiftRight(x, y) => write!(f, "SHR V{:X}, V{:X}", x, y),
            Instruction::SubNeg(x, y) => write!(f, "SUBN V{:X}, V{:X}", x, y),
            Instruction::ShiftLeft(x, y) => write!(f, "SHL V{:X}, V{:X}", x, y),
            Instruction::SkipNeReg(x, y) => write!(f, "SNE V{:X}, V{:X}", x, y),
            Instruction::LoadIndex(addr) => write!(f, "LD I, {:#05X}", addr),
            Instruction::JumpOffset(addr) => write!(f, "JP V0, {:#05X}", addr),
            Instruction::Random(x, nn) => write!(f, "RND V{:X}, {:#04X}", x, nn),
            Instruction::Draw(x, y, n) => write!(f, "DRW V{:X}, V{:X}, {}", x, y, n),
            Instruction::SkipKeyPressed(x) => write!(f, "SKP V{:X}", x),
            Instruction::SkipKeyNotPressed(x) => write!(f, "SKNP V{:X}", x),
            Instruction::LoadDelay(x) => write!(f, "LD V{:X}, DT", x),
            Instruction::WaitKey(x) => write!(f, "LD V{:X}, K", x),
            Instruction::SetDelay(x) => write!(f, "LD DT, V{:X}", x),
            Instruction::SetSound(x) => write!(f, "LD ST, V{:X}", x),
            Instruction::AddIndex(x) => write!(f, "ADD I, V{:X}", x),
            Instruction::LoadFont(x) => write!(f, "LD F, V{:X}", x),
            Instruction::StoreBcd(x) => write!(f, "LD B, V{:X}", x),
            Instruction::StoreRegisters(x) => write!(f, "LD [I], V{:X}", x),
            Instruction::LoadRegisters(x) => write!(f, "LD V{:X}, [I]", x),
        }
    }
}

use std::fmt;

/// One raw 16-bit instruction word and its fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Opcode(pub u16);

impl Opcode {
    pub fn from_bytes(hi: u8, lo: u8) -> Self {
        Opcode(((hi as u16) << 8) | lo as u16)
    }

    /// dispatch selector, bits 12-15
    pub fn group(self) -> u8 {
        (self.0 >> 12) as u8
    }
    pub fn x(self) -> usize {
        ((self.0 >> 8) & 0xF) as usize
    }
    pub fn y(self) -> usize {
        ((self.0 >> 4) & 0xF) as usize
    }
    pub fn n(self) -> u8 {
        (self.0 & 0xF) as u8
    }
    pub fn nn(self) -> u8 {
        (self.0 & 0xFF) as u8
    }
    pub fn nnn(self) -> u16 {
        self.0 & 0x0FFF
    }
}

/// The fixed CHIP-8 instruction set. Anything else decodes to `Unknown`,
/// which executes as a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    ClearScreen,
    Return,
    Jump(u16),
    Call(u16),
    SkipEqImm { x: usize, nn: u8 },
    SkipNeImm { x: usize, nn: u8 },
    SkipEqReg { x: usize, y: usize },
    LoadImm { x: usize, nn: u8 },
    AddImm { x: usize, nn: u8 },
    Alu { op: AluOp, x: usize, y: usize },
    SkipNeReg { x: usize, y: usize },
    LoadIndex(u16),
    JumpOffset(u16),
    Random { x: usize, nn: u8 },
    Draw { x: usize, y: usize, n: u8 },
    SkipKeyDown { x: usize },
    SkipKeyUp { x: usize },
    ReadDelay { x: usize },
    WaitKey { x: usize },
    SetDelay { x: usize },
    SetSound { x: usize },
    AddIndex { x: usize },
    LoadGlyph { x: usize },
    StoreBcd { x: usize },
    StoreRegs { x: usize },
    LoadRegs { x: usize },
    Unknown(u16),
}

/// sub-operations of the 8xyN group
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AluOp {
    Assign,
    Or,
    And,
    Xor,
    Add,
    Sub,
    ShiftRight,
    SubReverse,
    ShiftLeft,
}

impl AluOp {
    fn from_nibble(n: u8) -> Option<Self> {
        Some(match n {
            0x0 => AluOp::Assign,
            0x1 => AluOp::Or,
            0x2 => AluOp::And,
            0x3 => AluOp::Xor,
            0x4 => AluOp::Add,
            0x5 => AluOp::Sub,
            0x6 => AluOp::ShiftRight,
            0x7 => AluOp::SubReverse,
            0xE => AluOp::ShiftLeft,
            _ => return None,
        })
    }

    fn mnemonic(self) -> &'static str {
        match self {
            AluOp::Assign => "LD",
            AluOp::Or => "OR",
            AluOp::And => "AND",
            AluOp::Xor => "XOR",
            AluOp::Add => "ADD",
            AluOp::Sub => "SUB",
            AluOp::ShiftRight => "SHR",
            AluOp::SubReverse => "SUBN",
            AluOp::ShiftLeft => "SHL",
        }
    }
}

impl From<Opcode> for Instruction {
    fn from(op: Opcode) -> Self {
        use Instruction::*;
        let (x, y, n, nn, nnn) = (op.x(), op.y(), op.n(), op.nn(), op.nnn());
        match op.group() {
            0x0 => match op.0 {
                0x00E0 => ClearScreen,
                0x00EE => Return,
                _ => Unknown(op.0),
            },
            0x1 => Jump(nnn),
            0x2 => Call(nnn),
            0x3 => SkipEqImm { x, nn },
            0x4 => SkipNeImm { x, nn },
            // the low nibble of 5xy_ and 9xy_ is not decoded
            0x5 => SkipEqReg { x, y },
            0x6 => LoadImm { x, nn },
            0x7 => AddImm { x, nn },
            0x8 => match AluOp::from_nibble(n) {
                Some(op) => Alu { op, x, y },
                None => Unknown(op.0),
            },
            0x9 => SkipNeReg { x, y },
            0xA => LoadIndex(nnn),
            0xB => JumpOffset(nnn),
            0xC => Random { x, nn },
            0xD => Draw { x, y, n },
            0xE => match nn {
                0x9E => SkipKeyDown { x },
                0xA1 => SkipKeyUp { x },
                _ => Unknown(op.0),
            },
            0xF => match nn {
                0x07 => ReadDelay { x },
                0x0A => WaitKey { x },
                0x15 => SetDelay { x },
                0x18 => SetSound { x },
                0x1E => AddIndex { x },
                0x29 => LoadGlyph { x },
                0x33 => StoreBcd { x },
                0x55 => StoreRegs { x },
                0x65 => LoadRegs { x },
                _ => Unknown(op.0),
            },
            _ => Unknown(op.0),
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Instruction::*;
        match *self {
            ClearScreen => write!(f, "CLS"),
            Return => write!(f, "RET"),
            Jump(a) => write!(f, "JP {:#05x}", a),
            Call(a) => write!(f, "CALL {:#05x}", a),
            SkipEqImm { x, nn } => write!(f, "SE V{:X}, {:#04x}", x, nn),
            SkipNeImm { x, nn } => write!(f, "SNE V{:X}, {:#04x}", x, nn),
            SkipEqReg { x, y } => write!(f, "SE V{:X}, V{:X}", x, y),
            LoadImm { x, nn } => write!(f, "LD V{:X}, {:#04x}", x, nn),
            AddImm { x, nn } => write!(f, "ADD V{:X}, {:#04x}", x, nn),
            Alu { op, x, y } => write!(f, "{} V{:X}, V{:X}", op.mnemonic(), x, y),
            SkipNeReg { x, y } => write!(f, "SNE V{:X}, V{:X}", x, y),
            LoadIndex(a) => write!(f, "LD I, {:#05x}", a),
            JumpOffset(a) => write!(f, "JP V0, {:#05x}", a),
            Random { x, nn } => write!(f, "RND V{:X}, {:#04x}", x, nn),
            Draw { x, y, n } => write!(f, "DRW V{:X}, V{:X}, {}", x, y, n),
            SkipKeyDown { x } => write!(f, "SKP V{:X}", x),
            SkipKeyUp { x } => write!(f, "SKNP V{:X}", x),
            ReadDelay { x } => write!(f, "LD V{:X}, DT", x),
            WaitKey { x } => write!(f, "LD V{:X}, K", x),
            SetDelay { x } => write!(f, "LD DT, V{:X}", x),
            SetSound { x } => write!(f, "LD ST, V{:X}", x),
            AddIndex { x } => write!(f, "ADD I, V{:X}", x),
            LoadGlyph { x } => write!(f, "LD F, V{:X}", x),
            StoreBcd { x } => write!(f, "LD B, V{:X}", x),
            StoreRegs { x } => write!(f, "LD [I], V{:X}", x),
            LoadRegs { x } => write!(f, "LD V{:X}, [I]", x),
            Unknown(w) => write!(f, "DW {:#06x}", w),
        }
    }
}

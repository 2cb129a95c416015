use serde::{Deserialize, Serialize};

/// Every instruction is exactly this many bytes wide.
pub const INSN_WIDTH: u32 = 4;

/// Register names indexed by selector nibble.
pub const REG_NAMES: [&str; 16] = [
    "r0", "r1", "r2", "r3", "r4", "r5", "r6", "r7", "r8", "r9", "ra", "rb", "rc", "rd", "re", "rf",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cond {
    Always,
    Carry,
    Parity,
    Zero,
    Sign,
    NoCarry,
    NoParity,
    NoZero,
    NoSign,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Op {
    Nop,
    // logic (0x01)
    And,
    Or,
    Not,
    Xor,
    Shl,
    Shr,
    // arithmetic (0x02)
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Cmp,
    // load (0x03) / store (0x06)
    Ldr,
    Ldm,
    Ldb,
    Stm,
    Stb,
    // immediates
    Ldu,
    Ldl,
    Ori,
    Jump(Cond),
    // reserved, never implemented
    Call,
    Ret,
    Hlt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decoded {
    pub op: Op,
    pub opcode: u8,
    pub operand: u16, // sub-op selector or immediate
    pub to: u8,
    pub from: u8,
}

impl Decoded {
    pub fn to_name(&self) -> &'static str {
        REG_NAMES[self.to as usize]
    }

    pub fn from_name(&self) -> &'static str {
        REG_NAMES[self.from as usize]
    }
}

pub trait Decoder {
    fn decode(&self, raw32: u32) -> Option<Decoded>;
}

/// Splits a little-endian instruction word into opcode, operand and selector fields.
pub fn split_fields(raw32: u32) -> (u8, u16, u8) {
    let opcode = (raw32 & 0xFF) as u8;
    let operand = ((raw32 >> 8) & 0xFFFF) as u16;
    let sel = (raw32 >> 24) as u8;
    (opcode, operand, sel)
}

//! The System 3201 instruction table.
//!
//! Both the decoder and the assembler resolve instructions through [`TABLE`],
//! so an encoding can never disagree between the two sides.

use crate::decoder::{Cond, Op};

pub const OPC_NOP: u8 = 0x00;
pub const OPC_LOGIC: u8 = 0x01;
pub const OPC_ARITH: u8 = 0x02;
pub const OPC_LOAD: u8 = 0x03;
pub const OPC_LDU: u8 = 0x04;
pub const OPC_LDL: u8 = 0x05;
pub const OPC_STORE: u8 = 0x06;
pub const OPC_ORI: u8 = 0x07;
pub const OPC_JUMP: u8 = 0x08;
pub const OPC_CALL: u8 = 0x09;
pub const OPC_RET: u8 = 0x0A;
pub const OPC_HLT: u8 = 0xFF;

/// Argument grammar of a mnemonic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddrMode {
    None,
    OneReg,
    TwoReg,
    RegImm,
    /// Decodes, but the assembler refuses it.
    Reserved,
}

#[derive(Debug, Clone, Copy)]
pub struct InstrDesc {
    pub op: Op,
    pub mnemonic: &'static str,
    pub opcode: u8,
    /// `None` when the operand field carries an immediate or is ignored.
    pub sub: Option<u16>,
    pub mode: AddrMode,
}

const fn desc(op: Op, mnemonic: &'static str, opcode: u8, sub: Option<u16>, mode: AddrMode) -> InstrDesc {
    InstrDesc { op, mnemonic, opcode, sub, mode }
}

pub const TABLE: &[InstrDesc] = &[
    desc(Op::Nop, "nop", OPC_NOP, None, AddrMode::None),
    desc(Op::And, "and", OPC_LOGIC, Some(0), AddrMode::TwoReg),
    desc(Op::Or, "or", OPC_LOGIC, Some(1), AddrMode::TwoReg),
    desc(Op::Not, "not", OPC_LOGIC, Some(2), AddrMode::OneReg),
    desc(Op::Xor, "xor", OPC_LOGIC, Some(3), AddrMode::TwoReg),
    desc(Op::Shl, "shl", OPC_LOGIC, Some(4), AddrMode::OneReg),
    desc(Op::Shr, "shr", OPC_LOGIC, Some(5), AddrMode::OneReg),
    desc(Op::Add, "add", OPC_ARITH, Some(0), AddrMode::TwoReg),
    desc(Op::Sub, "sub", OPC_ARITH, Some(1), AddrMode::TwoReg),
    desc(Op::Mul, "mul", OPC_ARITH, Some(2), AddrMode::TwoReg),
    desc(Op::Div, "div", OPC_ARITH, Some(3), AddrMode::TwoReg),
    desc(Op::Mod, "mod", OPC_ARITH, Some(4), AddrMode::TwoReg),
    desc(Op::Cmp, "cmp", OPC_ARITH, Some(5), AddrMode::TwoReg),
    // load and store share one sub-op numbering; the opcode picks the direction
    desc(Op::Ldr, "ldr", OPC_LOAD, Some(0), AddrMode::TwoReg),
    desc(Op::Ldm, "ldm", OPC_LOAD, Some(1), AddrMode::TwoReg),
    desc(Op::Ldb, "ldb", OPC_LOAD, Some(2), AddrMode::TwoReg),
    desc(Op::Stm, "stm", OPC_STORE, Some(3), AddrMode::TwoReg),
    desc(Op::Stb, "stb", OPC_STORE, Some(4), AddrMode::TwoReg),
    desc(Op::Ldu, "ldu", OPC_LDU, None, AddrMode::RegImm),
    desc(Op::Ldl, "ldl", OPC_LDL, None, AddrMode::RegImm),
    desc(Op::Ori, "ori", OPC_ORI, None, AddrMode::RegImm),
    desc(Op::Jump(Cond::Always), "j", OPC_JUMP, Some(0), AddrMode::OneReg),
    desc(Op::Jump(Cond::Carry), "jc", OPC_JUMP, Some(1), AddrMode::OneReg),
    desc(Op::Jump(Cond::Parity), "jp", OPC_JUMP, Some(2), AddrMode::OneReg),
    desc(Op::Jump(Cond::Zero), "jz", OPC_JUMP, Some(3), AddrMode::OneReg),
    desc(Op::Jump(Cond::Sign), "js", OPC_JUMP, Some(4), AddrMode::OneReg),
    desc(Op::Jump(Cond::NoCarry), "jnc", OPC_JUMP, Some(5), AddrMode::OneReg),
    desc(Op::Jump(Cond::NoParity), "jnp", OPC_JUMP, Some(6), AddrMode::OneReg),
    desc(Op::Jump(Cond::NoZero), "jnz", OPC_JUMP, Some(7), AddrMode::OneReg),
    desc(Op::Jump(Cond::NoSign), "jns", OPC_JUMP, Some(8), AddrMode::OneReg),
    desc(Op::Call, "call", OPC_CALL, None, AddrMode::Reserved),
    desc(Op::Ret, "ret", OPC_RET, None, AddrMode::Reserved),
    desc(Op::Hlt, "hlt", OPC_HLT, None, AddrMode::None),
];

pub fn by_mnemonic(mnemonic: &str) -> Option<&'static InstrDesc> {
    TABLE.iter().find(|d| d.mnemonic == mnemonic)
}

pub fn by_op(op: Op) -> &'static InstrDesc {
    // every Op variant has exactly one row
    TABLE
        .iter()
        .find(|d| d.op == op)
        .unwrap_or_else(|| unreachable!("no table row for {op:?}"))
}

pub fn by_encoding(opcode: u8, operand: u16) -> Option<&'static InstrDesc> {
    TABLE
        .iter()
        .find(|d| d.opcode == opcode && d.sub.map_or(true, |s| s == operand))
}

/// Encodes one instruction. `imm` is only consulted for [`AddrMode::RegImm`].
pub fn encode(desc: &InstrDesc, to: u8, from: u8, imm: u16) -> [u8; 4] {
    let operand = desc.sub.unwrap_or(match desc.mode {
        AddrMode::RegImm => imm,
        _ => 0,
    });
    let sel = match desc.mode {
        AddrMode::None | AddrMode::Reserved => 0,
        AddrMode::OneReg | AddrMode::RegImm => ((to & 0xF) << 4) | (to & 0xF),
        AddrMode::TwoReg => ((to & 0xF) << 4) | (from & 0xF),
    };
    let [lo, hi] = operand.to_le_bytes();
    [desc.opcode, lo, hi, sel]
}

use crate::decoder::{Decoded, Op};
use crate::instructions::{by_op, AddrMode};

/// Renders a decoded instruction in assembler syntax.
pub fn fmt_decoded(d: &Decoded) -> String {
    let desc = by_op(d.op);
    match desc.mode {
        AddrMode::None | AddrMode::Reserved => desc.mnemonic.to_string(),
        AddrMode::OneReg => format!("{} {}", desc.mnemonic, d.to_name()),
        AddrMode::TwoReg => format!("{} {}, {}", desc.mnemonic, d.to_name(), d.from_name()),
        AddrMode::RegImm => format!("{} {}, {}", desc.mnemonic, d.to_name(), imm(d)),
    }
}

fn imm(d: &Decoded) -> String {
    match d.op {
        // upper halves read better in hex
        Op::Ldu | Op::Ori => format!("${:04x}", d.operand),
        _ if d.operand > 9 => format!("${:x}", d.operand),
        _ => d.operand.to_string(),
    }
}

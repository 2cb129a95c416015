//! Textual register dump shown between instructions.

use std::fmt::Write;

use crate::cpu::Cpu;
use crate::decoder::{Decoder, REG_NAMES};
use crate::disasm::fmt_decoded;
use crate::isa::s3201::S3201Decoder;

/// ANSI clear-screen sequence emitted before each frame.
pub const CLEAR: &str = "\x1b[2J";

pub fn render(cpu: &Cpu, op_bytes: [u8; 4]) -> String {
    let mut out = String::new();
    for (name, val) in REG_NAMES.iter().zip(cpu.gpr.iter()) {
        let _ = writeln!(out, "{name}: {val:08x}");
    }
    let _ = writeln!(out, "fl: {:08x}", cpu.flag_word());
    let _ = writeln!(out, "pc: {:08x}", cpu.pc);
    let [b0, b1, b2, b3] = op_bytes;
    let _ = write!(out, "op: {b0:02x} {b1:02x} {b2:02x} {b3:02x}");
    match S3201Decoder.decode(u32::from_le_bytes(op_bytes)) {
        Some(d) => {
            let _ = writeln!(out, "  ; {}", fmt_decoded(&d));
        }
        None => out.push('\n'),
    }
    out
}

use crate::decoder::{split_fields, Decoded, Decoder};
use crate::instructions;

/// System 3201 decoder.
/// Pure: the register selectors come back in the `Decoded` value and are
/// never cached between instructions.
pub struct S3201Decoder;

impl S3201Decoder {
    pub fn new() -> Self {
        Self
    }
}

impl Default for S3201Decoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder for S3201Decoder {
    fn decode(&self, raw32: u32) -> Option<Decoded> {
        let (opcode, operand, sel) = split_fields(raw32);
        let desc = instructions::by_encoding(opcode, operand)?;
        Some(Decoded {
            op: desc.op,
            opcode,
            operand,
            to: sel >> 4,
            from: sel & 0xF,
        })
    }
}

//! Assembler for the System 3201 mnemonic language.

pub mod assembler;
pub mod error;
pub mod operand;
pub mod tokenizer;

pub use assembler::{assemble, Assembler, LabelTable, Pass};
pub use error::{AsmError, ErrorKind};

//! Two-pass assembler.
//!
//! Pass 1 walks the token stream once to fix label addresses; pass 2 walks
//! it again and encodes every instruction through the shared
//! `s3201_rs::instructions` table.

use std::collections::HashMap;

use s3201_rs::decoder::INSN_WIDTH;
use s3201_rs::instructions::{self, AddrMode};
use s3201_rs::LOADABLE_SIZE;
use tracing::debug;

use crate::error::{AsmError, ErrorKind};
use crate::operand::{self, Imm};
use crate::tokenizer::{Line, Tokenizer};

/// Pseudo-op that moves the location counter.
pub const ORG: &str = "org";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pass {
    One,
    Two,
}

/// Label name to absolute address.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelTable {
    map: HashMap<String, u32>,
}

impl LabelTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn define(&mut self, name: &str, addr: u32) -> Result<(), ErrorKind> {
        if self.map.contains_key(name) {
            return Err(ErrorKind::DuplicateLabel(name.to_string()));
        }
        self.map.insert(name.to_string(), addr);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<u32> {
        self.map.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// Per-pass state threaded through every line.
#[derive(Debug)]
pub struct PassState {
    pub pass: Pass,
    /// Address of the next instruction.
    pub counter: u32,
}

impl PassState {
    fn new(pass: Pass) -> Self {
        Self { pass, counter: 0 }
    }

    fn advance(&mut self) -> Result<(), ErrorKind> {
        self.counter = self
            .counter
            .checked_add(INSN_WIDTH)
            .ok_or(ErrorKind::LocationOverflow(self.counter))?;
        Ok(())
    }

    fn org(&mut self, arg: Option<&str>) -> Result<(), ErrorKind> {
        let arg = arg.ok_or_else(|| ErrorKind::MissingArgument(ORG.to_string()))?;
        let target = match operand::imm_only(arg)? {
            Imm::Value(v) => v,
            Imm::Label(l) => return Err(ErrorKind::NotANumber(l.to_string())),
        };
        if target % INSN_WIDTH != 0 {
            return Err(ErrorKind::MisalignedOrg(target));
        }
        if target < self.counter {
            return Err(ErrorKind::BackwardOrg { target, counter: self.counter });
        }
        if target as usize > LOADABLE_SIZE {
            return Err(ErrorKind::ImmediateOutOfRange(format!("${target:x}")));
        }
        debug!(pass = ?self.pass, from = self.counter, to = target, "org");
        self.counter = target;
        Ok(())
    }
}

pub struct Assembler<'a> {
    src: &'a str,
}

impl<'a> Assembler<'a> {
    pub fn new(src: &'a str) -> Self {
        Self { src }
    }

    /// Collects label addresses. Rejects duplicate labels and bad `org`s.
    pub fn pass1(&self) -> Result<LabelTable, AsmError> {
        let mut st = PassState::new(Pass::One);
        let mut labels = LabelTable::new();
        for line in Tokenizer::new(self.src) {
            let line = line?;
            let at = |kind| AsmError::new(line.number, kind);
            if let Some(name) = line.label {
                labels.define(name, st.counter).map_err(at)?;
                debug!(label = name, addr = st.counter, "label");
            }
            match line.mnemonic {
                Some(ORG) => st.org(line.arg).map_err(at)?,
                Some(_) => st.advance().map_err(at)?,
                None => {}
            }
        }
        Ok(labels)
    }

    /// Encodes every instruction, resolving labels through `labels`.
    pub fn pass2(&self, labels: &LabelTable) -> Result<Vec<u8>, AsmError> {
        let mut st = PassState::new(Pass::Two);
        let mut out = Vec::new();
        for line in Tokenizer::new(self.src) {
            let line = line?;
            let at = |kind| AsmError::new(line.number, kind);
            match line.mnemonic {
                Some(ORG) => {
                    st.org(line.arg).map_err(at)?;
                    // image offsets equal addresses, so the gap is zero-filled
                    out.resize(st.counter as usize, 0);
                }
                Some(mn) => {
                    let bytes = encode_line(mn, &line, labels).map_err(at)?;
                    out.extend_from_slice(&bytes);
                    st.advance().map_err(at)?;
                }
                None => {}
            }
        }
        debug!(bytes = out.len(), "pass 2 done");
        Ok(out)
    }
}

fn resolve(v: Imm<'_>, labels: &LabelTable) -> Result<u16, ErrorKind> {
    let (value, shown) = match v {
        Imm::Value(n) => (n, n.to_string()),
        Imm::Label(l) => (
            labels.get(l).ok_or_else(|| ErrorKind::UndefinedLabel(l.to_string()))?,
            l.to_string(),
        ),
    };
    u16::try_from(value).map_err(|_| ErrorKind::ImmediateOutOfRange(shown))
}

fn encode_line(mn: &str, line: &Line<'_>, labels: &LabelTable) -> Result<[u8; 4], ErrorKind> {
    let desc =
        instructions::by_mnemonic(mn).ok_or_else(|| ErrorKind::UnknownMnemonic(mn.to_string()))?;
    let need = || line.arg.ok_or_else(|| ErrorKind::MissingArgument(mn.to_string()));
    let bytes = match desc.mode {
        AddrMode::Reserved => return Err(ErrorKind::ReservedMnemonic(mn.to_string())),
        AddrMode::None => {
            if line.arg.is_some() {
                return Err(ErrorKind::UnexpectedArgument(mn.to_string()));
            }
            instructions::encode(desc, 0, 0, 0)
        }
        AddrMode::OneReg => {
            let r = operand::one_reg(need()?)?;
            instructions::encode(desc, r, r, 0)
        }
        AddrMode::TwoReg => {
            let (to, from) = operand::two_regs(need()?)?;
            instructions::encode(desc, to, from, 0)
        }
        AddrMode::RegImm => {
            let (r, v) = operand::reg_imm(need()?)?;
            instructions::encode(desc, r, r, resolve(v, labels)?)
        }
    };
    Ok(bytes)
}

/// Runs both passes over `src`.
pub fn assemble(src: &str) -> Result<Vec<u8>, AsmError> {
    let asm = Assembler::new(src);
    let labels = asm.pass1()?;
    asm.pass2(&labels)
}

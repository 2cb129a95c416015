//! Argument grammars: `rX`, `rX, rY`, `rX, imm` and a bare `imm`.
//!
//! An immediate is decimal (`42`), hex with a `$` prefix (`$2a`), or a
//! label reference (`.loop`) resolved later against the label table.

use crate::error::ErrorKind;
use crate::tokenizer::is_label_char;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Imm<'a> {
    Value(u32),
    Label(&'a str),
}

fn skip_blanks(s: &str) -> &str {
    s.trim_start_matches(|c: char| c == ' ' || c == '\t')
}

/// Splits off the leading run of label characters.
fn word(s: &str) -> (&str, &str) {
    let end = s.bytes().position(|c| !is_label_char(c)).unwrap_or(s.len());
    s.split_at(end)
}

fn reg(s: &str) -> Result<(u8, &str), ErrorKind> {
    let (tok, rest) = word(s);
    let bad = || ErrorKind::ExpectedRegister(if tok.is_empty() { s.to_string() } else { tok.to_string() });
    let digit = tok.strip_prefix('r').ok_or_else(bad)?;
    match digit.as_bytes() {
        [d @ b'0'..=b'9'] => Ok((d - b'0', rest)),
        [d @ b'a'..=b'f'] => Ok((d - b'a' + 10, rest)),
        _ => Err(bad()),
    }
}

fn comma(s: &str) -> Result<&str, ErrorKind> {
    skip_blanks(s)
        .strip_prefix(',')
        .map(skip_blanks)
        .ok_or_else(|| ErrorKind::ExpectedComma(s.to_string()))
}

fn imm(s: &str) -> Result<(Imm<'_>, &str), ErrorKind> {
    if s.starts_with('.') {
        let (tok, rest) = word(s);
        return Ok((Imm::Label(tok), rest));
    }
    let (digits, radix) = match s.strip_prefix('$') {
        Some(hex) => (hex, 16),
        None => (s, 10),
    };
    let (tok, rest) = word(digits);
    if tok.is_empty() || !tok.chars().all(|c| c.is_digit(radix)) {
        let shown = if tok.is_empty() { s } else { tok };
        return Err(ErrorKind::NotANumber(shown.to_string()));
    }
    let v = u32::from_str_radix(tok, radix).map_err(|_| ErrorKind::ImmediateOutOfRange(tok.to_string()))?;
    Ok((Imm::Value(v), rest))
}

fn end(rest: &str) -> Result<(), ErrorKind> {
    let rest = skip_blanks(rest);
    if rest.is_empty() {
        Ok(())
    } else {
        Err(ErrorKind::TrailingCharacters(rest.to_string()))
    }
}

pub fn one_reg(arg: &str) -> Result<u8, ErrorKind> {
    let (r, rest) = reg(arg)?;
    end(rest)?;
    Ok(r)
}

pub fn two_regs(arg: &str) -> Result<(u8, u8), ErrorKind> {
    let (to, rest) = reg(arg)?;
    let (from, rest) = reg(comma(rest)?)?;
    end(rest)?;
    Ok((to, from))
}

pub fn reg_imm(arg: &str) -> Result<(u8, Imm<'_>), ErrorKind> {
    let (r, rest) = reg(arg)?;
    let (v, rest) = imm(comma(rest)?)?;
    end(rest)?;
    Ok((r, v))
}

pub fn imm_only(arg: &str) -> Result<Imm<'_>, ErrorKind> {
    let (v, rest) = imm(arg)?;
    end(rest)?;
    Ok(v)
}

//! Line tokenizer.
//!
//! Source format, one statement per line:
//!
//! ```text
//! [.label:]  [mnemonic  [argument]]  [; comment]
//! ```
//!
//! Labels start in column 0 with `.` and use the characters `[A-Za-z0-9_.]`.
//! A mnemonic is a run of letters. The argument is the rest of the line up
//! to a `;`, with trailing blanks removed; its inner grammar is checked by
//! [`crate::operand`].

use crate::error::{AsmError, ErrorKind};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Line<'a> {
    /// 1-based line number.
    pub number: usize,
    pub label: Option<&'a str>,
    pub mnemonic: Option<&'a str>,
    pub arg: Option<&'a str>,
    pub comment: Option<&'a str>,
}

impl Line<'_> {
    pub fn is_empty(&self) -> bool {
        self.label.is_none() && self.mnemonic.is_none()
    }
}

pub fn is_label_char(c: u8) -> bool {
    c.is_ascii_alphanumeric() || c == b'_' || c == b'.'
}

fn is_blank(c: u8) -> bool {
    c == b' ' || c == b'\t'
}

/// Yields one [`Line`] per source line; stops at the first error.
pub struct Tokenizer<'a> {
    lines: std::iter::Enumerate<std::str::Split<'a, char>>,
    failed: bool,
}

impl<'a> Tokenizer<'a> {
    pub fn new(src: &'a str) -> Self {
        Self {
            lines: src.split('\n').enumerate(),
            failed: false,
        }
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Result<Line<'a>, AsmError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let (idx, raw) = self.lines.next()?;
        let text = raw.strip_suffix('\r').unwrap_or(raw);
        let res = tokenize_line(idx + 1, text);
        self.failed = res.is_err();
        Some(res)
    }
}

pub fn tokenize_line(number: usize, text: &str) -> Result<Line<'_>, AsmError> {
    let b = text.as_bytes();
    let err = |kind| AsmError::new(number, kind);
    let skip_blanks = |mut i: usize| {
        while i < b.len() && is_blank(b[i]) {
            i += 1;
        }
        i
    };
    let mut line = Line { number, ..Line::default() };
    let mut i = 0;

    if b.first() == Some(&b'.') {
        let start = i;
        while i < b.len() && is_label_char(b[i]) {
            i += 1;
        }
        let name = &text[start..i];
        if b.get(i) != Some(&b':') {
            return Err(err(ErrorKind::MissingColon(name.to_string())));
        }
        line.label = Some(name);
        i += 1;
    }

    i = skip_blanks(i);
    if i < b.len() && b[i].is_ascii_alphabetic() {
        let start = i;
        while i < b.len() && b[i].is_ascii_alphabetic() {
            i += 1;
        }
        if i < b.len() && !is_blank(b[i]) && b[i] != b';' {
            let end = text[i..].find(|c: char| c == ' ' || c == '\t' || c == ';').map_or(text.len(), |o| i + o);
            return Err(err(ErrorKind::InvalidMnemonic(text[start..end].to_string())));
        }
        line.mnemonic = Some(&text[start..i]);

        i = skip_blanks(i);
        let end = text[i..].find(';').map_or(text.len(), |o| i + o);
        let arg = text[i..end].trim_end_matches(|c: char| c == ' ' || c == '\t');
        if !arg.is_empty() {
            line.arg = Some(arg);
        }
        i = end;
    }

    i = skip_blanks(i);
    match b.get(i) {
        None => {}
        Some(b';') => line.comment = Some(&text[i + 1..]),
        Some(_) => {
            let c = text[i..].chars().next().unwrap_or('?');
            return Err(err(ErrorKind::UnexpectedCharacter(c)));
        }
    }
    Ok(line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn tok(s: &str) -> Line<'_> {
        tokenize_line(1, s).unwrap()
    }

    #[test]
    fn full_line() {
        let l = tok(".loop:\tadd r1, r2   ; bump");
        assert_eq!(l.label, Some(".loop"));
        assert_eq!(l.mnemonic, Some("add"));
        assert_eq!(l.arg, Some("r1, r2"));
        assert_eq!(l.comment, Some(" bump"));
    }

    #[test]
    fn blank_and_comment_lines_are_empty() {
        assert!(tok("").is_empty());
        assert!(tok("   \t").is_empty());
        assert!(tok("; just words").is_empty());
        assert!(tok("    ; indented").is_empty());
    }

    #[test]
    fn label_only_and_bare_mnemonic() {
        let l = tok(".a_b.c:");
        assert_eq!(l.label, Some(".a_b.c"));
        assert_eq!(l.mnemonic, None);

        let l = tok("  hlt");
        assert_eq!(l.mnemonic, Some("hlt"));
        assert_eq!(l.arg, None);

        let l = tok("nop;done");
        assert_eq!(l.mnemonic, Some("nop"));
        assert_eq!(l.comment, Some("done"));
    }

    #[test]
    fn label_without_colon() {
        let e = tokenize_line(7, ".start add r1, r2").unwrap_err();
        assert_eq!(e, AsmError::new(7, ErrorKind::MissingColon(".start".into())));
    }

    #[test]
    fn mnemonic_needs_separator() {
        let e = tokenize_line(2, "  add,r1").unwrap_err();
        assert_eq!(e.kind, ErrorKind::InvalidMnemonic("add,r1".into()));
        let e = tokenize_line(2, "ld2 r1").unwrap_err();
        assert_eq!(e.kind, ErrorKind::InvalidMnemonic("ld2".into()));
    }

    #[test]
    fn stray_character() {
        let e = tokenize_line(3, "  #what").unwrap_err();
        assert_eq!(e.kind, ErrorKind::UnexpectedCharacter('#'));
    }

    #[test]
    fn tokenizer_numbers_lines_and_stops_on_error() {
        let src = "nop\r\n\n.x\nnop\n";
        let out: Vec<_> = Tokenizer::new(src).collect();
        assert_eq!(out.len(), 3);
        assert_eq!(out[0].as_ref().unwrap().mnemonic, Some("nop"));
        assert!(out[1].as_ref().unwrap().is_empty());
        assert_eq!(out[2].as_ref().unwrap_err().line, 3);
    }
}

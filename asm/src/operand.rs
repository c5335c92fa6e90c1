use arch::mode::Mode;
use arch::reg::{Reg, RegCheck};
use arch::{in_range, VALUE_MAX, VALUE_MIN};

use crate::error::{Error, Fail};
use crate::ident;
use crate::msg::Span;
use crate::parser::parse_number;
use crate::MAX_LABEL_LEN;

/// Addressing mode implied by the operand's syntax. `None` for an empty
/// operand.
pub fn classify(tok: &str) -> Option<Mode> {
    let tok = tok.trim();
    if tok.is_empty() {
        None
    } else if tok.starts_with('#') {
        Some(Mode::Immediate)
    } else if is_register(tok) {
        Some(Mode::Register)
    } else if parse_matrix(tok).is_ok() || tok.contains('[') {
        Some(Mode::Matrix)
    } else {
        Some(Mode::Direct)
    }
}

/// Exactly `[rR][0-7]`.
fn is_register(tok: &str) -> bool {
    matches!(tok.as_bytes(), [b'r' | b'R', b'0'..=b'7'])
}

pub fn parse_register(tok: &str) -> Option<Reg> {
    if is_register(tok) {
        Reg::parse(tok).ok()
    } else {
        None
    }
}

/// `#` followed by a signed decimal within the immediate range.
pub fn parse_immediate(tok: &str) -> Result<i16, Error> {
    let body = tok.strip_prefix('#').unwrap_or(tok).trim();
    match parse_number(body) {
        None => Err(Error::MalformedImmediate(tok.to_string())),
        Some(v) if !in_range(v) => Err(Error::ImmediateOutOfRange(v, VALUE_MIN, VALUE_MAX)),
        Some(v) => Ok(v as i16),
    }
}

/// Direct operands name a symbol.
pub fn check_direct(tok: &str) -> Result<(), Error> {
    if tok.len() <= MAX_LABEL_LEN && ident::is_identifier(tok) {
        Ok(())
    } else {
        Err(Error::InvalidDirect(tok.to_string()))
    }
}

// ----------------------------------------------------------------------------
// Matrix operand `LABEL[rX][rY]`

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Index<'a> {
    pub text: &'a str,
    pub reg: Reg,
}

/// Pieces of a well formed matrix operand, borrowed from the token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Matrix<'a> {
    pub label: &'a str,
    pub row: Index<'a>,
    pub col: Index<'a>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatrixFault {
    NoBrackets,
    EmptyLabel,
    LabelTooLong,
    EmptyIndex,
    BadRegister,
    NotRegister,
    JunkBetween,
    InvalidLabel,
    Trailing,
}

/// Grammar error with its byte range inside the token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatrixError<'a> {
    pub fault: MatrixFault,
    pub text: &'a str,
    pub at: usize,
    pub end: usize,
}

impl<'a> MatrixError<'a> {
    fn new(fault: MatrixFault, tok: &'a str, at: usize, end: usize) -> Self {
        MatrixError {
            fault,
            text: &tok[at..end],
            at,
            end,
        }
    }

    fn over(fault: MatrixFault, tok: &'a str, part: &'a str) -> Self {
        let at = Span::of(tok, part).start;
        MatrixError::new(fault, tok, at, at + part.len())
    }

    pub fn into_error(self) -> Error {
        let text = self.text.to_string();
        match self.fault {
            MatrixFault::NoBrackets => Error::MatrixNoBrackets,
            MatrixFault::EmptyLabel => Error::MatrixEmptyLabel,
            MatrixFault::LabelTooLong => Error::MatrixLabelTooLong(text, MAX_LABEL_LEN),
            MatrixFault::EmptyIndex => Error::MatrixEmptyIndex,
            MatrixFault::BadRegister => Error::MatrixBadRegister(text),
            MatrixFault::NotRegister => Error::MatrixNotRegister(text),
            MatrixFault::JunkBetween => Error::MatrixJunkBetween,
            MatrixFault::InvalidLabel => Error::MatrixInvalidLabel(text),
            MatrixFault::Trailing => Error::MatrixTrailing,
        }
    }

    /// Diagnostic positioned in the source line, given where the token starts.
    pub fn locate(self, tok_col: usize) -> Fail {
        let span = Span::new(self.at, self.end).shift(tok_col);
        (self.into_error(), span)
    }
}

/// Positions of `[`, `]`, `[`, `]`, strictly increasing.
fn brackets(tok: &str) -> Option<(usize, usize, usize, usize)> {
    let o1 = tok.find('[')?;
    let c1 = o1 + 1 + tok[o1 + 1..].find(']')?;
    let o2 = c1 + 1 + tok[c1 + 1..].find('[')?;
    let c2 = o2 + 1 + tok[o2 + 1..].find(']')?;
    Some((o1, c1, o2, c2))
}

pub fn parse_matrix(tok: &str) -> Result<Matrix<'_>, MatrixError<'_>> {
    let (o1, c1, o2, c2) = match brackets(tok) {
        Some(b) => b,
        None => return Err(MatrixError::new(MatrixFault::NoBrackets, tok, 0, tok.len())),
    };

    let label = tok[..o1].trim();
    if label.is_empty() {
        return Err(MatrixError::new(MatrixFault::EmptyLabel, tok, o1, o1 + 1));
    }
    if label.len() > MAX_LABEL_LEN {
        return Err(MatrixError::over(MatrixFault::LabelTooLong, tok, label));
    }

    let row = tok[o1 + 1..c1].trim();
    let col = tok[o2 + 1..c2].trim();
    if row.is_empty() {
        return Err(MatrixError::new(MatrixFault::EmptyIndex, tok, o1, c1 + 1));
    }
    if col.is_empty() {
        return Err(MatrixError::new(MatrixFault::EmptyIndex, tok, o2, c2 + 1));
    }

    let checks = [(row, Reg::check(row)), (col, Reg::check(col))];
    for &(text, check) in &checks {
        if check == RegCheck::BadRegister {
            return Err(MatrixError::over(MatrixFault::BadRegister, tok, text));
        }
    }
    for &(text, check) in &checks {
        if check == RegCheck::NotRegister {
            return Err(MatrixError::over(MatrixFault::NotRegister, tok, text));
        }
    }

    let between = &tok[c1 + 1..o2];
    if let Some(pos) = between.find(|c: char| !c.is_whitespace()) {
        let at = c1 + 1 + pos;
        return Err(MatrixError::new(MatrixFault::JunkBetween, tok, at, o2));
    }

    if !ident::is_identifier(label) {
        return Err(MatrixError::over(MatrixFault::InvalidLabel, tok, label));
    }
    let after = &tok[c2 + 1..];
    if let Some(pos) = after.find(|c: char| !c.is_whitespace()) {
        let at = c2 + 1 + pos;
        return Err(MatrixError::new(MatrixFault::Trailing, tok, at, tok.len()));
    }

    match (checks[0].1, checks[1].1) {
        (RegCheck::Valid(r), RegCheck::Valid(c)) => Ok(Matrix {
            label,
            row: Index { text: row, reg: r },
            col: Index { text: col, reg: c },
        }),
        _ => Err(MatrixError::over(MatrixFault::NotRegister, tok, row)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classes() {
        assert_eq!(classify(""), None);
        assert_eq!(classify("  "), None);
        assert_eq!(classify("#5"), Some(Mode::Immediate));
        assert_eq!(classify("#x"), Some(Mode::Immediate));
        assert_eq!(classify("r0"), Some(Mode::Register));
        assert_eq!(classify("R7"), Some(Mode::Register));
        assert_eq!(classify("r8"), Some(Mode::Direct));
        assert_eq!(classify("r12"), Some(Mode::Direct));
        assert_eq!(classify("M[r1][r2]"), Some(Mode::Matrix));
        assert_eq!(classify("M[r1]"), Some(Mode::Matrix));
        assert_eq!(classify("LOOP"), Some(Mode::Direct));
    }

    #[test]
    fn immediates() {
        assert_eq!(parse_immediate("#-128").ok(), Some(-128));
        assert_eq!(parse_immediate("#+127").ok(), Some(127));
        assert!(matches!(
            parse_immediate("#128"),
            Err(Error::ImmediateOutOfRange(128, -128, 127))
        ));
        assert!(matches!(parse_immediate("#"), Err(Error::MalformedImmediate(_))));
        assert!(matches!(parse_immediate("#1.5"), Err(Error::MalformedImmediate(_))));
    }

    #[test]
    fn directs() {
        assert!(check_direct("LOOP").is_ok());
        assert!(check_direct("2X").is_err());
        assert!(check_direct("A-B").is_err());
        assert!(check_direct(&"L".repeat(32)).is_err());
    }
}

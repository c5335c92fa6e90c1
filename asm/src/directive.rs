use arch::op::Directive;
use arch::{in_range, ADDR_LIMIT, VALUE_MAX, VALUE_MIN};

use crate::error::{Error, Fail};
use crate::ident::{self, LabelFault};
use crate::msg::Span;
use crate::parser::parse_number;
use crate::MAX_LABEL_LEN;

// ----------------------------------------------------------------------------
// Value lists

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ValueFault {
    Missing,
    Trailing,
    Junk,
    Invalid,
    Range(i64),
}

/// Comma separated signed decimals. An empty list is allowed here.
fn values(list: &str) -> Result<Vec<i16>, (ValueFault, &str)> {
    if list.trim().is_empty() {
        return Ok(vec![]);
    }
    let parts: Vec<&str> = list.split(',').map(str::trim).collect();
    let last = parts.len() - 1;
    let mut out = vec![];
    for (idx, &part) in parts.iter().enumerate() {
        if part.is_empty() {
            let fault = if idx == last && idx > 0 {
                ValueFault::Trailing
            } else {
                ValueFault::Missing
            };
            return Err((fault, part));
        }
        if let Some(pos) = part.find(char::is_whitespace) {
            return Err((ValueFault::Junk, part[pos..].trim_start()));
        }
        match parse_number(part) {
            None => return Err((ValueFault::Invalid, part)),
            Some(v) if !in_range(v) => return Err((ValueFault::Range(v), part)),
            Some(v) => out.push(v as i16),
        }
    }
    Ok(out)
}

/// `.data 7, -57, +17`
pub fn data(raw: &str, rest: &str) -> Result<Vec<i16>, Fail> {
    let vals = values(rest).map_err(|(fault, part)| {
        let err = match fault {
            ValueFault::Missing => Error::DataMissingValue,
            ValueFault::Trailing => Error::DataTrailingComma,
            ValueFault::Junk => Error::DataMissingComma,
            ValueFault::Invalid => Error::DataInvalidNumber(part.to_string()),
            ValueFault::Range(v) => Error::DataOutOfRange(v, VALUE_MIN, VALUE_MAX),
        };
        (err, Span::of(raw, part))
    })?;
    if vals.is_empty() {
        return Err((Error::DataEmpty, Span::of(raw, rest)));
    }
    Ok(vals)
}

/// `.string "abc"` yields the characters and a terminating zero.
pub fn string(raw: &str, rest: &str) -> Result<Vec<i16>, Fail> {
    let body = match rest.strip_prefix('"') {
        Some(body) => body,
        None => return Err((Error::StringMissingQuote, Span::of(raw, rest))),
    };
    let close = match body.find('"') {
        Some(close) => close,
        None => return Err((Error::StringUnterminated, Span::of(raw, rest))),
    };
    let text = &body[..close];
    let after = body[close + 1..].trim();
    if !after.is_empty() {
        return Err((Error::StringTrailing, Span::of(raw, after)));
    }
    if let Some((pos, c)) = text.char_indices().find(|(_, c)| !c.is_ascii()) {
        let bad = &text[pos..pos + c.len_utf8()];
        return Err((Error::StringNonAscii, Span::of(raw, bad)));
    }
    let mut out: Vec<i16> = text.bytes().map(|b| b as i16).collect();
    out.push(0);
    Ok(out)
}

/// Parses `[N]` at the start of `s`, returning `N` and the remainder.
fn dimension(s: &str) -> Result<(usize, &str), &str> {
    let inner = s.strip_prefix('[').ok_or(s)?;
    let close = inner.find(']').ok_or(s)?;
    let num = inner[..close].trim();
    match parse_number(num) {
        Some(n) if n > 0 => Ok((n as usize, inner[close + 1..].trim_start())),
        _ => Err(num),
    }
}

/// `.mat [2][3] 1, 2, 3` yields rows*cols words, zero filled.
pub fn mat(raw: &str, rest: &str) -> Result<Vec<i16>, Fail> {
    let (rows, after) =
        dimension(rest).map_err(|t| (Error::MatBadRows(t.to_string()), Span::of(raw, t)))?;
    let (cols, list) =
        dimension(after).map_err(|t| (Error::MatBadCols(t.to_string()), Span::of(raw, t)))?;

    let size = rows.saturating_mul(cols);
    if size >= ADDR_LIMIT as usize {
        let dims = &rest[..Span::of(rest, list).start];
        return Err((Error::MatTooLarge(rows, cols), Span::of(raw, dims.trim_end())));
    }

    let mut vals = values(list).map_err(|(fault, part)| {
        let err = match fault {
            ValueFault::Missing => Error::MatMissingValue,
            ValueFault::Trailing => Error::MatTrailingComma,
            ValueFault::Junk => Error::MatUnexpected,
            ValueFault::Invalid => Error::MatInvalidNumber(part.to_string()),
            ValueFault::Range(v) => Error::MatOutOfRange(v, VALUE_MIN, VALUE_MAX),
        };
        (err, Span::of(raw, part))
    })?;
    if vals.len() > size {
        return Err((Error::MatTooManyValues(rows, cols), Span::of(raw, list)));
    }
    vals.resize(size, 0);
    Ok(vals)
}

// ----------------------------------------------------------------------------
// .entry / .extern

/// Exactly one label argument.
pub fn symbol_arg<'a>(raw: &str, rest: &'a str, dir: Directive) -> Result<&'a str, Fail> {
    let mut words = rest.split_whitespace();
    let name = match words.next() {
        Some(name) => name,
        None => return Err((Error::MissingSymbolArg(dir.to_string()), Span::of(raw, rest))),
    };
    if let Some(extra) = words.next() {
        let tail = &rest[Span::of(rest, extra).start..];
        return Err((Error::SymbolArgTrailing(dir.to_string()), Span::of(raw, tail)));
    }
    let span = Span::of(raw, name);
    match ident::check_label(name) {
        Ok(()) => Ok(name),
        Err(LabelFault::TooLong) => Err((
            Error::SymbolArgTooLong(name.to_string(), MAX_LABEL_LEN),
            span,
        )),
        Err(_) => Err((Error::SymbolArgInvalid(name.to_string()), span)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(res: Result<Vec<i16>, Fail>) -> &'static str {
        res.err().map(|(e, _)| e.code()).unwrap_or("ok")
    }

    #[test]
    fn data_lists() {
        let raw = ".data 7, -57, +17";
        assert_eq!(data(raw, &raw[6..]).ok(), Some(vec![7, -57, 17]));
        let raw = ".data ";
        assert_eq!(code(data(raw, &raw[6..])), "AS310");
        let raw = ".data 1,,2";
        assert_eq!(code(data(raw, &raw[6..])), "AS311");
        let raw = ".data ,1";
        assert_eq!(code(data(raw, &raw[6..])), "AS311");
        let raw = ".data 1, x";
        assert_eq!(code(data(raw, &raw[6..])), "AS312");
        let raw = ".data 1, 128";
        let (err, span) = data(raw, &raw[6..]).unwrap_err();
        assert_eq!(err.code(), "AS313");
        assert_eq!(span, Span::new(9, 12));
        let raw = ".data 1, 2,";
        assert_eq!(code(data(raw, &raw[6..])), "AS314");
        let raw = ".data 1 2";
        let (err, span) = data(raw, &raw[6..]).unwrap_err();
        assert_eq!(err.code(), "AS315");
        assert_eq!(span.start, 8);
    }

    #[test]
    fn strings() {
        let raw = ".string \"ab\"";
        assert_eq!(string(raw, &raw[8..]).ok(), Some(vec![97, 98, 0]));
        let raw = ".string \"\"";
        assert_eq!(string(raw, &raw[8..]).ok(), Some(vec![0]));
        let raw = ".string \"a;b\"";
        assert_eq!(string(raw, &raw[8..]).ok(), Some(vec![97, 59, 98, 0]));
        let raw = ".string ab";
        assert_eq!(code(string(raw, &raw[8..])), "AS320");
        let raw = ".string \"ab";
        assert_eq!(code(string(raw, &raw[8..])), "AS321");
        let raw = ".string \"ab\" x";
        assert_eq!(code(string(raw, &raw[8..])), "AS322");
        let raw = ".string \"aé\"";
        assert_eq!(code(string(raw, &raw[8..])), "AS323");
    }

    #[test]
    fn matrices() {
        let raw = ".mat [2][2] 1, 2, 3";
        assert_eq!(mat(raw, &raw[5..]).ok(), Some(vec![1, 2, 3, 0]));
        let raw = ".mat [1] [3]";
        assert_eq!(mat(raw, &raw[5..]).ok(), Some(vec![0, 0, 0]));
        let raw = ".mat [0][2]";
        assert_eq!(code(mat(raw, &raw[5..])), "AS301");
        let raw = ".mat 2][2]";
        assert_eq!(code(mat(raw, &raw[5..])), "AS301");
        let raw = ".mat [2][x]";
        assert_eq!(code(mat(raw, &raw[5..])), "AS302");
        let raw = ".mat [16][16]";
        assert_eq!(code(mat(raw, &raw[5..])), "AS303");
        let raw = ".mat [2][2] 1,,2";
        assert_eq!(code(mat(raw, &raw[5..])), "AS304");
        let raw = ".mat [2][2] 1, y";
        assert_eq!(code(mat(raw, &raw[5..])), "AS305");
        let raw = ".mat [2][2] 1, -129";
        assert_eq!(code(mat(raw, &raw[5..])), "AS306");
        let raw = ".mat [1][2] 1, 2, 3";
        assert_eq!(code(mat(raw, &raw[5..])), "AS307");
        let raw = ".mat [2][2] 1 2";
        assert_eq!(code(mat(raw, &raw[5..])), "AS308");
        let raw = ".mat [2][2] 1, 2,";
        assert_eq!(code(mat(raw, &raw[5..])), "AS309");
    }

    #[test]
    fn symbol_args() {
        let raw = ".entry MAIN";
        assert_eq!(symbol_arg(raw, &raw[7..], Directive::ENTRY).ok(), Some("MAIN"));
        let raw = ".extern ";
        let err = symbol_arg(raw, &raw[8..], Directive::EXTERN).unwrap_err().0;
        assert_eq!(err.code(), "AS011");
        assert_eq!(err.to_string(), "missing label after `.extern`");
        let raw = ".entry A B";
        assert_eq!(
            symbol_arg(raw, &raw[7..], Directive::ENTRY).unwrap_err().0.code(),
            "AS012"
        );
        let long = format!(".entry {}", "A".repeat(32));
        assert_eq!(
            symbol_arg(&long, &long[7..], Directive::ENTRY).unwrap_err().0.code(),
            "AS013"
        );
        let raw = ".entry 9A";
        assert_eq!(
            symbol_arg(raw, &raw[7..], Directive::ENTRY).unwrap_err().0.code(),
            "AS014"
        );
    }
}

// ----------------------------------------------------------------------------
// Line

/// One source line split into its parts. All fields borrow from `raw`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line<'a> {
    pub raw: &'a str,
    /// Text before the first `:` of the first word, trimmed.
    pub label: Option<&'a str>,
    pub command: Option<&'a str>,
    /// Everything after the command, without comment, trimmed.
    pub rest: &'a str,
}

impl<'a> Line<'a> {
    /// Returns `None` for blank and comment lines.
    pub fn parse(raw: &'a str) -> Option<Line<'a>> {
        let code = strip_comment(raw).trim();
        if code.is_empty() {
            return None;
        }

        let first = code.split_whitespace().next().unwrap_or(code);
        let (label, body) = match first.find(':') {
            Some(pos) => (Some(code[..pos].trim()), code[pos + 1..].trim()),
            None => (None, code),
        };

        let (command, rest) = match body.find(char::is_whitespace) {
            Some(pos) => (&body[..pos], body[pos..].trim()),
            None => (body, &body[body.len()..]),
        };
        let command = if command.is_empty() { None } else { Some(command) };

        Some(Line {
            raw,
            label,
            command,
            rest,
        })
    }
}

/// Cuts the line at the first `;` outside a string literal.
pub fn strip_comment(raw: &str) -> &str {
    let mut quoted = false;
    for (idx, c) in raw.char_indices() {
        match c {
            '"' => quoted = !quoted,
            ';' if !quoted => return &raw[..idx],
            _ => {}
        }
    }
    raw
}

// ----------------------------------------------------------------------------
// Operands

/// Splits at commas outside brackets. Each part is trimmed and may be empty.
pub fn split_operands(rest: &str) -> Vec<&str> {
    if rest.trim().is_empty() {
        return vec![];
    }
    let mut parts = vec![];
    let mut depth = 0usize;
    let mut start = 0;
    for (idx, c) in rest.char_indices() {
        match c {
            '[' => depth += 1,
            ']' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(rest[start..idx].trim());
                start = idx + 1;
            }
            _ => {}
        }
    }
    parts.push(rest[start..].trim());
    parts
}

/// Signed decimal with optional `+`/`-`. `None` if malformed. Values too
/// large for `i64` saturate, so they still fail a later range check.
pub fn parse_number(s: &str) -> Option<i64> {
    let (neg, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let mag = digits.bytes().fold(0i64, |acc, b| {
        acc.saturating_mul(10).saturating_add((b - b'0') as i64)
    });
    Some(if neg { -mag } else { mag })
}

use indexmap::IndexMap;

use crate::error::Error;
use crate::ident::{self, LabelFault};
use crate::msg::{Msgs, Site, Span};
use crate::{MAX_LABEL_LEN, MAX_LINE_LEN};

const MCRO: &str = "mcro";
const MCROEND: &str = "mcroend";

struct Open<'s> {
    name: Option<&'s str>,
    site: Site<'s>,
    body: Vec<&'s str>,
}

/// Expands `mcro NAME` ... `mcroend` blocks. Returns `None` if any error was
/// reported, in which case nothing should be assembled.
pub fn expand(src: &str, msgs: &mut Msgs) -> Option<String> {
    let before = msgs.error_count();
    let mut table: IndexMap<&str, Vec<&str>> = IndexMap::new();
    let mut open: Option<Open> = None;
    let mut out: Vec<&str> = vec![];

    for (idx, raw) in src.lines().enumerate() {
        let site = Site { line: idx + 1, raw };
        if raw.len() > MAX_LINE_LEN {
            let span = Span::new(MAX_LINE_LEN, raw.len());
            msgs.error_at(site, span, Error::MacroLineTooLong(MAX_LINE_LEN));
            continue;
        }

        let mut words = raw.split_whitespace();
        let first = words.next().unwrap_or("");

        if first == MCROEND {
            if let Some(extra) = words.next() {
                let tail = &raw[Span::of(raw, extra).start..];
                msgs.error_at(site, Span::of(raw, tail), Error::MacroEndTrailing);
            }
            match open.take() {
                Some(Open {
                    name: Some(name),
                    body,
                    ..
                }) => {
                    table.insert(name, body);
                }
                Some(_) => {}
                None => msgs.error_at(site, Span::of(raw, first), Error::MacroStrayEnd),
            }
            continue;
        }

        if let Some(m) = open.as_mut() {
            m.body.push(raw);
            continue;
        }

        if first == MCRO {
            let name = define(site, words.next(), words.next(), &table, msgs);
            open = Some(Open {
                name,
                site,
                body: vec![],
            });
            continue;
        }

        if first.len() > MCRO.len() && first.starts_with(MCRO) {
            msgs.error_at(site, Span::of(raw, first), Error::MacroGlued);
            open = Some(Open {
                name: None,
                site,
                body: vec![],
            });
            continue;
        }

        match table.get(first) {
            Some(body) => out.extend(body.iter().copied()),
            None => out.push(raw),
        }
    }

    if let Some(m) = open {
        let name = m.name.unwrap_or(MCRO).to_string();
        let span = Span::new(0, m.site.raw.len());
        msgs.error_at(m.site, span, Error::MacroUnterminated(name));
    }

    if msgs.error_count() > before {
        return None;
    }
    let mut text = out.join("\n");
    text.push('\n');
    Some(text)
}

/// Validates the name on a `mcro` line.
fn define<'s>(
    site: Site<'s>,
    name: Option<&'s str>,
    extra: Option<&'s str>,
    table: &IndexMap<&str, Vec<&str>>,
    msgs: &mut Msgs,
) -> Option<&'s str> {
    let raw = site.raw;
    let name = match name {
        Some(name) => name,
        None => {
            let span = Span::new(0, raw.len());
            msgs.error_at(site, span, Error::MacroMissingName);
            return None;
        }
    };
    let span = Span::of(raw, name);
    let err = match ident::check_macro_name(name) {
        Err(LabelFault::TooLong) => Some(Error::MacroNameTooLong(name.to_string(), MAX_LABEL_LEN)),
        Err(LabelFault::Empty) | Err(LabelFault::Invalid) => {
            Some(Error::MacroBadName(name.to_string()))
        }
        Err(LabelFault::Reserved) | Err(LabelFault::Register) => {
            Some(Error::MacroReserved(name.to_string()))
        }
        Ok(()) if table.contains_key(name) => Some(Error::MacroDuplicate(name.to_string())),
        Ok(()) => None,
    };
    if let Some(err) = err {
        msgs.error_at(site, span, err);
        return None;
    }
    if let Some(extra) = extra {
        let tail = &raw[Span::of(raw, extra).start..];
        msgs.error_at(site, Span::of(raw, tail), Error::MacroBadName(name.to_string()));
        return None;
    }
    Some(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn case(src: &str, expect: Option<&str>, codes: Vec<&str>) {
        let mut msgs = Msgs::new("test.as");
        let out = expand(src, &mut msgs);
        assert_eq!(out.as_deref(), expect);
        assert_eq!(msgs.codes(), codes);
    }

    #[test]
    fn expands() {
        case(
            "mcro m_inc\n inc r1\n inc r2\nmcroend\nMAIN: stop\nm_inc\nm_inc\n",
            Some("MAIN: stop\n inc r1\n inc r2\n inc r1\n inc r2\n"),
            vec![],
        );
        case(" mov r1, r2\n", Some(" mov r1, r2\n"), vec![]);
    }

    #[test]
    fn errors() {
        case("mcrox\nmcroend\n", None, vec!["MC002"]);
        case("mcro\nmcroend\n", None, vec!["MC003"]);
        case(
            &format!("mcro {}\nmcroend\n", "m".repeat(32)),
            None,
            vec!["MC004"],
        );
        case("mcro 1m\nmcroend\n", None, vec!["MC005"]);
        case("mcro a b\nmcroend\n", None, vec!["MC005"]);
        case("mcro mov\nmcroend\n", None, vec!["MC006"]);
        case("mcro r1\nmcroend\n", None, vec!["MC006"]);
        case(
            "mcro m\nmcroend\nmcro m\nmcroend\n",
            None,
            vec!["MC007"],
        );
        case("mcro m\nmcroend x\n", None, vec!["MC008"]);
        case("mcro m\n stop\n", None, vec!["MC009"]);
        case("mcroend\n", None, vec!["MC010"]);
        case(&format!("; {}\n", "x".repeat(79)), None, vec!["MC001"]);
    }
}

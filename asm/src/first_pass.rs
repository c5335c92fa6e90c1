use arch::mode::Mode;
use arch::op::{Command, Directive, Opcode};
use arch::rule::{self, ModeError, Role};
use indexmap::IndexSet;

use crate::directive;
use crate::encoder::{Encoder, Operand};
use crate::error::Error;
use crate::ident::{self, LabelFault};
use crate::image::Addr;
use crate::label::SymbolKind;
use crate::msg::{Msgs, Site, Span};
use crate::operand;
use crate::parser::{split_operands, Line};
use crate::{Program, MAX_LABEL_LEN, MAX_LINE_LEN};

struct Pass<'s, 'm> {
    lines: Vec<&'s str>,
    msgs: &'m mut Msgs,
    prog: Program,
}

/// Builds the symbol table and both images. Every line is processed even
/// after errors.
pub fn run(src: &str, msgs: &mut Msgs) -> Program {
    let mut pass = Pass {
        lines: src.lines().collect(),
        msgs,
        prog: Program::default(),
    };
    for idx in 0..pass.lines.len() {
        let site = pass.site(idx + 1);
        pass.line(site);
    }
    pass.check_symbols();
    pass.prog
}

impl<'s, 'm> Pass<'s, 'm> {
    fn site(&self, line: usize) -> Site<'s> {
        let raw = self.lines.get(line.wrapping_sub(1)).copied().unwrap_or("");
        Site { line, raw }
    }

    fn line(&mut self, site: Site<'s>) {
        let raw = site.raw;
        if raw.len() > MAX_LINE_LEN {
            let span = Span::new(MAX_LINE_LEN, raw.len());
            self.msgs
                .error_at(site, span, Error::LineTooLong(MAX_LINE_LEN));
            return;
        }

        let line = match Line::parse(raw) {
            Some(line) => line,
            None => return,
        };

        let label = line.label.and_then(|name| self.check_label(site, name));

        let cmd = match line.command {
            Some(cmd) => cmd,
            None => {
                let span = Span::of(raw, line.label.unwrap_or(raw));
                self.msgs.error_at(site, span, Error::MissingCommand);
                return;
            }
        };

        match Command::parse(cmd) {
            Some(Command::Op(op)) => self.instruction(site, &line, label, op),
            Some(Command::Dir(dir)) => self.directive(site, &line, label, dir),
            None => {
                let span = Span::of(raw, cmd);
                self.msgs
                    .error_at(site, span, Error::UnknownCommand(cmd.to_string()));
            }
        }
    }

    fn check_label(&mut self, site: Site, name: &'s str) -> Option<&'s str> {
        let err = match ident::check_label(name) {
            Ok(()) => return Some(name),
            Err(LabelFault::Empty) => Error::EmptyLabel,
            Err(LabelFault::TooLong) => Error::LabelTooLong(name.to_string(), MAX_LABEL_LEN),
            Err(LabelFault::Invalid) => Error::InvalidLabel(name.to_string()),
            Err(LabelFault::Reserved) => Error::ReservedLabel(name.to_string()),
            Err(LabelFault::Register) => Error::RegisterLabel(name.to_string()),
        };
        self.msgs.error_at(site, Span::of(site.raw, name), err);
        None
    }

    /// First definition wins.
    fn define(&mut self, site: Site, name: &str, addr: Addr, kind: SymbolKind) {
        let span = Span::of(site.raw, name);
        if let Some(prev) = self.prog.symbols.lookup(name) {
            let prev = self.site(prev.line);
            self.msgs
                .error_at(site, span, Error::DuplicateLabel(name.to_string()));
            let prev_span = Span::new(0, prev.raw.find(':').unwrap_or(prev.raw.len()));
            self.msgs
                .note_at(prev, prev_span, format!("`{name}` first defined here"));
            return;
        }
        self.prog
            .symbols
            .insert_or_update(name, addr, kind, site.line);
    }

    fn capacity(&mut self, site: Site) {
        let image = &self.prog.image;
        if !image.fits() {
            let err = Error::Capacity(image.ic, image.dc, arch::ADDR_LIMIT);
            self.msgs.error_at(site, Span::new(0, site.raw.len()), err);
        }
    }

    // ------------------------------------------------------------------------
    // Instructions

    fn instruction(&mut self, site: Site<'s>, line: &Line<'s>, label: Option<&str>, op: Opcode) {
        if let Some(name) = label {
            let addr = Addr::Fixed(self.prog.image.ic);
            self.define(site, name, addr, SymbolKind::Code);
        }

        let mut operands = vec![];
        for text in split_operands(line.rest) {
            let span = Span::of(site.raw, text);
            let mode = match operand::classify(text) {
                Some(mode) => mode,
                None => {
                    self.msgs.error_at(site, span, Error::EmptyOperand);
                    return;
                }
            };
            if mode != Mode::Matrix {
                if let Some(pos) = text.find(char::is_whitespace) {
                    let gap = Span::new(span.start + pos, span.end);
                    self.msgs.error_at(site, gap, Error::MissingOperandComma);
                    return;
                }
            }
            operands.push(Operand { text, mode });
        }

        let count = operands.len();
        let (src, dst) = match operands.as_slice() {
            [] => (None, None),
            [d] => (None, Some(*d)),
            [s, d, ..] => (Some(*s), Some(*d)),
        };

        if let Err(errs) = rule::validate(op, count, src.map(|o| o.mode), dst.map(|o| o.mode)) {
            for err in errs {
                let span = match &err {
                    ModeError::Count { .. } | ModeError::Missing { .. } => {
                        if line.rest.is_empty() {
                            Span::of(site.raw, line.command.unwrap_or(site.raw))
                        } else {
                            Span::of(site.raw, line.rest)
                        }
                    }
                    ModeError::UnexpectedSource(_) => {
                        Span::of(site.raw, src.map(|o| o.text).unwrap_or(line.rest))
                    }
                    ModeError::Illegal { role, .. } => {
                        let o = match role {
                            Role::Source => src,
                            Role::Destination => dst,
                        };
                        Span::of(site.raw, o.map(|o| o.text).unwrap_or(line.rest))
                    }
                };
                self.msgs.error_at(site, span, Error::Mode(err));
            }
            return;
        }

        let res = Encoder {
            image: &mut self.prog.image,
            symbols: &self.prog.symbols,
            externs: &self.prog.externs,
            site,
        }
        .instruction(op, src, dst);
        if let Err(fail) = res {
            self.msgs.fail_at(site, fail);
        }

        self.capacity(site);
    }

    // ------------------------------------------------------------------------
    // Directives

    fn directive(&mut self, site: Site<'s>, line: &Line<'s>, label: Option<&str>, dir: Directive) {
        let raw = site.raw;
        let rest = line.rest;

        if !dir.is_storage() {
            if let Some(name) = label {
                let span = Span::of(raw, name);
                self.msgs
                    .warn_at(site, span, Error::LabelIgnored(dir.to_string()));
            }
            let name = match directive::symbol_arg(raw, rest, dir) {
                Ok(name) => name,
                Err(fail) => {
                    self.msgs.fail_at(site, fail);
                    return;
                }
            };
            let fresh = match dir {
                Directive::ENTRY => self.prog.entries.declare(name, site.line),
                _ => self.prog.externs.declare(name, site.line),
            };
            if !fresh {
                let err = Error::DuplicateDeclaration(name.to_string(), dir.to_string());
                self.msgs.warn_at(site, Span::of(raw, name), err);
            }
            return;
        }

        if let Some(name) = label {
            let addr = self.prog.image.data_addr();
            self.define(site, name, addr, SymbolKind::Data);
        }

        let words = match dir {
            Directive::DATA => directive::data(raw, rest),
            Directive::STRING => directive::string(raw, rest),
            _ => directive::mat(raw, rest),
        };
        match words {
            Ok(words) => {
                for v in words {
                    self.prog.image.push_data(v, site.line);
                }
            }
            Err(fail) => {
                self.msgs.fail_at(site, fail);
                return;
            }
        }

        self.capacity(site);
    }

    // ------------------------------------------------------------------------
    // End of pass

    /// Reports references that the second pass could not resolve.
    fn check_symbols(&mut self) {
        let mut undefined = IndexSet::new();
        for word in &self.prog.image.code {
            if let Some(name) = &word.label {
                if !self.prog.symbols.contains(name) && !self.prog.externs.contains(name) {
                    undefined.insert((word.line, name.clone()));
                }
            }
        }
        for (line, name) in undefined {
            let site = self.site(line);
            let span = name_span(site.raw, &name);
            self.msgs.error_at(site, span, Error::UndefinedSymbol(name));
        }

        let mut errs = vec![];
        for (name, entry) in self.prog.entries.iter() {
            if self.prog.externs.contains(name) {
                errs.push((entry.line, Error::EntryIsExternal(name.clone()), name.clone()));
            } else if !self.prog.symbols.contains(name) {
                errs.push((entry.line, Error::UndefinedEntry(name.clone()), name.clone()));
            }
        }
        for (name, ext) in self.prog.externs.iter() {
            if self.prog.symbols.contains(name) {
                errs.push((ext.line, Error::ExternDefinedLocally(name.clone()), name.clone()));
            }
        }
        for (line, err, name) in errs {
            let site = self.site(line);
            let span = name_span(site.raw, &name);
            self.msgs.error_at(site, span, err);
        }
    }
}

/// Span of the first whole-word occurrence of `name`, or the whole line.
fn name_span(raw: &str, name: &str) -> Span {
    let is_word = |c: char| c.is_ascii_alphanumeric();
    let found = raw.match_indices(name).find(|(pos, _)| {
        let before = raw[..*pos].chars().next_back();
        let after = raw[pos + name.len()..].chars().next();
        !before.is_some_and(is_word) && !after.is_some_and(is_word)
    });
    match found {
        Some((pos, _)) => Span::new(pos, pos + name.len()),
        None => Span::new(0, raw.len()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::label::Symbol;

    fn pass(src: &str) -> (Program, Msgs) {
        let mut msgs = Msgs::new("test.am");
        let prog = run(src, &mut msgs);
        (prog, msgs)
    }

    #[test]
    fn counters() {
        let (prog, msgs) = pass("MAIN: mov r1, r2\nLEN: .data 4, 5\n stop\nS: .string \"ab\"\n");
        assert_eq!(msgs.error_count(), 0);
        assert_eq!(prog.image.ic, 103);
        assert_eq!(prog.image.dc, 5);
        assert_eq!(prog.symbols.lookup("MAIN").map(Symbol::value), Some(100));
        assert_eq!(
            prog.symbols.lookup("LEN").map(|s| s.addr),
            Some(Addr::Provisional { ic: 102, dc: 0 })
        );
        assert_eq!(
            prog.symbols.lookup("S").map(|s| s.kind),
            Some(SymbolKind::Data)
        );
    }

    #[test]
    fn duplicate_label() {
        let (prog, msgs) = pass("X: stop\nX: rts\n");
        assert_eq!(msgs.codes(), vec!["AS010"]);
        assert_eq!(prog.symbols.len(), 1);
        assert_eq!(prog.symbols.lookup("X").map(Symbol::value), Some(100));
        assert_eq!(prog.image.ic, 102);
    }

    #[test]
    fn bad_label_keeps_line() {
        let (prog, msgs) = pass("1X: stop\nmov: rts\nr2: stop\n");
        assert_eq!(msgs.codes(), vec!["AS007", "AS008", "AS009"]);
        assert_eq!(prog.image.ic, 103);
        assert!(prog.symbols.is_empty());
    }

    #[test]
    fn line_errors() {
        let (_, msgs) = pass("foo r1\nX:\n.dat 5\n");
        assert_eq!(msgs.codes(), vec!["AS002", "AS004", "AS002"]);
        let long = format!("; {}", "x".repeat(80));
        let (_, msgs) = pass(&long);
        assert_eq!(msgs.codes(), vec!["AS001"]);
    }

    #[test]
    fn operand_errors() {
        let (_, msgs) = pass("mov r1\nmov r1, r2, r3\ninc r1, r2\nlea #1, r1\nmov ,r1\nadd r1 r2\n");
        assert_eq!(
            msgs.codes(),
            vec!["AS003", "AS003", "AS003", "AS022", "AS026", "AS021"]
        );
    }

    #[test]
    fn immediate_out_of_range() {
        let (prog, msgs) = pass("prn #128\n");
        assert_eq!(msgs.codes(), vec!["AS028"]);
        assert_eq!(prog.image.ic, 101);
    }

    #[test]
    fn declarations() {
        let (prog, msgs) = pass("L: .extern W\n.extern W\n.entry MAIN\nMAIN: jsr W\n");
        assert_eq!(msgs.error_count(), 0);
        assert_eq!(msgs.warn_count(), 2);
        assert!(prog.externs.contains("W"));
        assert!(prog.entries.contains("MAIN"));
        assert!(!prog.symbols.contains("L"));
    }

    #[test]
    fn end_checks() {
        let (_, msgs) = pass("jmp NOWHERE\n.entry GHOST\n.extern X\n.entry X\nY: stop\n.extern Y\n");
        assert_eq!(msgs.codes(), vec!["AS040", "AS041", "AS042", "AS043"]);
    }

    #[test]
    fn capacity() {
        let (_, msgs) = pass(".mat [15][10]\n.data 1, 2, 3, 4, 5\n");
        assert_eq!(msgs.codes(), vec!["AS030"]);
        let (_, msgs) = pass(".mat [15][10]\n.mat [1][4]\n");
        assert_eq!(msgs.codes(), Vec::<&str>::new());
    }

    #[test]
    fn spans() {
        assert_eq!(name_span("jmp LOOP", "LOOP"), Span::new(4, 8));
        assert_eq!(name_span("mov XY, X", "X"), Span::new(8, 9));
    }
}

use arch::mode::Mode;
use arch::op::Opcode;
use arch::rule::Role;
use arch::word::{self, Are};

use crate::error::{Error, Fail};
use crate::image::Image;
use crate::label::{Externs, SymbolKind, Symbols};
use crate::msg::{Site, Span};
use crate::operand;

/// One classified operand. `text` borrows from the source line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Operand<'a> {
    pub text: &'a str,
    pub mode: Mode,
}

/// Appends the words of one instruction to the code image.
pub struct Encoder<'a> {
    pub image: &'a mut Image,
    pub symbols: &'a Symbols,
    pub externs: &'a Externs,
    pub site: Site<'a>,
}

impl<'a> Encoder<'a> {
    fn span(&self, text: &str) -> Span {
        Span::of(self.site.raw, text)
    }

    fn push(&mut self, payload: u8, are: Are, label: Option<String>) {
        self.image.push_code(payload, are, label, self.site.line);
    }

    /// Operands must already satisfy the opcode's rule. On failure the words
    /// emitted so far stay in the image.
    pub fn instruction(
        &mut self,
        op: Opcode,
        src: Option<Operand>,
        dst: Option<Operand>,
    ) -> Result<(), Fail> {
        let head = word::opcode_word(op, src.map(|o| o.mode), dst.map(|o| o.mode));
        self.push(head, Are::Absolute, None);

        match (src, dst) {
            (Some(s), Some(d)) if s.mode == Mode::Register && d.mode == Mode::Register => {
                let hi = self.register(s)?;
                let lo = self.register(d)?;
                self.push(word::reg_pair(hi, lo), Are::Absolute, None);
            }
            _ => {
                if let Some(s) = src {
                    self.operand(s, Role::Source)?;
                }
                if let Some(d) = dst {
                    self.operand(d, Role::Destination)?;
                }
            }
        }
        Ok(())
    }

    fn register(&self, o: Operand) -> Result<arch::reg::Reg, Fail> {
        operand::parse_register(o.text)
            .ok_or_else(|| (Error::InvalidDirect(o.text.to_string()), self.span(o.text)))
    }

    fn operand(&mut self, o: Operand, role: Role) -> Result<(), Fail> {
        let span = self.span(o.text);
        match o.mode {
            Mode::Immediate => {
                let v = operand::parse_immediate(o.text).map_err(|e| (e, span))?;
                self.push(v as u8, Are::Absolute, None);
            }
            Mode::Direct => {
                operand::check_direct(o.text).map_err(|e| (e, span))?;
                self.direct(o.text);
            }
            Mode::Register => {
                let reg = self.register(o)?;
                let payload = match role {
                    Role::Source => word::reg_src(reg),
                    Role::Destination => word::reg_dst(reg),
                };
                self.push(payload, Are::Absolute, None);
            }
            Mode::Matrix => {
                let m = operand::parse_matrix(o.text).map_err(|e| e.locate(span.start))?;
                self.direct(m.label);
                self.push(word::reg_pair(m.row.reg, m.col.reg), Are::Absolute, None);
            }
        }
        Ok(())
    }

    /// Symbol reference word. Unknown symbols get a placeholder that the
    /// second pass fills in.
    fn direct(&mut self, name: &str) {
        let (payload, are) = match self.symbols.lookup(name) {
            Some(sym) if sym.kind == SymbolKind::External => (0, Are::External),
            Some(sym) => (sym.value() as u8, Are::Relocatable),
            None if self.externs.contains(name) => (0, Are::External),
            None => (0, Are::Absolute),
        };
        self.push(payload, are, Some(name.to_string()));
    }
}

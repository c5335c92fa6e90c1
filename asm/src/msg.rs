use color_print::{cformat, cprintln};

use crate::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Error,
    Warn,
    Note,
}

/// Byte columns `[start, end)` within one source line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Span {
            start,
            end: end.max(start + 1),
        }
    }

    /// Span of `part`, which must be a subslice of `line`.
    pub fn of(line: &str, part: &str) -> Self {
        let start = (part.as_ptr() as usize).saturating_sub(line.as_ptr() as usize);
        Span::new(start, start + part.len())
    }

    pub fn shift(self, by: usize) -> Self {
        Span::new(self.start + by, self.end + by)
    }
}

/// A source line a diagnostic is attached to. `line` is 1-based.
#[derive(Debug, Clone, Copy)]
pub struct Site<'a> {
    pub line: usize,
    pub raw: &'a str,
}

#[derive(Debug, Clone)]
pub struct Source {
    pub line: usize,
    pub raw: String,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct Diag {
    pub level: Level,
    pub code: Option<&'static str>,
    pub msg: String,
    pub source: Option<Source>,
}

impl Diag {
    pub fn print(&self, file: &str) {
        let code = self.code.map(|c| format!("[{c}]")).unwrap_or_default();
        match self.level {
            Level::Error => cprintln!("<red,bold>error{}</>: {}", code, self.msg),
            Level::Warn => cprintln!("<yellow,bold>warn{}</>: {}", code, self.msg),
            Level::Note => cprintln!("<green,bold>note{}</>: {}", code, self.msg),
        }
        match &self.source {
            Some(src) => {
                cprintln!(
                    "     <blue>--></> <underline>{}:{}:{}</>",
                    file,
                    src.line,
                    src.span.start + 1
                );
                cprintln!("      <blue>|</>");
                cprintln!(" <blue>{:>4} |</> {}", src.line, src.raw);
                cprintln!("      <blue>|</> {}", self.underline(src));
            }
            None => cprintln!("     <blue>--></> <underline>{}</>", file),
        }
    }

    fn underline(&self, src: &Source) -> String {
        let len = src.raw.len();
        let start = src.span.start.min(len);
        let end = src.span.end.min(len.max(start + 1));
        let carets = "^".repeat(end - start);
        let pad = " ".repeat(start);
        match self.level {
            Level::Error => cformat!("{}<red,bold>{}</>", pad, carets),
            Level::Warn => cformat!("{}<yellow,bold>{}</>", pad, carets),
            Level::Note => cformat!("{}<green,bold>{}</>", pad, carets),
        }
    }
}

/// Diagnostics collected while assembling one file.
#[derive(Debug, Default)]
pub struct Msgs {
    file: String,
    diags: Vec<Diag>,
    errors: usize,
    warns: usize,
}

impl Msgs {
    pub fn new(file: &str) -> Self {
        Msgs {
            file: file.to_string(),
            diags: vec![],
            errors: 0,
            warns: 0,
        }
    }

    fn push(&mut self, level: Level, err: &Error, source: Option<Source>) {
        match level {
            Level::Error => self.errors += 1,
            Level::Warn => self.warns += 1,
            Level::Note => {}
        }
        self.diags.push(Diag {
            level,
            code: Some(err.code()),
            msg: err.to_string(),
            source,
        });
    }

    fn source(at: Site, span: Span) -> Option<Source> {
        Some(Source {
            line: at.line,
            raw: at.raw.to_string(),
            span,
        })
    }

    /// Error not tied to any source line.
    pub fn error(&mut self, err: Error) {
        self.push(Level::Error, &err, None);
    }

    pub fn error_at(&mut self, at: Site, span: Span, err: Error) {
        self.push(Level::Error, &err, Self::source(at, span));
    }

    pub fn fail_at(&mut self, at: Site, (err, span): crate::error::Fail) {
        self.error_at(at, span, err);
    }

    pub fn warn_at(&mut self, at: Site, span: Span, err: Error) {
        self.push(Level::Warn, &err, Self::source(at, span));
    }

    pub fn note_at(&mut self, at: Site, span: Span, msg: String) {
        self.diags.push(Diag {
            level: Level::Note,
            code: None,
            msg,
            source: Self::source(at, span),
        });
    }

    /// Errors reported so far, including flushed ones.
    pub fn error_count(&self) -> usize {
        self.errors
    }

    pub fn warn_count(&self) -> usize {
        self.warns
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diag> {
        self.diags.iter()
    }

    /// Codes of all errors, in report order.
    pub fn codes(&self) -> Vec<&'static str> {
        self.diags
            .iter()
            .filter(|d| d.level == Level::Error)
            .filter_map(|d| d.code)
            .collect()
    }

    /// Prints and forgets everything collected so far.
    pub fn flush(&mut self) {
        for diag in &self.diags {
            diag.print(&self.file);
        }
        self.diags.clear();
    }
}

use indexmap::IndexMap;
use strum::Display;

use crate::image::Addr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum SymbolKind {
    #[strum(serialize = "code")]
    Code,
    #[strum(serialize = "data")]
    Data,
    #[strum(serialize = "external")]
    External,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    pub addr: Addr,
    pub kind: SymbolKind,
    /// Line of the definition, 1-based.
    pub line: usize,
}

impl Symbol {
    pub fn value(&self) -> u16 {
        self.addr.value()
    }
}

/// Symbol table in definition order.
#[derive(Debug, Clone, Default)]
pub struct Symbols(IndexMap<String, Symbol>);

impl Symbols {
    pub fn new() -> Self {
        Symbols(IndexMap::new())
    }

    pub fn lookup(&self, name: &str) -> Option<&Symbol> {
        self.0.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Inserts a symbol, or overwrites the existing one in place.
    /// Returns the previous value.
    pub fn insert_or_update(
        &mut self,
        name: &str,
        addr: Addr,
        kind: SymbolKind,
        line: usize,
    ) -> Option<Symbol> {
        self.0.insert(name.to_string(), Symbol { addr, kind, line })
    }

    /// Moves every data symbol behind the final code segment.
    pub fn relocate(&mut self, final_ic: u16) {
        for sym in self.0.values_mut() {
            if sym.kind == SymbolKind::Data {
                sym.addr = sym.addr.relocate(final_ic);
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Symbol)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub line: usize,
    pub addr: Option<u16>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extern {
    pub line: usize,
    /// Code addresses that refer to this symbol.
    pub uses: Vec<u16>,
}

/// `.entry` declarations, each name once.
#[derive(Debug, Clone, Default)]
pub struct Entries(IndexMap<String, Entry>);

impl Entries {
    pub fn new() -> Self {
        Entries(IndexMap::new())
    }

    /// Returns false if the name was already declared.
    pub fn declare(&mut self, name: &str, line: usize) -> bool {
        if self.0.contains_key(name) {
            return false;
        }
        self.0.insert(name.to_string(), Entry { line, addr: None });
        true
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Entry)> {
        self.0.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&String, &mut Entry)> {
        self.0.iter_mut()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// `.extern` declarations, each name once.
#[derive(Debug, Clone, Default)]
pub struct Externs(IndexMap<String, Extern>);

impl Externs {
    pub fn new() -> Self {
        Externs(IndexMap::new())
    }

    /// Returns false if the name was already declared.
    pub fn declare(&mut self, name: &str, line: usize) -> bool {
        if self.0.contains_key(name) {
            return false;
        }
        self.0.insert(name.to_string(), Extern { line, uses: vec![] });
        true
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Extern> {
        self.0.get_mut(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Extern)> {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn any_use(&self) -> bool {
        self.0.values().any(|e| !e.uses.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_update() {
        let mut syms = Symbols::new();
        assert!(syms
            .insert_or_update("MAIN", Addr::Fixed(100), SymbolKind::Code, 1)
            .is_none());
        syms.insert_or_update("LEN", Addr::Provisional { ic: 103, dc: 2 }, SymbolKind::Data, 4);
        assert_eq!(syms.lookup("LEN").map(Symbol::value), Some(105));
        assert!(syms.lookup("len").is_none());

        let prev = syms.insert_or_update("MAIN", Addr::Fixed(101), SymbolKind::Code, 9);
        assert_eq!(prev.map(|s| s.value()), Some(100));
        assert_eq!(syms.len(), 2);
        assert_eq!(syms.iter().next().map(|(k, _)| k.as_str()), Some("MAIN"));
    }

    #[test]
    fn relocate_once() {
        let mut syms = Symbols::new();
        syms.insert_or_update("A", Addr::Fixed(100), SymbolKind::Code, 1);
        syms.insert_or_update("D", Addr::Provisional { ic: 100, dc: 3 }, SymbolKind::Data, 2);
        syms.relocate(110);
        assert_eq!(syms.lookup("A").map(Symbol::value), Some(100));
        assert_eq!(syms.lookup("D").map(|s| s.addr), Some(Addr::Fixed(113)));
        syms.relocate(120);
        assert_eq!(syms.lookup("D").map(Symbol::value), Some(113));
    }

    #[test]
    fn declarations() {
        let mut ents = Entries::new();
        assert!(ents.declare("MAIN", 1));
        assert!(!ents.declare("MAIN", 2));
        assert_eq!(ents.iter().count(), 1);

        let mut exts = Externs::new();
        assert!(exts.declare("W", 1));
        assert!(!exts.any_use());
        if let Some(ext) = exts.get_mut("W") {
            ext.uses.push(104);
        }
        assert!(exts.any_use());
    }
}

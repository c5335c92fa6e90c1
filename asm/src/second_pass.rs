use arch::word::Are;

use crate::error::Error;
use crate::image::Addr;
use crate::label::SymbolKind;
use crate::msg::Msgs;
use crate::Program;

/// Relocates the data segment, resolves symbolic code words and completes
/// entry addresses. Requires a first pass without errors.
pub fn run(prog: &mut Program, msgs: &mut Msgs) -> bool {
    let errors = msgs.error_count();
    if errors > 0 {
        msgs.error(Error::SecondPassSkipped(errors));
        return false;
    }

    let final_ic = prog.image.ic;
    prog.symbols.relocate(final_ic);
    prog.image.relocate_data();

    for word in prog.image.code.iter_mut() {
        let name = match word.label.take() {
            Some(name) => name,
            None => continue,
        };
        match prog.symbols.lookup(&name) {
            Some(sym) if sym.kind != SymbolKind::External => {
                word.payload = sym.value() as u8;
                word.are = Are::Relocatable;
                continue;
            }
            _ => {}
        }
        match prog.externs.get_mut(&name) {
            Some(ext) => {
                ext.uses.push(word.addr);
                word.payload = 0;
                word.are = Are::External;
                let line = ext.line;
                prog.symbols
                    .insert_or_update(&name, Addr::Fixed(0), SymbolKind::External, line);
            }
            None => word.label = Some(name),
        }
    }

    for (name, entry) in prog.entries.iter_mut() {
        entry.addr = prog.symbols.lookup(name).map(|s| s.value());
        if entry.addr.is_none() {
            msgs.error(Error::UndefinedEntry(name.clone()));
        }
    }

    msgs.error_count() == 0
}

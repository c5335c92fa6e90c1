use arch::op::{Directive, Opcode};
use arch::reg::Reg;
use indexmap::IndexSet;
use once_cell::sync::Lazy;
use strum::IntoEnumIterator;

use crate::MAX_LABEL_LEN;

/// Lowercase words that can never name a label or macro.
pub static RESERVED: Lazy<IndexSet<String>> = Lazy::new(|| {
    let mut set = IndexSet::new();
    for op in Opcode::iter() {
        set.insert(op.to_string());
    }
    for dir in Directive::iter() {
        set.insert(dir.to_string());
        set.insert(format!(".{dir}"));
    }
    set.insert("mcro".to_string());
    set.insert("mcroend".to_string());
    set
});

pub fn is_reserved(name: &str) -> bool {
    RESERVED.contains(&name.to_ascii_lowercase())
}

pub fn is_register(name: &str) -> bool {
    Reg::parse(name).is_ok()
}

/// Letter first, then letters and digits.
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => chars.all(|c| c.is_ascii_alphanumeric()),
        _ => false,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelFault {
    Empty,
    TooLong,
    Invalid,
    Reserved,
    Register,
}

pub fn check_label(name: &str) -> Result<(), LabelFault> {
    if name.is_empty() {
        Err(LabelFault::Empty)
    } else if name.len() > MAX_LABEL_LEN {
        Err(LabelFault::TooLong)
    } else if !is_identifier(name) {
        Err(LabelFault::Invalid)
    } else if is_register(name) {
        Err(LabelFault::Register)
    } else if is_reserved(name) {
        Err(LabelFault::Reserved)
    } else {
        Ok(())
    }
}

/// Macro names additionally allow `_` after the first letter.
pub fn check_macro_name(name: &str) -> Result<(), LabelFault> {
    let mut chars = name.chars();
    let shape = match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => chars.all(|c| c.is_ascii_alphanumeric() || c == '_'),
        _ => false,
    };
    if name.is_empty() {
        Err(LabelFault::Empty)
    } else if name.len() > MAX_LABEL_LEN {
        Err(LabelFault::TooLong)
    } else if !shape {
        Err(LabelFault::Invalid)
    } else if is_register(name) {
        Err(LabelFault::Register)
    } else if is_reserved(name) {
        Err(LabelFault::Reserved)
    } else {
        Ok(())
    }
}

#[test]
fn test() {
    assert_eq!(check_label("LOOP"), Ok(()));
    assert_eq!(check_label("x1"), Ok(()));
    assert_eq!(check_label(""), Err(LabelFault::Empty));
    assert_eq!(check_label(&"A".repeat(32)), Err(LabelFault::TooLong));
    assert_eq!(check_label(&"A".repeat(31)), Ok(()));
    assert_eq!(check_label("1abc"), Err(LabelFault::Invalid));
    assert_eq!(check_label("a_b"), Err(LabelFault::Invalid));
    assert_eq!(check_label("mov"), Err(LabelFault::Reserved));
    assert_eq!(check_label("DATA"), Err(LabelFault::Reserved));
    assert_eq!(check_label("mcroend"), Err(LabelFault::Reserved));
    assert_eq!(check_label("r3"), Err(LabelFault::Register));
    assert_eq!(check_label("r8"), Ok(()));
    assert_eq!(check_macro_name("my_macro"), Ok(()));
    assert_eq!(check_macro_name("_m"), Err(LabelFault::Invalid));
    assert_eq!(check_macro_name("stop"), Err(LabelFault::Reserved));
}

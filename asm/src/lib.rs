pub mod directive;
pub mod encoder;
pub mod error;
pub mod first_pass;
pub mod ident;
pub mod image;
pub mod label;
pub mod macros;
pub mod msg;
pub mod operand;
pub mod output;
pub mod parser;
pub mod second_pass;
pub mod util;

use image::Image;
use label::{Entries, Externs, Symbols};
use msg::Msgs;

pub const MAX_LABEL_LEN: usize = 31;
pub const MAX_LINE_LEN: usize = 80;
pub const MAX_PATH_LEN: usize = 512;

/// Everything one source file assembles into.
#[derive(Debug, Clone, Default)]
pub struct Program {
    pub symbols: Symbols,
    pub image: Image,
    pub entries: Entries,
    pub externs: Externs,
}

/// Runs both passes over macro-expanded source. Returns `None` if any
/// error was reported.
pub fn assemble(src: &str, msgs: &mut Msgs) -> Option<Program> {
    let mut prog = first_pass::run(src, msgs);
    if second_pass::run(&mut prog, msgs) {
        Some(prog)
    } else {
        None
    }
}

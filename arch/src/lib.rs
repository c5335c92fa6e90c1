pub mod base4;
pub mod mode;
pub mod op;
pub mod reg;
pub mod rule;
pub mod word;

/// First address of the code segment.
pub const IC_BASE: u16 = 100;

/// `IC + DC` must stay strictly below this value.
pub const ADDR_LIMIT: u16 = 255;

/// Largest number of words an object file may hold.
pub const OBJECT_WORD_LIMIT: usize = 255;

/// Letters used for an address in the output files.
pub const ADDR_WIDTH: usize = 4;

/// Letters used for a 10-bit word in the object file.
pub const WORD_WIDTH: usize = 5;

/// Signed range shared by immediates and data words.
pub const VALUE_MIN: i64 = -128;
pub const VALUE_MAX: i64 = 127;

pub fn in_range(v: i64) -> bool {
    (VALUE_MIN..=VALUE_MAX).contains(&v)
}

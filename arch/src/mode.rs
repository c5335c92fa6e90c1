use num_enum::{IntoPrimitive, TryFromPrimitive};
use std::fmt;
use strum::{Display, EnumIter, IntoEnumIterator};

/// Addressing mode of one operand. The discriminant is the 2-bit field
/// written into the opcode word.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, IntoPrimitive, TryFromPrimitive, EnumIter, Display,
)]
#[repr(u8)]
pub enum Mode {
    #[strum(serialize = "immediate")]
    Immediate = 0,
    #[strum(serialize = "direct")]
    Direct = 1,
    #[strum(serialize = "matrix")]
    Matrix = 2,
    #[strum(serialize = "register")]
    Register = 3,
}

impl Mode {
    pub fn bits(self) -> u8 {
        self.into()
    }

    /// Field value for an optional operand. An absent operand encodes as 0.
    pub fn field(mode: Option<Mode>) -> u8 {
        mode.map(Mode::bits).unwrap_or(0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ModeSet(u8);

impl ModeSet {
    pub const NONE: ModeSet = ModeSet(0);
    pub const ALL: ModeSet = ModeSet(0b1111);
    /// Direct, matrix and register.
    pub const WRITABLE: ModeSet = ModeSet::of(&[Mode::Direct, Mode::Matrix, Mode::Register]);
    /// Direct and matrix.
    pub const MEMORY: ModeSet = ModeSet::of(&[Mode::Direct, Mode::Matrix]);

    pub const fn of(modes: &[Mode]) -> ModeSet {
        let mut bits = 0;
        let mut i = 0;
        while i < modes.len() {
            bits |= 1 << (modes[i] as u8);
            i += 1;
        }
        ModeSet(bits)
    }

    pub fn contains(&self, mode: Mode) -> bool {
        self.0 & (1 << mode.bits()) != 0
    }

    pub fn iter(&self) -> impl Iterator<Item = Mode> + '_ {
        Mode::iter().filter(|m| self.contains(*m))
    }
}

/// Renders the sorted mode numbers, e.g. `1,2,3`.
impl fmt::Display for ModeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let list: Vec<String> = self.iter().map(|m| m.bits().to_string()).collect();
        write!(f, "{}", list.join(","))
    }
}

#[test]
fn test() {
    assert!(ModeSet::ALL.contains(Mode::Immediate));
    assert!(!ModeSet::WRITABLE.contains(Mode::Immediate));
    assert!(ModeSet::MEMORY.contains(Mode::Matrix));
    assert!(!ModeSet::MEMORY.contains(Mode::Register));
    assert_eq!(ModeSet::NONE.iter().count(), 0);
    assert_eq!(ModeSet::ALL.to_string(), "0,1,2,3");
    assert_eq!(ModeSet::WRITABLE.to_string(), "1,2,3");
    assert_eq!(ModeSet::MEMORY.to_string(), "1,2");
    assert_eq!(Mode::field(None), 0);
    assert_eq!(Mode::field(Some(Mode::Register)), 3);
    assert_eq!(Mode::Matrix.to_string(), "matrix");
}

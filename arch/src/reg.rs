use num_enum::{IntoPrimitive, TryFromPrimitive};
use strum::{Display, EnumIter, EnumString};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    IntoPrimitive,
    TryFromPrimitive,
    EnumString,
    EnumIter,
    Display,
)]
#[repr(u8)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Reg {
    R0,
    R1,
    R2,
    R3,
    R4,
    R5,
    R6,
    R7,
}

/// Result of checking a token that should name a register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegCheck {
    Valid(Reg),
    /// Has the `r` prefix but the rest is not a digit 0-7.
    BadRegister,
    /// Does not start with `r` at all.
    NotRegister,
}

impl Reg {
    pub fn parse(s: &str) -> Result<Self, String> {
        match s.parse::<Self>() {
            Ok(r) => Ok(r),
            Err(_) => Err(format!("Unknown reg name: {s}")),
        }
    }

    pub fn check(s: &str) -> RegCheck {
        match s.chars().next() {
            Some('r') | Some('R') => match Reg::parse(s) {
                Ok(r) => RegCheck::Valid(r),
                Err(_) => RegCheck::BadRegister,
            },
            _ => RegCheck::NotRegister,
        }
    }

    pub fn id(self) -> u8 {
        self.into()
    }
}

#[test]
fn test() {
    assert_eq!(Reg::parse("r3"), Ok(Reg::R3));
    assert_eq!(Reg::parse("R7"), Ok(Reg::R7));
    assert!(Reg::parse("r8").is_err());
    assert!(Reg::parse("r").is_err());
    assert_eq!(Reg::check("r5"), RegCheck::Valid(Reg::R5));
    assert_eq!(Reg::check("r8"), RegCheck::BadRegister);
    assert_eq!(Reg::check("r12"), RegCheck::BadRegister);
    assert_eq!(Reg::check("x1"), RegCheck::NotRegister);
    assert_eq!(Reg::R6.id(), 6);
    assert_eq!(Reg::R2.to_string(), "r2");
}

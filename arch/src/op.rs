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
pub enum Opcode {
    MOV = 0,
    CMP,
    ADD,
    SUB,
    NOT,
    CLR,
    LEA,
    INC,
    DEC,
    JMP,
    BNE,
    RED,
    PRN,
    JSR,
    RTS,
    STOP,
}

impl Opcode {
    pub fn parse(s: &str) -> Result<Self, String> {
        match s.parse::<Self>() {
            Ok(op) => Ok(op),
            Err(_) => Err(format!("Undefined Op: {s}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, EnumIter, Display)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Directive {
    DATA,
    STRING,
    MAT,
    ENTRY,
    EXTERN,
}

impl Directive {
    /// Parses a directive token, which must carry its leading dot.
    pub fn parse(s: &str) -> Result<Self, String> {
        s.strip_prefix('.')
            .and_then(|name| name.parse::<Self>().ok())
            .ok_or_else(|| format!("Undefined directive: {s}"))
    }

    /// Directives that reserve words in the data image.
    pub fn is_storage(&self) -> bool {
        matches!(self, Directive::DATA | Directive::STRING | Directive::MAT)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Op(Opcode),
    Dir(Directive),
}

impl Command {
    pub fn parse(s: &str) -> Option<Self> {
        if s.starts_with('.') {
            Directive::parse(s).ok().map(Command::Dir)
        } else {
            Opcode::parse(s).ok().map(Command::Op)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opcode_values() {
        assert_eq!(u8::from(Opcode::MOV), 0);
        assert_eq!(u8::from(Opcode::LEA), 6);
        assert_eq!(u8::from(Opcode::STOP), 15);
        assert_eq!(Opcode::try_from(13u8), Ok(Opcode::JSR));
        assert!(Opcode::try_from(16u8).is_err());
    }

    #[test]
    fn parse_commands() {
        assert_eq!(Command::parse("mov"), Some(Command::Op(Opcode::MOV)));
        assert_eq!(Command::parse("STOP"), Some(Command::Op(Opcode::STOP)));
        assert_eq!(Command::parse(".data"), Some(Command::Dir(Directive::DATA)));
        assert_eq!(Command::parse(".Extern"), Some(Command::Dir(Directive::EXTERN)));
        assert_eq!(Command::parse("data"), None);
        assert_eq!(Command::parse(".mov"), None);
        assert_eq!(Command::parse("hoge"), None);
    }

    #[test]
    fn display() {
        assert_eq!(Opcode::PRN.to_string(), "prn");
        assert_eq!(Directive::MAT.to_string(), "mat");
    }
}

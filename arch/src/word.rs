use crate::mode::Mode;
use crate::op::Opcode;
use crate::reg::Reg;
use num_enum::{IntoPrimitive, TryFromPrimitive};
use strum::Display;

/// Relocation tag stored in the low two bits of every code word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, IntoPrimitive, TryFromPrimitive, Display)]
#[repr(u8)]
pub enum Are {
    #[default]
    #[strum(serialize = "A")]
    Absolute = 0,
    #[strum(serialize = "E")]
    External = 1,
    #[strum(serialize = "R")]
    Relocatable = 2,
}

const WORD_MASK: u16 = 0x3FF;

/// `opcode:4 | src:2 | dst:2`
pub fn opcode_word(op: Opcode, src: Option<Mode>, dst: Option<Mode>) -> u8 {
    (u8::from(op) << 4) | (Mode::field(src) << 2) | Mode::field(dst)
}

pub fn reg_src(r: Reg) -> u8 {
    r.id() << 4
}

pub fn reg_dst(r: Reg) -> u8 {
    r.id()
}

/// Two register ids in one payload, first in the high nibble.
pub fn reg_pair(hi: Reg, lo: Reg) -> u8 {
    (hi.id() << 4) | lo.id()
}

/// 10-bit value of a code word: payload followed by its relocation tag.
pub fn pack(payload: u8, are: Are) -> u16 {
    ((payload as u16) << 2) | u8::from(are) as u16
}

/// 10-bit two's complement value of a data word.
pub fn data(value: i16) -> u16 {
    (value as u16) & WORD_MASK
}

#[test]
fn test() {
    assert_eq!(opcode_word(Opcode::MOV, Some(Mode::Register), Some(Mode::Register)), 0b0000_1111);
    assert_eq!(opcode_word(Opcode::LEA, Some(Mode::Matrix), Some(Mode::Direct)), 0x69);
    assert_eq!(opcode_word(Opcode::STOP, None, None), 0xF0);
    assert_eq!(opcode_word(Opcode::PRN, None, Some(Mode::Immediate)), 0xC0);
    assert_eq!(reg_src(Reg::R3), 0x30);
    assert_eq!(reg_dst(Reg::R3), 0x03);
    assert_eq!(reg_pair(Reg::R1, Reg::R2), 0x12);
    assert_eq!(pack(0xFF, Are::Relocatable), 0x3FE);
    assert_eq!(pack(1, Are::External), 0b101);
    assert_eq!(data(-1), 0x3FF);
    assert_eq!(data(-128), 0x380);
    assert_eq!(data(127), 127);
    assert_eq!(Are::External.to_string(), "E");
}

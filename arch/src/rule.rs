use crate::mode::{Mode, ModeSet};
use crate::op::Opcode;
use strum::Display;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Role {
    #[strum(serialize = "source operand")]
    Source,
    #[strum(serialize = "destination operand")]
    Destination,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModeError {
    #[error("wrong operand count for '{op}' (got {got}, expected {expected})")]
    Count {
        op: Opcode,
        got: usize,
        expected: String,
    },

    #[error("'{0}' takes a destination operand only")]
    UnexpectedSource(Opcode),

    #[error("missing {role} for '{op}'")]
    Missing { op: Opcode, role: Role },

    #[error("illegal addressing mode {bits} ({mode}) for {role} of '{op}' (allowed: {allowed})", bits = .mode.bits())]
    Illegal {
        op: Opcode,
        role: Role,
        mode: Mode,
        allowed: ModeSet,
    },
}

#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub op: Opcode,
    pub min: usize,
    pub max: usize,
    pub src: ModeSet,
    pub dst: ModeSet,
}

impl Rule {
    const fn new(op: Opcode, count: usize, src: ModeSet, dst: ModeSet) -> Rule {
        Rule {
            op,
            min: count,
            max: count,
            src,
            dst,
        }
    }

    fn expected(&self) -> String {
        if self.min == self.max {
            format!("{}", self.min)
        } else {
            format!("{}-{}", self.min, self.max)
        }
    }
}

const ALL: ModeSet = ModeSet::ALL;
const WR: ModeSet = ModeSet::WRITABLE;
const MEM: ModeSet = ModeSet::MEMORY;
const NONE: ModeSet = ModeSet::NONE;

/// Indexed by opcode value.
pub const RULES: [Rule; 16] = [
    Rule::new(Opcode::MOV, 2, ALL, WR),
    Rule::new(Opcode::CMP, 2, ALL, ALL),
    Rule::new(Opcode::ADD, 2, WR, WR),
    Rule::new(Opcode::SUB, 2, WR, WR),
    Rule::new(Opcode::NOT, 1, NONE, WR),
    Rule::new(Opcode::CLR, 1, NONE, WR),
    Rule::new(Opcode::LEA, 2, MEM, WR),
    Rule::new(Opcode::INC, 1, NONE, WR),
    Rule::new(Opcode::DEC, 1, NONE, WR),
    Rule::new(Opcode::JMP, 1, NONE, WR),
    Rule::new(Opcode::BNE, 1, NONE, WR),
    Rule::new(Opcode::RED, 1, NONE, WR),
    Rule::new(Opcode::PRN, 1, NONE, ALL),
    Rule::new(Opcode::JSR, 1, NONE, WR),
    Rule::new(Opcode::RTS, 0, NONE, NONE),
    Rule::new(Opcode::STOP, 0, NONE, NONE),
];

pub fn rule(op: Opcode) -> &'static Rule {
    &RULES[u8::from(op) as usize]
}

/// Checks operand count and addressing modes of one instruction.
///
/// A count mismatch is reported alone. Otherwise every offending operand is
/// reported.
pub fn validate(
    op: Opcode,
    count: usize,
    src: Option<Mode>,
    dst: Option<Mode>,
) -> Result<(), Vec<ModeError>> {
    let rule = rule(op);

    if count < rule.min || count > rule.max {
        return Err(vec![ModeError::Count {
            op,
            got: count,
            expected: rule.expected(),
        }]);
    }

    let mut errs = vec![];

    if count == 1 && src.is_some() {
        errs.push(ModeError::UnexpectedSource(op));
    }

    if count == 2 {
        match src {
            Some(mode) if !rule.src.contains(mode) => errs.push(ModeError::Illegal {
                op,
                role: Role::Source,
                mode,
                allowed: rule.src,
            }),
            Some(_) => {}
            None => errs.push(ModeError::Missing {
                op,
                role: Role::Source,
            }),
        }
    }

    if count >= 1 {
        match dst {
            Some(mode) if !rule.dst.contains(mode) => errs.push(ModeError::Illegal {
                op,
                role: Role::Destination,
                mode,
                allowed: rule.dst,
            }),
            Some(_) => {}
            None => errs.push(ModeError::Missing {
                op,
                role: Role::Destination,
            }),
        }
    }

    if errs.is_empty() {
        Ok(())
    } else {
        Err(errs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Mode::*;

    #[test]
    fn table_order() {
        for (idx, rule) in RULES.iter().enumerate() {
            assert_eq!(u8::from(rule.op) as usize, idx);
        }
    }

    #[test]
    fn accepts() {
        assert_eq!(validate(Opcode::MOV, 2, Some(Immediate), Some(Register)), Ok(()));
        assert_eq!(validate(Opcode::CMP, 2, Some(Immediate), Some(Immediate)), Ok(()));
        assert_eq!(validate(Opcode::LEA, 2, Some(Matrix), Some(Direct)), Ok(()));
        assert_eq!(validate(Opcode::PRN, 1, None, Some(Immediate)), Ok(()));
        assert_eq!(validate(Opcode::STOP, 0, None, None), Ok(()));
    }

    #[test]
    fn count_short_circuits() {
        let errs = validate(Opcode::MOV, 1, None, Some(Immediate)).unwrap_err();
        assert_eq!(errs.len(), 1);
        assert_eq!(
            errs[0].to_string(),
            "wrong operand count for 'mov' (got 1, expected 2)"
        );
        let errs = validate(Opcode::RTS, 1, None, Some(Register)).unwrap_err();
        assert!(matches!(errs[0], ModeError::Count { got: 1, .. }));
    }

    #[test]
    fn illegal_modes() {
        let errs = validate(Opcode::LEA, 2, Some(Register), Some(Immediate)).unwrap_err();
        assert_eq!(errs.len(), 2);
        assert_eq!(
            errs[0].to_string(),
            "illegal addressing mode 3 (register) for source operand of 'lea' (allowed: 1,2)"
        );
        assert_eq!(
            errs[1].to_string(),
            "illegal addressing mode 0 (immediate) for destination operand of 'lea' (allowed: 1,2,3)"
        );
        let errs = validate(Opcode::ADD, 2, Some(Immediate), Some(Register)).unwrap_err();
        assert!(matches!(
            errs[0],
            ModeError::Illegal {
                role: Role::Source,
                ..
            }
        ));
    }

    #[test]
    fn spurious_source() {
        let errs = validate(Opcode::INC, 1, Some(Register), Some(Register)).unwrap_err();
        assert_eq!(errs, vec![ModeError::UnexpectedSource(Opcode::INC)]);
    }

    #[test]
    fn missing_operand() {
        let errs = validate(Opcode::SUB, 2, Some(Register), None).unwrap_err();
        assert_eq!(
            errs,
            vec![ModeError::Missing {
                op: Opcode::SUB,
                role: Role::Destination
            }]
        );
    }
}

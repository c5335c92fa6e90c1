use arch::reg::Reg;
use quadasm::operand::{parse_matrix, MatrixFault};

fn case(tok: &str, expect: Result<(&str, Reg, Reg), (MatrixFault, &str)>) {
    let res = parse_matrix(tok);
    match (res, expect) {
        (Ok(m), Ok((label, row, col))) => {
            assert_eq!(m.label, label);
            assert_eq!(m.row.reg, row);
            assert_eq!(m.col.reg, col);
        }
        (Err(err), Err((fault, text))) => {
            assert_eq!(err.fault, fault);
            assert_eq!(err.text, text);
            assert_eq!(&tok[err.at..err.end], text);
        }
        (res, expect) => panic!("got {:?}, expected {:?}", res, expect),
    }
}

macro_rules! case {
    ($name:ident, $tok:expr, $expect:expr) => {
        #[test]
        fn $name() {
            case($tok, $expect);
        }
    };
}

case!(plain, "M[r2][r5]", Ok(("M", Reg::R2, Reg::R5)));
case!(upper_regs, "MAT[R0][R7]", Ok(("MAT", Reg::R0, Reg::R7)));
case!(spaced, " M [ r1 ] [ r3 ] ", Ok(("M", Reg::R1, Reg::R3)));
case!(gap_between, "M[r1]  [r2]", Ok(("M", Reg::R1, Reg::R2)));

case!(no_brackets, "M", Err((MatrixFault::NoBrackets, "M")));
case!(one_pair, "M[r1]", Err((MatrixFault::NoBrackets, "M[r1]")));
case!(unclosed, "M[r1][r2", Err((MatrixFault::NoBrackets, "M[r1][r2")));
case!(empty_label, "[r1][r2]", Err((MatrixFault::EmptyLabel, "[")));
case!(
    label_too_long,
    "NOLABELNOLABELNOLABELNOLABELNOLABEL[r1][r2]",
    Err((
        MatrixFault::LabelTooLong,
        "NOLABELNOLABELNOLABELNOLABELNOLABEL"
    ))
);
case!(empty_first, "M[][r1]", Err((MatrixFault::EmptyIndex, "[]")));
case!(empty_second, "M[r1][ ]", Err((MatrixFault::EmptyIndex, "[ ]")));
case!(bad_register, "M[r8][r1]", Err((MatrixFault::BadRegister, "r8")));
case!(bad_second, "M[r1][r12]", Err((MatrixFault::BadRegister, "r12")));
case!(
    bad_before_non,
    "M[x][r9]",
    Err((MatrixFault::BadRegister, "r9"))
);
case!(non_register, "M[r1][#2]", Err((MatrixFault::NotRegister, "#2")));
case!(junk_between, "M[r1]x[r2]", Err((MatrixFault::JunkBetween, "x")));
case!(
    junk_after_space,
    "M[r1] xy [r2]",
    Err((MatrixFault::JunkBetween, "xy "))
);
case!(invalid_label, "1M[r1][r2]", Err((MatrixFault::InvalidLabel, "1M")));
case!(trailing, "M[r1][r2]z", Err((MatrixFault::Trailing, "z")));

#[test]
fn empty_index_beats_register() {
    let err = parse_matrix("M[][r9]").unwrap_err();
    assert_eq!(err.fault, MatrixFault::EmptyIndex);
}

#[test]
fn label_checked_before_index() {
    let err = parse_matrix(" [r9][]").unwrap_err();
    assert_eq!(err.fault, MatrixFault::EmptyLabel);
}

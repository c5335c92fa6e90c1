use arch::rule::ModeError;
use thiserror::Error;

use crate::msg::Span;

/// A diagnostic plus the columns it points at.
pub type Fail = (Error, Span);

#[derive(Error, Debug)]
pub enum Error {
    // Line structure
    #[error("line is longer than {0} characters")]
    LineTooLong(usize),

    #[error("unknown instruction or directive: `{0}`")]
    UnknownCommand(String),

    #[error("label without instruction or directive")]
    MissingCommand,

    // Labels
    #[error("empty label before ':'")]
    EmptyLabel,

    #[error("label `{0}` is longer than {1} characters")]
    LabelTooLong(String, usize),

    #[error("invalid label `{0}`: must start with a letter and contain only letters and digits")]
    InvalidLabel(String),

    #[error("label `{0}` is a reserved word")]
    ReservedLabel(String),

    #[error("label `{0}` is a register name")]
    RegisterLabel(String),

    #[error("duplicate label `{0}`")]
    DuplicateLabel(String),

    // .entry / .extern
    #[error("missing label after `.{0}`")]
    MissingSymbolArg(String),

    #[error("unexpected text after `.{0}` label")]
    SymbolArgTrailing(String),

    #[error("label `{0}` is longer than {1} characters")]
    SymbolArgTooLong(String, usize),

    #[error("invalid label `{0}`")]
    SymbolArgInvalid(String),

    #[error("label before `.{0}` is ignored")]
    LabelIgnored(String),

    #[error("`{0}` is already declared with `.{1}`")]
    DuplicateDeclaration(String, String),

    // Operands
    #[error("missing comma between operands")]
    MissingOperandComma,

    #[error("{0}")]
    Mode(#[from] ModeError),

    #[error("invalid symbol `{0}` in direct operand")]
    InvalidDirect(String),

    #[error("empty operand")]
    EmptyOperand,

    #[error("malformed immediate `{0}`: expected '#' followed by a signed decimal")]
    MalformedImmediate(String),

    #[error("immediate {0} is out of range [{1}, {2}]")]
    ImmediateOutOfRange(i64, i64, i64),

    // Matrix operand
    #[error("matrix operand needs two bracketed indices: LABEL[rX][rY]")]
    MatrixNoBrackets,

    #[error("empty matrix index")]
    MatrixEmptyIndex,

    #[error("unexpected text between matrix indices")]
    MatrixJunkBetween,

    #[error("matrix index `{0}` is not a register")]
    MatrixNotRegister(String),

    #[error("bad register `{0}` in matrix index (r0-r7)")]
    MatrixBadRegister(String),

    #[error("missing label before matrix index")]
    MatrixEmptyLabel,

    #[error("matrix label `{0}` is longer than {1} characters")]
    MatrixLabelTooLong(String, usize),

    #[error("invalid matrix label `{0}`")]
    MatrixInvalidLabel(String),

    #[error("unexpected text after matrix operand")]
    MatrixTrailing,

    // Capacity
    #[error("out of memory: IC({0}) + DC({1}) reaches the address limit {2}")]
    Capacity(u16, u16, u16),

    #[error("object has {0} words (code {1} + data {2}) but limit is {3}")]
    ObjectTooLarge(usize, usize, usize, usize),

    #[error("output path too long: `{0}`")]
    PathTooLong(String),

    // End of first pass
    #[error("undefined symbol `{0}`")]
    UndefinedSymbol(String),

    #[error("`.entry {0}` names a symbol that is not defined in this file")]
    UndefinedEntry(String),

    #[error("`{0}` is declared both `.entry` and `.extern`")]
    EntryIsExternal(String),

    #[error("`{0}` is declared `.extern` but defined in this file")]
    ExternDefinedLocally(String),

    #[error("second pass skipped: {0} error(s) in first pass")]
    SecondPassSkipped(usize),

    // I/O
    #[error("failed to open file: {0}")]
    FileOpen(String, #[source] std::io::Error),

    #[error("failed to read file: {0}")]
    FileRead(String, #[source] std::io::Error),

    #[error("failed to create file: {0}")]
    FileCreate(String, #[source] std::io::Error),

    #[error("failed to write file: {0}")]
    FileWrite(String, #[source] std::io::Error),

    // .mat
    #[error("bad row count in `.mat`: `{0}`")]
    MatBadRows(String),

    #[error("bad column count in `.mat`: `{0}`")]
    MatBadCols(String),

    #[error("matrix of {0}x{1} does not fit in memory")]
    MatTooLarge(usize, usize),

    #[error("missing value in `.mat` initializer")]
    MatMissingValue,

    #[error("invalid number `{0}` in `.mat`")]
    MatInvalidNumber(String),

    #[error("value {0} in `.mat` is out of range [{1}, {2}]")]
    MatOutOfRange(i64, i64, i64),

    #[error("too many initializers for {0}x{1} matrix")]
    MatTooManyValues(usize, usize),

    #[error("unexpected character in `.mat` initializer")]
    MatUnexpected,

    #[error("trailing comma in `.mat`")]
    MatTrailingComma,

    // .data
    #[error("`.data` needs at least one value")]
    DataEmpty,

    #[error("missing value in `.data`")]
    DataMissingValue,

    #[error("invalid number `{0}` in `.data`")]
    DataInvalidNumber(String),

    #[error("value {0} in `.data` is out of range [{1}, {2}]")]
    DataOutOfRange(i64, i64, i64),

    #[error("trailing comma in `.data`")]
    DataTrailingComma,

    #[error("missing comma between `.data` values")]
    DataMissingComma,

    // .string
    #[error("`.string` needs a quoted literal")]
    StringMissingQuote,

    #[error("unterminated string literal")]
    StringUnterminated,

    #[error("unexpected text after string literal")]
    StringTrailing,

    #[error("non-ASCII character in string literal")]
    StringNonAscii,

    // Macro preprocessor
    #[error("line is longer than {0} characters")]
    MacroLineTooLong(usize),

    #[error("missing space between `mcro` and the macro name")]
    MacroGlued,

    #[error("missing macro name after `mcro`")]
    MacroMissingName,

    #[error("macro name `{0}` is longer than {1} characters")]
    MacroNameTooLong(String, usize),

    #[error("invalid macro name `{0}`")]
    MacroBadName(String),

    #[error("macro name `{0}` is a reserved word")]
    MacroReserved(String),

    #[error("macro `{0}` is already defined")]
    MacroDuplicate(String),

    #[error("unexpected text after `mcroend`")]
    MacroEndTrailing,

    #[error("macro `{0}` is not closed with `mcroend`")]
    MacroUnterminated(String),

    #[error("`mcroend` without `mcro`")]
    MacroStrayEnd,
}

impl Error {
    pub fn code(&self) -> &'static str {
        match self {
            Error::LineTooLong(_) => "AS001",
            Error::UnknownCommand(_) => "AS002",
            Error::MissingCommand => "AS004",
            Error::EmptyLabel => "AS005",
            Error::LabelTooLong(..) => "AS006",
            Error::InvalidLabel(_) => "AS007",
            Error::ReservedLabel(_) => "AS008",
            Error::RegisterLabel(_) => "AS009",
            Error::DuplicateLabel(_) => "AS010",
            Error::MissingSymbolArg(_) => "AS011",
            Error::SymbolArgTrailing(_) => "AS012",
            Error::SymbolArgTooLong(..) => "AS013",
            Error::SymbolArgInvalid(_) => "AS014",
            Error::LabelIgnored(_) => "AS015",
            Error::DuplicateDeclaration(..) => "AS016",
            Error::MissingOperandComma => "AS021",
            Error::Mode(e) => match e {
                ModeError::Count { .. } => "AS003",
                ModeError::Illegal { .. } => "AS022",
                ModeError::Missing { .. } => "AS023",
                ModeError::UnexpectedSource(_) => "AS024",
            },
            Error::InvalidDirect(_) => "AS025",
            Error::EmptyOperand => "AS026",
            Error::MalformedImmediate(_) => "AS027",
            Error::ImmediateOutOfRange(..) => "AS028",
            Error::Capacity(..) => "AS030",
            Error::ObjectTooLarge(..) => "AS031",
            Error::PathTooLong(_) => "AS032",
            Error::UndefinedSymbol(_) => "AS040",
            Error::UndefinedEntry(_) => "AS041",
            Error::EntryIsExternal(_) => "AS042",
            Error::ExternDefinedLocally(_) => "AS043",
            Error::SecondPassSkipped(_) => "AS050",
            Error::FileOpen(..) => "AS060",
            Error::FileRead(..) => "AS061",
            Error::FileCreate(..) => "AS062",
            Error::FileWrite(..) => "AS063",
            Error::MatrixNoBrackets => "AS110",
            Error::MatrixEmptyIndex => "AS111",
            Error::MatrixJunkBetween => "AS112",
            Error::MatrixNotRegister(_) => "AS113",
            Error::MatrixBadRegister(_) => "AS114",
            Error::MatrixEmptyLabel => "AS115",
            Error::MatrixLabelTooLong(..) => "AS116",
            Error::MatrixInvalidLabel(_) => "AS117",
            Error::MatrixTrailing => "AS118",
            Error::MatBadRows(_) => "AS301",
            Error::MatBadCols(_) => "AS302",
            Error::MatTooLarge(..) => "AS303",
            Error::MatMissingValue => "AS304",
            Error::MatInvalidNumber(_) => "AS305",
            Error::MatOutOfRange(..) => "AS306",
            Error::MatTooManyValues(..) => "AS307",
            Error::MatUnexpected => "AS308",
            Error::MatTrailingComma => "AS309",
            Error::DataEmpty => "AS310",
            Error::DataMissingValue => "AS311",
            Error::DataInvalidNumber(_) => "AS312",
            Error::DataOutOfRange(..) => "AS313",
            Error::DataTrailingComma => "AS314",
            Error::DataMissingComma => "AS315",
            Error::StringMissingQuote => "AS320",
            Error::StringUnterminated => "AS321",
            Error::StringTrailing => "AS322",
            Error::StringNonAscii => "AS323",
            Error::MacroLineTooLong(_) => "MC001",
            Error::MacroGlued => "MC002",
            Error::MacroMissingName => "MC003",
            Error::MacroNameTooLong(..) => "MC004",
            Error::MacroBadName(_) => "MC005",
            Error::MacroReserved(_) => "MC006",
            Error::MacroDuplicate(_) => "MC007",
            Error::MacroEndTrailing => "MC008",
            Error::MacroUnterminated(_) => "MC009",
            Error::MacroStrayEnd => "MC010",
        }
    }
}

#[test]
fn test() {
    use arch::op::Opcode;
    let err = Error::from(ModeError::UnexpectedSource(Opcode::CLR));
    assert_eq!(err.code(), "AS024");
    assert_eq!(err.to_string(), "'clr' takes a destination operand only");
    assert_eq!(Error::DuplicateLabel(format!("LOOP")).code(), "AS010");
    assert_eq!(
        Error::Capacity(150, 105, 255).to_string(),
        "out of memory: IC(150) + DC(105) reaches the address limit 255"
    );
}

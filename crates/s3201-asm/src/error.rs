/// Assembly failure, tagged with the 1-based source line.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("{line}: {kind}")]
pub struct AsmError {
    pub line: usize,
    pub kind: ErrorKind,
}

impl AsmError {
    pub fn new(line: usize, kind: ErrorKind) -> Self {
        Self { line, kind }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    #[error("Missing ':' at end of label '{0}'")]
    MissingColon(String),
    #[error("Invalid op '{0}'")]
    InvalidMnemonic(String),
    #[error("Unknown character '{0}'")]
    UnexpectedCharacter(char),
    #[error("Unknown op '{0}'")]
    UnknownMnemonic(String),
    #[error("'{0}' is reserved and cannot be assembled")]
    ReservedMnemonic(String),
    #[error("'{0}' needs an argument")]
    MissingArgument(String),
    #[error("'{0}' takes no argument")]
    UnexpectedArgument(String),
    #[error("Need a register, found '{0}'")]
    ExpectedRegister(String),
    #[error("Expected ',' in '{0}'")]
    ExpectedComma(String),
    #[error("not a number '{0}'")]
    NotANumber(String),
    #[error("out of range '{0}'")]
    ImmediateOutOfRange(String),
    #[error("Unexpected trailing characters '{0}'")]
    TrailingCharacters(String),
    #[error("Duplicate label '{0}'")]
    DuplicateLabel(String),
    #[error("Undefined label '{0}'")]
    UndefinedLabel(String),
    #[error("Invalid code location '{0}'")]
    MisalignedOrg(u32),
    #[error("org {target:#x} is below the location counter {counter:#x}")]
    BackwardOrg { target: u32, counter: u32 },
    #[error("Location counter overflows past {0:#x}")]
    LocationOverflow(u32),
}

use crate::token::TokenKind;
use arch::op::OperandKind;
use thiserror::Error;

/// Every way an assembly run can fail. The pipeline is whole-program and
/// fail-fast: the first error aborts it and no words are produced.
#[derive(Error, Debug)]
pub enum Error {
    #[error("at token `{text}`: expected an opcode or directive, but got `{kind}`")]
    ExpectedOpcode { kind: TokenKind, text: String },

    #[error("at token `{text}`: cannot construct an operand from token kind `{kind}`")]
    InvalidTokenKind { kind: TokenKind, text: String },

    #[error("invalid number `{0}`")]
    InvalidNumber(String),

    #[error("integer value overflow `{0}` for a 16-bit integer")]
    IntegerOverflow(String),

    #[error("missing closing quote in string literal `{0}`")]
    MissingQuote(String),

    #[error("instruction `{0}` does not allow a label")]
    LabelNotAllowed(String),

    #[error("instruction `{instr}` expects {expected} operand(s), but got {got} operand(s)")]
    OperandCount {
        instr: String,
        expected: usize,
        got: usize,
    },

    #[error(
        "operand {index} of instruction `{instr}` should be of type `{expected}`, but got `{got}`"
    )]
    OperandType {
        instr: String,
        /// 1-based position of the first mismatched operand.
        index: usize,
        expected: OperandKind,
        got: OperandKind,
    },

    #[error("immediate operand {value} of instruction `{instr}` is out of range [{lo}, {hi}]")]
    ImmediateOutOfRange {
        instr: String,
        value: i16,
        lo: i16,
        hi: i16,
    },

    #[error("the program contains no instructions")]
    EmptyProgram,

    #[error("expected the first instruction to be `.ORIG`, but got `{0}`")]
    MissingOrig(String),

    #[error("multiple `.ORIG` directives found")]
    MultipleOrig,

    #[error("redefinition of label `{label}` at instruction `{instr}`")]
    RedefinedLabel { label: String, instr: String },

    #[error("label `{label}` not found in instruction `{instr}`")]
    UndefinedLabel { label: String, instr: String },

    #[error("offset {offset} of label `{label}` in instruction `{instr}` does not fit in {bits} bits")]
    OffsetOutOfRange {
        label: String,
        instr: String,
        offset: i16,
        bits: u32,
    },

    #[error("failed to open file: {0}")]
    FileOpen(String, #[source] std::io::Error),

    #[error("failed to create file: {0}")]
    FileCreate(String, #[source] std::io::Error),

    #[error("failed to write file: {0}")]
    FileWrite(String, #[source] std::io::Error),
}

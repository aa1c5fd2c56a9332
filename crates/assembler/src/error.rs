//! Error types for the LS-8 loader and assembler.

use thiserror::Error;

/// Errors produced while turning text into a program image.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AsmError {
    /// A `.ls8` line is not a string of one to eight binary digits.
    #[error("line {line}: invalid binary byte '{token}'")]
    InvalidBinary { line: usize, token: String },

    /// An unrecognized opcode mnemonic was encountered.
    #[error("line {line}: unknown opcode '{token}'")]
    UnknownOpcode { line: usize, token: String },

    /// An instruction had too few or too many operands.
    #[error("line {line}: {opcode} expects {expected} operand(s), found {found}")]
    WrongOperandCount {
        line: usize,
        opcode: &'static str,
        expected: usize,
        found: usize,
    },

    /// A register operand was expected but something else was given.
    #[error("line {line}: invalid register '{token}'")]
    InvalidRegister { line: usize, token: String },

    /// A numeric literal could not be parsed or does not fit in a byte.
    #[error("line {line}: invalid number '{token}'")]
    InvalidNumber { line: usize, token: String },

    /// A label was used but never defined.
    #[error("line {line}: undefined label '{label}'")]
    UndefinedLabel { line: usize, label: String },

    /// A label's address does not fit in a byte operand.
    #[error("line {line}: label '{label}' is at address {address}, past the last byte address")]
    LabelOutOfRange {
        line: usize,
        label: String,
        address: usize,
    },

    /// A label was defined twice.
    #[error("line {line}: duplicate label '{label}'")]
    DuplicateLabel { line: usize, label: String },

    /// The assembled image does not fit in memory.
    #[error("program is {size} bytes (memory holds 256)")]
    ImageTooLarge { size: usize },
}

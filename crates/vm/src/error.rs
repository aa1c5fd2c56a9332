//! Runtime errors for the LS-8 machine.
//!
//! Every error is fatal to the run that raised it. State mutated before the
//! error is left as is.

use thiserror::Error;

/// Errors that occur during program execution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    /// The byte at the program counter is not an instruction.
    #[error("unknown instruction {opcode:#010b} at address {at}")]
    UnknownInstruction { opcode: u8, at: usize },

    /// The ALU was asked for an operation it does not implement.
    #[error("unsupported ALU operation '{op}'")]
    UnsupportedOperation { op: String },

    /// DIV with a zero divisor.
    #[error("division by zero at address {at}")]
    DivisionByZero { at: usize },

    /// Memory or register access outside the bank.
    #[error("{bank} address {address} out of bounds (size {size})")]
    OutOfBounds {
        bank: &'static str,
        address: usize,
        size: usize,
    },

    /// The configured step limit was reached before HLT.
    #[error("step limit of {limit} instructions exceeded")]
    StepLimitExceeded { limit: u64 },

    /// Writing PRN output failed.
    #[error("output failed at address {at}: {message}")]
    Output { at: usize, message: String },
}

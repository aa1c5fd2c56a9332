//! Decode errors for LS-8 program images.

use thiserror::Error;

/// Errors that occur while decoding bytes into instructions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The byte does not name any instruction.
    #[error("unknown opcode: {0:#010b}")]
    UnknownOpcode(u8),

    /// The image ends before all operand bytes of an instruction.
    #[error("{mnemonic} at address {at} needs {expected} operand byte(s), found {found}")]
    Truncated {
        at: usize,
        mnemonic: &'static str,
        expected: usize,
        found: usize,
    },

    /// The image does not fit in machine memory.
    #[error("program image is {0} bytes (memory holds 256)")]
    ImageTooLarge(usize),
}

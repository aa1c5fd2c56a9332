//! Program images for the LS-8 machine.
//!
//! A program image is the raw byte sequence the loader writes into memory
//! starting at address 0. Code and data are not distinguished.

use crate::error::DecodeError;
use crate::instruction::Instruction;

/// Size of LS-8 main memory in bytes.
pub const MEMORY_SIZE: usize = 256;

/// An LS-8 program image.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
    bytes: Vec<u8>,
}

impl Program {
    /// Wrap raw bytes as a program image.
    ///
    /// Fails if the image is larger than machine memory.
    pub fn new(bytes: Vec<u8>) -> Result<Self, DecodeError> {
        if bytes.len() > MEMORY_SIZE {
            return Err(DecodeError::ImageTooLarge(bytes.len()));
        }
        Ok(Self { bytes })
    }

    /// Build an image from a sequence of instructions.
    pub fn from_instructions(instructions: &[Instruction]) -> Result<Self, DecodeError> {
        let bytes = instructions.iter().flat_map(Instruction::encode).collect();
        Self::new(bytes)
    }

    /// The raw image bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Image length in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns true if the image has no bytes.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Linear sweep over the image.
    ///
    /// Yields `(address, decode result)`. A byte that fails to decode is
    /// reported and the sweep resumes at the next address.
    pub fn sweep(&self) -> Sweep<'_> {
        sweep(&self.bytes)
    }
}

/// Linear sweep over raw bytes. See [`Program::sweep`].
pub fn sweep(bytes: &[u8]) -> Sweep<'_> {
    Sweep { bytes, at: 0 }
}

/// Iterator returned by [`Program::sweep`].
#[derive(Debug)]
pub struct Sweep<'a> {
    bytes: &'a [u8],
    at: usize,
}

impl Iterator for Sweep<'_> {
    type Item = (usize, Result<Instruction, DecodeError>);

    fn next(&mut self) -> Option<Self::Item> {
        if self.at >= self.bytes.len() {
            return None;
        }
        let at = self.at;
        let result = Instruction::decode(self.bytes, at);
        self.at += match &result {
            Ok(instr) => instr.len(),
            Err(DecodeError::Truncated { .. }) => self.bytes.len() - at,
            Err(_) => 1,
        };
        Some((at, result))
    }
}

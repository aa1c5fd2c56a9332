//! Instruction decoding for the LS-8 instruction set.
//!
//! An instruction occupies one to three consecutive bytes:
//! ```text
//! Byte 0:   opcode
//! Byte 1:   operand a (present if operand_count >= 1)
//! Byte 2:   operand b (present if operand_count == 2)
//! ```
//! Operands are register numbers, except the second operand of LDI which is
//! an immediate value.

use std::fmt;

use crate::error::DecodeError;
use crate::opcode::Opcode;

/// A single decoded LS-8 instruction.
///
/// Operand slots beyond the opcode's operand count are zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instruction {
    /// The operation to perform.
    pub opcode: Opcode,
    /// First operand byte.
    pub a: u8,
    /// Second operand byte.
    pub b: u8,
}

impl Instruction {
    /// Create a new instruction. Operands the opcode does not use are cleared.
    pub fn new(opcode: Opcode, a: u8, b: u8) -> Self {
        let count = opcode.operand_count();
        Self {
            opcode,
            a: if count >= 1 { a } else { 0 },
            b: if count >= 2 { b } else { 0 },
        }
    }

    /// Instruction with no operands.
    pub fn nullary(opcode: Opcode) -> Self {
        Self::new(opcode, 0, 0)
    }

    /// Instruction with a single operand.
    pub fn unary(opcode: Opcode, a: u8) -> Self {
        Self::new(opcode, a, 0)
    }

    /// Encode to the opcode byte followed by its operand bytes.
    pub fn encode(&self) -> Vec<u8> {
        let operands = [self.a, self.b];
        let mut bytes = Vec::with_capacity(self.opcode.encoded_len());
        bytes.push(self.opcode as u8);
        bytes.extend_from_slice(&operands[..self.opcode.operand_count()]);
        bytes
    }

    /// Decode the instruction starting at `at` in `bytes`.
    ///
    /// An address past the end reads as zero, which is not an opcode.
    pub fn decode(bytes: &[u8], at: usize) -> Result<Self, DecodeError> {
        let byte = bytes.get(at).copied().unwrap_or(0);
        let opcode = Opcode::try_from(byte)?;
        let expected = opcode.operand_count();
        let operands = bytes.get(at + 1..).unwrap_or(&[]);

        if operands.len() < expected {
            return Err(DecodeError::Truncated {
                at,
                mnemonic: opcode.mnemonic(),
                expected,
                found: operands.len(),
            });
        }

        let a = operands.first().copied().unwrap_or(0);
        let b = operands.get(1).copied().unwrap_or(0);
        Ok(Self::new(opcode, a, b))
    }

    /// Encoded length in bytes.
    pub fn len(&self) -> usize {
        self.opcode.encoded_len()
    }

    /// Always false: every instruction has at least its opcode byte.
    pub fn is_empty(&self) -> bool {
        false
    }
}

impl fmt::Display for Instruction {
    /// Canonical assembly form, e.g. `LDI R0,8` or `MUL R0,R1`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let m = self.opcode.mnemonic();
        match self.opcode {
            Opcode::Hlt | Opcode::Ret => write!(f, "{m}"),
            Opcode::Ldi => write!(f, "{m} R{},{}", self.a, self.b),
            Opcode::Prn
            | Opcode::Push
            | Opcode::Pop
            | Opcode::Call
            | Opcode::Jmp
            | Opcode::Jeq
            | Opcode::Jne
            | Opcode::Jgt
            | Opcode::Jlt => write!(f, "{m} R{}", self.a),
            Opcode::Ld
            | Opcode::St
            | Opcode::Add
            | Opcode::Sub
            | Opcode::Mul
            | Opcode::Div
            | Opcode::Cmp => write!(f, "{m} R{},R{}", self.a, self.b),
        }
    }
}

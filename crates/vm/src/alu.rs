//! Arithmetic-logic unit.
//!
//! Every operation reads two registers. Arithmetic writes the result back to
//! the first register; CMP writes only the flags register.

use std::fmt;
use std::io::Write;
use std::str::FromStr;

use crate::error::RuntimeError;
use crate::machine::{Flags, Machine};

/// Operations the ALU implements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AluOp {
    Add,
    Sub,
    Mul,
    Div,
    Cmp,
}

impl AluOp {
    pub fn name(self) -> &'static str {
        match self {
            AluOp::Add => "ADD",
            AluOp::Sub => "SUB",
            AluOp::Mul => "MUL",
            AluOp::Div => "DIV",
            AluOp::Cmp => "CMP",
        }
    }
}

impl fmt::Display for AluOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AluOp {
    type Err = RuntimeError;

    /// Parse an operation name, ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [AluOp::Add, AluOp::Sub, AluOp::Mul, AluOp::Div, AluOp::Cmp]
            .into_iter()
            .find(|op| op.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| RuntimeError::UnsupportedOperation { op: s.to_string() })
    }
}

impl<W: Write> Machine<W> {
    /// Apply `op` to registers `reg_a` and `reg_b`.
    ///
    /// Arithmetic wraps modulo 256. DIV by zero fails and leaves `reg_a`
    /// unchanged.
    pub fn alu(&mut self, op: AluOp, reg_a: usize, reg_b: usize) -> Result<(), RuntimeError> {
        let a = self.registers.read(reg_a)?;
        let b = self.registers.read(reg_b)?;

        let result = match op {
            AluOp::Add => a.wrapping_add(b),
            AluOp::Sub => a.wrapping_sub(b),
            AluOp::Mul => a.wrapping_mul(b),
            AluOp::Div => a
                .checked_div(b)
                .ok_or(RuntimeError::DivisionByZero { at: self.pc })?,
            AluOp::Cmp => {
                self.flags = Flags::compare(a, b);
                return Ok(());
            }
        };

        self.registers.write(reg_a, result)
    }

    /// Apply the operation called `name` (e.g. `"ADD"`).
    pub fn alu_named(&mut self, name: &str, reg_a: usize, reg_b: usize) -> Result<(), RuntimeError> {
        let op = name.parse::<AluOp>()?;
        self.alu(op, reg_a, reg_b)
    }
}

//! Opcode definitions for the LS-8 instruction set.
//!
//! Every opcode byte carries its own shape in the top two bits:
//!
//! ```text
//! AABCDDDD
//! AA    number of operand bytes that follow (0, 1 or 2)
//! B     1 if the instruction goes through the ALU
//! C     1 if the instruction may set the program counter itself
//! DDDD  instruction identifier
//! ```
//!
//! Only `AA` is needed by the run loop. `B` and `C` are informational.

use crate::error::DecodeError;

/// Identifies the operation to perform.
///
/// The `#[repr(u8)]` attribute pins each variant to its machine encoding.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    // Machine control
    /// Stop execution.
    Hlt = 0b0000_0001,

    // Register and memory transfer
    /// Load an immediate value into a register.
    Ldi = 0b1000_0010,
    /// Load a register from the memory address held in another register.
    Ld = 0b1000_0011,
    /// Store a register at the memory address held in another register.
    St = 0b1000_0100,
    /// Print the decimal value of a register.
    Prn = 0b0100_0111,

    // Stack
    /// Push a register onto the stack.
    Push = 0b0100_0101,
    /// Pop the top of the stack into a register.
    Pop = 0b0100_0110,

    // ALU
    /// `reg_a += reg_b`
    Add = 0b1010_0000,
    /// `reg_a -= reg_b`
    Sub = 0b1010_0001,
    /// `reg_a *= reg_b`
    Mul = 0b1010_0010,
    /// `reg_a /= reg_b`. Division by zero is a runtime error.
    Div = 0b1010_0011,
    /// Compare two registers and overwrite the flags.
    Cmp = 0b1010_0111,

    // Control transfer
    /// Call the subroutine at the address held in a register.
    Call = 0b0101_0000,
    /// Return from a subroutine.
    Ret = 0b0001_0001,
    /// Jump to the address held in a register.
    Jmp = 0b0101_0100,
    /// Jump if the equal flag is set.
    Jeq = 0b0101_0101,
    /// Jump if the equal flag is clear.
    Jne = 0b0101_0110,
    /// Jump if the greater-than flag is set.
    Jgt = 0b0101_0111,
    /// Jump if the less-than flag is set.
    Jlt = 0b0101_1000,
}

/// All valid opcodes, in definition order. Useful for exhaustive testing.
pub const ALL_OPCODES: [Opcode; 19] = [
    Opcode::Hlt,
    Opcode::Ldi,
    Opcode::Ld,
    Opcode::St,
    Opcode::Prn,
    Opcode::Push,
    Opcode::Pop,
    Opcode::Add,
    Opcode::Sub,
    Opcode::Mul,
    Opcode::Div,
    Opcode::Cmp,
    Opcode::Call,
    Opcode::Ret,
    Opcode::Jmp,
    Opcode::Jeq,
    Opcode::Jne,
    Opcode::Jgt,
    Opcode::Jlt,
];

/// Number of operand bytes encoded in the top two bits of an opcode byte.
///
/// Works on any byte, recognised or not.
pub const fn operand_count(byte: u8) -> usize {
    ((byte >> 6) & 0b11) as usize
}

impl TryFrom<u8> for Opcode {
    type Error = DecodeError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0x01 => Ok(Opcode::Hlt),

            0x82 => Ok(Opcode::Ldi),
            0x83 => Ok(Opcode::Ld),
            0x84 => Ok(Opcode::St),
            0x47 => Ok(Opcode::Prn),

            0x45 => Ok(Opcode::Push),
            0x46 => Ok(Opcode::Pop),

            0xA0 => Ok(Opcode::Add),
            0xA1 => Ok(Opcode::Sub),
            0xA2 => Ok(Opcode::Mul),
            0xA3 => Ok(Opcode::Div),
            0xA7 => Ok(Opcode::Cmp),

            0x50 => Ok(Opcode::Call),
            0x11 => Ok(Opcode::Ret),
            0x54 => Ok(Opcode::Jmp),
            0x55 => Ok(Opcode::Jeq),
            0x56 => Ok(Opcode::Jne),
            0x57 => Ok(Opcode::Jgt),
            0x58 => Ok(Opcode::Jlt),

            _ => Err(DecodeError::UnknownOpcode(value)),
        }
    }
}

impl Opcode {
    /// Returns the assembly mnemonic for this opcode.
    pub fn mnemonic(&self) -> &'static str {
        match self {
            Opcode::Hlt => "HLT",
            Opcode::Ldi => "LDI",
            Opcode::Ld => "LD",
            Opcode::St => "ST",
            Opcode::Prn => "PRN",
            Opcode::Push => "PUSH",
            Opcode::Pop => "POP",
            Opcode::Add => "ADD",
            Opcode::Sub => "SUB",
            Opcode::Mul => "MUL",
            Opcode::Div => "DIV",
            Opcode::Cmp => "CMP",
            Opcode::Call => "CALL",
            Opcode::Ret => "RET",
            Opcode::Jmp => "JMP",
            Opcode::Jeq => "JEQ",
            Opcode::Jne => "JNE",
            Opcode::Jgt => "JGT",
            Opcode::Jlt => "JLT",
        }
    }

    /// Look up an opcode by mnemonic, ignoring case.
    pub fn from_mnemonic(mnemonic: &str) -> Option<Opcode> {
        ALL_OPCODES
            .iter()
            .find(|op| op.mnemonic().eq_ignore_ascii_case(mnemonic))
            .copied()
    }

    /// Number of operand bytes that follow this opcode in memory.
    pub fn operand_count(&self) -> usize {
        operand_count(*self as u8)
    }

    /// Total encoded length in bytes, opcode included.
    pub fn encoded_len(&self) -> usize {
        1 + self.operand_count()
    }

    /// True if the instruction is executed by the ALU.
    pub fn is_alu(&self) -> bool {
        (*self as u8) & 0b0010_0000 != 0
    }

    /// True if the instruction may set the program counter itself.
    pub fn sets_pc(&self) -> bool {
        (*self as u8) & 0b0001_0000 != 0
    }
}

impl std::fmt::Display for Opcode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.mnemonic())
    }
}

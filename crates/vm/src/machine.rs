//! Machine state: memory, register file, flags, program counter, output.

use std::fmt;
use std::io::{self, Stdout, Write};

use ls8_common::Program;

use crate::config::Config;
use crate::error::RuntimeError;
use crate::memory::{Memory, Registers, SP};

/// Outcome of the most recent CMP.
///
/// Bit 0 = equal, bit 1 = greater, bit 2 = less. After a CMP exactly one
/// bit is set; before any CMP the register is zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Flags(u8);

impl Flags {
    pub const EQUAL: u8 = 0b001;
    pub const GREATER: u8 = 0b010;
    pub const LESS: u8 = 0b100;

    /// Flags describing how `a` relates to `b`.
    pub fn compare(a: u8, b: u8) -> Self {
        let bit = match a.cmp(&b) {
            std::cmp::Ordering::Equal => Self::EQUAL,
            std::cmp::Ordering::Greater => Self::GREATER,
            std::cmp::Ordering::Less => Self::LESS,
        };
        Self(bit)
    }

    /// Raw register value.
    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn equal(self) -> bool {
        self.0 & Self::EQUAL != 0
    }

    pub fn greater(self) -> bool {
        self.0 & Self::GREATER != 0
    }

    pub fn less(self) -> bool {
        self.0 & Self::LESS != 0
    }
}

/// Execution state of a machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// Constructed; `run` has not been called yet.
    Idle,
    /// Inside `run`, fetching instructions.
    Running,
    /// HLT was executed.
    Halted,
}

/// An LS-8 machine.
///
/// PRN output goes to `W`, stdout by default.
pub struct Machine<W = Stdout> {
    pub(crate) memory: Memory,
    pub(crate) registers: Registers,
    pub(crate) flags: Flags,
    /// Address of the next instruction to fetch.
    pub(crate) pc: usize,
    pub(crate) state: State,
    pub(crate) config: Config,
    /// Instructions executed since construction.
    pub(crate) steps: u64,
    pub(crate) out: W,
}

impl Machine<Stdout> {
    /// A machine with default configuration printing to stdout.
    pub fn new() -> Self {
        Self::with_output(io::stdout())
    }
}

impl Default for Machine<Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> Machine<W> {
    /// A machine with default configuration printing to `out`.
    pub fn with_output(out: W) -> Self {
        Self::with_config(Config::default(), out)
    }

    /// A machine with the given configuration printing to `out`.
    pub fn with_config(config: Config, out: W) -> Self {
        let mut registers = Registers::new("register");
        registers.as_mut_slice()[SP as usize] = config.stack_top;
        Self {
            memory: Memory::new("memory"),
            registers,
            flags: Flags::default(),
            pc: 0,
            state: State::Idle,
            config,
            steps: 0,
            out,
        }
    }

    /// Copy `bytes` into memory starting at `address`.
    pub fn write_memory(&mut self, address: usize, bytes: &[u8]) -> Result<(), RuntimeError> {
        self.memory.write_slice(address, bytes)
    }

    /// Write a program image at address 0.
    pub fn load(&mut self, program: &Program) -> Result<(), RuntimeError> {
        self.write_memory(0, program.bytes())
    }

    /// Read one byte of memory.
    pub fn read_memory(&self, address: usize) -> Result<u8, RuntimeError> {
        self.memory.read(address)
    }

    /// Read a register.
    pub fn register(&self, index: usize) -> Result<u8, RuntimeError> {
        self.registers.read(index)
    }

    /// Set a register.
    pub fn set_register(&mut self, index: usize, value: u8) -> Result<(), RuntimeError> {
        self.registers.write(index, value)
    }

    /// Current stack pointer (R7).
    pub fn sp(&self) -> u8 {
        self.registers.as_slice()[SP as usize]
    }

    pub fn flags(&self) -> Flags {
        self.flags
    }

    pub fn pc(&self) -> usize {
        self.pc
    }

    pub fn state(&self) -> State {
        self.state
    }

    /// Number of instructions executed so far.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Snapshot of all memory.
    pub fn memory(&self) -> &[u8] {
        self.memory.as_slice()
    }

    /// Snapshot of all registers.
    pub fn registers(&self) -> &[u8] {
        self.registers.as_slice()
    }

    /// The output sink.
    pub fn output(&self) -> &W {
        &self.out
    }

    /// Consume the machine, returning its output sink.
    pub fn into_output(self) -> W {
        self.out
    }

    /// One line of machine state in the classic trace layout:
    ///
    /// ```text
    /// TRACE: PC | B0 B1 B2 | R0 R1 R2 R3 R4 R5 R6 R7
    /// ```
    ///
    /// `B0..B2` are the bytes at `pc`, `pc+1` and `pc+2`. Bytes past the end
    /// of memory show as `--`.
    pub fn trace_line(&self) -> String {
        TraceLine(self).to_string()
    }
}

struct TraceLine<'a, W>(&'a Machine<W>);

impl<W: Write> fmt::Display for TraceLine<'_, W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let m = self.0;
        write!(f, "TRACE: {:02X} |", m.pc)?;
        for offset in 0..3 {
            match m.memory.read(m.pc + offset) {
                Ok(byte) => write!(f, " {byte:02X}")?,
                Err(_) => write!(f, " --")?,
            }
        }
        write!(f, " |")?;
        for r in m.registers.as_slice() {
            write!(f, " {r:02X}")?;
        }
        Ok(())
    }
}

impl<W> fmt::Debug for Machine<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Machine")
            .field("pc", &self.pc)
            .field("state", &self.state)
            .field("flags", &self.flags)
            .field("registers", &self.registers.as_slice())
            .field("steps", &self.steps)
            .finish_non_exhaustive()
    }
}

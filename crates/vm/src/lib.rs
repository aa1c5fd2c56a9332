//! LS-8 virtual machine — executes program images on an 8-bit register machine.
//!
//! The machine has:
//! - 256 bytes of memory, loaded with the program image from address 0
//! - Eight byte registers; R7 is the stack pointer, starting at `0xF4`
//! - A flags register written by CMP and read by the conditional jumps
//! - A program counter advanced by the operand count encoded in each opcode
//!
//! # Usage
//!
//! ```
//! use ls8_common::Program;
//! use ls8_vm::run;
//!
//! // LDI R0,8; PRN R0; HLT
//! let program = Program::new(vec![0x82, 0x00, 0x08, 0x47, 0x00, 0x01]).unwrap();
//!
//! let machine = run(&program, Vec::new()).unwrap();
//! assert_eq!(machine.output(), b"8\n");
//! ```

pub mod alu;
pub mod config;
pub mod error;
pub mod execute;
pub mod machine;
pub mod memory;

pub use alu::AluOp;
pub use config::Config;
pub use error::RuntimeError;
pub use machine::{Flags, Machine, State};

use std::io::Write;

use ls8_common::Program;

/// Load `program` into a fresh machine and run it to HLT.
///
/// PRN output is written to `out`. The halted machine is returned so its
/// final state can be inspected.
///
/// # Errors
///
/// Returns [`RuntimeError`] if execution fails (unknown instruction,
/// division by zero, out-of-bounds access, etc.).
pub fn run<W: Write>(program: &Program, out: W) -> Result<Machine<W>, RuntimeError> {
    run_with_config(program, Config::default(), out)
}

/// [`run`] with an explicit [`Config`].
pub fn run_with_config<W: Write>(
    program: &Program,
    config: Config,
    out: W,
) -> Result<Machine<W>, RuntimeError> {
    let mut machine = Machine::with_config(config, out);
    machine.load(program)?;
    machine.run()?;
    Ok(machine)
}

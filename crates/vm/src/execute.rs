//! Fetch-decode-execute loop and instruction handlers.

use std::io::Write;

use ls8_common::{Instruction, Opcode};
use tracing::{debug, trace, Level};

use crate::alu::AluOp;
use crate::error::RuntimeError;
use crate::machine::{Machine, State};
use crate::memory::SP;

/// What the run loop does with the program counter after a handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Control {
    /// Move past the instruction and its operands.
    Advance,
    /// The handler chose the next address.
    Jump(usize),
}

impl<W: Write> Machine<W> {
    /// Run until HLT or error.
    pub fn run(&mut self) -> Result<(), RuntimeError> {
        self.state = State::Running;
        debug!(pc = self.pc, "run started");

        while self.state == State::Running {
            if let Some(limit) = self.config.step_limit {
                if self.steps >= limit {
                    return Err(RuntimeError::StepLimitExceeded { limit });
                }
            }
            self.step()?;
        }

        debug!(pc = self.pc, steps = self.steps, "halted");
        Ok(())
    }

    /// Fetch, decode and execute one instruction.
    pub fn step(&mut self) -> Result<(), RuntimeError> {
        if tracing::enabled!(Level::TRACE) {
            trace!("{}", self.trace_line());
        }

        let instr = self.fetch()?;
        let control = self.execute(&instr)?;
        self.steps += 1;

        self.pc = match control {
            Control::Advance => self.pc + instr.len(),
            Control::Jump(target) => target,
        };
        Ok(())
    }

    /// Decode the instruction at `pc` and read its operand bytes.
    fn fetch(&self) -> Result<Instruction, RuntimeError> {
        let byte = self.memory.read(self.pc)?;
        let opcode = Opcode::try_from(byte).map_err(|_| RuntimeError::UnknownInstruction {
            opcode: byte,
            at: self.pc,
        })?;

        let mut operands = [0u8; 2];
        for (i, slot) in operands.iter_mut().take(opcode.operand_count()).enumerate() {
            *slot = self.memory.read(self.pc + 1 + i)?;
        }
        Ok(Instruction::new(opcode, operands[0], operands[1]))
    }

    fn execute(&mut self, instr: &Instruction) -> Result<Control, RuntimeError> {
        let a = instr.a as usize;
        let b = instr.b as usize;

        match instr.opcode {
            Opcode::Hlt => {
                self.state = State::Halted;
                Ok(Control::Advance)
            }

            Opcode::Ldi => {
                self.registers.write(a, instr.b)?;
                Ok(Control::Advance)
            }
            Opcode::Ld => {
                let address = self.registers.read(b)?;
                let value = self.memory.read(address as usize)?;
                self.registers.write(a, value)?;
                Ok(Control::Advance)
            }
            Opcode::St => {
                let address = self.registers.read(a)?;
                let value = self.registers.read(b)?;
                self.memory.write(address as usize, value)?;
                Ok(Control::Advance)
            }
            Opcode::Prn => {
                self.exec_prn(a)?;
                Ok(Control::Advance)
            }

            Opcode::Push => {
                let value = self.registers.read(a)?;
                self.push(value)?;
                Ok(Control::Advance)
            }
            Opcode::Pop => {
                let value = self.pop()?;
                self.registers.write(a, value)?;
                Ok(Control::Advance)
            }

            Opcode::Add => self.exec_alu(AluOp::Add, a, b),
            Opcode::Sub => self.exec_alu(AluOp::Sub, a, b),
            Opcode::Mul => self.exec_alu(AluOp::Mul, a, b),
            Opcode::Div => self.exec_alu(AluOp::Div, a, b),
            Opcode::Cmp => self.exec_alu(AluOp::Cmp, a, b),

            Opcode::Call => {
                let target = self.registers.read(a)?;
                // Return address is the byte after CALL's operand.
                let ret = self.pc + instr.len();
                self.push(ret as u8)?;
                Ok(Control::Jump(target as usize))
            }
            Opcode::Ret => {
                let target = self.pop()?;
                Ok(Control::Jump(target as usize))
            }
            Opcode::Jmp => self.exec_jump(a, true),
            Opcode::Jeq => self.exec_jump(a, self.flags.equal()),
            Opcode::Jne => self.exec_jump(a, !self.flags.equal()),
            Opcode::Jgt => self.exec_jump(a, self.flags.greater()),
            Opcode::Jlt => self.exec_jump(a, self.flags.less()),
        }
    }

    fn exec_prn(&mut self, reg: usize) -> Result<(), RuntimeError> {
        let value = self.registers.read(reg)?;
        writeln!(self.out, "{value}").map_err(|e| RuntimeError::Output {
            at: self.pc,
            message: e.to_string(),
        })
    }

    fn exec_alu(&mut self, op: AluOp, a: usize, b: usize) -> Result<Control, RuntimeError> {
        self.alu(op, a, b)?;
        Ok(Control::Advance)
    }

    fn exec_jump(&mut self, reg: usize, taken: bool) -> Result<Control, RuntimeError> {
        let target = self.registers.read(reg)?;
        Ok(if taken {
            Control::Jump(target as usize)
        } else {
            Control::Advance
        })
    }

    /// Decrement SP, then store `value` at the new top of stack.
    ///
    /// SP wraps modulo 256; running into program code is not detected.
    pub(crate) fn push(&mut self, value: u8) -> Result<(), RuntimeError> {
        let sp = self.registers.read(SP as usize)?.wrapping_sub(1);
        self.registers.write(SP as usize, sp)?;
        self.memory.write(sp as usize, value)
    }

    /// Read the top of stack, then increment SP.
    pub(crate) fn pop(&mut self) -> Result<u8, RuntimeError> {
        let sp = self.registers.read(SP as usize)?;
        let value = self.memory.read(sp as usize)?;
        self.registers.write(SP as usize, sp.wrapping_add(1))?;
        Ok(value)
    }
}

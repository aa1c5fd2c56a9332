//! Checked byte storage used for both main memory and the register file.

use crate::error::RuntimeError;

/// Number of general-purpose registers.
pub const REGISTER_COUNT: usize = 8;

/// Register used as the stack pointer by PUSH, POP, CALL and RET.
pub const SP: u8 = 7;

/// A fixed-size bank of byte cells with bounds-checked access.
///
/// Storage has no notion of special cells. R7 being the stack pointer is a
/// convention of the instruction handlers only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bank<const N: usize> {
    name: &'static str,
    cells: [u8; N],
}

/// 256 bytes of main memory.
pub type Memory = Bank<{ ls8_common::MEMORY_SIZE }>;

/// The eight-register file.
pub type Registers = Bank<REGISTER_COUNT>;

impl<const N: usize> Bank<N> {
    /// A zero-filled bank. `name` appears in out-of-bounds errors.
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            cells: [0; N],
        }
    }

    /// Read one cell.
    pub fn read(&self, address: usize) -> Result<u8, RuntimeError> {
        self.cells
            .get(address)
            .copied()
            .ok_or_else(|| self.out_of_bounds(address))
    }

    /// Write one cell.
    pub fn write(&mut self, address: usize, value: u8) -> Result<(), RuntimeError> {
        let name = self.name;
        let cell = self.cells.get_mut(address).ok_or(RuntimeError::OutOfBounds {
            bank: name,
            address,
            size: N,
        })?;
        *cell = value;
        Ok(())
    }

    /// Write a run of bytes starting at `address`.
    ///
    /// Nothing is written unless the whole run fits. The error names the
    /// first address outside the bank.
    pub fn write_slice(&mut self, address: usize, bytes: &[u8]) -> Result<(), RuntimeError> {
        match address.checked_add(bytes.len()) {
            Some(end) if end <= N => {
                self.cells[address..end].copy_from_slice(bytes);
                Ok(())
            }
            _ => Err(self.out_of_bounds(address.max(N))),
        }
    }

    /// All cells, in address order.
    pub fn as_slice(&self) -> &[u8] {
        &self.cells
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.cells
    }

    fn out_of_bounds(&self, address: usize) -> RuntimeError {
        RuntimeError::OutOfBounds {
            bank: self.name,
            address,
            size: N,
        }
    }
}

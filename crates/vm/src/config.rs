//! Machine configuration.

/// Address the stack pointer holds at power-on.
pub const DEFAULT_STACK_TOP: u8 = 0xF4;

/// Tunables applied when a [`Machine`](crate::Machine) is constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Initial value of the stack pointer register.
    pub stack_top: u8,
    /// Abort the run after this many instructions. `None` runs until HLT.
    pub step_limit: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            stack_top: DEFAULT_STACK_TOP,
            step_limit: None,
        }
    }
}

impl Config {
    /// Same configuration with a step limit.
    pub fn with_step_limit(mut self, limit: u64) -> Self {
        self.step_limit = Some(limit);
        self
    }
}

//! Sizes and limits fixed for the duration of a run.

/// Operand stack depth of the reference machine.
pub const STACK_SIZE: usize = 100;
/// Number of variable slots of the reference machine.
pub const MEMORY_SIZE: usize = 100;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct VmConfig {
  pub stack_capacity : usize,
  pub memory_size    : usize,
  /// Faults the run with `StepLimitExceeded` after this many instructions. `None` is unbounded.
  pub max_steps      : Option<u64>,
}

impl Default for VmConfig {
  fn default() -> VmConfig {
    VmConfig {
      stack_capacity : STACK_SIZE,
      memory_size    : MEMORY_SIZE,
      max_steps      : None,
    }
  }
}

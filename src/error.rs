//! Faults raised while executing a program. Every fault is fatal to the run that raised it.

use thiserror::Error;

use crate::bytecode::Word;

/// What went wrong. The instruction pointer is carried separately by `Fault`.
#[derive(Error, Clone, Eq, PartialEq, Debug)]
pub enum FaultKind {
  #[error("stack underflow")]
  StackUnderflow,

  #[error("stack overflow")]
  StackOverflow,

  #[error("variable index {index} out of range")]
  MemoryIndexOutOfRange { index: Word },

  #[error("variable {index} read before it was allocated")]
  UninitializedVariable { index: usize },

  #[error("division by zero")]
  DivisionByZero,

  #[error("unknown instruction {word}")]
  UnknownInstruction { word: Word },

  /// A jump target or operand fetch outside the program.
  #[error("program index {index} out of bounds")]
  ProgramBoundsError { index: i64 },

  #[error("step limit of {limit} exceeded")]
  StepLimitExceeded { limit: u64 },

  #[error("failed to write output: {message}")]
  OutputError { message: String },
}

impl FaultKind {
  /**
    The process exit status reported for this fault. Zero is reserved for a clean halt, and
    every kind gets its own code so scripts can tell them apart.
  */
  pub fn exit_code(&self) -> u8 {
    match self {
      FaultKind::StackUnderflow               => 2,
      FaultKind::StackOverflow                => 3,
      FaultKind::MemoryIndexOutOfRange { .. } => 4,
      FaultKind::UninitializedVariable { .. } => 5,
      FaultKind::DivisionByZero               => 6,
      FaultKind::UnknownInstruction { .. }    => 7,
      FaultKind::ProgramBoundsError { .. }    => 8,
      FaultKind::StepLimitExceeded { .. }     => 9,
      FaultKind::OutputError { .. }           => 10,
    }
  }
}

/// A fault together with the instruction pointer of the instruction that raised it.
#[derive(Error, Clone, Eq, PartialEq, Debug)]
#[error("{kind} at ip {ip}")]
pub struct Fault {
  pub kind : FaultKind,
  pub ip   : usize,
}

impl Fault {
  pub fn new(kind: FaultKind, ip: usize) -> Fault {
    Fault { kind, ip }
  }
}

/*!
  A minimal stack machine. A program is a flat sequence of integer cells (opcodes interleaved with
  their inline operands) executed against a bounded operand stack and a fixed block of variable
  slots. The only side effect is `PRINT`, which writes the top of the stack to an output sink.

  Every invalid condition (stack under- or overflow, a bad variable index, division by zero, an
  unknown opcode, a jump outside the program) faults the run with the instruction pointer at which
  it happened. See `error::FaultKind`.
*/

#[macro_use] extern crate prettytable;
#[macro_use] extern crate lazy_static;

pub mod bytecode;
pub mod config;
pub mod error;
pub mod memory;
pub mod stack;
pub mod vm;

pub use config::VmConfig;
pub use error::{Fault, FaultKind};
pub use vm::{execute, HaltReason, Outcome, State, Value, VM};

use std::io;
use std::process::ExitCode;

use tracing::{error, Level};

use stackvm::bytecode::{assemble, Instruction, Word};
use stackvm::{execute, VmConfig};

#[cfg(feature = "trace_computation")]
const LOG_LEVEL: Level = Level::TRACE;
#[cfg(not(feature = "trace_computation"))]
const LOG_LEVEL: Level = Level::WARN;

/// ALLOC 0, ALLOC 1, PUSH 2, STORE 0, PUSH 3, STORE 1, LOAD 0, LOAD 1, ADD, PRINT, HALT
fn example_program() -> Vec<Word> {
  use stackvm::bytecode::Operation::*;

  let unary = |opcode, operand| Instruction::Unary { opcode, operand };

  assemble(&[
    unary(Alloc, 0),
    unary(Alloc, 1),
    unary(Push, 2), unary(Store, 0),
    unary(Push, 3), unary(Store, 1),
    unary(Load, 0),
    unary(Load, 1),
    Instruction::Nullary(Add),
    Instruction::Nullary(Print),
    Instruction::Nullary(Halt),
  ])
}

fn main() -> ExitCode {
  // Diagnostics go to stderr; stdout carries only `PRINT` output.
  tracing_subscriber::fmt()
    .with_max_level(LOG_LEVEL)
    .with_target(false)
    .with_writer(io::stderr)
    .compact()
    .init();

  #[cfg(feature = "trace_computation")]
  tracing::info!("computation tracing enabled");

  let program = example_program();
  let stdout  = io::stdout();

  match execute(&program, VmConfig::default(), stdout.lock()) {
    Ok(_outcome) => ExitCode::SUCCESS,
    Err(fault)   => {
      error!("{}", fault);
      ExitCode::from(fault.kind.exit_code())
    }
  }
}


#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn example_program_prints_five(){
    let mut output = Vec::new();
    let outcome    = execute(&example_program(), VmConfig::default(), &mut output).unwrap();
    assert_eq!(output, b"5\n");
    assert_eq!(outcome.reason, stackvm::HaltReason::Instruction);
  }

  #[test]
  fn example_program_encoding(){
    assert_eq!(
      example_program(),
      vec![15, 0, 15, 1, 0, 2, 17, 0, 0, 3, 17, 1, 16, 0, 16, 1, 2, 8, 18]
    );
  }

}

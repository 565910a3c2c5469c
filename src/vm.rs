//! Structures and functions for the stack machine: the fetch-decode-execute loop and the two
//! mutable regions it operates on.

use std::fmt::{Display, Formatter};
use std::io::Write;

use prettytable::{format as TableFormat, Table};
use tracing::{debug, info, warn};
#[cfg(feature = "trace_computation")] use tracing::trace;

use crate::bytecode::*;
use crate::config::VmConfig;
use crate::error::{Fault, FaultKind};
use crate::memory::VariableMemory;
use crate::stack::OperandStack;

/// The machine's only data type. Shares its width with a program cell so `PUSH` can carry any value.
pub type Value = Word;

/// Why a run stopped cleanly.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum HaltReason {
  /// A `HALT` instruction was executed.
  Instruction,
  /// The instruction pointer ran off the end of the program.
  EndOfProgram,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum State {
  Running,
  Halted(HaltReason),
  Faulted(Fault),
}

/// The result of a run that halted cleanly.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Outcome {
  pub reason : HaltReason,
  /// Number of instructions executed.
  pub steps  : u64,
  /// The operand stack at the time of the halt, bottom first.
  pub stack  : Vec<Value>,
}

/// Where the instruction pointer goes after an instruction.
enum Flow {
  Next(usize),
  Halt,
}

pub struct VM<'p, W: Write> {
  state   : State,
  config  : VmConfig,
  program : &'p [Word],

  // Registers //
  ip      : usize,
  steps   : u64,

  // Memory Stores //
  stack   : OperandStack,
  memory  : VariableMemory,

  output  : W,
}

/**
  Runs `program` once on a freshly created machine, writing `PRINT` output to `output`.

  No state survives the call: the stack and variable memory are created here and dropped when the
  run reaches `Halted` or `Faulted`.
*/
pub fn execute<W: Write>(program: &[Word], config: VmConfig, output: W) -> Result<Outcome, Fault> {
  VM::new(program, config, output).run()
}

impl<'p, W: Write> VM<'p, W> {

  // region Display methods

  fn make_register_table<T> (
      name      : char,
      registers : &[T],
      highlight : Option<usize>
    ) -> Table
    where T: Display
  {

    let mut table = Table::new();

    table.set_format(*TABLE_DISPLAY_FORMAT);
    table.set_titles(row![ubr->"Address", ubl->"Contents"]);

    for (i, cell) in registers.iter().enumerate() {
      match Some(i) == highlight {

        true  => {
          table.add_row(
            row![r->format!("* --> {}[{}] =", name, i), format!("{}", cell)]
          );
        }

        false => {
          table.add_row(
            row![r->format!("{}[{}] =", name, i), format!("{}", cell)]
          );
        }

      } // end match on highlight
    } // end for
    table
  }

  // endregion

  // region Accessors

  pub fn new(program: &'p [Word], config: VmConfig, output: W) -> VM<'p, W> {
    VM {
      state   :  State::Running,
      config,
      program,
      ip      :  0,
      steps   :  0,
      stack   :  OperandStack::new(config.stack_capacity),
      memory  :  VariableMemory::new(config.memory_size),
      output,
    }
  }

  pub fn state(&self) -> &State {
    &self.state
  }

  pub fn ip(&self) -> usize {
    self.ip
  }

  pub fn stack(&self) -> &[Value] {
    self.stack.as_slice()
  }

  pub fn memory(&self) -> &VariableMemory {
    &self.memory
  }

  // endregion

  // region Fetch-decode-execute

  /// Steps the machine until it halts or faults.
  pub fn run(mut self) -> Result<Outcome, Fault> {
    #[cfg(feature = "trace_computation")]
      {
        let (listing, bad_cell) = disassemble(self.program);
        for (address, instruction) in listing {
          trace!("{:>4}: {}", address, instruction);
        }
        if let Some((address, kind)) = bad_cell {
          trace!("{:>4}: <{}>", address, kind);
        }
      }

    loop {
      match self.step()? {

        State::Running        => continue,

        State::Halted(reason) => {
          info!(steps = self.steps, ?reason, "halted");
          return Ok(Outcome {
            reason,
            steps : self.steps,
            stack : self.stack.into_vec(),
          });
        }

        State::Faulted(fault) => return Err(fault),

      }
    }
  }

  /**
    Executes a single instruction and returns the resulting state. Stepping a machine that has
    already halted is a no-op that reports the halt again; stepping a faulted machine reports the
    fault again.
  */
  pub fn step(&mut self) -> Result<State, Fault> {
    match &self.state {
      State::Running        => {},
      State::Halted(_)      => return Ok(self.state.clone()),
      State::Faulted(fault) => return Err(fault.clone()),
    }

    if self.ip >= self.program.len() {
      self.state = State::Halted(HaltReason::EndOfProgram);
      return Ok(self.state.clone());
    }

    match self.fetch_and_execute() {

      Ok(Flow::Next(ip)) => {
        self.ip = ip;
      }

      Ok(Flow::Halt)     => {
        self.state = State::Halted(HaltReason::Instruction);
      }

      Err(kind)          => {
        let fault = Fault::new(kind, self.ip);
        warn!(%fault, "faulted");
        #[cfg(feature = "trace_computation")] trace!("\n{}", self);
        self.state = State::Faulted(fault.clone());
        return Err(fault);
      }

    }

    #[cfg(feature = "trace_computation")] trace!("\n{}", self);

    Ok(self.state.clone())
  }

  fn fetch_and_execute(&mut self) -> Result<Flow, FaultKind> {
    if let Some(limit) = self.config.max_steps {
      if self.steps >= limit {
        return Err(FaultKind::StepLimitExceeded { limit });
      }
    }

    let instruction = try_decode_instruction(self.program, self.ip)?;
    debug!(ip = self.ip, %instruction, "execute");

    self.steps += 1;
    self.execute(instruction)
  }

  fn execute(&mut self, instruction: Instruction) -> Result<Flow, FaultKind> {
    let next = self.ip + instruction_size(instruction.opcode());

    match instruction {

      Instruction::Unary { opcode, operand } => {
        match opcode {

          Operation::Push  => self.stack.push(operand)?,

          Operation::Jmp   => return Ok(Flow::Next(self.jump_target(operand)?)),

          Operation::Jz    => {
            if self.stack.pop()? == 0 {
              return Ok(Flow::Next(self.jump_target(operand)?));
            }
          }

          Operation::Jnz   => {
            if self.stack.pop()? != 0 {
              return Ok(Flow::Next(self.jump_target(operand)?));
            }
          }

          Operation::Alloc => self.memory.alloc(operand)?,

          Operation::Load  => {
            let value = self.memory.load(operand)?;
            self.stack.push(value)?;
          }

          Operation::Store => {
            let value = self.stack.pop()?;
            self.memory.store(operand, value)?;
          }

          _ => unreachable!("{} decoded with an operand", opcode),

        }
      }

      Instruction::Nullary(opcode) => {
        match opcode {

          Operation::Pop   => { self.stack.pop()?; }

          Operation::Add   => self.binary(|a, b| Ok(a.wrapping_add(b)))?,

          // The first value popped is the subtrahend.
          Operation::Sub   => self.binary(|a, b| Ok(b.wrapping_sub(a)))?,

          Operation::Mul   => self.binary(|a, b| Ok(a.wrapping_mul(b)))?,

          // (1 / a) * b, with integer division. This is zero unless `a` is 1 or -1.
          Operation::Div   => self.binary(|a, b| {
            match a {
              0 => Err(FaultKind::DivisionByZero),
              a => Ok((1 / a).wrapping_mul(b))
            }
          })?,

          Operation::Dup   => {
            let top = self.stack.peek()?;
            self.stack.push(top)?;
          }

          Operation::Swap  => self.stack.swap_top()?,

          Operation::Print => {
            let top = self.stack.peek()?;
            writeln!(self.output, "{}", top)
              .map_err(|e| FaultKind::OutputError { message: e.to_string() })?;
          }

          Operation::Eq    => self.binary(|a, b| Ok((a == b) as Value))?,

          // Polarity is reversed relative to the mnemonic: true when the first value popped is
          // greater than the second.
          Operation::Lt    => self.binary(|a, b| Ok((a > b) as Value))?,

          Operation::Gt    => self.binary(|a, b| Ok((a < b) as Value))?,

          Operation::Halt  => return Ok(Flow::Halt),

          _ => unreachable!("{} decoded without an operand", opcode),

        }
      }

    }

    Ok(Flow::Next(next))
  }

  /// Pops `a`, then `b`, and pushes `f(a, b)`.
  fn binary<F>(&mut self, f: F) -> Result<(), FaultKind>
    where F: FnOnce(Value, Value) -> Result<Value, FaultKind>
  {
    let a = self.stack.pop()?;
    let b = self.stack.pop()?;
    self.stack.push(f(a, b)?)
  }

  /// A jump may land on any cell or one past the last cell, which halts on the next step.
  fn jump_target(&self, operand: Word) -> Result<usize, FaultKind> {
    match operand {
      target if target >= 0 && target as usize <= self.program.len() => Ok(target as usize),
      target => Err(FaultKind::ProgramBoundsError { index: target as i64 })
    }
  }

  // endregion

}


lazy_static! {
  static ref TABLE_DISPLAY_FORMAT: TableFormat::TableFormat =
    TableFormat::FormatBuilder::new()
      .column_separator('│')
      .borders(' ')
      .separator(
        TableFormat::LinePosition::Title,
        TableFormat::LineSeparator::new('─', '┼', ' ', ' ')
      )
      .separator(
        TableFormat::LinePosition::Bottom,
        TableFormat::LineSeparator::new('─', '┴', ' ', ' ')
      )
      .padding(1, 1)
      .build();
}

impl<'p, W: Write> Display for VM<'p, W> {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    let stack = self.stack.as_slice();
    let top   = stack.len().checked_sub(1);

    let s_table = Self::make_register_table('S', stack,               top);
    let m_table = Self::make_register_table('M', self.memory.slots(), None);

    let mut combined_table = table!([s_table, m_table]);

    combined_table.set_titles(row![ub->"Stack", ub->"Variables"]);
    combined_table.set_format(*TABLE_DISPLAY_FORMAT);

    let status = match &self.state {
      State::Running        => "Running.".to_string(),
      State::Halted(reason) => format!("Halted ({:?}).", reason),
      State::Faulted(fault) => format!("Faulted: {}.", fault),
    };

    write!(f, "IP: {}\tSteps: {}\t{}\n{}", self.ip, self.steps, status, combined_table)
  }
}

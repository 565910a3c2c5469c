use std::fmt::{Display, Formatter};

use strum_macros::{Display as StrumDisplay, IntoStaticStr, EnumIter};
use num_enum::{TryFromPrimitive, IntoPrimitive};

use crate::bytecode::Word;

/**
  Opcodes of the virtual machine.

  As in C, enum values are represented by consecutive natural numbers starting at zero, and the
  numeric value is exactly what appears in a program cell. The order the opcodes are listed below
  is therefore significant: reordering them changes the meaning of every encoded program.
*/
#[derive(
StrumDisplay, IntoStaticStr, EnumIter, TryFromPrimitive, IntoPrimitive,
Clone,        Copy,          Eq,       PartialEq,        Debug,         Hash
)]
#[repr(u8)]
pub enum Operation {
  #[strum(serialize = "PUSH")]  Push,   // push( value )
  #[strum(serialize = "POP")]   Pop,
  #[strum(serialize = "ADD")]   Add,
  #[strum(serialize = "SUB")]   Sub,
  #[strum(serialize = "MUL")]   Mul,
  #[strum(serialize = "DIV")]   Div,
  #[strum(serialize = "DUP")]   Dup,
  #[strum(serialize = "SWAP")]  Swap,
  #[strum(serialize = "PRINT")] Print,
  #[strum(serialize = "JMP")]   Jmp,    // jmp( target )
  #[strum(serialize = "JZ")]    Jz,     // jz( target )
  #[strum(serialize = "JNZ")]   Jnz,    // jnz( target )
  #[strum(serialize = "EQ")]    Eq,
  #[strum(serialize = "LT")]    Lt,
  #[strum(serialize = "GT")]    Gt,
  #[strum(serialize = "ALLOC")] Alloc,  // alloc( variable )
  #[strum(serialize = "LOAD")]  Load,   // load( variable )
  #[strum(serialize = "STORE")] Store,  // store( variable )
  #[strum(serialize = "HALT")]  Halt,
}

/// Holds a decoded instruction: the opcode and, for opcodes that take one, its inline operand.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Instruction {
  /// [OpCode][Operand]
  Unary {
    opcode  : Operation,
    operand : Word
  },
  /// [OpCode]
  Nullary(Operation),
}

impl Instruction {
  pub fn opcode(&self) -> Operation {
    match self {
      Instruction::Unary { opcode, .. } => *opcode,
      Instruction::Nullary(opcode)      => *opcode,
    }
  }
}

impl Display for Instruction {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    match self{

      Instruction::Unary { opcode, operand } => {
        write!(f, "{} {}", opcode, operand)
      }

      Instruction::Nullary(opcode) => {
        write!(f, "{}", opcode)
      }

    }
  }
}

impl Operation{
  pub fn code(&self) -> Word {
    Into::<u8>::into(*self) as Word
  }

  /// The number of inline operand cells that follow the opcode.
  pub fn arity(&self) -> usize {
    match self {
      | Operation::Push
      | Operation::Jmp
      | Operation::Jz
      | Operation::Jnz
      | Operation::Alloc
      | Operation::Load
      | Operation::Store => 1,
      _                  => 0
    }
  }
}


#[cfg(test)]
mod tests {
  use super::*;
  use std::convert::TryFrom;
  use strum::IntoEnumIterator;

  #[test]
  fn opcode_numbering_matches_table_order(){
    assert_eq!(Operation::Push.code(), 0);
    assert_eq!(Operation::Print.code(), 8);
    assert_eq!(Operation::Alloc.code(), 15);
    assert_eq!(Operation::Halt.code(), 18);
    for (i, operation) in Operation::iter().enumerate() {
      assert_eq!(operation.code(), i as Word);
      assert_eq!(Operation::try_from(i as u8).ok(), Some(operation));
    }
    assert!(Operation::try_from(19u8).is_err());
  }

  #[test]
  fn mnemonics(){
    assert_eq!(Operation::Jnz.to_string(), "JNZ");
    let name: &'static str = Operation::Store.into();
    assert_eq!(name, "STORE");
    assert_eq!(Instruction::Unary { opcode: Operation::Push, operand: -4 }.to_string(), "PUSH -4");
    assert_eq!(Instruction::Nullary(Operation::Swap).to_string(), "SWAP");
  }

  #[test]
  fn arity(){
    let unary: Vec<Operation> = Operation::iter().filter(|op| op.arity() == 1).collect();
    assert_eq!(
      unary,
      vec![
        Operation::Push, Operation::Jmp, Operation::Jz, Operation::Jnz,
        Operation::Alloc, Operation::Load, Operation::Store
      ]
    );
  }

}

/*!
  This module is responsible for the encoding and decoding of program cells.

*/
use std::convert::TryFrom;

use super::{Operation, Instruction};
use crate::error::FaultKind;

// If you change this you must also change `Value` in `crate::vm`.
pub type Word = i32;

/// An `Either` type for an encoded instruction, allowing the instruction to be
/// either one cell or two.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum EncodedInstruction{
  Word(Word),
  TwoWords(Word, Word)
}

/**
  Decodes the instruction whose opcode is at `program[ip]`. The caller is responsible for
  checking that `ip` is inside the program; an operand that would be fetched from beyond the end
  of the program is a `ProgramBoundsError`.
*/
pub fn try_decode_instruction(program: &[Word], ip: usize) -> Result<Instruction, FaultKind> {
  let word = *program.get(ip)
                     .ok_or(FaultKind::ProgramBoundsError { index: ip as i64 })?;
  let opcode =
    u8::try_from(word)
      .ok()
      .and_then(|byte| Operation::try_from(byte).ok())
      .ok_or(FaultKind::UnknownInstruction { word })?;

  let instruction =
    match opcode.arity() {
      0 => Instruction::Nullary(opcode),
      _ => {
        let operand_ip = ip + 1;
        let operand = *program.get(operand_ip)
                              .ok_or(FaultKind::ProgramBoundsError { index: operand_ip as i64 })?;
        Instruction::Unary { opcode, operand }
      }
    };

  Ok(instruction)
}

/**
  Encodes the instruction into program cells. It is the caller's responsibility to
  use the correct `Instruction` variant for the given opcode.
*/
pub fn encode_instruction(instruction: Instruction) -> EncodedInstruction{
  match instruction{

    Instruction::Unary { opcode, operand } => {
      // [OpCode][Operand]
      EncodedInstruction::TwoWords(opcode.code(), operand)
    },

    Instruction::Nullary(opcode) => {
      // [OpCode]
      EncodedInstruction::Word(opcode.code())
    },
  }
}

/// Flattens a list of instructions into the cell sequence the VM consumes.
pub fn assemble(instructions: &[Instruction]) -> Vec<Word> {
  let mut program = Vec::with_capacity(instructions.len() * 2);
  for instruction in instructions {
    match encode_instruction(*instruction) {
      EncodedInstruction::Word(word)           => program.push(word),
      EncodedInstruction::TwoWords(word, operand) => {
        program.push(word);
        program.push(operand);
      }
    }
  }
  program
}

/**
  Decodes a whole program into `(address, instruction)` pairs. Decoding stops at the first cell
  that cannot be decoded, whose address and fault are returned alongside the listing.
*/
pub fn disassemble(program: &[Word]) -> (Vec<(usize, Instruction)>, Option<(usize, FaultKind)>) {
  let mut listing = vec![];
  let mut ip      = 0;

  while ip < program.len() {
    match try_decode_instruction(program, ip) {
      Ok(instruction) => {
        listing.push((ip, instruction));
        ip += instruction_size(instruction.opcode());
      }
      Err(fault) => {
        return (listing, Some((ip, fault)));
      }
    }
  }

  (listing, None)
}

/// Returns the size in CELLS of an instruction for the corresponding opcode.
pub fn instruction_size(opcode: Operation) -> usize{
  1 + opcode.arity()
}


#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn decode_nullary_and_unary(){
    let program = vec![Operation::Push.code(), -7, Operation::Add.code()];
    assert_eq!(
      try_decode_instruction(&program, 0),
      Ok(Instruction::Unary { opcode: Operation::Push, operand: -7 })
    );
    assert_eq!(
      try_decode_instruction(&program, 2),
      Ok(Instruction::Nullary(Operation::Add))
    );
  }

  #[test]
  fn decode_unknown_opcode(){
    assert_eq!(
      try_decode_instruction(&[19], 0),
      Err(FaultKind::UnknownInstruction { word: 19 })
    );
    assert_eq!(
      try_decode_instruction(&[-1], 0),
      Err(FaultKind::UnknownInstruction { word: -1 })
    );
    assert_eq!(
      try_decode_instruction(&[256], 0),
      Err(FaultKind::UnknownInstruction { word: 256 })
    );
  }

  #[test]
  fn decode_missing_operand(){
    let program = vec![Operation::Pop.code(), Operation::Jmp.code()];
    assert_eq!(
      try_decode_instruction(&program, 1),
      Err(FaultKind::ProgramBoundsError { index: 2 })
    );
  }

  #[test]
  fn assemble_embedded_example(){
    let program = assemble(&[
      Instruction::Unary { opcode: Operation::Alloc, operand: 0 },
      Instruction::Unary { opcode: Operation::Push,  operand: 2 },
      Instruction::Nullary(Operation::Print),
      Instruction::Nullary(Operation::Halt),
    ]);
    assert_eq!(program, vec![15, 0, 0, 2, 8, 18]);
  }

  #[test]
  fn disassemble_listing(){
    let program = vec![0, 5, 8, 9, 0, 42];
    let (listing, fault) = disassemble(&program);
    assert_eq!(
      listing,
      vec![
        (0, Instruction::Unary { opcode: Operation::Push, operand: 5 }),
        (2, Instruction::Nullary(Operation::Print)),
        (3, Instruction::Unary { opcode: Operation::Jmp, operand: 0 }),
      ]
    );
    assert_eq!(fault, Some((5, FaultKind::UnknownInstruction { word: 42 })));
  }

}

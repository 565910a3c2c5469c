/*!

  A program is a flat sequence of 32 bit signed cells. Each instruction occupies either one cell
  (the opcode alone) or two cells (the opcode followed by a single inline operand). Operands are
  raw cell values: a literal for `PUSH`, a cell index for the jumps, and a variable index for
  `ALLOC`, `LOAD`, and `STORE`.

    Opcode:   1 cell
    Operand:  1 cell, present only for `Operation::arity() == 1`

  The opcode and the operand share a cell type so that a program can be written as a single
  literal array. The consequence is that nothing distinguishes an opcode cell from an operand cell
  except its position, and a jump into the middle of an instruction will happily decode the
  operand as an opcode.

*/

mod binary;
mod instruction;

pub use binary::{assemble, disassemble, encode_instruction, instruction_size, try_decode_instruction,
                 EncodedInstruction, Word};
pub use instruction::{Instruction, Operation};

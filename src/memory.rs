//! Variable memory: a fixed number of index-addressed slots that must be allocated before use.

use std::convert::TryFrom;
use std::fmt::{Display, Formatter};

use crate::bytecode::Word;
use crate::error::FaultKind;
use crate::vm::Value;

/// A single variable slot.
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug)]
pub enum Slot {
  /// Never allocated or stored to.
  Unallocated,
  Value(Value),
}

impl Display for Slot{
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    match self{
      Slot::Value(v) => {
        write!(f, "{}", v)
      },
      Slot::Unallocated => {
        write!(f, "`")
      },
    }
  }
}

#[derive(Clone, Debug)]
pub struct VariableMemory {
  slots: Vec<Slot>,
}

impl VariableMemory {

  pub fn new(size: usize) -> VariableMemory {
    VariableMemory {
      slots: vec![Slot::Unallocated; size]
    }
  }

  pub fn size(&self) -> usize {
    self.slots.len()
  }

  pub fn slots(&self) -> &[Slot] {
    &self.slots
  }

  /// Converts an operand cell to a slot index, rejecting negative and too-large indices.
  fn index(&self, operand: Word) -> Result<usize, FaultKind> {
    usize::try_from(operand)
      .ok()
      .filter(|i| *i < self.slots.len())
      .ok_or(FaultKind::MemoryIndexOutOfRange { index: operand })
  }

  /// Zero-initializes the slot. Allocating an already allocated slot resets it to zero.
  pub fn alloc(&mut self, operand: Word) -> Result<(), FaultKind> {
    let i = self.index(operand)?;
    self.slots[i] = Slot::Value(0);
    Ok(())
  }

  pub fn load(&self, operand: Word) -> Result<Value, FaultKind> {
    let i = self.index(operand)?;
    match self.slots[i] {
      Slot::Value(v)    => Ok(v),
      Slot::Unallocated => Err(FaultKind::UninitializedVariable { index: i }),
    }
  }

  /// Writes the slot. A store into an unallocated slot allocates it.
  pub fn store(&mut self, operand: Word, value: Value) -> Result<(), FaultKind> {
    let i = self.index(operand)?;
    self.slots[i] = Slot::Value(value);
    Ok(())
  }
}


#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn alloc_zero_initializes(){
    let mut m = VariableMemory::new(2);
    m.store(1, 9).unwrap();
    m.alloc(1).unwrap();
    assert_eq!(m.load(1), Ok(0));
  }

  #[test]
  fn load_unallocated(){
    let m = VariableMemory::new(2);
    assert_eq!(m.load(0), Err(FaultKind::UninitializedVariable { index: 0 }));
    assert_eq!(m.slots(), &[Slot::Unallocated, Slot::Unallocated]);
  }

  #[test]
  fn store_then_load(){
    let mut m = VariableMemory::new(1);
    m.store(0, -3).unwrap();
    assert_eq!(m.load(0), Ok(-3));
  }

  #[test]
  fn index_out_of_range(){
    let mut m = VariableMemory::new(3);
    assert_eq!(m.alloc(3),    Err(FaultKind::MemoryIndexOutOfRange { index: 3 }));
    assert_eq!(m.load(-1),    Err(FaultKind::MemoryIndexOutOfRange { index: -1 }));
    assert_eq!(m.store(7, 1), Err(FaultKind::MemoryIndexOutOfRange { index: 7 }));
    assert_eq!(m.size(), 3);
  }

  #[test]
  fn slot_display(){
    assert_eq!(Slot::Unallocated.to_string(), "`");
    assert_eq!(Slot::Value(12).to_string(), "12");
  }

}

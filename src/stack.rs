//! The operand stack: a bounded, pre-sized store that grows and shrinks only at the top.

use crate::error::FaultKind;
use crate::vm::Value;

#[derive(Clone, Debug)]
pub struct OperandStack {
  /// Live elements, bottom first. Never longer than `capacity`.
  cells    : Vec<Value>,
  capacity : usize,
}

impl OperandStack {

  pub fn new(capacity: usize) -> OperandStack {
    OperandStack {
      cells: Vec::with_capacity(capacity),
      capacity
    }
  }

  /// The stack pointer, i.e. the count of live elements.
  pub fn depth(&self) -> usize {
    self.cells.len()
  }

  pub fn as_slice(&self) -> &[Value] {
    &self.cells
  }

  pub fn push(&mut self, value: Value) -> Result<(), FaultKind> {
    if self.cells.len() >= self.capacity {
      return Err(FaultKind::StackOverflow);
    }
    self.cells.push(value);
    Ok(())
  }

  pub fn pop(&mut self) -> Result<Value, FaultKind> {
    self.cells.pop().ok_or(FaultKind::StackUnderflow)
  }

  /// Reads the top element without removing it.
  pub fn peek(&self) -> Result<Value, FaultKind> {
    self.cells.last().copied().ok_or(FaultKind::StackUnderflow)
  }

  /// Exchanges the top two elements.
  pub fn swap_top(&mut self) -> Result<(), FaultKind> {
    let depth = self.cells.len();
    if depth < 2 {
      return Err(FaultKind::StackUnderflow);
    }
    self.cells.swap(depth - 1, depth - 2);
    Ok(())
  }

  pub fn into_vec(self) -> Vec<Value> {
    self.cells
  }
}


#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn push_pop_lifo(){
    let mut s = OperandStack::new(4);
    s.push(1).unwrap();
    s.push(2).unwrap();
    assert_eq!(s.depth(), 2);
    assert_eq!(s.peek(), Ok(2));
    assert_eq!(s.pop(), Ok(2));
    assert_eq!(s.pop(), Ok(1));
    assert_eq!(s.pop(), Err(FaultKind::StackUnderflow));
    assert_eq!(s.depth(), 0);
  }

  #[test]
  fn overflow_at_capacity(){
    let mut s = OperandStack::new(2);
    s.push(1).unwrap();
    s.push(2).unwrap();
    assert_eq!(s.push(3), Err(FaultKind::StackOverflow));
    assert_eq!(s.as_slice(), &[1, 2]);
  }

  #[test]
  fn zero_capacity(){
    let mut s = OperandStack::new(0);
    assert_eq!(s.push(1), Err(FaultKind::StackOverflow));
    assert_eq!(s.peek(), Err(FaultKind::StackUnderflow));
  }

  #[test]
  fn swap_top_two(){
    let mut s = OperandStack::new(3);
    s.push(1).unwrap();
    assert_eq!(s.swap_top(), Err(FaultKind::StackUnderflow));
    s.push(2).unwrap();
    s.push(3).unwrap();
    s.swap_top().unwrap();
    assert_eq!(s.into_vec(), vec![1, 3, 2]);
  }

}

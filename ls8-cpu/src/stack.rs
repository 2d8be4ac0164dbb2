use std::fmt;

use thiserror::Error;

use crate::cpu::Ls8Ram;
use crate::registers::Ls8Registers;

#[derive(Clone, Copy, Debug, Error, PartialEq, Eq, Hash)]
pub enum StackError {
    #[error("stack overflow at sp 0x{0:02X}")]
    Overflow(u8),
    #[error("stack underflow at sp 0x{0:02X}")]
    Underflow(u8),
}

impl StackError {
    pub fn sp(&self) -> u8 {
        match self {
            StackError::Overflow(sp) | StackError::Underflow(sp) => *sp,
        }
    }
}

/// Full-descending stack living in RAM, addressed through R7.
///
/// Only the ends of memory are enforced. Popping above the initial SP reads
/// whatever sits there (0xF4..=0xFE by default) rather than faulting.
pub struct Ls8Stack<'a> {
    ram: &'a mut Ls8Ram,
    regs: &'a mut Ls8Registers,
}

impl<'a> fmt::Debug for Ls8Stack<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LS8 Stack")
            .field("sp", &format_args!("0x{:02X}", self.regs.sp()))
            .finish()
    }
}

impl<'a> Ls8Stack<'a> {
    pub fn new(ram: &'a mut Ls8Ram, regs: &'a mut Ls8Registers) -> Self {
        Ls8Stack { ram, regs }
    }

    /// Decrements SP, then stores `value` at the new SP.
    pub fn push(&mut self, value: u8) -> Result<(), StackError> {
        let sp = self.regs.sp();
        let next = sp.checked_sub(1).ok_or(StackError::Overflow(sp))?;
        self.ram
            .write_u8(next as usize, value)
            .map_err(|_| StackError::Overflow(sp))?;
        self.regs.set_sp(next);
        Ok(())
    }

    /// Reads the value at SP, then increments SP.
    pub fn pop(&mut self) -> Result<u8, StackError> {
        let sp = self.regs.sp();
        let next = sp.checked_add(1).ok_or(StackError::Underflow(sp))?;
        let value = self
            .ram
            .read_u8(sp as usize)
            .map_err(|_| StackError::Underflow(sp))?;
        self.regs.set_sp(next);
        Ok(value)
    }
}

use std::io;

use thiserror::Error;

/// A fatal fault raised while executing an instruction. Every variant carries
/// the address of the instruction that faulted.
#[derive(Debug, Error)]
pub enum ExecutionError {
    #[error("illegal instruction 0x{opcode:02X} at 0x{pc:02X}")]
    IllegalInstruction { pc: usize, opcode: u8 },
    #[error("division by zero executing 0x{opcode:02X} at 0x{pc:02X}")]
    DivisionByZero { pc: usize, opcode: u8 },
    #[error("stack fault at 0x{pc:02X}: stack pointer 0x{sp:02X} would leave memory")]
    StackFault { pc: usize, sp: u8 },
    #[error("address 0x{address:02X} out of bounds at 0x{pc:02X}")]
    OutOfBounds { pc: usize, address: usize },
    #[error("invalid register R{index} at 0x{pc:02X}")]
    InvalidRegister { pc: usize, index: u8 },
    #[error("failed to write output at 0x{pc:02X}")]
    Output {
        pc: usize,
        #[source]
        source: io::Error,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ErrorKind {
    IllegalInstruction,
    DivisionByZero,
    StackFault,
    OutOfBounds,
    InvalidRegister,
    Output,
}

impl ExecutionError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ExecutionError::IllegalInstruction { .. } => ErrorKind::IllegalInstruction,
            ExecutionError::DivisionByZero { .. } => ErrorKind::DivisionByZero,
            ExecutionError::StackFault { .. } => ErrorKind::StackFault,
            ExecutionError::OutOfBounds { .. } => ErrorKind::OutOfBounds,
            ExecutionError::InvalidRegister { .. } => ErrorKind::InvalidRegister,
            ExecutionError::Output { .. } => ErrorKind::Output,
        }
    }

    pub fn pc(&self) -> usize {
        match self {
            ExecutionError::IllegalInstruction { pc, .. }
            | ExecutionError::DivisionByZero { pc, .. }
            | ExecutionError::StackFault { pc, .. }
            | ExecutionError::OutOfBounds { pc, .. }
            | ExecutionError::InvalidRegister { pc, .. }
            | ExecutionError::Output { pc, .. } => *pc,
        }
    }
}

pub type Result<T> = std::result::Result<T, ExecutionError>;

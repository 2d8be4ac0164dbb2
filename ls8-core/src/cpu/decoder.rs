use crate::cpu::opcode::OpcodeError;
use crate::cpu::Instruction;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DecodeError {
    #[error("invalid opcode 0x{0:02X}")]
    InvalidOpcode(u8),
    #[error("nothing to decode at 0x{0:02X}")]
    Empty(usize),
    #[error("opcode 0x{opcode:02X} at 0x{address:02X} needs {needed} bytes, only {available} available")]
    Truncated {
        address: usize,
        opcode: u8,
        needed: usize,
        available: usize,
    },
    #[error(transparent)]
    Opcode(#[from] OpcodeError),
}

pub type Result<T> = std::result::Result<T, DecodeError>;

pub trait DecodeOne {
    type Instruction: Instruction;

    fn decode_one(&self, address: usize, bytes: &[u8]) -> Result<Self::Instruction>;
}

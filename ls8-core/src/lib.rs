pub mod cpu;

mod machine;
mod storage;

pub use crate::cpu::decoder::{DecodeError, DecodeOne};
pub use crate::cpu::opcode::{Opcode8, OpcodeError};
pub use crate::cpu::Instruction;
pub use crate::machine::{Machine, MachineError, Result};
pub use crate::storage::{MemoryError, RamStats, RAM};

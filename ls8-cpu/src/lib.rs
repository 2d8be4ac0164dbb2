pub mod alu;
pub mod config;
pub mod cpu;
pub mod decoder;
pub mod dispatch;
pub mod error;
pub mod isa;
pub mod machine;
pub mod program;
pub mod registers;

mod instructions;
mod stack;

pub use crate::config::{Ls8Config, UnknownOpcodePolicy};
pub use crate::cpu::{EngineState, Flow, Ls8Cpu, Ls8Ram, RunOutcome, Status, MEMORY_SIZE};
pub use crate::error::{ErrorKind, ExecutionError};
pub use crate::machine::{ImageFormat, Ls8Machine};
pub use crate::program::{parse_program, ProgramError};
pub use crate::registers::{Ls8Flags, Ls8Registers, RegisterId};

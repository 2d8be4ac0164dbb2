use std::error::Error as StdError;
use std::io;
use std::path::Path;

use thiserror::Error;

use crate::storage::MemoryError;

#[derive(Debug, Error)]
pub enum MachineError {
    #[error(transparent)]
    Memory(#[from] MemoryError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("failed to load '{0}' into memory")]
    FileLoad(String, #[source] Box<dyn StdError + Send + Sync>),
}

pub type Result<T> = std::result::Result<T, MachineError>;

/// A complete emulated system: something that can be handed a program and
/// then driven one instruction at a time.
pub trait Machine {
    /// Fatal error raised while executing the loaded program.
    type Fault: StdError + Send + Sync + 'static;

    /// Loads the program at `file`, returning the number of bytes placed in memory.
    fn load(&mut self, file: &Path) -> Result<usize>;

    fn load_image(&mut self, image: &[u8]) -> Result<usize>;

    /// Executes one instruction. Returns whether the machine is still running.
    fn step(&mut self) -> std::result::Result<bool, Self::Fault>;

    fn run(&mut self) -> std::result::Result<(), Self::Fault> {
        while self.step()? {}
        Ok(())
    }
}

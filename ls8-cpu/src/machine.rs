use std::fs;
use std::io::Write;
use std::path::Path;

use ls8_core::{Machine, MachineError};

use crate::config::Ls8Config;
use crate::cpu::Ls8Cpu;
use crate::error::ExecutionError;
use crate::program::{check_binary, parse_program, ProgramError};

/// How program files handed to [`Ls8Machine::load`] are encoded.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ImageFormat {
    /// One binary digit string per line, `#` comments.
    #[default]
    Text,
    /// Raw bytes, loaded verbatim.
    Binary,
}

/// An LS8 system: the CPU plus the program loader.
#[derive(Debug)]
pub struct Ls8Machine<W: Write> {
    cpu: Ls8Cpu<W>,
    format: ImageFormat,
}

impl<W: Write> Ls8Machine<W> {
    pub fn new(config: Ls8Config, out: W) -> Self {
        Self {
            cpu: Ls8Cpu::new(config, out),
            format: ImageFormat::default(),
        }
    }

    pub fn with_format(mut self, format: ImageFormat) -> Self {
        self.format = format;
        self
    }

    pub fn format(&self) -> ImageFormat {
        self.format
    }

    pub fn cpu(&self) -> &Ls8Cpu<W> {
        &self.cpu
    }

    pub fn cpu_mut(&mut self) -> &mut Ls8Cpu<W> {
        &mut self.cpu
    }

    pub fn into_cpu(self) -> Ls8Cpu<W> {
        self.cpu
    }

    fn read_image(&self, file: &Path) -> Result<Vec<u8>, MachineError> {
        let load_error =
            |err: ProgramError| MachineError::FileLoad(file.display().to_string(), Box::new(err));
        match self.format {
            ImageFormat::Text => {
                let source = fs::read_to_string(file)?;
                parse_program(&source).map_err(load_error)
            }
            ImageFormat::Binary => {
                let image = fs::read(file)?;
                check_binary(&image).map_err(load_error)?;
                Ok(image)
            }
        }
    }
}

impl<W: Write> Machine for Ls8Machine<W> {
    type Fault = ExecutionError;

    fn load(&mut self, file: &Path) -> ls8_core::Result<usize> {
        tracing::info!("loading {:?} image '{}'", self.format, file.display());
        let image = self.read_image(file)?;
        self.load_image(&image)
    }

    fn load_image(&mut self, image: &[u8]) -> ls8_core::Result<usize> {
        Ok(self.cpu.load_image(image)?)
    }

    fn step(&mut self) -> Result<bool, ExecutionError> {
        self.cpu.step()
    }

    fn run(&mut self) -> Result<(), ExecutionError> {
        self.cpu.run()
    }
}

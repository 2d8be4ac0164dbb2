use std::fmt;
use std::io::Write;

use ls8_core::{DecodeError, DecodeOne, Instruction, MemoryError, RamStats, RAM};

use crate::config::{Ls8Config, UnknownOpcodePolicy};
use crate::decoder::{DecodedInstruction, Ls8Decoder};
use crate::dispatch::BranchTable;
use crate::error::{ExecutionError, Result};
use crate::registers::{Ls8Flags, Ls8Registers};
use crate::stack::Ls8Stack;

pub const MEMORY_SIZE: usize = 256;

pub type Ls8Ram = RAM<MEMORY_SIZE>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Status {
    /// Loaded, nothing executed yet.
    Ready,
    Running,
    Halted,
    /// Stopped by an `ExecutionError`.
    Faulted,
}

/// What a handler decided about the next PC.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Flow {
    /// Continue with the byte after this instruction.
    Next,
    Jump(u8),
    Halt,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RunOutcome {
    Halted { steps: u64 },
    StepLimitReached { steps: u64 },
}

/// Everything that determines what the machine does next.
#[derive(Clone, Debug)]
pub struct EngineState {
    pub(crate) ram: Ls8Ram,
    pub(crate) regs: Ls8Registers,
    pub(crate) flags: Ls8Flags,
    pub(crate) pc: usize,
    pub(crate) status: Status,
}

impl EngineState {
    pub fn new(config: &Ls8Config) -> Self {
        Self {
            ram: Ls8Ram::new(),
            regs: Ls8Registers::new(config.stack_pointer),
            flags: Ls8Flags::default(),
            pc: config.start_pc as usize,
            status: Status::Ready,
        }
    }

    pub(crate) fn stack(&mut self) -> Ls8Stack<'_> {
        Ls8Stack::new(&mut self.ram, &mut self.regs)
    }

    pub fn pc(&self) -> usize {
        self.pc
    }

    pub fn registers(&self) -> &Ls8Registers {
        &self.regs
    }

    pub fn flags(&self) -> Ls8Flags {
        self.flags
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn memory(&self) -> &[u8] {
        self.ram.as_slice()
    }

    pub fn is_running(&self) -> bool {
        matches!(self.status, Status::Ready | Status::Running)
    }
}

pub struct Ls8Cpu<W: Write> {
    config: Ls8Config,
    state: EngineState,
    decoder: Ls8Decoder,
    table: BranchTable,
    out: W,
    steps: u64,
}

impl<W: Write> fmt::Debug for Ls8Cpu<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ls8Cpu")
            .field("pc", &format_args!("0x{:02X}", self.state.pc))
            .field("status", &self.state.status)
            .field("regs", &self.state.regs)
            .field("flags", &self.state.flags)
            .field("steps", &self.steps)
            .finish()
    }
}

impl<W: Write> Ls8Cpu<W> {
    pub fn new(config: Ls8Config, out: W) -> Self {
        Ls8Cpu {
            config,
            state: EngineState::new(&config),
            decoder: Ls8Decoder,
            table: BranchTable::new(),
            out,
            steps: 0,
        }
    }

    /// Replaces memory with `image` and resets registers, flags and PC.
    pub fn load_image(&mut self, image: &[u8]) -> std::result::Result<usize, MemoryError> {
        let mut state = EngineState::new(&self.config);
        state.ram.load(image)?;
        self.state = state;
        self.steps = 0;
        tracing::info!(
            "loaded {} bytes, pc 0x{:02X}, sp 0x{:02X}",
            image.len(),
            self.state.pc,
            self.state.regs.sp()
        );
        Ok(image.len())
    }

    /// Executes one instruction. Returns whether the machine is still running.
    ///
    /// Once halted or faulted, nothing more is fetched and this returns `Ok(false)`.
    #[tracing::instrument(level = "trace", skip_all)]
    pub fn step(&mut self) -> Result<bool> {
        match self.state.status {
            Status::Halted | Status::Faulted => return Ok(false),
            Status::Ready => {
                tracing::info!("starting execution at 0x{:02X}", self.state.pc);
                self.state.status = Status::Running;
            }
            Status::Running => {}
        }

        if let Err(err) = self.execute_one() {
            tracing::debug!("{} ({} steps executed)", err, self.steps);
            self.state.status = Status::Faulted;
            return Err(err);
        }
        Ok(self.state.status == Status::Running)
    }

    #[tracing::instrument(level = "debug", skip_all)]
    pub fn run(&mut self) -> Result<()> {
        while self.step()? {}
        tracing::debug!(
            "run finished after {} steps, memory {:?}",
            self.steps,
            self.state.ram.stats()
        );
        Ok(())
    }

    /// Like [`run`](Self::run), but gives up after `max_steps` instructions.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn run_for(&mut self, max_steps: u64) -> Result<RunOutcome> {
        let mut steps = 0;
        while self.state.is_running() {
            if steps == max_steps {
                tracing::warn!("step limit of {} reached", max_steps);
                return Ok(RunOutcome::StepLimitReached { steps });
            }
            self.step()?;
            steps += 1;
        }
        Ok(RunOutcome::Halted { steps })
    }

    fn execute_one(&mut self) -> Result<()> {
        let pc = self.state.pc;
        let bytes = self.state.ram.window(pc, 3);
        let ins = self
            .decoder
            .decode_one(pc, bytes)
            .map_err(|err| Self::decode_fault(pc, err))?;
        let opcode = ins.opcode().value();

        let Some(def) = self.table.lookup(opcode) else {
            return self.unknown_opcode(&ins);
        };
        debug_assert_eq!(def.operand_count(), ins.operand_count());
        debug_assert_eq!(def.is_alu(), ins.is_alu());
        tracing::trace!("0x{:02X}: {}", pc, def.render(&ins));

        let flow = def.execute(&mut self.state, &ins, &mut self.out)?;
        match flow {
            Flow::Next => self.state.pc = ins.next_address(),
            Flow::Jump(target) => {
                debug_assert!(ins.sets_pc(), "{} jumped without the sets-PC bit", def);
                self.state.pc = target as usize;
            }
            Flow::Halt => {
                self.state.status = Status::Halted;
                tracing::info!("halted at 0x{:02X} after {} steps", pc, self.steps + 1);
            }
        }
        self.steps += 1;
        Ok(())
    }

    fn unknown_opcode(&mut self, ins: &DecodedInstruction) -> Result<()> {
        let opcode = ins.opcode().value();
        match self.config.unknown_opcode {
            UnknownOpcodePolicy::Fault => Err(ExecutionError::IllegalInstruction {
                pc: ins.address(),
                opcode,
            }),
            UnknownOpcodePolicy::Skip => {
                tracing::warn!(
                    "skipping unknown opcode 0x{:02X} at 0x{:02X} ({} bytes)",
                    opcode,
                    ins.address(),
                    ins.len_bytes()
                );
                self.state.pc = ins.next_address();
                self.steps += 1;
                Ok(())
            }
        }
    }

    fn decode_fault(pc: usize, err: DecodeError) -> ExecutionError {
        match err {
            DecodeError::InvalidOpcode(opcode) => ExecutionError::IllegalInstruction { pc, opcode },
            DecodeError::Empty(address) => ExecutionError::OutOfBounds { pc, address },
            DecodeError::Truncated { available, .. } => ExecutionError::OutOfBounds {
                pc,
                address: pc + available,
            },
            DecodeError::Opcode(_) => ExecutionError::OutOfBounds { pc, address: pc },
        }
    }

    pub fn config(&self) -> &Ls8Config {
        &self.config
    }

    pub fn state(&self) -> &EngineState {
        &self.state
    }

    pub fn registers(&self) -> &Ls8Registers {
        self.state.registers()
    }

    pub fn flags(&self) -> Ls8Flags {
        self.state.flags()
    }

    pub fn pc(&self) -> usize {
        self.state.pc()
    }

    pub fn status(&self) -> Status {
        self.state.status()
    }

    pub fn is_running(&self) -> bool {
        self.state.is_running()
    }

    pub fn memory(&self) -> &[u8] {
        self.state.memory()
    }

    pub fn memory_stats(&self) -> RamStats {
        self.state.ram.stats()
    }

    pub fn steps_executed(&self) -> u64 {
        self.steps
    }

    pub fn writer(&self) -> &W {
        &self.out
    }

    pub fn writer_mut(&mut self) -> &mut W {
        &mut self.out
    }

    pub fn into_writer(self) -> W {
        self.out
    }

    /// `TRACE: PC | RAM[PC] RAM[PC+1] RAM[PC+2] | R0 .. R7`, all in hex.
    pub fn trace_line(&self) -> String {
        let pc = self.state.pc;
        let ram = &self.state.ram;
        let mut line = format!(
            "TRACE: {:02X} | {:02X} {:02X} {:02X} |",
            pc,
            ram.peek(pc).unwrap_or(0),
            ram.peek(pc + 1).unwrap_or(0),
            ram.peek(pc + 2).unwrap_or(0)
        );
        for value in self.state.regs.values() {
            line.push_str(&format!(" {:02X}", value));
        }
        line
    }

    pub fn disassemble(&self, address: usize) -> String {
        let bytes = self.state.ram.window(address, 3);
        match self.decoder.decode_one(address, bytes) {
            Ok(ins) => match self.table.lookup(ins.opcode().value()) {
                Some(def) => def.render(&ins),
                None => format!("??? 0x{:02X}", ins.opcode().value()),
            },
            Err(DecodeError::InvalidOpcode(opcode))
            | Err(DecodeError::Truncated { opcode, .. }) => format!("??? 0x{:02X}", opcode),
            Err(_) => String::from("<out of bounds>"),
        }
    }
}

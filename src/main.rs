use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use ls8_core::Machine;
use ls8_cpu::{
    ErrorKind, ExecutionError, ImageFormat, Ls8Config, Ls8Machine, RunOutcome,
    UnknownOpcodePolicy,
};
use thiserror::Error;
use tracing::Subscriber;
use tracing_flame::FlameLayer;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Registry};

const EXIT_LOAD: u8 = 1;
const EXIT_STEP_LIMIT: u8 = 6;
const EXIT_OUTPUT: u8 = 7;

#[derive(Debug, Error)]
#[error("failed to flush program output")]
struct OutputFlushError;

#[derive(Parser, Debug)]
#[command(name = "ls8")]
#[command(about = "Runs a program on the LS8 8-bit emulator", long_about = None)]
struct Args {
    /// Program image; one binary byte per line unless --binary is given
    program: PathBuf,

    /// Print a TRACE line to stderr before every instruction
    #[arg(long, action = ArgAction::SetTrue)]
    trace: bool,

    /// Stop with exit code 6 after this many instructions
    #[arg(long)]
    max_steps: Option<u64>,

    /// Step over unknown opcodes instead of faulting
    #[arg(long, action = ArgAction::SetTrue)]
    skip_unknown: bool,

    /// Address of the first instruction
    #[arg(long, default_value_t = 0)]
    start_pc: u8,

    /// Treat the program file as a raw byte image
    #[arg(long, action = ArgAction::SetTrue)]
    binary: bool,

    /// Write folded tracing spans to this file (for inferno/flamegraph)
    #[arg(long)]
    flame: Option<PathBuf>,

    /// More logging; repeat for more (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Args {
    fn config(&self) -> Ls8Config {
        Ls8Config {
            start_pc: self.start_pc,
            unknown_opcode: if self.skip_unknown {
                UnknownOpcodePolicy::Skip
            } else {
                UnknownOpcodePolicy::Fault
            },
            ..Default::default()
        }
    }

    fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

fn exit_code(kind: ErrorKind) -> u8 {
    match kind {
        ErrorKind::IllegalInstruction => 2,
        ErrorKind::DivisionByZero => 3,
        ErrorKind::StackFault => 4,
        ErrorKind::OutOfBounds | ErrorKind::InvalidRegister => 5,
        ErrorKind::Output => EXIT_OUTPUT,
    }
}

fn failure_code(err: &anyhow::Error) -> u8 {
    if let Some(fault) = err.downcast_ref::<ExecutionError>() {
        exit_code(fault.kind())
    } else if err.downcast_ref::<OutputFlushError>().is_some() {
        EXIT_OUTPUT
    } else {
        EXIT_LOAD
    }
}

fn execute<W: Write>(machine: &mut Ls8Machine<W>, args: &Args) -> Result<RunOutcome> {
    if !args.trace {
        let outcome = match args.max_steps {
            Some(limit) => machine.cpu_mut().run_for(limit)?,
            None => {
                machine.run()?;
                RunOutcome::Halted {
                    steps: machine.cpu().steps_executed(),
                }
            }
        };
        return Ok(outcome);
    }

    let mut steps = 0;
    while machine.cpu().is_running() {
        if args.max_steps == Some(steps) {
            return Ok(RunOutcome::StepLimitReached { steps });
        }
        eprintln!("{}", machine.cpu().trace_line());
        machine.step()?;
        steps += 1;
    }
    Ok(RunOutcome::Halted { steps })
}

fn run<W: Write>(args: &Args, out: W) -> Result<u8> {
    let format = if args.binary {
        ImageFormat::Binary
    } else {
        ImageFormat::Text
    };
    let mut machine = Ls8Machine::new(args.config(), out).with_format(format);
    machine
        .load(&args.program)
        .with_context(|| format!("could not load '{}'", args.program.display()))?;

    let outcome = execute(&mut machine, args);
    machine
        .cpu_mut()
        .writer_mut()
        .flush()
        .context(OutputFlushError)?;
    match outcome? {
        RunOutcome::Halted { steps } => {
            tracing::info!("halted after {} steps", steps);
            Ok(0)
        }
        RunOutcome::StepLimitReached { steps } => {
            eprintln!("error: step limit reached after {} instructions", steps);
            Ok(EXIT_STEP_LIMIT)
        }
    }
}

/// The log filter only applies to stderr; the flame layer records every span.
fn subscriber(
    filter: EnvFilter,
    flame: Option<FlameLayer<Registry, BufWriter<File>>>,
) -> impl Subscriber + Send + Sync + 'static {
    let stderr_format = tracing_subscriber::fmt::layer()
        .with_writer(io::stderr)
        .with_filter(filter);
    tracing_subscriber::registry().with(flame).with(stderr_format)
}

fn main() -> ExitCode {
    let args = Args::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(args.log_level()));
    let (flame_layer, _flame_guard) = match args.flame.as_ref().map(FlameLayer::with_file) {
        Some(Ok((layer, guard))) => (Some(layer), Some(guard)),
        Some(Err(err)) => {
            eprintln!("error: could not create flame output: {}", err);
            return ExitCode::from(EXIT_LOAD);
        }
        None => (None, None),
    };

    subscriber(filter, flame_layer).init();

    match run(&args, io::stdout()) {
        Ok(code) => ExitCode::from(code),
        Err(err) => {
            eprintln!("error: {:#}", err);
            ExitCode::from(failure_code(&err))
        }
    }
}

use std::io::Write;

use crate::alu::{AluError, AluOp, AluOutput};
use crate::cpu::{EngineState, Flow};
use crate::decoder::DecodedInstruction;
use crate::error::{ExecutionError, Result};
use crate::registers::RegisterId;
use crate::stack::StackError;

fn operand(ins: &DecodedInstruction, idx: usize) -> Result<u8> {
    ins.operand(idx).ok_or(ExecutionError::IllegalInstruction {
        pc: ins.address(),
        opcode: ins.opcode().value(),
    })
}

fn register(ins: &DecodedInstruction, idx: usize) -> Result<RegisterId> {
    RegisterId::try_from(operand(ins, idx)?).map_err(|index| ExecutionError::InvalidRegister {
        pc: ins.address(),
        index,
    })
}

fn stack_fault(ins: &DecodedInstruction, err: StackError) -> ExecutionError {
    ExecutionError::StackFault {
        pc: ins.address(),
        sp: err.sp(),
    }
}

fn output_fault(ins: &DecodedInstruction, source: std::io::Error) -> ExecutionError {
    ExecutionError::Output {
        pc: ins.address(),
        source,
    }
}

pub(crate) fn nop(_: &mut EngineState, _: &DecodedInstruction, _: &mut dyn Write) -> Result<Flow> {
    Ok(Flow::Next)
}

pub(crate) fn hlt(_: &mut EngineState, _: &DecodedInstruction, _: &mut dyn Write) -> Result<Flow> {
    Ok(Flow::Halt)
}

pub(crate) fn ldi(
    state: &mut EngineState,
    ins: &DecodedInstruction,
    _: &mut dyn Write,
) -> Result<Flow> {
    let reg = register(ins, 0)?;
    let value = operand(ins, 1)?;
    state.regs[reg] = value;
    Ok(Flow::Next)
}

pub(crate) fn prn(
    state: &mut EngineState,
    ins: &DecodedInstruction,
    out: &mut dyn Write,
) -> Result<Flow> {
    let reg = register(ins, 0)?;
    writeln!(out, "{}", state.regs[reg]).map_err(|err| output_fault(ins, err))?;
    Ok(Flow::Next)
}

pub(crate) fn pra(
    state: &mut EngineState,
    ins: &DecodedInstruction,
    out: &mut dyn Write,
) -> Result<Flow> {
    let reg = register(ins, 0)?;
    out.write_all(&[state.regs[reg]])
        .map_err(|err| output_fault(ins, err))?;
    Ok(Flow::Next)
}

pub(crate) fn push(
    state: &mut EngineState,
    ins: &DecodedInstruction,
    _: &mut dyn Write,
) -> Result<Flow> {
    let reg = register(ins, 0)?;
    let value = state.regs[reg];
    state
        .stack()
        .push(value)
        .map_err(|err| stack_fault(ins, err))?;
    Ok(Flow::Next)
}

pub(crate) fn pop(
    state: &mut EngineState,
    ins: &DecodedInstruction,
    _: &mut dyn Write,
) -> Result<Flow> {
    let reg = register(ins, 0)?;
    let value = state.stack().pop().map_err(|err| stack_fault(ins, err))?;
    state.regs[reg] = value;
    Ok(Flow::Next)
}

pub(crate) fn call(
    state: &mut EngineState,
    ins: &DecodedInstruction,
    _: &mut dyn Write,
) -> Result<Flow> {
    let reg = register(ins, 0)?;
    let target = state.regs[reg];
    let return_address =
        u8::try_from(ins.next_address()).map_err(|_| ExecutionError::OutOfBounds {
            pc: ins.address(),
            address: ins.next_address(),
        })?;
    state
        .stack()
        .push(return_address)
        .map_err(|err| stack_fault(ins, err))?;
    Ok(Flow::Jump(target))
}

pub(crate) fn ret(
    state: &mut EngineState,
    ins: &DecodedInstruction,
    _: &mut dyn Write,
) -> Result<Flow> {
    let target = state.stack().pop().map_err(|err| stack_fault(ins, err))?;
    Ok(Flow::Jump(target))
}

pub(crate) fn jmp(
    state: &mut EngineState,
    ins: &DecodedInstruction,
    _: &mut dyn Write,
) -> Result<Flow> {
    let reg = register(ins, 0)?;
    Ok(Flow::Jump(state.regs[reg]))
}

pub(crate) fn jeq(
    state: &mut EngineState,
    ins: &DecodedInstruction,
    _: &mut dyn Write,
) -> Result<Flow> {
    let reg = register(ins, 0)?;
    if state.flags.equal() {
        Ok(Flow::Jump(state.regs[reg]))
    } else {
        Ok(Flow::Next)
    }
}

pub(crate) fn jne(
    state: &mut EngineState,
    ins: &DecodedInstruction,
    _: &mut dyn Write,
) -> Result<Flow> {
    let reg = register(ins, 0)?;
    if state.flags.equal() {
        Ok(Flow::Next)
    } else {
        Ok(Flow::Jump(state.regs[reg]))
    }
}

pub(crate) fn alu(op: AluOp, state: &mut EngineState, ins: &DecodedInstruction) -> Result<Flow> {
    let reg_a = register(ins, 0)?;
    let reg_b = if op.is_unary() {
        reg_a
    } else {
        register(ins, 1)?
    };

    match op.apply(state.regs[reg_a], state.regs[reg_b]) {
        Ok(AluOutput::Value(value)) => state.regs[reg_a] = value,
        Ok(AluOutput::Compare(ordering)) => state.flags.set_from(ordering),
        Err(AluError::DivisionByZero) => {
            return Err(ExecutionError::DivisionByZero {
                pc: ins.address(),
                opcode: ins.opcode().value(),
            })
        }
    }
    tracing::trace!(
        "{:?} -> {} = 0x{:02X}, flags 0b{:03b}",
        op,
        reg_a,
        state.regs[reg_a],
        state.flags.bits()
    );
    Ok(Flow::Next)
}

use std::fmt;
use std::io::Write;

use crate::alu::AluOp;
use crate::cpu::{EngineState, Flow};
use crate::decoder::DecodedInstruction;
use crate::error::Result;
use crate::instructions;
use crate::isa::*;

pub type Handler = fn(&mut EngineState, &DecodedInstruction, &mut dyn Write) -> Result<Flow>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperandDef {
    Register,
    Immediate,
}

#[derive(Clone, Copy)]
pub enum Semantics {
    /// Binary (or unary) operation over register values, result into the first register.
    Alu(AluOp),
    Handler(Handler),
}

impl fmt::Debug for Semantics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Semantics::Alu(op) => write!(f, "Alu({:?})", op),
            Semantics::Handler(_) => f.write_str("Handler"),
        }
    }
}

pub struct InstructionDef {
    mnemonic: &'static str,
    opcode: u8,
    operands: &'static [OperandDef],
    semantics: Semantics,
}

impl InstructionDef {
    pub const fn new(
        mnemonic: &'static str,
        opcode: u8,
        operands: &'static [OperandDef],
        semantics: Semantics,
    ) -> Self {
        Self {
            mnemonic,
            opcode,
            operands,
            semantics,
        }
    }

    pub fn mnemonic(&self) -> &'static str {
        self.mnemonic
    }

    pub fn opcode(&self) -> u8 {
        self.opcode
    }

    pub fn operand_count(&self) -> usize {
        self.operands.len()
    }

    pub fn is_alu(&self) -> bool {
        matches!(self.semantics, Semantics::Alu(_))
    }

    /// Runs the instruction against `state`. The returned [`Flow`] decides the next PC.
    pub fn execute(
        &self,
        state: &mut EngineState,
        instruction: &DecodedInstruction,
        out: &mut dyn Write,
    ) -> Result<Flow> {
        match self.semantics {
            Semantics::Alu(op) => instructions::alu(op, state, instruction),
            Semantics::Handler(handler) => handler(state, instruction, out),
        }
    }

    /// Formats `instruction` with this definition, e.g. `LDI R0, 0x08`.
    pub fn render(&self, instruction: &DecodedInstruction) -> String {
        let mut text = String::from(self.mnemonic);
        for (idx, operand) in self.operands.iter().enumerate() {
            text.push_str(if idx == 0 { " " } else { ", " });
            match (operand, instruction.operand(idx)) {
                (OperandDef::Register, Some(value)) => text.push_str(&format!("R{}", value)),
                (OperandDef::Immediate, Some(value)) => {
                    text.push_str(&format!("0x{:02X}", value))
                }
                (_, None) => text.push('?'),
            }
        }
        text
    }
}

impl fmt::Debug for InstructionDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InstructionDef")
            .field("mnemonic", &self.mnemonic)
            .field("opcode", &format_args!("0b{:08b}", self.opcode))
            .field("operands", &self.operands)
            .field("semantics", &self.semantics)
            .finish()
    }
}

impl fmt::Display for InstructionDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let operands: Vec<&str> = self
            .operands
            .iter()
            .map(|op| match op {
                OperandDef::Register => "r",
                OperandDef::Immediate => "imm",
            })
            .collect();
        if operands.is_empty() {
            f.write_str(self.mnemonic)
        } else {
            write!(f, "{} {}", self.mnemonic, operands.join(", "))
        }
    }
}

const R: OperandDef = OperandDef::Register;
const IMM: OperandDef = OperandDef::Immediate;

const fn op(
    mnemonic: &'static str,
    opcode: u8,
    operands: &'static [OperandDef],
    handler: Handler,
) -> InstructionDef {
    InstructionDef::new(mnemonic, opcode, operands, Semantics::Handler(handler))
}

const fn alu(
    mnemonic: &'static str,
    opcode: u8,
    operands: &'static [OperandDef],
    alu_op: AluOp,
) -> InstructionDef {
    InstructionDef::new(mnemonic, opcode, operands, Semantics::Alu(alu_op))
}

pub static INSTRUCTIONS: &[InstructionDef] = &[
    op("NOP", NOP, &[], instructions::nop),
    op("HLT", HLT, &[], instructions::hlt),
    op("RET", RET, &[], instructions::ret),
    op("PUSH", PUSH, &[R], instructions::push),
    op("POP", POP, &[R], instructions::pop),
    op("PRN", PRN, &[R], instructions::prn),
    op("PRA", PRA, &[R], instructions::pra),
    op("CALL", CALL, &[R], instructions::call),
    op("JMP", JMP, &[R], instructions::jmp),
    op("JEQ", JEQ, &[R], instructions::jeq),
    op("JNE", JNE, &[R], instructions::jne),
    alu("INC", INC, &[R], AluOp::Inc),
    alu("DEC", DEC, &[R], AluOp::Dec),
    alu("NOT", NOT, &[R], AluOp::Not),
    op("LDI", LDI, &[R, IMM], instructions::ldi),
    alu("ADD", ADD, &[R, R], AluOp::Add),
    alu("SUB", SUB, &[R, R], AluOp::Sub),
    alu("MUL", MUL, &[R, R], AluOp::Mul),
    alu("DIV", DIV, &[R, R], AluOp::Div),
    alu("MOD", MOD, &[R, R], AluOp::Mod),
    alu("CMP", CMP, &[R, R], AluOp::Cmp),
    alu("AND", AND, &[R, R], AluOp::And),
    alu("OR", OR, &[R, R], AluOp::Or),
    alu("XOR", XOR, &[R, R], AluOp::Xor),
    alu("SHL", SHL, &[R, R], AluOp::Shl),
    alu("SHR", SHR, &[R, R], AluOp::Shr),
];

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn opcodes_are_unique() {
        let mut seen = HashSet::new();
        for def in INSTRUCTIONS {
            assert!(seen.insert(def.opcode()), "duplicate opcode for {}", def);
        }
        assert_eq!(seen.len(), 26);
    }

    #[test]
    fn operand_count_matches_top_bits() {
        for def in INSTRUCTIONS {
            assert_eq!(
                (def.opcode() >> 6) as usize,
                def.operand_count(),
                "{:?}",
                def
            );
        }
    }

    #[test]
    fn alu_bit_matches_semantics() {
        for def in INSTRUCTIONS {
            assert_eq!(def.opcode() & 0b0010_0000 != 0, def.is_alu(), "{:?}", def);
        }
    }

    #[test]
    fn pc_setting_instructions() {
        let setters: HashSet<&str> = INSTRUCTIONS
            .iter()
            .filter(|def| def.opcode() & 0b0001_0000 != 0)
            .map(|def| def.mnemonic())
            .collect();
        let expected: HashSet<&str> = ["RET", "CALL", "JMP", "JEQ", "JNE"].into_iter().collect();
        assert_eq!(setters, expected);
    }

    #[test]
    fn display_lists_operand_kinds() {
        let ldi = INSTRUCTIONS.iter().find(|def| def.opcode() == LDI).unwrap();
        assert_eq!(ldi.to_string(), "LDI r, imm");
        let hlt = INSTRUCTIONS.iter().find(|def| def.opcode() == HLT).unwrap();
        assert_eq!(hlt.to_string(), "HLT");
    }
}

//! LS8 opcodes. Every opcode is laid out as `AABCDDDD`:
//!
//! - `AA`: number of operand bytes following the opcode (0-2)
//! - `B`: the instruction is an ALU operation
//! - `C`: the instruction sets PC itself
//! - `DDDD`: instruction identifier

pub mod instruction;

pub use instruction::{Handler, InstructionDef, OperandDef, Semantics, INSTRUCTIONS};

pub const NOP: u8 = 0b0000_0000;
pub const HLT: u8 = 0b0000_0001;
pub const RET: u8 = 0b0001_0001;

pub const PUSH: u8 = 0b0100_0101;
pub const POP: u8 = 0b0100_0110;
pub const PRN: u8 = 0b0100_0111;
pub const PRA: u8 = 0b0100_1000;

pub const CALL: u8 = 0b0101_0000;
pub const JMP: u8 = 0b0101_0100;
pub const JEQ: u8 = 0b0101_0101;
pub const JNE: u8 = 0b0101_0110;

pub const INC: u8 = 0b0110_0101;
pub const DEC: u8 = 0b0110_0110;
pub const NOT: u8 = 0b0110_1001;

pub const LDI: u8 = 0b1000_0010;

pub const ADD: u8 = 0b1010_0000;
pub const SUB: u8 = 0b1010_0001;
pub const MUL: u8 = 0b1010_0010;
pub const DIV: u8 = 0b1010_0011;
pub const MOD: u8 = 0b1010_0100;
pub const CMP: u8 = 0b1010_0111;
pub const AND: u8 = 0b1010_1000;
pub const OR: u8 = 0b1010_1010;
pub const XOR: u8 = 0b1010_1011;
pub const SHL: u8 = 0b1010_1100;
pub const SHR: u8 = 0b1010_1101;

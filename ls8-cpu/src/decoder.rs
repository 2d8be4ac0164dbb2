use ls8_core::cpu::decoder::Result;
use ls8_core::{DecodeError, DecodeOne, Instruction, Opcode8};

const OPERAND_COUNT_BITS: std::ops::RangeInclusive<usize> = 6..=7;
const ALU_BIT: usize = 5;
const SETS_PC_BIT: usize = 4;

pub const MAX_OPERANDS: usize = 2;

/// One instruction as read from memory. Everything here comes from the opcode
/// bits and the bytes after it; nothing depends on the branch table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DecodedInstruction {
    address: usize,
    opcode: Opcode8,
    operand_count: usize,
    is_alu: bool,
    sets_pc: bool,
    operands: [u8; MAX_OPERANDS],
}

impl DecodedInstruction {
    pub fn address(&self) -> usize {
        self.address
    }

    pub fn opcode(&self) -> Opcode8 {
        self.opcode
    }

    pub fn operand_count(&self) -> usize {
        self.operand_count
    }

    pub fn is_alu(&self) -> bool {
        self.is_alu
    }

    pub fn sets_pc(&self) -> bool {
        self.sets_pc
    }

    pub fn operand(&self, idx: usize) -> Option<u8> {
        if idx < self.operand_count {
            Some(self.operands[idx])
        } else {
            None
        }
    }

    pub fn operands(&self) -> &[u8] {
        &self.operands[..self.operand_count]
    }

    /// Address of the byte following this instruction.
    pub fn next_address(&self) -> usize {
        self.address + self.len_bytes()
    }
}

impl Instruction for DecodedInstruction {
    fn len_bytes(&self) -> usize {
        1 + self.operand_count
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct Ls8Decoder;

impl Ls8Decoder {
    /// Operand count announced by the opcode's top two bits.
    pub fn operand_count(&self, opcode: Opcode8) -> Result<usize> {
        let count = opcode.try_get_field(OPERAND_COUNT_BITS)? as usize;
        if count > MAX_OPERANDS {
            return Err(DecodeError::InvalidOpcode(opcode.value()));
        }
        Ok(count)
    }
}

impl DecodeOne for Ls8Decoder {
    type Instruction = DecodedInstruction;

    fn decode_one(&self, address: usize, bytes: &[u8]) -> Result<Self::Instruction> {
        let opcode = Opcode8::from_be_bytes(bytes).map_err(|_| DecodeError::Empty(address))?;
        let operand_count = self.operand_count(opcode)?;

        let needed = 1 + operand_count;
        if bytes.len() < needed {
            return Err(DecodeError::Truncated {
                address,
                opcode: opcode.value(),
                needed,
                available: bytes.len(),
            });
        }

        let mut operands = [0; MAX_OPERANDS];
        operands[..operand_count].copy_from_slice(&bytes[1..needed]);

        Ok(DecodedInstruction {
            address,
            opcode,
            operand_count,
            is_alu: opcode.try_get_flag(ALU_BIT)?,
            sets_pc: opcode.try_get_flag(SETS_PC_BIT)?,
            operands,
        })
    }
}

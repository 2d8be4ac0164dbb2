use crate::registers::STACK_START;

/// What the engine does when it fetches an opcode with no registered handler.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum UnknownOpcodePolicy {
    /// Stop with `IllegalInstruction`.
    #[default]
    Fault,
    /// Step over the opcode and the operand bytes its top two bits announce.
    Skip,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Ls8Config {
    pub start_pc: u8,
    /// Initial value of R7.
    pub stack_pointer: u8,
    pub unknown_opcode: UnknownOpcodePolicy,
}

impl Default for Ls8Config {
    fn default() -> Self {
        Self {
            start_pc: 0,
            stack_pointer: STACK_START,
            unknown_opcode: UnknownOpcodePolicy::Fault,
        }
    }
}

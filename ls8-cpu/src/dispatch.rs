use std::fmt;

use crate::isa::{InstructionDef, INSTRUCTIONS};

/// Opcode-indexed table of instruction definitions.
#[derive(Clone)]
pub struct BranchTable {
    entries: [Option<&'static InstructionDef>; 256],
}

impl Default for BranchTable {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for BranchTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BranchTable")
            .field("registered", &self.len())
            .finish()
    }
}

impl BranchTable {
    pub fn new() -> Self {
        Self::with_instructions(INSTRUCTIONS)
    }

    pub fn with_instructions(defs: &'static [InstructionDef]) -> Self {
        let mut entries = [None; 256];
        for def in defs {
            let slot = &mut entries[def.opcode() as usize];
            if let Some(existing) = slot.replace(def) {
                tracing::warn!(
                    "opcode 0x{:02X}: {} replaces {}",
                    def.opcode(),
                    def.mnemonic(),
                    existing.mnemonic()
                );
            }
        }
        tracing::debug!("branch table holds {} instructions", defs.len());
        Self { entries }
    }

    pub fn lookup(&self, opcode: u8) -> Option<&'static InstructionDef> {
        self.entries[opcode as usize]
    }

    pub fn len(&self) -> usize {
        self.entries.iter().filter(|entry| entry.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

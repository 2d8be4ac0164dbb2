use std::cmp::Ordering;
use std::fmt;
use std::ops::{Index, IndexMut};

pub const NUM_REGISTERS: usize = 8;

/// R7 doubles as the stack pointer.
pub const STACK_POINTER: RegisterId = RegisterId(7);

/// Initial stack pointer; the stack grows down from here.
pub const STACK_START: u8 = 0xF4;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RegisterId(u8);

impl RegisterId {
    pub const fn index(&self) -> usize {
        self.0 as usize
    }
}

impl TryFrom<u8> for RegisterId {
    type Error = u8;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        if (index as usize) < NUM_REGISTERS {
            Ok(Self(index))
        } else {
            Err(index)
        }
    }
}

impl fmt::Display for RegisterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "R{}", self.0)
    }
}

#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Ls8Registers {
    regs: [u8; NUM_REGISTERS],
}

impl Ls8Registers {
    pub fn new(stack_pointer: u8) -> Self {
        let mut regs = [0; NUM_REGISTERS];
        regs[STACK_POINTER.index()] = stack_pointer;
        Ls8Registers { regs }
    }

    pub fn sp(&self) -> u8 {
        self[STACK_POINTER]
    }

    pub fn set_sp(&mut self, value: u8) {
        self[STACK_POINTER] = value;
    }

    pub fn values(&self) -> [u8; NUM_REGISTERS] {
        self.regs
    }
}

impl Index<RegisterId> for Ls8Registers {
    type Output = u8;

    fn index(&self, reg: RegisterId) -> &Self::Output {
        &self.regs[reg.index()]
    }
}

impl IndexMut<RegisterId> for Ls8Registers {
    fn index_mut(&mut self, reg: RegisterId) -> &mut Self::Output {
        &mut self.regs[reg.index()]
    }
}

impl fmt::Debug for Ls8Registers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut list = f.debug_list();
        for value in &self.regs {
            list.entry(&format_args!("0x{:02X}", value));
        }
        list.finish()
    }
}

/// Result of the most recent `CMP`. At most one flag is ever set.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Ls8Flags {
    equal: bool,
    greater: bool,
    less: bool,
}

impl Ls8Flags {
    pub const EQUAL: u8 = 0b0000_0001;
    pub const GREATER: u8 = 0b0000_0010;
    pub const LESS: u8 = 0b0000_0100;

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn set_from(&mut self, ordering: Ordering) {
        self.clear();
        match ordering {
            Ordering::Equal => self.equal = true,
            Ordering::Greater => self.greater = true,
            Ordering::Less => self.less = true,
        }
    }

    pub fn equal(&self) -> bool {
        self.equal
    }

    pub fn greater(&self) -> bool {
        self.greater
    }

    pub fn less(&self) -> bool {
        self.less
    }

    /// Packed `00000LGE` form.
    pub fn bits(&self) -> u8 {
        let mut bits = 0;
        if self.equal {
            bits |= Self::EQUAL;
        }
        if self.greater {
            bits |= Self::GREATER;
        }
        if self.less {
            bits |= Self::LESS;
        }
        bits
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_ids() {
        for index in 0..8u8 {
            let reg = RegisterId::try_from(index).unwrap();
            assert_eq!(reg.index(), index as usize);
            assert_eq!(reg.to_string(), format!("R{}", index));
        }
        assert_eq!(RegisterId::try_from(8), Err(8));
        assert_eq!(RegisterId::try_from(0xFF), Err(0xFF));
    }

    #[test]
    fn stack_pointer_is_r7() {
        let mut regs = Ls8Registers::new(STACK_START);
        assert_eq!(regs.sp(), 0xF4);
        assert_eq!(regs.values(), [0, 0, 0, 0, 0, 0, 0, 0xF4]);

        regs.set_sp(0x20);
        assert_eq!(regs[RegisterId::try_from(7).unwrap()], 0x20);
    }

    #[test]
    fn compare_clears_stale_flags() {
        let mut flags = Ls8Flags::default();
        assert_eq!(flags.bits(), 0);

        flags.set_from(Ordering::Greater);
        assert!(flags.greater());
        assert_eq!(flags.bits(), Ls8Flags::GREATER);

        flags.set_from(Ordering::Equal);
        assert!(flags.equal());
        assert!(!flags.greater());
        assert_eq!(flags.bits(), Ls8Flags::EQUAL);

        flags.set_from(Ordering::Less);
        assert_eq!(flags.bits(), Ls8Flags::LESS);

        flags.clear();
        assert_eq!(flags, Ls8Flags::default());
    }

    #[test]
    fn debug_shows_hex() {
        let regs = Ls8Registers::new(0xF4);
        assert_eq!(
            format!("{:?}", regs),
            "[0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xF4]"
        );
    }
}

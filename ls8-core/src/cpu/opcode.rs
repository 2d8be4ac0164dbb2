use std::fmt;
use std::ops::RangeInclusive;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OpcodeError {
    #[error("{0} index {1} out of bounds, must be [0, {2})")]
    IndexOutOfBounds(&'static str, usize, usize),
    #[error("bit range {0}..={1} does not fit in an 8-bit opcode")]
    InvalidRange(usize, usize),
    #[error("opcode requires at least one byte")]
    NoBytes,
}

pub type Result<T> = std::result::Result<T, OpcodeError>;

/// A single-byte opcode with helpers for pulling out bit fields.
///
/// Bit 0 is the least significant bit, so for an `AABCDDDD` layout the `AA`
/// field is `6..=7` and `DDDD` is `0..=3`.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Opcode8 {
    value: u8,
}

impl Opcode8 {
    pub const WIDTH_BITS: usize = 8;

    pub const fn new(value: u8) -> Self {
        Self { value }
    }

    pub fn from_be_bytes(bytes: &[u8]) -> Result<Self> {
        let value = *bytes.first().ok_or(OpcodeError::NoBytes)?;
        Ok(Self { value })
    }

    pub const fn value(&self) -> u8 {
        self.value
    }

    pub fn try_get_bit(&self, idx: usize) -> Result<u8> {
        if idx >= Self::WIDTH_BITS {
            return Err(OpcodeError::IndexOutOfBounds("bit", idx, Self::WIDTH_BITS));
        }
        Ok((self.value >> idx) & 0x01)
    }

    pub fn try_get_flag(&self, idx: usize) -> Result<bool> {
        Ok(self.try_get_bit(idx)? == 1)
    }

    /// Extracts the bits in `bits` (inclusive, LSB = 0) shifted down to bit 0.
    pub fn try_get_field(&self, bits: RangeInclusive<usize>) -> Result<u8> {
        let (lo, hi) = (*bits.start(), *bits.end());
        if lo > hi || hi >= Self::WIDTH_BITS {
            return Err(OpcodeError::InvalidRange(lo, hi));
        }
        let width = hi - lo + 1;
        let mask = ((1u16 << width) - 1) as u8;
        Ok((self.value >> lo) & mask)
    }
}

impl From<u8> for Opcode8 {
    fn from(value: u8) -> Self {
        Self::new(value)
    }
}

impl fmt::Debug for Opcode8 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_fmt(format_args!("0x{:02X}", self.value))
    }
}

impl fmt::Display for Opcode8 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_fmt(format_args!("0b{:08b}", self.value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALUE: u8 = 0b1010_0111;

    #[test]
    fn test_opcode_bits() {
        let op = Opcode8::new(VALUE);
        for idx in 0..=Opcode8::WIDTH_BITS {
            let res = op.try_get_bit(idx);
            if idx < Opcode8::WIDTH_BITS {
                assert_eq!(res, Ok((VALUE >> idx) & 1));
            } else {
                assert_eq!(res, Err(OpcodeError::IndexOutOfBounds("bit", idx, 8)));
            }
        }
    }

    #[test]
    fn test_opcode_fields() {
        let op = Opcode8::new(VALUE);
        assert_eq!(op.try_get_field(6..=7), Ok(0b10));
        assert_eq!(op.try_get_field(5..=5), Ok(1));
        assert_eq!(op.try_get_field(4..=4), Ok(0));
        assert_eq!(op.try_get_field(0..=3), Ok(0b0111));
        assert_eq!(op.try_get_field(0..=7), Ok(VALUE));
        assert_eq!(op.try_get_field(4..=8), Err(OpcodeError::InvalidRange(4, 8)));
        #[allow(clippy::reversed_empty_ranges)]
        let reversed = op.try_get_field(3..=1);
        assert_eq!(reversed, Err(OpcodeError::InvalidRange(3, 1)));
    }

    #[test]
    fn test_from_be_bytes() {
        assert_eq!(Opcode8::from_be_bytes(&[0x82, 0x00]), Ok(Opcode8::new(0x82)));
        assert_eq!(Opcode8::from_be_bytes(&[]), Err(OpcodeError::NoBytes));
    }

    #[test]
    fn test_formatting() {
        let op = Opcode8::new(0x82);
        assert_eq!(format!("{:?}", op), "0x82");
        assert_eq!(format!("{}", op), "0b10000010");
    }
}

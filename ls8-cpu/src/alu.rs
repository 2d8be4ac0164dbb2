use std::cmp::Ordering;

use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AluOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Cmp,
    And,
    Or,
    Xor,
    Not,
    Shl,
    Shr,
    Inc,
    Dec,
}

#[derive(Clone, Copy, Debug, Error, PartialEq, Eq, Hash)]
pub enum AluError {
    #[error("division by zero")]
    DivisionByZero,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AluOutput {
    /// Written back to the first operand register.
    Value(u8),
    /// Written to the flags only.
    Compare(Ordering),
}

impl AluOp {
    /// Unary operations ignore their second operand.
    pub fn is_unary(&self) -> bool {
        matches!(self, AluOp::Not | AluOp::Inc | AluOp::Dec)
    }

    /// Applies the operation to two register values. Results wrap at 8 bits.
    pub fn apply(self, a: u8, b: u8) -> Result<AluOutput, AluError> {
        let value = match self {
            AluOp::Add => a.wrapping_add(b),
            AluOp::Sub => a.wrapping_sub(b),
            AluOp::Mul => a.wrapping_mul(b),
            AluOp::Div => a.checked_div(b).ok_or(AluError::DivisionByZero)?,
            AluOp::Mod => a.checked_rem(b).ok_or(AluError::DivisionByZero)?,
            AluOp::Cmp => return Ok(AluOutput::Compare(a.cmp(&b))),
            AluOp::And => a & b,
            AluOp::Or => a | b,
            AluOp::Xor => a ^ b,
            AluOp::Not => !a,
            // Shifting by the full width or more empties the register.
            AluOp::Shl => a.checked_shl(u32::from(b)).unwrap_or(0),
            AluOp::Shr => a.checked_shr(u32::from(b)).unwrap_or(0),
            AluOp::Inc => a.wrapping_add(1),
            AluOp::Dec => a.wrapping_sub(1),
        };
        Ok(AluOutput::Value(value))
    }
}

#[cfg(test)]
mod tests {
    use rand::Rng;

    use super::*;

    fn value(op: AluOp, a: u8, b: u8) -> u8 {
        match op.apply(a, b) {
            Ok(AluOutput::Value(v)) => v,
            other => panic!("unexpected ALU result for {:?}: {:?}", op, other),
        }
    }

    #[test]
    fn arithmetic_wraps() {
        assert_eq!(value(AluOp::Add, 5, 3), 8);
        assert_eq!(value(AluOp::Add, 250, 10), 4);
        assert_eq!(value(AluOp::Sub, 3, 5), 254);
        assert_eq!(value(AluOp::Mul, 8, 9), 72);
        assert_eq!(value(AluOp::Mul, 16, 16), 0);
        assert_eq!(value(AluOp::Div, 17, 5), 3);
        assert_eq!(value(AluOp::Mod, 17, 5), 2);
        assert_eq!(value(AluOp::Inc, 0xFF, 0), 0);
        assert_eq!(value(AluOp::Dec, 0, 0), 0xFF);
    }

    #[test]
    fn division_by_zero_fails() {
        assert_eq!(AluOp::Div.apply(1, 0), Err(AluError::DivisionByZero));
        assert_eq!(AluOp::Mod.apply(1, 0), Err(AluError::DivisionByZero));
        assert_eq!(AluOp::Div.apply(0, 0), Err(AluError::DivisionByZero));
    }

    #[test]
    fn bitwise() {
        assert_eq!(value(AluOp::And, 0b1100, 0b1010), 0b1000);
        assert_eq!(value(AluOp::Or, 0b1100, 0b1010), 0b1110);
        assert_eq!(value(AluOp::Xor, 0b1100, 0b1010), 0b0110);
        assert_eq!(value(AluOp::Not, 0b1010_1010, 0xFF), 0b0101_0101);
    }

    #[test]
    fn shifts_fill_with_zero() {
        assert_eq!(value(AluOp::Shl, 0b1000_0001, 1), 0b0000_0010);
        assert_eq!(value(AluOp::Shr, 0b1000_0001, 1), 0b0100_0000);
        assert_eq!(value(AluOp::Shl, 0xFF, 7), 0x80);
        assert_eq!(value(AluOp::Shl, 0xFF, 8), 0);
        assert_eq!(value(AluOp::Shr, 0xFF, 200), 0);
    }

    #[test]
    fn compare_orders() {
        assert_eq!(AluOp::Cmp.apply(4, 4), Ok(AluOutput::Compare(Ordering::Equal)));
        assert_eq!(AluOp::Cmp.apply(5, 4), Ok(AluOutput::Compare(Ordering::Greater)));
        assert_eq!(AluOp::Cmp.apply(3, 4), Ok(AluOutput::Compare(Ordering::Less)));
    }

    #[test]
    fn unary_ops() {
        assert!(AluOp::Not.is_unary());
        assert!(AluOp::Inc.is_unary());
        assert!(AluOp::Dec.is_unary());
        assert!(!AluOp::Add.is_unary());
        assert!(!AluOp::Cmp.is_unary());
    }

    #[test]
    fn random_operands_match_wide_arithmetic() {
        let mut rng = rand::thread_rng();
        for _ in 0..1000 {
            let a: u8 = rng.gen();
            let b: u8 = rng.gen();
            let (wa, wb) = (u32::from(a), u32::from(b));
            assert_eq!(u32::from(value(AluOp::Add, a, b)), (wa + wb) % 256);
            assert_eq!(u32::from(value(AluOp::Mul, a, b)), (wa * wb) % 256);
            assert_eq!(u32::from(value(AluOp::Sub, a, b)), (wa + 256 - wb) % 256);
            if b != 0 {
                assert_eq!(u32::from(value(AluOp::Div, a, b)), wa / wb);
                assert_eq!(u32::from(value(AluOp::Mod, a, b)), wa % wb);
            }
        }
    }
}

//! Text program images: one byte per line, written as a binary digit string.
//!
//! ```text
//! 10000010 # LDI R0,8
//! 00000000
//! 00001000
//! ```

use thiserror::Error;

use crate::cpu::MEMORY_SIZE;

const MAX_DIGITS: usize = 8;

#[derive(Clone, Debug, Error, PartialEq, Eq, Hash)]
pub enum ProgramError {
    #[error("line {line}: '{text}' is not a binary byte")]
    InvalidByte { line: usize, text: String },
    #[error("program is {length} bytes, memory holds {}", MEMORY_SIZE)]
    TooLarge { length: usize },
}

pub type Result<T> = std::result::Result<T, ProgramError>;

/// Parses a text image into the bytes to load at address 0.
pub fn parse_program(source: &str) -> Result<Vec<u8>> {
    let mut image = Vec::new();
    for (idx, raw) in source.lines().enumerate() {
        let text = match raw.split_once('#') {
            Some((code, _comment)) => code,
            None => raw,
        }
        .trim();
        if text.is_empty() {
            continue;
        }

        image.push(parse_byte(text).ok_or_else(|| ProgramError::InvalidByte {
            line: idx + 1,
            text: text.to_string(),
        })?);
    }
    check_binary(&image)?;
    tracing::debug!("parsed {} program bytes", image.len());
    Ok(image)
}

/// Checks a raw binary image against memory size.
pub fn check_binary(image: &[u8]) -> Result<()> {
    if image.len() > MEMORY_SIZE {
        return Err(ProgramError::TooLarge {
            length: image.len(),
        });
    }
    Ok(())
}

fn parse_byte(text: &str) -> Option<u8> {
    if text.len() > MAX_DIGITS || !text.bytes().all(|b| b == b'0' || b == b'1') {
        return None;
    }
    u8::from_str_radix(text, 2).ok()
}

//! Bit sequences, written and read most significant bit first.

use crate::error::SettingsError;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct BitString {
    bits: Vec<bool>,
}

impl BitString {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            bits: Vec::with_capacity(capacity),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    #[inline]
    pub fn push(&mut self, bit: bool) {
        self.bits.push(bit);
    }

    /// Append the low `width` bits of `value`, most significant first.
    pub fn push_uint(&mut self, value: u64, width: u32) {
        for shift in (0..width).rev() {
            let bit = value.checked_shr(shift).unwrap_or(0) & 1 == 1;
            self.bits.push(bit);
        }
    }

    pub fn as_slice(&self) -> &[bool] {
        &self.bits
    }

    pub fn reader(&self) -> BitReader<'_> {
        BitReader {
            bits: &self.bits,
            position: 0,
        }
    }
}

impl FromIterator<bool> for BitString {
    fn from_iter<I: IntoIterator<Item = bool>>(iter: I) -> Self {
        Self {
            bits: iter.into_iter().collect(),
        }
    }
}

/// Renders as a string of `0` and `1`.
impl fmt::Display for BitString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for bit in &self.bits {
            f.write_str(if *bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

impl FromStr for BitString {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.chars()
            .map(|character| match character {
                '0' => Ok(false),
                '1' => Ok(true),
                _ => Err(SettingsError::InvalidCharacter { character }),
            })
            .collect()
    }
}

/// Sequential reader over a [`BitString`].
pub struct BitReader<'a> {
    bits: &'a [bool],
    position: usize,
}

impl BitReader<'_> {
    /// Read `width` bits as an unsigned integer, or `None` if fewer remain.
    pub fn read_uint(&mut self, width: u32) -> Option<u64> {
        let end = self.position.checked_add(width as usize)?;
        let chunk = self.bits.get(self.position..end)?;
        self.position = end;
        Some(
            chunk
                .iter()
                .fold(0u64, |acc, bit| (acc << 1) | u64::from(*bit)),
        )
    }

    #[inline]
    pub fn position(&self) -> usize {
        self.position
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.bits.len() - self.position
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_msb_first() {
        let mut bits = BitString::new();
        bits.push_uint(1, 2);
        bits.push_uint(5, 3);
        bits.push_uint(0, 0);
        assert_eq!(bits.to_string(), "01101");

        let mut reader = bits.reader();
        assert_eq!(reader.read_uint(2), Some(1));
        assert_eq!(reader.read_uint(0), Some(0));
        assert_eq!(reader.read_uint(3), Some(5));
        assert_eq!(reader.remaining(), 0);
        assert_eq!(reader.read_uint(1), None);
    }

    #[test]
    fn test_short_read_does_not_advance() {
        let bits: BitString = "101".parse().unwrap();
        let mut reader = bits.reader();
        assert_eq!(reader.read_uint(4), None);
        assert_eq!(reader.position(), 0);
        assert_eq!(reader.read_uint(3), Some(0b101));
    }

    #[test]
    fn test_parse_rejects_other_characters() {
        assert_eq!(
            "0120".parse::<BitString>(),
            Err(SettingsError::InvalidCharacter { character: '2' })
        );
    }
}

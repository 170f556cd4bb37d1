//! Settings-string packing: 5 bits per character.
//!
//! The alphabet skips `I`, `O`, `0` and `1`.

use crate::bits::BitString;
use crate::error::SettingsError;

const ALPHABET: &[u8; 32] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";
const BITS_PER_CHAR: usize = 5;

/// Pack bits into a settings string, zero padding the last character.
pub fn to_settings_string(bits: &BitString) -> String {
    bits.as_slice()
        .chunks(BITS_PER_CHAR)
        .map(|chunk| {
            let index = (0..BITS_PER_CHAR).fold(0usize, |acc, position| {
                (acc << 1) | usize::from(chunk.get(position).copied().unwrap_or(false))
            });
            char::from(ALPHABET[index])
        })
        .collect()
}

/// Unpack a settings string. Lowercase letters are accepted.
pub fn from_settings_string(text: &str) -> Result<BitString, SettingsError> {
    let mut bits = BitString::with_capacity(text.len() * BITS_PER_CHAR);
    for character in text.trim().chars() {
        let upper = character.to_ascii_uppercase();
        let index = ALPHABET
            .iter()
            .position(|symbol| char::from(*symbol) == upper)
            .ok_or(SettingsError::InvalidCharacter { character })?;
        bits.push_uint(index as u64, BITS_PER_CHAR as u32);
    }
    Ok(bits)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pack_and_pad() {
        let bits: BitString = "00000111110100".parse().unwrap();
        // 00000 -> A, 11111 -> 9, 0100(0) -> J
        assert_eq!(to_settings_string(&bits), "A9J");
        assert_eq!(to_settings_string(&BitString::new()), "");
    }

    #[test]
    fn test_unpack_keeps_padding() {
        let bits = from_settings_string("a9j").unwrap();
        assert_eq!(bits.to_string(), "000001111101000");
    }

    #[test]
    fn test_rejects_ambiguous_characters() {
        for text in ["AOB", "I", "A1"] {
            assert!(matches!(
                from_settings_string(text),
                Err(SettingsError::InvalidCharacter { .. })
            ));
        }
    }
}

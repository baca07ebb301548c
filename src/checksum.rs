//! BIP39 checksum validation
//!
//! A phrase of N words encodes N * 11 bits: ENT entropy bits followed by
//! CS = ENT / 32 checksum bits, where the checksum is the leading CS bits
//! of SHA-256 over the entropy bytes. Validation recomputes that digest
//! and compares it against the trailing bits of the phrase.

use crate::wordlist::Wordlist;
use crate::{BITS_PER_WORD, WORDLIST_SIZE};
use sha2::{Digest, Sha256};
use std::sync::Arc;

/// Checksum bits carried by a phrase of the given word count
///
/// `None` for word counts that are not valid BIP39 phrase lengths.
pub fn checksum_bits(word_count: usize) -> Option<usize> {
    match word_count {
        12 => Some(4),
        15 => Some(5),
        18 => Some(6),
        21 => Some(7),
        24 => Some(8),
        _ => None,
    }
}

fn sha256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Validates phrase checksums against a wordlist
///
/// All methods are pure and never fail: any phrase that cannot be a valid
/// mnemonic (wrong length, unknown word, index out of range) is simply
/// invalid.
#[derive(Debug, Clone)]
pub struct PhraseValidator {
    wordlist: Arc<Wordlist>,
}

impl PhraseValidator {
    /// Create a validator over the given wordlist
    pub fn new(wordlist: Arc<Wordlist>) -> Self {
        Self { wordlist }
    }

    /// The wordlist this validator resolves words against
    pub fn wordlist(&self) -> &Wordlist {
        &self.wordlist
    }

    /// Validate a complete whitespace-separated phrase
    pub fn validate_phrase(&self, phrase: &str) -> bool {
        let words: Vec<&str> = phrase.split_whitespace().collect();
        self.validate_words(&words)
    }

    /// Validate a phrase given as individual words
    pub fn validate_words(&self, words: &[&str]) -> bool {
        let mut indices = Vec::with_capacity(words.len());
        for word in words {
            match self.wordlist.lookup(word) {
                Some(index) => indices.push(index),
                None => return false,
            }
        }
        self.validate_indices(&indices)
    }

    /// Validate a phrase given as wordlist indices
    pub fn validate_indices(&self, indices: &[u16]) -> bool {
        let cs_bits = match checksum_bits(indices.len()) {
            Some(bits) => bits,
            None => return false,
        };
        if indices.iter().any(|&index| index as usize >= WORDLIST_SIZE) {
            return false;
        }

        // Pack the 11-bit indices MSB-first into a contiguous bit buffer
        let total_bits = indices.len() * BITS_PER_WORD;
        let mut packed = vec![0u8; (total_bits + 7) / 8];
        let mut bit = 0;
        for &index in indices {
            for shift in (0..BITS_PER_WORD).rev() {
                if (index >> shift) & 1 == 1 {
                    packed[bit / 8] |= 0x80u8 >> (bit % 8);
                }
                bit += 1;
            }
        }

        // ENT = 32 * CS bits, so the entropy spans the first 4 * CS bytes
        let entropy_len = cs_bits * 4;
        let digest = sha256(&packed[..entropy_len]);
        let shift = 8 - cs_bits;
        packed[entropy_len] >> shift == digest[0] >> shift
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wordlist::MnemonicLanguage;

    fn validator() -> PhraseValidator {
        PhraseValidator::new(Arc::new(Wordlist::builtin(MnemonicLanguage::English)))
    }

    #[test]
    fn test_sha256_digest() {
        assert_eq!(
            hex::encode(sha256(b"abc")),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert_eq!(
            hex::encode(sha256(b"")),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_checksum_bits_table() {
        assert_eq!(checksum_bits(12), Some(4));
        assert_eq!(checksum_bits(15), Some(5));
        assert_eq!(checksum_bits(18), Some(6));
        assert_eq!(checksum_bits(21), Some(7));
        assert_eq!(checksum_bits(24), Some(8));
        assert_eq!(checksum_bits(0), None);
        assert_eq!(checksum_bits(11), None);
        assert_eq!(checksum_bits(13), None);
        assert_eq!(checksum_bits(16), None);
    }

    #[test]
    fn test_known_valid_phrases() {
        let validator = validator();
        let valid = [
            "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about",
            "legal winner thank year wave sausage worth useful legal winner thank yellow",
            "letter advice cage absurd amount doctor acoustic avoid letter advice cage above",
            "zoo zoo zoo zoo zoo zoo zoo zoo zoo zoo zoo wrong",
        ];
        for phrase in valid {
            assert!(validator.validate_phrase(phrase), "should validate: {}", phrase);
        }
    }

    #[test]
    fn test_checksum_mismatch_rejected() {
        let validator = validator();
        // For these entropies the only valid final word is "about" and
        // "wrong" respectively, so the repeated word cannot check out
        let invalid = [
            "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon",
            "zoo zoo zoo zoo zoo zoo zoo zoo zoo zoo zoo zoo",
        ];
        for phrase in invalid {
            assert!(!validator.validate_phrase(phrase), "should reject: {}", phrase);
        }
    }

    #[test]
    fn test_unknown_word_rejected() {
        let validator = validator();
        assert!(!validator.validate_phrase(
            "notaword abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about"
        ));
        assert!(!validator.validate_words(&[]));
    }

    #[test]
    fn test_invalid_lengths_rejected() {
        let validator = validator();

        let eleven = vec!["abandon"; 11].join(" ");
        let thirteen = vec!["abandon"; 13].join(" ");
        assert!(!validator.validate_phrase(&eleven));
        assert!(!validator.validate_phrase(&thirteen));
        assert!(!validator.validate_phrase(""));

        assert!(!validator.validate_indices(&[0u16; 13]));
        assert!(!validator.validate_indices(&[0u16; 16]));
    }

    #[test]
    fn test_index_out_of_range_rejected() {
        let validator = validator();
        let mut indices = [0u16; 12];
        indices[5] = 2048;
        assert!(!validator.validate_indices(&indices));
    }

    #[test]
    fn test_last_word_encodes_checksum() {
        let validator = validator();

        // All-zero entropy hashes to a digest starting 0x37, so the last
        // index is (0 << 4) | 0x3 = 3, the word "about"
        let mut indices = [0u16; 12];
        indices[11] = 3;
        assert!(validator.validate_indices(&indices));

        for wrong in [0, 1, 2, 4, 5] {
            indices[11] = wrong;
            assert!(!validator.validate_indices(&indices));
        }
    }

    #[test]
    fn test_checksum_bit_flip_rejected() {
        let validator = validator();
        let mut indices = [0u16; 12];
        indices[11] = 3;
        assert!(validator.validate_indices(&indices));

        // The low 4 bits of the final index are the checksum
        for flip in [1, 2, 4, 8] {
            let mut flipped = indices;
            flipped[11] ^= flip;
            assert!(
                !validator.validate_indices(&flipped),
                "flipping checksum bit {:#x} should invalidate",
                flip
            );
        }
    }
}

//! Wordlist loading and word/index mapping

use crate::error::{ConfigError, Result, WordlistError};
use crate::WORDLIST_SIZE;
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Languages with a builtin BIP39 wordlist
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MnemonicLanguage {
    English,
    ChineseSimplified,
    ChineseTraditional,
    Czech,
    French,
    Italian,
    Japanese,
    Korean,
    Portuguese,
    Spanish,
}

impl MnemonicLanguage {
    /// Canonical lowercase name for this language
    pub fn as_str(&self) -> &'static str {
        match self {
            MnemonicLanguage::English => "english",
            MnemonicLanguage::ChineseSimplified => "chinese_simplified",
            MnemonicLanguage::ChineseTraditional => "chinese_traditional",
            MnemonicLanguage::Czech => "czech",
            MnemonicLanguage::French => "french",
            MnemonicLanguage::Italian => "italian",
            MnemonicLanguage::Japanese => "japanese",
            MnemonicLanguage::Korean => "korean",
            MnemonicLanguage::Portuguese => "portuguese",
            MnemonicLanguage::Spanish => "spanish",
        }
    }

    /// Map to the corresponding `bip39` crate language
    pub fn to_bip39(self) -> bip39::Language {
        match self {
            MnemonicLanguage::English => bip39::Language::English,
            MnemonicLanguage::ChineseSimplified => bip39::Language::SimplifiedChinese,
            MnemonicLanguage::ChineseTraditional => bip39::Language::TraditionalChinese,
            MnemonicLanguage::Czech => bip39::Language::Czech,
            MnemonicLanguage::French => bip39::Language::French,
            MnemonicLanguage::Italian => bip39::Language::Italian,
            MnemonicLanguage::Japanese => bip39::Language::Japanese,
            MnemonicLanguage::Korean => bip39::Language::Korean,
            MnemonicLanguage::Portuguese => bip39::Language::Portuguese,
            MnemonicLanguage::Spanish => bip39::Language::Spanish,
        }
    }
}

impl fmt::Display for MnemonicLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MnemonicLanguage {
    type Err = ConfigError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        match normalized.as_str() {
            "english" => Ok(MnemonicLanguage::English),
            "chinese_simplified" => Ok(MnemonicLanguage::ChineseSimplified),
            "chinese_traditional" => Ok(MnemonicLanguage::ChineseTraditional),
            "czech" => Ok(MnemonicLanguage::Czech),
            "french" => Ok(MnemonicLanguage::French),
            "italian" => Ok(MnemonicLanguage::Italian),
            "japanese" => Ok(MnemonicLanguage::Japanese),
            "korean" => Ok(MnemonicLanguage::Korean),
            "portuguese" => Ok(MnemonicLanguage::Portuguese),
            "spanish" => Ok(MnemonicLanguage::Spanish),
            _ => Err(ConfigError::UnsupportedLanguage(s.to_string())),
        }
    }
}

/// Immutable word/index mapping over exactly 2048 words
///
/// Both lookup directions are O(1). The struct is never mutated after
/// construction, so a shared reference can be read from any number of
/// threads.
#[derive(Debug, Clone)]
pub struct Wordlist {
    words: Vec<String>,
    positions: HashMap<String, u16>,
}

impl Wordlist {
    /// Build a wordlist from an ordered word sequence
    pub fn from_words(words: Vec<String>) -> Result<Self> {
        if words.len() != WORDLIST_SIZE {
            return Err(WordlistError::WrongSize {
                expected: WORDLIST_SIZE,
                actual: words.len(),
            }
            .into());
        }

        let mut positions = HashMap::with_capacity(WORDLIST_SIZE);
        for (index, word) in words.iter().enumerate() {
            if positions.insert(word.clone(), index as u16).is_some() {
                return Err(WordlistError::DuplicateWord(word.clone()).into());
            }
        }

        Ok(Self { words, positions })
    }

    /// Wordlist for one of the builtin languages
    pub fn builtin(language: MnemonicLanguage) -> Self {
        let list = language.to_bip39().word_list();
        let words: Vec<String> = list.iter().map(|word| word.to_string()).collect();
        let positions = words
            .iter()
            .enumerate()
            .map(|(index, word)| (word.clone(), index as u16))
            .collect();
        Self { words, positions }
    }

    /// Load a wordlist from a file with one word per line
    ///
    /// Surrounding whitespace is trimmed and blank lines are skipped. The
    /// remaining lines must be exactly 2048 unique words.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let words: Vec<String> = content
            .lines()
            .map(|line| line.trim())
            .filter(|line| !line.is_empty())
            .map(|line| line.to_string())
            .collect();
        Self::from_words(words)
    }

    /// Index of a word, or an error when the word is not in the list
    pub fn index_of(&self, word: &str) -> Result<u16> {
        self.lookup(word)
            .ok_or_else(|| WordlistError::UnknownWord(word.to_string()).into())
    }

    /// Index of a word, `None` when the word is not in the list
    pub fn lookup(&self, word: &str) -> Option<u16> {
        self.positions.get(word).copied()
    }

    /// Word at an index, or an error when the index is out of range
    pub fn word_at(&self, index: u16) -> Result<&str> {
        self.words
            .get(index as usize)
            .map(|word| word.as_str())
            .ok_or_else(|| WordlistError::IndexOutOfRange(index).into())
    }

    /// All words in index order
    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// Number of words in the list
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Check if the list is empty
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RecoveryError;
    use std::io::Write;

    #[test]
    fn test_builtin_english_layout() {
        let wordlist = Wordlist::builtin(MnemonicLanguage::English);

        assert_eq!(wordlist.len(), WORDLIST_SIZE);
        assert_eq!(wordlist.index_of("abandon").unwrap(), 0);
        assert_eq!(wordlist.index_of("zoo").unwrap(), 2047);
        assert_eq!(wordlist.word_at(3).unwrap(), "about");

        let word = wordlist.word_at(1020).unwrap().to_string();
        assert_eq!(wordlist.lookup(&word), Some(1020));
    }

    #[test]
    fn test_unknown_word() {
        let wordlist = Wordlist::builtin(MnemonicLanguage::English);

        assert_eq!(wordlist.lookup("notaword"), None);
        let err = wordlist.index_of("notaword").unwrap_err();
        assert!(matches!(
            err,
            RecoveryError::Wordlist(WordlistError::UnknownWord(_))
        ));
    }

    #[test]
    fn test_index_out_of_range() {
        let wordlist = Wordlist::builtin(MnemonicLanguage::English);

        let err = wordlist.word_at(2048).unwrap_err();
        assert!(matches!(
            err,
            RecoveryError::Wordlist(WordlistError::IndexOutOfRange(2048))
        ));
    }

    #[test]
    fn test_wrong_size_rejected() {
        let words = vec!["abandon".to_string(), "ability".to_string()];
        let err = Wordlist::from_words(words).unwrap_err();
        assert!(matches!(
            err,
            RecoveryError::Wordlist(WordlistError::WrongSize {
                expected: 2048,
                actual: 2
            })
        ));

        let mut words: Vec<String> = Wordlist::builtin(MnemonicLanguage::English)
            .words()
            .to_vec();
        words.push("zzzz".to_string());

        let err = Wordlist::from_words(words).unwrap_err();
        assert!(matches!(
            err,
            RecoveryError::Wordlist(WordlistError::WrongSize {
                expected: 2048,
                actual: 2049
            })
        ));
    }

    #[test]
    fn test_duplicate_word_rejected() {
        let mut words: Vec<String> = Wordlist::builtin(MnemonicLanguage::English)
            .words()
            .to_vec();
        words[2047] = "abandon".to_string();

        let err = Wordlist::from_words(words).unwrap_err();
        assert!(matches!(
            err,
            RecoveryError::Wordlist(WordlistError::DuplicateWord(word)) if word == "abandon"
        ));
    }

    #[test]
    fn test_from_file() {
        let english = Wordlist::builtin(MnemonicLanguage::English);
        let mut file = tempfile::NamedTempFile::new().unwrap();
        for word in english.words() {
            writeln!(file, "{}", word).unwrap();
        }
        writeln!(file).unwrap();
        file.flush().unwrap();

        let loaded = Wordlist::from_file(file.path()).unwrap();
        assert_eq!(loaded.len(), WORDLIST_SIZE);
        assert_eq!(loaded.index_of("zoo").unwrap(), 2047);
        assert_eq!(loaded.word_at(0).unwrap(), "abandon");
    }

    #[test]
    fn test_from_file_wrong_size() {
        let english = Wordlist::builtin(MnemonicLanguage::English);
        let mut file = tempfile::NamedTempFile::new().unwrap();
        for word in english.words().iter().take(2047) {
            writeln!(file, "{}", word).unwrap();
        }
        file.flush().unwrap();

        let err = Wordlist::from_file(file.path()).unwrap_err();
        assert!(matches!(
            err,
            RecoveryError::Wordlist(WordlistError::WrongSize { actual: 2047, .. })
        ));
    }

    #[test]
    fn test_language_parsing() {
        assert_eq!(
            "english".parse::<MnemonicLanguage>().unwrap(),
            MnemonicLanguage::English
        );
        assert_eq!(
            "chinese_simplified".parse::<MnemonicLanguage>().unwrap(),
            MnemonicLanguage::ChineseSimplified
        );
        assert_eq!(
            "Chinese-Traditional".parse::<MnemonicLanguage>().unwrap(),
            MnemonicLanguage::ChineseTraditional
        );
        assert!(matches!(
            "russian".parse::<MnemonicLanguage>(),
            Err(ConfigError::UnsupportedLanguage(_))
        ));
    }

    #[test]
    fn test_language_name_round_trip() {
        let languages = [
            MnemonicLanguage::English,
            MnemonicLanguage::ChineseSimplified,
            MnemonicLanguage::ChineseTraditional,
            MnemonicLanguage::Czech,
            MnemonicLanguage::French,
            MnemonicLanguage::Italian,
            MnemonicLanguage::Japanese,
            MnemonicLanguage::Korean,
            MnemonicLanguage::Portuguese,
            MnemonicLanguage::Spanish,
        ];
        for language in languages {
            assert_eq!(
                language.as_str().parse::<MnemonicLanguage>().unwrap(),
                language
            );
            assert_eq!(Wordlist::builtin(language).len(), WORDLIST_SIZE);
        }
    }
}

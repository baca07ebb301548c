//! Partial phrase parsing and rendering

use crate::error::{ConfigError, Result};
use crate::{PLACEHOLDER, VALID_WORD_COUNTS};

/// One position of a partial phrase
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateToken {
    /// A word fixed by the user
    Word(String),
    /// A position to be recovered
    Unknown,
}

/// A partial mnemonic phrase with placeholder tokens for unknown words
#[derive(Debug, Clone)]
pub struct PhraseTemplate {
    tokens: Vec<TemplateToken>,
    unknown_positions: Vec<usize>,
}

impl PhraseTemplate {
    /// Parse a whitespace-separated partial phrase
    ///
    /// Each `?` token marks an unknown word. Fixed words are lowercased.
    /// The total word count must be one of 12, 15, 18, 21 or 24.
    pub fn parse(phrase: &str) -> Result<Self> {
        let raw: Vec<&str> = phrase.split_whitespace().collect();
        if raw.is_empty() {
            return Err(ConfigError::EmptyTemplate.into());
        }
        if !VALID_WORD_COUNTS.contains(&raw.len()) {
            return Err(ConfigError::InvalidPhraseLength(raw.len()).into());
        }

        let mut tokens = Vec::with_capacity(raw.len());
        let mut unknown_positions = Vec::new();
        for (position, token) in raw.iter().enumerate() {
            if *token == PLACEHOLDER {
                unknown_positions.push(position);
                tokens.push(TemplateToken::Unknown);
            } else {
                tokens.push(TemplateToken::Word(token.to_lowercase()));
            }
        }

        Ok(Self {
            tokens,
            unknown_positions,
        })
    }

    /// Total number of words in the phrase
    pub fn word_count(&self) -> usize {
        self.tokens.len()
    }

    /// Number of unknown positions
    pub fn unknown_count(&self) -> usize {
        self.unknown_positions.len()
    }

    /// Positions of the unknown words, in phrase order
    pub fn unknown_positions(&self) -> &[usize] {
        &self.unknown_positions
    }

    /// All tokens in phrase order
    pub fn tokens(&self) -> &[TemplateToken] {
        &self.tokens
    }

    /// Render the phrase with unknown positions filled in order
    ///
    /// Unknowns beyond the end of `fill` render as the placeholder, so an
    /// empty `fill` reproduces the template itself.
    pub fn render(&self, fill: &[&str]) -> String {
        let mut fill_iter = fill.iter();
        let parts: Vec<&str> = self
            .tokens
            .iter()
            .map(|token| match token {
                TemplateToken::Word(word) => word.as_str(),
                TemplateToken::Unknown => fill_iter.next().copied().unwrap_or(PLACEHOLDER),
            })
            .collect();
        parts.join(" ")
    }
}

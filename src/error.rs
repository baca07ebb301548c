//! Error types for the mnemonic recovery tool

use thiserror::Error;

/// Main error type for the application
#[derive(Error, Debug)]
pub enum RecoveryError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Wordlist error: {0}")]
    Wordlist(#[from] WordlistError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid phrase length: {0}. Must be 12, 15, 18, 21 or 24 words")]
    InvalidPhraseLength(usize),

    #[error("Partial phrase is empty")]
    EmptyTemplate,

    #[error("Phrase has {placeholders} placeholder(s) but {declared} missing word(s) were declared")]
    MissingCountMismatch { placeholders: usize, declared: usize },

    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),

    #[error("Invalid thread count: {0}. Must be greater than 0")]
    InvalidThreadCount(usize),
}

/// Wordlist construction and lookup errors
#[derive(Error, Debug)]
pub enum WordlistError {
    #[error("Wordlist has {actual} words, expected {expected}")]
    WrongSize { expected: usize, actual: usize },

    #[error("Duplicate word in wordlist: {0}")]
    DuplicateWord(String),

    #[error("Word not in wordlist: {0}")]
    UnknownWord(String),

    #[error("Word index out of range: {0}")]
    IndexOutOfRange(u16),
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, RecoveryError>;

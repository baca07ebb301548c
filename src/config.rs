//! Configuration types and parsing for the mnemonic recovery tool

use crate::error::{ConfigError, Result};
use crate::template::PhraseTemplate;
use crate::wordlist::{MnemonicLanguage, Wordlist};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Main configuration structure for a recovery run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecoveryConfig {
    /// Partial phrase with "?" placeholders for the unknown words
    pub partial_phrase: String,

    /// Number of unknown words the phrase is expected to contain
    #[serde(default)]
    pub missing_words: usize,

    /// Wordlist language name
    #[serde(default = "default_language")]
    pub language: String,

    /// Optional custom wordlist file, overrides `language` when set
    #[serde(default)]
    pub wordlist_path: Option<PathBuf>,

    /// Maximum number of candidates to evaluate (0 for unbounded)
    #[serde(default)]
    pub max_attempts: u64,

    /// Number of threads for parallel search
    #[serde(default = "default_num_threads")]
    pub num_threads: usize,

    /// Whether to draw a progress bar (default: true)
    #[serde(default = "default_show_progress")]
    pub show_progress: bool,

    /// Whether to split the search across threads
    #[serde(default)]
    pub parallel: bool,
}

/// Default functions for serde
fn default_language() -> String {
    "english".to_string()
}

fn default_num_threads() -> usize {
    num_cpus::get()
}

fn default_show_progress() -> bool {
    true
}

impl RecoveryConfig {
    /// Load configuration from a JSON file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: RecoveryConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        let config: RecoveryConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file
    pub fn to_file(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        // Validate the phrase template
        let template = PhraseTemplate::parse(&self.partial_phrase)?;

        // The declared count must match the placeholders in the phrase
        if template.unknown_count() != self.missing_words {
            return Err(ConfigError::MissingCountMismatch {
                placeholders: template.unknown_count(),
                declared: self.missing_words,
            }
            .into());
        }

        // A custom wordlist file overrides the language selection
        if self.wordlist_path.is_none() {
            self.language.parse::<MnemonicLanguage>()?;
        }

        if self.num_threads == 0 {
            return Err(ConfigError::InvalidThreadCount(self.num_threads).into());
        }

        Ok(())
    }

    /// Parse the partial phrase into a template
    pub fn template(&self) -> Result<PhraseTemplate> {
        PhraseTemplate::parse(&self.partial_phrase)
    }

    /// Load the wordlist selected by this configuration
    pub fn load_wordlist(&self) -> Result<Arc<Wordlist>> {
        let wordlist = match &self.wordlist_path {
            Some(path) => Wordlist::from_file(path)?,
            None => {
                let language: MnemonicLanguage = self.language.parse()?;
                Wordlist::builtin(language)
            }
        };
        Ok(Arc::new(wordlist))
    }

    /// Get the attempt limit, `None` when unbounded
    pub fn max_attempts_limit(&self) -> Option<u64> {
        if self.max_attempts == 0 {
            None
        } else {
            Some(self.max_attempts)
        }
    }
}

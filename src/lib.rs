//! BIP39 Mnemonic Phrase Recovery
//!
//! Recovers the missing words of a partial BIP39 mnemonic phrase by
//! enumerating candidate completions and keeping the ones whose embedded
//! checksum is consistent with the phrase entropy.

pub mod checksum;
pub mod config;
pub mod error;
pub mod generator;
pub mod monitor;
pub mod search;
pub mod template;
pub mod wordlist;

// Re-export main types without utils modules to avoid conflicts
pub use checksum::PhraseValidator;
pub use config::RecoveryConfig;
pub use error::*;
pub use generator::CandidateGenerator;
pub use monitor::{MonitorConfig, SearchMetrics, SearchMonitor};
pub use search::{CandidateSearch, NullObserver, SearchObserver, SearchOutcome};
pub use template::{PhraseTemplate, TemplateToken};
pub use wordlist::{MnemonicLanguage, Wordlist};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::checksum::PhraseValidator;
    pub use crate::config::RecoveryConfig;
    pub use crate::error::*;
    pub use crate::generator::CandidateGenerator;
    pub use crate::monitor::{MonitorConfig, SearchMetrics, SearchMonitor};
    pub use crate::search::{CandidateSearch, NullObserver, SearchObserver, SearchOutcome};
    pub use crate::template::{PhraseTemplate, TemplateToken};
    pub use crate::wordlist::{MnemonicLanguage, Wordlist};
    pub use anyhow::{Context, Result};
}


/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Number of words in a BIP39 wordlist
pub const WORDLIST_SIZE: usize = 2048;

/// Bits encoded by each word (log2 of the wordlist size)
pub const BITS_PER_WORD: usize = 11;

/// Token marking an unknown word in a partial phrase
pub const PLACEHOLDER: &str = "?";

/// Word counts a BIP39 phrase may have
pub const VALID_WORD_COUNTS: [usize; 5] = [12, 15, 18, 21, 24];

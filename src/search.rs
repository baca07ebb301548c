//! Candidate search orchestration
//!
//! Streams digit assignments from the generator through the checksum
//! validator, collecting the completions that check out. Supports serial
//! and rayon-parallel evaluation, an optional attempt cap and cooperative
//! cancellation.

use crate::checksum::PhraseValidator;
use crate::error::{ConfigError, Result};
use crate::generator::{self, CandidateGenerator};
use crate::template::{PhraseTemplate, TemplateToken};
use crate::wordlist::Wordlist;
use crate::WORDLIST_SIZE;
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

/// Per-event sink for search progress and diagnostics
///
/// In parallel mode the callbacks arrive concurrently from multiple
/// workers, so implementations must be thread safe.
pub trait SearchObserver: Send + Sync {
    /// Called once per evaluated candidate
    fn candidate_evaluated(&self, _attempt: u64, _valid: bool) {}

    /// Whether rejected candidates should be reported
    ///
    /// Phrase text for rejected candidates is only rendered when this
    /// returns true, keeping the hot loop free of string work otherwise.
    fn report_rejections(&self) -> bool {
        false
    }

    /// Called for each rejected candidate when `report_rejections` is true
    fn candidate_rejected(&self, _phrase: &str, _attempt: u64) {}

    /// Called for each checksum-valid candidate
    fn match_found(&self, _phrase: &str, _attempt: u64) {}
}

/// Observer that ignores every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NullObserver;

impl SearchObserver for NullObserver {}

/// Result of a candidate search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOutcome {
    /// Checksum-valid completions in generation order
    pub matches: Vec<String>,
    /// Number of candidates evaluated
    pub attempted: u64,
    /// True when the search stopped while candidates remained
    pub truncated: bool,
}

/// Search for checksum-valid completions of a partial phrase
#[derive(Debug)]
pub struct CandidateSearch {
    wordlist: Arc<Wordlist>,
    validator: PhraseValidator,
    template: PhraseTemplate,
    base_indices: Vec<u16>,
    unknown_positions: Vec<usize>,
    unresolved_word: Option<String>,
    max_attempts: Option<u64>,
    cancel: Option<Arc<AtomicBool>>,
}

impl CandidateSearch {
    /// Create a search over a template
    ///
    /// `declared_missing` must equal the template's placeholder count;
    /// the mismatch is reported before any candidate is generated. A fixed
    /// word that is not in the wordlist is not an error: no completion of
    /// such a template can validate, and the search reports that by
    /// finding nothing.
    pub fn new(
        wordlist: Arc<Wordlist>,
        template: PhraseTemplate,
        declared_missing: usize,
    ) -> Result<Self> {
        if template.unknown_count() != declared_missing {
            return Err(ConfigError::MissingCountMismatch {
                placeholders: template.unknown_count(),
                declared: declared_missing,
            }
            .into());
        }

        let mut base_indices = vec![0u16; template.word_count()];
        let mut unresolved_word = None;
        for (position, token) in template.tokens().iter().enumerate() {
            if let TemplateToken::Word(word) = token {
                match wordlist.lookup(word) {
                    Some(index) => base_indices[position] = index,
                    None => {
                        if unresolved_word.is_none() {
                            unresolved_word = Some(word.clone());
                        }
                    }
                }
            }
        }

        let unknown_positions = template.unknown_positions().to_vec();
        let validator = PhraseValidator::new(Arc::clone(&wordlist));

        Ok(Self {
            wordlist,
            validator,
            template,
            base_indices,
            unknown_positions,
            unresolved_word,
            max_attempts: None,
            cancel: None,
        })
    }

    /// Limit the number of candidates evaluated, `None` for unbounded
    pub fn with_max_attempts(mut self, limit: Option<u64>) -> Self {
        self.max_attempts = limit;
        self
    }

    /// Stop the search soon after the flag becomes true
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    /// Number of unknown positions in the template
    pub fn unknown_count(&self) -> usize {
        self.unknown_positions.len()
    }

    /// Size of the candidate space, `None` when it exceeds u128
    pub fn total_combinations(&self) -> Option<u128> {
        generator::total_combinations(self.unknown_positions.len())
    }

    /// Evaluate candidates one at a time on the calling thread
    ///
    /// Candidates are evaluated in generation order, so with an attempt
    /// cap exactly the first `max_attempts` candidates are covered.
    pub fn run(&self, observer: &dyn SearchObserver) -> SearchOutcome {
        self.log_start();
        let verbose = observer.report_rejections();

        let mut generator = CandidateGenerator::new(self.unknown_positions.len());
        let mut scratch = self.base_indices.clone();
        let mut matches = Vec::new();
        let mut attempted = 0u64;
        let mut truncated = false;

        loop {
            if self.max_attempts.map_or(false, |limit| attempted >= limit) {
                truncated = generator.next_candidate().is_some();
                break;
            }
            let digits = match generator.next_candidate() {
                Some(digits) => digits,
                None => break,
            };
            for (&position, &digit) in self.unknown_positions.iter().zip(digits) {
                scratch[position] = digit;
            }

            attempted += 1;
            let valid = self.evaluate(&scratch);
            observer.candidate_evaluated(attempted, valid);
            if valid {
                let phrase = self.render_candidate(digits);
                observer.match_found(&phrase, attempted);
                matches.push(phrase);
            } else if verbose {
                let phrase = self.render_candidate(digits);
                observer.candidate_rejected(&phrase, attempted);
            }

            if self.cancelled() {
                truncated = generator.next_candidate().is_some();
                break;
            }
        }

        self.log_finish(&matches, attempted, truncated);
        SearchOutcome {
            matches,
            attempted,
            truncated,
        }
    }

    /// Evaluate candidates on the rayon thread pool
    ///
    /// The first unknown position is partitioned across workers and each
    /// worker enumerates the remaining positions, so matches come back in
    /// the same order as the serial search. With an attempt cap the number
    /// of candidates evaluated is exact, but which candidates they are
    /// depends on scheduling.
    pub fn run_parallel(&self, observer: &dyn SearchObserver) -> SearchOutcome {
        if self.unknown_positions.is_empty() {
            return self.run(observer);
        }
        self.log_start();
        let verbose = observer.report_rejections();

        let claimed = AtomicU64::new(0);
        let first_position = self.unknown_positions[0];
        let rest_positions = &self.unknown_positions[1..];

        let partitions: Vec<(Vec<String>, u64, bool)> = (0..WORDLIST_SIZE as u16)
            .into_par_iter()
            .map(|first_digit| {
                let mut matches = Vec::new();
                let mut attempted = 0u64;
                let mut truncated = false;

                if self.cancelled() {
                    return (matches, attempted, true);
                }

                let mut generator = CandidateGenerator::new(rest_positions.len());
                let mut scratch = self.base_indices.clone();
                scratch[first_position] = first_digit;
                let mut full_digits = vec![0u16; self.unknown_positions.len()];
                full_digits[0] = first_digit;

                loop {
                    let digits = match generator.next_candidate() {
                        Some(digits) => digits,
                        None => break,
                    };
                    let ticket = claimed.fetch_add(1, Ordering::SeqCst);
                    if self.max_attempts.map_or(false, |limit| ticket >= limit) {
                        truncated = true;
                        break;
                    }
                    for ((&position, &digit), slot) in rest_positions
                        .iter()
                        .zip(digits)
                        .zip(full_digits[1..].iter_mut())
                    {
                        scratch[position] = digit;
                        *slot = digit;
                    }

                    attempted += 1;
                    let valid = self.evaluate(&scratch);
                    observer.candidate_evaluated(ticket + 1, valid);
                    if valid {
                        let phrase = self.render_candidate(&full_digits);
                        observer.match_found(&phrase, ticket + 1);
                        matches.push(phrase);
                    } else if verbose {
                        let phrase = self.render_candidate(&full_digits);
                        observer.candidate_rejected(&phrase, ticket + 1);
                    }

                    if self.cancelled() {
                        truncated = generator.next_candidate().is_some();
                        break;
                    }
                }

                (matches, attempted, truncated)
            })
            .collect();

        let mut matches = Vec::new();
        let mut attempted = 0u64;
        let mut truncated = false;
        for (partition_matches, partition_attempted, partition_truncated) in partitions {
            matches.extend(partition_matches);
            attempted += partition_attempted;
            truncated |= partition_truncated;
        }

        self.log_finish(&matches, attempted, truncated);
        SearchOutcome {
            matches,
            attempted,
            truncated,
        }
    }

    fn evaluate(&self, indices: &[u16]) -> bool {
        self.unresolved_word.is_none() && self.validator.validate_indices(indices)
    }

    fn render_candidate(&self, digits: &[u16]) -> String {
        let words = self.wordlist.words();
        let fill: Vec<&str> = digits
            .iter()
            .map(|&digit| words[digit as usize].as_str())
            .collect();
        self.template.render(&fill)
    }

    fn cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .map_or(false, |flag| flag.load(Ordering::Relaxed))
    }

    fn log_start(&self) {
        if let Some(word) = &self.unresolved_word {
            debug!(
                "fixed word {:?} is not in the wordlist, no completion can validate",
                word
            );
        }
        let space = match self.total_combinations() {
            Some(total) => total.to_string(),
            None => "2^128 or more".to_string(),
        };
        info!(
            "searching {} unknown position(s), {} candidate(s)",
            self.unknown_positions.len(),
            space
        );
    }

    fn log_finish(&self, matches: &[String], attempted: u64, truncated: bool) {
        info!(
            "search finished: {} match(es) in {} candidate(s){}",
            matches.len(),
            attempted,
            if truncated { ", stopped early" } else { "" }
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RecoveryError;
    use crate::wordlist::MnemonicLanguage;
    use std::sync::Mutex;

    fn english() -> Arc<Wordlist> {
        Arc::new(Wordlist::builtin(MnemonicLanguage::English))
    }

    fn search_for(phrase: &str, missing: usize) -> CandidateSearch {
        let template = PhraseTemplate::parse(phrase).unwrap();
        CandidateSearch::new(english(), template, missing).unwrap()
    }

    /// Observer that records every event, with rejection reporting on
    #[derive(Default)]
    struct RecordingObserver {
        evaluated: Mutex<Vec<(u64, bool)>>,
        rejected: Mutex<Vec<String>>,
        matched: Mutex<Vec<String>>,
    }

    impl SearchObserver for RecordingObserver {
        fn candidate_evaluated(&self, attempt: u64, valid: bool) {
            self.evaluated.lock().unwrap().push((attempt, valid));
        }

        fn report_rejections(&self) -> bool {
            true
        }

        fn candidate_rejected(&self, phrase: &str, _attempt: u64) {
            self.rejected.lock().unwrap().push(phrase.to_string());
        }

        fn match_found(&self, phrase: &str, _attempt: u64) {
            self.matched.lock().unwrap().push(phrase.to_string());
        }
    }

    #[test]
    fn test_missing_count_mismatch() {
        let template = PhraseTemplate::parse(
            "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon ? ?",
        )
        .unwrap();
        let err = CandidateSearch::new(english(), template, 1).unwrap_err();
        assert!(matches!(
            err,
            RecoveryError::Config(ConfigError::MissingCountMismatch {
                placeholders: 2,
                declared: 1
            })
        ));
    }

    #[test]
    fn test_zero_unknowns_valid_phrase() {
        let phrase =
            "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";
        let outcome = search_for(phrase, 0).run(&NullObserver);

        assert_eq!(outcome.attempted, 1);
        assert!(!outcome.truncated);
        assert_eq!(outcome.matches, vec![phrase.to_string()]);
    }

    #[test]
    fn test_zero_unknowns_invalid_phrase() {
        let phrase =
            "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon";
        let observer = RecordingObserver::default();
        let outcome = search_for(phrase, 0).run(&observer);

        assert_eq!(outcome.attempted, 1);
        assert!(outcome.matches.is_empty());
        assert_eq!(observer.evaluated.lock().unwrap().as_slice(), &[(1, false)]);
        assert_eq!(observer.rejected.lock().unwrap().as_slice(), &[phrase.to_string()]);
    }

    #[test]
    fn test_unresolved_fixed_word_finds_nothing() {
        let phrase =
            "qqqq abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon ?";
        let outcome = search_for(phrase, 1).run(&NullObserver);

        assert_eq!(outcome.attempted, 2048);
        assert!(!outcome.truncated);
        assert!(outcome.matches.is_empty());
    }

    #[test]
    fn test_observer_sees_matches_in_order() {
        let phrase =
            "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon ?";
        let observer = RecordingObserver::default();
        let outcome = search_for(phrase, 1).run(&observer);

        let matched = observer.matched.lock().unwrap();
        assert_eq!(matched.as_slice(), outcome.matches.as_slice());
        let rejected_count = observer.rejected.lock().unwrap().len() as u64;
        assert_eq!(rejected_count + matched.len() as u64, outcome.attempted);
    }

    #[test]
    fn test_rejections_not_rendered_by_default() {
        // NullObserver leaves report_rejections off; this mainly pins the
        // default implementations down
        assert!(!NullObserver.report_rejections());
    }
}

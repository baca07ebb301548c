//! Candidate enumeration over the unknown positions
//!
//! With K unknown positions each ranging over the full wordlist there are
//! 2048^K candidates. Digits advance like an odometer with the rightmost
//! digit fastest, so the first unknown position varies slowest and the
//! candidates come out in lexicographic index order.

use crate::{BITS_PER_WORD, WORDLIST_SIZE};

/// Size of a candidate space with the given number of unknowns
///
/// `None` when 2048^K does not fit in a u128.
pub fn total_combinations(unknown_count: usize) -> Option<u128> {
    let bits = unknown_count.checked_mul(BITS_PER_WORD)?;
    if bits >= 128 {
        None
    } else {
        Some(1u128 << bits)
    }
}

/// Streaming enumerator of digit assignments for the unknown positions
///
/// Holds one assignment at a time, so memory stays O(K) no matter how
/// large the candidate space is.
#[derive(Debug)]
pub struct CandidateGenerator {
    digits: Vec<u16>,
    produced: u64,
    started: bool,
    exhausted: bool,
}

impl CandidateGenerator {
    /// Create a generator for the given number of unknown positions
    pub fn new(unknown_count: usize) -> Self {
        Self {
            digits: vec![0; unknown_count],
            produced: 0,
            started: false,
            exhausted: false,
        }
    }

    /// Number of unknown positions
    pub fn unknown_count(&self) -> usize {
        self.digits.len()
    }

    /// Candidates yielded so far
    pub fn produced(&self) -> u64 {
        self.produced
    }

    /// Check if the generator is exhausted
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Size of the candidate space, `None` when it exceeds u128
    pub fn total_combinations(&self) -> Option<u128> {
        total_combinations(self.digits.len())
    }

    /// Yield the next digit assignment, `None` once the space is exhausted
    ///
    /// A generator with zero unknowns yields a single empty assignment.
    pub fn next_candidate(&mut self) -> Option<&[u16]> {
        if self.exhausted {
            return None;
        }
        if self.started {
            if !self.advance_digits() {
                self.exhausted = true;
                return None;
            }
        } else {
            self.started = true;
        }
        self.produced += 1;
        Some(&self.digits)
    }

    /// Restart enumeration from the first candidate
    pub fn reset(&mut self) {
        self.digits.fill(0);
        self.produced = 0;
        self.started = false;
        self.exhausted = false;
    }

    // Increment the digits like an odometer, rightmost digit fastest.
    // Returns false when the odometer wraps around.
    fn advance_digits(&mut self) -> bool {
        for digit in self.digits.iter_mut().rev() {
            *digit += 1;
            if (*digit as usize) < WORDLIST_SIZE {
                return true;
            }
            *digit = 0;
        }
        false
    }
}

//! Progress monitoring and performance tracking

use crate::search::SearchObserver;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Performance metrics for the search
#[derive(Debug, Clone)]
pub struct SearchMetrics {
    /// Total candidates evaluated
    pub candidates_processed: u64,
    /// Candidates evaluated per second
    pub candidates_per_second: f64,
    /// Total time elapsed
    pub elapsed_time: Duration,
    /// Estimated time remaining, when the space size is known
    pub estimated_remaining: Option<Duration>,
    /// Number of matches found
    pub matches_found: u64,
}

/// Progress tracking state
#[derive(Debug)]
struct ProgressState {
    /// Total search space size, `None` when it exceeds u128
    total_candidates: Option<u128>,
    /// Candidates evaluated so far
    processed: AtomicU64,
    /// Number of matches found
    matches: AtomicU64,
    /// Start time
    start_time: Mutex<Instant>,
    /// Whether the search is running
    is_running: AtomicBool,
    /// Whether a match was found
    match_found: AtomicBool,
}

/// Configuration for the monitor
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Whether to draw a progress bar
    pub show_progress_bar: bool,
    /// Whether rejected candidates are reported at debug level
    pub log_rejections: bool,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            show_progress_bar: true,
            log_rejections: false,
        }
    }
}

/// Observer that tracks search progress with counters and a progress bar
///
/// When the candidate space is too large for a bar length the bar falls
/// back to a spinner with a running count.
#[derive(Debug)]
pub struct SearchMonitor {
    state: ProgressState,
    progress_bar: Option<ProgressBar>,
    config: MonitorConfig,
}

impl SearchMonitor {
    /// Create a monitor for a search over the given candidate space
    pub fn new(total_candidates: Option<u128>, config: MonitorConfig) -> Self {
        let state = ProgressState {
            total_candidates,
            processed: AtomicU64::new(0),
            matches: AtomicU64::new(0),
            start_time: Mutex::new(Instant::now()),
            is_running: AtomicBool::new(false),
            match_found: AtomicBool::new(false),
        };

        let progress_bar = if config.show_progress_bar {
            let pb = match total_candidates {
                Some(total) if total <= u64::MAX as u128 => {
                    let pb = ProgressBar::new(total as u64);
                    pb.set_style(
                        ProgressStyle::default_bar()
                            .template("{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} ({percent}%) {msg}")
                            .unwrap()
                            .progress_chars("#>-"),
                    );
                    pb
                }
                _ => {
                    let pb = ProgressBar::new_spinner();
                    pb.set_style(
                        ProgressStyle::default_spinner()
                            .template("{spinner:.green} [{elapsed_precise}] {pos} candidates {msg}")
                            .unwrap(),
                    );
                    pb
                }
            };
            pb.set_message("Searching for valid phrases...");
            Some(pb)
        } else {
            None
        };

        Self {
            state,
            progress_bar,
            config,
        }
    }

    /// Start monitoring
    pub fn start(&self) {
        self.state.is_running.store(true, Ordering::SeqCst);
        if let Ok(mut start_time) = self.state.start_time.lock() {
            *start_time = Instant::now();
        }

        if let Some(pb) = &self.progress_bar {
            pb.reset();
        }

        info!("Search monitoring started");
    }

    /// Stop monitoring
    pub fn finish(&self) {
        self.state.is_running.store(false, Ordering::SeqCst);

        if let Some(pb) = &self.progress_bar {
            pb.finish_with_message("Search complete");
        }

        info!("Search monitoring stopped");
    }

    /// Get current performance metrics
    pub fn metrics(&self) -> SearchMetrics {
        let processed = self.state.processed.load(Ordering::SeqCst);
        let matches = self.state.matches.load(Ordering::SeqCst);
        let elapsed = if let Ok(start_time) = self.state.start_time.lock() {
            start_time.elapsed()
        } else {
            Duration::from_secs(0)
        };

        let candidates_per_second = if elapsed.as_secs_f64() > 0.0 {
            processed as f64 / elapsed.as_secs_f64()
        } else {
            0.0
        };

        let estimated_remaining = match self.state.total_candidates {
            Some(total) if candidates_per_second > 0.0 && total <= u64::MAX as u128 => {
                let remaining = (total as u64).saturating_sub(processed);
                Some(Duration::from_secs_f64(
                    remaining as f64 / candidates_per_second,
                ))
            }
            _ => None,
        };

        SearchMetrics {
            candidates_processed: processed,
            candidates_per_second,
            elapsed_time: elapsed,
            estimated_remaining,
            matches_found: matches,
        }
    }

    /// Get total candidates evaluated
    pub fn processed_count(&self) -> u64 {
        self.state.processed.load(Ordering::SeqCst)
    }

    /// Get total matches found
    pub fn match_count(&self) -> u64 {
        self.state.matches.load(Ordering::SeqCst)
    }

    /// Check if monitoring is running
    pub fn is_running(&self) -> bool {
        self.state.is_running.load(Ordering::SeqCst)
    }

    /// Check if a match was found
    pub fn has_match(&self) -> bool {
        self.state.match_found.load(Ordering::SeqCst)
    }
}

impl SearchObserver for SearchMonitor {
    fn candidate_evaluated(&self, _attempt: u64, _valid: bool) {
        let processed = self.state.processed.fetch_add(1, Ordering::SeqCst) + 1;

        if let Some(pb) = &self.progress_bar {
            pb.set_position(processed);

            // Refresh the rate message occasionally
            if processed % 1024 == 0 {
                let metrics = self.metrics();
                pb.set_message(format!(
                    "{}, {} matches",
                    utils::format_rate(metrics.candidates_per_second),
                    metrics.matches_found
                ));
            }
        }
    }

    fn report_rejections(&self) -> bool {
        self.config.log_rejections
    }

    fn candidate_rejected(&self, phrase: &str, attempt: u64) {
        debug!("candidate {} rejected: {}", attempt, phrase);
    }

    fn match_found(&self, phrase: &str, attempt: u64) {
        self.state.matches.fetch_add(1, Ordering::SeqCst);
        self.state.match_found.store(true, Ordering::SeqCst);

        if let Some(pb) = &self.progress_bar {
            pb.println(format!("Match found: {}", phrase));
        }

        info!("Match found at attempt {}: {}", attempt, phrase);
    }
}

/// Utility functions for monitoring
pub mod utils {
    use super::*;

    /// Format duration in human-readable format
    pub fn format_duration(duration: Duration) -> String {
        let total_seconds = duration.as_secs();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Format large numbers with commas
    pub fn format_number(num: u64) -> String {
        let num_str = num.to_string();
        let mut result = String::new();

        for (i, c) in num_str.chars().rev().enumerate() {
            if i > 0 && i % 3 == 0 {
                result.push(',');
            }
            result.push(c);
        }

        result.chars().rev().collect()
    }

    /// Format rate with appropriate units
    pub fn format_rate(rate: f64) -> String {
        if rate >= 1_000_000.0 {
            format!("{:.1}M/s", rate / 1_000_000.0)
        } else if rate >= 1_000.0 {
            format!("{:.1}K/s", rate / 1_000.0)
        } else {
            format!("{:.0}/s", rate)
        }
    }
}

//! Command-line interface for the mnemonic recovery tool

use anyhow::{Context, Result};
use bip39_recovery::monitor::utils;
use bip39_recovery::{
    CandidateSearch, MnemonicLanguage, MonitorConfig, PhraseValidator, RecoveryConfig,
    SearchMonitor, SearchOutcome, Wordlist,
};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "bip39-recover")]
#[command(about = "BIP39 mnemonic phrase recovery through checksum search")]
#[command(version)]
struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Recover missing words from a partial phrase
    Recover {
        /// Partial phrase with "?" in place of each unknown word
        #[arg(short, long)]
        phrase: Option<String>,
        /// Number of unknown words in the phrase
        #[arg(short, long, default_value = "0")]
        missing: usize,
        /// Wordlist language
        #[arg(short, long, default_value = "english")]
        language: String,
        /// Custom wordlist file (one word per line)
        #[arg(short, long)]
        wordlist: Option<PathBuf>,
        /// Maximum number of candidates to evaluate (0 for unbounded)
        #[arg(long)]
        max_attempts: Option<u64>,
        /// Split the search across threads
        #[arg(long)]
        parallel: bool,
        /// Number of threads for parallel search
        #[arg(short, long)]
        threads: Option<usize>,
        /// Disable the progress bar
        #[arg(long)]
        no_progress: bool,
        /// Load settings from a JSON configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Validate a complete phrase against its checksum
    Validate {
        /// The phrase to validate
        #[arg(short, long)]
        phrase: String,
        /// Wordlist language
        #[arg(short, long, default_value = "english")]
        language: String,
        /// Custom wordlist file (one word per line)
        #[arg(short, long)]
        wordlist: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    match cli.command {
        Commands::Recover {
            phrase,
            missing,
            language,
            wordlist,
            max_attempts,
            parallel,
            threads,
            no_progress,
            config,
        } => {
            let config = match (config, phrase) {
                (Some(path), None) => {
                    let mut config = RecoveryConfig::from_file(&path).with_context(|| {
                        format!("failed to load configuration from {}", path.display())
                    })?;
                    // Run-shape flags still override the file
                    if let Some(limit) = max_attempts {
                        config.max_attempts = limit;
                    }
                    if let Some(threads) = threads {
                        config.num_threads = threads;
                    }
                    if parallel {
                        config.parallel = true;
                    }
                    if no_progress {
                        config.show_progress = false;
                    }
                    config.validate()?;
                    config
                }
                (None, Some(phrase)) => {
                    let config = RecoveryConfig {
                        partial_phrase: phrase,
                        missing_words: missing,
                        language,
                        wordlist_path: wordlist,
                        max_attempts: max_attempts.unwrap_or(0),
                        num_threads: threads.unwrap_or_else(num_cpus::get),
                        show_progress: !no_progress,
                        parallel,
                    };
                    config.validate()?;
                    config
                }
                (Some(_), Some(_)) => {
                    anyhow::bail!("--phrase and --config are mutually exclusive")
                }
                (None, None) => anyhow::bail!("either --phrase or --config is required"),
            };

            run_recover(&config, cli.debug)
        }
        Commands::Validate {
            phrase,
            language,
            wordlist,
        } => run_validate(&phrase, &language, wordlist.as_deref()),
    }
}

/// Run the recovery search described by the configuration
fn run_recover(config: &RecoveryConfig, debug: bool) -> Result<()> {
    let wordlist = config.load_wordlist()?;
    let template = config.template()?;

    println!("BIP39 Mnemonic Phrase Recovery v{}", bip39_recovery::VERSION);
    println!("Partial phrase: {}", config.partial_phrase);
    println!("Missing words: {}", config.missing_words);

    let search = CandidateSearch::new(wordlist, template, config.missing_words)?
        .with_max_attempts(config.max_attempts_limit());

    match search.total_combinations() {
        Some(total) => println!("Search space: {} candidates", total),
        None => println!("Search space: 2^128 or more candidates"),
    }

    if config.parallel {
        rayon::ThreadPoolBuilder::new()
            .num_threads(config.num_threads)
            .build_global()
            .context("failed to configure the thread pool")?;
        info!("Parallel search on {} threads", config.num_threads);
    }

    let monitor = SearchMonitor::new(
        search.total_combinations(),
        MonitorConfig {
            show_progress_bar: config.show_progress,
            log_rejections: debug,
        },
    );

    monitor.start();
    let outcome = if config.parallel {
        search.run_parallel(&monitor)
    } else {
        search.run(&monitor)
    };
    monitor.finish();

    report_outcome(&outcome, &monitor);
    Ok(())
}

/// Print the search results the way the tool reports them
fn report_outcome(outcome: &SearchOutcome, monitor: &SearchMonitor) {
    let metrics = monitor.metrics();

    println!();
    if outcome.matches.is_empty() {
        println!("No valid mnemonic phrases could be recovered.");
    } else {
        println!("Possible Valid Mnemonic Phrases:");
        for phrase in &outcome.matches {
            println!("{}", phrase);
        }
    }

    if outcome.truncated {
        println!(
            "Search stopped after {} attempts with candidates remaining.",
            utils::format_number(outcome.attempted)
        );
    } else if outcome.matches.is_empty() {
        println!("The search space was exhausted.");
    }

    println!(
        "Checked {} candidates in {} ({})",
        utils::format_number(outcome.attempted),
        utils::format_duration(metrics.elapsed_time),
        utils::format_rate(metrics.candidates_per_second)
    );
}

/// Validate a single complete phrase and set the exit code accordingly
fn run_validate(phrase: &str, language: &str, wordlist_path: Option<&Path>) -> Result<()> {
    let wordlist = match wordlist_path {
        Some(path) => Arc::new(Wordlist::from_file(path)?),
        None => {
            let language: MnemonicLanguage = language.parse()?;
            Arc::new(Wordlist::builtin(language))
        }
    };

    let validator = PhraseValidator::new(wordlist);
    if validator.validate_phrase(phrase) {
        println!("Valid mnemonic phrase.");
        Ok(())
    } else {
        println!("Invalid mnemonic phrase.");
        std::process::exit(1);
    }
}

fn init_tracing(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

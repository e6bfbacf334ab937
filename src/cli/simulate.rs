//! Simulate command implementation.

// Games-per-second is a display figure
#![allow(clippy::cast_precision_loss)]

use super::output::{JsonSimulateResult, format_summary_csv, format_summary_text};
use super::{CliError, SimulateFormat, load_config, resolve_seed};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::path::Path;
use std::time::Instant;
use streetdice::autoplay::run_batch_with;

/// Games between progress bar updates on each worker.
const PROGRESS_CHUNK: u64 = 64;

/// Execute the simulate command.
///
/// # Errors
///
/// Returns an error if the config cannot be loaded or output fails.
pub(crate) fn execute(
    games: u64,
    seed: Option<u64>,
    threads: Option<usize>,
    config: Option<&Path>,
    format: SimulateFormat,
    progress: bool,
) -> Result<(), CliError> {
    let config = load_config(config)?;

    // Set thread pool size if specified
    if let Some(num_threads) = threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()
            .ok(); // Ignore error if already initialized
    }

    let base_seed = resolve_seed(seed);

    let pb = if progress {
        let pb = ProgressBar::new(games);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} games ({per_sec})")
            .map_err(|e| CliError::new(format!("Invalid progress template: {e}")))?
            .progress_chars("=>-");
        pb.set_style(style);
        Some(pb)
    } else {
        None
    };

    let start = Instant::now();

    // Each worker accumulates its own summary; progress ticks in chunks
    let seeds = (0..games)
        .into_par_iter()
        .map(|i| base_seed.wrapping_add(i));
    let summary = run_batch_with(seeds, &config, |local| {
        if let Some(pb) = &pb
            && (local.games_played + local.games_failed).is_multiple_of(PROGRESS_CHUNK)
        {
            pb.inc(PROGRESS_CHUNK);
        }
    });

    if let Some(pb) = pb {
        pb.set_position(summary.games_played + summary.games_failed);
        pb.finish_with_message("done");
    }

    let duration = start.elapsed();
    let games_per_sec = if duration.as_secs_f64() > 0.0 {
        summary.games_played as f64 / duration.as_secs_f64()
    } else {
        0.0
    };

    match format {
        SimulateFormat::Text => {
            println!();
            print!("{}", format_summary_text(&summary));
            println!();
            println!("Duration: {:.2}s ({games_per_sec:.0} games/sec)", duration.as_secs_f64());
        }
        SimulateFormat::Json => {
            let json_result = JsonSimulateResult::from_summary(&summary, games_per_sec);
            let json = serde_json::to_string_pretty(&json_result)?;
            println!("{json}");
        }
        SimulateFormat::Csv => {
            print!("{}", format_summary_csv(&summary));
        }
    }

    Ok(())
}

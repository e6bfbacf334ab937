//! Play command implementation.

use super::output::format_report_text;
use super::{CliError, OutputFormat, load_config, resolve_seed};
use std::path::Path;
use streetdice::autoplay::play_game;

/// Execute the play command.
///
/// # Errors
///
/// Returns an error if the config cannot be loaded or the game fails.
pub(crate) fn execute(
    seed: Option<u64>,
    config: Option<&Path>,
    format: OutputFormat,
    boards: bool,
) -> Result<(), CliError> {
    let config = load_config(config)?;
    let seed = resolve_seed(seed);

    let report = play_game(seed, &config)?;

    match format {
        OutputFormat::Text => {
            print!("{}", format_report_text(&report, &config, boards));
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&report)?;
            println!("{json}");
        }
    }

    Ok(())
}

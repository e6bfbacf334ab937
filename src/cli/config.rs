//! Config command implementation.

use super::{CliError, load_config};
use super::output::format_board;
use std::path::Path;
use streetdice::Board;

/// Execute the config command.
///
/// With a path, validates the file and prints the effective configuration
/// (defaults filled in). Without one, prints the built-in configuration.
///
/// # Errors
///
/// Returns an error if the file cannot be read, parsed or validated.
pub(crate) fn execute(path: Option<&Path>) -> Result<(), CliError> {
    let config = load_config(path)?;

    if let Some(path) = path {
        eprintln!("{}: OK", path.display());
        eprintln!();
        eprint!("{}", format_board(&Board::for_config(&config), &config));
        eprintln!();
    }

    let json = serde_json::to_string_pretty(&config)?;
    println!("{json}");

    Ok(())
}

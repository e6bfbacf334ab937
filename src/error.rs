//! Error types for the rules engine.
//!
//! Game-rule violations (wrong column, occupied cell, spent bonus building)
//! are not errors: the engine reports them as rejected outcomes and leaves
//! state untouched. Only malformed inputs and broken configuration surface
//! here.

use std::path::PathBuf;
use thiserror::Error;

/// Errors produced by the rules engine.
#[derive(Error, Debug)]
pub enum GameError {
    /// A die face outside `1..=6` was supplied.
    #[error("invalid die face {0} (expected 1..=6)")]
    InvalidDieFace(u8),

    /// The configuration failed validation.
    #[error("invalid configuration: {reason}")]
    InvalidConfig {
        /// What was wrong with it.
        reason: String,
    },

    /// A configuration file could not be read.
    #[error("failed to read config {path}: {source}")]
    ConfigIo {
        /// The file that was being read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A configuration file was not valid JSON for [`crate::GameConfig`].
    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] serde_json::Error),

    /// An automated playthrough stopped making progress.
    #[error("game with seed {seed} stalled after {actions} actions")]
    Stalled {
        /// Seed of the stalled game.
        seed: u64,
        /// Actions taken before giving up.
        actions: u32,
    },
}

impl GameError {
    /// Shorthand for an [`GameError::InvalidConfig`] with the given reason.
    pub(crate) fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }
}

/// Result alias used throughout the crate.
pub type GameResult<T> = Result<T, GameError>;

//! Game configuration.
//!
//! The same structure is loaded from JSON files by the CLI. Every field has a
//! default, so a config file only needs to name what it changes.

use crate::error::{GameError, GameResult};
use crate::game::{Coord, DIE_FACES};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

/// Default per-cell point values for the 5x6 board.
const DEFAULT_POINT_MATRIX: [[u32; 6]; 5] = [
    [1, 3, 0, 2, 1, 0],
    [0, 2, 1, 0, 3, 1],
    [2, 0, 3, 1, 0, 2],
    [1, 0, 2, 3, 1, 0],
    [0, 1, 1, 0, 2, 3],
];

/// Lowest dice sum that maps to a fixed street. 2 needs a player choice.
pub const MIN_STREET_SUM: u8 = 3;

/// Highest dice sum that maps to a fixed street. 12 needs a player choice.
pub const MAX_STREET_SUM: u8 = 11;

/// Largest accepted `max_rounds`.
pub const MAX_ROUNDS_LIMIT: u32 = 1000;

/// Immutable game configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Number of rows (streets).
    pub rows: usize,
    /// Number of columns. Must equal the number of die faces.
    pub cols: usize,
    /// Number of scored rounds after the preparation round.
    pub max_rounds: u32,
    /// Rounds followed by a bonus stage.
    pub bonus_stage_rounds: BTreeSet<u32>,
    /// Points per cell, `rows` x `cols`.
    pub point_matrix: Vec<Vec<u32>>,
    /// Dice sums that select each row as the scored street.
    pub street_sums: Vec<Vec<u8>>,
    /// Points per qualifying plaza.
    pub plaza_bonus_points: u32,
    /// Display labels for rows. Empty means unlabelled.
    pub row_labels: Vec<String>,
    /// Display labels for columns. Empty means unlabelled.
    pub col_labels: Vec<String>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            rows: 5,
            cols: usize::from(DIE_FACES),
            max_rounds: 9,
            bonus_stage_rounds: [3, 6, 9].into_iter().collect(),
            point_matrix: DEFAULT_POINT_MATRIX.iter().map(|row| row.to_vec()).collect(),
            street_sums: vec![vec![3, 4], vec![5, 6], vec![7], vec![8, 9], vec![10, 11]],
            plaza_bonus_points: 10,
            row_labels: ["3-4", "5-6", "7", "8-9", "10-11"]
                .into_iter()
                .map(String::from)
                .collect(),
            col_labels: (1..=DIE_FACES).map(|face| face.to_string()).collect(),
        }
    }
}

impl GameConfig {
    /// Parse a configuration from JSON and validate it.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or the result fails
    /// [`GameConfig::validate`].
    pub fn from_json_str(json: &str) -> GameResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid JSON, or
    /// fails validation.
    pub fn load(path: &Path) -> GameResult<Self> {
        let json = std::fs::read_to_string(path).map_err(|source| GameError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Check the configuration is internally consistent.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::InvalidConfig`] describing the first problem found.
    pub fn validate(&self) -> GameResult<()> {
        if self.cols != usize::from(DIE_FACES) {
            return Err(GameError::invalid_config(format!(
                "cols must be {DIE_FACES} (one per die face), got {}",
                self.cols
            )));
        }
        if self.rows == 0 {
            return Err(GameError::invalid_config("rows must be at least 1"));
        }
        if self.max_rounds == 0 || self.max_rounds > MAX_ROUNDS_LIMIT {
            return Err(GameError::invalid_config(format!(
                "max_rounds must be in 1..={MAX_ROUNDS_LIMIT}, got {}",
                self.max_rounds
            )));
        }

        if self.point_matrix.len() != self.rows
            || self.point_matrix.iter().any(|row| row.len() != self.cols)
        {
            return Err(GameError::invalid_config(format!(
                "point_matrix must be {}x{}",
                self.rows, self.cols
            )));
        }
        let total = self
            .point_matrix
            .iter()
            .flatten()
            .try_fold(0u32, |total, &points| total.checked_add(points));
        if total.is_none() {
            return Err(GameError::invalid_config(format!(
                "point_matrix total exceeds {}",
                u32::MAX
            )));
        }

        if self.street_sums.len() != self.rows {
            return Err(GameError::invalid_config(format!(
                "street_sums must have one entry per row ({}), got {}",
                self.rows,
                self.street_sums.len()
            )));
        }
        let mut seen = BTreeSet::new();
        for sum in self.street_sums.iter().flatten() {
            if !(MIN_STREET_SUM..=MAX_STREET_SUM).contains(sum) {
                return Err(GameError::invalid_config(format!(
                    "street sum {sum} outside {MIN_STREET_SUM}..={MAX_STREET_SUM}"
                )));
            }
            if !seen.insert(*sum) {
                return Err(GameError::invalid_config(format!(
                    "street sum {sum} assigned to more than one row"
                )));
            }
        }

        if let Some(round) = self
            .bonus_stage_rounds
            .iter()
            .find(|&&r| r == 0 || r > self.max_rounds)
        {
            return Err(GameError::invalid_config(format!(
                "bonus round {round} outside 1..={}",
                self.max_rounds
            )));
        }

        if !self.row_labels.is_empty() && self.row_labels.len() != self.rows {
            return Err(GameError::invalid_config("row_labels must match rows"));
        }
        if !self.col_labels.is_empty() && self.col_labels.len() != self.cols {
            return Err(GameError::invalid_config("col_labels must match cols"));
        }

        Ok(())
    }

    /// Point value of a cell (0 outside the matrix).
    #[must_use]
    pub fn point_value(&self, coord: Coord) -> u32 {
        self.point_matrix
            .get(coord.row)
            .and_then(|row| row.get(coord.col))
            .copied()
            .unwrap_or(0)
    }

    /// Whether a bonus stage follows the given round.
    #[must_use]
    pub fn is_bonus_round(&self, round: u32) -> bool {
        self.bonus_stage_rounds.contains(&round)
    }
}

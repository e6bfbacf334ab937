//! Output formatting utilities for CLI.

// Summary figures are displayed, not computed on
#![allow(clippy::cast_precision_loss)]

use serde::Serialize;
use std::fmt::Write;
use streetdice::autoplay::{BatchSummary, GameReport};
use streetdice::{Board, Building, Cell, Coord, GameConfig};

/// One-letter symbol for a cell.
const fn cell_symbol(cell: Cell) -> char {
    match cell {
        Cell::Empty => '.',
        Cell::Built(Building::House) => 'H',
        Cell::Built(Building::Forest) => 'F',
        Cell::Built(Building::Lake) => 'L',
        Cell::Built(Building::Square) => 'S',
    }
}

/// Render the board as a labelled grid.
pub(super) fn format_board(board: &Board, config: &GameConfig) -> String {
    let label_width = config.row_labels.iter().map(String::len).max().unwrap_or(0);
    let mut output = String::new();

    let _ = write!(output, "{:label_width$} ", "");
    for col in 0..board.cols() {
        let label = config.col_labels.get(col).map_or("", String::as_str);
        let _ = write!(output, " {label:>2}");
    }
    output.push('\n');

    for row in 0..board.rows() {
        let label = config.row_labels.get(row).map_or("", String::as_str);
        let _ = write!(output, "{label:>label_width$} ");
        for col in 0..board.cols() {
            let cell = board.get(Coord::new(row, col)).unwrap_or_default();
            let _ = write!(output, "  {}", cell_symbol(cell));
        }
        output.push('\n');
    }

    output
}

/// Format a game report as human-readable text.
pub(super) fn format_report_text(report: &GameReport, config: &GameConfig, boards: bool) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "Game Result (seed: {})", report.seed);
    let _ = writeln!(output, "========================================\n");

    for (idx, round) in report.rounds.iter().enumerate() {
        let street = round.target_row.map_or_else(
            || "none".to_string(),
            |row| {
                config
                    .row_labels
                    .get(row)
                    .map_or_else(|| row.to_string(), |label| format!("{row} ({label})"))
            },
        );
        let _ = write!(
            output,
            "  Round {}: sum {:>2}, street {street}, {} points",
            round.round, round.dice_sum, round.score
        );
        if let Some(building) = round.bonus_building {
            let _ = write!(output, " [bonus {building}]");
        }
        output.push('\n');

        if boards && let Some(board) = report.round_boards.get(idx) {
            output.push('\n');
            output.push_str(&format_board(board, config));
            output.push('\n');
        }
    }

    let _ = writeln!(output, "\nFinal board:");
    output.push_str(&format_board(&report.board, config));
    let _ = writeln!(output);
    let _ = writeln!(output, "  Round scores: {}", report.total_score);
    let _ = writeln!(output, "  Plaza bonus:  {}", report.plaza_bonus);
    let _ = writeln!(output, "  Final score:  {}", report.final_score);
    if report.skipped_steps > 0 {
        let _ = writeln!(output, "  Skipped steps: {}", report.skipped_steps);
    }

    output
}

/// JSON-serializable simulation result.
#[derive(Debug, Serialize)]
pub(super) struct JsonSimulateResult {
    /// Games that finished.
    games_played: u64,
    /// Games that stalled or failed.
    games_failed: u64,
    /// Mean final score.
    mean_score: f64,
    /// Final score standard deviation.
    score_std_dev: f64,
    /// Lowest final score.
    min_score: Option<u32>,
    /// Highest final score.
    max_score: Option<u32>,
    /// Seed of the highest-scoring game.
    best_seed: Option<u64>,
    /// Mean plaza bonus.
    mean_plaza_bonus: f64,
    /// Mean score per round.
    mean_round_scores: Vec<f64>,
    /// Bonus-stage picks per building.
    bonus_picks: Vec<JsonBonusPick>,
    /// Games per second.
    games_per_sec: f64,
}

/// JSON-serializable bonus pick count.
#[derive(Debug, Serialize)]
pub(super) struct JsonBonusPick {
    /// Building name.
    building: Building,
    /// Times picked.
    count: u64,
}

impl JsonSimulateResult {
    /// Create from a batch summary.
    pub(super) fn from_summary(summary: &BatchSummary, games_per_sec: f64) -> Self {
        Self {
            games_played: summary.games_played,
            games_failed: summary.games_failed,
            mean_score: summary.mean_score(),
            score_std_dev: summary.score_std_dev(),
            min_score: summary.min_score,
            max_score: summary.best.map(|(_, score)| score),
            best_seed: summary.best.map(|(seed, _)| seed),
            mean_plaza_bonus: summary.mean_plaza_bonus(),
            mean_round_scores: summary.mean_round_scores(),
            bonus_picks: summary
                .bonus_picks
                .iter()
                .map(|(&building, &count)| JsonBonusPick { building, count })
                .collect(),
            games_per_sec,
        }
    }
}

/// Format simulation stats as human-readable text.
pub(super) fn format_summary_text(summary: &BatchSummary) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "Simulation Results ({} games)", summary.games_played);
    let _ = writeln!(output, "========================================\n");

    let _ = writeln!(output, "Final Score:");
    let _ = writeln!(
        output,
        "  Mean: {:.1} (+/- {:.1})",
        summary.mean_score(),
        summary.score_std_dev()
    );
    if let (Some(min), Some((seed, max))) = (summary.min_score, summary.best) {
        let _ = writeln!(output, "  Range: {min} - {max} (best seed {seed})");
    }
    let _ = writeln!(output, "  Plaza bonus: {:.1}\n", summary.mean_plaza_bonus());

    let _ = writeln!(output, "Average Round Scores:");
    for (idx, mean) in summary.mean_round_scores().iter().enumerate() {
        let _ = writeln!(output, "  Round {}: {mean:.2}", idx + 1);
    }

    if !summary.bonus_picks.is_empty() {
        let total: u64 = summary.bonus_picks.values().sum();
        let _ = writeln!(output, "\nBonus Picks:");
        for (building, count) in &summary.bonus_picks {
            let share = *count as f64 / total as f64 * 100.0;
            let _ = writeln!(output, "  {building}: {count} ({share:.1}%)");
        }
    }

    if summary.games_failed > 0 {
        let _ = writeln!(output, "\nFailed games: {}", summary.games_failed);
    }

    output
}

/// Format simulation stats as CSV, one line per round.
pub(super) fn format_summary_csv(summary: &BatchSummary) -> String {
    let mut output = String::new();

    // Header
    output.push_str("round,mean_score\n");

    // Data rows
    for (idx, mean) in summary.mean_round_scores().iter().enumerate() {
        let _ = writeln!(output, "{},{mean:.4}", idx + 1);
    }
    let _ = writeln!(output, "plaza,{:.4}", summary.mean_plaza_bonus());
    let _ = writeln!(output, "final,{:.4}", summary.mean_score());

    output
}

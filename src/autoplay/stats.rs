//! Aggregated statistics over many automated games.

// Game counts stay far below 2^52
#![allow(clippy::cast_precision_loss)]

use crate::autoplay::GameReport;
use crate::game::Building;
use serde::Serialize;
use std::collections::BTreeMap;

/// Running totals for a batch of games.
///
/// Built with `add_report` on each worker and combined with `merge`, so it
/// fits a rayon fold/reduce without locking.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchSummary {
    /// Games that finished.
    pub games_played: u64,
    /// Games that stalled or failed to start.
    pub games_failed: u64,
    /// Lowest final score seen.
    pub min_score: Option<u32>,
    /// Highest final score seen, with its seed.
    pub best: Option<(u64, u32)>,
    /// How often each building was taken in a bonus stage.
    pub bonus_picks: BTreeMap<Building, u64>,
    /// Steps skipped because no cell could take them.
    pub skipped_steps: u64,
    /// Actions the engine rejected.
    pub rejected_actions: u64,
    score_sum: u64,
    score_sq_sum: f64,
    plaza_sum: u64,
    round_score_sums: Vec<u64>,
}

impl BatchSummary {
    /// Empty summary.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one finished game into the totals.
    pub fn add_report(&mut self, report: &GameReport) {
        let score = report.final_score;
        self.games_played += 1;
        self.score_sum += u64::from(score);
        self.score_sq_sum += f64::from(score) * f64::from(score);
        self.plaza_sum += u64::from(report.plaza_bonus);
        self.skipped_steps += u64::from(report.skipped_steps);
        self.rejected_actions += u64::from(report.rejected_actions);

        self.min_score = Some(self.min_score.map_or(score, |min| min.min(score)));
        if self.best.is_none_or(|(_, top)| score > top) {
            self.best = Some((report.seed, score));
        }

        for building in report.bonus_by_round.values() {
            *self.bonus_picks.entry(*building).or_insert(0) += 1;
        }

        if self.round_score_sums.len() < report.round_scores.len() {
            self.round_score_sums.resize(report.round_scores.len(), 0);
        }
        for (sum, &score) in self.round_score_sums.iter_mut().zip(&report.round_scores) {
            *sum += u64::from(score);
        }
    }

    /// Count a game that did not finish.
    pub fn add_failure(&mut self) {
        self.games_failed += 1;
    }

    /// Combine totals from another worker.
    pub fn merge(&mut self, other: &Self) {
        self.games_played += other.games_played;
        self.games_failed += other.games_failed;
        self.score_sum += other.score_sum;
        self.score_sq_sum += other.score_sq_sum;
        self.plaza_sum += other.plaza_sum;
        self.skipped_steps += other.skipped_steps;
        self.rejected_actions += other.rejected_actions;

        self.min_score = match (self.min_score, other.min_score) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };
        // Lower seed wins ties so the result does not depend on split order
        self.best = match (self.best, other.best) {
            (Some(a), Some(b)) => Some(if b.1 > a.1 || (b.1 == a.1 && b.0 < a.0) { b } else { a }),
            (a, b) => a.or(b),
        };

        for (building, count) in &other.bonus_picks {
            *self.bonus_picks.entry(*building).or_insert(0) += count;
        }

        if self.round_score_sums.len() < other.round_score_sums.len() {
            self.round_score_sums.resize(other.round_score_sums.len(), 0);
        }
        for (sum, add) in self.round_score_sums.iter_mut().zip(&other.round_score_sums) {
            *sum += add;
        }
    }

    /// Mean final score.
    #[must_use]
    pub fn mean_score(&self) -> f64 {
        if self.games_played == 0 {
            return 0.0;
        }
        self.score_sum as f64 / self.games_played as f64
    }

    /// Standard deviation of the final score.
    #[must_use]
    pub fn score_std_dev(&self) -> f64 {
        if self.games_played == 0 {
            return 0.0;
        }
        let n = self.games_played as f64;
        let mean = self.mean_score();
        let variance = (self.score_sq_sum / n) - (mean * mean);
        if variance < 0.0 { 0.0 } else { variance.sqrt() }
    }

    /// Mean plaza bonus.
    #[must_use]
    pub fn mean_plaza_bonus(&self) -> f64 {
        if self.games_played == 0 {
            return 0.0;
        }
        self.plaza_sum as f64 / self.games_played as f64
    }

    /// Mean score of each round, in round order.
    #[must_use]
    pub fn mean_round_scores(&self) -> Vec<f64> {
        if self.games_played == 0 {
            return vec![0.0; self.round_score_sums.len()];
        }
        let n = self.games_played as f64;
        self.round_score_sums.iter().map(|&sum| sum as f64 / n).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Board;

    fn report(seed: u64, round_scores: Vec<u32>, plaza_bonus: u32) -> GameReport {
        let total: u32 = round_scores.iter().sum();
        GameReport {
            seed,
            rounds: Vec::new(),
            round_scores,
            total_score: total,
            plaza_bonus,
            final_score: total + plaza_bonus,
            bonus_by_round: BTreeMap::from([(3, Building::House)]),
            skipped_steps: 1,
            rejected_actions: 0,
            board: Board::new(5, 6),
            round_boards: Vec::new(),
        }
    }

    #[test]
    fn test_empty_summary() {
        let summary = BatchSummary::new();
        assert!(summary.mean_score().abs() < f64::EPSILON);
        assert!(summary.score_std_dev().abs() < f64::EPSILON);
        assert_eq!(summary.min_score, None);
        assert_eq!(summary.best, None);
    }

    #[test]
    fn test_add_report() {
        let mut summary = BatchSummary::new();
        summary.add_report(&report(1, vec![2, 4], 0));
        summary.add_report(&report(2, vec![6, 0], 10));
        assert_eq!(summary.games_played, 2);
        assert!((summary.mean_score() - 11.0).abs() < 1e-9);
        assert!((summary.score_std_dev() - 5.0).abs() < 1e-9);
        assert_eq!(summary.min_score, Some(6));
        assert_eq!(summary.best, Some((2, 16)));
        assert_eq!(summary.bonus_picks.get(&Building::House), Some(&2));
        assert_eq!(summary.skipped_steps, 2);
        let rounds = summary.mean_round_scores();
        assert!((rounds[0] - 4.0).abs() < 1e-9);
        assert!((rounds[1] - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_merge_matches_sequential() {
        let reports = [
            report(1, vec![2, 4], 0),
            report(2, vec![6, 0], 10),
            report(3, vec![1, 1], 0),
        ];

        let mut sequential = BatchSummary::new();
        for r in &reports {
            sequential.add_report(r);
        }

        let mut left = BatchSummary::new();
        left.add_report(&reports[0]);
        let mut right = BatchSummary::new();
        right.add_report(&reports[1]);
        right.add_report(&reports[2]);
        right.add_failure();
        left.merge(&right);

        assert_eq!(left.games_played, sequential.games_played);
        assert_eq!(left.games_failed, 1);
        assert_eq!(left.min_score, sequential.min_score);
        assert_eq!(left.best, sequential.best);
        assert_eq!(left.bonus_picks, sequential.bonus_picks);
        assert!((left.mean_score() - sequential.mean_score()).abs() < 1e-9);
        assert_eq!(left.mean_round_scores(), sequential.mean_round_scores());
    }
}

//! Game invariants - sanity checks that detect bugs.
//!
//! These should never trigger through the public [`Game`] API. The simulator
//! and fuzzer run them after every action.

use crate::game::{Building, Game, PlacementState};

/// Invariant violation error.
#[derive(Debug, Clone)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub message: String,
}

impl std::fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Invariant violation: {}", self.message)
    }
}

impl std::error::Error for InvariantViolation {}

/// Check all game invariants.
///
/// Returns a list of violations found, or empty if all invariants hold.
#[must_use]
pub fn check_invariants(game: &Game) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();
    let mut violation = |message: String| violations.push(InvariantViolation { message });

    let config = game.config();
    let session = game.session();
    let board = game.board();

    if session.footer_scores().len() != config.max_rounds as usize {
        violation(format!(
            "footer has {} entries, expected {}",
            session.footer_scores().len(),
            config.max_rounds
        ));
    }

    // Rounds not yet played have no score
    for (idx, &score) in session.footer_scores().iter().enumerate() {
        if idx + 1 >= session.round() as usize && score != 0 {
            violation(format!("round {} has score {score} before it was played", idx + 1));
        }
    }

    if session.round() > config.max_rounds + 1 {
        violation(format!("round {} past max {}", session.round(), config.max_rounds));
    }
    if session.is_complete() != (session.round() > config.max_rounds) {
        violation(format!(
            "completion flag {} disagrees with round {}",
            session.is_complete(),
            session.round()
        ));
    }

    for coord in session.current_turn_placements() {
        if !board.is_occupied(*coord) {
            violation(format!("turn placement {coord:?} is not occupied"));
        }
    }

    if session.used_bonus_buildings().contains(&Building::Square) {
        violation("square used as a bonus building".to_string());
    }
    if session.bonus_by_round().len() != session.used_bonus_buildings().len() {
        violation(format!(
            "{} bonus rounds recorded for {} used buildings",
            session.bonus_by_round().len(),
            session.used_bonus_buildings().len()
        ));
    }
    for (round, building) in session.bonus_by_round() {
        if !config.is_bonus_round(*round) {
            violation(format!("bonus {building} recorded for non-bonus round {round}"));
        }
        if !session.used_bonus_buildings().contains(building) {
            violation(format!("bonus {building} for round {round} not marked used"));
        }
    }

    if session.in_bonus_stage() != (game.state() == PlacementState::Bonus) {
        violation(format!(
            "bonus flag {} disagrees with state {:?}",
            session.in_bonus_stage(),
            game.state()
        ));
    }
    if session.is_preparation() != game.state().is_preparation()
        && game.state() != PlacementState::Complete
    {
        violation(format!(
            "state {:?} does not belong to round {}",
            game.state(),
            session.round()
        ));
    }

    violations
}

/// Assert all game invariants hold, panicking if any are violated.
///
/// Only active in debug builds. No-op in release builds.
///
/// # Panics
///
/// Panics with detailed message if any invariant is violated.
#[cfg(debug_assertions)]
pub fn assert_invariants(game: &Game) {
    let violations = check_invariants(game);
    if !violations.is_empty() {
        let messages: Vec<_> = violations.iter().map(|v| v.message.as_str()).collect();
        panic!("Game invariant violations:\n  - {}", messages.join("\n  - "));
    }
}

/// No-op in release builds.
#[cfg(not(debug_assertions))]
pub fn assert_invariants(_game: &Game) {}

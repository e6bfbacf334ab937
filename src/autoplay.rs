//! Headless playthroughs.
//!
//! Provides a pure function interface: `(seed, config) -> GameReport`
//!
//! The runner handles:
//! - Seeded dice for every roll
//! - Asking a [`Policy`] for target streets and placements
//! - Invariant checks after every action
//! - Parallel batches with rayon

mod policy;
mod stats;

pub use policy::{Decision, GreedyPolicy, Policy};
pub use stats::BatchSummary;

use crate::dice::Dice;
use crate::error::{GameError, GameResult};
use crate::game::{
    Board, Building, Game, GameConfig, PLAYER_CHOICE_SUMS, PlacementOutcome, RoundOutcome,
    check_invariants,
};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Upper bound on actions per round before a game counts as stalled.
///
/// A round takes one roll, two placements and possibly a bonus placement;
/// the rest is headroom for rejected and skipped actions.
const ACTIONS_PER_ROUND: u32 = 16;

/// Everything that happened in one automated game.
#[derive(Debug, Clone, Serialize)]
pub struct GameReport {
    /// Seed for the dice.
    pub seed: u64,
    /// Outcome of every scored round, in order.
    pub rounds: Vec<RoundOutcome>,
    /// Final footer.
    pub round_scores: Vec<u32>,
    /// Sum of round scores.
    pub total_score: u32,
    /// Plaza bonus on the final board.
    pub plaza_bonus: u32,
    /// Round scores plus plaza bonus.
    pub final_score: u32,
    /// Building placed in each bonus stage.
    pub bonus_by_round: BTreeMap<u32, Building>,
    /// Steps skipped because no cell could take them.
    pub skipped_steps: u32,
    /// Actions the engine rejected.
    pub rejected_actions: u32,
    /// Final board.
    pub board: Board,
    /// Board after each scored round.
    #[serde(skip)]
    pub round_boards: Vec<Board>,
}

/// Play a full game with the greedy policy.
///
/// # Errors
///
/// Returns an error if the configuration is invalid or the game stalls.
pub fn play_game(seed: u64, config: &GameConfig) -> GameResult<GameReport> {
    play_game_with(seed, config, &mut GreedyPolicy::new())
}

/// Play a full game with any policy.
///
/// # Errors
///
/// Returns an error if the configuration is invalid or the policy stops
/// making progress.
pub fn play_game_with<P: Policy>(
    seed: u64,
    config: &GameConfig,
    policy: &mut P,
) -> GameResult<GameReport> {
    let mut game = Game::new(config.clone())?;
    let mut dice = Dice::new(seed);
    let limit = config
        .max_rounds
        .saturating_add(1)
        .saturating_mul(ACTIONS_PER_ROUND);

    let mut rounds = Vec::new();
    let mut round_boards = Vec::new();
    let mut skipped_steps = 0;
    let mut rejected_actions = 0;
    let mut actions = 0;

    while !game.is_complete() {
        if actions >= limit {
            return Err(GameError::Stalled { seed, actions });
        }
        actions += 1;

        let outcome = if game.roll().is_none() {
            let roll = dice.roll();
            if !game.roll_dice(roll) {
                return Err(GameError::Stalled { seed, actions });
            }
            if PLAYER_CHOICE_SUMS.contains(&roll.sum()) {
                let row = policy.choose_target_row(&game);
                game.choose_target_row(row);
            }
            None
        } else {
            Some(match policy.decide(&game) {
                Decision::Place {
                    step,
                    coord,
                    building,
                } => {
                    if step != game.state() {
                        game.select_step(step);
                    }
                    if building.is_some() {
                        game.select_building(building);
                    }
                    game.place(coord)
                }
                Decision::Skip => {
                    let outcome = game.skip_step();
                    if outcome != PlacementOutcome::Rejected {
                        skipped_steps += 1;
                    }
                    outcome
                }
            })
        };

        match outcome {
            Some(PlacementOutcome::Rejected) => rejected_actions += 1,
            Some(PlacementOutcome::RoundComplete(round)) => {
                rounds.push(round);
                round_boards.push(game.board().clone());
            }
            _ => {}
        }

        for violation in check_invariants(&game) {
            warn!(seed, round = game.round(), %violation, "invariant violated");
        }
    }

    debug!(seed, actions, final_score = game.final_score(), "autoplay finished");

    Ok(GameReport {
        seed,
        rounds,
        round_scores: game.session().footer_scores().to_vec(),
        total_score: game.total_score(),
        plaza_bonus: game.plaza_bonus(),
        final_score: game.final_score(),
        bonus_by_round: game.session().bonus_by_round().clone(),
        skipped_steps,
        rejected_actions,
        board: game.board().clone(),
        round_boards,
    })
}

/// Play one greedy game per seed in parallel and aggregate the results.
///
/// Games that fail are counted in [`BatchSummary::games_failed`].
#[must_use]
pub fn run_batch<I>(seeds: I, config: &GameConfig) -> BatchSummary
where
    I: IntoParallelIterator<Item = u64>,
{
    run_batch_with(seeds, config, |_| {})
}

/// Like [`run_batch`], calling `on_game` after every game with the running
/// summary of the worker that played it.
#[must_use]
pub fn run_batch_with<I, F>(seeds: I, config: &GameConfig, on_game: F) -> BatchSummary
where
    I: IntoParallelIterator<Item = u64>,
    F: Fn(&BatchSummary) + Sync + Send,
{
    seeds
        .into_par_iter()
        .fold(BatchSummary::new, |mut summary, seed| {
            match play_game(seed, config) {
                Ok(report) => summary.add_report(&report),
                Err(err) => {
                    warn!(seed, %err, "game failed");
                    summary.add_failure();
                }
            }
            on_game(&summary);
            summary
        })
        .reduce(BatchSummary::new, |mut a, b| {
            a.merge(&b);
            a
        })
}

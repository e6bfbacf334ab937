//! Game layer for Street Dice.
//!
//! Implements the rules of the board game:
//! - Buildings, dice and the board grid
//! - Placement rules and the turn state machine
//! - Street scoring over connected building groups and the plaza bonus
//! - Session bookkeeping (rounds, scores, bonus stages)
//! - The [`Game`] facade that ties them together

mod board;
mod building;
mod config;
mod engine;
mod invariants;
mod placement;
mod scoring;
mod session;
mod turn;

pub use board::{Board, Cell, Coord};
pub use building::{Building, DIE_FACES, DiceRoll, building_for_die_face};
pub use config::{GameConfig, MAX_ROUNDS_LIMIT, MAX_STREET_SUM, MIN_STREET_SUM};
pub use engine::{Game, PlacementOutcome, RoundOutcome};
pub use invariants::{InvariantViolation, assert_invariants, check_invariants};
pub use placement::{
    AllowedColumns, PlacementContext, PlacementState, allowed_columns, building_to_place,
    can_place, placeable_cells,
};
pub use scoring::{
    Group, PLAYER_CHOICE_SUMS, find_groups, groups_on_row, plaza_bonus, qualifying_plazas,
    score_row, score_street, scoring_cells, target_row_for_dice_sum,
};
pub use session::GameSession;
pub use turn::{TurnProgress, state_after_placement, state_after_roll};

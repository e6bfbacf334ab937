// Allow unwrap in tests (test code is not production)
#![cfg_attr(test, allow(clippy::unwrap_used))]
//! Street Dice: rules engine for a dice-driven city-building board game.
//!
//! Two dice are rolled each round. Their faces pick the columns and the
//! buildings (house, forest, lake) placed on a 5x6 grid; doubles add a plaza.
//! Each round scores the street named by the dice sum by counting connected
//! groups of same-type buildings that touch it.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │     CLI / Autoplay (rayon)          │
//! ├─────────────────────────────────────┤
//! │     Game facade (engine)            │
//! ├─────────────────────────────────────┤
//! │  Placement · Turns · Scoring        │
//! ├─────────────────────────────────────┤
//! │  Board · Session · Config           │
//! └─────────────────────────────────────┘
//! ```
//!
//! The engine is synchronous and owns no randomness: rolls come in as
//! [`DiceRoll`] values, typically from [`dice::Dice`].

pub mod autoplay;
pub mod dice;
pub mod error;
pub mod game;

pub use error::{GameError, GameResult};

// Re-export key game types at crate root for convenience
pub use game::{
    Board, Building, Cell, Coord, DiceRoll, Game, GameConfig, PlacementOutcome, PlacementState,
    RoundOutcome,
};

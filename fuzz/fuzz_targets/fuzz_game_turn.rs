#![no_main]

//! Full game fuzzer.
//!
//! Drives arbitrary input sequences through a [`Game`]:
//! 1. Roll dice (including out-of-range faces, which must be refused)
//! 2. Select buildings, steps and target streets
//! 3. Place on any coordinate, in or out of bounds
//! 4. Skip steps and reset
//!
//! Invariants are checked after every action.

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use streetdice::game::check_invariants;
use streetdice::{Building, Coord, DiceRoll, Game, GameConfig, PlacementOutcome, PlacementState};

/// A fuzzer-generated player input.
#[derive(Arbitrary, Debug, Clone)]
enum FuzzAction {
    Roll { die0: u8, die1: u8 },
    Select { building: Option<u8> },
    ChooseRow { row: Option<u8> },
    SelectStep { second: bool },
    Place { row: u8, col: u8 },
    Skip,
    Reset,
}

/// Structured input for game fuzzing.
#[derive(Arbitrary, Debug)]
struct GameInput {
    /// Scored rounds (kept small).
    max_rounds: u8,
    /// Actions to apply.
    actions: Vec<FuzzAction>,
}

fn building(tag: u8) -> Building {
    match tag % 4 {
        0 => Building::House,
        1 => Building::Forest,
        2 => Building::Lake,
        _ => Building::Square,
    }
}

fuzz_target!(|input: GameInput| {
    let max_rounds = u32::from(input.max_rounds % 12).max(1);
    let config = GameConfig {
        max_rounds,
        bonus_stage_rounds: [3, 6, 9].into_iter().filter(|&r| r <= max_rounds).collect(),
        ..GameConfig::default()
    };
    let Ok(mut game) = Game::new(config) else {
        return;
    };

    for action in input.actions.into_iter().take(500) {
        match action.clone() {
            FuzzAction::Roll { die0, die1 } => {
                // Out-of-range faces must never reach the engine
                if let Ok(roll) = DiceRoll::new(die0, die1) {
                    game.roll_dice(roll);
                } else {
                    assert!(!(1..=6).contains(&die0) || !(1..=6).contains(&die1));
                }
            }
            FuzzAction::Select { building: tag } => game.select_building(tag.map(building)),
            FuzzAction::ChooseRow { row } => {
                game.choose_target_row(row.map(usize::from));
            }
            FuzzAction::SelectStep { second } => {
                let step = match (game.state().is_preparation(), second) {
                    (true, false) => PlacementState::PrepFirst,
                    (true, true) => PlacementState::PrepSecond,
                    (false, false) => PlacementState::First,
                    (false, true) => PlacementState::Second,
                };
                game.select_step(step);
            }
            FuzzAction::Place { row, col } => {
                let before = game.board().clone();
                let coord = Coord::new(usize::from(row), usize::from(col));
                if game.place(coord) == PlacementOutcome::Rejected {
                    assert_eq!(game.board(), &before, "rejected placement changed the board");
                }
            }
            FuzzAction::Skip => {
                game.skip_step();
            }
            FuzzAction::Reset => game.reset(),
        }

        let violations = check_invariants(&game);
        assert!(
            violations.is_empty(),
            "invariants violated after {action:?}: {violations:?}"
        );
    }

    assert_eq!(game.final_score(), game.total_score() + game.plaza_bonus());
});

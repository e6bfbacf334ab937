//! Decision policies for automated play.

// Neighbour counts are at most 4
#![allow(clippy::cast_possible_truncation)]

use crate::game::{
    Building, Coord, Game, PlacementContext, PlacementState, building_to_place, placeable_cells,
    score_row,
};
use std::collections::BTreeSet;

/// Weight of each same-type neighbour for a die building.
const NEIGHBOUR_WEIGHT: u32 = 3;
/// Weight of each distinct die-building type next to a plaza.
const PLAZA_VARIETY_WEIGHT: u32 = 4;
/// Cost of overwriting a cell already written this turn.
const AMENDMENT_PENALTY: u32 = 6;

/// What a policy wants to do with the current sub-placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Put a building down.
    Place {
        /// Sub-step to act on. May be the sibling of the current state.
        step: PlacementState,
        /// Target cell.
        coord: Coord,
        /// Building to select first (preparation and bonus states).
        building: Option<Building>,
    },
    /// Give up the current sub-placement.
    Skip,
}

/// Chooses moves for an automated player.
pub trait Policy {
    /// Street to score when the dice sum lets the player choose.
    fn choose_target_row(&mut self, game: &Game) -> Option<usize>;

    /// Next move for a rolled turn or a bonus stage.
    fn decide(&mut self, game: &Game) -> Decision;
}

/// One-ply greedy player.
///
/// Rates every legal cell for every building it could place and takes the
/// best. Ties go to the earlier sub-step, then the earlier building, then the
/// first cell in row-major order, so the policy is fully deterministic.
#[derive(Debug, Clone, Copy, Default)]
pub struct GreedyPolicy;

impl GreedyPolicy {
    /// Create a greedy policy.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Sub-steps the player could act on now, current one first.
    fn open_steps(game: &Game) -> Vec<PlacementState> {
        let state = game.state();
        let mut steps = vec![state];
        if let Some(sibling) = state.sibling()
            && !game.session().progress().is_marked(sibling)
        {
            steps.push(sibling);
        }
        steps
    }

    /// Buildings that could be placed in a sub-step.
    fn candidate_buildings(
        game: &Game,
        step: PlacementState,
        available: &BTreeSet<Building>,
    ) -> Vec<Building> {
        match step {
            PlacementState::Bonus => available.iter().copied().collect(),
            s if s.is_preparation() => Building::DIE_BUILDINGS.to_vec(),
            s => building_to_place(s, game.roll(), None).into_iter().collect(),
        }
    }

    /// Heuristic value of putting `building` at `coord`.
    fn rate(game: &Game, coord: Coord, building: Building) -> u32 {
        let board = game.board();
        let (adj, count) = coord.adjacent(board.rows(), board.cols());
        let neighbours = adj[..usize::from(count)]
            .iter()
            .filter_map(|&c| board.building_at(c));

        let value = if building == Building::Square {
            let kinds: BTreeSet<Building> = neighbours.filter(|b| b.is_die_building()).collect();
            kinds.len() as u32 * PLAZA_VARIETY_WEIGHT
        } else {
            let same = neighbours.filter(|&b| b == building).count() as u32;
            same * NEIGHBOUR_WEIGHT + game.config().point_value(coord)
        };

        if game.session().current_turn_placements().contains(&coord) {
            value.saturating_sub(AMENDMENT_PENALTY)
        } else {
            value
        }
    }
}

impl Policy for GreedyPolicy {
    fn choose_target_row(&mut self, game: &Game) -> Option<usize> {
        let board = game.board();
        let config = game.config();
        let mut best: Option<(usize, u32)> = None;
        for row in 0..board.rows() {
            let score = score_row(board, config, row);
            if best.is_none_or(|(_, top)| score > top) {
                best = Some((row, score));
            }
        }
        best.map(|(row, _)| row)
    }

    fn decide(&mut self, game: &Game) -> Decision {
        let available = game.available_bonus_buildings();
        let mut best: Option<(u32, Decision)> = None;

        for step in Self::open_steps(game) {
            for building in Self::candidate_buildings(game, step, &available) {
                let ctx = PlacementContext {
                    state: step,
                    roll: game.roll(),
                    board: game.board(),
                    selected: Some(building),
                    turn_placements: game.session().current_turn_placements(),
                    available_bonus: &available,
                };
                for coord in placeable_cells(&ctx) {
                    let value = Self::rate(game, coord, building);
                    if best.is_none_or(|(top, _)| value > top) {
                        let selected = step.requires_selection().then_some(building);
                        best = Some((
                            value,
                            Decision::Place {
                                step,
                                coord,
                                building: selected,
                            },
                        ));
                    }
                }
            }
        }

        best.map_or(Decision::Skip, |(_, decision)| decision)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{DiceRoll, GameConfig};

    fn new_game() -> Game {
        Game::new(GameConfig::default()).unwrap()
    }

    #[test]
    fn test_preparation_decision_selects_building() {
        let mut game = new_game();
        game.roll_dice(DiceRoll::new(2, 5).unwrap());
        let decision = GreedyPolicy::new().decide(&game);
        let Decision::Place { step, coord, building } = decision else {
            panic!("expected a placement");
        };
        assert!(step.is_preparation());
        assert!(building.is_some_and(Building::is_die_building));
        assert!(coord.col == 4 || coord.col == 1);
    }

    #[test]
    fn test_dice_decision_has_no_selection() {
        let mut game = new_game();
        game.roll_dice(DiceRoll::new(1, 2).unwrap());
        game.select_building(Some(Building::House));
        game.place(Coord::new(0, 1));
        game.place(Coord::new(0, 0));

        game.roll_dice(DiceRoll::new(4, 3).unwrap());
        let Decision::Place { step, coord, building } = GreedyPolicy::new().decide(&game) else {
            panic!("expected a placement");
        };
        assert_eq!(building, None);
        assert!(game.select_step(step) || step == game.state());
        assert!(game.can_place(coord));
    }

    #[test]
    fn test_prefers_growing_groups() {
        let mut game = new_game();
        // Preparation: two forests in column 1 and column 0
        game.roll_dice(DiceRoll::new(1, 2).unwrap());
        game.select_building(Some(Building::Forest));
        game.place(Coord::new(3, 1));
        game.place(Coord::new(3, 0));

        // Forest from die 0 (face 2) into column 1 (die 1 = 2): doubles
        game.roll_dice(DiceRoll::new(2, 2).unwrap());
        let Decision::Place { coord, .. } = GreedyPolicy::new().decide(&game) else {
            panic!("expected a placement");
        };
        // Next to the existing forest in column 1
        assert!(coord == Coord::new(2, 1) || coord == Coord::new(4, 1));
    }

    #[test]
    fn test_target_row_choice_picks_best_street() {
        let mut game = new_game();
        game.roll_dice(DiceRoll::new(1, 2).unwrap());
        game.select_building(Some(Building::House));
        game.place(Coord::new(0, 1));
        game.place(Coord::new(0, 0));
        // Row 0 holds the only buildings
        assert_eq!(GreedyPolicy::new().choose_target_row(&game), Some(0));
    }
}

//! Per-playthrough bookkeeping: rounds, scores, bonus stages and the
//! progress of the current turn.

use crate::game::{Building, Coord, GameConfig, PlacementState, TurnProgress};
use std::collections::{BTreeMap, BTreeSet};

/// Session state for one playthrough.
///
/// Round 0 is the preparation round; rounds `1..=max_rounds` are scored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSession {
    /// Current round index.
    round: u32,
    /// Score recorded for each round, indexed by `round - 1`.
    footer_scores: Vec<u32>,
    /// Cells written during the turn in progress.
    current_turn_placements: BTreeSet<Coord>,
    /// Which sub-placements of the turn are done.
    progress: TurnProgress,
    /// Bonus buildings already used. Only grows until reset.
    used_bonus_buildings: BTreeSet<Building>,
    /// Round number to the bonus building placed after it.
    bonus_by_round: BTreeMap<u32, Building>,
    /// A bonus stage is in progress.
    in_bonus_stage: bool,
    /// All rounds are done.
    completed: bool,
    /// Row nominated by the player for dice sums 2 and 12.
    target_row_choice: Option<usize>,
}

impl GameSession {
    /// Fresh session for a configuration.
    #[must_use]
    pub fn new(config: &GameConfig) -> Self {
        Self {
            round: 0,
            footer_scores: vec![0; config.max_rounds as usize],
            current_turn_placements: BTreeSet::new(),
            progress: TurnProgress::default(),
            used_bonus_buildings: BTreeSet::new(),
            bonus_by_round: BTreeMap::new(),
            in_bonus_stage: false,
            completed: false,
            target_row_choice: None,
        }
    }

    /// Discard everything and start over.
    pub fn reset_game(&mut self, config: &GameConfig) {
        *self = Self::new(config);
    }

    /// Current round index.
    #[must_use]
    pub const fn round(&self) -> u32 {
        self.round
    }

    /// Whether the preparation round is still running.
    #[must_use]
    pub const fn is_preparation(&self) -> bool {
        self.round == 0
    }

    /// Recorded per-round scores.
    #[must_use]
    pub fn footer_scores(&self) -> &[u32] {
        &self.footer_scores
    }

    /// Whether all rounds are done.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.completed
    }

    /// Whether a bonus stage is in progress.
    #[must_use]
    pub const fn in_bonus_stage(&self) -> bool {
        self.in_bonus_stage
    }

    /// Move to the next round, completing the game once past `max_rounds`.
    pub fn advance_round(&mut self, max_rounds: u32) {
        self.round += 1;
        if self.round > max_rounds {
            self.completed = true;
        }
    }

    /// Leave the preparation round for round 1.
    pub fn exit_preparation_phase(&mut self) {
        if self.round == 0 {
            self.round = 1;
        }
    }

    /// Record the score at a footer index.
    ///
    /// Returns `false` and changes nothing when the index is out of range.
    pub fn set_round_score(&mut self, index: usize, score: u32) -> bool {
        match self.footer_scores.get_mut(index) {
            Some(slot) => {
                *slot = score;
                true
            }
            None => false,
        }
    }

    /// Sum of recorded round scores. The plaza bonus is not included.
    #[must_use]
    pub fn total_score(&self) -> u32 {
        self.footer_scores.iter().fold(0, |total, &score| total.saturating_add(score))
    }

    /// Enter a bonus stage.
    pub fn start_bonus_stage(&mut self) {
        self.in_bonus_stage = true;
    }

    /// Finish the bonus stage for the current round with `building`.
    pub fn complete_bonus_stage(&mut self, building: Building) {
        self.used_bonus_buildings.insert(building);
        self.bonus_by_round.insert(self.round, building);
        self.in_bonus_stage = false;
    }

    /// Die buildings not yet used in a bonus stage.
    #[must_use]
    pub fn available_bonus_buildings(&self) -> BTreeSet<Building> {
        Building::DIE_BUILDINGS
            .into_iter()
            .filter(|b| !self.used_bonus_buildings.contains(b))
            .collect()
    }

    /// Bonus buildings already used.
    #[must_use]
    pub fn used_bonus_buildings(&self) -> &BTreeSet<Building> {
        &self.used_bonus_buildings
    }

    /// Which bonus building was placed after each round.
    #[must_use]
    pub fn bonus_by_round(&self) -> &BTreeMap<u32, Building> {
        &self.bonus_by_round
    }

    /// Cells written during the turn in progress.
    #[must_use]
    pub fn current_turn_placements(&self) -> &BTreeSet<Coord> {
        &self.current_turn_placements
    }

    /// Remember a cell written this turn.
    pub fn add_placement(&mut self, coord: Coord) {
        self.current_turn_placements.insert(coord);
    }

    /// Forget this turn's placements and sub-step progress.
    pub fn clear_placements(&mut self) {
        self.current_turn_placements.clear();
        self.progress = TurnProgress::default();
    }

    /// Progress through the current turn.
    #[must_use]
    pub const fn progress(&self) -> TurnProgress {
        self.progress
    }

    /// Mark the first-step sub-placement done.
    pub fn mark_first_placed(&mut self) {
        self.progress.first_placed = true;
    }

    /// Mark the second-step sub-placement done.
    pub fn mark_second_placed(&mut self) {
        self.progress.second_placed = true;
    }

    /// Mark the sub-placement belonging to `state` done.
    pub fn mark_placed(&mut self, state: PlacementState) {
        self.progress.mark(state);
    }

    /// Both sub-placements of the turn are done.
    #[must_use]
    pub const fn both_placed(&self) -> bool {
        self.progress.both_placed()
    }

    /// Row nominated for dice sums 2 and 12.
    #[must_use]
    pub const fn target_row_choice(&self) -> Option<usize> {
        self.target_row_choice
    }

    /// Nominate (or clear) the street for dice sums 2 and 12.
    pub fn set_target_row_choice(&mut self, row: Option<usize>) {
        self.target_row_choice = row;
    }
}

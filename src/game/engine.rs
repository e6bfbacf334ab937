//! The playable session: board, bookkeeping and turn state behind one API.
//!
//! Every mutating call either fully applies or is rejected with no change.
//! Round completion (score, record, bonus stage, advance) happens inside the
//! call that closes the round; the returned [`RoundOutcome`] carries
//! everything a presentation layer needs to reveal it at its own pace.

use crate::error::GameResult;
use crate::game::{
    AllowedColumns, Board, Building, Coord, DiceRoll, GameConfig, GameSession, PlacementContext,
    PlacementState, allowed_columns, building_to_place, can_place, placeable_cells, score_row,
    scoring_cells, state_after_placement, state_after_roll, target_row_for_dice_sum,
};
use serde::Serialize;
use std::collections::BTreeSet;
use tracing::{debug, info};

/// Result of scoring a finished round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoundOutcome {
    /// Round that was scored.
    pub round: u32,
    /// Dice sum of the round.
    pub dice_sum: u8,
    /// Street that was scored, if any.
    pub target_row: Option<usize>,
    /// Points recorded for the round.
    pub score: u32,
    /// Cells of the groups that scored.
    pub scoring_cells: BTreeSet<Coord>,
    /// Building placed in the bonus stage that preceded scoring.
    pub bonus_building: Option<Building>,
    /// The last round has been played.
    pub game_complete: bool,
}

/// What a placement or skip did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "outcome")]
pub enum PlacementOutcome {
    /// The action broke a rule. Nothing changed.
    Rejected,
    /// A building was placed and the turn continues.
    Placed {
        /// Where it went.
        coord: Coord,
        /// What was placed.
        building: Building,
        /// State for the next sub-placement.
        next: PlacementState,
    },
    /// A blocked sub-placement was skipped and the turn continues.
    Skipped {
        /// State for the next sub-placement.
        next: PlacementState,
    },
    /// The preparation round ended; round 1 awaits a roll.
    PreparationComplete,
    /// The round ended and a bonus stage must be played before scoring.
    BonusStageStarted {
        /// Round the bonus stage follows.
        round: u32,
    },
    /// The round was scored.
    RoundComplete(RoundOutcome),
}

/// A single-player game in progress.
#[derive(Debug, Clone)]
pub struct Game {
    config: GameConfig,
    board: Board,
    session: GameSession,
    state: PlacementState,
    roll: Option<DiceRoll>,
    selected: Option<Building>,
}

impl Game {
    /// Start a game.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration fails validation.
    pub fn new(config: GameConfig) -> GameResult<Self> {
        config.validate()?;
        Ok(Self {
            board: Board::for_config(&config),
            session: GameSession::new(&config),
            state: PlacementState::PrepFirst,
            roll: None,
            selected: None,
            config,
        })
    }

    /// Throw everything away and start over with the same configuration.
    pub fn reset(&mut self) {
        self.board.reset(&self.config);
        self.session.reset_game(&self.config);
        self.state = PlacementState::PrepFirst;
        self.roll = None;
        self.selected = None;
        debug!("game reset");
    }

    /// The configuration.
    #[must_use]
    pub const fn config(&self) -> &GameConfig {
        &self.config
    }

    /// The board.
    #[must_use]
    pub const fn board(&self) -> &Board {
        &self.board
    }

    /// Session bookkeeping.
    #[must_use]
    pub const fn session(&self) -> &GameSession {
        &self.session
    }

    /// Current turn state.
    #[must_use]
    pub const fn state(&self) -> PlacementState {
        self.state
    }

    /// Dice of the turn in progress.
    #[must_use]
    pub const fn roll(&self) -> Option<DiceRoll> {
        self.roll
    }

    /// Building picked for preparation or bonus placements.
    #[must_use]
    pub const fn selected_building(&self) -> Option<Building> {
        self.selected
    }

    /// Current round index (0 is preparation).
    #[must_use]
    pub const fn round(&self) -> u32 {
        self.session.round()
    }

    /// Whether all rounds are done.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.session.is_complete()
    }

    /// Sum of round scores.
    #[must_use]
    pub fn total_score(&self) -> u32 {
        self.session.total_score()
    }

    /// Plaza bonus on the current board.
    #[must_use]
    pub fn plaza_bonus(&self) -> u32 {
        crate::game::plaza_bonus(&self.board, &self.config)
    }

    /// Round scores plus plaza bonus.
    #[must_use]
    pub fn final_score(&self) -> u32 {
        self.total_score().saturating_add(self.plaza_bonus())
    }

    /// Bonus buildings still available.
    #[must_use]
    pub fn available_bonus_buildings(&self) -> BTreeSet<Building> {
        self.session.available_bonus_buildings()
    }

    /// Street the current roll scores, if one is selected.
    #[must_use]
    pub fn active_target_row(&self) -> Option<usize> {
        self.roll.and_then(|roll| {
            target_row_for_dice_sum(roll.sum(), &self.config, self.session.target_row_choice())
        })
    }

    /// Cells that would score for the current roll on the current board.
    #[must_use]
    pub fn active_scoring_cells(&self) -> BTreeSet<Coord> {
        self.roll.map_or_else(BTreeSet::new, |roll| {
            scoring_cells(
                roll.sum(),
                &self.board,
                &self.config,
                self.session.target_row_choice(),
            )
        })
    }

    fn context_with<'a>(
        &'a self,
        selected: Option<Building>,
        available: &'a BTreeSet<Building>,
    ) -> PlacementContext<'a> {
        PlacementContext {
            state: self.state,
            roll: self.roll,
            board: &self.board,
            selected,
            turn_placements: self.session.current_turn_placements(),
            available_bonus: available,
        }
    }

    /// Columns the current sub-placement may use.
    #[must_use]
    pub fn allowed_columns(&self) -> AllowedColumns {
        allowed_columns(self.state, self.roll, &self.board)
    }

    /// Building the current sub-placement would put down.
    #[must_use]
    pub fn building_to_place(&self) -> Option<Building> {
        building_to_place(self.state, self.roll, self.selected)
    }

    /// Whether a click on `coord` would be accepted.
    #[must_use]
    pub fn can_place(&self, coord: Coord) -> bool {
        let available = self.available_bonus_buildings();
        can_place(coord, &self.context_with(self.selected, &available))
    }

    /// Every cell a click would be accepted on.
    #[must_use]
    pub fn placeable_cells(&self) -> Vec<Coord> {
        let available = self.available_bonus_buildings();
        placeable_cells(&self.context_with(self.selected, &available))
    }

    /// Whether the current sub-placement cannot be made anywhere, whatever
    /// building the player picks.
    #[must_use]
    pub fn is_step_blocked(&self) -> bool {
        if self.roll.is_none()
            || matches!(self.state, PlacementState::Complete | PlacementState::Bonus)
        {
            return false;
        }
        let available = self.available_bonus_buildings();
        let probe = if self.state.requires_selection() {
            Some(Building::House)
        } else {
            None
        };
        placeable_cells(&self.context_with(probe, &available)).is_empty()
    }

    /// Roll the dice for a new turn.
    ///
    /// Accepted only between turns or before the first sub-placement of a
    /// turn, never during a bonus stage or after the game ends. A roll made
    /// before any sub-placement replaces the previous one; hosts that allow
    /// a single roll per turn must refuse the re-roll themselves.
    pub fn roll_dice(&mut self, roll: DiceRoll) -> bool {
        let turn_started =
            self.state != PlacementState::Complete && !self.session.progress().untouched();
        if self.session.is_complete() || self.session.in_bonus_stage() || turn_started {
            debug!(?roll, state = ?self.state, "roll ignored");
            return false;
        }

        self.session.clear_placements();
        self.session.set_target_row_choice(None);
        self.roll = Some(roll);
        self.state = state_after_roll(self.session.round(), false, roll);
        debug!(?roll, round = self.session.round(), state = ?self.state, "dice rolled");
        true
    }

    /// Pick the building for preparation and bonus placements.
    pub fn select_building(&mut self, building: Option<Building>) {
        self.selected = building;
    }

    /// Nominate the street for a roll of 2 or 12, or clear the nomination.
    ///
    /// Returns `false` for a row that does not exist.
    pub fn choose_target_row(&mut self, row: Option<usize>) -> bool {
        if row.is_some_and(|r| r >= self.config.rows) {
            return false;
        }
        self.session.set_target_row_choice(row);
        true
    }

    /// Switch to the other sub-placement of the turn, if it is still open.
    pub fn select_step(&mut self, step: PlacementState) -> bool {
        if self.roll.is_none()
            || self.state.sibling() != Some(step)
            || self.session.progress().is_marked(step)
        {
            return false;
        }
        self.state = step;
        true
    }

    /// Place at `coord` according to the current state.
    pub fn place(&mut self, coord: Coord) -> PlacementOutcome {
        if !self.can_place(coord) {
            debug!(?coord, state = ?self.state, "placement rejected");
            return PlacementOutcome::Rejected;
        }
        let Some(building) = self.building_to_place() else {
            return PlacementOutcome::Rejected;
        };

        self.board.place(coord, building);
        self.session.add_placement(coord);
        debug!(?coord, %building, state = ?self.state, "building placed");

        if self.state == PlacementState::Bonus {
            self.session.complete_bonus_stage(building);
            self.selected = None;
            info!(round = self.session.round(), %building, "bonus stage completed");
            return PlacementOutcome::RoundComplete(self.score_round(Some(building)));
        }

        self.session.mark_placed(self.state);
        let next = state_after_placement(self.state, self.session.progress());
        self.state = next;
        if next == PlacementState::Complete {
            return self.complete_turn();
        }
        PlacementOutcome::Placed {
            coord,
            building,
            next,
        }
    }

    /// Give up the current sub-placement because no cell can take it.
    pub fn skip_step(&mut self) -> PlacementOutcome {
        if !self.is_step_blocked() {
            return PlacementOutcome::Rejected;
        }
        debug!(state = ?self.state, "blocked step skipped");
        self.session.mark_placed(self.state);
        let next = state_after_placement(self.state, self.session.progress());
        self.state = next;
        if next == PlacementState::Complete {
            return self.complete_turn();
        }
        PlacementOutcome::Skipped { next }
    }

    /// Close the turn: leave preparation, start a bonus stage or score.
    fn complete_turn(&mut self) -> PlacementOutcome {
        if self.session.is_preparation() {
            self.session.exit_preparation_phase();
            self.roll = None;
            self.selected = None;
            info!("preparation round complete");
            return PlacementOutcome::PreparationComplete;
        }

        let round = self.session.round();
        if self.config.is_bonus_round(round) && self.bonus_stage_playable() {
            self.session.start_bonus_stage();
            self.state = PlacementState::Bonus;
            self.selected = None;
            info!(round, "bonus stage started");
            return PlacementOutcome::BonusStageStarted { round };
        }

        PlacementOutcome::RoundComplete(self.score_round(None))
    }

    /// A bonus stage can only run if a building is left and a cell is open.
    fn bonus_stage_playable(&self) -> bool {
        !self.session.available_bonus_buildings().is_empty()
            && (self.board.empty_count() > 0 || !self.session.current_turn_placements().is_empty())
    }

    /// Score the round, record it and advance.
    fn score_round(&mut self, bonus_building: Option<Building>) -> RoundOutcome {
        let round = self.session.round();
        let dice_sum = self.roll.map_or(0, DiceRoll::sum);
        let choice = self.session.target_row_choice();
        let target_row = target_row_for_dice_sum(dice_sum, &self.config, choice);
        let score = target_row.map_or(0, |row| score_row(&self.board, &self.config, row));
        let cells = scoring_cells(dice_sum, &self.board, &self.config, choice);

        self.session.set_round_score(round as usize - 1, score);
        self.session.advance_round(self.config.max_rounds);
        self.state = PlacementState::Complete;
        self.roll = None;

        let game_complete = self.session.is_complete();
        info!(round, dice_sum, ?target_row, score, game_complete, "round scored");
        if game_complete {
            info!(
                total = self.total_score(),
                plaza_bonus = self.plaza_bonus(),
                "game complete"
            );
        }

        RoundOutcome {
            round,
            dice_sum,
            target_row,
            score,
            scoring_cells: cells,
            bonus_building,
            game_complete,
        }
    }
}

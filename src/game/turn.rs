//! Turn state transitions.
//!
//! A turn has two sub-placements that may be made in either order. The
//! engine records which ones are done and asks these functions where to go
//! next.

use crate::game::{DiceRoll, PlacementState};

/// Which sub-placements of the current turn have been made.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TurnProgress {
    /// The first-step sub-placement is done.
    pub first_placed: bool,
    /// The second-step sub-placement is done.
    pub second_placed: bool,
}

impl TurnProgress {
    /// Record that the sub-placement for `state` is done.
    pub fn mark(&mut self, state: PlacementState) {
        if state.is_first_step() {
            self.first_placed = true;
        } else {
            self.second_placed = true;
        }
    }

    /// Whether the sub-placement for `state` is already done.
    #[must_use]
    pub const fn is_marked(self, state: PlacementState) -> bool {
        if state.is_first_step() {
            self.first_placed
        } else {
            self.second_placed
        }
    }

    /// Both sub-placements are done.
    #[must_use]
    pub const fn both_placed(self) -> bool {
        self.first_placed && self.second_placed
    }

    /// Neither sub-placement is done.
    #[must_use]
    pub const fn untouched(self) -> bool {
        !self.first_placed && !self.second_placed
    }
}

/// State entered when the dice are rolled.
///
/// Round 0 is the preparation round. A bonus stage ignores rolls.
#[must_use]
pub const fn state_after_roll(round: u32, in_bonus_stage: bool, roll: DiceRoll) -> PlacementState {
    if in_bonus_stage {
        return PlacementState::Bonus;
    }
    match (round == 0, roll.is_doubles()) {
        (true, true) => PlacementState::PrepDoublesFirst,
        (true, false) => PlacementState::PrepFirst,
        (false, true) => PlacementState::DoublesFirst,
        (false, false) => PlacementState::First,
    }
}

/// State after a successful sub-placement in `state`.
///
/// `progress` must already include the sub-placement just made. The turn
/// closes once the other sub-step is marked too, regardless of order.
#[must_use]
pub fn state_after_placement(state: PlacementState, progress: TurnProgress) -> PlacementState {
    match state {
        PlacementState::Bonus | PlacementState::Complete => PlacementState::Complete,
        _ if progress.both_placed() => PlacementState::Complete,
        _ => state.sibling().unwrap_or(PlacementState::Complete),
    }
}

//! Placement rules.
//!
//! Pure functions of the turn state, the dice, the board and the player's
//! selection. Nothing here mutates; the engine consults these checks before
//! every board write.

use crate::game::building::column_for_face;
use crate::game::{Board, Building, Coord, DiceRoll, building_for_die_face};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Where the turn is in its sequence of sub-placements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlacementState {
    /// Preparation round, first free-choice building.
    PrepFirst,
    /// Preparation round, second free-choice building.
    PrepSecond,
    /// Preparation round with doubles, first building.
    PrepDoublesFirst,
    /// Preparation round with doubles, second building.
    PrepDoublesSecond,
    /// Column from die 1, building from die 0.
    First,
    /// Column from die 0, building from die 1.
    Second,
    /// Doubles: column from die 1, building from die 0.
    DoublesFirst,
    /// Doubles: a plaza anywhere.
    DoublesSquare,
    /// Bonus stage: one available building anywhere.
    Bonus,
    /// Both sub-placements of the turn are done.
    Complete,
}

impl PlacementState {
    /// Whether this is a preparation-round state.
    #[must_use]
    pub const fn is_preparation(self) -> bool {
        matches!(
            self,
            Self::PrepFirst | Self::PrepSecond | Self::PrepDoublesFirst | Self::PrepDoublesSecond
        )
    }

    /// Whether the player must pick the building themselves.
    #[must_use]
    pub const fn requires_selection(self) -> bool {
        self.is_preparation() || matches!(self, Self::Bonus)
    }

    /// Whether this is the "first" sub-step of a two-step turn.
    #[must_use]
    pub const fn is_first_step(self) -> bool {
        matches!(
            self,
            Self::PrepFirst | Self::PrepDoublesFirst | Self::First | Self::DoublesFirst
        )
    }

    /// The other sub-step of the same turn kind, if there is one.
    #[must_use]
    pub const fn sibling(self) -> Option<Self> {
        match self {
            Self::PrepFirst => Some(Self::PrepSecond),
            Self::PrepSecond => Some(Self::PrepFirst),
            Self::PrepDoublesFirst => Some(Self::PrepDoublesSecond),
            Self::PrepDoublesSecond => Some(Self::PrepDoublesFirst),
            Self::First => Some(Self::Second),
            Self::Second => Some(Self::First),
            Self::DoublesFirst => Some(Self::DoublesSquare),
            Self::DoublesSquare => Some(Self::DoublesFirst),
            Self::Bonus | Self::Complete => None,
        }
    }
}

/// Columns a placement may use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllowedColumns {
    /// Every column.
    Any,
    /// Only these columns. Empty means nothing may be placed.
    Columns(Vec<usize>),
}

impl AllowedColumns {
    /// Whether a column is allowed.
    #[must_use]
    pub fn contains(&self, col: usize) -> bool {
        match self {
            Self::Any => true,
            Self::Columns(cols) => cols.contains(&col),
        }
    }

    /// Whether no column is allowed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Columns(cols) if cols.is_empty())
    }
}

/// Everything the placement checks read.
#[derive(Debug, Clone, Copy)]
pub struct PlacementContext<'a> {
    /// Current turn state.
    pub state: PlacementState,
    /// This turn's dice, if rolled.
    pub roll: Option<DiceRoll>,
    /// Current board.
    pub board: &'a Board,
    /// Building picked by the player (preparation and bonus states).
    pub selected: Option<Building>,
    /// Cells written earlier in this turn.
    pub turn_placements: &'a BTreeSet<Coord>,
    /// Bonus buildings not yet consumed.
    pub available_bonus: &'a BTreeSet<Building>,
}

/// Die face that addresses the column for a state.
const fn column_die(state: PlacementState, roll: DiceRoll) -> Option<u8> {
    match state {
        PlacementState::PrepFirst
        | PlacementState::PrepDoublesFirst
        | PlacementState::First
        | PlacementState::DoublesFirst => Some(roll.die1()),
        PlacementState::PrepSecond | PlacementState::PrepDoublesSecond | PlacementState::Second => {
            Some(roll.die0())
        }
        PlacementState::DoublesSquare | PlacementState::Bonus | PlacementState::Complete => None,
    }
}

/// Columns a placement may target in the current state.
///
/// The dice pick a target column. When it is full, the placement falls back
/// to whichever neighbouring column has more empty cells; equally empty
/// neighbours are both allowed and the player decides. A full edge column
/// whose only neighbour is also full allows nothing.
#[must_use]
pub fn allowed_columns(
    state: PlacementState,
    roll: Option<DiceRoll>,
    board: &Board,
) -> AllowedColumns {
    match state {
        PlacementState::DoublesSquare | PlacementState::Bonus => return AllowedColumns::Any,
        PlacementState::Complete => return AllowedColumns::Columns(Vec::new()),
        _ => {}
    }

    let Some(face) = roll.and_then(|roll| column_die(state, roll)) else {
        return AllowedColumns::Columns(Vec::new());
    };
    let target = column_for_face(face);

    if board.empty_in_column(target) > 0 {
        return AllowedColumns::Columns(vec![target]);
    }

    let left = target
        .checked_sub(1)
        .map(|col| (col, board.empty_in_column(col)))
        .filter(|&(_, empty)| empty > 0);
    let right = Some(target + 1)
        .filter(|&col| col < board.cols())
        .map(|col| (col, board.empty_in_column(col)))
        .filter(|&(_, empty)| empty > 0);

    let columns = match (left, right) {
        (None, None) => Vec::new(),
        (Some((col, _)), None) | (None, Some((col, _))) => vec![col],
        (Some((l, l_empty)), Some((r, r_empty))) => match l_empty.cmp(&r_empty) {
            std::cmp::Ordering::Greater => vec![l],
            std::cmp::Ordering::Less => vec![r],
            std::cmp::Ordering::Equal => vec![l, r],
        },
    };
    AllowedColumns::Columns(columns)
}

/// Building a placement in the current state would put down.
///
/// Preparation and bonus states use the player's selection (preparation only
/// accepts die buildings). Dice states take the building from the die that
/// did not pick the column. Doubles close with a plaza.
#[must_use]
pub fn building_to_place(
    state: PlacementState,
    roll: Option<DiceRoll>,
    selected: Option<Building>,
) -> Option<Building> {
    match state {
        PlacementState::PrepFirst
        | PlacementState::PrepSecond
        | PlacementState::PrepDoublesFirst
        | PlacementState::PrepDoublesSecond => selected.filter(|b| b.is_die_building()),
        PlacementState::Bonus => selected,
        PlacementState::First | PlacementState::DoublesFirst => {
            roll.and_then(|roll| building_for_die_face(roll.die0()).ok())
        }
        PlacementState::Second => roll.and_then(|roll| building_for_die_face(roll.die1()).ok()),
        PlacementState::DoublesSquare => Some(Building::Square),
        PlacementState::Complete => None,
    }
}

/// Whether the player may put a building at `coord` right now.
///
/// A cell is open if it is empty or was written earlier this turn (a
/// same-turn amendment).
#[must_use]
pub fn can_place(coord: Coord, ctx: &PlacementContext<'_>) -> bool {
    if !ctx.board.in_bounds(coord) {
        return false;
    }
    let cell_open = !ctx.board.is_occupied(coord) || ctx.turn_placements.contains(&coord);
    if !cell_open {
        return false;
    }

    if ctx.state == PlacementState::Bonus {
        return ctx
            .selected
            .is_some_and(|building| ctx.available_bonus.contains(&building));
    }

    ctx.roll.is_some()
        && ctx.state != PlacementState::Complete
        && building_to_place(ctx.state, ctx.roll, ctx.selected).is_some()
        && allowed_columns(ctx.state, ctx.roll, ctx.board).contains(coord.col)
}

/// Every cell where [`can_place`] currently holds, in row-major order.
#[must_use]
pub fn placeable_cells(ctx: &PlacementContext<'_>) -> Vec<Coord> {
    ctx.board
        .iter()
        .map(|(coord, _)| coord)
        .filter(|&coord| can_place(coord, ctx))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roll(d0: u8, d1: u8) -> Option<DiceRoll> {
        Some(DiceRoll::new(d0, d1).unwrap())
    }

    fn fill_column(board: &mut Board, col: usize, rows: usize) {
        for row in 0..rows {
            board.place(Coord::new(row, col), Building::House);
        }
    }

    fn ctx<'a>(
        state: PlacementState,
        roll: Option<DiceRoll>,
        board: &'a Board,
        selected: Option<Building>,
        turn: &'a BTreeSet<Coord>,
        bonus: &'a BTreeSet<Building>,
    ) -> PlacementContext<'a> {
        PlacementContext {
            state,
            roll,
            board,
            selected,
            turn_placements: turn,
            available_bonus: bonus,
        }
    }

    #[test]
    fn test_columns_follow_dice() {
        let board = Board::new(5, 6);
        assert_eq!(
            allowed_columns(PlacementState::First, roll(2, 5), &board),
            AllowedColumns::Columns(vec![4])
        );
        assert_eq!(
            allowed_columns(PlacementState::Second, roll(2, 5), &board),
            AllowedColumns::Columns(vec![1])
        );
        assert_eq!(
            allowed_columns(PlacementState::PrepFirst, roll(2, 5), &board),
            AllowedColumns::Columns(vec![4])
        );
        assert_eq!(
            allowed_columns(PlacementState::PrepDoublesSecond, roll(3, 3), &board),
            AllowedColumns::Columns(vec![2])
        );
    }

    #[test]
    fn test_any_column_states() {
        let board = Board::new(5, 6);
        assert_eq!(
            allowed_columns(PlacementState::DoublesSquare, roll(1, 1), &board),
            AllowedColumns::Any
        );
        assert_eq!(allowed_columns(PlacementState::Bonus, None, &board), AllowedColumns::Any);
        assert!(allowed_columns(PlacementState::Complete, roll(1, 2), &board).is_empty());
        assert!(allowed_columns(PlacementState::First, None, &board).is_empty());
    }

    #[test]
    fn test_full_column_equal_neighbours_allows_both() {
        let mut board = Board::new(5, 6);
        fill_column(&mut board, 2, 5);
        // die 1 = 3 targets column 2
        assert_eq!(
            allowed_columns(PlacementState::First, roll(1, 3), &board),
            AllowedColumns::Columns(vec![1, 3])
        );
    }

    #[test]
    fn test_full_column_prefers_emptier_neighbour() {
        let mut board = Board::new(5, 6);
        fill_column(&mut board, 2, 5);
        board.place(Coord::new(0, 1), Building::Lake);
        assert_eq!(
            allowed_columns(PlacementState::First, roll(1, 3), &board),
            AllowedColumns::Columns(vec![3])
        );
    }

    #[test]
    fn test_full_edge_column() {
        let mut board = Board::new(5, 6);
        fill_column(&mut board, 0, 5);
        assert_eq!(
            allowed_columns(PlacementState::First, roll(4, 1), &board),
            AllowedColumns::Columns(vec![1])
        );
        fill_column(&mut board, 1, 5);
        assert!(allowed_columns(PlacementState::First, roll(4, 1), &board).is_empty());
    }

    #[test]
    fn test_building_from_other_die() {
        // die 0 = 1 (house), die 1 = 2 (forest)
        assert_eq!(
            building_to_place(PlacementState::First, roll(1, 2), None),
            Some(Building::House)
        );
        assert_eq!(
            building_to_place(PlacementState::Second, roll(1, 2), None),
            Some(Building::Forest)
        );
        assert_eq!(
            building_to_place(PlacementState::DoublesFirst, roll(6, 6), None),
            Some(Building::Lake)
        );
        assert_eq!(
            building_to_place(PlacementState::DoublesSquare, roll(6, 6), None),
            Some(Building::Square)
        );
        assert_eq!(building_to_place(PlacementState::Complete, roll(6, 6), None), None);
    }

    #[test]
    fn test_building_from_selection() {
        assert_eq!(building_to_place(PlacementState::PrepFirst, roll(1, 2), None), None);
        assert_eq!(
            building_to_place(PlacementState::PrepFirst, roll(1, 2), Some(Building::Lake)),
            Some(Building::Lake)
        );
        assert_eq!(
            building_to_place(PlacementState::PrepSecond, roll(1, 2), Some(Building::Square)),
            None
        );
        assert_eq!(
            building_to_place(PlacementState::Bonus, None, Some(Building::Forest)),
            Some(Building::Forest)
        );
    }

    #[test]
    fn test_can_place_checks_column_and_cell() {
        let mut board = Board::new(5, 6);
        let turn = BTreeSet::new();
        let bonus = BTreeSet::new();
        let c = ctx(PlacementState::First, roll(1, 2), &board, None, &turn, &bonus);
        assert!(can_place(Coord::new(0, 1), &c));
        assert!(!can_place(Coord::new(0, 0), &c));
        assert!(!can_place(Coord::new(5, 1), &c));

        board.place(Coord::new(0, 1), Building::Lake);
        let c = ctx(PlacementState::First, roll(1, 2), &board, None, &turn, &bonus);
        assert!(!can_place(Coord::new(0, 1), &c));
        assert!(can_place(Coord::new(1, 1), &c));
    }

    #[test]
    fn test_can_place_same_turn_amendment() {
        let mut board = Board::new(5, 6);
        board.place(Coord::new(0, 1), Building::House);
        let turn: BTreeSet<_> = [Coord::new(0, 1)].into_iter().collect();
        let bonus = BTreeSet::new();
        let c = ctx(PlacementState::First, roll(1, 2), &board, None, &turn, &bonus);
        assert!(can_place(Coord::new(0, 1), &c));
    }

    #[test]
    fn test_can_place_requires_roll_and_state() {
        let board = Board::new(5, 6);
        let turn = BTreeSet::new();
        let bonus = BTreeSet::new();
        let c = ctx(PlacementState::First, None, &board, None, &turn, &bonus);
        assert!(!can_place(Coord::new(0, 0), &c));
        let c = ctx(PlacementState::Complete, roll(1, 1), &board, None, &turn, &bonus);
        assert!(!can_place(Coord::new(0, 0), &c));
    }

    #[test]
    fn test_can_place_prep_needs_selection() {
        let board = Board::new(5, 6);
        let turn = BTreeSet::new();
        let bonus = BTreeSet::new();
        let c = ctx(PlacementState::PrepFirst, roll(1, 2), &board, None, &turn, &bonus);
        assert!(!can_place(Coord::new(0, 1), &c));
        let c = ctx(
            PlacementState::PrepFirst,
            roll(1, 2),
            &board,
            Some(Building::House),
            &turn,
            &bonus,
        );
        assert!(can_place(Coord::new(0, 1), &c));
    }

    #[test]
    fn test_can_place_bonus() {
        let mut board = Board::new(5, 6);
        board.place(Coord::new(0, 0), Building::Lake);
        let turn = BTreeSet::new();
        let bonus: BTreeSet<_> = [Building::House, Building::Lake].into_iter().collect();

        let c = ctx(PlacementState::Bonus, None, &board, Some(Building::House), &turn, &bonus);
        assert!(can_place(Coord::new(4, 5), &c));
        assert!(!can_place(Coord::new(0, 0), &c));

        let c = ctx(PlacementState::Bonus, None, &board, Some(Building::Forest), &turn, &bonus);
        assert!(!can_place(Coord::new(4, 5), &c));

        let c = ctx(PlacementState::Bonus, None, &board, None, &turn, &bonus);
        assert!(!can_place(Coord::new(4, 5), &c));
    }

    #[test]
    fn test_placeable_cells() {
        let board = Board::new(5, 6);
        let turn = BTreeSet::new();
        let bonus = BTreeSet::new();
        let c = ctx(PlacementState::Second, roll(6, 1), &board, None, &turn, &bonus);
        let cells = placeable_cells(&c);
        assert_eq!(cells.len(), 5);
        assert!(cells.iter().all(|c| c.col == 5));
    }

    #[test]
    fn test_sibling_states() {
        assert_eq!(PlacementState::First.sibling(), Some(PlacementState::Second));
        assert_eq!(PlacementState::DoublesSquare.sibling(), Some(PlacementState::DoublesFirst));
        assert_eq!(PlacementState::Bonus.sibling(), None);
        assert!(PlacementState::PrepDoublesFirst.requires_selection());
        assert!(!PlacementState::Second.requires_selection());
    }
}

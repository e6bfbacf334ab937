//! Street scoring and the plaza bonus.
//!
//! A street scores every group of same-type buildings that touches it. A
//! group is a maximal 4-connected region of one building type; plazas and
//! empty cells separate groups. A group's score is the point value of all of
//! its cells, including those off the street.

use crate::game::{Board, Building, Coord, GameConfig};
use std::collections::{BTreeSet, VecDeque};

/// Dice sums that never map to a fixed street; the player nominates one.
pub const PLAYER_CHOICE_SUMS: [u8; 2] = [2, 12];

/// A maximal 4-connected region of one building type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    /// Building type shared by every cell.
    pub building: Building,
    /// Member cells in discovery order.
    pub cells: Vec<Coord>,
}

impl Group {
    /// Whether any member lies on `row`.
    #[must_use]
    pub fn touches_row(&self, row: usize) -> bool {
        self.cells.iter().any(|c| c.row == row)
    }

    /// Sum of point values over every member, saturating at `u32::MAX`.
    #[must_use]
    pub fn points(&self, config: &GameConfig) -> u32 {
        self.cells
            .iter()
            .map(|&c| config.point_value(c))
            .fold(0, u32::saturating_add)
    }
}

/// Street scored by a dice sum.
///
/// Sums 2 and 12 use the player's nominated row and score nothing without
/// one. Every other sum maps through the configured street table.
#[must_use]
pub fn target_row_for_dice_sum(
    sum: u8,
    config: &GameConfig,
    player_choice: Option<usize>,
) -> Option<usize> {
    if PLAYER_CHOICE_SUMS.contains(&sum) {
        return player_choice.filter(|&row| row < config.rows);
    }
    config
        .street_sums
        .iter()
        .position(|sums| sums.contains(&sum))
}

/// Discover every group on the board.
///
/// Each scoring cell is visited exactly once: a flat visited grid shared
/// across flood fills keeps groups disjoint.
#[must_use]
pub fn find_groups(board: &Board) -> Vec<Group> {
    let (rows, cols) = (board.rows(), board.cols());
    let mut visited = vec![false; rows * cols];
    let mut queue = VecDeque::new();
    let mut groups = Vec::new();

    for (start, cell) in board.iter() {
        let Some(building) = cell.building() else {
            continue;
        };
        let start_idx = start.row * cols + start.col;
        if building == Building::Square || visited[start_idx] {
            continue;
        }

        visited[start_idx] = true;
        queue.push_back(start);
        let mut cells = Vec::new();

        while let Some(coord) = queue.pop_front() {
            cells.push(coord);
            let (adjacent, count) = coord.adjacent(rows, cols);
            for &next in &adjacent[..usize::from(count)] {
                let idx = next.row * cols + next.col;
                if !visited[idx] && board.building_at(next) == Some(building) {
                    visited[idx] = true;
                    queue.push_back(next);
                }
            }
        }

        groups.push(Group { building, cells });
    }

    groups
}

/// Groups touching `row`.
#[must_use]
pub fn groups_on_row(board: &Board, row: usize) -> Vec<Group> {
    find_groups(board)
        .into_iter()
        .filter(|group| group.touches_row(row))
        .collect()
}

/// Score for scoring `row` as the street.
#[must_use]
pub fn score_row(board: &Board, config: &GameConfig, row: usize) -> u32 {
    groups_on_row(board, row)
        .iter()
        .map(|group| group.points(config))
        .fold(0, u32::saturating_add)
}

/// Score the street selected by a dice sum. 0 when no street is selected.
#[must_use]
pub fn score_street(
    sum: u8,
    board: &Board,
    config: &GameConfig,
    player_choice: Option<usize>,
) -> u32 {
    target_row_for_dice_sum(sum, config, player_choice)
        .map_or(0, |row| score_row(board, config, row))
}

/// Cells of every group that scores for the dice sum.
#[must_use]
pub fn scoring_cells(
    sum: u8,
    board: &Board,
    config: &GameConfig,
    player_choice: Option<usize>,
) -> BTreeSet<Coord> {
    target_row_for_dice_sum(sum, config, player_choice)
        .map(|row| {
            groups_on_row(board, row)
                .into_iter()
                .flat_map(|group| group.cells)
                .collect()
        })
        .unwrap_or_default()
}

/// Plazas whose orthogonal neighbours include a house, a forest and a lake.
#[must_use]
pub fn qualifying_plazas(board: &Board) -> Vec<Coord> {
    board
        .iter()
        .filter(|(_, cell)| cell.building() == Some(Building::Square))
        .map(|(coord, _)| coord)
        .filter(|coord| {
            let (adjacent, count) = coord.adjacent(board.rows(), board.cols());
            let neighbours: BTreeSet<Building> = adjacent[..usize::from(count)]
                .iter()
                .filter_map(|&c| board.building_at(c))
                .collect();
            Building::DIE_BUILDINGS
                .iter()
                .all(|b| neighbours.contains(b))
        })
        .collect()
}

/// Total plaza bonus over the whole board.
#[must_use]
pub fn plaza_bonus(board: &Board, config: &GameConfig) -> u32 {
    let plazas = u32::try_from(qualifying_plazas(board).len()).unwrap_or(u32::MAX);
    plazas.saturating_mul(config.plaza_bonus_points)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board() -> Board {
        Board::new(5, 6)
    }

    #[test]
    fn test_sum_to_row_table() {
        let config = GameConfig::default();
        let expected = [(3, 0), (4, 0), (5, 1), (6, 1), (7, 2), (8, 3), (9, 3), (10, 4), (11, 4)];
        for (sum, row) in expected {
            assert_eq!(target_row_for_dice_sum(sum, &config, None), Some(row), "sum {sum}");
        }
    }

    #[test]
    fn test_sum_two_and_twelve_need_choice() {
        let config = GameConfig::default();
        assert_eq!(target_row_for_dice_sum(2, &config, None), None);
        assert_eq!(target_row_for_dice_sum(12, &config, None), None);
        assert_eq!(target_row_for_dice_sum(2, &config, Some(3)), Some(3));
        assert_eq!(target_row_for_dice_sum(12, &config, Some(5)), None);
        // Choice is ignored for fixed sums
        assert_eq!(target_row_for_dice_sum(7, &config, Some(0)), Some(2));
    }

    #[test]
    fn test_connected_houses_on_street() {
        let config = GameConfig::default();
        let mut board = board();
        board.place(Coord::new(2, 0), Building::House);
        board.place(Coord::new(2, 1), Building::House);
        assert_eq!(score_street(7, &board, &config, None), 2);
    }

    #[test]
    fn test_group_scores_off_street_cells() {
        let config = GameConfig::default();
        let mut board = board();
        // Vertical forest through rows 1..=3 in column 4
        for row in 1..=3 {
            board.place(Coord::new(row, 4), Building::Forest);
        }
        // row 1 col 4 = 3, row 2 col 4 = 0, row 3 col 4 = 1
        assert_eq!(score_street(7, &board, &config, None), 4);
        assert_eq!(score_street(3, &board, &config, None), 0);
    }

    #[test]
    fn test_different_types_do_not_join() {
        let config = GameConfig::default();
        let mut board = board();
        board.place(Coord::new(2, 2), Building::House);
        board.place(Coord::new(1, 2), Building::Lake);
        let groups = find_groups(&board);
        assert_eq!(groups.len(), 2);
        // Only the house touches row 2: value 3
        assert_eq!(score_street(7, &board, &config, None), 3);
    }

    #[test]
    fn test_square_is_barrier() {
        let mut board = board();
        board.place(Coord::new(0, 0), Building::House);
        board.place(Coord::new(0, 1), Building::Square);
        board.place(Coord::new(0, 2), Building::House);
        let groups = find_groups(&board);
        assert_eq!(groups.len(), 2);
        assert!(groups.iter().all(|g| g.cells.len() == 1));
    }

    #[test]
    fn test_no_diagonal_connection() {
        let mut board = board();
        board.place(Coord::new(0, 0), Building::Lake);
        board.place(Coord::new(1, 1), Building::Lake);
        assert_eq!(find_groups(&board).len(), 2);
    }

    #[test]
    fn test_u_shape_single_group() {
        let mut board = board();
        for coord in [(0, 0), (1, 0), (2, 0), (2, 1), (2, 2), (1, 2), (0, 2)] {
            board.place(Coord::new(coord.0, coord.1), Building::Forest);
        }
        let groups = find_groups(&board);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].cells.len(), 7);
    }

    #[test]
    fn test_scoring_cells() {
        let config = GameConfig::default();
        let mut board = board();
        board.place(Coord::new(2, 0), Building::House);
        board.place(Coord::new(1, 0), Building::House);
        board.place(Coord::new(4, 4), Building::Lake);
        let cells = scoring_cells(7, &board, &config, None);
        let expected: BTreeSet<_> = [Coord::new(1, 0), Coord::new(2, 0)].into_iter().collect();
        assert_eq!(cells, expected);
        assert!(scoring_cells(2, &board, &config, None).is_empty());
    }

    #[test]
    fn test_plaza_bonus_example() {
        let config = GameConfig::default();
        let mut board = board();
        board.place(Coord::new(2, 2), Building::Square);
        board.place(Coord::new(1, 2), Building::House);
        board.place(Coord::new(2, 1), Building::Forest);
        board.place(Coord::new(3, 2), Building::Lake);
        board.place(Coord::new(2, 3), Building::Lake);
        assert_eq!(plaza_bonus(&board, &config), 10);
    }

    #[test]
    fn test_plaza_duplicate_neighbour_disqualifies() {
        let config = GameConfig::default();
        let mut board = board();
        board.place(Coord::new(2, 2), Building::Square);
        board.place(Coord::new(1, 2), Building::House);
        board.place(Coord::new(2, 1), Building::House);
        board.place(Coord::new(3, 2), Building::Lake);
        board.place(Coord::new(2, 3), Building::Lake);
        assert_eq!(plaza_bonus(&board, &config), 0);
    }

    #[test]
    fn test_corner_plaza_never_qualifies() {
        let config = GameConfig::default();
        let mut board = board();
        board.place(Coord::new(0, 0), Building::Square);
        board.place(Coord::new(0, 1), Building::House);
        board.place(Coord::new(1, 0), Building::Forest);
        assert_eq!(plaza_bonus(&board, &config), 0);
    }

    #[test]
    fn test_two_plazas_score_twice() {
        let config = GameConfig::default();
        let mut board = board();
        for plaza_col in [1, 4] {
            board.place(Coord::new(2, plaza_col), Building::Square);
            board.place(Coord::new(1, plaza_col), Building::House);
            board.place(Coord::new(3, plaza_col), Building::Lake);
            board.place(Coord::new(2, plaza_col - 1), Building::Forest);
        }
        assert_eq!(qualifying_plazas(&board).len(), 2);
        assert_eq!(plaza_bonus(&board, &config), 20);
    }

    #[test]
    fn test_huge_point_values_saturate() {
        let mut config = GameConfig::default();
        config.point_matrix[0][0] = u32::MAX;
        config.point_matrix[0][1] = u32::MAX;
        config.point_matrix[1][0] = 7;
        let mut board = board();
        board.place(Coord::new(0, 0), Building::House);
        board.place(Coord::new(0, 1), Building::House);
        board.place(Coord::new(1, 0), Building::Lake);
        assert_eq!(score_street(3, &board, &config, None), u32::MAX);
        assert_eq!(score_row(&board, &config, 1), 7);
    }
}

//! Building taxonomy and dice.

use crate::error::{GameError, GameResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of faces on a die. The board has one column per face.
pub const DIE_FACES: u8 = 6;

/// A building occupying a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Building {
    /// Residential block.
    House,
    /// Lake.
    Lake,
    /// Forest.
    Forest,
    /// Plaza. Never produced by a die face; only by doubles.
    Square,
}

impl Building {
    /// The buildings a die face can produce, which are also the bonus-stage
    /// candidates.
    pub const DIE_BUILDINGS: [Building; 3] = [Building::House, Building::Forest, Building::Lake];

    /// Whether this building can come from a die face.
    #[must_use]
    pub const fn is_die_building(self) -> bool {
        !matches!(self, Building::Square)
    }
}

impl fmt::Display for Building {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Building::House => "house",
            Building::Lake => "lake",
            Building::Forest => "forest",
            Building::Square => "square",
        };
        f.write_str(name)
    }
}

/// Map a die face to the building it produces.
///
/// Faces 1 and 4 give a house, 2 and 5 a forest, 3 and 6 a lake.
///
/// # Errors
///
/// Returns [`GameError::InvalidDieFace`] for faces outside `1..=6`.
pub fn building_for_die_face(face: u8) -> GameResult<Building> {
    match face {
        1 | 4 => Ok(Building::House),
        2 | 5 => Ok(Building::Forest),
        3 | 6 => Ok(Building::Lake),
        _ => Err(GameError::InvalidDieFace(face)),
    }
}

/// One roll of the two dice.
///
/// Die 0 and die 1 are ordered: placement rules read a column from one die
/// and a building from the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct DiceRoll {
    dice: [u8; 2],
}

impl DiceRoll {
    /// Create a roll from two die faces.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::InvalidDieFace`] if either face is outside `1..=6`.
    pub fn new(die0: u8, die1: u8) -> GameResult<Self> {
        for face in [die0, die1] {
            if !(1..=DIE_FACES).contains(&face) {
                return Err(GameError::InvalidDieFace(face));
            }
        }
        Ok(Self { dice: [die0, die1] })
    }

    /// Build a roll from faces already known to be in range.
    pub(crate) fn from_faces(die0: u8, die1: u8) -> Self {
        debug_assert!((1..=DIE_FACES).contains(&die0) && (1..=DIE_FACES).contains(&die1));
        Self { dice: [die0, die1] }
    }

    /// Face of die 0.
    #[must_use]
    pub const fn die0(self) -> u8 {
        self.dice[0]
    }

    /// Face of die 1.
    #[must_use]
    pub const fn die1(self) -> u8 {
        self.dice[1]
    }

    /// Sum of both dice (2..=12).
    #[must_use]
    pub const fn sum(self) -> u8 {
        self.dice[0] + self.dice[1]
    }

    /// Both dice show the same face.
    #[must_use]
    pub const fn is_doubles(self) -> bool {
        self.dice[0] == self.dice[1]
    }
}

/// Column addressed by a die face (face 1 is column 0).
#[must_use]
pub(crate) const fn column_for_face(face: u8) -> usize {
    face.saturating_sub(1) as usize
}

//! Deterministic dice.
//!
//! The rules engine takes rolls as input. This is the source the CLI and the
//! simulator use: the same seed always produces the same sequence of rolls.

// Face arithmetic works on values already reduced below 6
#![allow(clippy::cast_possible_truncation)]

use crate::game::{DIE_FACES, DiceRoll};

/// Seeded pair of dice using xorshift64.
#[derive(Debug, Clone, Copy)]
pub struct Dice {
    state: u64,
}

impl Dice {
    /// Create dice from a seed.
    #[must_use]
    pub const fn new(seed: u64) -> Self {
        // Ensure non-zero state
        let state = if seed == 0 { 0x5555_5555_5555_5555 } else { seed };
        Self { state }
    }

    /// Generate next random u64.
    fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    /// Throw a single die.
    pub fn next_face(&mut self) -> u8 {
        (self.next_u64() % u64::from(DIE_FACES)) as u8 + 1
    }

    /// Throw both dice.
    pub fn roll(&mut self) -> DiceRoll {
        let die0 = self.next_face();
        let die1 = self.next_face();
        DiceRoll::from_faces(die0, die1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_faces_in_range() {
        let mut dice = Dice::new(7);
        for _ in 0..1000 {
            let face = dice.next_face();
            assert!((1..=6).contains(&face));
        }
    }

    #[test]
    fn test_deterministic() {
        let mut a = Dice::new(42);
        let mut b = Dice::new(42);
        for _ in 0..100 {
            assert_eq!(a.roll(), b.roll());
        }
    }

    #[test]
    fn test_zero_seed() {
        let mut dice = Dice::new(0);
        let roll = dice.roll();
        assert!((2..=12).contains(&roll.sum()));
    }

    #[test]
    fn test_every_face_appears() {
        let mut dice = Dice::new(1234);
        let mut seen = [false; 6];
        for _ in 0..600 {
            seen[usize::from(dice.next_face() - 1)] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }
}

//! Position evaluation

use serde::{Deserialize, Serialize};

use crate::board::{Cell, BOARD_SIZE};
use crate::snapshot::Snapshot;

/// Value of a single pebble
pub const PEBBLE_VALUE: i32 = 10;

/// Heuristic switches for position evaluation
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heuristics {
    /// Halve the worth of pebbles parked on corners
    #[serde(default)]
    pub corner_penalty: bool,
}

impl Heuristics {
    pub fn with_corner_penalty(mut self, enabled: bool) -> Self {
        self.corner_penalty = enabled;
        self
    }
}

/// Index folded towards the nearest edge: 0, 1, 2, 2, 1, 0
fn reflect(index: i8) -> i8 {
    if index < BOARD_SIZE / 2 {
        index
    } else {
        BOARD_SIZE - 1 - index
    }
}

/// Bonus for sitting on a long diagonal, larger nearer the center
fn diagonal_bonus(cell: Cell) -> i32 {
    let (r, c) = (reflect(cell.row), reflect(cell.col));
    if r == c {
        r as i32
    } else {
        0
    }
}

/// Score a position; positive favors Red, negative favors Black
pub fn evaluate(snapshot: &Snapshot, heuristics: &Heuristics) -> i32 {
    let mut score = 0;

    for (cell, pebble) in snapshot.pebbles() {
        let mut value = PEBBLE_VALUE + diagonal_bonus(cell);
        if heuristics.corner_penalty && cell.is_corner() {
            value -= PEBBLE_VALUE / 2;
        }
        score += pebble.owner.sign() * value;
    }

    score
}

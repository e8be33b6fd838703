//! Immutable board snapshots used by search and history

use crate::board::{Board, Cell, Cells, Pebble, PebbleLookup, Player};

/// Immutable board configuration (copy to derive)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Snapshot {
    cells: Cells,
}

impl Snapshot {
    /// Capture the live board
    pub fn of(board: &Board) -> Self {
        Self { cells: *board.cells() }
    }

    pub fn from_pebbles(pebbles: &[(Cell, Player)]) -> Self {
        Self::of(&Board::from_pebbles(pebbles))
    }

    /// New snapshot with the pebble on `from` moved to `to`; whatever was on
    /// `to` is removed. `self` is left untouched.
    pub fn apply(&self, from: Cell, to: Cell) -> Snapshot {
        let mut next = *self;
        if from == to || !from.is_valid() || !to.is_valid() {
            return next;
        }
        let (fr, fc) = from.index();
        let (tr, tc) = to.index();
        next.cells[tr][tc] = next.cells[fr][fc].take();
        next
    }

    /// Iterate occupied cells in row-major order
    pub fn pebbles(&self) -> impl Iterator<Item = (Cell, Pebble)> + '_ {
        Cell::all().filter_map(move |cell| self.pebble_at(cell).map(|p| (cell, p)))
    }

    pub fn count(&self, player: Player) -> usize {
        self.pebbles().filter(|(_, p)| p.owner == player).count()
    }

    /// Cells whose content differs between two snapshots
    pub fn diff(&self, other: &Snapshot) -> Vec<Cell> {
        Cell::all()
            .filter(|&cell| self.pebble_at(cell) != other.pebble_at(cell))
            .collect()
    }

    /// Same position with every pebble's owner swapped
    pub fn mirrored_owners(&self) -> Snapshot {
        let mut next = *self;
        for pebble in next.cells.iter_mut().flatten().flatten() {
            pebble.owner = pebble.owner.opponent();
        }
        next
    }
}

impl PebbleLookup for Snapshot {
    fn pebble_at(&self, cell: Cell) -> Option<Pebble> {
        if !cell.is_valid() {
            return None;
        }
        let (r, c) = cell.index();
        self.cells[r][c]
    }
}

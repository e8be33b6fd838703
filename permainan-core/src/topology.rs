//! Loop topology: the arcs pairing edge cells around each corner
//!
//! Every non-corner edge cell belongs to exactly one arc. Inner arcs join the
//! two cells at distance 1 from a corner, outer arcs the two at distance 2.
//! Chained together with the rows and columns they feed, the arcs form two
//! closed tracks around the board that long moves follow.

use crate::board::{Cell, Direction, BOARD_SIZE};

/// Which of the two concentric tracks an arc belongs to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ArcKind {
    Inner,
    Outer,
}

impl ArcKind {
    /// Distance of the arc's endpoints from their corner
    pub fn loop_distance(self) -> u8 {
        match self {
            ArcKind::Inner => 1,
            ArcKind::Outer => 2,
        }
    }
}

/// Unordered pair of edge cells joined by an arc
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Arc {
    pub kind: ArcKind,
    pub ends: (Cell, Cell),
}

impl Arc {
    const fn new(kind: ArcKind, a: (i8, i8), b: (i8, i8)) -> Self {
        Self {
            kind,
            ends: (Cell::new(a.0, a.1), Cell::new(b.0, b.1)),
        }
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.ends.0 == cell || self.ends.1 == cell
    }

    /// The end opposite `cell`; `cell` must be one of the ends
    pub fn other(&self, cell: Cell) -> Cell {
        if self.ends.0 == cell {
            self.ends.1
        } else {
            self.ends.0
        }
    }
}

/// Inner arcs, clockwise from the upper-left corner
pub const INNER_ARCS: [Arc; 4] = [
    Arc::new(ArcKind::Inner, (1, 0), (0, 1)),
    Arc::new(ArcKind::Inner, (0, 4), (1, 5)),
    Arc::new(ArcKind::Inner, (4, 5), (5, 4)),
    Arc::new(ArcKind::Inner, (5, 1), (4, 0)),
];

/// Outer arcs, clockwise from the upper-left corner
pub const OUTER_ARCS: [Arc; 4] = [
    Arc::new(ArcKind::Outer, (2, 0), (0, 2)),
    Arc::new(ArcKind::Outer, (0, 3), (2, 5)),
    Arc::new(ArcKind::Outer, (3, 5), (5, 3)),
    Arc::new(ArcKind::Outer, (5, 2), (3, 0)),
];

/// Number of steps needed to walk one full track
pub const TRACK_LENGTH: usize = 4 * BOARD_SIZE as usize;

/// Arc the cell is an endpoint of, if any
pub fn arc_of(cell: Cell) -> Option<&'static Arc> {
    INNER_ARCS
        .iter()
        .chain(OUTER_ARCS.iter())
        .find(|arc| arc.contains(cell))
}

fn expect_arc(cell: Cell) -> &'static Arc {
    match arc_of(cell) {
        Some(arc) => arc,
        None => panic!("cell {cell} is not an arc endpoint"),
    }
}

/// Distance (1 or 2) of a looping cell from its nearest corner
///
/// # Panics
/// If `cell` is a corner or not on the edge.
pub fn loop_distance(cell: Cell) -> u8 {
    expect_arc(cell).kind.loop_distance()
}

/// The cell on the other end of `cell`'s arc
///
/// # Panics
/// If `cell` is a corner or not on the edge.
pub fn partner(cell: Cell) -> Cell {
    expect_arc(cell).other(cell)
}

/// Direction a long move takes after arriving on `cell` through an arc.
/// Always points back into the board.
///
/// # Panics
/// If `cell` is a corner or not on the edge.
pub fn entry_direction(cell: Cell) -> Direction {
    assert!(
        cell.is_edge_non_corner(),
        "cell {cell} is not an arc endpoint"
    );
    if cell.row == 0 {
        Direction::Down
    } else if cell.col == 0 {
        Direction::Right
    } else if cell.row == BOARD_SIZE - 1 {
        Direction::Up
    } else {
        Direction::Left
    }
}

/// One traversal step along a track
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Hop {
    pub to: Cell,
    pub direction: Direction,
    /// The step crossed an arc instead of moving to a neighbor
    pub via_arc: bool,
}

/// Advance one cell from `cell` heading `direction`; leaving the board
/// teleports through the arc and turns back inwards.
///
/// # Panics
/// If leaving the board from a cell that has no arc (a corner).
pub fn advance(cell: Cell, direction: Direction) -> Hop {
    let next = cell.neighbor(direction);
    if next.is_valid() {
        return Hop { to: next, direction, via_arc: false };
    }

    let to = partner(cell);
    Hop {
        to,
        direction: entry_direction(to),
        via_arc: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_each_edge_cell_in_one_arc() {
        for cell in Cell::all() {
            let owners = INNER_ARCS
                .iter()
                .chain(OUTER_ARCS.iter())
                .filter(|arc| arc.contains(cell))
                .count();
            let expected = if cell.is_edge_non_corner() { 1 } else { 0 };
            assert_eq!(owners, expected, "cell {cell}");
        }
    }

    #[test]
    fn test_partner_is_symmetric() {
        for cell in Cell::all().filter(Cell::is_edge_non_corner) {
            let other = partner(cell);
            assert_ne!(other, cell);
            assert_eq!(partner(other), cell);
            assert_eq!(loop_distance(other), loop_distance(cell));
        }
    }

    #[test]
    fn test_loop_distance() {
        assert_eq!(loop_distance(Cell::new(1, 0)), 1);
        assert_eq!(loop_distance(Cell::new(0, 4)), 1);
        assert_eq!(loop_distance(Cell::new(0, 2)), 2);
        assert_eq!(loop_distance(Cell::new(3, 5)), 2);
    }

    #[test]
    #[should_panic]
    fn test_corner_has_no_partner() {
        partner(Cell::new(0, 0));
    }

    #[test]
    #[should_panic]
    fn test_interior_has_no_partner() {
        loop_distance(Cell::new(2, 3));
    }

    #[test]
    fn test_entry_direction_points_inwards() {
        for cell in Cell::all().filter(Cell::is_edge_non_corner) {
            let dir = entry_direction(cell);
            assert!(cell.neighbor(dir).is_valid(), "cell {cell} heading {dir}");
        }
    }

    #[test]
    fn test_advance_through_arc() {
        let hop = advance(Cell::new(0, 2), Direction::Up);
        assert_eq!(hop.to, Cell::new(2, 0));
        assert_eq!(hop.direction, Direction::Right);
        assert!(hop.via_arc);

        let hop = advance(Cell::new(1, 3), Direction::Up);
        assert_eq!(hop.to, Cell::new(0, 3));
        assert!(!hop.via_arc);
    }

    #[test]
    fn test_track_closes() {
        // Walking any inward state returns to itself after one track length
        for cell in Cell::all().filter(Cell::is_edge_non_corner) {
            let start = entry_direction(cell);
            let (mut at, mut dir) = (cell, start);
            for _ in 0..TRACK_LENGTH {
                let hop = advance(at, dir);
                at = hop.to;
                dir = hop.direction;
            }
            assert_eq!((at, dir), (cell, start), "track from {cell}");
        }
    }
}

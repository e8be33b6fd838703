//! Square board geometry, players and the live mutable board

use std::fmt;

use serde::{Deserialize, Serialize};

/// Board side length (the board is square)
pub const BOARD_SIZE: i8 = 6;

/// Index of the last row/column
const LAST: i8 = BOARD_SIZE - 1;

/// Pebbles each player starts with
pub const PEBBLES_PER_PLAYER: usize = 12;

/// Board coordinates (row grows downwards, col grows rightwards)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub row: i8,
    pub col: i8,
}

impl Cell {
    pub const fn new(row: i8, col: i8) -> Self {
        Self { row, col }
    }

    /// Check if this cell is on the board
    pub fn is_valid(&self) -> bool {
        (0..BOARD_SIZE).contains(&self.row) && (0..BOARD_SIZE).contains(&self.col)
    }

    pub fn is_corner(&self) -> bool {
        (self.row == 0 || self.row == LAST) && (self.col == 0 || self.col == LAST)
    }

    /// On the outermost ring, corners included
    pub fn is_edge(&self) -> bool {
        self.is_valid()
            && (self.row == 0 || self.row == LAST || self.col == 0 || self.col == LAST)
    }

    /// On the outermost ring but not a corner
    pub fn is_edge_non_corner(&self) -> bool {
        self.is_edge() && !self.is_corner()
    }

    /// Lies on column 0 or 5
    pub fn on_vertical_edge(&self) -> bool {
        self.col == 0 || self.col == LAST
    }

    /// Lies on row 0 or 5
    pub fn on_horizontal_edge(&self) -> bool {
        self.row == 0 || self.row == LAST
    }

    /// Neighbor one step in `direction` (may be off the board)
    pub fn neighbor(&self, direction: Direction) -> Cell {
        let (dr, dc) = direction.delta();
        Cell::new(self.row + dr, self.col + dc)
    }

    /// Chebyshev adjacency: one king step away, not the same cell
    pub fn is_adjacent(&self, other: Cell) -> bool {
        *self != other && (self.row - other.row).abs() <= 1 && (self.col - other.col).abs() <= 1
    }

    /// In-bounds Moore neighborhood (up to 8 cells)
    pub fn surrounding(self) -> impl Iterator<Item = Cell> {
        (-1..=1i8)
            .flat_map(move |dr| (-1..=1i8).map(move |dc| Cell::new(self.row + dr, self.col + dc)))
            .filter(move |c| c.is_valid() && *c != self)
    }

    /// Iterate every cell in row-major order
    pub fn all() -> impl Iterator<Item = Cell> {
        (0..BOARD_SIZE).flat_map(|row| (0..BOARD_SIZE).map(move |col| Cell::new(row, col)))
    }

    pub(crate) fn index(&self) -> (usize, usize) {
        (self.row as usize, self.col as usize)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Orthogonal travel direction for long moves
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Direction::Up, Direction::Down, Direction::Left, Direction::Right];

    /// (row delta, col delta)
    pub fn delta(self) -> (i8, i8) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }

    pub fn reverse(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    pub fn is_vertical(self) -> bool {
        matches!(self, Direction::Up | Direction::Down)
    }

    /// Single-letter wire form
    pub fn letter(self) -> char {
        match self {
            Direction::Up => 'U',
            Direction::Down => 'D',
            Direction::Left => 'L',
            Direction::Right => 'R',
        }
    }

    pub fn from_letter(letter: char) -> Option<Direction> {
        match letter {
            'U' => Some(Direction::Up),
            'D' => Some(Direction::Down),
            'L' => Some(Direction::Left),
            'R' => Some(Direction::Right),
            _ => None,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        };
        f.write_str(name)
    }
}

/// Player (Red moves first and is the maximizing side)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    Red = 0,
    Black = 1,
}

impl Player {
    pub fn opponent(self) -> Self {
        match self {
            Player::Red => Player::Black,
            Player::Black => Player::Red,
        }
    }

    pub fn id(self) -> usize {
        self as usize
    }

    /// +1 for Red, -1 for Black
    pub fn sign(self) -> i32 {
        match self {
            Player::Red => 1,
            Player::Black => -1,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Player::Red => f.write_str("red"),
            Player::Black => f.write_str("black"),
        }
    }
}

/// A pebble on the board
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pebble {
    pub owner: Player,
}

impl Pebble {
    pub const fn new(owner: Player) -> Self {
        Self { owner }
    }
}

pub(crate) type Cells = [[Option<Pebble>; BOARD_SIZE as usize]; BOARD_SIZE as usize];

/// Read access to a board configuration
pub trait PebbleLookup {
    /// Pebble at `cell`; off-board cells are empty
    fn pebble_at(&self, cell: Cell) -> Option<Pebble>;

    fn is_empty(&self, cell: Cell) -> bool {
        self.pebble_at(cell).is_none()
    }

    fn owner_at(&self, cell: Cell) -> Option<Player> {
        self.pebble_at(cell).map(|p| p.owner)
    }
}

/// The live, mutable board owned by the game orchestrator
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Board {
    cells: Cells,
}

impl Board {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Starting layout: Red fills rows 0-1, Black fills rows 4-5
    pub fn initial() -> Self {
        let mut board = Self::empty();
        for cell in Cell::all() {
            let owner = match cell.row {
                0 | 1 => Player::Red,
                4 | 5 => Player::Black,
                _ => continue,
            };
            board.set(cell, Some(Pebble::new(owner)));
        }
        board
    }

    /// Build a board from explicit placements
    pub fn from_pebbles(pebbles: &[(Cell, Player)]) -> Self {
        let mut board = Self::empty();
        for &(cell, owner) in pebbles {
            board.set(cell, Some(Pebble::new(owner)));
        }
        board
    }

    /// Replace the content of `cell`, returning what was there
    ///
    /// # Panics
    /// If `cell` is off the board.
    pub fn set(&mut self, cell: Cell, pebble: Option<Pebble>) -> Option<Pebble> {
        assert!(cell.is_valid(), "cell {cell} is off the board");
        let (r, c) = cell.index();
        std::mem::replace(&mut self.cells[r][c], pebble)
    }

    /// Move whatever is at `from` onto `to`, returning the displaced pebble
    pub fn relocate(&mut self, from: Cell, to: Cell) -> Option<Pebble> {
        let mover = self.set(from, None);
        self.set(to, mover)
    }

    pub fn count(&self, player: Player) -> usize {
        self.cells
            .iter()
            .flatten()
            .filter(|p| matches!(p, Some(pebble) if pebble.owner == player))
            .count()
    }

    pub(crate) fn cells(&self) -> &Cells {
        &self.cells
    }
}

impl PebbleLookup for Board {
    fn pebble_at(&self, cell: Cell) -> Option<Pebble> {
        if !cell.is_valid() {
            return None;
        }
        let (r, c) = cell.index();
        self.cells[r][c]
    }
}

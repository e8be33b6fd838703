//! Long-move traversal state machine
//!
//! A [`LongMoveCursor`] walks a pebble around its track one cell at a time.
//! The same cursor drives move enumeration (against a cumulative snapshot)
//! and live play (against the game board): in both cases the board it reads
//! is the pre-move position with the origin already vacated.

use serde::{Deserialize, Serialize};

use crate::board::{Cell, Direction, Pebble, PebbleLookup, Player};
use crate::topology;

/// Cursor lifecycle
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TraceState {
    AtStart,
    InTransit,
    Ended(LongMoveEnd),
}

/// Why a long move stopped
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LongMoveEnd {
    /// Landed on an enemy pebble and removed it
    Captured,
    /// Came back to the origin heading the original way
    Completed,
    /// The next cell holds one of the mover's own pebbles
    Blocked,
    /// Reached the requested stop cell, or stopped on request
    Stopped,
}

/// A single physical step of a long move
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceStep {
    pub from: Cell,
    pub to: Cell,
    pub via_arc: bool,
    pub captured: Option<Pebble>,
}

/// Result of asking the cursor to advance
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Advance {
    /// The pebble moved; check [`LongMoveCursor::end`] for termination
    Moved(TraceStep),
    /// Nothing moved; the traversal is over
    Halted(LongMoveEnd),
}

/// Live traversal state of one long move
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LongMoveCursor {
    mover: Player,
    origin: Cell,
    origin_direction: Direction,
    cell: Cell,
    direction: Direction,
    stop_at: Option<Cell>,
    steps: usize,
    captured: bool,
    state: TraceState,
}

impl LongMoveCursor {
    pub fn new(mover: Player, origin: Cell, direction: Direction) -> Self {
        Self {
            mover,
            origin,
            origin_direction: direction,
            cell: origin,
            direction,
            stop_at: None,
            steps: 0,
            captured: false,
            state: TraceState::AtStart,
        }
    }

    pub fn with_stop(mut self, stop_at: Option<Cell>) -> Self {
        self.stop_at = stop_at;
        self
    }

    pub fn mover(&self) -> Player {
        self.mover
    }

    pub fn origin(&self) -> Cell {
        self.origin
    }

    pub fn origin_direction(&self) -> Direction {
        self.origin_direction
    }

    /// Cell the pebble currently stands on
    pub fn cell(&self) -> Cell {
        self.cell
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn stop_at(&self) -> Option<Cell> {
        self.stop_at
    }

    pub fn set_stop(&mut self, cell: Cell) {
        self.stop_at = Some(cell);
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn has_captured(&self) -> bool {
        self.captured
    }

    pub fn state(&self) -> TraceState {
        self.state
    }

    pub fn end(&self) -> Option<LongMoveEnd> {
        match self.state {
            TraceState::Ended(end) => Some(end),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.end().is_some()
    }

    /// Force the traversal to end where it stands
    pub fn halt(&mut self, end: LongMoveEnd) {
        if !self.is_terminal() {
            self.state = TraceState::Ended(end);
        }
    }

    /// Advance one cell. `board` must show the position as it stands during
    /// the move: origin empty, mover on [`Self::cell`].
    pub fn step(&mut self, board: &impl PebbleLookup) -> Advance {
        if let Some(end) = self.end() {
            return Advance::Halted(end);
        }
        if self.stop_at == Some(self.cell) && self.steps > 0 {
            self.state = TraceState::Ended(LongMoveEnd::Stopped);
            return Advance::Halted(LongMoveEnd::Stopped);
        }

        let hop = topology::advance(self.cell, self.direction);
        let occupant = board.pebble_at(hop.to);
        if matches!(occupant, Some(p) if p.owner == self.mover) {
            self.state = TraceState::Ended(LongMoveEnd::Blocked);
            return Advance::Halted(LongMoveEnd::Blocked);
        }

        let step = TraceStep {
            from: self.cell,
            to: hop.to,
            via_arc: hop.via_arc,
            captured: occupant,
        };
        self.cell = hop.to;
        self.direction = hop.direction;
        self.steps += 1;

        self.state = if occupant.is_some() {
            self.captured = true;
            TraceState::Ended(LongMoveEnd::Captured)
        } else if self.cell == self.origin && self.direction == self.origin_direction {
            TraceState::Ended(LongMoveEnd::Completed)
        } else {
            TraceState::InTransit
        };

        Advance::Moved(step)
    }
}

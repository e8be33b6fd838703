//! Move generation over snapshots
//!
//! Produces every candidate a player can choose from: one-cell steps into
//! any empty neighbor, and every stop along every legal long move.

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::board::{Cell, Direction, PebbleLookup, Player};
use crate::snapshot::Snapshot;
use crate::topology;
use crate::tracer::{Advance, LongMoveCursor};

/// How a candidate moves its pebble
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CandidateKind {
    Simple,
    Long { direction: Direction },
}

/// A fully evaluated option for one player
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Candidate {
    pub player: Player,
    pub kind: CandidateKind,
    /// Opposing pebbles removed (0 or 1)
    pub captures: u8,
    pub from: Cell,
    pub to: Cell,
    /// Position after the move
    pub snapshot: Snapshot,
}

impl Candidate {
    pub fn is_long(&self) -> bool {
        matches!(self.kind, CandidateKind::Long { .. })
    }

    pub fn direction(&self) -> Option<Direction> {
        match self.kind {
            CandidateKind::Long { direction } => Some(direction),
            CandidateKind::Simple => None,
        }
    }
}

/// Arranges enumerated candidates before search consumes them
pub trait CandidateOrder {
    fn arrange(&mut self, candidates: &mut [Candidate]);
}

/// Keep enumeration order (row-major, simple before long)
#[derive(Clone, Copy, Debug, Default)]
pub struct Natural;

impl CandidateOrder for Natural {
    fn arrange(&mut self, _candidates: &mut [Candidate]) {}
}

/// Uniform shuffle driven by an injected RNG
#[derive(Clone, Debug)]
pub struct Shuffled<R = ChaCha8Rng> {
    rng: R,
}

impl Shuffled<ChaCha8Rng> {
    pub fn seeded(seed: u64) -> Self {
        Self { rng: ChaCha8Rng::seed_from_u64(seed) }
    }
}

impl<R: Rng> Shuffled<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> CandidateOrder for Shuffled<R> {
    fn arrange(&mut self, candidates: &mut [Candidate]) {
        candidates.shuffle(&mut self.rng);
    }
}

/// Steps into each empty in-bounds neighbor; never captures
pub fn simple_moves(snapshot: &Snapshot, from: Cell) -> Vec<Candidate> {
    let Some(pebble) = snapshot.pebble_at(from) else {
        return vec![];
    };

    from.surrounding()
        .filter(|&to| snapshot.is_empty(to))
        .map(|to| Candidate {
            player: pebble.owner,
            kind: CandidateKind::Simple,
            captures: 0,
            from,
            to,
            snapshot: snapshot.apply(from, to),
        })
        .collect()
}

/// Whether the pebble on `from` may start a long move heading `direction`
pub fn long_move_possible(snapshot: &Snapshot, from: Cell, direction: Direction) -> bool {
    let Some(mover) = snapshot.owner_at(from) else {
        return false;
    };
    if from.is_corner() {
        return false;
    }
    // No running along the edge the pebble sits on
    if (from.on_vertical_edge() && direction.is_vertical())
        || (from.on_horizontal_edge() && !direction.is_vertical())
    {
        return false;
    }

    let mut scanned = 0;
    let mut at = from.neighbor(direction);
    while at.is_valid() {
        if !snapshot.is_empty(at) {
            return false;
        }
        scanned += 1;
        at = at.neighbor(direction);
    }

    // Already on the boundary: the first step crosses the arc, so it must not
    // land on a friendly pebble
    if scanned == 0 {
        let across = topology::partner(from);
        if snapshot.owner_at(across) == Some(mover) {
            return false;
        }
    }

    true
}

/// Every stop of every legal long move from `from`
pub fn long_moves(snapshot: &Snapshot, from: Cell) -> Vec<Candidate> {
    let mut moves = Vec::new();
    for direction in Direction::ALL {
        if long_move_possible(snapshot, from, direction) {
            trace_stops(snapshot, from, direction, &mut moves);
        }
    }
    moves
}

/// Unroll one long move, pushing a candidate for each cell it can stop on
fn trace_stops(snapshot: &Snapshot, from: Cell, direction: Direction, out: &mut Vec<Candidate>) {
    let Some(mover) = snapshot.owner_at(from) else {
        return;
    };
    let mut cursor = LongMoveCursor::new(mover, from, direction);
    let mut current = *snapshot;
    let mut captures = 0u8;
    // Tracks cross themselves; each cell is offered once per direction
    let mut seen = vec![from];

    while let Advance::Moved(step) = cursor.step(&current) {
        current = current.apply(step.from, step.to);
        if step.captured.is_some() {
            captures += 1;
        }
        if !seen.contains(&step.to) {
            seen.push(step.to);
            out.push(Candidate {
                player: mover,
                kind: CandidateKind::Long { direction },
                captures,
                from,
                to: step.to,
                snapshot: current,
            });
        }
        if cursor.is_terminal() {
            break;
        }
    }
}

/// All candidates for `player`, arranged by `order`
pub fn all_inputs(player: Player, snapshot: &Snapshot, order: &mut impl CandidateOrder) -> Vec<Candidate> {
    let mut inputs = Vec::new();
    for (cell, pebble) in snapshot.pebbles() {
        if pebble.owner != player {
            continue;
        }
        inputs.extend(simple_moves(snapshot, cell));
        inputs.extend(long_moves(snapshot, cell));
    }
    order.arrange(&mut inputs);
    inputs
}

/// Whether `player` has at least one legal move
pub fn has_any_move(player: Player, snapshot: &Snapshot) -> bool {
    snapshot.pebbles().any(|(cell, pebble)| {
        pebble.owner == player
            && (cell.surrounding().any(|to| snapshot.is_empty(to))
                || Direction::ALL
                    .iter()
                    .any(|&dir| long_move_possible(snapshot, cell, dir)))
    })
}

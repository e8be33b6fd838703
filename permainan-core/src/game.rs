//! Game orchestration: turns, live commits and staged long moves
//!
//! The [`Game`] owns the live board and is driven entirely by its host. It
//! never sleeps or spawns: anything that should happen later is pushed onto
//! the task outbox as a [`Scheduled`] value, and everything observable is
//! pushed onto the event outbox.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::ai::MinimaxAI;
use crate::board::{Board, Cell, Direction, PebbleLookup, Player};
use crate::config::{GameConfig, Pacing};
use crate::error::MoveError;
use crate::movegen::{has_any_move, long_move_possible, Candidate, CandidateKind};
use crate::snapshot::Snapshot;
use crate::topology;
use crate::tracer::{Advance, LongMoveCursor, LongMoveEnd};

// ============================================================================
// CORE TYPES
// ============================================================================

/// Who decides a player's moves
#[derive(Clone, Debug)]
pub enum Controller {
    /// Moves arrive from outside. A networked human's long moves are paced by
    /// the peer's step acks rather than by scheduled tasks.
    Human { networked: bool },
    Computer(MinimaxAI),
}

impl Controller {
    pub fn human() -> Self {
        Controller::Human { networked: false }
    }

    pub fn networked() -> Self {
        Controller::Human { networked: true }
    }

    pub fn computer(ai: MinimaxAI) -> Self {
        Controller::Computer(ai)
    }

    pub fn is_computer(&self) -> bool {
        matches!(self, Controller::Computer(_))
    }

    /// Whether long-move steps are scheduled locally
    pub fn paces_locally(&self) -> bool {
        !matches!(self, Controller::Human { networked: true })
    }
}

/// A committed change to the live board
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Move {
    Simple { from: Cell, to: Cell },
    /// One step of a long move
    Step { from: Cell, to: Cell },
    /// One step of a long move that crossed an arc
    LoopStep { from: Cell, to: Cell },
}

impl Move {
    pub fn from(&self) -> Cell {
        match *self {
            Move::Simple { from, .. } | Move::Step { from, .. } | Move::LoopStep { from, .. } => from,
        }
    }

    pub fn to(&self) -> Cell {
        match *self {
            Move::Simple { to, .. } | Move::Step { to, .. } | Move::LoopStep { to, .. } => to,
        }
    }
}

/// Where the game stands
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Phase {
    AwaitingMove,
    LongMove(LongMoveCursor),
    Finished { winner: Player },
}

/// Something observable that happened
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    MoveApplied {
        mv: Move,
        mover: Player,
        /// Cell an opposing pebble was removed from
        captured: Option<Cell>,
    },
    LongMoveStarted {
        player: Player,
        origin: Cell,
        direction: Direction,
    },
    LongMoveEnded {
        player: Player,
        at: Cell,
        end: LongMoveEnd,
    },
    PlayerEliminated {
        player: Player,
    },
    GameFinished {
        winner: Player,
    },
}

/// Deferred work the host must run through [`Game::run_task`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Task {
    ComputerTurn { decision: u64 },
    LongMoveStep { decision: u64 },
}

/// A task and how long the host should wait before running it
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Scheduled {
    pub delay: Duration,
    pub task: Task,
}

// ============================================================================
// GAME
// ============================================================================

/// Live game between two controllers. Red moves first.
#[derive(Clone, Debug)]
pub struct Game {
    board: Board,
    turn: Player,
    phase: Phase,
    /// Bumped at every turn start and at the finish
    decision: u64,
    controllers: [Controller; 2],
    pacing: Pacing,
    history: Vec<Move>,
    /// Position after each committed move; index 0 is the start
    snapshots: Vec<Snapshot>,
    events: Vec<Event>,
    tasks: Vec<Scheduled>,
}

impl Game {
    pub fn new(red: Controller, black: Controller, config: &GameConfig) -> Self {
        Self::with_board(Board::initial(), red, black, config)
    }

    /// Game from an arbitrary position, Red to move
    pub fn with_board(board: Board, red: Controller, black: Controller, config: &GameConfig) -> Self {
        let start = Snapshot::of(&board);
        Self {
            board,
            turn: Player::Red,
            phase: Phase::AwaitingMove,
            decision: 0,
            controllers: [red, black],
            pacing: config.pacing.clone(),
            history: Vec::new(),
            snapshots: vec![start],
            events: Vec::new(),
            tasks: Vec::new(),
        }
    }

    /// Begin Red's first turn
    pub fn start(&mut self) {
        tracing::info!(
            red = self.board.count(Player::Red),
            black = self.board.count(Player::Black),
            "game started"
        );
        self.begin_turn();
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::of(&self.board)
    }

    pub fn turn(&self) -> Player {
        self.turn
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn decision(&self) -> u64 {
        self.decision
    }

    pub fn pacing(&self) -> &Pacing {
        &self.pacing
    }

    pub fn controller(&self, player: Player) -> &Controller {
        &self.controllers[player.id()]
    }

    pub fn history(&self) -> &[Move] {
        &self.history
    }

    /// Position after the first `n` committed moves
    pub fn state_at(&self, n: usize) -> Option<&Snapshot> {
        self.snapshots.get(n)
    }

    pub fn winner(&self) -> Option<Player> {
        match self.phase {
            Phase::Finished { winner } => Some(winner),
            _ => None,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.winner().is_some()
    }

    pub fn long_move(&self) -> Option<&LongMoveCursor> {
        match &self.phase {
            Phase::LongMove(cursor) => Some(cursor),
            _ => None,
        }
    }

    /// Drain pending events
    pub fn take_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    /// Drain pending scheduled tasks
    pub fn take_tasks(&mut self) -> Vec<Scheduled> {
        std::mem::take(&mut self.tasks)
    }

    // ------------------------------------------------------------------
    // Move requests
    // ------------------------------------------------------------------

    /// Move one pebble to an adjacent empty cell
    pub fn place_move(&mut self, player: Player, from: Cell, to: Cell) -> Result<(), MoveError> {
        self.ensure_turn(player)?;
        self.ensure_owner(player, from)?;
        if !to.is_valid() {
            return Err(MoveError::OffBoard(to));
        }
        if !from.is_adjacent(to) {
            return Err(MoveError::NotAdjacent { from, to });
        }
        if !self.board.is_empty(to) {
            return Err(MoveError::Occupied(to));
        }

        self.commit(Move::Simple { from, to }, player);
        self.end_turn();
        Ok(())
    }

    /// Start a long move. Locally paced movers take the first step at once.
    pub fn start_long_move(
        &mut self,
        player: Player,
        direction: Direction,
        origin: Cell,
        stop: Option<Cell>,
    ) -> Result<(), MoveError> {
        self.ensure_turn(player)?;
        self.ensure_owner(player, origin)?;
        if let Some(cell) = stop.filter(|c| !c.is_valid()) {
            return Err(MoveError::OffBoard(cell));
        }
        if !long_move_possible(&self.snapshot(), origin, direction) {
            return Err(MoveError::IllegalLongMove { from: origin, direction });
        }

        let cursor = LongMoveCursor::new(player, origin, direction).with_stop(stop);
        self.phase = Phase::LongMove(cursor);
        self.events.push(Event::LongMoveStarted {
            player,
            origin,
            direction,
        });
        tracing::debug!(player = %player, origin = %origin, direction = %direction, "long move started");

        if self.controller(player).paces_locally() {
            self.advance_long_move()?;
        }
        Ok(())
    }

    /// Perform exactly one step of the active long move
    pub fn advance_long_move(&mut self) -> Result<Advance, MoveError> {
        let (advance, mover, ended) = match &mut self.phase {
            Phase::LongMove(cursor) => {
                let advance = cursor.step(&self.board);
                if let Advance::Moved(_) = advance {
                    if cursor.stop_at() == Some(cursor.cell()) {
                        cursor.halt(LongMoveEnd::Stopped);
                    }
                }
                (advance, cursor.mover(), cursor.end())
            }
            Phase::Finished { .. } => return Err(MoveError::GameOver),
            Phase::AwaitingMove => return Err(MoveError::NoLongMove),
        };

        match advance {
            Advance::Moved(step) => {
                let mv = if step.via_arc {
                    Move::LoopStep { from: step.from, to: step.to }
                } else {
                    Move::Step { from: step.from, to: step.to }
                };
                self.commit(mv, mover);
                match ended {
                    Some(end) => self.end_long_move(end),
                    None if self.controller(mover).paces_locally() => {
                        let delay = self.pacing.after_step(step.via_arc);
                        self.schedule(delay, Task::LongMoveStep { decision: self.decision });
                    }
                    None => {}
                }
            }
            Advance::Halted(end) => self.end_long_move(end),
        }
        Ok(advance)
    }

    /// End the active long move where the pebble stands
    pub fn stop_long_move(&mut self) -> Result<(), MoveError> {
        let cursor = self.active_cursor()?;
        if cursor.has_captured() {
            return Err(MoveError::AlreadyCaptured);
        }
        self.end_long_move(LongMoveEnd::Stopped);
        Ok(())
    }

    /// Make the active long move stop once it reaches `cell`
    pub fn set_long_move_stop(&mut self, cell: Cell) -> Result<(), MoveError> {
        if !cell.is_valid() {
            return Err(MoveError::OffBoard(cell));
        }
        match &mut self.phase {
            Phase::LongMove(cursor) => {
                cursor.set_stop(cell);
                Ok(())
            }
            Phase::Finished { .. } => Err(MoveError::GameOver),
            Phase::AwaitingMove => Err(MoveError::NoLongMove),
        }
    }

    /// Apply a search result computed at `decision`
    pub fn commit_candidate(&mut self, decision: u64, candidate: &Candidate) -> Result<(), MoveError> {
        if decision != self.decision {
            tracing::warn!(decision, current = self.decision, "discarding stale search result");
            return Err(MoveError::Stale);
        }
        match candidate.kind {
            CandidateKind::Simple => self.place_move(candidate.player, candidate.from, candidate.to),
            CandidateKind::Long { direction } => {
                self.start_long_move(candidate.player, direction, candidate.from, Some(candidate.to))
            }
        }
    }

    /// Step reported by the remote side of a networked long move
    pub fn apply_peer_step(&mut self, player: Player, from: Cell, to: Cell) -> Result<(), MoveError> {
        let cursor = self.active_cursor()?;
        if cursor.mover() != player {
            return Err(MoveError::NotYourTurn);
        }
        let expected = topology::advance(cursor.cell(), cursor.direction()).to;
        if cursor.cell() != from || expected != to {
            return Err(MoveError::OutOfSync {
                from,
                to,
                local: cursor.cell(),
            });
        }
        self.advance_long_move().map(|_| ())
    }

    /// Run a scheduled task. Tasks from an earlier decision point are
    /// rejected as stale without touching the game.
    pub fn run_task(&mut self, task: Task) -> Result<(), MoveError> {
        match task {
            Task::ComputerTurn { decision } => {
                if decision != self.decision || self.phase != Phase::AwaitingMove {
                    tracing::warn!(?task, current = self.decision, "discarding stale task");
                    return Err(MoveError::Stale);
                }
                let player = self.turn;
                let snapshot = self.snapshot();
                let Controller::Computer(ai) = &mut self.controllers[player.id()] else {
                    return Err(MoveError::NotYourTurn);
                };
                match ai.best_move(player, &snapshot) {
                    Some(candidate) => self.commit_candidate(decision, &candidate),
                    None => {
                        self.finish(player.opponent());
                        Ok(())
                    }
                }
            }
            Task::LongMoveStep { decision } => {
                if decision != self.decision || self.long_move().is_none() {
                    tracing::warn!(?task, current = self.decision, "discarding stale task");
                    return Err(MoveError::Stale);
                }
                self.advance_long_move().map(|_| ())
            }
        }
    }

    /// Concede; the opponent wins
    pub fn resign(&mut self, player: Player) -> Result<(), MoveError> {
        if self.is_finished() {
            return Err(MoveError::GameOver);
        }
        tracing::info!(player = %player, "resigned");
        self.finish(player.opponent());
        Ok(())
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn ensure_turn(&self, player: Player) -> Result<(), MoveError> {
        match self.phase {
            Phase::Finished { .. } => Err(MoveError::GameOver),
            Phase::LongMove(_) => Err(MoveError::LongMoveActive),
            Phase::AwaitingMove if player != self.turn => Err(MoveError::NotYourTurn),
            Phase::AwaitingMove => Ok(()),
        }
    }

    fn ensure_owner(&self, player: Player, cell: Cell) -> Result<(), MoveError> {
        if !cell.is_valid() {
            return Err(MoveError::OffBoard(cell));
        }
        match self.board.owner_at(cell) {
            None => Err(MoveError::EmptySource(cell)),
            Some(owner) if owner != player => Err(MoveError::NotOwner(cell)),
            Some(_) => Ok(()),
        }
    }

    fn active_cursor(&self) -> Result<&LongMoveCursor, MoveError> {
        match &self.phase {
            Phase::LongMove(cursor) => Ok(cursor),
            Phase::Finished { .. } => Err(MoveError::GameOver),
            Phase::AwaitingMove => Err(MoveError::NoLongMove),
        }
    }

    fn schedule(&mut self, delay: Duration, task: Task) {
        self.tasks.push(Scheduled { delay, task });
    }

    /// Write a move to the live board and record it
    fn commit(&mut self, mv: Move, mover: Player) {
        let captured = self.board.relocate(mv.from(), mv.to());
        self.history.push(mv);
        self.snapshots.push(Snapshot::of(&self.board));
        self.events.push(Event::MoveApplied {
            mv,
            mover,
            captured: captured.map(|_| mv.to()),
        });
        tracing::debug!(?mv, mover = %mover, captured = captured.is_some(), "move committed");
    }

    fn end_long_move(&mut self, end: LongMoveEnd) {
        let Phase::LongMove(cursor) = std::mem::replace(&mut self.phase, Phase::AwaitingMove) else {
            return;
        };
        self.events.push(Event::LongMoveEnded {
            player: cursor.mover(),
            at: cursor.cell(),
            end,
        });
        tracing::debug!(at = %cursor.cell(), steps = cursor.steps(), ?end, "long move ended");

        // Only long moves capture, so elimination is checked once they end
        let victim = cursor.mover().opponent();
        if cursor.has_captured() && self.board.count(victim) == 0 {
            self.events.push(Event::PlayerEliminated { player: victim });
            self.finish(cursor.mover());
            return;
        }
        self.end_turn();
    }

    fn end_turn(&mut self) {
        if self.is_finished() {
            return;
        }
        self.turn = self.turn.opponent();
        self.begin_turn();
    }

    fn begin_turn(&mut self) {
        self.decision += 1;
        let player = self.turn;
        if !has_any_move(player, &self.snapshot()) {
            tracing::info!(player = %player, "no legal move");
            self.finish(player.opponent());
            return;
        }
        if self.controller(player).is_computer() {
            let delay = self.pacing.think();
            self.schedule(delay, Task::ComputerTurn { decision: self.decision });
        }
    }

    fn finish(&mut self, winner: Player) {
        self.decision += 1;
        self.phase = Phase::Finished { winner };
        self.events.push(Event::GameFinished { winner });
        tracing::info!(winner = %winner, moves = self.history.len(), "game finished");
    }
}

// ============================================================================
// TESTS
// ============================================================================

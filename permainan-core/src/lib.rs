//! Permainan Core - Game engine and AI
//!
//! This crate provides the core game logic for Permainan:
//! - Board geometry (6x6 grid whose edges are joined by corner arcs)
//! - Long-move tracing around the arc loops
//! - Move generation over immutable snapshots
//! - Position evaluation and fixed-depth minimax AI
//! - Turn orchestration with host-scheduled pacing
//! - Line-oriented wire protocol for networked play

pub mod board;
pub mod topology;
pub mod snapshot;
pub mod movegen;
pub mod tracer;
pub mod eval;
pub mod ai;
pub mod game;
pub mod protocol;
pub mod config;
pub mod error;

// Re-exports for convenient access
pub use board::{Board, Cell, Direction, Pebble, PebbleLookup, Player, BOARD_SIZE, PEBBLES_PER_PLAYER};
pub use snapshot::Snapshot;
pub use movegen::{all_inputs, Candidate, CandidateKind, CandidateOrder, Natural, Shuffled};
pub use tracer::{LongMoveCursor, LongMoveEnd};
pub use eval::{evaluate, Heuristics};
pub use ai::{MinimaxAI, SearchReport, SEARCH_DEPTH};
pub use game::{Controller, Event, Game, Move, Phase, Scheduled, Task};
pub use protocol::{handle_line, MoveSink, RemotePeer, WireEncoder, WireMessage};
pub use config::{AiConfig, GameConfig, Pacing};
pub use error::{GameError, MoveError, ProtocolError};

//! Line-oriented wire protocol between two game instances
//!
//! | message         | form                |
//! |-----------------|---------------------|
//! | simple move     | `r1 c1 r2 c2`       |
//! | long-move start | `L<D> r c`          |
//! | step ack        | `I r1 c1 r2 c2`     |
//! | long-move end   | `F`                 |
//! | resignation     | `R`                 |

use std::fmt;
use std::str::FromStr;

use crate::board::{Cell, Direction, Player, BOARD_SIZE};
use crate::error::{GameError, MoveError, ProtocolError};
use crate::game::{Event, Game, Move};

// ============================================================================
// MESSAGES
// ============================================================================

/// A decoded wire message
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WireMessage {
    Simple { from: Cell, to: Cell },
    LongStart { direction: Direction, origin: Cell },
    StepAck { from: Cell, to: Cell },
    LongEnd,
    Resign,
}

impl fmt::Display for WireMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WireMessage::Simple { from, to } => write!(f, "{} {} {} {}", from.row, from.col, to.row, to.col),
            WireMessage::LongStart { direction, origin } => {
                write!(f, "L{} {} {}", direction.letter(), origin.row, origin.col)
            }
            WireMessage::StepAck { from, to } => write!(f, "I {} {} {} {}", from.row, from.col, to.row, to.col),
            WireMessage::LongEnd => write!(f, "F"),
            WireMessage::Resign => write!(f, "R"),
        }
    }
}

impl FromStr for WireMessage {
    type Err = ProtocolError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let Some(&tag) = tokens.first() else {
            return Err(ProtocolError::Empty);
        };

        match tag {
            "F" => {
                expect_arity(&tokens, 1)?;
                Ok(WireMessage::LongEnd)
            }
            "R" => {
                expect_arity(&tokens, 1)?;
                Ok(WireMessage::Resign)
            }
            "I" => {
                expect_arity(&tokens, 5)?;
                let (from, to) = parse_pair(&tokens[1..])?;
                Ok(WireMessage::StepAck { from, to })
            }
            _ if tag.starts_with('L') => {
                let mut letters = tag.chars().skip(1);
                let (Some(letter), None) = (letters.next(), letters.next()) else {
                    return Err(ProtocolError::UnknownTag(tag.to_string()));
                };
                let direction = Direction::from_letter(letter).ok_or(ProtocolError::UnknownDirection(letter))?;
                expect_arity(&tokens, 3)?;
                let origin = Cell::new(parse_coord(tokens[1])?, parse_coord(tokens[2])?);
                Ok(WireMessage::LongStart { direction, origin })
            }
            _ if tag.starts_with(|c: char| c.is_ascii_digit() || c == '-') => {
                expect_arity(&tokens, 4)?;
                let (from, to) = parse_pair(&tokens)?;
                Ok(WireMessage::Simple { from, to })
            }
            other => Err(ProtocolError::UnknownTag(other.to_string())),
        }
    }
}

fn expect_arity(tokens: &[&str], expected: usize) -> Result<(), ProtocolError> {
    if tokens.len() != expected {
        return Err(ProtocolError::Arity {
            expected,
            found: tokens.len(),
        });
    }
    Ok(())
}

fn parse_coord(token: &str) -> Result<i8, ProtocolError> {
    let value: i8 = token
        .parse()
        .map_err(|_| ProtocolError::BadNumber(token.to_string()))?;
    if !(0..BOARD_SIZE).contains(&value) {
        return Err(ProtocolError::OutOfBounds(value));
    }
    Ok(value)
}

/// Four coordinates: source row/col then destination row/col
fn parse_pair(tokens: &[&str]) -> Result<(Cell, Cell), ProtocolError> {
    let from = Cell::new(parse_coord(tokens[0])?, parse_coord(tokens[1])?);
    let to = Cell::new(parse_coord(tokens[2])?, parse_coord(tokens[3])?);
    Ok((from, to))
}

impl WireMessage {
    /// Hand the message to a sink
    pub fn deliver(&self, sink: &mut impl MoveSink) -> Result<(), MoveError> {
        match *self {
            WireMessage::Simple { from, to } => sink.simple(from, to),
            WireMessage::LongStart { direction, origin } => sink.long_move(direction, origin.row, origin.col),
            WireMessage::StepAck { from, to } => sink.step(from, to),
            WireMessage::LongEnd => sink.long_end(),
            WireMessage::Resign => sink.resign(),
        }
    }

    /// Outgoing message announcing a locally produced event, if any
    pub fn from_event(event: &Event, local: Player) -> Option<WireMessage> {
        match *event {
            Event::MoveApplied { mv, mover, .. } if mover == local => Some(match mv {
                Move::Simple { from, to } => WireMessage::Simple { from, to },
                Move::Step { from, to } | Move::LoopStep { from, to } => WireMessage::StepAck { from, to },
            }),
            Event::LongMoveStarted {
                player,
                origin,
                direction,
            } if player == local => Some(WireMessage::LongStart { direction, origin }),
            Event::LongMoveEnded { player, .. } if player == local => Some(WireMessage::LongEnd),
            _ => None,
        }
    }
}

// ============================================================================
// DELIVERY
// ============================================================================

/// Receiver of decoded moves
pub trait MoveSink {
    fn simple(&mut self, from: Cell, to: Cell) -> Result<(), MoveError>;
    fn long_move(&mut self, direction: Direction, row: i8, col: i8) -> Result<(), MoveError>;
    fn step(&mut self, from: Cell, to: Cell) -> Result<(), MoveError>;
    fn long_end(&mut self) -> Result<(), MoveError>;
    fn resign(&mut self) -> Result<(), MoveError>;
}

/// Applies a remote player's messages to the local game
pub struct RemotePeer<'a> {
    pub game: &'a mut Game,
    pub player: Player,
}

impl<'a> RemotePeer<'a> {
    pub fn new(game: &'a mut Game, player: Player) -> Self {
        Self { game, player }
    }
}

impl MoveSink for RemotePeer<'_> {
    fn simple(&mut self, from: Cell, to: Cell) -> Result<(), MoveError> {
        self.game.place_move(self.player, from, to)
    }

    fn long_move(&mut self, direction: Direction, row: i8, col: i8) -> Result<(), MoveError> {
        self.game
            .start_long_move(self.player, direction, Cell::new(row, col), None)
    }

    fn step(&mut self, from: Cell, to: Cell) -> Result<(), MoveError> {
        self.game.apply_peer_step(self.player, from, to)
    }

    fn long_end(&mut self) -> Result<(), MoveError> {
        match self.game.long_move().map(|cursor| cursor.mover()) {
            // The local tracer already ended it
            None => Ok(()),
            Some(mover) if mover != self.player => Err(MoveError::NotYourTurn),
            Some(_) => self.game.stop_long_move(),
        }
    }

    fn resign(&mut self) -> Result<(), MoveError> {
        self.game.resign(self.player)
    }
}

/// Decode one line and deliver it
pub fn handle_line(line: &str, sink: &mut impl MoveSink) -> Result<WireMessage, GameError> {
    let message: WireMessage = line.parse()?;
    message.deliver(sink)?;
    Ok(message)
}

/// Encodes outgoing messages and counts them
#[derive(Clone, Debug, Default)]
pub struct WireEncoder {
    sent: u64,
}

impl WireEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn encode(&mut self, message: &WireMessage) -> String {
        self.sent += 1;
        message.to_string()
    }

    /// Lines to send for the events the local player produced
    pub fn encode_events(&mut self, events: &[Event], local: Player) -> Vec<String> {
        events
            .iter()
            .filter_map(|event| WireMessage::from_event(event, local))
            .map(|message| self.encode(&message))
            .collect()
    }

    pub fn sent(&self) -> u64 {
        self.sent
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Board, PebbleLookup};
    use crate::config::GameConfig;
    use crate::game::Controller;

    #[derive(Default)]
    struct Recorder {
        calls: Vec<String>,
    }

    impl MoveSink for Recorder {
        fn simple(&mut self, from: Cell, to: Cell) -> Result<(), MoveError> {
            self.calls.push(format!("simple {from} {to}"));
            Ok(())
        }

        fn long_move(&mut self, direction: Direction, row: i8, col: i8) -> Result<(), MoveError> {
            self.calls.push(format!("long {direction:?} {row} {col}"));
            Ok(())
        }

        fn step(&mut self, from: Cell, to: Cell) -> Result<(), MoveError> {
            self.calls.push(format!("step {from} {to}"));
            Ok(())
        }

        fn long_end(&mut self) -> Result<(), MoveError> {
            self.calls.push("end".into());
            Ok(())
        }

        fn resign(&mut self) -> Result<(), MoveError> {
            self.calls.push("resign".into());
            Ok(())
        }
    }

    #[test]
    fn test_long_start_delivery() {
        let mut sink = Recorder::default();
        let message = handle_line("LU 2 3", &mut sink).unwrap();
        assert_eq!(message.to_string(), "LU 2 3");
        assert_eq!(sink.calls, vec!["long Up 2 3"]);
    }

    #[test]
    fn test_decode_each_form() {
        assert_eq!(
            "1 0 2 1".parse(),
            Ok(WireMessage::Simple { from: Cell::new(1, 0), to: Cell::new(2, 1) })
        );
        assert_eq!(
            "I 0 2 2 0".parse(),
            Ok(WireMessage::StepAck { from: Cell::new(0, 2), to: Cell::new(2, 0) })
        );
        assert_eq!("  F ".parse(), Ok(WireMessage::LongEnd));
        assert_eq!("R".parse(), Ok(WireMessage::Resign));
    }

    #[test]
    fn test_decode_errors() {
        let cases = [
            ("", ProtocolError::Empty),
            ("   ", ProtocolError::Empty),
            ("X 1 2", ProtocolError::UnknownTag("X".into())),
            ("LUU 1 2", ProtocolError::UnknownTag("LUU".into())),
            ("LQ 1 2", ProtocolError::UnknownDirection('Q')),
            ("LU 1", ProtocolError::Arity { expected: 3, found: 2 }),
            ("1 2 3", ProtocolError::Arity { expected: 4, found: 3 }),
            ("F now", ProtocolError::Arity { expected: 1, found: 2 }),
            ("I 1 a 2 2", ProtocolError::BadNumber("a".into())),
            ("1 2 3 6", ProtocolError::OutOfBounds(6)),
            ("-1 2 3 4", ProtocolError::OutOfBounds(-1)),
        ];
        for (line, expected) in cases {
            assert_eq!(line.parse::<WireMessage>(), Err(expected), "{line:?}");
        }
    }

    #[test]
    fn test_bad_line_is_not_delivered() {
        let mut sink = Recorder::default();
        let err = handle_line("LZ 1 1", &mut sink).unwrap_err();
        assert_eq!(err, GameError::Protocol(ProtocolError::UnknownDirection('Z')));
        assert!(sink.calls.is_empty());
    }

    fn networked_red(board: Board) -> Game {
        let mut game = Game::with_board(board, Controller::networked(), Controller::human(), &GameConfig::default());
        game.start();
        game
    }

    #[test]
    fn test_remote_long_move() {
        let board = Board::from_pebbles(&[(Cell::new(1, 2), Player::Red), (Cell::new(4, 4), Player::Black)]);
        let mut game = networked_red(board);
        {
            let mut peer = RemotePeer::new(&mut game, Player::Red);
            for line in ["LU 1 2", "I 1 2 0 2", "I 0 2 2 0", "F"] {
                handle_line(line, &mut peer).unwrap();
            }
        }
        assert_eq!(game.board().owner_at(Cell::new(2, 0)), Some(Player::Red));
        assert_eq!(game.turn(), Player::Black);
    }

    #[test]
    fn test_out_of_sync_step() {
        let board = Board::from_pebbles(&[(Cell::new(1, 2), Player::Red), (Cell::new(4, 4), Player::Black)]);
        let mut game = networked_red(board);
        let mut peer = RemotePeer::new(&mut game, Player::Red);
        handle_line("LU 1 2", &mut peer).unwrap();

        let err = handle_line("I 2 2 1 2", &mut peer).unwrap_err();
        assert_eq!(
            err,
            GameError::Move(MoveError::OutOfSync { from: Cell::new(2, 2), to: Cell::new(1, 2), local: Cell::new(1, 2) })
        );
        assert!(game.history().is_empty());
    }

    #[test]
    fn test_long_end_without_cursor_is_noop() {
        let mut game = networked_red(Board::initial());
        let mut peer = RemotePeer::new(&mut game, Player::Red);
        handle_line("F", &mut peer).unwrap();
        assert_eq!(game.turn(), Player::Red);
        assert!(game.take_events().is_empty());
    }

    #[test]
    fn test_eliminating_capture_still_sends_end() {
        let board = Board::from_pebbles(&[(Cell::new(2, 2), Player::Red), (Cell::new(2, 0), Player::Black)]);
        let mut game = Game::with_board(board, Controller::human(), Controller::human(), &GameConfig::default());
        game.start();
        game.start_long_move(Player::Red, Direction::Up, Cell::new(2, 2), None).unwrap();
        while let Some(scheduled) = game.take_tasks().pop() {
            game.run_task(scheduled.task).unwrap();
        }
        assert_eq!(game.winner(), Some(Player::Red));

        let lines = WireEncoder::new().encode_events(&game.take_events(), Player::Red);
        assert_eq!(lines, vec!["LU 2 2", "I 2 2 1 2", "I 1 2 0 2", "I 0 2 2 0", "F"]);
    }

    #[test]
    fn test_remote_resign() {
        let mut game = networked_red(Board::initial());
        let mut peer = RemotePeer::new(&mut game, Player::Red);
        handle_line("R", &mut peer).unwrap();
        assert_eq!(game.winner(), Some(Player::Black));
    }

    #[test]
    fn test_events_mirror_to_peer() {
        // Black plays locally; its events replayed on a mirror game keep both in step
        let board = Board::from_pebbles(&[(Cell::new(1, 2), Player::Red), (Cell::new(4, 3), Player::Black)]);
        let config = GameConfig::default();
        let mut local = Game::with_board(board.clone(), Controller::human(), Controller::human(), &config);
        let mut mirror = Game::with_board(board, Controller::human(), Controller::networked(), &config);
        local.start();
        mirror.start();

        local.place_move(Player::Red, Cell::new(1, 2), Cell::new(1, 1)).unwrap();
        mirror.place_move(Player::Red, Cell::new(1, 2), Cell::new(1, 1)).unwrap();
        local.take_events();

        local
            .start_long_move(Player::Black, Direction::Down, Cell::new(4, 3), Some(Cell::new(3, 5)))
            .unwrap();
        let mut encoder = WireEncoder::new();
        let mut outgoing = Vec::new();
        while !local.is_finished() && local.turn() == Player::Black {
            outgoing.extend(encoder.encode_events(&local.take_events(), Player::Black));
            for scheduled in local.take_tasks() {
                local.run_task(scheduled.task).unwrap();
            }
        }
        outgoing.extend(encoder.encode_events(&local.take_events(), Player::Black));

        assert_eq!(outgoing.first().map(String::as_str), Some("LD 4 3"));
        assert_eq!(outgoing.last().map(String::as_str), Some("F"));
        assert_eq!(encoder.sent(), outgoing.len() as u64);

        let mut peer = RemotePeer::new(&mut mirror, Player::Black);
        for line in &outgoing {
            handle_line(line, &mut peer).unwrap();
        }
        assert_eq!(mirror.snapshot(), local.snapshot());
        assert_eq!(mirror.turn(), local.turn());
    }
}

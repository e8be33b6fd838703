//! Terminal rendering

use permainan_core::{Cell, Event, Move, PebbleLookup, Player, Snapshot, BOARD_SIZE};

/// ASCII board: `R` for Red, `B` for Black, `.` for empty
pub fn board(snapshot: &Snapshot) -> String {
    let mut out = String::from("   ");
    for col in 0..BOARD_SIZE {
        out.push_str(&format!(" {}", col));
    }
    out.push('\n');

    for row in 0..BOARD_SIZE {
        out.push_str(&format!(" {} ", row));
        for col in 0..BOARD_SIZE {
            let symbol = match snapshot.owner_at(Cell::new(row, col)) {
                Some(Player::Red) => 'R',
                Some(Player::Black) => 'B',
                None => '.',
            };
            out.push(' ');
            out.push(symbol);
        }
        out.push('\n');
    }
    out
}

/// One-line description of an event
pub fn event(event: &Event) -> String {
    match event {
        Event::MoveApplied { mv, mover, captured } => {
            let what = match mv {
                Move::Simple { .. } => "moves",
                Move::Step { .. } => "steps",
                Move::LoopStep { .. } => "loops",
            };
            let mut line = format!("{} {} {} -> {}", mover, what, mv.from(), mv.to());
            if let Some(cell) = captured {
                line.push_str(&format!(", captures on {}", cell));
            }
            line
        }
        Event::LongMoveStarted {
            player,
            origin,
            direction,
        } => format!("{} starts a long move from {} heading {}", player, origin, direction),
        Event::LongMoveEnded { player, at, end } => {
            format!("{} ends the long move on {} ({:?})", player, at, end)
        }
        Event::PlayerEliminated { player } => format!("{} has no pebbles left", player),
        Event::GameFinished { winner } => format!("{} wins", winner),
    }
}

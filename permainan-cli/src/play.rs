//! Play command - run one game on the terminal
//!
//! Scheduled tasks from the game are run on tokio timers. A human side types
//! moves in wire format on stdin: `1 0 2 1`, `LU 2 3`, `F` or `R`. While that
//! human's long move runs, stdin races the step timer so `F` can stop it.
//!
//! ## Architecture
//!
//! - Level 1: run() - orchestration
//! - Level 2: load_config(), build_game(), play_game(), report()
//! - Level 3: run_scheduled(), run_interruptible(), read_human()

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use serde::Serialize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};

use permainan_core::{
    handle_line, Controller, Event, Game, GameConfig, Move, Pacing, Player, RemotePeer, Scheduled,
};

use crate::render;

// ============================================================================
// COMMAND ARGUMENTS
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Side {
    Human,
    Computer,
}

#[derive(Args)]
pub struct PlayArgs {
    /// Game configuration JSON file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// AI search depth (overrides config)
    #[arg(long)]
    pub depth: Option<u32>,

    /// Seed for the AI candidate shuffle (overrides config)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Enable alpha-beta pruning
    #[arg(long)]
    pub prune: bool,

    /// Who plays Red
    #[arg(long, value_enum, default_value = "computer")]
    pub red: Side,

    /// Who plays Black
    #[arg(long, value_enum, default_value = "computer")]
    pub black: Side,

    /// Stop after this many turns
    #[arg(long, default_value = "200")]
    pub max_turns: usize,

    /// Skip all pacing delays
    #[arg(long)]
    pub fast: bool,

    /// Output the result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Summary of a finished (or abandoned) game
#[derive(Clone, Debug, Serialize)]
struct GameRecord {
    winner: Option<Player>,
    turns: usize,
    red_pebbles: usize,
    black_pebbles: usize,
    moves: Vec<Move>,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

pub async fn run(args: PlayArgs) -> Result<()> {
    let config = load_config(&args)?;
    let mut game = build_game(&args, &config);

    tracing::info!(
        red = ?args.red,
        black = ?args.black,
        depth = config.ai.depth,
        prune = config.ai.prune,
        "starting game"
    );

    let stdin = BufReader::new(tokio::io::stdin()).lines();
    let record = play_game(&mut game, stdin, args.max_turns, !args.json).await?;

    report(&record, args.json)
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

fn load_config(args: &PlayArgs) -> Result<GameConfig> {
    let mut config = match &args.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };

    if let Some(depth) = args.depth {
        config.ai.depth = depth;
    }
    if let Some(seed) = args.seed {
        config.ai.seed = Some(seed);
    }
    config.ai.prune |= args.prune;
    if args.fast {
        config.pacing = Pacing::instant();
    }
    Ok(config)
}

fn build_game(args: &PlayArgs, config: &GameConfig) -> Game {
    let controller = |side: Side, player: Player| match side {
        Side::Human => Controller::human(),
        Side::Computer => Controller::computer(config.ai.build(player.id() as u64)),
    };
    Game::new(
        controller(args.red, Player::Red),
        controller(args.black, Player::Black),
        config,
    )
}

async fn play_game<R>(game: &mut Game, mut input: Lines<R>, max_turns: usize, verbose: bool) -> Result<GameRecord>
where
    R: AsyncBufRead + Unpin,
{
    game.start();
    let mut turns = 0;
    let mut input_open = true;
    if verbose {
        println!("{}", render::board(&game.snapshot()));
    }

    loop {
        turns += show_events(game.take_events(), game, verbose);
        if game.is_finished() {
            break;
        }
        if turns >= max_turns {
            tracing::info!(turns, "turn limit reached");
            break;
        }

        let tasks = game.take_tasks();
        if !tasks.is_empty() {
            let human_long_move = game
                .long_move()
                .is_some_and(|cursor| !game.controller(cursor.mover()).is_computer());
            if human_long_move && input_open {
                input_open = run_interruptible(game, tasks, &mut input).await?;
            } else {
                run_scheduled(game, tasks).await;
            }
            continue;
        }

        // Nothing scheduled: the side to move is a human
        read_human(game, &mut input).await?;
    }

    Ok(GameRecord {
        winner: game.winner(),
        turns,
        red_pebbles: game.board().count(Player::Red),
        black_pebbles: game.board().count(Player::Black),
        moves: game.history().to_vec(),
    })
}

fn report(record: &GameRecord, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(record)?);
        return Ok(());
    }

    match record.winner {
        Some(winner) => println!("{} wins after {} turns", winner, record.turns),
        None => println!("No winner after {} turns", record.turns),
    }
    println!(
        "Pebbles left: Red {}, Black {} ({} moves)",
        record.red_pebbles,
        record.black_pebbles,
        record.moves.len()
    );
    Ok(())
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

/// Wait out each task's delay, then run it
async fn run_scheduled(game: &mut Game, tasks: Vec<Scheduled>) {
    for scheduled in tasks {
        if !scheduled.delay.is_zero() {
            tokio::time::sleep(scheduled.delay).await;
        }
        if let Err(err) = game.run_task(scheduled.task) {
            tracing::debug!(%err, task = ?scheduled.task, "task skipped");
        }
    }
}

/// Run a human's long-move steps while listening for a line that cuts in
/// (usually `F`). Returns whether input is still open.
async fn run_interruptible<R>(game: &mut Game, tasks: Vec<Scheduled>, input: &mut Lines<R>) -> Result<bool>
where
    R: AsyncBufRead + Unpin,
{
    let player = game.turn();
    let mut open = true;
    for scheduled in tasks {
        if open {
            tokio::select! {
                biased;
                line = input.next_line() => {
                    match line.context("Failed to read move")? {
                        Some(line) => {
                            apply_line(game, player, &line);
                            if game.long_move().is_some() {
                                tokio::time::sleep(scheduled.delay).await;
                            }
                        }
                        None => open = false,
                    }
                }
                _ = tokio::time::sleep(scheduled.delay) => {}
            }
        } else if !scheduled.delay.is_zero() {
            tokio::time::sleep(scheduled.delay).await;
        }

        // A stop above leaves this step stale
        if let Err(err) = game.run_task(scheduled.task) {
            tracing::debug!(%err, task = ?scheduled.task, "task skipped");
        }
    }
    Ok(open)
}

/// Read lines until one is accepted for the side to move
async fn read_human<R>(game: &mut Game, input: &mut Lines<R>) -> Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let player = game.turn();
    loop {
        println!("{} to move:", player);
        let Some(line) = input.next_line().await.context("Failed to read move")? else {
            tracing::warn!(player = %player, "input closed, resigning");
            game.resign(player)?;
            return Ok(());
        };
        if line.trim().is_empty() {
            continue;
        }

        if apply_line(game, player, &line) {
            return Ok(());
        }
    }
}

/// Deliver one typed line for `player`; false if it was rejected
fn apply_line(game: &mut Game, player: Player, line: &str) -> bool {
    let mut peer = RemotePeer::new(game, player);
    match handle_line(line, &mut peer) {
        Ok(_) => true,
        Err(err) => {
            println!("Rejected: {}", err);
            false
        }
    }
}

/// Print events and count the turns they complete
fn show_events(events: Vec<Event>, game: &Game, verbose: bool) -> usize {
    let mut turns = 0;
    for event in &events {
        match event {
            Event::MoveApplied { mv: Move::Simple { .. }, .. } | Event::LongMoveEnded { .. } => turns += 1,
            _ => {}
        }
        if verbose {
            println!("{}", render::event(event));
        }
    }
    if verbose && turns > 0 {
        println!("{}", render::board(&game.snapshot()));
    }
    turns
}

#[cfg(test)]
mod tests {
    use super::*;
    use permainan_core::{Board, Cell, PebbleLookup};

    fn human_game() -> Game {
        let board = Board::from_pebbles(&[(Cell::new(1, 2), Player::Red), (Cell::new(4, 4), Player::Black)]);
        let config = GameConfig {
            pacing: Pacing::instant(),
            ..GameConfig::default()
        };
        Game::with_board(board, Controller::human(), Controller::human(), &config)
    }

    fn lines(text: &'static str) -> Lines<BufReader<&'static [u8]>> {
        BufReader::new(text.as_bytes()).lines()
    }

    #[tokio::test]
    async fn test_human_stops_own_long_move() {
        let mut game = human_game();
        let record = play_game(&mut game, lines("LU 1 2\nF\n"), 1, false).await.unwrap();

        assert_eq!(record.turns, 1);
        assert_eq!(game.history().len(), 1);
        assert_eq!(game.board().owner_at(Cell::new(0, 2)), Some(Player::Red));
        assert!(game.board().is_empty(Cell::new(1, 2)));
        assert_eq!(game.turn(), Player::Black);
    }

    #[tokio::test]
    async fn test_closed_input_lets_long_move_finish() {
        let mut game = human_game();
        let record = play_game(&mut game, lines("LU 1 2\n"), 1, false).await.unwrap();

        // Nobody stopped it, so the pebble ran the whole track home
        assert_eq!(record.turns, 1);
        assert_eq!(game.history().len(), 24);
        assert_eq!(game.board().owner_at(Cell::new(1, 2)), Some(Player::Red));
    }

    #[tokio::test]
    async fn test_rejected_line_keeps_long_move_running() {
        let mut game = human_game();
        play_game(&mut game, lines("LU 1 2\n1 2 1 3\nF\n"), 1, false).await.unwrap();

        // The bad line costs one step; the stop lands on the next cell
        assert_eq!(game.history().len(), 2);
        assert_eq!(game.board().owner_at(Cell::new(2, 0)), Some(Player::Red));
    }
}

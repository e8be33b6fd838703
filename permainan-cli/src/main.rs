//! Permainan CLI - Command-line interface
//!
//! Commands:
//! - play: Play a game on the terminal (AI vs AI, or a human typing wire lines)
//! - decode: Decode a single wire-protocol line

mod play;
mod render;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use permainan_core::WireMessage;

#[derive(Parser)]
#[command(name = "permainan")]
#[command(about = "Permainan pebble-capture game")]
struct Cli {
    /// Log at debug level (overridden by RUST_LOG)
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a single game
    Play(play::PlayArgs),
    /// Decode a wire-protocol line and print it
    Decode {
        /// The line, e.g. "LU 2 3"
        line: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Play(args) => play::run(args).await,
        Commands::Decode { line } => {
            let message: WireMessage = line.parse()?;
            println!("{:?}", message);
            println!("{}", message);
            Ok(())
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

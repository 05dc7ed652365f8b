//! Command-line entry point for deepmate.
//!
//! Two ways to exercise the engine:
//!
//! ```bash
//! # Play against the engine (you are Bottom by default)
//! deepmate play --depth 3 --strategy alphabeta
//!
//! # Let the engine's side be chosen and fight a deeper search
//! deepmate play --side top --depth 4 --strategy mtdf
//!
//! # Watch two strategies play each other
//! deepmate selfplay --bottom alphabeta --top mtdf --depth 3
//! ```
//!
//! Set `RUST_LOG=debug` to see per-move search scores and cache sizes.

use clap::{Parser, Subcommand};

use deepmate::game::Game;
use deepmate::search::Strategy;
use deepmate::terminal;
use deepmate::types::Player;

/// deepmate — play chess against a minimax, alpha-beta, or MTD(f) engine.
#[derive(Parser, Debug)]
#[command(name = "deepmate")]
#[command(about = "Chess against an adversarial-search engine, in the terminal")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Play a game against the engine in the terminal.
    Play {
        /// Search depth in plies.
        #[arg(short, long, default_value_t = 3)]
        depth: u32,

        /// Engine strategy: minimax, alphabeta, or mtdf.
        #[arg(short, long, default_value = "alphabeta")]
        strategy: Strategy,

        /// The side you play: top or bottom.
        #[arg(long, default_value = "bottom")]
        side: Player,
    },

    /// Watch two engines play each other.
    Selfplay {
        /// Search depth in plies, for both engines.
        #[arg(short, long, default_value_t = 3)]
        depth: u32,

        /// Strategy for the bottom side.
        #[arg(long, default_value = "alphabeta")]
        bottom: Strategy,

        /// Strategy for the top side.
        #[arg(long, default_value = "mtdf")]
        top: Strategy,

        /// Stop after this many half-moves.
        #[arg(long, default_value_t = 120)]
        max_moves: usize,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Play {
            depth,
            strategy,
            side,
        } => terminal::play(Game::new(), side, strategy, depth),
        Commands::Selfplay {
            depth,
            bottom,
            top,
            max_moves,
        } => terminal::selfplay(Game::new(), bottom, top, depth, max_moves),
    }
}

//! Driver binary for the Amazons engine.
//!
//! A thin shell over the library: it builds positions, runs timed
//! searches, and prints the moves the wire layer would transmit. Real
//! deployments embed the library behind the game-server session layer
//! instead.
//!
//! ## Usage
//!
//! - `amazons-mcts` - Search one move from the initial position
//! - `amazons-mcts demo --millis 500` - Same, with a custom budget
//! - `amazons-mcts selfplay` - Let the engine play itself to the end

use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use env_logger::Env;

use amazons_mcts::board::{Board, Side};
use amazons_mcts::mcts::{find_next_move, GameContext, SearchConfig};
use amazons_mcts::territory::Outcome;
use amazons_mcts::wire::{encode_move, extract_move};

/// Amazons MCTS engine driver
#[derive(Parser)]
#[command(name = "amazons-mcts")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Search one move from the initial position and print it
    Demo {
        /// Search budget per move in milliseconds
        #[arg(long, default_value_t = 500)]
        millis: u64,
        /// RNG seed; omit for a fresh one
        #[arg(long)]
        seed: Option<u64>,
        /// Disable parallel playouts
        #[arg(long)]
        serial: bool,
    },
    /// Alternate searches for both sides until the game is decided
    Selfplay {
        /// Search budget per move in milliseconds
        #[arg(long, default_value_t = 200)]
        millis: u64,
        /// RNG seed; omit for a fresh one
        #[arg(long)]
        seed: Option<u64>,
        /// Disable parallel playouts
        #[arg(long)]
        serial: bool,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Selfplay {
            millis,
            seed,
            serial,
        }) => run_selfplay(millis, seed, serial),
        Some(Commands::Demo {
            millis,
            seed,
            serial,
        }) => run_demo(millis, seed, serial),
        None => run_demo(500, None, false),
    }
}

fn config_for(millis: u64, seed: Option<u64>, serial: bool) -> SearchConfig {
    let mut config = SearchConfig::default()
        .with_time_budget(Duration::from_millis(millis))
        .with_parallel(!serial);
    if let Some(seed) = seed {
        config = config.with_seed(seed);
    }
    config
}

fn run_demo(millis: u64, seed: Option<u64>, serial: bool) -> anyhow::Result<()> {
    let ctx = GameContext {
        board: Board::initial(),
        to_move: Side::Black,
    };
    println!("{}", ctx.board);

    let result = find_next_move(&ctx, &config_for(millis, seed, serial));
    let mv = extract_move(&ctx.board, &result.board)
        .context("chosen board does not diff into one move")?
        .context("no legal move from the initial position")?;

    println!("{}", result.board);
    println!("{} plays {mv} (wire {:?})", ctx.to_move, encode_move(&mv));
    println!(
        "{} iterations, {} playouts, {} expansions in {:?}",
        result.stats.iterations,
        result.stats.playouts,
        result.stats.expansions,
        result.stats.elapsed
    );
    Ok(())
}

fn run_selfplay(millis: u64, seed: Option<u64>, serial: bool) -> anyhow::Result<()> {
    let config = config_for(millis, seed, serial);
    let mut board = Board::initial();
    let mut side = Side::Black;
    let mut ply = 0u32;

    loop {
        let ctx = GameContext {
            board: board.clone(),
            to_move: side,
        };
        let result = find_next_move(&ctx, &config);
        match extract_move(&ctx.board, &result.board)
            .context("chosen board does not diff into one move")?
        {
            Some(mv) => {
                ply += 1;
                println!("ply {ply}: {side} plays {mv}");
                board = result.board;
            }
            None => {
                println!("{side} has no move and concedes");
                break;
            }
        }
        match board.check_status() {
            Outcome::InProgress => side = side.opponent(),
            Outcome::Draw => {
                println!("territory is even after {ply} plies: draw");
                break;
            }
            Outcome::Win(winner) => {
                println!("{winner} controls the larger territory after {ply} plies");
                break;
            }
        }
    }
    println!("{board}");
    Ok(())
}

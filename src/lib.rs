//! Amazons-MCTS: a move-search engine for the game of the Amazons.
//!
//! This crate provides the board model, territory-based terminal
//! evaluation, and a time-bounded Monte Carlo Tree Search that picks a
//! move. Session handling, protocol transport, and rendering live in the
//! hosting application; the crate only consumes board snapshots and
//! produces the next one.
//!
//! ## Modules
//!
//! - [`constants`] - Board geometry and engine parameters
//! - [`board`] - Core game rules (cells, queens, moves, arrows)
//! - [`territory`] - Flood-fill scoring of finished positions
//! - [`tree`] - Arena-backed search tree with UCT selection
//! - [`playout`] - Random simulation used to estimate node values
//! - [`mcts`] - The deadline-bounded search loop
//! - [`wire`] - Snapshot and move codecs for the game server
//!
//! ## Example
//!
//! ```
//! use std::time::Duration;
//!
//! use amazons_mcts::board::{Board, Side};
//! use amazons_mcts::mcts::{find_next_move, GameContext, SearchConfig};
//! use amazons_mcts::wire::extract_move;
//!
//! let ctx = GameContext {
//!     board: Board::initial(),
//!     to_move: Side::Black,
//! };
//! let config = SearchConfig::default()
//!     .with_time_budget(Duration::from_millis(50))
//!     .with_seed(7);
//! let result = find_next_move(&ctx, &config);
//!
//! // The server wants the literal (from, to, arrow) triple
//! let mv = extract_move(&ctx.board, &result.board)
//!     .expect("one-ply result diffs cleanly")
//!     .expect("the opening position has moves");
//! println!("playing {mv}");
//! ```

pub mod board;
pub mod constants;
pub mod mcts;
pub mod playout;
pub mod territory;
pub mod tree;
pub mod wire;

//! Constants for board geometry, search parameters, and the wire format.
//!
//! This module contains all the configuration constants for the Amazons
//! engine. The board uses a flat 100-cell row-major representation indexed
//! through `(row, col)` accessors.

// =============================================================================
// Board Geometry
// =============================================================================

/// Board size (NxN). Amazons is played on a 10x10 board.
pub const SIZE: usize = 10;

/// Total number of cells on the board.
pub const CELL_COUNT: usize = SIZE * SIZE;

/// Number of queens each side controls for the whole game.
pub const QUEENS_PER_SIDE: usize = 4;

/// Initial Black queen positions as 0-indexed (row, col) pairs.
pub const INITIAL_BLACK: [(usize, usize); QUEENS_PER_SIDE] =
    [(0, 6), (3, 9), (6, 9), (9, 6)];

/// Initial White queen positions as 0-indexed (row, col) pairs.
pub const INITIAL_WHITE: [(usize, usize); QUEENS_PER_SIDE] =
    [(0, 3), (3, 0), (6, 0), (9, 3)];

// =============================================================================
// Neighbor Offsets
// =============================================================================

/// Offsets to neighboring cells as (row, col) deltas, row 0 at the top,
/// ordered N, E, S, W, then the four diagonals.
pub const DIRECTIONS: [(isize, isize); 8] = [
    (-1, 0),  // North (up one row)
    (0, 1),   // East (right one column)
    (1, 0),   // South (down one row)
    (0, -1),  // West (left one column)
    (-1, 1),  // NE (diagonal)
    (1, 1),   // SE (diagonal)
    (1, -1),  // SW (diagonal)
    (-1, -1), // NW (diagonal)
];

// =============================================================================
// MCTS (Monte Carlo Tree Search) Parameters
// =============================================================================

/// UCT exploration constant, the standard bandit-derived value (~sqrt 2).
pub const EXPLORATION: f64 = 1.41;

/// Score added along the winning path during backpropagation.
pub const WIN_SCORE: i64 = 10;

/// Score added along the losing path.
pub const LOSS_SCORE: i64 = -10;

/// Score added on a draw, including depth-capped playouts.
pub const DRAW_SCORE: i64 = 0;

/// Maximum playout length in plies before the simulation is cut off.
pub const PLAYOUT_DEPTH: u32 = 50;

/// Default wall-clock budget per move: the 30 s protocol allowance minus a
/// safety margin for tree teardown and message round-trip.
pub const DEFAULT_TIME_BUDGET_MS: u64 = 28_000;

// =============================================================================
// Wire Format
// =============================================================================

/// Leading entries of a board snapshot that carry no cell data.
pub const WIRE_HEADER_LEN: usize = 12;

/// Total snapshot length: header plus one value per cell.
pub const SNAPSHOT_LEN: usize = WIRE_HEADER_LEN + CELL_COUNT;

/// Wire code for an empty cell.
pub const WIRE_EMPTY: i32 = 0;

/// Wire code for a Black queen.
pub const WIRE_BLACK: i32 = 1;

/// Wire code for a White queen.
pub const WIRE_WHITE: i32 = 2;

/// Wire code for an arrow.
pub const WIRE_ARROW: i32 = 3;

/// Length of an encoded move: three 1-indexed (row, col) pairs.
pub const MOVE_WIRE_LEN: usize = 6;

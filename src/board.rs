//! Amazons board representation and move execution.
//!
//! This module provides the core game rules, including:
//! - Board state as a flat cell array with per-side queen indexes
//! - Ray-based legal move generation
//! - Validated queen moves and arrow shots
//! - One-ply expansion into every successor state
//!
//! Rows and columns are 0-indexed internally. The `wire` module converts to
//! the 1-indexed convention used by the external game server.

use crate::constants::*;
use crate::territory::{self, Outcome};

use thiserror::Error;

/// A cell coordinate, 0-indexed from the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pos {
    pub row: usize,
    pub col: usize,
}

impl Pos {
    pub fn new(row: usize, col: usize) -> Self {
        Pos { row, col }
    }

    /// Whether the coordinate lies on the board.
    pub fn in_bounds(self) -> bool {
        self.row < SIZE && self.col < SIZE
    }

    /// Apply a (row, col) delta, returning `None` when the result leaves
    /// the board.
    pub fn offset(self, delta: (isize, isize)) -> Option<Pos> {
        let row = self.row as isize + delta.0;
        let col = self.col as isize + delta.1;
        if row < 0 || row >= SIZE as isize || col < 0 || col >= SIZE as isize {
            return None;
        }
        Some(Pos::new(row as usize, col as usize))
    }

    /// Index into a flat row-major cell array.
    pub(crate) fn index(self) -> usize {
        self.row * SIZE + self.col
    }
}

impl std::fmt::Display for Pos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// One of the two players.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Black,
    White,
}

impl Side {
    pub fn opponent(self) -> Side {
        match self {
            Side::Black => Side::White,
            Side::White => Side::Black,
        }
    }

    fn index(self) -> usize {
        match self {
            Side::Black => 0,
            Side::White => 1,
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Black => write!(f, "black"),
            Side::White => write!(f, "white"),
        }
    }
}

/// Contents of one board cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Empty,
    Queen(Side),
    Arrow,
}

/// A complete turn: queen relocation plus the arrow shot from the new
/// square.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Move {
    pub from: Pos,
    pub to: Pos,
    pub arrow: Pos,
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}, arrow {}", self.from, self.to, self.arrow)
    }
}

/// Result of attempting an illegal board mutation.
///
/// During search these never occur: `legal_moves` is the sole source of
/// candidate destinations, so an error here indicates a caller defect.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MoveError {
    #[error("no {side} queen at {pos}")]
    QueenMissing { side: Side, pos: Pos },
    #[error("destination {0} not reachable along a clear ray")]
    Unreachable(Pos),
    #[error("arrow target {0} is not empty")]
    ArrowBlocked(Pos),
    #[error("cell {0} is off the board")]
    OutOfBounds(Pos),
}

/// An Amazons position.
///
/// Cells live in a flat row-major array. Queen positions are indexed per
/// side and updated incrementally on every move, so move enumeration never
/// rescans the grid. Each side owns exactly 4 queens at all times; arrows
/// are permanent.
#[derive(Debug, Clone)]
pub struct Board {
    cells: [Cell; CELL_COUNT],
    queens: [[Pos; QUEENS_PER_SIDE]; 2],
}

/// The queen index is derived from the cells, so the grid alone decides
/// equality; two boards built in different queen orders still compare
/// equal.
impl PartialEq for Board {
    fn eq(&self, other: &Self) -> bool {
        self.cells == other.cells
    }
}

impl Eq for Board {}

impl Board {
    /// The standard tournament starting arrangement.
    pub fn initial() -> Board {
        let black = INITIAL_BLACK.map(|(r, c)| Pos::new(r, c));
        let white = INITIAL_WHITE.map(|(r, c)| Pos::new(r, c));
        let mut cells = [Cell::Empty; CELL_COUNT];
        for p in black {
            cells[p.index()] = Cell::Queen(Side::Black);
        }
        for p in white {
            cells[p.index()] = Cell::Queen(Side::White);
        }
        Board {
            cells,
            queens: [black, white],
        }
    }

    /// Assemble a board from parts the caller has already validated.
    ///
    /// `queens` must agree with the queen cells in `cells`; the wire layer
    /// checks this while decoding a snapshot.
    pub(crate) fn from_parts(
        cells: [Cell; CELL_COUNT],
        queens: [[Pos; QUEENS_PER_SIDE]; 2],
    ) -> Board {
        Board { cells, queens }
    }

    /// Contents of the cell at `pos`.
    pub fn cell(&self, pos: Pos) -> Cell {
        self.cells[pos.index()]
    }

    /// Current positions of `side`'s four queens.
    pub fn queens(&self, side: Side) -> [Pos; QUEENS_PER_SIDE] {
        self.queens[side.index()]
    }

    /// Every cell a queen standing at `from` could reach: the empty cells
    /// along the 8 rays, each ray stopping at the first obstruction or the
    /// board edge. `from` itself need not hold a queen, so the same scan
    /// serves arrow placement from a just-moved queen's square.
    ///
    /// Ray order is North, East, South, West, NE, SE, SW, NW; within a ray,
    /// nearest cell first.
    pub fn legal_moves(&self, from: Pos) -> Vec<Pos> {
        let mut moves = Vec::new();
        for delta in DIRECTIONS {
            let mut cur = from;
            while let Some(next) = cur.offset(delta) {
                if self.cells[next.index()] != Cell::Empty {
                    break;
                }
                moves.push(next);
                cur = next;
            }
        }
        moves
    }

    /// Check that `to` is reachable from `from` along one unobstructed ray.
    fn ray_clear(&self, from: Pos, to: Pos) -> bool {
        let row_span = to.row as isize - from.row as isize;
        let col_span = to.col as isize - from.col as isize;
        if row_span == 0 && col_span == 0 {
            return false;
        }
        if row_span != 0 && col_span != 0 && row_span.abs() != col_span.abs() {
            return false;
        }
        let delta = (row_span.signum(), col_span.signum());
        let mut cur = from;
        while let Some(next) = cur.offset(delta) {
            if self.cells[next.index()] != Cell::Empty {
                return false;
            }
            if next == to {
                return true;
            }
            cur = next;
        }
        false
    }

    /// Relocate a queen of `side` from `from` to `to` and update the queen
    /// index.
    ///
    /// # Errors
    /// Fails when `from` does not hold a queen of `side`, or `to` is not
    /// reachable along an unobstructed ray.
    pub fn perform_move(&mut self, side: Side, from: Pos, to: Pos) -> Result<(), MoveError> {
        if !from.in_bounds() {
            return Err(MoveError::OutOfBounds(from));
        }
        if self.cells[from.index()] != Cell::Queen(side) {
            return Err(MoveError::QueenMissing { side, pos: from });
        }
        if !self.ray_clear(from, to) {
            return Err(MoveError::Unreachable(to));
        }
        self.cells[from.index()] = Cell::Empty;
        self.cells[to.index()] = Cell::Queen(side);
        for q in self.queens[side.index()].iter_mut() {
            if *q == from {
                *q = to;
                break;
            }
        }
        Ok(())
    }

    /// Place an arrow at `to`, which must be an empty cell.
    ///
    /// Valid only immediately after `perform_move`, with `to` taken from
    /// `legal_moves` of the queen's new square.
    pub fn shoot_arrow(&mut self, to: Pos) -> Result<(), MoveError> {
        if !to.in_bounds() {
            return Err(MoveError::OutOfBounds(to));
        }
        if self.cells[to.index()] != Cell::Empty {
            return Err(MoveError::ArrowBlocked(to));
        }
        self.cells[to.index()] = Cell::Arrow;
        Ok(())
    }

    /// Apply a complete transmitted turn: queen relocation plus arrow.
    ///
    /// Used to ingest the opponent's move decoded by the wire layer.
    pub fn apply_move(&mut self, side: Side, mv: &Move) -> Result<(), MoveError> {
        self.perform_move(side, mv.from, mv.to)?;
        self.shoot_arrow(mv.arrow)
    }

    /// The full one-ply expansion for `side`: one successor board per
    /// (queen, destination, arrow) combination.
    ///
    /// The length of this sequence is the branching factor at the node and
    /// the dominant cost of the search, commonly 1,000+ states per ply in
    /// the opening.
    pub fn all_possible_states(&self, side: Side) -> Vec<Board> {
        let mut states = Vec::new();
        for from in self.queens(side) {
            for to in self.legal_moves(from) {
                let mut moved = self.clone();
                if moved.perform_move(side, from, to).is_err() {
                    continue;
                }
                for arrow in moved.legal_moves(to) {
                    let mut next = moved.clone();
                    if next.shoot_arrow(arrow).is_ok() {
                        states.push(next);
                    }
                }
            }
        }
        states
    }

    /// True when the queen at `pos` has at least one empty neighbor.
    pub(crate) fn queen_can_move(&self, pos: Pos) -> bool {
        DIRECTIONS
            .iter()
            .any(|&d| matches!(pos.offset(d), Some(n) if self.cells[n.index()] == Cell::Empty))
    }

    /// True when any queen of `side` can still move.
    ///
    /// A queen with an empty neighbor always has a full legal turn: after
    /// stepping there it can shoot the square it vacated.
    pub fn has_any_move(&self, side: Side) -> bool {
        self.queens(side).iter().any(|&q| self.queen_can_move(q))
    }

    /// Evaluate whether the game is over and which side holds more
    /// territory. See the `territory` module for the algorithm.
    pub fn check_status(&self) -> Outcome {
        territory::evaluate(self)
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in 0..SIZE {
            for col in 0..SIZE {
                let ch = match self.cells[row * SIZE + col] {
                    Cell::Empty => '.',
                    Cell::Queen(Side::Black) => 'B',
                    Cell::Queen(Side::White) => 'W',
                    Cell::Arrow => '#',
                };
                if col > 0 {
                    write!(f, " ")?;
                }
                write!(f, "{ch}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Build a board from ten 10-character rows of `.`, `B`, `W`, `#`.
///
/// Panics unless each side ends up with exactly 4 queens.
#[cfg(test)]
pub(crate) fn board_from(rows: [&str; SIZE]) -> Board {
    let mut cells = [Cell::Empty; CELL_COUNT];
    let mut black = Vec::new();
    let mut white = Vec::new();
    for (r, row) in rows.iter().enumerate() {
        assert_eq!(row.len(), SIZE, "row {r} must have {SIZE} cells");
        for (c, ch) in row.chars().enumerate() {
            let pos = Pos::new(r, c);
            cells[pos.index()] = match ch {
                '.' => Cell::Empty,
                'B' => {
                    black.push(pos);
                    Cell::Queen(Side::Black)
                }
                'W' => {
                    white.push(pos);
                    Cell::Queen(Side::White)
                }
                '#' => Cell::Arrow,
                other => panic!("unknown cell char {other:?}"),
            };
        }
    }
    let black: [Pos; QUEENS_PER_SIDE] = black.try_into().expect("need 4 Black queens");
    let white: [Pos; QUEENS_PER_SIDE] = white.try_into().expect("need 4 White queens");
    Board::from_parts(cells, [black, white])
}

//! Codecs for the external game-server formats.
//!
//! The server ships the board as a flat integer list: a 12-entry header
//! the core ignores, then 100 row-major cell codes, 1-indexed on the
//! producer side. Moves travel as six integers, three 1-indexed
//! (row, col) pairs. This module re-indexes to the crate's 0-based `Pos`
//! on the way in and back to 1-indexed on the way out, and recovers a
//! transmitted move by diffing two board snapshots.

use thiserror::Error;

use crate::board::{Board, Cell, Move, Pos, Side};
use crate::constants::*;

/// Wire data that cannot be reconciled with a valid position or move.
///
/// All of these are fatal: they mean the board representation and the
/// server disagree, and guessing could transmit an illegal move.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("list has {actual} entries, expected {expected}")]
    InvalidLength { expected: usize, actual: usize },
    /// `row` and `col` are 1-indexed, matching the producer's convention.
    #[error("unknown cell code {code} at row {row}, col {col}")]
    UnknownCell { code: i32, row: usize, col: usize },
    #[error("{side} has {count} queens, expected {expected}")]
    QueenCount {
        side: Side,
        count: usize,
        expected: usize,
    },
    #[error("coordinate {0} lies outside the board")]
    CoordinateRange(i32),
    #[error(
        "snapshot diff is not one move: {vacated} vacated, {occupied} occupied, \
         {arrowed} arrowed, {invalid} invalid transitions"
    )]
    InconsistentDiff {
        vacated: usize,
        occupied: usize,
        arrowed: usize,
        invalid: usize,
    },
    #[error("vacated and occupied cells belong to different sides")]
    SideMismatch,
}

/// Rebuild a board from the server's flat snapshot.
///
/// The length must be exactly header plus grid, every cell code must be
/// known, and each side must field exactly 4 queens.
pub fn decode_snapshot(raw: &[i32]) -> Result<Board, DecodeError> {
    if raw.len() != SNAPSHOT_LEN {
        return Err(DecodeError::InvalidLength {
            expected: SNAPSHOT_LEN,
            actual: raw.len(),
        });
    }
    let mut cells = [Cell::Empty; CELL_COUNT];
    let mut black = Vec::with_capacity(QUEENS_PER_SIDE);
    let mut white = Vec::with_capacity(QUEENS_PER_SIDE);
    for (i, &code) in raw[WIRE_HEADER_LEN..].iter().enumerate() {
        let pos = Pos::new(i / SIZE, i % SIZE);
        cells[i] = match code {
            WIRE_EMPTY => Cell::Empty,
            WIRE_BLACK => {
                black.push(pos);
                Cell::Queen(Side::Black)
            }
            WIRE_WHITE => {
                white.push(pos);
                Cell::Queen(Side::White)
            }
            WIRE_ARROW => Cell::Arrow,
            code => {
                return Err(DecodeError::UnknownCell {
                    code,
                    row: pos.row + 1,
                    col: pos.col + 1,
                });
            }
        };
    }
    let black = queen_array(black, Side::Black)?;
    let white = queen_array(white, Side::White)?;
    Ok(Board::from_parts(cells, [black, white]))
}

fn queen_array(found: Vec<Pos>, side: Side) -> Result<[Pos; QUEENS_PER_SIDE], DecodeError> {
    let count = found.len();
    found.try_into().map_err(|_| DecodeError::QueenCount {
        side,
        count,
        expected: QUEENS_PER_SIDE,
    })
}

/// Recover the move that turns `before` into `after` by diffing all 100
/// cells.
///
/// A consistent move shows exactly one vacated queen cell, one newly
/// occupied queen cell of the same side, and one new arrow. A queen cell
/// that became an arrow counts as both vacated and arrowed: the queen
/// moved away and then shot its own origin. Identical snapshots are the
/// engine's concession and yield `Ok(None)`; every other pattern is a
/// fatal decode error.
pub fn extract_move(before: &Board, after: &Board) -> Result<Option<Move>, DecodeError> {
    let mut vacated: Vec<(Pos, Side)> = Vec::new();
    let mut occupied: Vec<(Pos, Side)> = Vec::new();
    let mut arrowed: Vec<Pos> = Vec::new();
    let mut invalid = 0usize;

    for row in 0..SIZE {
        for col in 0..SIZE {
            let pos = Pos::new(row, col);
            let (b, a) = (before.cell(pos), after.cell(pos));
            if b == a {
                continue;
            }
            match (b, a) {
                (Cell::Queen(s), Cell::Empty) => vacated.push((pos, s)),
                (Cell::Queen(s), Cell::Arrow) => {
                    vacated.push((pos, s));
                    arrowed.push(pos);
                }
                (Cell::Empty, Cell::Queen(s)) => occupied.push((pos, s)),
                (Cell::Empty, Cell::Arrow) => arrowed.push(pos),
                _ => invalid += 1,
            }
        }
    }

    if vacated.is_empty() && occupied.is_empty() && arrowed.is_empty() && invalid == 0 {
        return Ok(None);
    }
    if vacated.len() != 1 || occupied.len() != 1 || arrowed.len() != 1 || invalid != 0 {
        return Err(DecodeError::InconsistentDiff {
            vacated: vacated.len(),
            occupied: occupied.len(),
            arrowed: arrowed.len(),
            invalid,
        });
    }
    let (from, from_side) = vacated[0];
    let (to, to_side) = occupied[0];
    if from_side != to_side {
        return Err(DecodeError::SideMismatch);
    }
    Ok(Some(Move {
        from,
        to,
        arrow: arrowed[0],
    }))
}

/// Encode a move as the server's 6-integer list, 1-indexed:
/// `[from_row, from_col, to_row, to_col, arrow_row, arrow_col]`.
pub fn encode_move(mv: &Move) -> [i32; MOVE_WIRE_LEN] {
    [
        mv.from.row as i32 + 1,
        mv.from.col as i32 + 1,
        mv.to.row as i32 + 1,
        mv.to.col as i32 + 1,
        mv.arrow.row as i32 + 1,
        mv.arrow.col as i32 + 1,
    ]
}

/// Parse an opponent's 6-integer move list, checking length and coordinate
/// range before the board ever sees it.
pub fn decode_move(raw: &[i32]) -> Result<Move, DecodeError> {
    if raw.len() != MOVE_WIRE_LEN {
        return Err(DecodeError::InvalidLength {
            expected: MOVE_WIRE_LEN,
            actual: raw.len(),
        });
    }
    Ok(Move {
        from: Pos::new(coord(raw[0])?, coord(raw[1])?),
        to: Pos::new(coord(raw[2])?, coord(raw[3])?),
        arrow: Pos::new(coord(raw[4])?, coord(raw[5])?),
    })
}

fn coord(value: i32) -> Result<usize, DecodeError> {
    if value < 1 || value > SIZE as i32 {
        return Err(DecodeError::CoordinateRange(value));
    }
    Ok(value as usize - 1)
}

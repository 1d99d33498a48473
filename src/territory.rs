//! Territory-based terminal-state evaluation.
//!
//! Decides whether a position is still in progress without generating its
//! move tree. A flood fill through empty cells runs from every mobile
//! queen; the moment a filled region borders an opposing queen that can
//! still move, the position is live. Once both sides' regions are sealed
//! off from each other, the side with strictly more reachable empty cells
//! wins, and equal totals are a draw.

use crate::board::{Board, Cell, Pos, Side};
use crate::constants::*;

/// Verdict of the terminal-state evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Some queen can still reach a mobile opposing queen.
    InProgress,
    /// Terminal with equal territory totals.
    Draw,
    /// Terminal with this side holding strictly more territory.
    Win(Side),
}

/// Evaluate a position: `InProgress` while the sides can still reach each
/// other, otherwise the territory comparison.
pub fn evaluate(board: &Board) -> Outcome {
    let black = match side_territory(board, Side::Black) {
        Some(count) => count,
        None => return Outcome::InProgress,
    };
    let white = match side_territory(board, Side::White) {
        Some(count) => count,
        None => return Outcome::InProgress,
    };
    match black.cmp(&white) {
        std::cmp::Ordering::Greater => Outcome::Win(Side::Black),
        std::cmp::Ordering::Less => Outcome::Win(Side::White),
        std::cmp::Ordering::Equal => Outcome::Draw,
    }
}

/// Count the empty cells reachable by `side`'s queens, or `None` when a
/// reachable cell (or a queen itself) borders an opposing queen that can
/// still move.
///
/// One visited grid is shared by all four queens, so a region reachable
/// from several of them is credited once. An immobile queen seeds no
/// fill; an immobile opposing queen on the border does not end the scan.
fn side_territory(board: &Board, side: Side) -> Option<usize> {
    let mut visited = [false; CELL_COUNT];
    let mut count = 0usize;
    for queen in board.queens(side) {
        if !board.queen_can_move(queen) {
            continue;
        }
        // The queen's own square seeds the fill; only empty cells enter
        // the stack after it.
        let mut stack: Vec<Pos> = vec![queen];
        while let Some(pos) = stack.pop() {
            for delta in DIRECTIONS {
                let Some(next) = pos.offset(delta) else {
                    continue;
                };
                match board.cell(next) {
                    Cell::Empty => {
                        if !visited[next.index()] {
                            visited[next.index()] = true;
                            count += 1;
                            stack.push(next);
                        }
                    }
                    Cell::Queen(other) if other != side => {
                        if board.queen_can_move(next) {
                            return None;
                        }
                    }
                    _ => {}
                }
            }
        }
    }
    Some(count)
}

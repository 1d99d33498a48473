//! Random playout simulation.
//!
//! Estimates a position's value by playing random moves until the game is
//! decided or a depth cap is reached. Each ply samples a movable queen,
//! then a destination, then an arrow square, all uniformly. The RNG is an
//! explicit instance handed in by the caller, so playouts replay exactly
//! under a fixed seed.

use fastrand::Rng;

use crate::board::{Board, Pos, Side};
use crate::territory::Outcome;

/// Play random moves from `board`, `to_move` first, until the position is
/// decided or `depth_cap` plies have been played. A cut-off simulation
/// counts as a draw.
pub fn simulate(board: &Board, to_move: Side, rng: &mut Rng, depth_cap: u32) -> Outcome {
    let mut board = board.clone();
    let mut side = to_move;
    for _ in 0..depth_cap {
        match board.check_status() {
            Outcome::InProgress => {}
            decided => return decided,
        }
        if !random_step(&mut board, side, rng) {
            // the side on turn has no move: it has lost
            return Outcome::Win(side.opponent());
        }
        side = side.opponent();
    }
    match board.check_status() {
        Outcome::InProgress => Outcome::Draw,
        decided => decided,
    }
}

/// Play one random ply for `side`. Returns false when no queen of `side`
/// can move.
fn random_step(board: &mut Board, side: Side, rng: &mut Rng) -> bool {
    let movable: Vec<(Pos, Vec<Pos>)> = board
        .queens(side)
        .into_iter()
        .map(|q| (q, board.legal_moves(q)))
        .filter(|(_, moves)| !moves.is_empty())
        .collect();
    if movable.is_empty() {
        return false;
    }
    let (from, moves) = &movable[rng.usize(..movable.len())];
    let to = moves[rng.usize(..moves.len())];
    if board.perform_move(side, *from, to).is_err() {
        return false;
    }
    let arrows = board.legal_moves(to);
    if arrows.is_empty() {
        return false;
    }
    let arrow = arrows[rng.usize(..arrows.len())];
    board.shoot_arrow(arrow).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::board_from;
    use crate::constants::PLAYOUT_DEPTH;

    #[test]
    fn test_simulate_never_reports_open() {
        let board = Board::initial();
        let mut rng = Rng::with_seed(7);
        let outcome = simulate(&board, Side::Black, &mut rng, PLAYOUT_DEPTH);
        assert_ne!(outcome, Outcome::InProgress);
    }

    #[test]
    fn test_simulate_replays_under_fixed_seed() {
        let board = Board::initial();
        let a = simulate(&board, Side::Black, &mut Rng::with_seed(42), PLAYOUT_DEPTH);
        let b = simulate(&board, Side::Black, &mut Rng::with_seed(42), PLAYOUT_DEPTH);
        assert_eq!(a, b);
    }

    #[test]
    fn test_simulate_returns_decided_position_unplayed() {
        let board = board_from([
            "BBBB######",
            "##########",
            "..........",
            "...WWWW...",
            "..........",
            "..........",
            "..........",
            "..........",
            "..........",
            "..........",
        ]);
        let outcome = simulate(&board, Side::Black, &mut Rng::with_seed(1), PLAYOUT_DEPTH);
        assert_eq!(outcome, Outcome::Win(Side::White));
    }

    #[test]
    fn test_simulate_zero_cap_scores_open_game_as_draw() {
        let outcome = simulate(&Board::initial(), Side::Black, &mut Rng::with_seed(1), 0);
        assert_eq!(outcome, Outcome::Draw);
    }
}

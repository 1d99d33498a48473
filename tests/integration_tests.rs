//! Integration tests for amazons-mcts
//!
//! Every fixture is a 10-row ASCII picture (`.` empty, `B` black queen,
//! `W` white queen, `#` arrow) converted into a board through the raw
//! snapshot codec, so each test also exercises ingestion. Search tests
//! pin the seed, run serially unless the test is about parallelism, and
//! keep timing assertions generous.

use std::time::Duration;

use amazons_mcts::board::{Board, Cell, Move, Pos, Side};
use amazons_mcts::constants::{
    QUEENS_PER_SIDE, SIZE, SNAPSHOT_LEN, WIRE_ARROW, WIRE_BLACK, WIRE_EMPTY, WIRE_HEADER_LEN,
    WIRE_WHITE,
};
use amazons_mcts::mcts::{GameContext, SearchConfig, find_next_move};
use amazons_mcts::territory::Outcome;
use amazons_mcts::wire::{decode_move, decode_snapshot, encode_move, extract_move};

// =============================================================================
// Helper functions for building fixture boards
// =============================================================================

/// Encode a 10-row ASCII picture as a raw snapshot: the ignored header
/// followed by one code per cell in row-major order.
fn snapshot_of(rows: [&str; SIZE]) -> Vec<i32> {
    let mut raw = vec![0i32; WIRE_HEADER_LEN];
    for row in rows {
        assert_eq!(row.len(), SIZE, "fixture row must span the board");
        for ch in row.chars() {
            raw.push(match ch {
                '.' => WIRE_EMPTY,
                'B' => WIRE_BLACK,
                'W' => WIRE_WHITE,
                '#' => WIRE_ARROW,
                other => panic!("unknown fixture cell {other:?}"),
            });
        }
    }
    assert_eq!(raw.len(), SNAPSHOT_LEN);
    raw
}

/// Decode an ASCII picture into a board through the snapshot codec.
fn board_of(rows: [&str; SIZE]) -> Board {
    decode_snapshot(&snapshot_of(rows)).expect("fixture snapshot must decode")
}

/// Number of grid cells holding exactly `want`.
fn count_cells(board: &Board, want: Cell) -> usize {
    let mut n = 0;
    for row in 0..SIZE {
        for col in 0..SIZE {
            if board.cell(Pos::new(row, col)) == want {
                n += 1;
            }
        }
    }
    n
}

/// The tournament starting arrangement, spelled out as a picture.
const INITIAL_ROWS: [&str; SIZE] = [
    "...W..B...",
    "..........",
    "..........",
    "W........B",
    "..........",
    "..........",
    "W........B",
    "..........",
    "..........",
    "...W..B...",
];

// =============================================================================
// Snapshot ingestion
// =============================================================================

#[test]
fn test_decode_snapshot_matches_initial_board() {
    let board = board_of(INITIAL_ROWS);

    assert_eq!(board, Board::initial(), "picture and constructor must agree");
    assert_eq!(
        board.check_status(),
        Outcome::InProgress,
        "the starting position is undecided"
    );
    for side in [Side::Black, Side::White] {
        for queen in board.queens(side) {
            assert_eq!(
                board.cell(queen),
                Cell::Queen(side),
                "queen index must point at a {side} queen cell"
            );
        }
    }
}

// =============================================================================
// Move generation
// =============================================================================

#[test]
fn test_legal_moves_agree_with_perform_move() {
    let board = Board::initial();
    let from = Pos::new(0, 6);
    let reachable = board.legal_moves(from);

    assert_eq!(
        reachable.len(),
        20,
        "the queen at {from} has 20 destinations at the start"
    );

    // The generator and the mover must accept exactly the same targets.
    for row in 0..SIZE {
        for col in 0..SIZE {
            let target = Pos::new(row, col);
            let mut probe = board.clone();
            let accepted = probe.perform_move(Side::Black, from, target).is_ok();
            assert_eq!(
                reachable.contains(&target),
                accepted,
                "generator and mover disagree about {target}"
            );
        }
    }
}

#[test]
fn test_boxed_queen_has_no_moves() {
    let board = board_of([
        "BBBB######",
        "##########",
        "..........",
        "..........",
        "..........",
        "..........",
        "..........",
        "..........",
        "..........",
        "W..W..W..W",
    ]);

    for queen in board.queens(Side::Black) {
        assert!(
            board.legal_moves(queen).is_empty(),
            "sealed queen at {queen} must have no destinations"
        );
    }
    assert!(!board.has_any_move(Side::Black), "black is fully blocked");
    assert!(board.has_any_move(Side::White), "white is still mobile");
}

#[test]
fn test_initial_branching_factor() {
    let board = Board::initial();

    // 2176 full moves per side at the start, a known property of the
    // 10x10 game.
    assert_eq!(board.all_possible_states(Side::Black).len(), 2176);
    assert_eq!(board.all_possible_states(Side::White).len(), 2176);
}

#[test]
fn test_state_count_matches_per_move_arrow_sum() {
    // An asymmetric middle-game position reached by two applied moves.
    let mut board = Board::initial();
    board
        .apply_move(
            Side::Black,
            &Move {
                from: Pos::new(0, 6),
                to: Pos::new(0, 4),
                arrow: Pos::new(5, 4),
            },
        )
        .expect("black opening move must apply");
    board
        .apply_move(
            Side::White,
            &Move {
                from: Pos::new(3, 0),
                to: Pos::new(5, 2),
                arrow: Pos::new(4, 2),
            },
        )
        .expect("white reply must apply");

    // Successor count is the sum over every queen relocation of the
    // arrow choices available from the landing square.
    let mut expected = 0usize;
    for queen in board.queens(Side::Black) {
        for dest in board.legal_moves(queen) {
            let mut moved = board.clone();
            moved
                .perform_move(Side::Black, queen, dest)
                .expect("generated destination must apply");
            expected += moved.legal_moves(dest).len();
        }
    }

    assert_eq!(
        board.all_possible_states(Side::Black).len(),
        expected,
        "successor enumeration must cover every move and arrow pair exactly once"
    );
}

// =============================================================================
// Wire round-trips
// =============================================================================

#[test]
fn test_move_extraction_round_trip() {
    let before = Board::initial();
    let mv = Move {
        from: Pos::new(0, 6),
        to: Pos::new(4, 6),
        arrow: Pos::new(4, 0),
    };

    let mut after = before.clone();
    after.apply_move(Side::Black, &mv).expect("move must apply");

    let extracted = extract_move(&before, &after)
        .expect("a played move must diff cleanly")
        .expect("the boards differ, so a move must be found");
    assert_eq!(extracted, mv, "diffing must recover the applied move");

    let decoded = decode_move(&encode_move(&mv)).expect("encoded move must decode");
    assert_eq!(decoded, mv, "wire form must round-trip");
}

#[test]
fn test_extraction_handles_arrow_on_vacated_square() {
    let before = Board::initial();
    let mv = Move {
        from: Pos::new(0, 6),
        to: Pos::new(0, 7),
        arrow: Pos::new(0, 6),
    };

    let mut after = before.clone();
    after
        .apply_move(Side::Black, &mv)
        .expect("shooting the origin must be legal");
    assert_eq!(after.cell(Pos::new(0, 6)), Cell::Arrow);

    let extracted = extract_move(&before, &after)
        .expect("queen-to-arrow transition must still diff as one move")
        .expect("the boards differ, so a move must be found");
    assert_eq!(extracted, mv);
}

// =============================================================================
// Territory evaluation
// =============================================================================

#[test]
fn test_sealed_pocket_counts_for_neither_side() {
    // Black's half holds 27 reachable empty cells plus a 2-cell pocket
    // sealed off by arrows; White's half holds 28. If the pocket were
    // credited to Black the count would read 29 and flip the result.
    let board = board_of([
        "BBBB......",
        ".......###",
        ".......#..",
        ".......###",
        "##########",
        "########..",
        "########..",
        "##........",
        "..........",
        "WWWW......",
    ]);

    assert_eq!(
        board.check_status(),
        Outcome::Win(Side::White),
        "unreachable pocket cells must not count as territory"
    );
}

// =============================================================================
// Engine end-to-end
// =============================================================================

#[test]
fn test_search_plays_legal_move_within_budget() {
    let ctx = GameContext {
        board: Board::initial(),
        to_move: Side::Black,
    };
    let config = SearchConfig::for_testing();

    let result = find_next_move(&ctx, &config);

    let states = ctx.board.all_possible_states(Side::Black);
    assert!(
        states.contains(&result.board),
        "the chosen board must be a legal successor"
    );
    assert!(
        result.stats.elapsed < Duration::from_secs(2),
        "a 50 ms budget must not run for {:?}",
        result.stats.elapsed
    );
    assert!(result.stats.iterations >= 1, "the loop always runs once");

    // The diff must be one queen relocation plus one arrow.
    let mv = extract_move(&ctx.board, &result.board)
        .expect("result must differ by a single move")
        .expect("the engine has legal moves, so it must play");
    assert!(
        ctx.board.queens(Side::Black).contains(&mv.from),
        "the moved piece must start on a black queen square"
    );
    assert!(
        result.board.queens(Side::Black).contains(&mv.to),
        "the moved piece must land where the result says"
    );
    assert_eq!(result.board.cell(mv.arrow), Cell::Arrow);
}

#[test]
fn test_parallel_search_plays_legal_move() {
    let ctx = GameContext {
        board: Board::initial(),
        to_move: Side::White,
    };
    let config = SearchConfig::for_testing().with_parallel(true);

    let result = find_next_move(&ctx, &config);

    assert!(
        ctx.board
            .all_possible_states(Side::White)
            .contains(&result.board),
        "parallel playouts must still yield a legal successor"
    );
}

#[test]
fn test_search_finds_the_forced_move() {
    // One black queen sits in a corridor with a single destination and a
    // single arrow square (its own origin); the other three are sealed.
    // The white queen beside the corridor keeps the game undecided.
    let before = board_of([
        "B.W.......",
        "###.......",
        "..........",
        "..........",
        "...WWW....",
        "..........",
        "..........",
        "..........",
        "##########",
        "B#B#B#####",
    ]);
    assert_eq!(
        before.check_status(),
        Outcome::InProgress,
        "white's mobile queen next to the corridor keeps the game open"
    );
    let ctx = GameContext {
        board: before.clone(),
        to_move: Side::Black,
    };

    let result = find_next_move(&ctx, &SearchConfig::for_testing());

    let mv = extract_move(&before, &result.board)
        .expect("result must differ by a single move")
        .expect("a mobile queen remains, so the engine must play");
    assert_eq!(
        mv,
        Move {
            from: Pos::new(0, 0),
            to: Pos::new(0, 1),
            arrow: Pos::new(0, 0),
        },
        "exactly one full move exists in this position"
    );
}

#[test]
fn test_search_concedes_when_fully_blocked() {
    let board = board_of([
        "BBBB######",
        "##########",
        "..........",
        "..........",
        "..........",
        "..........",
        "..........",
        "..........",
        "..........",
        "W..W..W..W",
    ]);
    assert!(
        !board.has_any_move(Side::Black),
        "fixture seals every black queen"
    );
    let ctx = GameContext {
        board: board.clone(),
        to_move: Side::Black,
    };

    let result = find_next_move(&ctx, &SearchConfig::for_testing());

    assert_eq!(
        result.board, board,
        "a blocked side concedes by returning the position unchanged"
    );
    assert_eq!(
        result.stats.expansions, 0,
        "no node may be expanded for a position with no moves"
    );
    assert_eq!(result.stats.playouts, 0);
    assert_eq!(
        extract_move(&board, &result.board),
        Ok(None),
        "an unchanged snapshot is the concession signal"
    );
}

#[test]
fn test_fixed_seed_replays_identically() {
    let ctx = GameContext {
        board: Board::initial(),
        to_move: Side::Black,
    };
    // A long budget keeps the iteration cap as the only stopping rule.
    let config = SearchConfig::for_testing()
        .with_time_budget(Duration::from_secs(30))
        .with_seed(7)
        .with_max_iterations(60);

    let first = find_next_move(&ctx, &config);
    let second = find_next_move(&ctx, &config);

    assert_eq!(first.stats.iterations, 60, "the cap must stop the loop");
    assert_eq!(
        first.board, second.board,
        "same seed and iteration cap must replay the same search"
    );
    assert_eq!(first.stats.playouts, second.stats.playouts);
    assert_eq!(first.stats.expansions, second.stats.expansions);
}

#[test]
fn test_piece_counts_stay_stable_across_a_game() {
    // Play a few engine moves for both sides: queen cells are conserved
    // and exactly one arrow lands per ply.
    let mut ctx = GameContext {
        board: Board::initial(),
        to_move: Side::Black,
    };
    let config = SearchConfig::for_testing().with_max_iterations(20);

    for ply in 1..=4 {
        let result = find_next_move(&ctx, &config);
        let mv = extract_move(&ctx.board, &result.board)
            .expect("result must differ by a single move")
            .expect("early positions always have moves");
        assert!(
            ctx.board.queens(ctx.to_move).contains(&mv.from),
            "the engine may only move its own queen"
        );
        assert_eq!(
            count_cells(&result.board, Cell::Queen(Side::Black)),
            QUEENS_PER_SIDE,
            "black queens are never captured"
        );
        assert_eq!(
            count_cells(&result.board, Cell::Queen(Side::White)),
            QUEENS_PER_SIDE,
            "white queens are never captured"
        );
        assert_eq!(
            count_cells(&result.board, Cell::Arrow),
            ply,
            "each ply adds exactly one arrow"
        );
        ctx = GameContext {
            board: result.board,
            to_move: ctx.to_move.opponent(),
        };
    }
}

// =============================================================================
// Selection arithmetic
// =============================================================================

#[test]
fn test_uct_prefers_unvisited_children() {
    use amazons_mcts::tree::uct_value;

    let unvisited = uct_value(10, 0, 0, 1.41);
    let visited = uct_value(10, i64::MAX, 1, 1.41);

    assert!(
        unvisited.is_infinite(),
        "zero visits must rank above anything"
    );
    assert!(
        unvisited > visited,
        "an unvisited child outranks even a maximally scored one"
    );
}

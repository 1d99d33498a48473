//! Monte Carlo tree search over Amazons positions.
//!
//! `find_next_move` runs the select / expand / simulate / backpropagate
//! loop against a wall-clock deadline and returns the root child with the
//! highest accumulated score. Playouts for freshly expanded children run
//! serially or fan out over the rayon pool. Every invocation builds its
//! own tree and RNGs from the supplied context and config, so concurrent
//! searches never interfere.

use std::time::{Duration, Instant};

use fastrand::Rng;
use log::{debug, info};
use rayon::prelude::*;

use crate::board::{Board, Side};
use crate::constants::*;
use crate::playout;
use crate::territory::Outcome;
use crate::tree::{NodeId, SearchTree};

/// The position handed to the engine and the side it should move.
#[derive(Debug, Clone)]
pub struct GameContext {
    pub board: Board,
    pub to_move: Side,
}

/// Tunables for one engine invocation.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Wall-clock budget for the whole search.
    pub time_budget: Duration,
    /// UCT exploration constant.
    pub exploration: f64,
    /// Playout cut-off in plies.
    pub playout_depth: u32,
    /// Fan playouts for freshly expanded children out over the rayon pool.
    pub parallel: bool,
    /// Seed for every RNG the search derives.
    pub seed: u64,
    /// Stop after this many iterations even before the deadline.
    pub max_iterations: Option<u64>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            time_budget: Duration::from_millis(DEFAULT_TIME_BUDGET_MS),
            exploration: EXPLORATION,
            playout_depth: PLAYOUT_DEPTH,
            parallel: true,
            seed: fastrand::u64(..),
            max_iterations: None,
        }
    }
}

impl SearchConfig {
    pub fn with_time_budget(mut self, budget: Duration) -> Self {
        self.time_budget = budget;
        self
    }

    pub fn with_exploration(mut self, exploration: f64) -> Self {
        self.exploration = exploration;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_max_iterations(mut self, cap: u64) -> Self {
        self.max_iterations = Some(cap);
        self
    }

    /// Short, serial, fixed-seed setup for tests.
    pub fn for_testing() -> Self {
        SearchConfig::default()
            .with_time_budget(Duration::from_millis(50))
            .with_parallel(false)
            .with_seed(42)
    }
}

/// Counters reported alongside the chosen move.
#[derive(Debug, Clone, Copy, Default)]
pub struct SearchStats {
    /// Select/expand/simulate/backpropagate rounds completed.
    pub iterations: u64,
    /// Playouts run, counting terminal leaves credited directly.
    pub playouts: u64,
    /// Nodes whose children were generated.
    pub expansions: u64,
    /// Wall-clock time spent inside the engine.
    pub elapsed: Duration,
}

/// The chosen successor position plus search counters.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// One ply ahead of the input, or the unchanged input when the side
    /// to move has no legal move.
    pub board: Board,
    pub stats: SearchStats,
}

/// Search for the best move under the configured deadline.
///
/// The loop always completes at least one iteration, so even an expired
/// deadline yields a legal move when one exists. A side with no legal
/// move gets its board back unchanged, with nothing expanded.
pub fn find_next_move(ctx: &GameContext, config: &SearchConfig) -> SearchResult {
    let start = Instant::now();
    let deadline = start + config.time_budget;
    let mut stats = SearchStats::default();

    if !ctx.board.has_any_move(ctx.to_move) {
        debug!("{} has no legal move, conceding", ctx.to_move);
        stats.elapsed = start.elapsed();
        return SearchResult {
            board: ctx.board.clone(),
            stats,
        };
    }

    let mut tree = SearchTree::new(ctx.board.clone(), ctx.to_move);
    let mut rng = Rng::with_seed(config.seed);

    loop {
        let leaf = tree.select_leaf(config.exploration);
        match tree.node(leaf).board.check_status() {
            Outcome::InProgress => {
                let node = tree.node(leaf);
                let states = node.board.all_possible_states(node.to_move);
                stats.expansions += 1;
                let mut fresh = Vec::with_capacity(states.len());
                for state in states {
                    fresh.push(tree.add_child(leaf, state));
                }
                if config.parallel {
                    run_parallel_playouts(&tree, &fresh, config, deadline, &mut stats);
                } else {
                    let child = fresh[rng.usize(..fresh.len())];
                    let node = tree.node(child);
                    let outcome = playout::simulate(
                        &node.board,
                        node.to_move,
                        &mut rng,
                        config.playout_depth,
                    );
                    tree.backpropagate(child, outcome);
                    stats.playouts += 1;
                }
            }
            decided => {
                // a decided leaf is credited directly, no playout needed
                tree.backpropagate(leaf, decided);
                stats.playouts += 1;
            }
        }
        stats.iterations += 1;
        if let Some(cap) = config.max_iterations {
            if stats.iterations >= cap {
                break;
            }
        }
        if Instant::now() >= deadline {
            break;
        }
    }

    let board = match tree.best_scored_child(SearchTree::ROOT) {
        Some(child) => tree.node(child).board.clone(),
        None => ctx.board.clone(),
    };
    stats.elapsed = start.elapsed();
    info!(
        "{} searched {} iterations, {} playouts, {} nodes in {:?}",
        ctx.to_move,
        stats.iterations,
        stats.playouts,
        tree.node_count(),
        stats.elapsed
    );
    SearchResult { board, stats }
}

/// One playout per fresh child, in pool-width chunks. The deadline is
/// re-checked between chunks; the first chunk always runs, so every
/// expansion gets at least one wave of results.
fn run_parallel_playouts(
    tree: &SearchTree,
    fresh: &[NodeId],
    config: &SearchConfig,
    deadline: Instant,
    stats: &mut SearchStats,
) {
    let width = rayon::current_num_threads().max(1);
    let mut first = true;
    for chunk in fresh.chunks(width) {
        if !first && Instant::now() >= deadline {
            break;
        }
        first = false;
        chunk.par_iter().for_each(|&id| {
            // per-child seed, so a fixed config seed replays no matter
            // how the pool schedules the tasks
            let mut rng = Rng::with_seed(config.seed.wrapping_add(u64::from(id.0)));
            let node = tree.node(id);
            let outcome =
                playout::simulate(&node.board, node.to_move, &mut rng, config.playout_depth);
            tree.backpropagate(id, outcome);
        });
        stats.playouts += chunk.len() as u64;
    }
}

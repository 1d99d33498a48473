//! Arena-backed search tree with per-node visit and score statistics.
//!
//! Nodes own their boards and their child lists; the parent link is a bare
//! arena index, never an owning reference, so tearing the tree down is one
//! `Vec` drop with no cycles. Visit and score counters are atomics, which
//! lets parallel playouts backpropagate through a shared `&SearchTree`.

use std::sync::atomic::{AtomicI64, AtomicU32, Ordering};

use crate::board::{Board, Side};
use crate::constants::*;
use crate::territory::Outcome;

/// Handle to a node in the tree arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Sentinel for the root's missing parent.
    pub const NONE: NodeId = NodeId(u32::MAX);

    pub fn is_none(self) -> bool {
        self == NodeId::NONE
    }

    pub fn is_some(self) -> bool {
        self != NodeId::NONE
    }
}

/// One explored position.
///
/// `parent` is a back-reference used only while walking upward during
/// backpropagation; ownership runs strictly root-to-leaf through the
/// arena.
#[derive(Debug)]
pub struct SearchNode {
    pub parent: NodeId,
    pub board: Board,
    pub to_move: Side,
    pub depth: u32,
    pub children: Vec<NodeId>,
    visits: AtomicU32,
    score: AtomicI64,
}

impl SearchNode {
    pub fn new(parent: NodeId, board: Board, to_move: Side, depth: u32) -> SearchNode {
        SearchNode {
            parent,
            board,
            to_move,
            depth,
            children: Vec::new(),
            visits: AtomicU32::new(0),
            score: AtomicI64::new(0),
        }
    }

    /// Times a playout has passed through this node.
    pub fn visits(&self) -> u32 {
        self.visits.load(Ordering::Relaxed)
    }

    /// Accumulated win/loss/draw score, judged for the side that moved
    /// into this node.
    pub fn score(&self) -> i64 {
        self.score.load(Ordering::Relaxed)
    }

    /// Add one visit carrying `delta` score.
    pub fn record(&self, delta: i64) {
        self.visits.fetch_add(1, Ordering::Relaxed);
        self.score.fetch_add(delta, Ordering::Relaxed);
    }
}

/// Arena of search nodes. Nodes are appended during expansion and never
/// removed; the whole arena drops when the search returns, so no state
/// leaks between engine invocations.
pub struct SearchTree {
    nodes: Vec<SearchNode>,
}

impl SearchTree {
    /// Id of the root node.
    pub const ROOT: NodeId = NodeId(0);

    /// Start a tree at the position under search.
    pub fn new(board: Board, to_move: Side) -> SearchTree {
        SearchTree {
            nodes: vec![SearchNode::new(NodeId::NONE, board, to_move, 0)],
        }
    }

    pub fn node(&self, id: NodeId) -> &SearchNode {
        &self.nodes[id.0 as usize]
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Attach a successor position under `parent`. The child's side to
    /// move is the parent's opponent, its depth one deeper.
    pub fn add_child(&mut self, parent: NodeId, board: Board) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        let (to_move, depth) = {
            let p = self.node(parent);
            (p.to_move.opponent(), p.depth + 1)
        };
        self.nodes.push(SearchNode::new(parent, board, to_move, depth));
        self.nodes[parent.0 as usize].children.push(id);
        id
    }

    /// Descend from the root by repeated UCT choice until a node with no
    /// children.
    pub fn select_leaf(&self, exploration: f64) -> NodeId {
        let mut id = Self::ROOT;
        while let Some(best) = self.best_uct_child(id, exploration) {
            id = best;
        }
        id
    }

    /// The child of `id` maximizing UCT, or `None` for a childless node.
    /// Ties keep the first-encountered child.
    pub fn best_uct_child(&self, id: NodeId, exploration: f64) -> Option<NodeId> {
        let node = self.node(id);
        let parent_visits = node.visits();
        let mut best: Option<(NodeId, f64)> = None;
        for &child_id in &node.children {
            let child = self.node(child_id);
            let value = uct_value(parent_visits, child.score(), child.visits(), exploration);
            match best {
                Some((_, top)) if value <= top => {}
                _ => best = Some((child_id, value)),
            }
        }
        best.map(|(id, _)| id)
    }

    /// The child of `id` with the highest accumulated score, used for the
    /// final move decision. Ties keep the first-encountered child.
    pub fn best_scored_child(&self, id: NodeId) -> Option<NodeId> {
        let mut best: Option<(NodeId, i64)> = None;
        for &child_id in &self.node(id).children {
            let score = self.node(child_id).score();
            match best {
                Some((_, top)) if score <= top => {}
                _ => best = Some((child_id, score)),
            }
        }
        best.map(|(id, _)| id)
    }

    /// Credit a playout outcome to every node from `from` up to the root.
    ///
    /// Takes `&self`: statistics are atomic, so concurrent playouts may
    /// backpropagate through shared ancestors without locks.
    pub fn backpropagate(&self, from: NodeId, outcome: Outcome) {
        let mut id = from;
        while id.is_some() {
            let node = self.node(id);
            node.record(score_for(outcome, node.to_move.opponent()));
            id = node.parent;
        }
    }
}

/// Score one outcome for the side that moved into a node. A playout cut
/// off while still open counts as a draw.
fn score_for(outcome: Outcome, mover: Side) -> i64 {
    match outcome {
        Outcome::Win(winner) if winner == mover => WIN_SCORE,
        Outcome::Win(_) => LOSS_SCORE,
        Outcome::Draw | Outcome::InProgress => DRAW_SCORE,
    }
}

/// Upper confidence bound for selecting a child.
///
/// An unvisited child scores infinity, so every fresh node is tried once
/// before any sibling is revisited.
pub fn uct_value(parent_visits: u32, score: i64, visits: u32, exploration: f64) -> f64 {
    if visits == 0 {
        return f64::INFINITY;
    }
    let exploit = score as f64 / visits as f64;
    let explore = exploration * ((parent_visits.max(1) as f64).ln() / visits as f64).sqrt();
    exploit + explore
}

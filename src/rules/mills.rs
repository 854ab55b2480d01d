//! Mill detection.
//!
//! A mill is one of the 16 fixed lines uniformly occupied by one player.
//! Detection is recomputed from the board on every call: occupancy changes
//! each turn and a stale answer here would corrupt removal eligibility.

use rustc_hash::FxHashSet;

use crate::board::{graph, Board, NodeId};
use crate::player::Player;

/// Whether every node of a line is occupied by `player`.
fn line_complete(board: &Board, line: [NodeId; 3], player: Player) -> bool {
    line.iter().all(|&n| board.occupant(n) == Some(player))
}

/// Whether `node` sits inside a completed mill of `player`.
///
/// Used both for "did this placement/arrival form a mill" (the node just
/// occupied) and for the protection rule (is the removal target inside a
/// mill of its own color).
#[must_use]
pub fn forms_mill(board: &Board, node: NodeId, player: Player) -> bool {
    graph::mill_lines_through(node).any(|line| line_complete(board, line, player))
}

/// Number of distinct pieces of `player` that sit inside completed mills.
///
/// Shared corners count once: two crossing mills of the same color hold five
/// pieces, not six.
#[must_use]
pub fn pieces_in_mills(board: &Board, player: Player) -> u8 {
    let mut in_mills: FxHashSet<NodeId> = FxHashSet::default();
    for line in graph::mill_lines() {
        if line_complete(board, line, player) {
            in_mills.extend(line);
        }
    }
    in_mills.len() as u8
}

/// Whether every on-board piece of `player` is part of some mill. When true,
/// mill pieces lose their removal protection.
#[must_use]
pub fn all_in_mills(board: &Board, player: Player) -> bool {
    pieces_in_mills(board, player) == board.count(player)
}

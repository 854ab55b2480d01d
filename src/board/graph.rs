//! Static board topology.
//!
//! The Nine Men's Morris board is three nested squares connected by four
//! spokes: 24 intersections, each adjacent to 2-4 others. Corner nodes have
//! two neighbors, spoke midpoints three, and the four junction nodes where
//! the spokes cross the middle square have four.
//!
//! Node ids run 0..24 row by row, left to right:
//!
//! ```text
//!  0--------1--------2
//!  |  3-----4-----5  |
//!  |  |  6--7--8  |  |
//!  9-10-11    12-13-14
//!  |  | 15-16-17  |  |
//!  | 18----19----20  |
//! 21-------22-------23
//! ```
//!
//! Adjacency and the 16 mill lines are fixed tables computed once from this
//! layout; nothing in this module mutates.

use serde::{Deserialize, Serialize};

/// Number of board intersections.
pub const NODE_COUNT: usize = 24;

/// Number of fixed mill lines.
pub const MILL_LINE_COUNT: usize = 16;

/// A board intersection, identified by its stable index 0..24.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(u8);

impl NodeId {
    /// Create a node id.
    ///
    /// Panics if `raw >= 24`.
    #[must_use]
    pub const fn new(raw: u8) -> Self {
        assert!(raw < NODE_COUNT as u8, "node id out of range");
        Self(raw)
    }

    /// Raw index 0..24.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Iterate over all 24 node ids.
    pub fn all() -> impl Iterator<Item = NodeId> {
        (0..NODE_COUNT as u8).map(NodeId)
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "node {}", self.0)
    }
}

/// Neighbors of each node, indexed by node id.
const NEIGHBORS: [&[u8]; NODE_COUNT] = [
    &[1, 9],          // 0
    &[0, 2, 4],       // 1
    &[1, 14],         // 2
    &[4, 10],         // 3
    &[1, 3, 5, 7],    // 4
    &[4, 13],         // 5
    &[7, 11],         // 6
    &[4, 6, 8],       // 7
    &[7, 12],         // 8
    &[0, 10, 21],     // 9
    &[3, 9, 11, 18],  // 10
    &[6, 10, 15],     // 11
    &[8, 13, 17],     // 12
    &[5, 12, 14, 20], // 13
    &[2, 13, 23],     // 14
    &[11, 16],        // 15
    &[15, 17, 19],    // 16
    &[12, 16],        // 17
    &[10, 19],        // 18
    &[16, 18, 20, 22],// 19
    &[13, 19],        // 20
    &[9, 22],         // 21
    &[19, 21, 23],    // 22
    &[14, 22],        // 23
];

/// The 16 collinear triples that can form mills.
const MILL_LINES: [[u8; 3]; MILL_LINE_COUNT] = [
    [0, 1, 2],
    [0, 9, 21],
    [21, 22, 23],
    [2, 14, 23],
    [3, 4, 5],
    [3, 10, 18],
    [18, 19, 20],
    [5, 13, 20],
    [6, 7, 8],
    [6, 11, 15],
    [15, 16, 17],
    [8, 12, 17],
    [1, 4, 7],
    [9, 10, 11],
    [16, 19, 22],
    [12, 13, 14],
];

/// Grid position of each node in board divisions (column, row), origin at the
/// top-left corner of the outer square. The board spans 6 divisions per side.
const GRID: [(u8, u8); NODE_COUNT] = [
    (0, 0), (3, 0), (6, 0),
    (1, 1), (3, 1), (5, 1),
    (2, 2), (3, 2), (4, 2),
    (0, 3), (1, 3), (2, 3),
    (4, 3), (5, 3), (6, 3),
    (2, 4), (3, 4), (4, 4),
    (1, 5), (3, 5), (5, 5),
    (0, 6), (3, 6), (6, 6),
];

/// Iterate over a node's neighbors.
pub fn neighbors(node: NodeId) -> impl Iterator<Item = NodeId> {
    NEIGHBORS[node.index()].iter().map(|&n| NodeId(n))
}

/// Iterate over the 16 mill lines.
pub fn mill_lines() -> impl Iterator<Item = [NodeId; 3]> {
    MILL_LINES
        .iter()
        .map(|&[a, b, c]| [NodeId(a), NodeId(b), NodeId(c)])
}

/// Iterate over the mill lines containing `node` (every node sits on exactly
/// two lines).
pub fn mill_lines_through(node: NodeId) -> impl Iterator<Item = [NodeId; 3]> {
    mill_lines().filter(move |line| line.contains(&node))
}

/// Grid position of a node in board divisions (column, row), 0..=6 each.
#[must_use]
pub const fn grid_position(node: NodeId) -> (u8, u8) {
    GRID[node.index()]
}

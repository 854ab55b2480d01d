//! Board graph and occupancy.
//!
//! `graph` is the immutable topology (nodes, adjacency, mill lines);
//! `occupancy` is the mutable per-node occupant state. The rules engine is
//! the only writer.

pub mod graph;
pub mod occupancy;

pub use graph::{
    grid_position, mill_lines, mill_lines_through, neighbors, NodeId, MILL_LINE_COUNT, NODE_COUNT,
};
pub use occupancy::Board;

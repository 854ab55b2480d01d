//! Board occupancy.
//!
//! A single mapping from node id to optional occupant. The original
//! implementation kept bidirectional node/piece references; collapsing them
//! into one array removes the cycle and makes "who is on this node" the only
//! source of truth.
//!
//! Mutation is crate-internal: all writes go through the rules engine so no
//! illegal position can be reached from outside.

use serde::{Deserialize, Serialize};

use super::graph::{NodeId, NODE_COUNT};
use crate::player::Player;

/// Occupancy of all 24 nodes.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Board {
    nodes: [Option<Player>; NODE_COUNT],
}

impl Board {
    /// An empty board.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The occupant of a node, if any.
    #[must_use]
    pub fn occupant(&self, node: NodeId) -> Option<Player> {
        self.nodes[node.index()]
    }

    /// Whether a node is unoccupied.
    #[must_use]
    pub fn is_empty(&self, node: NodeId) -> bool {
        self.nodes[node.index()].is_none()
    }

    /// Number of pieces a player has on the board.
    #[must_use]
    pub fn count(&self, player: Player) -> u8 {
        self.nodes.iter().filter(|&&n| n == Some(player)).count() as u8
    }

    /// Iterate over the nodes occupied by a player.
    pub fn nodes_of(&self, player: Player) -> impl Iterator<Item = NodeId> + '_ {
        NodeId::all().filter(move |&n| self.occupant(n) == Some(player))
    }

    /// Iterate over the unoccupied nodes.
    pub fn empty_nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        NodeId::all().filter(move |&n| self.is_empty(n))
    }

    /// Occupy a node. The node must be empty.
    pub(crate) fn set(&mut self, node: NodeId, player: Player) {
        debug_assert!(self.is_empty(node), "{node} already occupied");
        self.nodes[node.index()] = Some(player);
    }

    /// Clear a node, returning the piece that was there.
    pub(crate) fn clear(&mut self, node: NodeId) -> Option<Player> {
        self.nodes[node.index()].take()
    }
}

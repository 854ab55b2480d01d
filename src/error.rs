//! Error taxonomy for rule violations.
//!
//! Every variant is a caller/precondition error, never a transient failure.
//! A rejected call leaves the engine state untouched; the caller re-prompts
//! the player, there is nothing to retry.

use serde::{Deserialize, Serialize};

/// Why an operation was rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RulesError {
    /// Placement or movement precondition failed: wrong phase, wrong turn,
    /// occupied target, exhausted placement pool, or a removal is pending.
    InvalidMove,
    /// Pick-up or removal target is not a node the actor may select
    /// (empty, or owned by the wrong player).
    InvalidSelection,
    /// Move destination is occupied or unreachable for the mover's
    /// flying status.
    IllegalDestination,
    /// Removal target sits in a mill while the opponent still has pieces
    /// outside any mill.
    ProtectedPiece,
    /// The game already has a winner; only `reset` may follow.
    GameAlreadyOver,
}

impl std::fmt::Display for RulesError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RulesError::InvalidMove => write!(f, "move violates a phase or turn precondition"),
            RulesError::InvalidSelection => write!(f, "selected node is not available to this player"),
            RulesError::IllegalDestination => write!(f, "destination is not reachable"),
            RulesError::ProtectedPiece => write!(f, "piece is protected by its mill"),
            RulesError::GameAlreadyOver => write!(f, "game is already over"),
        }
    }
}

impl std::error::Error for RulesError {}

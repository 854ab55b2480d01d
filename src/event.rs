//! Events produced by the rules engine.
//!
//! Every successful mutating operation returns exactly one `GameEvent`; the
//! renderer or network layer reacts to it (highlight the removal prompt,
//! swap the turn indicator, show the result screen) without re-deriving rule
//! logic.

use serde::{Deserialize, Serialize};

use crate::board::NodeId;
use crate::player::Player;

/// Result of a completed game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameResult {
    /// One player won.
    Winner(Player),
    /// No winner. No rule in this engine produces a draw today; the variant
    /// exists so callers can offer one by agreement.
    Draw,
}

impl GameResult {
    /// Check if a player won.
    #[must_use]
    pub fn is_winner(&self, player: Player) -> bool {
        matches!(self, GameResult::Winner(p) if *p == player)
    }
}

/// What a successful engine operation did.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A placement or move completed a mill; the same player must now remove
    /// an opponent piece before the turn advances.
    MillFormed { by: Player, node: NodeId },
    /// The turn passed to the next player.
    TurnAdvanced { next: Player },
    /// A piece was removed after a mill; the turn has advanced.
    PieceRemoved { node: NodeId, victim: Player },
    /// The game ended with this operation.
    GameOver { result: GameResult },
}

//! The rules engine: a phase/turn state machine over the board.
//!
//! ## State machine
//!
//! Two phases gate the operations:
//! - `Placement`: players alternate dropping their 9 reserve pieces
//!   (`place`).
//! - `Movement`: pieces slide to adjacent empty nodes, or to any empty node
//!   once a player is down to exactly 3 pieces (`pick_up` / `move_piece`).
//!
//! Completing a mill sets `pending_removal`, which blocks every other
//! mutating operation until `remove` resolves it; the turn does not advance
//! in between. Terminal conditions (reduction to 2 pieces, immobilization)
//! are evaluated after every mutation, never lazily.
//!
//! ## Failure semantics
//!
//! Every precondition is validated before any mutation. A rejected call
//! returns a `RulesError` and leaves the engine bit-for-bit unchanged.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::mills;
use crate::board::{graph, Board, NodeId};
use crate::error::RulesError;
use crate::event::{GameEvent, GameResult};
use crate::player::{Player, PlayerPair};

/// Reserve pieces each player starts with.
pub const PIECES_PER_PLAYER: u8 = 9;

/// Game phase. Transitions exactly once, forward, when both placement pools
/// are exhausted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    Placement,
    Movement,
}

/// Legal destinations for one piece. Inline capacity covers the sliding case
/// (at most 4 neighbors); flying spills to the heap.
pub type Destinations = SmallVec<[NodeId; 4]>;

/// The authoritative game state and the only writer of the board.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Engine {
    board: Board,
    phase: Phase,
    turn: Player,
    remaining: PlayerPair<u8>,
    on_board: PlayerPair<u8>,
    pending_removal: bool,
    can_fly: PlayerPair<bool>,
    winner: Option<GameResult>,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    /// A fresh game: empty board, 9 reserves each, White to place.
    #[must_use]
    pub fn new() -> Self {
        Self {
            board: Board::new(),
            phase: Phase::Placement,
            turn: Player::White,
            remaining: PlayerPair::with_value(PIECES_PER_PLAYER),
            on_board: PlayerPair::with_value(0),
            pending_removal: false,
            can_fly: PlayerPair::with_value(false),
            winner: None,
        }
    }

    /// Return to the initial state. The only permitted mutation once a
    /// winner is set.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    // === Queries ===

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Player to act.
    #[must_use]
    pub fn turn(&self) -> Player {
        self.turn
    }

    /// Whether a mill is waiting on a removal.
    #[must_use]
    pub fn pending_removal(&self) -> bool {
        self.pending_removal
    }

    /// Result, once the game is over.
    #[must_use]
    pub fn winner(&self) -> Option<GameResult> {
        self.winner
    }

    /// Occupant of a node.
    #[must_use]
    pub fn occupant(&self, node: NodeId) -> Option<Player> {
        self.board.occupant(node)
    }

    /// Read-only board access.
    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Reserve pieces a player has left to place.
    #[must_use]
    pub fn remaining_to_place(&self, player: Player) -> u8 {
        self.remaining[player]
    }

    /// Live pieces a player has on the board.
    #[must_use]
    pub fn on_board(&self, player: Player) -> u8 {
        self.on_board[player]
    }

    /// Whether a player may fly (exactly 3 pieces in the movement phase).
    #[must_use]
    pub fn can_fly(&self, player: Player) -> bool {
        self.can_fly[player]
    }

    // === Operations ===

    /// Place a reserve piece on an empty node.
    ///
    /// Completing a mill keeps the turn with `player` and arms the removal;
    /// otherwise the turn advances. The phase flips to `Movement` once both
    /// reserves hit zero.
    pub fn place(&mut self, node: NodeId, player: Player) -> Result<GameEvent, RulesError> {
        self.ensure_live()?;
        if self.phase != Phase::Placement
            || self.pending_removal
            || player != self.turn
            || self.remaining[player] == 0
            || !self.board.is_empty(node)
        {
            return Err(RulesError::InvalidMove);
        }

        self.board.set(node, player);
        self.remaining[player] -= 1;
        self.on_board[player] += 1;
        let event = self.after_arrival(node, player);

        if self.remaining[Player::White] == 0 && self.remaining[Player::Black] == 0 {
            self.enter_movement();
        }
        if let Some(over) = self.immobilized_loss() {
            return Ok(over);
        }
        Ok(event)
    }

    /// Legal destinations for a piece, without mutating anything.
    ///
    /// The UI calls this on pick-up to highlight and pre-validate before
    /// committing a `move_piece`.
    pub fn pick_up(&self, node: NodeId, player: Player) -> Result<Destinations, RulesError> {
        self.ensure_live()?;
        if self.phase != Phase::Movement || self.pending_removal || player != self.turn {
            return Err(RulesError::InvalidMove);
        }
        if self.board.occupant(node) != Some(player) {
            return Err(RulesError::InvalidSelection);
        }
        Ok(self.destinations(node, player))
    }

    /// Slide (or fly) a piece from `src` to `dst`.
    pub fn move_piece(
        &mut self,
        src: NodeId,
        dst: NodeId,
        player: Player,
    ) -> Result<GameEvent, RulesError> {
        self.ensure_live()?;
        if self.phase != Phase::Movement || self.pending_removal || player != self.turn {
            return Err(RulesError::InvalidMove);
        }
        if self.board.occupant(src) != Some(player) {
            return Err(RulesError::InvalidSelection);
        }
        if !self.destinations(src, player).contains(&dst) {
            return Err(RulesError::IllegalDestination);
        }

        self.board.clear(src);
        self.board.set(dst, player);
        let event = self.after_arrival(dst, player);

        if let Some(over) = self.immobilized_loss() {
            return Ok(over);
        }
        Ok(event)
    }

    /// Remove an opponent piece after a mill.
    ///
    /// A piece inside a mill of its own color is protected while the owner
    /// has any piece outside a mill; once every piece sits in a mill,
    /// anything goes. Resolving the removal advances the turn and may end
    /// the game (opponent reduced to 2 in `Movement`, or left immobilized).
    pub fn remove(&mut self, node: NodeId, player: Player) -> Result<GameEvent, RulesError> {
        self.ensure_live()?;
        if !self.pending_removal || player != self.turn {
            return Err(RulesError::InvalidMove);
        }
        let victim = player.opponent();
        if self.board.occupant(node) != Some(victim) {
            return Err(RulesError::InvalidSelection);
        }
        if mills::forms_mill(&self.board, node, victim)
            && !mills::all_in_mills(&self.board, victim)
        {
            tracing::debug!(%node, "removal target protected by its mill");
            return Err(RulesError::ProtectedPiece);
        }

        self.board.clear(node);
        self.on_board[victim] -= 1;
        self.pending_removal = false;
        self.turn = victim;
        self.refresh_flying();
        tracing::debug!(%node, %victim, "piece removed");

        if self.phase == Phase::Movement && self.on_board[victim] == 2 {
            return Ok(self.end_game(GameResult::Winner(player)));
        }
        if let Some(over) = self.immobilized_loss() {
            return Ok(over);
        }
        Ok(GameEvent::PieceRemoved { node, victim })
    }

    /// Concede on behalf of `player`.
    ///
    /// The hook for an external turn clock: expiring the current player's
    /// clock forfeits them, equivalent to an immobilization loss. Also
    /// serves as resignation.
    pub fn forfeit(&mut self, player: Player) -> Result<GameEvent, RulesError> {
        self.ensure_live()?;
        tracing::info!(%player, "forfeit");
        Ok(self.end_game(GameResult::Winner(player.opponent())))
    }

    // === Internals ===

    fn ensure_live(&self) -> Result<(), RulesError> {
        if self.winner.is_some() {
            return Err(RulesError::GameAlreadyOver);
        }
        Ok(())
    }

    /// Shared tail of `place` and `move_piece`: mill check on the node just
    /// occupied, then either arm the removal or advance the turn.
    fn after_arrival(&mut self, node: NodeId, player: Player) -> GameEvent {
        if mills::forms_mill(&self.board, node, player) {
            self.pending_removal = true;
            tracing::debug!(%node, %player, "mill formed");
            GameEvent::MillFormed { by: player, node }
        } else {
            self.turn = player.opponent();
            GameEvent::TurnAdvanced { next: self.turn }
        }
    }

    fn enter_movement(&mut self) {
        self.phase = Phase::Movement;
        self.refresh_flying();
        tracing::info!("movement phase begins");
    }

    fn refresh_flying(&mut self) {
        for player in Player::both() {
            self.can_fly[player] = self.phase == Phase::Movement && self.on_board[player] == 3;
        }
    }

    fn destinations(&self, node: NodeId, player: Player) -> Destinations {
        if self.can_fly[player] {
            self.board.empty_nodes().collect()
        } else {
            graph::neighbors(node)
                .filter(|&n| self.board.is_empty(n))
                .collect()
        }
    }

    fn has_any_move(&self, player: Player) -> bool {
        if self.can_fly[player] {
            // At most 18 of 24 nodes are ever occupied, so a flying player
            // always has an empty destination.
            return true;
        }
        self.board
            .nodes_of(player)
            .any(|n| graph::neighbors(n).any(|adj| self.board.is_empty(adj)))
    }

    /// Immobilization rule: in `Movement`, the player whose turn it is loses
    /// when no owned piece has a legal destination. Skipped while a removal
    /// is pending (the turn has not advanced yet).
    fn immobilized_loss(&mut self) -> Option<GameEvent> {
        if self.winner.is_some() || self.phase != Phase::Movement || self.pending_removal {
            return None;
        }
        if self.has_any_move(self.turn) {
            return None;
        }
        let blocked = self.turn;
        tracing::info!(%blocked, "player has no legal moves");
        Some(self.end_game(GameResult::Winner(blocked.opponent())))
    }

    fn end_game(&mut self, result: GameResult) -> GameEvent {
        self.winner = Some(result);
        tracing::info!(?result, "game over");
        GameEvent::GameOver { result }
    }
}

/// Builder for mid-game positions.
///
/// Construction-time contracts are asserted, so an `Engine` built here obeys
/// the same invariants as one reached through play. Intended for resuming
/// transmitted games and for tests.
///
/// ```
/// use morris::{NodeId, Phase, Player, PositionBuilder};
///
/// let engine = PositionBuilder::new()
///     .phase(Phase::Movement)
///     .piece(NodeId::new(0), Player::White)
///     .piece(NodeId::new(1), Player::White)
///     .piece(NodeId::new(4), Player::White)
///     .piece(NodeId::new(9), Player::Black)
///     .piece(NodeId::new(10), Player::Black)
///     .piece(NodeId::new(11), Player::Black)
///     .piece(NodeId::new(5), Player::Black)
///     .build();
///
/// assert!(engine.can_fly(Player::White));
/// assert!(!engine.can_fly(Player::Black));
/// ```
#[derive(Clone, Debug, Default)]
pub struct PositionBuilder {
    pieces: Vec<(NodeId, Player)>,
    movement: bool,
    turn: Option<Player>,
    remaining: Option<(u8, u8)>,
}

impl PositionBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the phase. Defaults to `Placement`.
    #[must_use]
    pub fn phase(mut self, phase: Phase) -> Self {
        self.movement = phase == Phase::Movement;
        self
    }

    /// Set the player to act. Defaults to White.
    #[must_use]
    pub fn turn(mut self, player: Player) -> Self {
        self.turn = Some(player);
        self
    }

    /// Put a piece on a node.
    #[must_use]
    pub fn piece(mut self, node: NodeId, player: Player) -> Self {
        self.pieces.push((node, player));
        self
    }

    /// Override the reserve counts for a `Placement` position. Defaults to
    /// `9 - pieces placed` per player (a game with no removals so far).
    #[must_use]
    pub fn remaining(mut self, white: u8, black: u8) -> Self {
        self.remaining = Some((white, black));
        self
    }

    /// Build the engine, asserting position validity.
    ///
    /// A `Movement` position whose side to move is already immobilized gets
    /// its winner set immediately, since no operation will ever run for the
    /// blocked player.
    #[must_use]
    pub fn build(self) -> Engine {
        let mut board = Board::new();
        let mut on_board = PlayerPair::with_value(0u8);
        for &(node, player) in &self.pieces {
            assert!(board.is_empty(node), "duplicate piece on {node}");
            board.set(node, player);
            on_board[player] += 1;
        }
        for player in Player::both() {
            assert!(
                on_board[player] <= PIECES_PER_PLAYER,
                "{player} has more than {PIECES_PER_PLAYER} pieces"
            );
        }

        let phase = if self.movement {
            Phase::Movement
        } else {
            Phase::Placement
        };
        let remaining = match phase {
            Phase::Movement => {
                assert!(
                    self.remaining.map_or(true, |r| r == (0, 0)),
                    "movement phase requires empty reserves"
                );
                for player in Player::both() {
                    assert!(
                        on_board[player] >= 3,
                        "{player} is below the 3-piece minimum"
                    );
                }
                PlayerPair::with_value(0)
            }
            Phase::Placement => {
                let (white, black) = self.remaining.unwrap_or((
                    PIECES_PER_PLAYER - on_board[Player::White],
                    PIECES_PER_PLAYER - on_board[Player::Black],
                ));
                let remaining = PlayerPair::new(white, black);
                for player in Player::both() {
                    assert!(
                        remaining[player] + on_board[player] <= PIECES_PER_PLAYER,
                        "{player} exceeds the piece allotment"
                    );
                }
                assert!(
                    white > 0 || black > 0,
                    "both reserves empty is a movement position"
                );
                remaining
            }
        };

        let mut engine = Engine {
            board,
            phase,
            turn: self.turn.unwrap_or(Player::White),
            remaining,
            on_board,
            pending_removal: false,
            can_fly: PlayerPair::with_value(false),
            winner: None,
        };
        engine.refresh_flying();
        engine.immobilized_loss();
        engine
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(raw: u8) -> NodeId {
        NodeId::new(raw)
    }

    #[test]
    fn test_new_game() {
        let engine = Engine::new();
        assert_eq!(engine.phase(), Phase::Placement);
        assert_eq!(engine.turn(), Player::White);
        assert_eq!(engine.remaining_to_place(Player::White), 9);
        assert_eq!(engine.remaining_to_place(Player::Black), 9);
        assert!(!engine.pending_removal());
        assert_eq!(engine.winner(), None);
    }

    #[test]
    fn test_place_advances_turn() {
        let mut engine = Engine::new();
        let event = engine.place(node(0), Player::White).unwrap();
        assert_eq!(event, GameEvent::TurnAdvanced { next: Player::Black });
        assert_eq!(engine.occupant(node(0)), Some(Player::White));
        assert_eq!(engine.remaining_to_place(Player::White), 8);
        assert_eq!(engine.on_board(Player::White), 1);
    }

    #[test]
    fn test_place_precondition_errors() {
        let mut engine = Engine::new();
        // Out of turn.
        assert_eq!(
            engine.place(node(0), Player::Black),
            Err(RulesError::InvalidMove)
        );
        engine.place(node(0), Player::White).unwrap();
        // Occupied node.
        assert_eq!(
            engine.place(node(0), Player::Black),
            Err(RulesError::InvalidMove)
        );
    }

    #[test]
    fn test_failed_place_leaves_state_unchanged() {
        let mut engine = Engine::new();
        engine.place(node(0), Player::White).unwrap();
        let before = engine.clone();
        assert!(engine.place(node(0), Player::Black).is_err());
        assert_eq!(engine, before);
    }

    #[test]
    fn test_placement_mill_arms_removal_and_blocks_placement() {
        let mut engine = Engine::new();
        engine.place(node(0), Player::White).unwrap();
        engine.place(node(5), Player::Black).unwrap();
        engine.place(node(1), Player::White).unwrap();
        engine.place(node(8), Player::Black).unwrap();

        let event = engine.place(node(2), Player::White).unwrap();
        assert_eq!(
            event,
            GameEvent::MillFormed {
                by: Player::White,
                node: node(2)
            }
        );
        assert!(engine.pending_removal());
        // Turn stays with White; every placement is blocked until removal.
        assert_eq!(engine.turn(), Player::White);
        assert_eq!(
            engine.place(node(3), Player::White),
            Err(RulesError::InvalidMove)
        );
        assert_eq!(
            engine.place(node(3), Player::Black),
            Err(RulesError::InvalidMove)
        );

        let event = engine.remove(node(5), Player::White).unwrap();
        assert_eq!(
            event,
            GameEvent::PieceRemoved {
                node: node(5),
                victim: Player::Black
            }
        );
        assert!(!engine.pending_removal());
        assert_eq!(engine.turn(), Player::Black);
        assert_eq!(engine.on_board(Player::Black), 1);
    }

    #[test]
    fn test_remove_own_piece_rejected() {
        let mut engine = Engine::new();
        engine.place(node(0), Player::White).unwrap();
        engine.place(node(5), Player::Black).unwrap();
        engine.place(node(1), Player::White).unwrap();
        engine.place(node(8), Player::Black).unwrap();
        engine.place(node(2), Player::White).unwrap();

        assert_eq!(
            engine.remove(node(0), Player::White),
            Err(RulesError::InvalidSelection)
        );
        // Empty node is equally unselectable.
        assert_eq!(
            engine.remove(node(20), Player::White),
            Err(RulesError::InvalidSelection)
        );
    }

    #[test]
    fn test_remove_without_pending_mill_rejected() {
        let mut engine = Engine::new();
        engine.place(node(0), Player::White).unwrap();
        assert_eq!(
            engine.remove(node(0), Player::Black),
            Err(RulesError::InvalidMove)
        );
    }

    #[test]
    fn test_no_removal_loss_during_placement() {
        // Reducing a player during placement never ends the game; the
        // 2-piece rule only applies in the movement phase.
        let mut engine = Engine::new();
        engine.place(node(0), Player::White).unwrap();
        engine.place(node(5), Player::Black).unwrap();
        engine.place(node(1), Player::White).unwrap();
        engine.place(node(8), Player::Black).unwrap();
        engine.place(node(2), Player::White).unwrap();
        engine.remove(node(5), Player::White).unwrap();
        assert_eq!(engine.winner(), None);
    }

    #[test]
    fn test_pick_up_rejected_in_placement() {
        let mut engine = Engine::new();
        engine.place(node(0), Player::White).unwrap();
        assert_eq!(
            engine.pick_up(node(0), Player::Black),
            Err(RulesError::InvalidMove)
        );
    }

    #[test]
    fn test_movement_slide_and_mill() {
        // White one move away from completing 0-1-2 with the piece on 14.
        let mut engine = PositionBuilder::new()
            .phase(Phase::Movement)
            .piece(node(0), Player::White)
            .piece(node(1), Player::White)
            .piece(node(14), Player::White)
            .piece(node(4), Player::White)
            .piece(node(9), Player::Black)
            .piece(node(10), Player::Black)
            .piece(node(18), Player::Black)
            .piece(node(5), Player::Black)
            .build();

        let destinations = engine.pick_up(node(14), Player::White).unwrap();
        assert!(destinations.contains(&node(2)));
        assert!(destinations.contains(&node(13)));
        assert!(destinations.contains(&node(23)));
        assert_eq!(destinations.len(), 3);

        let event = engine.move_piece(node(14), node(2), Player::White).unwrap();
        assert_eq!(
            event,
            GameEvent::MillFormed {
                by: Player::White,
                node: node(2)
            }
        );
        assert!(engine.pending_removal());
    }

    #[test]
    fn test_move_to_non_adjacent_rejected() {
        let mut engine = PositionBuilder::new()
            .phase(Phase::Movement)
            .piece(node(0), Player::White)
            .piece(node(1), Player::White)
            .piece(node(4), Player::White)
            .piece(node(7), Player::White)
            .piece(node(9), Player::Black)
            .piece(node(10), Player::Black)
            .piece(node(18), Player::Black)
            .build();

        // 0 -> 2 skips over 1; four pieces, so no flying either.
        assert_eq!(
            engine.move_piece(node(0), node(2), Player::White),
            Err(RulesError::IllegalDestination)
        );
        // Occupied destination.
        assert_eq!(
            engine.move_piece(node(0), node(1), Player::White),
            Err(RulesError::IllegalDestination)
        );
        // Moving the opponent's piece.
        assert_eq!(
            engine.move_piece(node(9), node(21), Player::White),
            Err(RulesError::InvalidSelection)
        );
    }

    #[test]
    fn test_flying_reaches_everything_empty() {
        let engine = PositionBuilder::new()
            .phase(Phase::Movement)
            .piece(node(0), Player::White)
            .piece(node(1), Player::White)
            .piece(node(2), Player::White)
            .piece(node(9), Player::Black)
            .piece(node(10), Player::Black)
            .piece(node(11), Player::Black)
            .piece(node(5), Player::Black)
            .build();

        assert!(engine.can_fly(Player::White));
        let destinations = engine.pick_up(node(0), Player::White).unwrap();
        // Every empty node: 24 minus the 7 pieces.
        assert_eq!(destinations.len(), 17);
        assert!(destinations.contains(&node(23)));

        // Black has 4 pieces and stays grounded.
        assert!(!engine.can_fly(Player::Black));
    }

    #[test]
    fn test_forfeit_ends_game() {
        let mut engine = Engine::new();
        let event = engine.forfeit(Player::White).unwrap();
        assert_eq!(
            event,
            GameEvent::GameOver {
                result: GameResult::Winner(Player::Black)
            }
        );
        assert_eq!(engine.winner(), Some(GameResult::Winner(Player::Black)));
        assert_eq!(
            engine.place(node(0), Player::White),
            Err(RulesError::GameAlreadyOver)
        );
        assert_eq!(
            engine.pick_up(node(0), Player::White),
            Err(RulesError::GameAlreadyOver)
        );
    }

    #[test]
    fn test_reset_after_game_over() {
        let mut engine = Engine::new();
        engine.place(node(0), Player::White).unwrap();
        engine.forfeit(Player::Black).unwrap();
        engine.reset();
        assert_eq!(engine, Engine::new());
    }

    #[test]
    fn test_builder_immobilized_side_to_move_loses_on_build() {
        // White's corner pieces are all boxed in by Black.
        let engine = PositionBuilder::new()
            .phase(Phase::Movement)
            .piece(node(0), Player::White)
            .piece(node(2), Player::White)
            .piece(node(21), Player::White)
            .piece(node(23), Player::White)
            .piece(node(1), Player::Black)
            .piece(node(9), Player::Black)
            .piece(node(14), Player::Black)
            .piece(node(22), Player::Black)
            .build();

        assert_eq!(engine.winner(), Some(GameResult::Winner(Player::Black)));
    }

    #[test]
    #[should_panic(expected = "duplicate piece")]
    fn test_builder_rejects_duplicate_node() {
        let _ = PositionBuilder::new()
            .piece(node(3), Player::White)
            .piece(node(3), Player::Black)
            .build();
    }

    #[test]
    #[should_panic(expected = "below the 3-piece minimum")]
    fn test_builder_rejects_sub_minimum_movement_position() {
        let _ = PositionBuilder::new()
            .phase(Phase::Movement)
            .piece(node(0), Player::White)
            .piece(node(1), Player::White)
            .piece(node(9), Player::Black)
            .piece(node(10), Player::Black)
            .piece(node(11), Player::Black)
            .build();
    }

    #[test]
    fn test_engine_serialization_round_trip() {
        let mut engine = Engine::new();
        engine.place(node(0), Player::White).unwrap();
        engine.place(node(5), Player::Black).unwrap();

        let json = serde_json::to_string(&engine).unwrap();
        let back: Engine = serde_json::from_str(&json).unwrap();
        assert_eq!(engine, back);
    }
}

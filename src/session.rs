//! Game session façade.
//!
//! Translates a stream of "node selected" events into engine operations. The
//! only state held here is UI-adjacent bookkeeping: which node is currently
//! picked up pending a move. The engine stays purely state-in/state-out and
//! never learns about selections.
//!
//! `BoardLayout` is the caller-owned geometry that maps a physical input
//! point to a node id. No window state lives in the crate: the caller
//! rebuilds the layout on resize and passes points through it.

use serde::{Deserialize, Serialize};

use crate::board::{graph, NodeId};
use crate::error::RulesError;
use crate::event::GameEvent;
use crate::player::Player;
use crate::rules::{Destinations, Engine, Phase};

/// What a `select` call did.
#[derive(Clone, Debug, PartialEq)]
pub enum SessionResponse {
    /// An engine operation ran; react to its event.
    Event(GameEvent),
    /// A piece was picked up; highlight these destinations.
    PickedUp {
        node: NodeId,
        destinations: Destinations,
    },
    /// The picked-up piece was put back without moving.
    Released,
}

/// Sequences engine calls for one sitting (hot-seat or networked);
/// no rule logic lives here.
#[derive(Clone, Debug, Default)]
pub struct Session {
    engine: Engine,
    picked: Option<NodeId>,
}

impl Session {
    /// Start a session with a fresh game.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resume a session from an existing engine state.
    #[must_use]
    pub fn from_engine(engine: Engine) -> Self {
        Self {
            engine,
            picked: None,
        }
    }

    /// The underlying engine, for rendering and queries.
    #[must_use]
    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// The node currently picked up, if any.
    #[must_use]
    pub fn picked(&self) -> Option<NodeId> {
        self.picked
    }

    /// Feed one "node selected" event.
    ///
    /// Dispatch follows the engine state: a pending removal consumes the
    /// selection as a removal target; during placement every selection is a
    /// placement; during movement the first selection picks a piece up and
    /// the second either moves it, re-picks another own piece, or releases
    /// it (selecting the picked node again). A failed move releases the
    /// piece, like dropping it off-target.
    pub fn select(&mut self, node: NodeId) -> Result<SessionResponse, RulesError> {
        let turn = self.engine.turn();

        if self.engine.pending_removal() {
            return self.engine.remove(node, turn).map(SessionResponse::Event);
        }

        match self.engine.phase() {
            Phase::Placement => self.engine.place(node, turn).map(SessionResponse::Event),
            Phase::Movement => match self.picked {
                None => self.pick(node, turn),
                Some(src) if src == node => {
                    self.picked = None;
                    Ok(SessionResponse::Released)
                }
                Some(src) => {
                    if self.engine.occupant(node) == Some(turn) {
                        return self.pick(node, turn);
                    }
                    self.picked = None;
                    let event = self.engine.move_piece(src, node, turn)?;
                    Ok(SessionResponse::Event(event))
                }
            },
        }
    }

    /// Forfeit the current player (turn-clock expiry or resignation).
    pub fn forfeit_current(&mut self) -> Result<SessionResponse, RulesError> {
        self.picked = None;
        let turn = self.engine.turn();
        self.engine.forfeit(turn).map(SessionResponse::Event)
    }

    /// Start over.
    pub fn reset(&mut self) {
        self.engine.reset();
        self.picked = None;
    }

    fn pick(&mut self, node: NodeId, turn: Player) -> Result<SessionResponse, RulesError> {
        let destinations = self.engine.pick_up(node, turn)?;
        self.picked = Some(node);
        Ok(SessionResponse::PickedUp { node, destinations })
    }
}

/// Pixel geometry of the board, owned by the caller.
///
/// `origin` is the top-left corner of the outer square and `width` its side
/// length; the board spans 6 divisions per side. Rebuild on window resize.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoardLayout {
    origin: (f32, f32),
    width: f32,
}

impl BoardLayout {
    /// Hit radius around a node, as a fraction of one division.
    const HIT_RADIUS: f32 = 0.4;

    /// Create a layout. `width` must be positive.
    #[must_use]
    pub fn new(origin_x: f32, origin_y: f32, width: f32) -> Self {
        assert!(width > 0.0, "board width must be positive");
        Self {
            origin: (origin_x, origin_y),
            width,
        }
    }

    /// One board division in pixels.
    #[must_use]
    pub fn division(&self) -> f32 {
        self.width / 6.0
    }

    /// Pixel position of a node's center.
    #[must_use]
    pub fn node_position(&self, node: NodeId) -> (f32, f32) {
        let (col, row) = graph::grid_position(node);
        (
            self.origin.0 + f32::from(col) * self.division(),
            self.origin.1 + f32::from(row) * self.division(),
        )
    }

    /// The node whose hit circle contains the point, if any.
    #[must_use]
    pub fn node_at(&self, x: f32, y: f32) -> Option<NodeId> {
        let radius = self.division() * Self::HIT_RADIUS;
        NodeId::all().find(|&node| {
            let (nx, ny) = self.node_position(node);
            let (dx, dy) = (x - nx, y - ny);
            dx * dx + dy * dy <= radius * radius
        })
    }
}

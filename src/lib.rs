//! # morris-engine
//!
//! A Nine Men's Morris (Mill) rules engine.
//!
//! ## Design Principles
//!
//! 1. **No illegal state reachable**: the engine validates every
//!    precondition before mutating, and all board writes go through it.
//!    A rejected call returns an error and changes nothing.
//!
//! 2. **State-in/state-out**: operations are synchronous, immediate
//!    transitions returning one event each. No background work, no locking;
//!    single-writer discipline by construction.
//!
//! 3. **UI stays outside**: rendering, input and clocks consume the small
//!    call surface (`place`, `pick_up`, `move_piece`, `remove`, queries) and
//!    the returned events. The `Session` façade covers the common
//!    "select a node" input pattern.
//!
//! ## Modules
//!
//! - `board`: static 24-node topology and occupancy
//! - `player`: the two-player identity type and per-player storage
//! - `rules`: mill detection and the phase/turn state machine
//! - `event`, `error`: operation outputs
//! - `session`: input-event façade and board geometry
//!
//! ## Example
//!
//! ```
//! use morris::{Engine, GameEvent, NodeId, Player};
//!
//! let mut engine = Engine::new();
//! let event = engine.place(NodeId::new(0), Player::White)?;
//! assert_eq!(event, GameEvent::TurnAdvanced { next: Player::Black });
//! # Ok::<(), morris::RulesError>(())
//! ```

pub mod board;
pub mod error;
pub mod event;
pub mod player;
pub mod rules;
pub mod session;

// Re-export commonly used types
pub use crate::board::{Board, NodeId, MILL_LINE_COUNT, NODE_COUNT};
pub use crate::error::RulesError;
pub use crate::event::{GameEvent, GameResult};
pub use crate::player::{Player, PlayerPair};
pub use crate::rules::{Destinations, Engine, Phase, PositionBuilder, PIECES_PER_PLAYER};
pub use crate::session::{BoardLayout, Session, SessionResponse};

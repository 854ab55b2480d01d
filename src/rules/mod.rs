//! Game rules: mill detection and the authoritative state machine.
//!
//! `mills` answers "is this node inside a completed mill" from current
//! occupancy; `engine` owns all mutable game state and is the only module
//! allowed to write to the board.

pub mod engine;
pub mod mills;

pub use engine::{Destinations, Engine, Phase, PositionBuilder, PIECES_PER_PLAYER};

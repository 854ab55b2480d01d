//! Player identity and per-player data storage.
//!
//! ## Player
//!
//! Nine Men's Morris is strictly two-player. `Player` is a closed enum, so
//! every decision on "whose piece is this" is an exhaustive match rather than
//! a value comparison on some helper type.
//!
//! ## PlayerPair
//!
//! Fixed two-slot per-player storage indexable by `Player`. The engine keeps
//! its per-player counters (`remaining_to_place`, `on_board`, flying flags)
//! in `PlayerPair`s.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// One of the two players. White places and moves first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    White,
    Black,
}

impl Player {
    /// The other player.
    ///
    /// ```
    /// use morris::Player;
    ///
    /// assert_eq!(Player::White.opponent(), Player::Black);
    /// assert_eq!(Player::Black.opponent(), Player::White);
    /// ```
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Player::White => Player::Black,
            Player::Black => Player::White,
        }
    }

    /// Slot index for `PlayerPair` storage (White = 0, Black = 1).
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Player::White => 0,
            Player::Black => 1,
        }
    }

    /// Both players, White first.
    #[must_use]
    pub const fn both() -> [Player; 2] {
        [Player::White, Player::Black]
    }
}

impl std::fmt::Display for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Player::White => write!(f, "White"),
            Player::Black => write!(f, "Black"),
        }
    }
}

/// Per-player data with O(1) access, one slot per player.
///
/// ## Example
///
/// ```
/// use morris::{Player, PlayerPair};
///
/// let mut pool: PlayerPair<u8> = PlayerPair::with_value(9);
///
/// assert_eq!(pool[Player::White], 9);
///
/// pool[Player::Black] -= 1;
/// assert_eq!(pool[Player::Black], 8);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerPair<T> {
    data: [T; 2],
}

impl<T> PlayerPair<T> {
    /// Create a pair from explicit White and Black values.
    #[must_use]
    pub fn new(white: T, black: T) -> Self {
        Self {
            data: [white, black],
        }
    }

    /// Create a pair with both slots set to the same value.
    #[must_use]
    pub fn with_value(value: T) -> Self
    where
        T: Clone,
    {
        Self {
            data: [value.clone(), value],
        }
    }

    /// Get a reference to a player's slot.
    #[must_use]
    pub fn get(&self, player: Player) -> &T {
        &self.data[player.index()]
    }

    /// Get a mutable reference to a player's slot.
    pub fn get_mut(&mut self, player: Player) -> &mut T {
        &mut self.data[player.index()]
    }

    /// Iterate over `(Player, &T)` pairs, White first.
    pub fn iter(&self) -> impl Iterator<Item = (Player, &T)> {
        Player::both().into_iter().zip(self.data.iter())
    }
}

impl<T> Index<Player> for PlayerPair<T> {
    type Output = T;

    fn index(&self, player: Player) -> &Self::Output {
        self.get(player)
    }
}

impl<T> IndexMut<Player> for PlayerPair<T> {
    fn index_mut(&mut self, player: Player) -> &mut Self::Output {
        self.get_mut(player)
    }
}

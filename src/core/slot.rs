//! Player slots and per-slot data storage.
//!
//! ## PlayerSlot
//!
//! The fixed index (0 or 1) identifying a player within a game for its
//! entire lifetime. Slot 0 is the game creator, slot 1 the joiner; slots
//! are never reassigned.
//!
//! ## SlotMap
//!
//! Per-slot data storage for exactly two players, indexable by `PlayerSlot`.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// A player's fixed index within a game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerSlot(u8);

impl PlayerSlot {
    /// The game creator's slot. Also the designated advancer
    /// (see [`crate::authority`]).
    pub const ZERO: PlayerSlot = PlayerSlot(0);

    /// The joining player's slot.
    pub const ONE: PlayerSlot = PlayerSlot(1);

    /// Create a slot from a raw index. Returns `None` for anything other
    /// than 0 or 1.
    #[must_use]
    pub const fn new(index: u8) -> Option<Self> {
        match index {
            0 => Some(PlayerSlot(0)),
            1 => Some(PlayerSlot(1)),
            _ => None,
        }
    }

    /// Get the raw slot index (0 or 1).
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// The opponent's slot.
    ///
    /// ```
    /// use tandem_party::core::PlayerSlot;
    ///
    /// assert_eq!(PlayerSlot::ZERO.other(), PlayerSlot::ONE);
    /// assert_eq!(PlayerSlot::ONE.other(), PlayerSlot::ZERO);
    /// ```
    #[must_use]
    pub const fn other(self) -> Self {
        PlayerSlot(1 - self.0)
    }

    /// Both slots, in index order.
    pub fn both() -> impl Iterator<Item = PlayerSlot> {
        [PlayerSlot::ZERO, PlayerSlot::ONE].into_iter()
    }
}

impl std::fmt::Display for PlayerSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "slot {}", self.0)
    }
}

/// Per-slot data storage with O(1) access.
///
/// Backed by a two-element array. Use [`SlotMap::new`] to create with a
/// factory function, or [`SlotMap::with_value`] to initialize both entries
/// to the same value.
///
/// ## Example
///
/// ```
/// use tandem_party::core::{PlayerSlot, SlotMap};
///
/// let mut wins: SlotMap<u32> = SlotMap::with_value(0);
/// wins[PlayerSlot::ONE] += 1;
/// assert_eq!(wins[PlayerSlot::ZERO], 0);
/// assert_eq!(wins[PlayerSlot::ONE], 1);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SlotMap<T> {
    data: [T; 2],
}

impl<T> SlotMap<T> {
    /// Create a new SlotMap with values from a factory function.
    pub fn new(factory: impl Fn(PlayerSlot) -> T) -> Self {
        Self {
            data: [factory(PlayerSlot::ZERO), factory(PlayerSlot::ONE)],
        }
    }

    /// Create a new SlotMap with both entries set to the same value.
    pub fn with_value(value: T) -> Self
    where
        T: Clone,
    {
        Self::new(|_| value.clone())
    }

    /// Get a reference to a slot's data.
    #[must_use]
    pub fn get(&self, slot: PlayerSlot) -> &T {
        &self.data[slot.index()]
    }

    /// Get a mutable reference to a slot's data.
    pub fn get_mut(&mut self, slot: PlayerSlot) -> &mut T {
        &mut self.data[slot.index()]
    }

    /// Iterate over (PlayerSlot, &T) pairs in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (PlayerSlot, &T)> {
        PlayerSlot::both().zip(self.data.iter())
    }
}

impl<T: Default> Default for SlotMap<T> {
    fn default() -> Self {
        Self::new(|_| T::default())
    }
}

impl<T> Index<PlayerSlot> for SlotMap<T> {
    type Output = T;

    fn index(&self, slot: PlayerSlot) -> &Self::Output {
        self.get(slot)
    }
}

impl<T> IndexMut<PlayerSlot> for SlotMap<T> {
    fn index_mut(&mut self, slot: PlayerSlot) -> &mut Self::Output {
        self.get_mut(slot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_basics() {
        assert_eq!(PlayerSlot::ZERO.index(), 0);
        assert_eq!(PlayerSlot::ONE.index(), 1);
        assert_eq!(format!("{}", PlayerSlot::ONE), "slot 1");
    }

    #[test]
    fn test_slot_new_rejects_out_of_range() {
        assert_eq!(PlayerSlot::new(0), Some(PlayerSlot::ZERO));
        assert_eq!(PlayerSlot::new(1), Some(PlayerSlot::ONE));
        assert_eq!(PlayerSlot::new(2), None);
    }

    #[test]
    fn test_slot_other_is_involution() {
        for slot in PlayerSlot::both() {
            assert_eq!(slot.other().other(), slot);
        }
    }

    #[test]
    fn test_slot_map_factory() {
        let map: SlotMap<usize> = SlotMap::new(|s| s.index() * 10);
        assert_eq!(map[PlayerSlot::ZERO], 0);
        assert_eq!(map[PlayerSlot::ONE], 10);
    }

    #[test]
    fn test_slot_map_mutation() {
        let mut map: SlotMap<i32> = SlotMap::with_value(0);
        map[PlayerSlot::ZERO] = 7;
        assert_eq!(map[PlayerSlot::ZERO], 7);
        assert_eq!(map[PlayerSlot::ONE], 0);
    }

    #[test]
    fn test_slot_map_iter() {
        let map: SlotMap<i32> = SlotMap::new(|s| s.index() as i32);
        let pairs: Vec<_> = map.iter().collect();
        assert_eq!(pairs, vec![(PlayerSlot::ZERO, &0), (PlayerSlot::ONE, &1)]);
    }

    #[test]
    fn test_slot_map_serialization() {
        let map: SlotMap<u32> = SlotMap::new(|s| s.index() as u32 + 1);
        let json = serde_json::to_string(&map).unwrap();
        let back: SlotMap<u32> = serde_json::from_str(&json).unwrap();
        assert_eq!(map, back);
    }
}

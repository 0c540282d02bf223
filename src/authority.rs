//! Write authority.
//!
//! There is no referee process: both clients run the same transition
//! tables, and correctness rests on both evaluating the same capability
//! check before constructing a write. Every transition names its required
//! [`Authority`]; an actor that fails the check gets a typed rejection and
//! the document stays untouched.
//!
//! ## The designated advancer
//!
//! Transitions with no natural single owner (advancing a shared turn
//! counter, moving to the next round, evaluating runner round-end) belong
//! to the *designated advancer* — slot 0, the game creator. This is a
//! deliberate, named asymmetry, not an artifact of slot numbering.

use crate::core::PlayerSlot;

/// The slot permitted to perform transitions with no natural single owner.
pub const ADVANCER: PlayerSlot = PlayerSlot::ZERO;

/// The capability a transition requires of its actor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Authority {
    /// Only this slot may act.
    Only(PlayerSlot),
    /// Only the designated advancer may act.
    Advancer,
    /// Either slot may act (per-slot ownership is checked elsewhere).
    AnySlot,
}

impl Authority {
    /// Does `actor` hold this capability?
    #[must_use]
    pub fn permits(self, actor: PlayerSlot) -> bool {
        match self {
            Authority::Only(slot) => actor == slot,
            Authority::Advancer => actor == ADVANCER,
            Authority::AnySlot => true,
        }
    }
}

/// The slot that answers (or asks) on turn `t` when each player takes the
/// whole question pool in a row: `floor(t / pool) mod 2`.
#[must_use]
pub fn answering_slot(turn: u32, pool_size: u32) -> PlayerSlot {
    if (turn / pool_size) % 2 == 0 {
        PlayerSlot::ZERO
    } else {
        PlayerSlot::ONE
    }
}

/// The slot that guesses on turn `t`: the opponent of [`answering_slot`].
#[must_use]
pub fn guessing_slot(turn: u32, pool_size: u32) -> PlayerSlot {
    answering_slot(turn, pool_size).other()
}

/// The active slot when play simply alternates: `t mod 2`.
#[must_use]
pub fn alternating_slot(turn: u32) -> PlayerSlot {
    if turn % 2 == 0 {
        PlayerSlot::ZERO
    } else {
        PlayerSlot::ONE
    }
}

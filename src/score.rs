//! Score bonuses.
//!
//! Score changes are side effects of specific round transitions, never a
//! standalone operation: the constants live here, the awarding op is
//! embedded in the transition's patch, and the update helper enforces that
//! scores only move upward.

use crate::core::PlayerSlot;
use crate::patch::PatchOp;

/// Correctly guessing the opponent's binary choice.
pub const CHOICE_MATCH_BONUS: u32 = 10;

/// A guess judged correct by the asking player in the trivia round.
pub const TRIVIA_CORRECT_BONUS: u32 = 20;

/// Matching answers in the mind-meld round; both players receive it.
pub const MIND_MELD_MATCH_BONUS: u32 = 15;

/// Winning an arcade best-of-3 series.
pub const ARCADE_SERIES_BONUS: u32 = 50;

/// Build the awarding op for a transition patch.
pub(crate) fn award(slot: PlayerSlot, points: u32) -> PatchOp {
    PatchOp::AwardPoints { slot, points }
}

//! Mind-meld round: both players answer the same prompt at once and score
//! when their answers match.
//!
//! There is no turn ownership here — authority is per-slot. Each player
//! writes only their own answer (an unguarded, commutative write). Once
//! both slots have answered, the designated advancer resolves the match:
//! a case-insensitive, whitespace-trimmed comparison, so `"Banana"` and
//! `" banana "` count as a meld.

use crate::authority::Authority;
use crate::core::{Game, MindMeldState, PlayerSlot};
use crate::patch::{GamePatch, MindMeldOp, PatchOp, RoundOp};
use crate::score::{award, MIND_MELD_MATCH_BONUS};

use super::{leave_round, TransitionError};

/// Word-association prompts, one per meld attempt.
pub const PROMPTS: [&str; 5] = [
    "A word that goes with: midnight",
    "The first thing you pack for a trip",
    "A food you both secretly love",
    "A sound that means home",
    "One word for how this year felt",
];

/// Meld attempts in the round.
pub const POOL_SIZE: u32 = PROMPTS.len() as u32;

/// The prompt for an attempt.
#[must_use]
pub fn prompt(index: u32) -> &'static str {
    PROMPTS[(index % POOL_SIZE) as usize]
}

#[derive(Clone, Debug, PartialEq)]
pub enum MindMeldAction {
    /// Write the actor's own answer. Concurrent with the opponent's.
    SubmitAnswer(String),
    /// Resolve the match once both slots have answered. Advancer only,
    /// idempotent: a second resolve sees `show_result` set and is rejected.
    Resolve,
    /// Next prompt, or leave the round after the last one.
    Advance,
}

/// Both slots have answered and the result has not been revealed yet — the
/// condition the advancer's client watches for to fire [`MindMeldAction::Resolve`].
#[must_use]
pub fn resolve_due(state: &MindMeldState) -> bool {
    !state.show_result && PlayerSlot::both().all(|slot| state.answers[slot].is_some())
}

/// Case-insensitive, whitespace-trimmed equality.
#[must_use]
pub fn is_match(a: &str, b: &str) -> bool {
    normalize(a) == normalize(b)
}

fn normalize(answer: &str) -> String {
    answer.trim().to_lowercase()
}

pub(crate) fn apply(
    game: &Game,
    state: &MindMeldState,
    actor: PlayerSlot,
    action: &MindMeldAction,
) -> Result<GamePatch, TransitionError> {
    match action {
        MindMeldAction::SubmitAnswer(text) => {
            // Per-slot ownership: any slot, but only into its own field.
            if !Authority::AnySlot.permits(actor) {
                return Err(TransitionError::NotAuthorized { actor });
            }
            if state.show_result {
                return Err(TransitionError::InvalidAction("prompt already resolved"));
            }
            if state.answers[actor].is_some() {
                return Err(TransitionError::InvalidAction("answer already submitted"));
            }
            if text.trim().is_empty() {
                return Err(TransitionError::InvalidAction("answer is empty"));
            }
            // Unguarded: the opponent may be writing their slot at the same
            // moment, and both writes must land.
            Ok(GamePatch::unguarded([PatchOp::Round(RoundOp::MindMeld(
                MindMeldOp::SetAnswer {
                    slot: actor,
                    answer: Some(text.clone()),
                },
            ))]))
        }
        MindMeldAction::Resolve => {
            if !Authority::Advancer.permits(actor) {
                return Err(TransitionError::NotAuthorized { actor });
            }
            if !resolve_due(state) {
                return Err(TransitionError::InvalidAction(
                    "waiting for answers, or already resolved",
                ));
            }
            let a = state.answers[PlayerSlot::ZERO].as_deref().unwrap_or("");
            let b = state.answers[PlayerSlot::ONE].as_deref().unwrap_or("");
            let mut ops = vec![PatchOp::Round(RoundOp::MindMeld(
                MindMeldOp::SetShowResult(true),
            ))];
            if is_match(a, b) {
                ops.push(award(PlayerSlot::ZERO, MIND_MELD_MATCH_BONUS));
                ops.push(award(PlayerSlot::ONE, MIND_MELD_MATCH_BONUS));
            }
            Ok(GamePatch::versioned(game.version, ops))
        }
        MindMeldAction::Advance => {
            if !Authority::Advancer.permits(actor) {
                return Err(TransitionError::NotAuthorized { actor });
            }
            if !state.show_result {
                return Err(TransitionError::InvalidAction("prompt not resolved yet"));
            }
            if state.prompt_index + 1 >= POOL_SIZE {
                Ok(GamePatch::versioned(game.version, [leave_round(game)]))
            } else {
                Ok(GamePatch::versioned(
                    game.version,
                    [
                        PatchOp::Round(RoundOp::MindMeld(MindMeldOp::SetPromptIndex(
                            state.prompt_index + 1,
                        ))),
                        PatchOp::Round(RoundOp::MindMeld(MindMeldOp::SetAnswer {
                            slot: PlayerSlot::ZERO,
                            answer: None,
                        })),
                        PatchOp::Round(RoundOp::MindMeld(MindMeldOp::SetAnswer {
                            slot: PlayerSlot::ONE,
                            answer: None,
                        })),
                        PatchOp::Round(RoundOp::MindMeld(MindMeldOp::SetShowResult(false))),
                    ],
                ))
            }
        }
    }
}

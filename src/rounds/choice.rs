//! Choice-guessing round: one player picks between two options in secret,
//! the other guesses the pick.
//!
//! Turn `t` maps to an answering player (`floor(t / N) mod 2`, `N` = pool
//! size) and a guessing player (the other slot); the question is `t mod N`.
//! Over `2N` turns each player answers the whole pool once. The final
//! advance leaves the round.

use crate::authority::{answering_slot, guessing_slot, Authority};
use crate::core::{ChoiceState, Game, PlayerSlot};
use crate::patch::{ChoiceOp, GamePatch, PatchOp, RoundOp};
use crate::score::{award, CHOICE_MATCH_BONUS};

use super::{leave_round, TransitionError};

/// Binary option pairs. Both players answer each pair once.
pub const QUESTIONS: [(&str, &str); 5] = [
    ("Coffee", "Tea"),
    ("Mountains", "Beach"),
    ("Movie Night In", "Night Out"),
    ("Sweet", "Salty"),
    ("Early Bird", "Night Owl"),
];

/// Questions each player answers.
pub const POOL_SIZE: u32 = QUESTIONS.len() as u32;

/// Total turns in the round.
pub const TOTAL_TURNS: u32 = POOL_SIZE * 2;

/// The option pair for a turn.
#[must_use]
pub fn question(turn: u32) -> (&'static str, &'static str) {
    QUESTIONS[(turn % POOL_SIZE) as usize]
}

#[derive(Clone, Debug, PartialEq)]
pub enum ChoiceAction {
    /// The answering player commits their secret pick.
    SubmitAnswer(String),
    /// The guessing player commits a guess and reveals the result.
    SubmitGuess(String),
    /// Next turn, or leave the round after the last turn.
    Advance,
}

fn is_option(turn: u32, value: &str) -> bool {
    let (a, b) = question(turn);
    value == a || value == b
}

pub(crate) fn apply(
    game: &Game,
    state: &ChoiceState,
    actor: PlayerSlot,
    action: &ChoiceAction,
) -> Result<GamePatch, TransitionError> {
    match action {
        ChoiceAction::SubmitAnswer(option) => {
            if !Authority::Only(answering_slot(state.turn, POOL_SIZE)).permits(actor) {
                return Err(TransitionError::NotAuthorized { actor });
            }
            if state.answer.is_some() || state.show_result {
                return Err(TransitionError::InvalidAction("answer already submitted"));
            }
            if !is_option(state.turn, option) {
                return Err(TransitionError::InvalidAction(
                    "answer is not one of the question's options",
                ));
            }
            Ok(GamePatch::versioned(
                game.version,
                [PatchOp::Round(RoundOp::Choice(ChoiceOp::SetAnswer(Some(
                    option.clone(),
                ))))],
            ))
        }
        ChoiceAction::SubmitGuess(option) => {
            if !Authority::Only(guessing_slot(state.turn, POOL_SIZE)).permits(actor) {
                return Err(TransitionError::NotAuthorized { actor });
            }
            let Some(answer) = &state.answer else {
                return Err(TransitionError::InvalidAction("nothing to guess yet"));
            };
            if state.show_result {
                return Err(TransitionError::InvalidAction("guess already submitted"));
            }
            if !is_option(state.turn, option) {
                return Err(TransitionError::InvalidAction(
                    "guess is not one of the question's options",
                ));
            }

            let mut ops = vec![
                PatchOp::Round(RoundOp::Choice(ChoiceOp::SetGuess(Some(option.clone())))),
                PatchOp::Round(RoundOp::Choice(ChoiceOp::SetShowResult(true))),
            ];
            // Exact string match; the same catalog string was validated on
            // both sides.
            if option == answer {
                ops.push(award(actor, CHOICE_MATCH_BONUS));
            }
            Ok(GamePatch::versioned(game.version, ops))
        }
        ChoiceAction::Advance => {
            if !Authority::Advancer.permits(actor) {
                return Err(TransitionError::NotAuthorized { actor });
            }
            if !state.show_result {
                return Err(TransitionError::InvalidAction("turn is still in progress"));
            }
            if state.turn + 1 >= TOTAL_TURNS {
                Ok(GamePatch::versioned(game.version, [leave_round(game)]))
            } else {
                Ok(GamePatch::versioned(
                    game.version,
                    [
                        PatchOp::Round(RoundOp::Choice(ChoiceOp::SetTurn(state.turn + 1))),
                        PatchOp::Round(RoundOp::Choice(ChoiceOp::SetAnswer(None))),
                        PatchOp::Round(RoundOp::Choice(ChoiceOp::SetGuess(None))),
                        PatchOp::Round(RoundOp::Choice(ChoiceOp::SetShowResult(false))),
                    ],
                ))
            }
        }
    }
}

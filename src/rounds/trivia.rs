//! Trivia round: free-text guesses about the asking player, judged by the
//! asking player rather than by string comparison.
//!
//! Roles follow the same `floor(t / N) mod 2` mapping as the choice round.
//! Correctness here is a subjective human judgement — the asking player
//! decides whether "the coffee place on 5th" means the same as "that café".

use crate::authority::{answering_slot, guessing_slot, Authority};
use crate::core::{Game, Judgement, PlayerSlot, TriviaPhase, TriviaState};
use crate::patch::{GamePatch, PatchOp, RoundOp, TriviaOp};
use crate::score::{award, TRIVIA_CORRECT_BONUS};

use super::{leave_round, TransitionError};

/// Personal-knowledge prompts. Each player is asked the whole pool once.
pub const QUESTIONS: [&str; 5] = [
    "Where did we first meet?",
    "What is my favorite car?",
    "When did we first meet? (date)",
    "Gym with me or go to cafes with me, which one would I prefer?",
    "What is my dream honeymoon destination?",
];

/// Questions each player is asked about.
pub const POOL_SIZE: u32 = QUESTIONS.len() as u32;

/// Total turns in the round.
pub const TOTAL_TURNS: u32 = POOL_SIZE * 2;

/// The prompt for a turn, about the asking player.
#[must_use]
pub fn question(turn: u32) -> &'static str {
    QUESTIONS[(turn % POOL_SIZE) as usize]
}

#[derive(Clone, Debug, PartialEq)]
pub enum TriviaAction {
    /// The guessing player submits a free-text answer.
    SubmitGuess(String),
    /// The asking player rules on the submitted guess.
    Judge(Judgement),
    /// Next turn, or leave the round after the last turn.
    Advance,
}

pub(crate) fn apply(
    game: &Game,
    state: &TriviaState,
    actor: PlayerSlot,
    action: &TriviaAction,
) -> Result<GamePatch, TransitionError> {
    match action {
        TriviaAction::SubmitGuess(text) => {
            if !Authority::Only(guessing_slot(state.turn, POOL_SIZE)).permits(actor) {
                return Err(TransitionError::NotAuthorized { actor });
            }
            if state.phase != TriviaPhase::Answering {
                return Err(TransitionError::InvalidAction("guess already submitted"));
            }
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return Err(TransitionError::InvalidAction("guess is empty"));
            }
            Ok(GamePatch::versioned(
                game.version,
                [
                    PatchOp::Round(RoundOp::Trivia(TriviaOp::SetGuess(Some(
                        trimmed.to_string(),
                    )))),
                    PatchOp::Round(RoundOp::Trivia(TriviaOp::SetPhase(TriviaPhase::Judging))),
                ],
            ))
        }
        TriviaAction::Judge(judgement) => {
            if !Authority::Only(answering_slot(state.turn, POOL_SIZE)).permits(actor) {
                return Err(TransitionError::NotAuthorized { actor });
            }
            if state.phase != TriviaPhase::Judging {
                return Err(TransitionError::InvalidAction("nothing to judge"));
            }
            let mut ops = vec![
                PatchOp::Round(RoundOp::Trivia(TriviaOp::SetJudgement(Some(*judgement)))),
                PatchOp::Round(RoundOp::Trivia(TriviaOp::SetPhase(TriviaPhase::Result))),
            ];
            if *judgement == Judgement::Correct {
                ops.push(award(
                    guessing_slot(state.turn, POOL_SIZE),
                    TRIVIA_CORRECT_BONUS,
                ));
            }
            Ok(GamePatch::versioned(game.version, ops))
        }
        TriviaAction::Advance => {
            if !Authority::Advancer.permits(actor) {
                return Err(TransitionError::NotAuthorized { actor });
            }
            if state.phase != TriviaPhase::Result {
                return Err(TransitionError::InvalidAction("turn is still in progress"));
            }
            if state.turn + 1 >= TOTAL_TURNS {
                Ok(GamePatch::versioned(game.version, [leave_round(game)]))
            } else {
                Ok(GamePatch::versioned(
                    game.version,
                    [
                        PatchOp::Round(RoundOp::Trivia(TriviaOp::SetTurn(state.turn + 1))),
                        PatchOp::Round(RoundOp::Trivia(TriviaOp::SetGuess(None))),
                        PatchOp::Round(RoundOp::Trivia(TriviaOp::SetJudgement(None))),
                        PatchOp::Round(RoundOp::Trivia(TriviaOp::SetPhase(
                            TriviaPhase::Answering,
                        ))),
                    ],
                ))
            }
        }
    }
}

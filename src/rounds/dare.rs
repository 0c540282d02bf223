//! Dare/truth round: the active player picks a fate, an external generator
//! supplies the prompt text, and the active player advances when done.
//!
//! The engine only manages the `is_loading`/`content` fields; generation
//! itself lives behind [`crate::content::ContentGenerator`]. This round is
//! always terminal: after the last turn the game ends rather than moving to
//! another round.

use crate::authority::{alternating_slot, Authority};
use crate::core::{DareChoice, DareState, Game, GamePhase, PlayerSlot};
use crate::patch::{DareOp, GamePatch, PatchOp, RoundOp};

use super::TransitionError;

/// Turns before the game ends.
pub const MAX_TURNS: u32 = 3;

/// The slot whose fate is being decided on a turn.
#[must_use]
pub fn active_slot(turn: u32) -> PlayerSlot {
    alternating_slot(turn)
}

#[derive(Clone, Debug, PartialEq)]
pub enum DareAction {
    /// The active player picks dare or truth; content starts loading.
    Choose(DareChoice),
    /// Generated (or fallback) text arrived on the active player's client.
    ContentReady(String),
    /// Done with this fate; next turn or end of game.
    Advance,
}

pub(crate) fn apply(
    game: &Game,
    state: &DareState,
    actor: PlayerSlot,
    action: &DareAction,
) -> Result<GamePatch, TransitionError> {
    let active = active_slot(state.turn);
    match action {
        DareAction::Choose(choice) => {
            if !Authority::Only(active).permits(actor) {
                return Err(TransitionError::NotAuthorized { actor });
            }
            if state.choice.is_some() || state.is_loading {
                return Err(TransitionError::InvalidAction("fate already chosen"));
            }
            Ok(GamePatch::versioned(
                game.version,
                [
                    PatchOp::Round(RoundOp::Dare(DareOp::SetChoice(Some(*choice)))),
                    PatchOp::Round(RoundOp::Dare(DareOp::SetLoading(true))),
                    PatchOp::Round(RoundOp::Dare(DareOp::SetContent(String::new()))),
                ],
            ))
        }
        DareAction::ContentReady(text) => {
            if !Authority::Only(active).permits(actor) {
                return Err(TransitionError::NotAuthorized { actor });
            }
            if !state.is_loading {
                return Err(TransitionError::InvalidAction("no content was requested"));
            }
            Ok(GamePatch::versioned(
                game.version,
                [
                    PatchOp::Round(RoundOp::Dare(DareOp::SetContent(text.clone()))),
                    PatchOp::Round(RoundOp::Dare(DareOp::SetLoading(false))),
                ],
            ))
        }
        DareAction::Advance => {
            // The active player advances their own turn, not the designated
            // advancer: the fate is theirs to complete.
            if !Authority::Only(active).permits(actor) {
                return Err(TransitionError::NotAuthorized { actor });
            }
            if state.is_loading || state.content.is_empty() {
                return Err(TransitionError::InvalidAction("fate not delivered yet"));
            }
            if state.turn + 1 >= MAX_TURNS {
                Ok(GamePatch::versioned(
                    game.version,
                    [PatchOp::SetPhase(GamePhase::Ended)],
                ))
            } else {
                Ok(GamePatch::versioned(
                    game.version,
                    [
                        PatchOp::Round(RoundOp::Dare(DareOp::SetTurn(state.turn + 1))),
                        PatchOp::Round(RoundOp::Dare(DareOp::SetChoice(None))),
                        PatchOp::Round(RoundOp::Dare(DareOp::SetContent(String::new()))),
                    ],
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{GameId, RoundKind, RoundSchedule, RoundState};
    use crate::patch::apply_patch;
    use crate::rounds::RoundAction;

    fn game() -> Game {
        let mut game = Game::new(
            GameId::parse("DARE").unwrap(),
            "Avery",
            RoundSchedule::party(),
        );
        game.phase = GamePhase::Active;
        game.round = RoundState::initial(RoundKind::Dare);
        game
    }

    fn step(game: &mut Game, actor: PlayerSlot, action: DareAction) {
        let patch = crate::rounds::apply(game, actor, &RoundAction::Dare(action)).unwrap();
        apply_patch(game, &patch).unwrap();
    }

    fn dare_state(game: &Game) -> &DareState {
        match &game.round {
            RoundState::Dare(state) => state,
            other => panic!("expected dare round, got {other:?}"),
        }
    }

    #[test]
    fn test_inactive_player_cannot_choose() {
        let game = game();
        // Turn 0 belongs to slot 0.
        let err = crate::rounds::apply(
            &game,
            PlayerSlot::ONE,
            &RoundAction::Dare(DareAction::Choose(DareChoice::Dare)),
        )
        .unwrap_err();
        assert_eq!(err, TransitionError::NotAuthorized { actor: PlayerSlot::ONE });
    }

    #[test]
    fn test_choose_starts_loading() {
        let mut game = game();
        step(&mut game, PlayerSlot::ZERO, DareAction::Choose(DareChoice::Truth));
        let state = dare_state(&game);
        assert_eq!(state.choice, Some(DareChoice::Truth));
        assert!(state.is_loading);
        assert!(state.content.is_empty());
    }

    #[test]
    fn test_cannot_advance_before_content() {
        let mut game = game();
        step(&mut game, PlayerSlot::ZERO, DareAction::Choose(DareChoice::Dare));
        let err = crate::rounds::apply(
            &game,
            PlayerSlot::ZERO,
            &RoundAction::Dare(DareAction::Advance),
        )
        .unwrap_err();
        assert!(matches!(err, TransitionError::InvalidAction(_)));
    }

    #[test]
    fn test_turns_alternate() {
        let mut game = game();
        step(&mut game, PlayerSlot::ZERO, DareAction::Choose(DareChoice::Dare));
        step(
            &mut game,
            PlayerSlot::ZERO,
            DareAction::ContentReady("Sing the chorus of your anthem.".into()),
        );
        step(&mut game, PlayerSlot::ZERO, DareAction::Advance);

        let state = dare_state(&game);
        assert_eq!(state.turn, 1);
        assert_eq!(state.choice, None);
        assert_eq!(active_slot(state.turn), PlayerSlot::ONE);
    }

    #[test]
    fn test_last_turn_ends_the_game() {
        let mut game = game();
        for turn in 0..MAX_TURNS {
            let actor = active_slot(turn);
            step(&mut game, actor, DareAction::Choose(DareChoice::Truth));
            step(&mut game, actor, DareAction::ContentReady("Tell one secret.".into()));
            step(&mut game, actor, DareAction::Advance);
        }
        assert_eq!(game.phase, GamePhase::Ended);
    }
}

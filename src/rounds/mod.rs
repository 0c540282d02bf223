//! Round state machines.
//!
//! Each mini-game owns its transition table in a submodule. The dispatcher
//! here validates that the game is active, that the action targets the
//! round currently being played, and hands off to the round's `apply`,
//! which checks the actor's [`Authority`](crate::authority::Authority) and
//! emits a typed patch.
//!
//! Both clients run identical copies of these tables; an unauthorized or
//! out-of-phase action is rejected with a typed error and no state changes.
//! The client layer drops such rejections silently (a disabled button that
//! was clicked anyway is not an error worth surfacing).

pub mod choice;
pub mod dare;
pub mod mind_meld;
pub mod racer;
pub mod runner;
pub mod trivia;

use crate::core::{Game, GamePhase, PlayerSlot, RoundKind, RoundState};
use crate::patch::{GamePatch, PatchOp};

pub use choice::ChoiceAction;
pub use dare::DareAction;
pub use mind_meld::MindMeldAction;
pub use racer::RacerAction;
pub use runner::RunnerAction;
pub use trivia::TriviaAction;

/// An input a client feeds to the engine, tagged by round.
#[derive(Clone, Debug, PartialEq)]
pub enum RoundAction {
    Choice(ChoiceAction),
    Trivia(TriviaAction),
    MindMeld(MindMeldAction),
    Racer(RacerAction),
    Runner(RunnerAction),
    Dare(DareAction),
}

impl RoundAction {
    fn kind(&self) -> RoundKind {
        match self {
            RoundAction::Choice(_) => RoundKind::Choice,
            RoundAction::Trivia(_) => RoundKind::Trivia,
            RoundAction::MindMeld(_) => RoundKind::MindMeld,
            RoundAction::Racer(_) => RoundKind::Racer,
            RoundAction::Runner(_) => RoundKind::Runner,
            RoundAction::Dare(_) => RoundKind::Dare,
        }
    }
}

/// Why a transition was rejected. The document is untouched in every case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionError {
    /// The game is not in the `Active` phase.
    GameNotActive,
    /// The action targets a round that is not being played.
    WrongRound {
        current: RoundKind,
        action: RoundKind,
    },
    /// The actor does not hold authority for this transition.
    NotAuthorized { actor: PlayerSlot },
    /// Authority held, but the round is not in a state that accepts this
    /// transition (or its payload is unusable).
    InvalidAction(&'static str),
}

impl std::fmt::Display for TransitionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransitionError::GameNotActive => write!(f, "game is not active"),
            TransitionError::WrongRound { current, action } => {
                write!(f, "action for round {action:?} during {current:?}")
            }
            TransitionError::NotAuthorized { actor } => {
                write!(f, "{actor} does not hold authority for this transition")
            }
            TransitionError::InvalidAction(reason) => write!(f, "{reason}"),
        }
    }
}

impl std::error::Error for TransitionError {}

/// Validate an action and produce the patch that realizes it.
///
/// Pure: reads the snapshot, never mutates. Both clients calling this with
/// the same snapshot and action get the same patch.
pub fn apply(
    game: &Game,
    actor: PlayerSlot,
    action: &RoundAction,
) -> Result<GamePatch, TransitionError> {
    if game.phase != GamePhase::Active {
        return Err(TransitionError::GameNotActive);
    }
    let current = game.current_round();
    if action.kind() != current {
        return Err(TransitionError::WrongRound {
            current,
            action: action.kind(),
        });
    }

    match (&game.round, action) {
        (RoundState::Choice(state), RoundAction::Choice(action)) => {
            choice::apply(game, state, actor, action)
        }
        (RoundState::Trivia(state), RoundAction::Trivia(action)) => {
            trivia::apply(game, state, actor, action)
        }
        (RoundState::MindMeld(state), RoundAction::MindMeld(action)) => {
            mind_meld::apply(game, state, actor, action)
        }
        (RoundState::Racer(state), RoundAction::Racer(action)) => {
            racer::apply(game, state, actor, action)
        }
        (RoundState::Runner(state), RoundAction::Runner(action)) => {
            runner::apply(game, state, actor, action)
        }
        (RoundState::Dare(state), RoundAction::Dare(action)) => {
            dare::apply(game, state, actor, action)
        }
        // kind() equality above makes this unreachable.
        _ => Err(TransitionError::WrongRound {
            current,
            action: action.kind(),
        }),
    }
}

/// The op that leaves the current round: enter the next scheduled round, or
/// end the game after the last one.
pub(crate) fn leave_round(game: &Game) -> PatchOp {
    match game.schedule.after(game.current_round()) {
        Some(next) => PatchOp::EnterRound(next),
        None => PatchOp::SetPhase(GamePhase::Ended),
    }
}

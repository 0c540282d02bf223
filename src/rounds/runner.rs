//! Jump-and-dodge runner round: best of 3 races over a deterministic
//! obstacle course (see [`crate::sim::runner`]).
//!
//! Write partitioning is stricter here than in the racer: each player
//! writes only their own vertical position and life count, while the shared
//! scroll `distance` and the round-end evaluation belong exclusively to the
//! designated advancer, so the scroll rate is single-writer and terminal
//! transitions cannot be issued twice.

use crate::authority::Authority;
use crate::core::{ArcadeStatus, Game, PlayerSlot, RunnerState};
use crate::patch::{GamePatch, PatchOp, RoundOp, RunnerOp};
use crate::score::{award, ARCADE_SERIES_BONUS};
use crate::sim::runner::{generate_course, FINISH_DISTANCE};

use super::racer::series_winner;
use super::{leave_round, TransitionError};

#[derive(Clone, Debug, PartialEq)]
pub enum RunnerAction {
    /// Leave the intro, publish the course for the current race, start
    /// scrolling. Advancer only.
    Start,
    /// Periodic own-slot mirror write from the local simulation.
    Reconcile { vertical_position: f32 },
    /// The actor's own collision cost a life (and possibly their run).
    LoseLife,
    /// Advance the shared scroll distance. Advancer only.
    AdvanceDistance(f32),
    /// Close the race once a terminal condition holds. Advancer only.
    EndRace,
    /// From round-end: next race or close the series; from finished:
    /// leave the round. Advancer only.
    Advance,
}

/// The race outcome once a terminal condition holds, else `None`.
/// `Some(None)` is a drawn race: finish reached with equal lives.
#[must_use]
pub fn race_outcome(state: &RunnerState) -> Option<Option<PlayerSlot>> {
    let alive =
        |slot: PlayerSlot| state.player_states[slot].is_alive;
    match (alive(PlayerSlot::ZERO), alive(PlayerSlot::ONE)) {
        (false, false) => return Some(None),
        (false, true) => return Some(Some(PlayerSlot::ONE)),
        (true, false) => return Some(Some(PlayerSlot::ZERO)),
        (true, true) => {}
    }
    if state.distance >= FINISH_DISTANCE {
        let l0 = state.lives[PlayerSlot::ZERO];
        let l1 = state.lives[PlayerSlot::ONE];
        return Some(match l0.cmp(&l1) {
            std::cmp::Ordering::Greater => Some(PlayerSlot::ZERO),
            std::cmp::Ordering::Less => Some(PlayerSlot::ONE),
            std::cmp::Ordering::Equal => None,
        });
    }
    None
}

pub(crate) fn apply(
    game: &Game,
    state: &RunnerState,
    actor: PlayerSlot,
    action: &RunnerAction,
) -> Result<GamePatch, TransitionError> {
    match action {
        RunnerAction::Start => {
            if !Authority::Advancer.permits(actor) {
                return Err(TransitionError::NotAuthorized { actor });
            }
            if state.status != ArcadeStatus::Intro {
                return Err(TransitionError::InvalidAction("race already started"));
            }
            Ok(GamePatch::versioned(
                game.version,
                [
                    PatchOp::Round(RoundOp::Runner(RunnerOp::SetObstacles(generate_course(
                        state.current_race,
                    )))),
                    PatchOp::Round(RoundOp::Runner(RunnerOp::SetStatus(ArcadeStatus::Playing))),
                ],
            ))
        }
        RunnerAction::Reconcile { vertical_position } => {
            if state.status != ArcadeStatus::Playing {
                return Err(TransitionError::InvalidAction("race is not running"));
            }
            if !state.player_states[actor].is_alive {
                return Err(TransitionError::InvalidAction("player is out of the race"));
            }
            Ok(GamePatch::unguarded([PatchOp::Round(RoundOp::Runner(
                RunnerOp::SetVerticalPosition {
                    slot: actor,
                    value: *vertical_position,
                },
            ))]))
        }
        RunnerAction::LoseLife => {
            if state.status != ArcadeStatus::Playing {
                return Err(TransitionError::InvalidAction("race is not running"));
            }
            if !state.player_states[actor].is_alive {
                return Err(TransitionError::InvalidAction("player is out of the race"));
            }
            // Writes only the actor's own life count, never the opponent's.
            let mut ops = vec![PatchOp::Round(RoundOp::Runner(RunnerOp::LoseLife(actor)))];
            if state.lives[actor] <= 1 {
                ops.push(PatchOp::Round(RoundOp::Runner(RunnerOp::SetAlive {
                    slot: actor,
                    value: false,
                })));
            }
            Ok(GamePatch::unguarded(ops))
        }
        RunnerAction::AdvanceDistance(distance) => {
            if !Authority::Advancer.permits(actor) {
                return Err(TransitionError::NotAuthorized { actor });
            }
            if state.status != ArcadeStatus::Playing {
                return Err(TransitionError::InvalidAction("race is not running"));
            }
            if *distance < state.distance {
                return Err(TransitionError::InvalidAction("scroll cannot run backwards"));
            }
            Ok(GamePatch::unguarded([PatchOp::Round(RoundOp::Runner(
                RunnerOp::SetDistance(*distance),
            ))]))
        }
        RunnerAction::EndRace => {
            if !Authority::Advancer.permits(actor) {
                return Err(TransitionError::NotAuthorized { actor });
            }
            if state.status != ArcadeStatus::Playing {
                return Err(TransitionError::InvalidAction("race is not running"));
            }
            let Some(winner) = race_outcome(state) else {
                return Err(TransitionError::InvalidAction("race is still undecided"));
            };
            let mut ops = vec![
                PatchOp::Round(RoundOp::Runner(RunnerOp::SetStatus(ArcadeStatus::RoundEnd))),
                PatchOp::Round(RoundOp::Runner(RunnerOp::SetRoundWinner(winner))),
            ];
            if let Some(slot) = winner {
                ops.push(PatchOp::Round(RoundOp::Runner(RunnerOp::AddWin(slot))));
            }
            Ok(GamePatch::versioned(game.version, ops))
        }
        RunnerAction::Advance => {
            if !Authority::Advancer.permits(actor) {
                return Err(TransitionError::NotAuthorized { actor });
            }
            match state.status {
                ArcadeStatus::RoundEnd => {
                    if let Some(winner) = series_winner(&state.wins) {
                        Ok(GamePatch::versioned(
                            game.version,
                            [
                                PatchOp::Round(RoundOp::Runner(RunnerOp::SetStatus(
                                    ArcadeStatus::Finished,
                                ))),
                                award(winner, ARCADE_SERIES_BONUS),
                            ],
                        ))
                    } else {
                        Ok(GamePatch::versioned(
                            game.version,
                            [
                                PatchOp::Round(RoundOp::Runner(RunnerOp::SetCurrentRace(
                                    state.current_race + 1,
                                ))),
                                PatchOp::Round(RoundOp::Runner(RunnerOp::ResetRace)),
                                PatchOp::Round(RoundOp::Runner(RunnerOp::SetObstacles(
                                    generate_course(state.current_race + 1),
                                ))),
                                PatchOp::Round(RoundOp::Runner(RunnerOp::SetStatus(
                                    ArcadeStatus::Playing,
                                ))),
                            ],
                        ))
                    }
                }
                ArcadeStatus::Finished => {
                    Ok(GamePatch::versioned(game.version, [leave_round(game)]))
                }
                _ => Err(TransitionError::InvalidAction("nothing to advance")),
            }
        }
    }
}

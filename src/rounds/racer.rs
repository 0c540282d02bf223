//! Heat-managed racer round: best of 3 races, each client simulating only
//! its own rider (see [`crate::sim::racer`]).
//!
//! The shared document carries mirrors of both riders plus the race
//! bookkeeping. Reconciliation writes are unguarded per-slot updates at a
//! bounded cadence; everything else is an exactly-once transition.
//!
//! The finish declaration is written by the first client whose *local*
//! position crosses the line. The local simulation driver keeps its own
//! "have I already declared" flag; the version guard catches the two-client
//! photo-finish race and discards the later declaration.

use crate::authority::Authority;
use crate::core::{ArcadeStatus, Game, PlayerSlot, RacerState, SlotMap};
use crate::patch::{GamePatch, PatchOp, RacerOp, RoundOp};
use crate::score::{award, ARCADE_SERIES_BONUS};
use crate::sim::racer::FINISH_LINE;

use super::{leave_round, TransitionError};

/// Races needed to take the series.
pub const RACES_TO_WIN: u32 = 2;

/// Races in a full series.
pub const BEST_OF: u32 = 3;

#[derive(Clone, Debug, PartialEq)]
pub enum RacerAction {
    /// Leave the intro screen and start racing. Advancer only.
    Start,
    /// Periodic own-slot mirror write from the local simulation.
    Reconcile {
        position: f32,
        heat: f32,
        overheated: bool,
    },
    /// The actor's local position crossed the finish line.
    DeclareFinish,
    /// From round-end: next race, or close the series; from finished:
    /// leave the round. Advancer only.
    Advance,
}

/// The slot that has taken the series, if any.
#[must_use]
pub fn series_winner(wins: &SlotMap<u32>) -> Option<PlayerSlot> {
    PlayerSlot::both().find(|&slot| wins[slot] >= RACES_TO_WIN)
}

pub(crate) fn apply(
    game: &Game,
    state: &RacerState,
    actor: PlayerSlot,
    action: &RacerAction,
) -> Result<GamePatch, TransitionError> {
    match action {
        RacerAction::Start => {
            if !Authority::Advancer.permits(actor) {
                return Err(TransitionError::NotAuthorized { actor });
            }
            if state.status != ArcadeStatus::Intro {
                return Err(TransitionError::InvalidAction("race already started"));
            }
            Ok(GamePatch::versioned(
                game.version,
                [PatchOp::Round(RoundOp::Racer(RacerOp::SetStatus(
                    ArcadeStatus::Playing,
                )))],
            ))
        }
        RacerAction::Reconcile {
            position,
            heat,
            overheated,
        } => {
            if state.status != ArcadeStatus::Playing {
                return Err(TransitionError::InvalidAction("race is not running"));
            }
            // Own-slot mirror write; the opponent's fields are untouchable
            // by construction.
            Ok(GamePatch::unguarded([
                PatchOp::Round(RoundOp::Racer(RacerOp::SetPosition {
                    slot: actor,
                    value: position.min(FINISH_LINE),
                })),
                PatchOp::Round(RoundOp::Racer(RacerOp::SetHeat {
                    slot: actor,
                    value: *heat,
                })),
                PatchOp::Round(RoundOp::Racer(RacerOp::SetOverheated {
                    slot: actor,
                    value: *overheated,
                })),
            ]))
        }
        RacerAction::DeclareFinish => {
            if state.status != ArcadeStatus::Playing {
                return Err(TransitionError::InvalidAction("race is not running"));
            }
            if state.round_winner.is_some() {
                return Err(TransitionError::InvalidAction("race already has a winner"));
            }
            Ok(GamePatch::versioned(
                game.version,
                [
                    PatchOp::Round(RoundOp::Racer(RacerOp::SetStatus(ArcadeStatus::RoundEnd))),
                    PatchOp::Round(RoundOp::Racer(RacerOp::SetRoundWinner(Some(actor)))),
                    PatchOp::Round(RoundOp::Racer(RacerOp::AddWin(actor))),
                    PatchOp::Round(RoundOp::Racer(RacerOp::SetPosition {
                        slot: actor,
                        value: FINISH_LINE,
                    })),
                ],
            ))
        }
        RacerAction::Advance => {
            if !Authority::Advancer.permits(actor) {
                return Err(TransitionError::NotAuthorized { actor });
            }
            match state.status {
                ArcadeStatus::RoundEnd => {
                    if let Some(winner) = series_winner(&state.wins) {
                        Ok(GamePatch::versioned(
                            game.version,
                            [
                                PatchOp::Round(RoundOp::Racer(RacerOp::SetStatus(
                                    ArcadeStatus::Finished,
                                ))),
                                award(winner, ARCADE_SERIES_BONUS),
                            ],
                        ))
                    } else {
                        Ok(GamePatch::versioned(
                            game.version,
                            [
                                PatchOp::Round(RoundOp::Racer(RacerOp::SetStatus(
                                    ArcadeStatus::Playing,
                                ))),
                                PatchOp::Round(RoundOp::Racer(RacerOp::SetCurrentRace(
                                    state.current_race + 1,
                                ))),
                                PatchOp::Round(RoundOp::Racer(RacerOp::ResetRace)),
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

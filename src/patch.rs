//! Typed partial updates and the document-update helper.
//!
//! ## GamePatch
//!
//! A patch is a small list of typed field writes plus a guard. Round
//! machines construct patches; the store applies them with
//! [`apply_patch`]. Building updates from typed ops (instead of free-form
//! path strings) means a malformed write cannot be expressed at all, and
//! validation happens before anything mutates.
//!
//! ## Guards
//!
//! Exactly-once transitions (turn advances, winner declarations,
//! cross-round moves) carry the document version they were computed from;
//! a patch based on a stale version is discarded whole. Per-slot mirror
//! writes (positions, heats, answers owned by one player) are unguarded:
//! they are commutative under the per-slot ownership rule and must not be
//! discarded just because the opponent wrote in between. Only guarded
//! patches advance the version token.
//!
//! ## Invariants enforced here
//!
//! - Scores only move upward: awards are `u32` increments.
//! - Lives only move downward, saturating at zero.
//! - A round op against the wrong round rejects the whole patch, leaving
//!   the document untouched.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{
    ArcadeStatus, DareChoice, Game, GamePhase, Judgement, Obstacle, PlayerSlot, RoundKind,
    RoundState, SlotMap, TriviaPhase,
};

/// Whether a patch is protected against stale application.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PatchGuard {
    /// Commutative per-slot write; last-applied-wins is acceptable.
    Unguarded,
    /// Exactly-once transition computed from the given document version.
    Versioned(u64),
}

/// A typed partial update to one game document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GamePatch {
    pub guard: PatchGuard,
    pub ops: SmallVec<[PatchOp; 4]>,
}

impl GamePatch {
    /// An exactly-once transition based on the given document version.
    #[must_use]
    pub fn versioned(based_on: u64, ops: impl IntoIterator<Item = PatchOp>) -> Self {
        Self {
            guard: PatchGuard::Versioned(based_on),
            ops: ops.into_iter().collect(),
        }
    }

    /// A commutative per-slot write.
    #[must_use]
    pub fn unguarded(ops: impl IntoIterator<Item = PatchOp>) -> Self {
        Self {
            guard: PatchGuard::Unguarded,
            ops: ops.into_iter().collect(),
        }
    }
}

/// A single typed field write.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum PatchOp {
    SetPhase(GamePhase),
    SetPlayerName { slot: PlayerSlot, name: String },
    /// Score increment; the only way a score changes.
    AwardPoints { slot: PlayerSlot, points: u32 },
    /// Replace the round sub-document with the initial shape for `RoundKind`.
    EnterRound(RoundKind),
    Round(RoundOp),
}

/// A write into the current round's sub-document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum RoundOp {
    Choice(ChoiceOp),
    Trivia(TriviaOp),
    MindMeld(MindMeldOp),
    Racer(RacerOp),
    Runner(RunnerOp),
    Dare(DareOp),
}

impl RoundOp {
    fn kind(&self) -> RoundKind {
        match self {
            RoundOp::Choice(_) => RoundKind::Choice,
            RoundOp::Trivia(_) => RoundKind::Trivia,
            RoundOp::MindMeld(_) => RoundKind::MindMeld,
            RoundOp::Racer(_) => RoundKind::Racer,
            RoundOp::Runner(_) => RoundKind::Runner,
            RoundOp::Dare(_) => RoundKind::Dare,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ChoiceOp {
    SetAnswer(Option<String>),
    SetGuess(Option<String>),
    SetShowResult(bool),
    SetTurn(u32),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum TriviaOp {
    SetGuess(Option<String>),
    SetJudgement(Option<Judgement>),
    SetPhase(TriviaPhase),
    SetTurn(u32),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum MindMeldOp {
    SetAnswer {
        slot: PlayerSlot,
        answer: Option<String>,
    },
    SetShowResult(bool),
    SetPromptIndex(u32),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum DareOp {
    SetChoice(Option<DareChoice>),
    SetContent(String),
    SetLoading(bool),
    SetTurn(u32),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum RacerOp {
    SetStatus(ArcadeStatus),
    SetCurrentRace(u32),
    SetPosition { slot: PlayerSlot, value: f32 },
    SetHeat { slot: PlayerSlot, value: f32 },
    SetOverheated { slot: PlayerSlot, value: bool },
    AddWin(PlayerSlot),
    SetRoundWinner(Option<PlayerSlot>),
    /// Zero positions/heats/overheated and clear the winner for a new race.
    ResetRace,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum RunnerOp {
    SetStatus(ArcadeStatus),
    SetCurrentRace(u32),
    SetDistance(f32),
    SetObstacles(Vec<Obstacle>),
    SetVerticalPosition { slot: PlayerSlot, value: f32 },
    SetAlive { slot: PlayerSlot, value: bool },
    /// Decrement one life, saturating at zero. Players write only their own.
    LoseLife(PlayerSlot),
    AddWin(PlayerSlot),
    SetRoundWinner(Option<PlayerSlot>),
    /// Restore lives/positions/distance and clear the winner for a new race.
    ResetRace,
}

/// Why a patch was rejected. The document is untouched in every case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyError {
    /// A versioned patch was computed from an outdated document.
    StaleWrite { current: u64, based_on: u64 },
    /// A round op targeted a round that is not the current one.
    RoundMismatch {
        current: RoundKind,
        patched: RoundKind,
    },
    /// The game has ended; no further transitions are accepted.
    GameEnded,
}

impl std::fmt::Display for ApplyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApplyError::StaleWrite { current, based_on } => {
                write!(f, "stale write: based on version {based_on}, document at {current}")
            }
            ApplyError::RoundMismatch { current, patched } => {
                write!(f, "patch for round {patched:?} but current round is {current:?}")
            }
            ApplyError::GameEnded => write!(f, "game has ended"),
        }
    }
}

impl std::error::Error for ApplyError {}

/// Apply a patch to a document. Validates every op before mutating
/// anything, so a rejected patch is observable as "state unchanged".
pub fn apply_patch(game: &mut Game, patch: &GamePatch) -> Result<(), ApplyError> {
    if game.phase == GamePhase::Ended {
        return Err(ApplyError::GameEnded);
    }
    if let PatchGuard::Versioned(based_on) = patch.guard {
        if based_on != game.version {
            log::warn!(
                "discarding stale write for game {}: based on {}, document at {}",
                game.id,
                based_on,
                game.version
            );
            return Err(ApplyError::StaleWrite {
                current: game.version,
                based_on,
            });
        }
    }

    // Validation pass: a round op may target the current round, or the round
    // an earlier EnterRound op in the same patch switches to.
    let mut effective_round = game.current_round();
    for op in &patch.ops {
        match op {
            PatchOp::EnterRound(kind) => effective_round = *kind,
            PatchOp::Round(round_op) => {
                let patched = round_op.kind();
                if patched != effective_round {
                    return Err(ApplyError::RoundMismatch {
                        current: effective_round,
                        patched,
                    });
                }
            }
            _ => {}
        }
    }

    for op in &patch.ops {
        apply_op(game, op);
    }
    if matches!(patch.guard, PatchGuard::Versioned(_)) {
        game.version += 1;
    }
    Ok(())
}

fn apply_op(game: &mut Game, op: &PatchOp) {
    match op {
        PatchOp::SetPhase(phase) => game.phase = *phase,
        PatchOp::SetPlayerName { slot, name } => game.players[*slot].name = name.clone(),
        PatchOp::AwardPoints { slot, points } => {
            let score = &mut game.players[*slot].score;
            *score = score.saturating_add(*points);
        }
        PatchOp::EnterRound(kind) => game.round = RoundState::initial(*kind),
        PatchOp::Round(round_op) => apply_round_op(&mut game.round, round_op),
    }
}

fn apply_round_op(round: &mut RoundState, op: &RoundOp) {
    // Mismatches were rejected during validation.
    match (round, op) {
        (RoundState::Choice(state), RoundOp::Choice(op)) => match op {
            ChoiceOp::SetAnswer(answer) => state.answer = answer.clone(),
            ChoiceOp::SetGuess(guess) => state.guess = guess.clone(),
            ChoiceOp::SetShowResult(value) => state.show_result = *value,
            ChoiceOp::SetTurn(turn) => state.turn = *turn,
        },
        (RoundState::Trivia(state), RoundOp::Trivia(op)) => match op {
            TriviaOp::SetGuess(guess) => state.guess = guess.clone(),
            TriviaOp::SetJudgement(judgement) => state.judgement = *judgement,
            TriviaOp::SetPhase(phase) => state.phase = *phase,
            TriviaOp::SetTurn(turn) => state.turn = *turn,
        },
        (RoundState::MindMeld(state), RoundOp::MindMeld(op)) => match op {
            MindMeldOp::SetAnswer { slot, answer } => state.answers[*slot] = answer.clone(),
            MindMeldOp::SetShowResult(value) => state.show_result = *value,
            MindMeldOp::SetPromptIndex(index) => state.prompt_index = *index,
        },
        (RoundState::Racer(state), RoundOp::Racer(op)) => match op {
            RacerOp::SetStatus(status) => state.status = *status,
            RacerOp::SetCurrentRace(race) => state.current_race = *race,
            RacerOp::SetPosition { slot, value } => state.positions[*slot] = *value,
            RacerOp::SetHeat { slot, value } => state.heats[*slot] = *value,
            RacerOp::SetOverheated { slot, value } => state.overheated[*slot] = *value,
            RacerOp::AddWin(slot) => state.wins[*slot] += 1,
            RacerOp::SetRoundWinner(winner) => state.round_winner = *winner,
            RacerOp::ResetRace => {
                state.positions = SlotMap::with_value(0.0);
                state.heats = SlotMap::with_value(0.0);
                state.overheated = SlotMap::with_value(false);
                state.round_winner = None;
            }
        },
        (RoundState::Runner(state), RoundOp::Runner(op)) => match op {
            RunnerOp::SetStatus(status) => state.status = *status,
            RunnerOp::SetCurrentRace(race) => state.current_race = *race,
            RunnerOp::SetDistance(distance) => state.distance = *distance,
            RunnerOp::SetObstacles(obstacles) => state.obstacles = obstacles.clone(),
            RunnerOp::SetVerticalPosition { slot, value } => {
                state.player_states[*slot].vertical_position = *value;
            }
            RunnerOp::SetAlive { slot, value } => state.player_states[*slot].is_alive = *value,
            RunnerOp::LoseLife(slot) => {
                state.lives[*slot] = state.lives[*slot].saturating_sub(1);
            }
            RunnerOp::AddWin(slot) => state.wins[*slot] += 1,
            RunnerOp::SetRoundWinner(winner) => state.round_winner = *winner,
            RunnerOp::ResetRace => {
                state.lives = SlotMap::with_value(crate::sim::runner::STARTING_LIVES);
                state.player_states = SlotMap::default();
                state.distance = 0.0;
                state.round_winner = None;
            }
        },
        (RoundState::Dare(state), RoundOp::Dare(op)) => match op {
            DareOp::SetChoice(choice) => state.choice = *choice,
            DareOp::SetContent(content) => state.content = content.clone(),
            DareOp::SetLoading(value) => state.is_loading = *value,
            DareOp::SetTurn(turn) => state.turn = *turn,
        },
        // Unreachable after validation; keep the document untouched.
        _ => {}
    }
}

//! The shared game document.
//!
//! ## Game
//!
//! One `Game` document exists per game id. It is created by the host,
//! mutated by either client for the lifetime of the game, and replicated to
//! both clients through the store's value-change subscription. Every
//! delivery is a complete snapshot, never a diff.
//!
//! ## RoundState
//!
//! Each mini-game round owns an independent sub-document, held in a tagged
//! union. Entering a round resets its sub-document to the initial shape;
//! once a round is exited its state is never read again.
//!
//! ## Versioning
//!
//! `version` is a monotonic token that advances on every applied
//! exactly-once transition. A transition constructed against a stale
//! version is discarded instead of silently racing (see [`crate::patch`]).

use serde::{Deserialize, Serialize};

use super::game_id::GameId;
use super::slot::{PlayerSlot, SlotMap};

/// Placeholder name shown for slot 1 until a second player joins.
pub const WAITING_NAME: &str = "Waiting...";

/// Lifecycle phase of the whole game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Created, waiting for the second player to join.
    WaitingForPlayer,
    /// Both players present, rounds in progress.
    Active,
    /// Terminal. No further transitions are accepted.
    Ended,
}

/// A player: display name plus running score.
///
/// Score is monotonically non-decreasing for the lifetime of the game;
/// transitions award increments, never rewrites.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    pub score: u32,
}

impl Player {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            score: 0,
        }
    }
}

/// Identifies a mini-game round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoundKind {
    /// Binary preference guessing.
    Choice,
    /// Personal-knowledge quiz with human judging.
    Trivia,
    /// Simultaneous word-association matching.
    MindMeld,
    /// Heat-managed racer, best of 3.
    Racer,
    /// Jump-and-dodge runner, best of 3.
    Runner,
    /// Dare/truth with externally generated content. Always terminal.
    Dare,
}

/// The fixed round order for one game, chosen at creation and stored in the
/// document so both clients resolve "next round" identically.
///
/// The engine is schedule-agnostic: rounds are a palette, the schedule is
/// data. Duplicate kinds are rejected so that "the round after X" is
/// well-defined.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundSchedule {
    rounds: Vec<RoundKind>,
}

impl RoundSchedule {
    /// Build a schedule from an explicit round order.
    pub fn new(rounds: Vec<RoundKind>) -> Result<Self, ScheduleError> {
        if rounds.is_empty() {
            return Err(ScheduleError::Empty);
        }
        for (i, kind) in rounds.iter().enumerate() {
            if rounds[..i].contains(kind) {
                return Err(ScheduleError::Duplicate(*kind));
            }
        }
        Ok(Self { rounds })
    }

    /// The canonical schedule: quiz rounds, then both arcade rounds.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            rounds: vec![
                RoundKind::Choice,
                RoundKind::Trivia,
                RoundKind::Racer,
                RoundKind::Runner,
            ],
        }
    }

    /// The alternate palette: choice, simultaneous answers, then dare/truth.
    #[must_use]
    pub fn party() -> Self {
        Self {
            rounds: vec![RoundKind::Choice, RoundKind::MindMeld, RoundKind::Dare],
        }
    }

    /// The opening round.
    #[must_use]
    pub fn first(&self) -> RoundKind {
        self.rounds[0]
    }

    /// The round following `kind`, or `None` if `kind` is last (the game
    /// ends) or not scheduled.
    #[must_use]
    pub fn after(&self, kind: RoundKind) -> Option<RoundKind> {
        let pos = self.rounds.iter().position(|&k| k == kind)?;
        self.rounds.get(pos + 1).copied()
    }

    #[must_use]
    pub fn rounds(&self) -> &[RoundKind] {
        &self.rounds
    }
}

/// A schedule failed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    Empty,
    Duplicate(RoundKind),
}

impl std::fmt::Display for ScheduleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScheduleError::Empty => write!(f, "schedule must contain at least one round"),
            ScheduleError::Duplicate(kind) => {
                write!(f, "round {kind:?} appears more than once")
            }
        }
    }
}

impl std::error::Error for ScheduleError {}

// === Per-round sub-documents ===

/// Choice round: one player answers a binary question in secret, the other
/// guesses.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChoiceState {
    pub turn: u32,
    pub answer: Option<String>,
    pub guess: Option<String>,
    pub show_result: bool,
}

impl Default for ChoiceState {
    fn default() -> Self {
        Self {
            turn: 0,
            answer: None,
            guess: None,
            show_result: false,
        }
    }
}

/// Phase within a single trivia turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TriviaPhase {
    Answering,
    Judging,
    Result,
}

/// The asking player's verdict on a free-text guess. Correctness here is a
/// human judgement, not string equality.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Judgement {
    Correct,
    Incorrect,
}

/// Trivia round: free-text guesses judged by the asking player.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TriviaState {
    pub turn: u32,
    pub guess: Option<String>,
    pub judgement: Option<Judgement>,
    pub phase: TriviaPhase,
}

impl Default for TriviaState {
    fn default() -> Self {
        Self {
            turn: 0,
            guess: None,
            judgement: None,
            phase: TriviaPhase::Answering,
        }
    }
}

/// Mind-meld round: both players answer the same prompt concurrently.
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct MindMeldState {
    pub prompt_index: u32,
    pub answers: SlotMap<Option<String>>,
    pub show_result: bool,
}

/// What the active player asked for in the dare round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DareChoice {
    Dare,
    Truth,
}

/// Dare/truth round: content comes from an external generator; the document
/// only tracks the loading flag and the delivered text.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DareState {
    pub turn: u32,
    pub choice: Option<DareChoice>,
    pub content: String,
    pub is_loading: bool,
}

impl Default for DareState {
    fn default() -> Self {
        Self {
            turn: 0,
            choice: None,
            content: String::new(),
            is_loading: false,
        }
    }
}

/// Status shared by both arcade rounds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArcadeStatus {
    Intro,
    Playing,
    RoundEnd,
    Finished,
}

/// Heat-managed racer round, best of 3 races.
///
/// `positions`/`heats`/`overheated` are authoritative for the writing
/// player's own slot and read-only mirrors for the opponent's.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RacerState {
    pub status: ArcadeStatus,
    /// 1-based race counter.
    pub current_race: u32,
    pub wins: SlotMap<u32>,
    pub positions: SlotMap<f32>,
    pub heats: SlotMap<f32>,
    pub overheated: SlotMap<bool>,
    pub round_winner: Option<PlayerSlot>,
}

impl Default for RacerState {
    fn default() -> Self {
        Self {
            status: ArcadeStatus::Intro,
            current_race: 1,
            wins: SlotMap::with_value(0),
            positions: SlotMap::with_value(0.0),
            heats: SlotMap::with_value(0.0),
            overheated: SlotMap::with_value(false),
            round_winner: None,
        }
    }
}

/// A single runner obstacle, fixed once generated.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub position_along_track: f32,
    pub height: f32,
}

/// A runner player's mirrored physical state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RunnerPlayer {
    pub vertical_position: f32,
    pub is_alive: bool,
}

impl Default for RunnerPlayer {
    fn default() -> Self {
        Self {
            vertical_position: 0.0,
            is_alive: true,
        }
    }
}

/// Jump-and-dodge runner round, best of 3 races.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RunnerState {
    pub status: ArcadeStatus,
    /// 1-based race counter.
    pub current_race: u32,
    pub wins: SlotMap<u32>,
    pub lives: SlotMap<u32>,
    pub player_states: SlotMap<RunnerPlayer>,
    /// Shared scroll distance, advanced by the designated advancer only.
    pub distance: f32,
    /// Written once per race; both clients could equally derive it from the
    /// race seed.
    pub obstacles: Vec<Obstacle>,
    pub round_winner: Option<PlayerSlot>,
}

impl Default for RunnerState {
    fn default() -> Self {
        Self {
            status: ArcadeStatus::Intro,
            current_race: 1,
            wins: SlotMap::with_value(0),
            lives: SlotMap::with_value(crate::sim::runner::STARTING_LIVES),
            player_states: SlotMap::default(),
            distance: 0.0,
            obstacles: Vec::new(),
            round_winner: None,
        }
    }
}

/// Tagged union over all round sub-documents. The tag is the current round.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum RoundState {
    Choice(ChoiceState),
    Trivia(TriviaState),
    MindMeld(MindMeldState),
    Racer(RacerState),
    Runner(RunnerState),
    Dare(DareState),
}

impl RoundState {
    /// The initial sub-document for a round, used when the round is entered.
    #[must_use]
    pub fn initial(kind: RoundKind) -> Self {
        match kind {
            RoundKind::Choice => RoundState::Choice(ChoiceState::default()),
            RoundKind::Trivia => RoundState::Trivia(TriviaState::default()),
            RoundKind::MindMeld => RoundState::MindMeld(MindMeldState::default()),
            RoundKind::Racer => RoundState::Racer(RacerState::default()),
            RoundKind::Runner => RoundState::Runner(RunnerState::default()),
            RoundKind::Dare => RoundState::Dare(DareState::default()),
        }
    }

    /// Which round this sub-document belongs to.
    #[must_use]
    pub fn kind(&self) -> RoundKind {
        match self {
            RoundState::Choice(_) => RoundKind::Choice,
            RoundState::Trivia(_) => RoundKind::Trivia,
            RoundState::MindMeld(_) => RoundKind::MindMeld,
            RoundState::Racer(_) => RoundKind::Racer,
            RoundState::Runner(_) => RoundKind::Runner,
            RoundState::Dare(_) => RoundKind::Dare,
        }
    }
}

/// The complete shared document for one game.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Game {
    pub id: GameId,
    pub players: SlotMap<Player>,
    pub phase: GamePhase,
    pub schedule: RoundSchedule,
    pub round: RoundState,
    /// Monotonic token for exactly-once transitions.
    pub version: u64,
}

impl Game {
    /// Create the document for a fresh game. The host occupies slot 0; slot
    /// 1 carries a placeholder name until someone joins.
    #[must_use]
    pub fn new(id: GameId, host_name: impl Into<String>, schedule: RoundSchedule) -> Self {
        let round = RoundState::initial(schedule.first());
        let host_name = host_name.into();
        Self {
            id,
            players: SlotMap::new(|slot| {
                if slot == PlayerSlot::ZERO {
                    Player::new(host_name.clone())
                } else {
                    Player::new(WAITING_NAME)
                }
            }),
            phase: GamePhase::WaitingForPlayer,
            schedule,
            round,
            version: 0,
        }
    }

    /// The round currently being played.
    #[must_use]
    pub fn current_round(&self) -> RoundKind {
        self.round.kind()
    }

    #[must_use]
    pub fn player(&self, slot: PlayerSlot) -> &Player {
        &self.players[slot]
    }
}

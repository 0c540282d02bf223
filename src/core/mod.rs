//! Core document types: player slots, game ids, the shared game document,
//! and deterministic RNG for shared course layouts.
//!
//! Everything here is plain data with serde derives; the transition logic
//! lives in [`crate::rounds`] and the update helper in [`crate::patch`].

pub mod game;
pub mod game_id;
pub mod rng;
pub mod slot;

pub use game::{
    ArcadeStatus, ChoiceState, DareChoice, DareState, Game, GamePhase, Judgement, MindMeldState,
    Obstacle, Player, RacerState, RoundKind, RoundSchedule, RoundState, RunnerPlayer, RunnerState,
    ScheduleError, TriviaPhase, TriviaState, WAITING_NAME,
};
pub use game_id::{GameId, GameIdError, GAME_ID_ALPHABET, GAME_ID_LEN};
pub use rng::CourseRng;
pub use slot::{PlayerSlot, SlotMap};

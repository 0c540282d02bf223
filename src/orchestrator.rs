//! Game lifecycle: creation, joining, and what "leaving" means.
//!
//! Round-to-round sequencing itself is data-driven (the schedule lives in
//! the document; see [`crate::rounds`] for the transitions that consult
//! it). This module owns the two lifecycle operations that happen outside
//! any round: creating the document and joining it.

use rand::Rng;
use std::fmt;

use crate::core::{Game, GameId, GamePhase, PlayerSlot, RoundSchedule};
use crate::patch::{GamePatch, PatchOp};
use crate::store::{DocumentStore, StoreError};

/// Builder for creating a game.
///
/// ## Example
///
/// ```
/// use tandem_party::orchestrator::GameBuilder;
/// use tandem_party::store::MemoryStore;
///
/// let store = MemoryStore::new();
/// let mut rng = rand::thread_rng();
/// let (game_id, my_slot) = GameBuilder::new("Avery").create(&store, &mut rng).unwrap();
/// # let _ = (game_id, my_slot);
/// ```
pub struct GameBuilder {
    host_name: String,
    schedule: RoundSchedule,
}

impl GameBuilder {
    #[must_use]
    pub fn new(host_name: impl Into<String>) -> Self {
        Self {
            host_name: host_name.into(),
            schedule: RoundSchedule::standard(),
        }
    }

    /// Use a different round order than [`RoundSchedule::standard`].
    #[must_use]
    pub fn schedule(mut self, schedule: RoundSchedule) -> Self {
        self.schedule = schedule;
        self
    }

    /// Generate an id, write the fresh document, and return the host's
    /// slot. Ids are generated client-side with no collision detection; a
    /// collision surfaces as [`StoreError::AlreadyExists`].
    pub fn create(
        self,
        store: &impl DocumentStore,
        rng: &mut impl Rng,
    ) -> Result<(GameId, PlayerSlot), StoreError> {
        let id = GameId::generate(rng);
        let game = Game::new(id.clone(), self.host_name, self.schedule);
        store.create(game)?;
        Ok((id, PlayerSlot::ZERO))
    }
}

/// Why a join failed. Both cases are recoverable — re-check the id or find
/// another game.
#[derive(Debug)]
pub enum JoinError {
    /// No game has this id.
    NotFound,
    /// The game already has two players (or is over).
    AlreadyStarted,
    /// The store itself failed.
    Store(StoreError),
}

impl fmt::Display for JoinError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JoinError::NotFound => write!(f, "game not found"),
            JoinError::AlreadyStarted => write!(f, "game is already full"),
            JoinError::Store(err) => write!(f, "join failed: {err}"),
        }
    }
}

impl std::error::Error for JoinError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            JoinError::Store(err) => Some(err),
            _ => None,
        }
    }
}

/// Join a waiting game as slot 1: write the joiner's name and activate the
/// game in one patch. Fails without mutating anything if the game is
/// absent or not waiting.
pub fn join_game(
    store: &impl DocumentStore,
    id: &GameId,
    name: impl Into<String>,
) -> Result<PlayerSlot, JoinError> {
    let game = store
        .read(id)
        .map_err(JoinError::Store)?
        .ok_or(JoinError::NotFound)?;
    if game.phase != GamePhase::WaitingForPlayer {
        return Err(JoinError::AlreadyStarted);
    }

    let patch = GamePatch::versioned(
        game.version,
        [
            PatchOp::SetPlayerName {
                slot: PlayerSlot::ONE,
                name: name.into(),
            },
            PatchOp::SetPhase(GamePhase::Active),
        ],
    );
    match store.apply(id, &patch) {
        Ok(()) => Ok(PlayerSlot::ONE),
        // Someone else joined between our read and our write.
        Err(StoreError::Rejected(_)) => Err(JoinError::AlreadyStarted),
        Err(err) => Err(JoinError::Store(err)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::WAITING_NAME;
    use crate::store::MemoryStore;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn setup() -> (MemoryStore, GameId) {
        let store = MemoryStore::new();
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let (id, slot) = GameBuilder::new("Avery").create(&store, &mut rng).unwrap();
        assert_eq!(slot, PlayerSlot::ZERO);
        (store, id)
    }

    #[test]
    fn test_created_game_waits_with_placeholder() {
        let (store, id) = setup();
        let game = store.read(&id).unwrap().unwrap();
        assert_eq!(game.phase, GamePhase::WaitingForPlayer);
        assert_eq!(game.player(PlayerSlot::ONE).name, WAITING_NAME);
    }

    #[test]
    fn test_join_activates_game() {
        let (store, id) = setup();
        let slot = join_game(&store, &id, "Blair").unwrap();
        assert_eq!(slot, PlayerSlot::ONE);

        let game = store.read(&id).unwrap().unwrap();
        assert_eq!(game.phase, GamePhase::Active);
        assert_eq!(game.player(PlayerSlot::ONE).name, "Blair");
    }

    #[test]
    fn test_join_missing_game() {
        let store = MemoryStore::new();
        let err = join_game(&store, &GameId::parse("NOPE").unwrap(), "Blair").unwrap_err();
        assert!(matches!(err, JoinError::NotFound));
    }

    #[test]
    fn test_join_active_game_fails_without_mutation() {
        let (store, id) = setup();
        join_game(&store, &id, "Blair").unwrap();
        let before = store.read(&id).unwrap().unwrap();

        let err = join_game(&store, &id, "Casey").unwrap_err();
        assert!(matches!(err, JoinError::AlreadyStarted));
        assert_eq!(store.read(&id).unwrap().unwrap(), before);
    }

    #[test]
    fn test_racing_joins_admit_exactly_one() {
        let (store, id) = setup();
        // Both joiners read the same waiting snapshot; the version guard
        // admits only the first write.
        let game = store.read(&id).unwrap().unwrap();
        let patch_for = |name: &str| {
            GamePatch::versioned(
                game.version,
                [
                    PatchOp::SetPlayerName {
                        slot: PlayerSlot::ONE,
                        name: name.into(),
                    },
                    PatchOp::SetPhase(GamePhase::Active),
                ],
            )
        };
        store.apply(&id, &patch_for("Blair")).unwrap();
        assert!(store.apply(&id, &patch_for("Casey")).is_err());
        assert_eq!(
            store.read(&id).unwrap().unwrap().player(PlayerSlot::ONE).name,
            "Blair"
        );
    }
}

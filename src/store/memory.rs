//! In-process reference store.
//!
//! Single-process stand-in for the replicated backend: documents in a map,
//! last-applied-wins updates, synchronous fan-out of full snapshots in
//! apply order. Tests drive both "clients" against one of these.

use std::sync::{Arc, Mutex};

use rustc_hash::FxHashMap;

use crate::core::{Game, GameId};
use crate::patch::{apply_patch, GamePatch};

use super::{DocumentStore, SnapshotFn, StoreError, Subscription};

#[derive(Default)]
struct Inner {
    games: FxHashMap<GameId, Game>,
    subscribers: FxHashMap<GameId, Vec<(u64, SnapshotFn)>>,
    next_token: u64,
}

impl Inner {
    fn notify(&mut self, id: &GameId) {
        let Some(game) = self.games.get(id) else {
            return;
        };
        let game = game.clone();
        if let Some(subscribers) = self.subscribers.get_mut(id) {
            for (_, on_change) in subscribers.iter_mut() {
                on_change(&game);
            }
        }
    }
}

/// Shared-memory document store. Cheap to clone; clones share state, the
/// way two clients share one backend.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        // Subscriber callbacks run under this lock and must not reenter
        // the store.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl DocumentStore for MemoryStore {
    fn create(&self, game: Game) -> Result<(), StoreError> {
        let mut inner = self.lock();
        if inner.games.contains_key(&game.id) {
            return Err(StoreError::AlreadyExists(game.id));
        }
        let id = game.id.clone();
        inner.games.insert(id.clone(), game);
        inner.notify(&id);
        Ok(())
    }

    fn read(&self, id: &GameId) -> Result<Option<Game>, StoreError> {
        Ok(self.lock().games.get(id).cloned())
    }

    fn apply(&self, id: &GameId, patch: &GamePatch) -> Result<(), StoreError> {
        let mut inner = self.lock();
        let Some(game) = inner.games.get_mut(id) else {
            log::warn!("dropping write for unknown game {id}");
            return Err(StoreError::NotFound(id.clone()));
        };
        apply_patch(game, patch)?;
        inner.notify(id);
        Ok(())
    }

    fn subscribe(&self, id: &GameId, on_change: SnapshotFn) -> Result<Subscription, StoreError> {
        let mut inner = self.lock();
        if !inner.games.contains_key(id) {
            return Err(StoreError::NotFound(id.clone()));
        }
        let token = inner.next_token;
        inner.next_token += 1;
        inner
            .subscribers
            .entry(id.clone())
            .or_default()
            .push((token, on_change));

        let weak = Arc::downgrade(&self.inner);
        let id = id.clone();
        Ok(Subscription::new(move || {
            if let Some(inner) = weak.upgrade() {
                let mut inner = inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
                if let Some(subscribers) = inner.subscribers.get_mut(&id) {
                    subscribers.retain(|(t, _)| *t != token);
                }
            }
        }))
    }
}

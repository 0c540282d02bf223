//! Shared document store contract.
//!
//! The replicated store itself is an external capability; this module
//! defines the contract the engine writes against, plus an in-process
//! reference implementation ([`MemoryStore`]) used by tests and hot-seat
//! play.
//!
//! ## Semantics
//!
//! - `create` is the only full-document write, used once per game.
//! - `apply` is a partial update with last-applied-wins semantics; stale
//!   versioned patches are rejected, nothing is retried.
//! - `subscribe` delivers the *full* document after every applied change,
//!   in apply order. Consumers treat each delivery as a complete snapshot,
//!   never a diff. Dropping the [`Subscription`] handle unsubscribes; the
//!   other client is not notified.
//!
//! Writes are fire-and-forget with an error channel: callers may inspect
//! the `Result`, but the engine never blocks on or retries a failed write.

pub mod memory;

use std::fmt;

use crate::core::{Game, GameId};
use crate::patch::{ApplyError, GamePatch};

pub use memory::MemoryStore;

/// Callback receiving the full document after each applied change.
///
/// Must not call back into the store it is registered with.
pub type SnapshotFn = Box<dyn FnMut(&Game) + Send>;

/// The store capability the engine writes against.
pub trait DocumentStore {
    /// Create the document for a new game. Fails if the id already exists.
    fn create(&self, game: Game) -> Result<(), StoreError>;

    /// One-shot read. `Ok(None)` when no game has this id.
    fn read(&self, id: &GameId) -> Result<Option<Game>, StoreError>;

    /// Apply a partial update. Rejections leave the document untouched.
    fn apply(&self, id: &GameId, patch: &GamePatch) -> Result<(), StoreError>;

    /// Subscribe to value changes. The returned handle unsubscribes on
    /// drop.
    fn subscribe(&self, id: &GameId, on_change: SnapshotFn) -> Result<Subscription, StoreError>;
}

/// Why a store operation failed.
#[derive(Debug)]
pub enum StoreError {
    /// No document exists for the game id.
    NotFound(GameId),
    /// A document already exists for the game id.
    AlreadyExists(GameId),
    /// The patch was rejected by the document-update helper.
    Rejected(ApplyError),
    /// Backend failure (network, permissions, ...). Logged, not retried.
    Backend(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::NotFound(id) => write!(f, "game {id} not found"),
            StoreError::AlreadyExists(id) => write!(f, "game {id} already exists"),
            StoreError::Rejected(err) => write!(f, "update rejected: {err}"),
            StoreError::Backend(message) => write!(f, "store backend error: {message}"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Rejected(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ApplyError> for StoreError {
    fn from(err: ApplyError) -> Self {
        StoreError::Rejected(err)
    }
}

/// Active value-change subscription. Dropping it tears the subscription
/// down locally; nothing is sent to the store or the other client.
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    /// Wrap the store-specific cancellation.
    #[must_use]
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").finish_non_exhaustive()
    }
}

//! Storage port: one async trait per aggregate, two interchangeable
//! implementations.
//!
//! Stores report absence as `None`/`false` and storage-level violations as
//! `DomainError` kinds; they never turn "not found" into an error on their
//! own read paths.

use std::sync::Arc;

use crate::db::TxnManager;

pub mod games;
pub mod memory;
pub mod players;
pub mod sea;
pub mod sessions;

pub use games::GameStore;
pub use memory::MemoryStore;
pub use players::PlayerStore;
pub use sea::SeaStore;
pub use sessions::SessionStore;

/// The three stores, backed by the same engine.
#[derive(Clone)]
pub struct Stores {
    pub games: Arc<dyn GameStore>,
    pub players: Arc<dyn PlayerStore>,
    pub sessions: Arc<dyn SessionStore>,
}

impl Stores {
    pub fn memory() -> Self {
        let store = MemoryStore::new();
        Self {
            games: Arc::new(store.clone()),
            players: Arc::new(store.clone()),
            sessions: Arc::new(store),
        }
    }

    pub fn sea(txns: TxnManager) -> Self {
        let store = SeaStore::new(txns);
        Self {
            games: Arc::new(store.clone()),
            players: Arc::new(store.clone()),
            sessions: Arc::new(store),
        }
    }
}

impl std::fmt::Debug for Stores {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stores").finish_non_exhaustive()
    }
}

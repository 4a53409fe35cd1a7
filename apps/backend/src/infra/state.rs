use std::sync::Arc;

use db_infra::db::RuntimeEnv;

use crate::config::StoreBackend;
use crate::db::TxnManager;
use crate::domain::{Clock, SystemClock};
use crate::error::AppError;
use crate::infra::db::bootstrap_db;
use crate::repos::Stores;
use crate::services::Services;
use crate::state::app_state::AppState;

/// Builder for creating AppState instances (used in both tests and main)
pub struct StateBuilder {
    env: RuntimeEnv,
    store: StoreBackend,
    clock: Arc<dyn Clock>,
}

impl StateBuilder {
    pub fn new() -> Self {
        Self {
            env: RuntimeEnv::Test,
            store: StoreBackend::Memory,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_env(mut self, env: RuntimeEnv) -> Self {
        self.env = env;
        self
    }

    pub fn with_store(mut self, store: StoreBackend) -> Self {
        self.store = store;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub async fn build(self) -> Result<AppState, AppError> {
        let (stores, txns) = match self.store {
            StoreBackend::Memory => (Stores::memory(), None),
            StoreBackend::Database(db_kind) => {
                // single entrypoint: connect + migrate
                let conn = bootstrap_db(self.env, db_kind).await?;
                let txns = TxnManager::new(conn);
                (Stores::sea(txns.clone()), Some(txns))
            }
        };
        let services = Services::new(&stores, Arc::clone(&self.clock));
        Ok(AppState::new(services, self.clock, self.store, txns))
    }
}

impl Default for StateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn build_state() -> StateBuilder {
    StateBuilder::new()
}

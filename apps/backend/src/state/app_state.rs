use std::sync::Arc;

use tracing::info;

use crate::config::StoreBackend;
use crate::db::TxnManager;
use crate::domain::Clock;
use crate::errors::domain::DomainError;
use crate::services::Services;

/// Application state containing shared resources
#[derive(Clone)]
pub struct AppState {
    pub services: Services,
    pub clock: Arc<dyn Clock>,
    store: StoreBackend,
    /// Present only for the relational backend
    txns: Option<TxnManager>,
}

impl AppState {
    pub fn new(
        services: Services,
        clock: Arc<dyn Clock>,
        store: StoreBackend,
        txns: Option<TxnManager>,
    ) -> Self {
        Self {
            services,
            clock,
            store,
            txns,
        }
    }

    pub fn store(&self) -> StoreBackend {
        self.store
    }

    pub fn txns(&self) -> Option<&TxnManager> {
        self.txns.as_ref()
    }

    /// Close the connection pool, if any. Transactions still open are
    /// rolled back by the driver.
    pub async fn shutdown(self) -> Result<(), DomainError> {
        if let Some(txns) = self.txns {
            txns.close().await?;
        }
        info!(store = ?self.store, "state shut down");
        Ok(())
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("store", &self.store)
            .field("clock", &self.clock)
            .finish_non_exhaustive()
    }
}

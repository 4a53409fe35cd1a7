//! One harness per storage engine, so every conformance test runs against
//! both with identical inputs.

use std::sync::Arc;

use backend::config::StoreBackend;
use backend::db::TxnManager;
use backend::domain::{Clock, FixedClock};
use backend::infra::db::bootstrap_db;
use backend::repos::Stores;
use backend::services::Services;
use backend::AppError;
use db_infra::db::{DbKind, RuntimeEnv};
use tempfile::TempDir;
use time::OffsetDateTime;

use super::fixtures::NOW;

pub struct Harness {
    pub backend: StoreBackend,
    pub stores: Stores,
    pub services: Services,
    pub clock: Arc<FixedClock>,
    pub txns: Option<TxnManager>,
    /// Keeps a file-backed database alive for the harness lifetime.
    _dir: Option<TempDir>,
}

impl Harness {
    fn assemble(backend: StoreBackend, stores: Stores, txns: Option<TxnManager>) -> Self {
        let clock = Arc::new(FixedClock::new(NOW));
        let services = Services::new(&stores, clock.clone());
        Self {
            backend,
            stores,
            services,
            clock,
            txns,
            _dir: None,
        }
    }

    pub async fn memory() -> Result<Self, AppError> {
        Ok(Self::assemble(StoreBackend::Memory, Stores::memory(), None))
    }

    pub fn clock_now(&self) -> OffsetDateTime {
        self.clock.now()
    }

    /// Fresh, migrated private database per harness.
    pub async fn sqlite_memory() -> Result<Self, AppError> {
        let conn = bootstrap_db(RuntimeEnv::Test, DbKind::SqliteMemory).await?;
        let txns = TxnManager::new(conn);
        Ok(Self::assemble(
            StoreBackend::Database(DbKind::SqliteMemory),
            Stores::sea(txns.clone()),
            Some(txns),
        ))
    }

    /// Migrated SQLite file in a fresh temp dir, on the regular multi-connection
    /// pool so transactions really interleave. Sets `SQLITE_FILE`, so callers
    /// must be `#[serial]`.
    pub async fn sqlite_file() -> Result<Self, AppError> {
        let dir = tempfile::tempdir().map_err(|e| AppError::internal(e.to_string()))?;
        std::env::set_var("SQLITE_FILE", dir.path().join("sessions_test.sqlite3"));
        let conn = bootstrap_db(RuntimeEnv::Test, DbKind::SqliteFile).await;
        std::env::remove_var("SQLITE_FILE");
        let txns = TxnManager::new(conn?);
        let mut harness = Self::assemble(
            StoreBackend::Database(DbKind::SqliteFile),
            Stores::sea(txns.clone()),
            Some(txns),
        );
        harness._dir = Some(dir);
        Ok(harness)
    }
}

/// Expand each named `async fn(Harness) -> Result<(), AppError>` into a
/// module with one test per backend.
macro_rules! both_backends {
    ($($name:ident),* $(,)?) => {
        $(
            mod $name {
                #[tokio::test]
                async fn memory() -> Result<(), backend::AppError> {
                    let h = $crate::support::backends::Harness::memory().await?;
                    super::$name(h).await
                }

                #[tokio::test]
                async fn sqlite() -> Result<(), backend::AppError> {
                    let h = $crate::support::backends::Harness::sqlite_memory().await?;
                    super::$name(h).await
                }
            }
        )*
    };
}

pub(crate) use both_backends;

use std::ops::Deref;
use std::time::Duration;

use futures::future::BoxFuture;
use sea_orm::{
    ConnectionTrait, DatabaseBackend, DatabaseConnection, DatabaseTransaction, DbErr,
    IsolationLevel, TransactionTrait,
};
use tracing::{debug, warn};

use crate::errors::domain::{DomainError, InfraErrorKind};

/// Attempts after the first before `execute` gives up on a unit of work
/// that keeps losing serialization races.
pub const MAX_SERIALIZATION_RETRIES: u32 = 5;

const RETRY_BACKOFF_BASE_MS: u64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Isolation {
    ReadCommitted,
    /// Read-modify-write sections whose reads must still hold at commit.
    Serializable,
}

impl Isolation {
    fn level(self) -> IsolationLevel {
        match self {
            Isolation::ReadCommitted => IsolationLevel::ReadCommitted,
            Isolation::Serializable => IsolationLevel::Serializable,
        }
    }
}

/// Owns the connection pool and hands out explicit transaction handles.
///
/// Each unit of work gets its own `&DatabaseTransaction`; nothing is keyed
/// by thread or task, so the manager is cheap to clone and share.
#[derive(Debug, Clone)]
pub struct TxnManager {
    conn: DatabaseConnection,
}

impl TxnManager {
    pub fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.conn
    }

    pub fn backend(&self) -> DatabaseBackend {
        self.conn.get_database_backend()
    }

    fn isolation_for(&self, isolation: Isolation) -> Option<IsolationLevel> {
        // SQLite serializes writers on its own and rejects SET TRANSACTION.
        match self.backend() {
            DatabaseBackend::Postgres => Some(isolation.level()),
            _ => None,
        }
    }

    /// Open a transaction. The caller must `finish` or `abort` it; dropping
    /// an unfinished `Txn` rolls back.
    pub async fn begin(&self, isolation: Isolation) -> Result<Txn, DomainError> {
        let inner = self
            .conn
            .begin_with_config(self.isolation_for(isolation), None)
            .await?;
        debug!(?isolation, "transaction started");
        Ok(Txn { inner })
    }

    /// Run `f` in a transaction: commit on `Ok`, roll back on `Err`.
    ///
    /// Serialization failures (including those raised at commit) restart the
    /// whole unit of work, so `f` must be safe to call more than once.
    pub async fn execute<R, F>(&self, isolation: Isolation, mut f: F) -> Result<R, DomainError>
    where
        R: Send,
        F: for<'a> FnMut(&'a DatabaseTransaction) -> BoxFuture<'a, Result<R, DomainError>> + Send,
    {
        let mut retries = 0;
        loop {
            match self.run_once(isolation, &mut f).await {
                Err(err) if err.is_serialization_failure() => {
                    if retries >= MAX_SERIALIZATION_RETRIES {
                        warn!(retries, "giving up after repeated serialization failures");
                        return Err(DomainError::infra(
                            InfraErrorKind::Timeout,
                            "Transaction retries exhausted",
                        ));
                    }
                    retries += 1;
                    debug!(retries, "serialization failure, retrying unit of work");
                    tokio::time::sleep(backoff(retries)).await;
                }
                other => return other,
            }
        }
    }

    async fn run_once<R, F>(&self, isolation: Isolation, f: &mut F) -> Result<R, DomainError>
    where
        F: for<'a> FnMut(&'a DatabaseTransaction) -> BoxFuture<'a, Result<R, DomainError>> + Send,
    {
        let txn = self.begin(isolation).await?;
        let out = f(&*txn).await;
        match out {
            Ok(value) => {
                txn.finish().await?;
                Ok(value)
            }
            Err(err) => {
                // keep the original error
                if let Err(rollback) = txn.abort().await {
                    warn!(error = %rollback, "rollback failed");
                }
                Err(err)
            }
        }
    }

    /// Close every pooled connection. Open transactions are rolled back by
    /// the driver.
    pub async fn close(self) -> Result<(), DomainError> {
        self.conn.close().await?;
        debug!("connection pool closed");
        Ok(())
    }
}

fn backoff(retry: u32) -> Duration {
    Duration::from_millis(RETRY_BACKOFF_BASE_MS * u64::from(retry))
}

/// A transaction in flight. Derefs to the driver transaction so adapter
/// functions can take it as their connection.
pub struct Txn {
    inner: DatabaseTransaction,
}

impl Txn {
    /// Commit.
    pub async fn finish(self) -> Result<(), DomainError> {
        self.inner.commit().await?;
        debug!("transaction committed");
        Ok(())
    }

    /// Roll back.
    pub async fn abort(self) -> Result<(), DbErr> {
        self.inner.rollback().await?;
        debug!("transaction rolled back");
        Ok(())
    }
}

impl Deref for Txn {
    type Target = DatabaseTransaction;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

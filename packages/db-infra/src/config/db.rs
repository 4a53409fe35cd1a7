use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::error::DbInfraError;

/// Runtime environment; selects the database name and safety rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeEnv {
    Prod,
    Test,
}

/// Which relational engine backs the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbKind {
    Postgres,
    SqliteFile,
    /// Private in-process database; lives as long as its single pooled connection.
    SqliteMemory,
}

impl FromStr for DbKind {
    type Err = DbInfraError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" | "pg" => Ok(DbKind::Postgres),
            "sqlite-file" | "sqlite_file" | "sqlite" => Ok(DbKind::SqliteFile),
            "sqlite-memory" | "sqlite_memory" => Ok(DbKind::SqliteMemory),
            other => Err(DbInfraError::config(format!(
                "unknown database kind '{other}' (expected postgres | sqlite-file | sqlite-memory)"
            ))),
        }
    }
}

impl From<DbKind> for sea_orm::DatabaseBackend {
    fn from(kind: DbKind) -> Self {
        match kind {
            DbKind::Postgres => sea_orm::DatabaseBackend::Postgres,
            DbKind::SqliteFile | DbKind::SqliteMemory => sea_orm::DatabaseBackend::Sqlite,
        }
    }
}

/// Per-connection settings applied when the pool opens a connection.
#[derive(Debug, Clone, PartialEq)]
pub enum DbSettings {
    Postgres {
        app_name: String,
        statement_timeout: String,
        idle_in_transaction_timeout: String,
    },
    Sqlite {
        busy_timeout_ms: u64,
    },
}

/// Pool sizing plus the per-connection settings.
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionSettings {
    pub max_connections: u32,
    pub acquire_timeout: Duration,
    pub db_settings: DbSettings,
}

/// Build the connection URL for the given environment and engine.
pub fn make_conn_spec(env: RuntimeEnv, db_kind: DbKind) -> Result<String, DbInfraError> {
    match db_kind {
        DbKind::Postgres => {
            let host = env::var("POSTGRES_HOST").unwrap_or_else(|_| "localhost".to_string());
            let port = env::var("POSTGRES_PORT").unwrap_or_else(|_| "5432".to_string());
            let db_name = db_name(env)?;
            let username = must_var("APP_DB_USER")?;
            let password = must_var("APP_DB_PASSWORD")?;
            Ok(format!(
                "postgresql://{username}:{password}@{host}:{port}/{db_name}"
            ))
        }
        DbKind::SqliteFile => Ok(format!("sqlite://{}", sqlite_file_spec(env)?)),
        DbKind::SqliteMemory => Ok("sqlite::memory:".to_string()),
    }
}

/// Path of the SQLite database file (`SQLITE_FILE`, or a per-environment default).
pub fn sqlite_file_spec(env: RuntimeEnv) -> Result<String, DbInfraError> {
    match env::var("SQLITE_FILE") {
        Ok(path) if !path.trim().is_empty() => Ok(path),
        Ok(_) => Err(DbInfraError::config("SQLITE_FILE is set but empty")),
        Err(_) => Ok(match env {
            RuntimeEnv::Prod => "sessions.sqlite3".to_string(),
            RuntimeEnv::Test => "sessions_test.sqlite3".to_string(),
        }),
    }
}

/// Reject combinations that would point tests at a production database.
pub fn validate_db_config(env: RuntimeEnv, db_kind: DbKind) -> Result<(), DbInfraError> {
    if env == RuntimeEnv::Prod && db_kind == DbKind::SqliteMemory {
        return Err(DbInfraError::config(
            "SQLite in-memory databases are not allowed in the Prod environment",
        ));
    }
    if db_kind == DbKind::Postgres {
        db_name(env)?;
    }
    Ok(())
}

pub fn build_connection_settings(
    env: RuntimeEnv,
    db_kind: DbKind,
) -> Result<ConnectionSettings, DbInfraError> {
    let acquire_timeout = Duration::from_millis(parse_var("DB_ACQUIRE_TIMEOUT_MS", 5_000)?);
    match db_kind {
        DbKind::Postgres => Ok(ConnectionSettings {
            max_connections: parse_var("DB_MAX_CONNECTIONS", 10)? as u32,
            acquire_timeout,
            db_settings: DbSettings::Postgres {
                app_name: env::var("DB_APP_NAME").unwrap_or_else(|_| match env {
                    RuntimeEnv::Prod => "sessions-backend".to_string(),
                    RuntimeEnv::Test => "sessions-backend-test".to_string(),
                }),
                statement_timeout: env::var("DB_STATEMENT_TIMEOUT")
                    .unwrap_or_else(|_| "10s".to_string()),
                idle_in_transaction_timeout: env::var("DB_IDLE_IN_TXN_TIMEOUT")
                    .unwrap_or_else(|_| "30s".to_string()),
            },
        }),
        DbKind::SqliteFile => Ok(ConnectionSettings {
            max_connections: parse_var("DB_MAX_CONNECTIONS", 4)? as u32,
            acquire_timeout,
            db_settings: DbSettings::Sqlite {
                busy_timeout_ms: parse_var("SQLITE_BUSY_TIMEOUT_MS", 5_000)?,
            },
        }),
        // A second connection would open a second, empty in-memory database.
        DbKind::SqliteMemory => Ok(ConnectionSettings {
            max_connections: 1,
            acquire_timeout,
            db_settings: DbSettings::Sqlite {
                busy_timeout_ms: parse_var("SQLITE_BUSY_TIMEOUT_MS", 5_000)?,
            },
        }),
    }
}

/// Ordered session-level SQL statements for Postgres connections.
/// SQLite settings are applied through typed connect options instead.
pub fn build_session_statements(settings: &DbSettings) -> Vec<String> {
    match settings {
        DbSettings::Postgres {
            app_name,
            statement_timeout,
            idle_in_transaction_timeout,
        } => vec![
            format!("SET application_name = '{}';", app_name.replace('\'', "''")),
            "SET timezone = 'UTC';".to_string(),
            format!(
                "SET statement_timeout = '{}';",
                statement_timeout.replace('\'', "''")
            ),
            format!(
                "SET idle_in_transaction_session_timeout = '{}';",
                idle_in_transaction_timeout.replace('\'', "''")
            ),
        ],
        DbSettings::Sqlite { .. } => Vec::new(),
    }
}

fn db_name(env: RuntimeEnv) -> Result<String, DbInfraError> {
    match env {
        RuntimeEnv::Prod => must_var("PROD_DB"),
        RuntimeEnv::Test => {
            let db_name = must_var("TEST_DB")?;
            if !db_name.ends_with("_test") {
                return Err(DbInfraError::config(format!(
                    "Test environment requires database name to end with '_test', but got: '{db_name}'"
                )));
            }
            Ok(db_name)
        }
    }
}

fn must_var(name: &str) -> Result<String, DbInfraError> {
    env::var(name).map_err(|_| {
        DbInfraError::config(format!("Required environment variable '{name}' is not set"))
    })
}

fn parse_var(name: &str, default: u64) -> Result<u64, DbInfraError> {
    match env::var(name) {
        Ok(raw) => raw.trim().parse::<u64>().map_err(|_| {
            DbInfraError::config(format!("{name} must be a non-negative integer, got '{raw}'"))
        }),
        Err(_) => Ok(default),
    }
}

use std::future::Future;
use std::str::FromStr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use migration::{is_up_to_date, migrate, MigrationCommand};
use sea_orm::{DatabaseConnection, SqlxPostgresConnector, SqlxSqliteConnector};
use sqlx::postgres::PgPoolOptions;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use tracing::{info, warn};

use crate::config::db::{
    build_connection_settings, build_session_statements, make_conn_spec, validate_db_config,
    ConnectionSettings, DbKind, DbSettings, RuntimeEnv,
};
use crate::error::DbInfraError;

const PG_CONNECT_ATTEMPTS: u32 = 5;
const PG_CONNECT_INTERVAL_MS: u64 = 500;
const MIGRATION_BODY_TIMEOUT: Duration = Duration::from_secs(120);

fn get_db_engine(db_kind: DbKind) -> &'static str {
    match db_kind {
        DbKind::Postgres => "postgresql",
        DbKind::SqliteFile | DbKind::SqliteMemory => "sqlite",
    }
}

/// Retry a connection attempt with fixed interval delays.
/// Returns the error of the last attempt once all retries are exhausted.
async fn retry_connection<T, F, Fut>(
    mut connect_fn: F,
    max_attempts: u32,
    interval_ms: u64,
) -> Result<T, DbInfraError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, DbInfraError>>,
{
    let mut attempt = 1;
    loop {
        match connect_fn().await {
            Ok(result) => {
                if attempt > 1 {
                    info!(attempts = attempt, interval_ms, "connection retry succeeded");
                }
                return Ok(result);
            }
            Err(e) if attempt >= max_attempts => return Err(e),
            Err(e) => {
                warn!(
                    attempt,
                    max_attempts,
                    interval_ms,
                    error = %e,
                    "connection attempt failed"
                );
                tokio::time::sleep(Duration::from_millis(interval_ms)).await;
                attempt += 1;
            }
        }
    }
}

/// Open a pooled connection for the given environment and engine.
///
/// This does NOT run migrations.
pub async fn connect(env: RuntimeEnv, db_kind: DbKind) -> Result<DatabaseConnection, DbInfraError> {
    validate_db_config(env, db_kind)?;
    let url = make_conn_spec(env, db_kind)?;
    let settings = build_connection_settings(env, db_kind)?;

    info!(
        env = ?env,
        db_kind = ?db_kind,
        engine = get_db_engine(db_kind),
        url = %sanitize_db_url(&url),
        max_connections = settings.max_connections,
        "connecting to database"
    );

    match db_kind {
        DbKind::Postgres => {
            retry_connection(
                || connect_postgres(&url, &settings),
                PG_CONNECT_ATTEMPTS,
                PG_CONNECT_INTERVAL_MS,
            )
            .await
        }
        DbKind::SqliteFile | DbKind::SqliteMemory => connect_sqlite(&url, db_kind, &settings).await,
    }
}

async fn connect_postgres(
    url: &str,
    settings: &ConnectionSettings,
) -> Result<DatabaseConnection, DbInfraError> {
    let statements = Arc::new(build_session_statements(&settings.db_settings));

    let pool = PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .acquire_timeout(settings.acquire_timeout)
        .after_connect(move |conn, _meta| {
            let statements = Arc::clone(&statements);
            Box::pin(async move {
                for stmt in statements.iter() {
                    sqlx::query(stmt.as_str()).execute(&mut *conn).await?;
                }
                Ok(())
            })
        })
        .connect(url)
        .await
        .map_err(|source| DbInfraError::Connect {
            message: "failed to connect to Postgres".to_string(),
            source,
        })?;

    Ok(SqlxPostgresConnector::from_sqlx_postgres_pool(pool))
}

async fn connect_sqlite(
    url: &str,
    db_kind: DbKind,
    settings: &ConnectionSettings,
) -> Result<DatabaseConnection, DbInfraError> {
    let busy_timeout_ms = match settings.db_settings {
        DbSettings::Sqlite { busy_timeout_ms } => busy_timeout_ms,
        DbSettings::Postgres { .. } => {
            return Err(DbInfraError::config(
                "postgres settings supplied for a sqlite connection",
            ))
        }
    };

    let mut options = SqliteConnectOptions::from_str(url)
        .map_err(|source| DbInfraError::Connect {
            message: format!("invalid sqlite url '{url}'"),
            source,
        })?
        .create_if_missing(true)
        .foreign_keys(true)
        .busy_timeout(Duration::from_millis(busy_timeout_ms));

    let mut pool_options = SqlitePoolOptions::new()
        .max_connections(settings.max_connections)
        .acquire_timeout(settings.acquire_timeout);

    match db_kind {
        DbKind::SqliteFile => {
            options = options
                .journal_mode(SqliteJournalMode::Wal)
                .synchronous(SqliteSynchronous::Normal);
        }
        _ => {
            // the database disappears with its connection, so never recycle it
            pool_options = pool_options
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None);
        }
    }

    let pool = pool_options
        .connect_with(options)
        .await
        .map_err(|source| DbInfraError::Connect {
            message: "failed to open sqlite database".to_string(),
            source,
        })?;

    Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
}

/// Run a migration command on an open pool. `Up` is skipped when the
/// schema is already current.
pub async fn run_migration(
    pool: &DatabaseConnection,
    command: MigrationCommand,
) -> Result<(), DbInfraError> {
    let start = Instant::now();

    if command == MigrationCommand::Up {
        let current = is_up_to_date(pool)
            .await
            .map_err(|source| DbInfraError::Migration {
                message: "failed to read applied migrations".to_string(),
                source,
            })?;
        if current {
            info!(command = ?command, "migration skipped, schema up to date");
            return Ok(());
        }
    }

    match tokio::time::timeout(MIGRATION_BODY_TIMEOUT, migrate(pool, command)).await {
        Ok(Ok(())) => {
            info!(
                command = ?command,
                elapsed_ms = start.elapsed().as_millis() as u64,
                "migration complete"
            );
            Ok(())
        }
        Ok(Err(source)) => Err(DbInfraError::Migration {
            message: format!("{command:?} failed"),
            source,
        }),
        Err(_) => Err(DbInfraError::config(format!(
            "migration body timed out after {}s",
            MIGRATION_BODY_TIMEOUT.as_secs()
        ))),
    }
}

/// Connect and migrate in one step; the entrypoint used by the migration CLI.
pub async fn orchestrate_migration(
    env: RuntimeEnv,
    db_kind: DbKind,
    command: MigrationCommand,
) -> Result<(), DbInfraError> {
    if db_kind == DbKind::SqliteMemory {
        return Err(DbInfraError::config(
            "in-memory sqlite databases cannot be migrated out of process",
        ));
    }

    info!(env = ?env, db_kind = ?db_kind, command = ?command, "migrate=start");
    let pool = connect(env, db_kind).await?;
    let result = run_migration(&pool, command).await;
    if let Err(e) = pool.close().await {
        warn!(error = %e, "failed to close migration pool");
    }
    info!("migrate=done");
    result
}

/// Mask the password in a connection string for logging.
pub fn sanitize_db_url(url: &str) -> String {
    let Some((auth_part, host_part)) = url.rsplit_once('@') else {
        return url.to_string();
    };
    match auth_part.rfind(':') {
        // scheme separator only, no password present
        Some(colon_pos) if auth_part[..colon_pos].ends_with("//") || !auth_part.contains("//") => {
            url.to_string()
        }
        Some(colon_pos) => format!("{}:***@{}", &auth_part[..colon_pos], host_part),
        None => url.to_string(),
    }
}

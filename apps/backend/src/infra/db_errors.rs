//! SeaORM -> DomainError translation.
//!
//! Store code returns `sea_orm::DbErr` from adapters; `?` inside a unit of
//! work converts it here. Postgres reports constraint names and SQLSTATE
//! codes, SQLite only a message such as
//! `UNIQUE constraint failed: players.email`, so both are matched.

use std::borrow::Cow;

use sea_orm::{DbErr, RuntimeErr};
use tracing::{error, warn};

use crate::errors::domain::{ConflictKind, DomainError, InfraErrorKind, NotFoundKind};

const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";
const SERIALIZATION_FAILURE: &str = "40001";
const DEADLOCK_DETECTED: &str = "40P01";
// SQLite primary result codes for SQLITE_BUSY and SQLITE_LOCKED
const SQLITE_BUSY: &str = "5";
const SQLITE_LOCKED: &str = "6";

/// What the driver told us about a failed statement.
#[derive(Debug, Clone, Default)]
pub struct DbSignal<'a> {
    pub code: Option<Cow<'a, str>>,
    pub constraint: Option<&'a str>,
    pub message: String,
}

impl<'a> DbSignal<'a> {
    fn from_db_err(e: &'a DbErr) -> Self {
        match sqlx_database_error(e) {
            Some(db) => DbSignal {
                code: db.code(),
                constraint: db.constraint(),
                message: db.message().to_string(),
            },
            None => DbSignal {
                code: None,
                constraint: None,
                message: e.to_string(),
            },
        }
    }

    fn has_code(&self, code: &str) -> bool {
        self.code.as_deref() == Some(code)
            || self.message.contains(&format!("SQLSTATE({code})"))
    }

    fn names(&self, name: &str) -> bool {
        self.constraint == Some(name) || self.message.contains(name)
    }
}

fn sqlx_database_error(e: &DbErr) -> Option<&dyn sqlx::error::DatabaseError> {
    match e {
        DbErr::Exec(RuntimeErr::SqlxError(sqlx::Error::Database(db)))
        | DbErr::Query(RuntimeErr::SqlxError(sqlx::Error::Database(db)))
        | DbErr::Conn(RuntimeErr::SqlxError(sqlx::Error::Database(db))) => Some(db.as_ref()),
        _ => None,
    }
}

/// Extract `table.column[, table.column]` from a SQLite UNIQUE failure.
fn extract_sqlite_unique_target(message: &str) -> Option<&str> {
    const PREFIX: &str = "UNIQUE constraint failed: ";
    let start = message.find(PREFIX)? + PREFIX.len();
    let rest = &message[start..];
    let end = rest.find(['\n', '"']).unwrap_or(rest.len());
    Some(rest[..end].trim())
}

fn unique_conflict(signal: &DbSignal<'_>) -> Option<(ConflictKind, &'static str)> {
    let target = extract_sqlite_unique_target(&signal.message);
    let is = |constraint: &str, sqlite_target: &str| {
        signal.names(constraint) || target.is_some_and(|t| t == sqlite_target)
    };

    if is("players_email_key", "players.email") {
        return Some((ConflictKind::UniqueEmail, "Player email already exists"));
    }
    if is("games_name_key", "games.name") {
        return Some((ConflictKind::GameNameTaken, "Game name already exists"));
    }
    if is(
        "sessions_players_pkey",
        "sessions_players.session_id, sessions_players.player_id",
    ) {
        return Some((
            ConflictKind::PlayerAlreadyInSession,
            "Player already in session",
        ));
    }
    None
}

fn foreign_key_error(signal: &DbSignal<'_>) -> DomainError {
    // Postgres: `update or delete on table "games" violates foreign key ...`
    if signal.names("fk_sessions_game_id") {
        if signal.message.starts_with("update or delete on table") {
            return DomainError::conflict(
                ConflictKind::GameInUse,
                "Game is referenced by a session",
            );
        }
        return DomainError::game_not_found();
    }
    if signal.names("fk_sessions_players_session_id") {
        return DomainError::session_not_found();
    }
    if signal.names("fk_sessions_players_player_id") {
        return DomainError::player_not_found();
    }
    // SQLite does not name the constraint
    DomainError::not_found(
        NotFoundKind::Other("Reference".into()),
        "Referenced record not found",
    )
}

fn is_serialization_failure(signal: &DbSignal<'_>) -> bool {
    signal.has_code(SERIALIZATION_FAILURE)
        || signal.has_code(DEADLOCK_DETECTED)
        || signal.has_code(SQLITE_BUSY)
        || signal.has_code(SQLITE_LOCKED)
        || signal.message.contains("could not serialize access")
        || signal.message.contains("database is locked")
        || signal.message.contains("database table is locked")
}

/// Classify a driver signal. Split out from `map_db_err` so the table can be
/// exercised without a live connection.
pub fn classify(signal: &DbSignal<'_>) -> DomainError {
    if signal.has_code(UNIQUE_VIOLATION) || signal.message.contains("UNIQUE constraint failed") {
        warn!(constraint = ?signal.constraint, raw_error = %signal.message, "unique constraint violation");
        if let Some((kind, detail)) = unique_conflict(signal) {
            return DomainError::conflict(kind, detail);
        }
        return DomainError::conflict(
            ConflictKind::Other("Unique".into()),
            "Unique constraint violation",
        );
    }

    if signal.has_code(FOREIGN_KEY_VIOLATION)
        || signal.message.contains("FOREIGN KEY constraint failed")
    {
        warn!(constraint = ?signal.constraint, raw_error = %signal.message, "foreign key violation");
        return foreign_key_error(signal);
    }

    if is_serialization_failure(signal) {
        warn!(code = ?signal.code, raw_error = %signal.message, "serialization failure");
        return DomainError::infra(
            InfraErrorKind::SerializationFailure,
            "Concurrent update conflict",
        );
    }

    if signal.message.contains("timeout") || signal.message.contains("timed out") {
        warn!(raw_error = %signal.message, "database timeout");
        return DomainError::infra(InfraErrorKind::Timeout, "Database timeout");
    }

    error!(code = ?signal.code, raw_error = %signal.message, "unhandled database error");
    DomainError::infra(
        InfraErrorKind::Other("DbErr".into()),
        "Database operation failed",
    )
}

/// Translate a `DbErr` into a `DomainError`; unrecognized failures become
/// an opaque `Infra` error.
pub fn map_db_err(e: DbErr) -> DomainError {
    match &e {
        DbErr::RecordNotFound(what) => {
            return DomainError::not_found(NotFoundKind::Other(what.clone()), "Record not found");
        }
        DbErr::ConnectionAcquire(_) | DbErr::Conn(_) if sqlx_database_error(&e).is_none() => {
            warn!(raw_error = %e, "database unavailable");
            return DomainError::infra(InfraErrorKind::DbUnavailable, "Database unavailable");
        }
        _ => {}
    }

    classify(&DbSignal::from_db_err(&e))
}

impl From<DbErr> for DomainError {
    fn from(e: DbErr) -> Self {
        map_db_err(e)
    }
}

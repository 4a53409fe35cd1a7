//! Relational backend over SeaORM.
//!
//! Every call is one unit of work on the transaction manager. Reads run at
//! read-committed. Membership and capacity writes run serializable and
//! re-check the join rules after reading the current edge set, so a
//! concurrent writer shows up as a serialization failure and the unit of
//! work is retried. Session creation and game deletion check the game
//! reference the same way.

use crate::adapters::games_sea::GameRecord;
use crate::db::TxnManager;
use crate::domain::{
    Capacity, Email, Game, Genres, Name, Player, PlayerName, Session, SessionDate,
};
use crate::entities;
use crate::errors::domain::{DomainError, InfraErrorKind, NotFoundKind};

mod games;
mod players;
mod sessions;

#[derive(Debug, Clone)]
pub struct SeaStore {
    txns: TxnManager,
}

impl SeaStore {
    pub fn new(txns: TxnManager) -> Self {
        Self { txns }
    }
}

/// Stored values are re-validated on the way out; a row that no longer
/// parses means the table was written behind our back.
fn stored<T>(what: &str, parsed: Result<T, DomainError>) -> Result<T, DomainError> {
    parsed.map_err(|e| {
        DomainError::infra(
            InfraErrorKind::DataCorruption,
            format!("stored {what} is invalid: {}", e.detail()),
        )
    })
}

/// SQLite reports foreign key violations without naming the constraint.
/// A unit of work that writes a single reference knows which one it was.
fn unnamed_reference_as(err: DomainError, known: impl FnOnce() -> DomainError) -> DomainError {
    match err {
        DomainError::NotFound(NotFoundKind::Other(ref what), _) if what == "Reference" => known(),
        other => other,
    }
}

fn game_from_record(record: GameRecord) -> Result<Game, DomainError> {
    Ok(Game {
        id: record.id,
        name: stored("game name", Name::parse(&record.name))?,
        developer: stored("developer", Name::parse(&record.developer))?,
        genres: stored("genres", Genres::parse(&record.genres))?,
    })
}

fn player_from_model(model: entities::players::Model) -> Result<Player, DomainError> {
    Ok(Player {
        id: model.id,
        name: stored("player name", PlayerName::parse(&model.name))?,
        email: stored("email", Email::parse(&model.email))?,
    })
}

fn session_from_model(
    model: entities::sessions::Model,
    player_ids: Vec<i64>,
) -> Result<Session, DomainError> {
    Ok(Session {
        id: model.id,
        game_id: model.game_id,
        capacity: stored("capacity", Capacity::new(model.capacity))?,
        date: stored("date", SessionDate::new(model.date))?,
        player_ids,
    })
}

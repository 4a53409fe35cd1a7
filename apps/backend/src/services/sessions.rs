//! Session lifecycle and membership.
//!
//! Every check runs here first so callers get the documented error order;
//! the store repeats the membership and capacity checks inside its atomic
//! section, which is what actually holds the invariants under concurrency.

use std::sync::Arc;

use time::OffsetDateTime;
use tracing::{debug, error, info};

use crate::domain::{
    Capacity, Clock, NewSession, Page, PageRequest, Session, SessionDate, SessionDetails,
    SessionFilter, SessionState, SessionUpdate,
};
use crate::errors::domain::{DomainError, InfraErrorKind, NotFoundKind, ValidationKind};
use crate::repos::Stores;

pub const PLAYER_ADDED: &str = "Player added to session";
pub const PLAYER_REMOVED: &str = "Player removed from session";

#[derive(Clone)]
pub struct SessionService {
    stores: Stores,
    clock: Arc<dyn Clock>,
}

fn ensure_future(date: SessionDate, now: OffsetDateTime) -> Result<(), DomainError> {
    if !date.is_after(now) {
        return Err(DomainError::validation(
            ValidationKind::InvalidDate,
            "session date must be in the future",
        ));
    }
    Ok(())
}

impl SessionService {
    pub fn new(stores: Stores, clock: Arc<dyn Clock>) -> Self {
        Self { stores, clock }
    }

    async fn require_session(&self, session_id: i64) -> Result<Session, DomainError> {
        self.stores
            .sessions
            .get_by_id(session_id)
            .await?
            .ok_or_else(DomainError::session_not_found)
    }

    async fn require_player_exists(&self, player_id: i64) -> Result<(), DomainError> {
        match self.stores.players.get_by_id(player_id).await? {
            Some(_) => Ok(()),
            None => Err(DomainError::player_not_found()),
        }
    }

    async fn require_game_exists(&self, game_id: i64) -> Result<(), DomainError> {
        match self.stores.games.get_by_id(game_id).await? {
            Some(_) => Ok(()),
            None => Err(DomainError::game_not_found()),
        }
    }

    pub async fn create_session(
        &self,
        capacity: Capacity,
        game_id: i64,
        date: SessionDate,
    ) -> Result<i64, DomainError> {
        ensure_future(date, self.clock.now())?;
        self.require_game_exists(game_id).await?;

        let id = self
            .stores
            .sessions
            .create(NewSession {
                game_id,
                capacity,
                date,
            })
            .await?;
        info!(session_id = id, game_id, capacity = capacity.get(), "session created");
        Ok(id)
    }

    pub async fn add_player(
        &self,
        session_id: i64,
        player_id: i64,
    ) -> Result<&'static str, DomainError> {
        let session = self.require_session(session_id).await?;
        self.require_player_exists(player_id).await?;

        let now = self.clock.now();
        session.ensure_can_join(player_id, now)?;

        let session = self
            .stores
            .sessions
            .add_player(session_id, player_id, now)
            .await?;
        debug!(
            session_id,
            player_id,
            members = session.player_ids.len(),
            capacity = session.capacity.get(),
            "player joined session"
        );
        Ok(PLAYER_ADDED)
    }

    pub async fn remove_player(
        &self,
        session_id: i64,
        player_id: i64,
    ) -> Result<&'static str, DomainError> {
        let session = self.require_session(session_id).await?;
        self.require_player_exists(player_id).await?;

        if !session.is_member(player_id)
            || !self
                .stores
                .sessions
                .remove_player(session_id, player_id)
                .await?
        {
            return Err(DomainError::not_found(
                NotFoundKind::Membership,
                "Player is not in session",
            ));
        }
        debug!(session_id, player_id, "player left session");
        Ok(PLAYER_REMOVED)
    }

    /// `capacity` is checked against the current members before its range,
    /// so shrinking below the member count is always a `BadRequest`.
    pub async fn update_session(
        &self,
        session_id: i64,
        capacity: Option<i32>,
        date: Option<SessionDate>,
    ) -> Result<Session, DomainError> {
        if capacity.is_none() && date.is_none() {
            return Err(DomainError::validation(
                ValidationKind::EmptyUpdate,
                "nothing to update",
            ));
        }
        let session = self.require_session(session_id).await?;
        let capacity = match capacity {
            Some(raw) => {
                session.ensure_capacity_fits(raw)?;
                Some(Capacity::new(raw)?)
            }
            None => None,
        };
        if let Some(date) = date {
            ensure_future(date, self.clock.now())?;
        }

        let updated = self
            .stores
            .sessions
            .update(session_id, SessionUpdate { capacity, date })
            .await?
            .ok_or_else(DomainError::session_not_found)?;
        debug!(session_id, "session updated");
        Ok(updated)
    }

    pub async fn delete_session(&self, session_id: i64) -> Result<(), DomainError> {
        if !self.stores.sessions.delete(session_id).await? {
            return Err(DomainError::session_not_found());
        }
        info!(session_id, "session deleted");
        Ok(())
    }

    /// The session joined with its game and players, state evaluated now.
    pub async fn get_session(&self, session_id: i64) -> Result<SessionDetails, DomainError> {
        let session = self.require_session(session_id).await?;

        let Some(game) = self.stores.games.get_by_id(session.game_id).await? else {
            error!(session_id, game_id = session.game_id, "session references a missing game");
            return Err(DomainError::infra(
                InfraErrorKind::DataCorruption,
                "Session references a missing game",
            ));
        };
        let players = self.stores.players.get_many(&session.player_ids).await?;

        Ok(SessionDetails {
            state: session.state(self.clock.now()),
            session,
            game,
            players,
        })
    }

    pub async fn list_sessions(
        &self,
        game_id: i64,
        date: Option<SessionDate>,
        state: Option<SessionState>,
        player_id: Option<i64>,
        page: PageRequest,
    ) -> Result<Page<Session>, DomainError> {
        self.require_game_exists(game_id).await?;
        if let Some(player_id) = player_id {
            self.require_player_exists(player_id).await?;
        }

        let filter = SessionFilter {
            game_id,
            date,
            state,
            player_id,
            now: self.clock.now(),
        };
        self.stores.sessions.search(&filter, page).await
    }
}

//! Session storage port, including membership.

use async_trait::async_trait;
use time::OffsetDateTime;

use crate::domain::{NewSession, Page, PageRequest, Session, SessionFilter, SessionUpdate};
use crate::errors::domain::DomainError;

#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Fails with `NotFound(Game)` when the game does not exist.
    async fn create(&self, session: NewSession) -> Result<i64, DomainError>;

    async fn get_by_id(&self, id: i64) -> Result<Option<Session>, DomainError>;

    async fn search(
        &self,
        filter: &SessionFilter,
        page: PageRequest,
    ) -> Result<Page<Session>, DomainError>;

    /// Capacity changes are checked against the membership in the same
    /// atomic section as the write.
    async fn update(&self, id: i64, update: SessionUpdate)
        -> Result<Option<Session>, DomainError>;

    /// Also drops the session's memberships.
    async fn delete(&self, id: i64) -> Result<bool, DomainError>;

    /// Insert the membership edge after re-running the join checks against
    /// `now` atomically. Returns the session as it stands after the insert.
    async fn add_player(
        &self,
        session_id: i64,
        player_id: i64,
        now: OffsetDateTime,
    ) -> Result<Session, DomainError>;

    /// `false` when the player was not a member.
    async fn remove_player(&self, session_id: i64, player_id: i64) -> Result<bool, DomainError>;
}

//! Player storage port.

use async_trait::async_trait;

use crate::domain::{NewPlayer, Page, PageRequest, Player, PlayerFilter, PlayerName};
use crate::errors::domain::DomainError;

#[async_trait]
pub trait PlayerStore: Send + Sync {
    /// Fails with `Conflict(UniqueEmail)` when the email is taken.
    async fn create(&self, player: NewPlayer) -> Result<i64, DomainError>;

    async fn get_by_id(&self, id: i64) -> Result<Option<Player>, DomainError>;

    /// Players among `ids` in id order; unknown ids are skipped.
    async fn get_many(&self, ids: &[i64]) -> Result<Vec<Player>, DomainError>;

    async fn find_by_token_hash(&self, token_hash: &str) -> Result<Option<Player>, DomainError>;

    async fn search(
        &self,
        filter: &PlayerFilter,
        page: PageRequest,
    ) -> Result<Page<Player>, DomainError>;

    async fn update(&self, id: i64, name: PlayerName) -> Result<Option<Player>, DomainError>;

    /// Also drops the player's session memberships.
    async fn delete(&self, id: i64) -> Result<bool, DomainError>;
}

//! Game storage port.

use async_trait::async_trait;

use crate::domain::{Game, GameFilter, GameUpdate, NewGame, Page, PageRequest};
use crate::errors::domain::DomainError;

#[async_trait]
pub trait GameStore: Send + Sync {
    /// Fails with `Conflict(GameNameTaken)` when the name is in use.
    async fn create(&self, game: NewGame) -> Result<i64, DomainError>;

    async fn get_by_id(&self, id: i64) -> Result<Option<Game>, DomainError>;

    async fn search(&self, filter: &GameFilter, page: PageRequest)
        -> Result<Page<Game>, DomainError>;

    /// `None` when no game has this id.
    async fn update(&self, id: i64, update: GameUpdate) -> Result<Option<Game>, DomainError>;

    /// Fails with `Conflict(GameInUse)` while a session references the game.
    async fn delete(&self, id: i64) -> Result<bool, DomainError>;
}

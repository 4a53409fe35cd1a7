use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::{Game, GameFilter, GameUpdate, NewGame, Page, PageRequest};
use crate::errors::domain::{DomainError, ValidationKind};
use crate::repos::GameStore;

#[derive(Clone)]
pub struct GameService {
    games: Arc<dyn GameStore>,
}

impl GameService {
    pub fn new(games: Arc<dyn GameStore>) -> Self {
        Self { games }
    }

    pub async fn create_game(&self, game: NewGame) -> Result<i64, DomainError> {
        let name = game.name.as_str().to_string();
        let id = self.games.create(game).await?;
        info!(game_id = id, name = %name, "game created");
        Ok(id)
    }

    pub async fn get_game(&self, game_id: i64) -> Result<Game, DomainError> {
        self.games
            .get_by_id(game_id)
            .await?
            .ok_or_else(DomainError::game_not_found)
    }

    pub async fn list_games(
        &self,
        filter: &GameFilter,
        page: PageRequest,
    ) -> Result<Page<Game>, DomainError> {
        self.games.search(filter, page).await
    }

    pub async fn update_game(&self, game_id: i64, update: GameUpdate) -> Result<Game, DomainError> {
        if update.is_empty() {
            return Err(DomainError::validation(
                ValidationKind::EmptyUpdate,
                "nothing to update",
            ));
        }
        let game = self
            .games
            .update(game_id, update)
            .await?
            .ok_or_else(DomainError::game_not_found)?;
        debug!(game_id, "game updated");
        Ok(game)
    }

    /// Fails with `Conflict(GameInUse)` while sessions reference the game.
    pub async fn delete_game(&self, game_id: i64) -> Result<(), DomainError> {
        if !self.games.delete(game_id).await? {
            return Err(DomainError::game_not_found());
        }
        info!(game_id, "game deleted");
        Ok(())
    }
}

use std::sync::Arc;

use tracing::{debug, info};
use uuid::Uuid;

use crate::domain::{
    hash_token, Email, NewPlayer, Page, PageRequest, Player, PlayerFilter, PlayerName,
};
use crate::errors::domain::DomainError;
use crate::repos::PlayerStore;

/// Returned once at registration; only the token's hash is stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedPlayer {
    pub id: i64,
    pub token: String,
}

#[derive(Clone)]
pub struct PlayerService {
    players: Arc<dyn PlayerStore>,
}

impl PlayerService {
    pub fn new(players: Arc<dyn PlayerStore>) -> Self {
        Self { players }
    }

    pub async fn create_player(
        &self,
        name: PlayerName,
        email: Email,
    ) -> Result<CreatedPlayer, DomainError> {
        let token = Uuid::new_v4().to_string();
        let id = self
            .players
            .create(NewPlayer {
                name,
                email,
                token_hash: hash_token(&token),
            })
            .await?;
        info!(player_id = id, "player created");
        Ok(CreatedPlayer { id, token })
    }

    pub async fn get_player(&self, player_id: i64) -> Result<Player, DomainError> {
        self.players
            .get_by_id(player_id)
            .await?
            .ok_or_else(DomainError::player_not_found)
    }

    /// Bearer token to player identity.
    pub async fn resolve_token(&self, token: &str) -> Result<Player, DomainError> {
        match self.players.find_by_token_hash(&hash_token(token)).await? {
            Some(player) => Ok(player),
            None => {
                debug!("unknown player token");
                Err(DomainError::unauthorized("Invalid token"))
            }
        }
    }

    pub async fn list_players(
        &self,
        filter: &PlayerFilter,
        page: PageRequest,
    ) -> Result<Page<Player>, DomainError> {
        self.players.search(filter, page).await
    }

    pub async fn update_player(
        &self,
        player_id: i64,
        name: PlayerName,
    ) -> Result<Player, DomainError> {
        let player = self
            .players
            .update(player_id, name)
            .await?
            .ok_or_else(DomainError::player_not_found)?;
        debug!(player_id, "player updated");
        Ok(player)
    }

    /// Removes the player from every session it joined.
    pub async fn delete_player(&self, player_id: i64) -> Result<(), DomainError> {
        if !self.players.delete(player_id).await? {
            return Err(DomainError::player_not_found());
        }
        info!(player_id, "player deleted");
        Ok(())
    }
}

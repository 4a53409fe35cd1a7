use async_trait::async_trait;

use super::{player_from_model, SeaStore};
use crate::adapters::memberships_sea;
use crate::adapters::players_sea::{self, PlayerCreate};
use crate::db::Isolation;
use crate::domain::search::like_contains_pattern;
use crate::domain::{NewPlayer, Page, PageRequest, Player, PlayerFilter, PlayerName};
use crate::errors::domain::DomainError;
use crate::repos::PlayerStore;

#[async_trait]
impl PlayerStore for SeaStore {
    async fn create(&self, player: NewPlayer) -> Result<i64, DomainError> {
        let dto = PlayerCreate {
            name: player.name.into_inner(),
            email: player.email.into_inner(),
            token_hash: player.token_hash,
        };
        self.txns
            .execute(Isolation::ReadCommitted, move |txn| {
                let dto = dto.clone();
                Box::pin(async move {
                    players_sea::create_player(txn, dto)
                        .await
                        .map_err(DomainError::from)
                })
            })
            .await
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Player>, DomainError> {
        let model = self
            .txns
            .execute(Isolation::ReadCommitted, move |txn| {
                Box::pin(async move {
                    players_sea::find_by_id(txn, id)
                        .await
                        .map_err(DomainError::from)
                })
            })
            .await?;
        model.map(player_from_model).transpose()
    }

    async fn get_many(&self, ids: &[i64]) -> Result<Vec<Player>, DomainError> {
        let ids = ids.to_vec();
        let models = self
            .txns
            .execute(Isolation::ReadCommitted, move |txn| {
                let ids = ids.clone();
                Box::pin(async move {
                    players_sea::find_many(txn, &ids)
                        .await
                        .map_err(DomainError::from)
                })
            })
            .await?;
        models.into_iter().map(player_from_model).collect()
    }

    async fn find_by_token_hash(&self, token_hash: &str) -> Result<Option<Player>, DomainError> {
        let token_hash = token_hash.to_string();
        let model = self
            .txns
            .execute(Isolation::ReadCommitted, move |txn| {
                let token_hash = token_hash.clone();
                Box::pin(async move {
                    players_sea::find_by_token_hash(txn, &token_hash)
                        .await
                        .map_err(DomainError::from)
                })
            })
            .await?;
        model.map(player_from_model).transpose()
    }

    async fn search(
        &self,
        filter: &PlayerFilter,
        page: PageRequest,
    ) -> Result<Page<Player>, DomainError> {
        let pattern = filter.name_contains().map(like_contains_pattern);
        let (models, total_count) = self
            .txns
            .execute(Isolation::ReadCommitted, move |txn| {
                let pattern = pattern.clone();
                Box::pin(async move {
                    players_sea::search(txn, pattern.as_deref(), page.limit(), page.skip())
                        .await
                        .map_err(DomainError::from)
                })
            })
            .await?;
        let items = models
            .into_iter()
            .map(player_from_model)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Page { items, total_count })
    }

    async fn update(&self, id: i64, name: PlayerName) -> Result<Option<Player>, DomainError> {
        let name = name.into_inner();
        let model = self
            .txns
            .execute(Isolation::ReadCommitted, move |txn| {
                let name = name.clone();
                Box::pin(async move {
                    if players_sea::update_name(txn, id, name).await? == 0 {
                        return Ok(None);
                    }
                    Ok::<_, DomainError>(players_sea::find_by_id(txn, id).await?)
                })
            })
            .await?;
        model.map(player_from_model).transpose()
    }

    async fn delete(&self, id: i64) -> Result<bool, DomainError> {
        self.txns
            .execute(Isolation::ReadCommitted, move |txn| {
                Box::pin(async move {
                    memberships_sea::remove_player_everywhere(txn, id).await?;
                    Ok::<_, DomainError>(players_sea::delete_player(txn, id).await? > 0)
                })
            })
            .await
    }
}

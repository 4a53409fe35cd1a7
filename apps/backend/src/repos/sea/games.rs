use async_trait::async_trait;

use super::{game_from_record, unnamed_reference_as, SeaStore};
use crate::adapters::games_sea::{self, GameChanges, GameCreate, GameSearch};
use crate::adapters::sessions_sea;
use crate::db::Isolation;
use crate::domain::search::like_contains_pattern;
use crate::domain::{Game, GameFilter, GameUpdate, Genres, NewGame, Page, PageRequest};
use crate::errors::domain::{ConflictKind, DomainError};
use crate::repos::GameStore;

fn genre_names(genres: &Genres) -> Vec<String> {
    genres.iter().map(|g| g.as_str().to_string()).collect()
}

fn game_in_use() -> DomainError {
    DomainError::conflict(ConflictKind::GameInUse, "Game is referenced by a session")
}

fn to_search(filter: &GameFilter) -> GameSearch {
    GameSearch {
        developer: filter.developer.as_ref().map(|d| d.as_str().to_string()),
        name_pattern: filter.name_contains().map(like_contains_pattern),
        genres: filter.genres.as_ref().map(genre_names).unwrap_or_default(),
    }
}

#[async_trait]
impl GameStore for SeaStore {
    async fn create(&self, game: NewGame) -> Result<i64, DomainError> {
        let dto = GameCreate {
            name: game.name.into_inner(),
            developer: game.developer.into_inner(),
            genres: genre_names(&game.genres),
        };
        self.txns
            .execute(Isolation::ReadCommitted, move |txn| {
                let dto = dto.clone();
                Box::pin(async move {
                    games_sea::create_game(txn, dto)
                        .await
                        .map_err(DomainError::from)
                })
            })
            .await
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Game>, DomainError> {
        let record = self
            .txns
            .execute(Isolation::ReadCommitted, move |txn| {
                Box::pin(async move {
                    games_sea::find_by_id(txn, id)
                        .await
                        .map_err(DomainError::from)
                })
            })
            .await?;
        record.map(game_from_record).transpose()
    }

    async fn search(
        &self,
        filter: &GameFilter,
        page: PageRequest,
    ) -> Result<Page<Game>, DomainError> {
        let search = to_search(filter);
        let (records, total_count) = self
            .txns
            .execute(Isolation::ReadCommitted, move |txn| {
                let search = search.clone();
                Box::pin(async move {
                    games_sea::search(txn, &search, page.limit(), page.skip())
                        .await
                        .map_err(DomainError::from)
                })
            })
            .await?;
        let items = records
            .into_iter()
            .map(game_from_record)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Page { items, total_count })
    }

    async fn update(&self, id: i64, update: GameUpdate) -> Result<Option<Game>, DomainError> {
        let changes = GameChanges {
            name: update.name.map(|n| n.into_inner()),
            developer: update.developer.map(|d| d.into_inner()),
            genres: update.genres.as_ref().map(genre_names),
        };
        let record = self
            .txns
            .execute(Isolation::ReadCommitted, move |txn| {
                let changes = changes.clone();
                Box::pin(async move {
                    if !games_sea::update_game(txn, id, changes).await? {
                        return Ok(None);
                    }
                    Ok::<_, DomainError>(games_sea::find_by_id(txn, id).await?)
                })
            })
            .await?;
        record.map(game_from_record).transpose()
    }

    async fn delete(&self, id: i64) -> Result<bool, DomainError> {
        self.txns
            .execute(Isolation::Serializable, move |txn| {
                Box::pin(async move {
                    if !games_sea::exists(txn, id).await? {
                        return Ok(false);
                    }
                    if sessions_sea::count_for_game(txn, id).await? > 0 {
                        return Err(game_in_use());
                    }
                    let deleted = games_sea::delete_game(txn, id)
                        .await
                        .map_err(|e| unnamed_reference_as(DomainError::from(e), game_in_use))?;
                    Ok(deleted > 0)
                })
            })
            .await
    }
}

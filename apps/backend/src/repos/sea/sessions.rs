use async_trait::async_trait;
use sea_orm::DatabaseTransaction;
use time::OffsetDateTime;

use super::{session_from_model, unnamed_reference_as, SeaStore};
use crate::adapters::sessions_sea::{self, SessionChanges, SessionCreate, SessionSearch};
use crate::adapters::{games_sea, memberships_sea, players_sea};
use crate::db::Isolation;
use crate::domain::{
    NewSession, Page, PageRequest, Session, SessionDate, SessionFilter, SessionState,
    SessionUpdate,
};
use crate::errors::domain::DomainError;
use crate::repos::SessionStore;

async fn load_session(txn: &DatabaseTransaction, id: i64) -> Result<Option<Session>, DomainError> {
    let Some(model) = sessions_sea::find_by_id(txn, id).await? else {
        return Ok(None);
    };
    let player_ids = memberships_sea::player_ids_for(txn, id).await?;
    session_from_model(model, player_ids).map(Some)
}

fn to_search(filter: &SessionFilter) -> Result<SessionSearch, DomainError> {
    // stored dates are whole seconds, so comparing against the truncated
    // `now` selects the same rows as comparing against `now` itself
    let now = SessionDate::new(filter.now)?.get();
    let mut search = SessionSearch::for_game(filter.game_id);
    search.date = filter.date.map(|d| d.get());
    search.player_id = filter.player_id;
    match filter.state {
        Some(SessionState::Open) => search.after = Some(now),
        Some(SessionState::Close) => search.not_after = Some(now),
        None => {}
    }
    Ok(search)
}

#[async_trait]
impl SessionStore for SeaStore {
    async fn create(&self, session: NewSession) -> Result<i64, DomainError> {
        let dto = SessionCreate {
            game_id: session.game_id,
            capacity: session.capacity.get(),
            date: session.date.get(),
        };
        self.txns
            .execute(Isolation::Serializable, move |txn| {
                let dto = dto.clone();
                Box::pin(async move {
                    if !games_sea::exists(txn, dto.game_id).await? {
                        return Err(DomainError::game_not_found());
                    }
                    sessions_sea::create_session(txn, dto).await.map_err(|e| {
                        unnamed_reference_as(DomainError::from(e), DomainError::game_not_found)
                    })
                })
            })
            .await
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Session>, DomainError> {
        self.txns
            .execute(Isolation::ReadCommitted, move |txn| Box::pin(load_session(txn, id)))
            .await
    }

    async fn search(
        &self,
        filter: &SessionFilter,
        page: PageRequest,
    ) -> Result<Page<Session>, DomainError> {
        let search = to_search(filter)?;
        self.txns
            .execute(Isolation::ReadCommitted, move |txn| {
                let search = search.clone();
                Box::pin(async move {
                    let (models, total_count) =
                        sessions_sea::search(txn, &search, page.limit(), page.skip()).await?;
                    let ids: Vec<i64> = models.iter().map(|m| m.id).collect();
                    let mut members = memberships_sea::player_ids_for_many(txn, &ids).await?;
                    let items = models
                        .into_iter()
                        .map(|m| {
                            let player_ids = members.remove(&m.id).unwrap_or_default();
                            session_from_model(m, player_ids)
                        })
                        .collect::<Result<Vec<_>, _>>()?;
                    Ok::<_, DomainError>(Page { items, total_count })
                })
            })
            .await
    }

    async fn update(
        &self,
        id: i64,
        update: SessionUpdate,
    ) -> Result<Option<Session>, DomainError> {
        self.txns
            .execute(Isolation::Serializable, move |txn| {
                let update = update.clone();
                Box::pin(async move {
                    let Some(session) = load_session(txn, id).await? else {
                        return Ok(None);
                    };
                    if let Some(capacity) = update.capacity {
                        session.ensure_capacity_fits(capacity.get())?;
                    }
                    let changes = SessionChanges {
                        capacity: update.capacity.map(|c| c.get()),
                        date: update.date.map(|d| d.get()),
                    };
                    sessions_sea::update_session(txn, id, changes).await?;
                    load_session(txn, id).await
                })
            })
            .await
    }

    async fn delete(&self, id: i64) -> Result<bool, DomainError> {
        self.txns
            .execute(Isolation::ReadCommitted, move |txn| {
                Box::pin(async move {
                    Ok::<_, DomainError>(sessions_sea::delete_session(txn, id).await? > 0)
                })
            })
            .await
    }

    async fn add_player(
        &self,
        session_id: i64,
        player_id: i64,
        now: OffsetDateTime,
    ) -> Result<Session, DomainError> {
        self.txns
            .execute(Isolation::Serializable, move |txn| {
                Box::pin(async move {
                    let Some(mut session) = load_session(txn, session_id).await? else {
                        return Err(DomainError::session_not_found());
                    };
                    if !players_sea::exists(txn, player_id).await? {
                        return Err(DomainError::player_not_found());
                    }
                    session.ensure_can_join(player_id, now)?;
                    memberships_sea::add_member(txn, session_id, player_id).await?;
                    session.admit(player_id);
                    Ok(session)
                })
            })
            .await
    }

    async fn remove_player(&self, session_id: i64, player_id: i64) -> Result<bool, DomainError> {
        self.txns
            .execute(Isolation::Serializable, move |txn| {
                Box::pin(async move {
                    let removed =
                        memberships_sea::remove_member(txn, session_id, player_id).await?;
                    Ok::<_, DomainError>(removed > 0)
                })
            })
            .await
    }
}

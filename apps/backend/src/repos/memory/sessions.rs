use async_trait::async_trait;
use time::OffsetDateTime;

use super::{next_id, MemoryStore, SessionRow};
use crate::domain::search::paginate;
use crate::domain::{NewSession, Page, PageRequest, Session, SessionFilter, SessionUpdate};
use crate::errors::domain::DomainError;
use crate::repos::SessionStore;

#[async_trait]
impl SessionStore for MemoryStore {
    async fn create(&self, session: NewSession) -> Result<i64, DomainError> {
        let mut t = self.tables.lock();
        if !t.games.contains_key(&session.game_id) {
            return Err(DomainError::game_not_found());
        }
        let id = next_id(&mut t.last_session_id);
        t.sessions.insert(
            id,
            SessionRow {
                game_id: session.game_id,
                capacity: session.capacity,
                date: session.date,
            },
        );
        Ok(id)
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Session>, DomainError> {
        Ok(self.tables.lock().session(id))
    }

    async fn search(
        &self,
        filter: &SessionFilter,
        page: PageRequest,
    ) -> Result<Page<Session>, DomainError> {
        let t = self.tables.lock();
        let matched = t
            .sessions
            .keys()
            .filter_map(|&id| t.session(id))
            .filter(|s| filter.matches(s));
        Ok(paginate(matched, page))
    }

    async fn update(
        &self,
        id: i64,
        update: SessionUpdate,
    ) -> Result<Option<Session>, DomainError> {
        let mut t = self.tables.lock();
        let Some(session) = t.session(id) else {
            return Ok(None);
        };
        if let Some(capacity) = update.capacity {
            session.ensure_capacity_fits(capacity.get())?;
        }
        let Some(row) = t.sessions.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(capacity) = update.capacity {
            row.capacity = capacity;
        }
        if let Some(date) = update.date {
            row.date = date;
        }
        Ok(t.session(id))
    }

    async fn delete(&self, id: i64) -> Result<bool, DomainError> {
        let mut t = self.tables.lock();
        if t.sessions.remove(&id).is_none() {
            return Ok(false);
        }
        t.drop_memberships_where(|sid, _| sid == id);
        Ok(true)
    }

    async fn add_player(
        &self,
        session_id: i64,
        player_id: i64,
        now: OffsetDateTime,
    ) -> Result<Session, DomainError> {
        let mut t = self.tables.lock();
        let Some(mut session) = t.session(session_id) else {
            return Err(DomainError::session_not_found());
        };
        if !t.players.contains_key(&player_id) {
            return Err(DomainError::player_not_found());
        }
        session.ensure_can_join(player_id, now)?;
        t.memberships.insert((session_id, player_id));
        session.admit(player_id);
        Ok(session)
    }

    async fn remove_player(&self, session_id: i64, player_id: i64) -> Result<bool, DomainError> {
        Ok(self
            .tables
            .lock()
            .memberships
            .remove(&(session_id, player_id)))
    }
}

use async_trait::async_trait;

use super::{next_id, MemoryStore, PlayerRow, Tables};
use crate::domain::search::paginate;
use crate::domain::{NewPlayer, Page, PageRequest, Player, PlayerFilter, PlayerName};
use crate::errors::domain::{ConflictKind, DomainError};
use crate::repos::PlayerStore;

impl Tables {
    fn player(&self, id: i64) -> Option<Player> {
        self.players.get(&id).map(|row| Player {
            id,
            name: row.name.clone(),
            email: row.email.clone(),
        })
    }
}

#[async_trait]
impl PlayerStore for MemoryStore {
    async fn create(&self, player: NewPlayer) -> Result<i64, DomainError> {
        let mut t = self.tables.lock();
        if t.emails.contains_key(player.email.as_str()) {
            return Err(DomainError::conflict(
                ConflictKind::UniqueEmail,
                "Player email already exists",
            ));
        }
        if t.tokens.contains_key(&player.token_hash) {
            return Err(DomainError::conflict(
                ConflictKind::Other("Unique".into()),
                "Unique constraint violation",
            ));
        }
        let id = next_id(&mut t.last_player_id);
        t.emails.insert(player.email.as_str().to_string(), id);
        t.tokens.insert(player.token_hash.clone(), id);
        t.players.insert(
            id,
            PlayerRow {
                name: player.name,
                email: player.email,
                token_hash: player.token_hash,
            },
        );
        Ok(id)
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Player>, DomainError> {
        Ok(self.tables.lock().player(id))
    }

    async fn get_many(&self, ids: &[i64]) -> Result<Vec<Player>, DomainError> {
        let t = self.tables.lock();
        let mut ids = ids.to_vec();
        ids.sort_unstable();
        ids.dedup();
        Ok(ids.into_iter().filter_map(|id| t.player(id)).collect())
    }

    async fn find_by_token_hash(&self, token_hash: &str) -> Result<Option<Player>, DomainError> {
        let t = self.tables.lock();
        Ok(t.tokens.get(token_hash).and_then(|&id| t.player(id)))
    }

    async fn search(
        &self,
        filter: &PlayerFilter,
        page: PageRequest,
    ) -> Result<Page<Player>, DomainError> {
        let t = self.tables.lock();
        let matched = t
            .players
            .keys()
            .filter_map(|&id| t.player(id))
            .filter(|p| filter.matches(p));
        Ok(paginate(matched, page))
    }

    async fn update(&self, id: i64, name: PlayerName) -> Result<Option<Player>, DomainError> {
        let mut t = self.tables.lock();
        let Some(row) = t.players.get_mut(&id) else {
            return Ok(None);
        };
        row.name = name;
        Ok(t.player(id))
    }

    async fn delete(&self, id: i64) -> Result<bool, DomainError> {
        let mut t = self.tables.lock();
        let Some(row) = t.players.remove(&id) else {
            return Ok(false);
        };
        t.emails.remove(row.email.as_str());
        t.tokens.remove(&row.token_hash);
        t.drop_memberships_where(|_, pid| pid == id);
        Ok(true)
    }
}

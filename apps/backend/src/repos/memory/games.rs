use async_trait::async_trait;

use super::{next_id, MemoryStore};
use crate::domain::search::paginate;
use crate::domain::{Game, GameFilter, GameUpdate, NewGame, Page, PageRequest};
use crate::errors::domain::{ConflictKind, DomainError};
use crate::repos::GameStore;

fn name_taken() -> DomainError {
    DomainError::conflict(ConflictKind::GameNameTaken, "Game name already exists")
}

#[async_trait]
impl GameStore for MemoryStore {
    async fn create(&self, game: NewGame) -> Result<i64, DomainError> {
        let mut t = self.tables.lock();
        if t.game_names.contains_key(game.name.as_str()) {
            return Err(name_taken());
        }
        let id = next_id(&mut t.last_game_id);
        t.game_names.insert(game.name.as_str().to_string(), id);
        t.games.insert(id, game.with_id(id));
        Ok(id)
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Game>, DomainError> {
        Ok(self.tables.lock().games.get(&id).cloned())
    }

    async fn search(
        &self,
        filter: &GameFilter,
        page: PageRequest,
    ) -> Result<Page<Game>, DomainError> {
        let t = self.tables.lock();
        let matched = t.games.values().filter(|g| filter.matches(g)).cloned();
        Ok(paginate(matched, page))
    }

    async fn update(&self, id: i64, update: GameUpdate) -> Result<Option<Game>, DomainError> {
        let mut t = self.tables.lock();
        let Some(current) = t.games.get(&id).cloned() else {
            return Ok(None);
        };
        if let Some(name) = &update.name {
            if t.game_names.get(name.as_str()).is_some_and(|&owner| owner != id) {
                return Err(name_taken());
            }
        }

        let mut game = current.clone();
        update.apply(&mut game);
        if game.name != current.name {
            t.game_names.remove(current.name.as_str());
            t.game_names.insert(game.name.as_str().to_string(), id);
        }
        t.games.insert(id, game.clone());
        Ok(Some(game))
    }

    async fn delete(&self, id: i64) -> Result<bool, DomainError> {
        let mut t = self.tables.lock();
        if !t.games.contains_key(&id) {
            return Ok(false);
        }
        if t.sessions.values().any(|s| s.game_id == id) {
            return Err(DomainError::conflict(
                ConflictKind::GameInUse,
                "Game is referenced by a session",
            ));
        }
        if let Some(game) = t.games.remove(&id) {
            t.game_names.remove(game.name.as_str());
        }
        Ok(true)
    }
}

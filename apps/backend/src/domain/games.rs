use serde::Serialize;

use super::primitives::{Genres, Name};

/// A registered game. Built only from validated primitives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Game {
    pub id: i64,
    pub name: Name,
    pub developer: Name,
    pub genres: Genres,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewGame {
    pub name: Name,
    pub developer: Name,
    pub genres: Genres,
}

impl NewGame {
    pub fn with_id(self, id: i64) -> Game {
        Game {
            id,
            name: self.name,
            developer: self.developer,
            genres: self.genres,
        }
    }
}

/// Partial update; `None` leaves the field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameUpdate {
    pub name: Option<Name>,
    pub developer: Option<Name>,
    pub genres: Option<Genres>,
}

impl GameUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.developer.is_none() && self.genres.is_none()
    }

    pub fn apply(self, game: &mut Game) {
        if let Some(name) = self.name {
            game.name = name;
        }
        if let Some(developer) = self.developer {
            game.developer = developer;
        }
        if let Some(genres) = self.genres {
            game.genres = genres;
        }
    }
}

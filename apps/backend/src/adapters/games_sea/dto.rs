//! DTOs for the games adapter.

/// Row shape for inserting a game with its genre set.
#[derive(Debug, Clone)]
pub struct GameCreate {
    pub name: String,
    pub developer: String,
    pub genres: Vec<String>,
}

/// A game row plus its genres, sorted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameRecord {
    pub id: i64,
    pub name: String,
    pub developer: String,
    pub genres: Vec<String>,
}

/// Column changes; `None` leaves the column alone. `genres` replaces the set.
#[derive(Debug, Clone, Default)]
pub struct GameChanges {
    pub name: Option<String>,
    pub developer: Option<String>,
    pub genres: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default)]
pub struct GameSearch {
    pub developer: Option<String>,
    /// Already a case-folded, escaped `LIKE` pattern.
    pub name_pattern: Option<String>,
    pub genres: Vec<String>,
}

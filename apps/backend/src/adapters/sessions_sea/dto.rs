//! DTOs for the sessions adapter.

use time::OffsetDateTime;

#[derive(Debug, Clone)]
pub struct SessionCreate {
    pub game_id: i64,
    pub capacity: i32,
    pub date: OffsetDateTime,
}

#[derive(Debug, Clone, Default)]
pub struct SessionChanges {
    pub capacity: Option<i32>,
    pub date: Option<OffsetDateTime>,
}

/// Predicate over sessions. `Some` fields are ANDed together.
#[derive(Debug, Clone)]
pub struct SessionSearch {
    pub game_id: i64,
    pub date: Option<OffsetDateTime>,
    /// `date > t`
    pub after: Option<OffsetDateTime>,
    /// `date <= t`
    pub not_after: Option<OffsetDateTime>,
    pub player_id: Option<i64>,
}

impl SessionSearch {
    pub fn for_game(game_id: i64) -> Self {
        Self {
            game_id,
            date: None,
            after: None,
            not_after: None,
            player_id: None,
        }
    }
}

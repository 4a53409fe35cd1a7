//! Search filters and the page contract shared by both backends.
//!
//! Results are always ordered by ascending id, and `total_count` counts every
//! match regardless of `limit`/`skip`. The relational backend turns the
//! filters into one predicate used by both its select and its count; the
//! in-memory backend runs `matches` followed by [`paginate`].

use serde::Serialize;
use time::OffsetDateTime;

use super::games::Game;
use super::players::Player;
use super::primitives::{Genres, Name, PageRequest, SessionDate};
use super::sessions::{Session, SessionState};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_count: u64,
}

impl<T> Page<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total_count: self.total_count,
        }
    }
}

/// Filter -> count -> skip -> take. `matched` must already be in id order.
pub fn paginate<T>(matched: impl IntoIterator<Item = T>, page: PageRequest) -> Page<T> {
    let matched: Vec<T> = matched.into_iter().collect();
    let total_count = matched.len() as u64;
    let items = matched
        .into_iter()
        .skip(page.skip() as usize)
        .take(page.limit() as usize)
        .collect();
    Page { items, total_count }
}

/// The one case-folding rule for name filters. The relational backend
/// stores this form in `name_lc` so SQL never folds case itself.
pub fn fold_case(s: &str) -> String {
    s.to_lowercase()
}

/// Case-insensitive substring match used by every name filter.
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    fold_case(haystack).contains(&fold_case(needle))
}

/// `%needle%` for SQL `LIKE ... ESCAPE '\'` against a folded column, with
/// the wildcard characters in `needle` matched literally.
pub fn like_contains_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for c in fold_case(needle).chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.is_empty())
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameFilter {
    /// Exact match.
    pub developer: Option<Name>,
    /// Case-insensitive substring.
    pub name: Option<String>,
    /// Game genres must be a superset of these.
    pub genres: Option<Genres>,
}

impl GameFilter {
    pub fn name_contains(&self) -> Option<&str> {
        non_empty(self.name.as_deref())
    }

    pub fn matches(&self, game: &Game) -> bool {
        if let Some(dev) = &self.developer {
            if &game.developer != dev {
                return false;
            }
        }
        if let Some(needle) = self.name_contains() {
            if !contains_ignore_case(game.name.as_str(), needle) {
                return false;
            }
        }
        if let Some(genres) = &self.genres {
            if !game.genres.is_superset(genres) {
                return false;
            }
        }
        true
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayerFilter {
    /// Case-insensitive substring.
    pub name: Option<String>,
}

impl PlayerFilter {
    pub fn name_contains(&self) -> Option<&str> {
        non_empty(self.name.as_deref())
    }

    pub fn matches(&self, player: &Player) -> bool {
        self.name_contains()
            .map_or(true, |needle| contains_ignore_case(player.name.as_str(), needle))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionFilter {
    pub game_id: i64,
    /// Exact match on the stored timestamp.
    pub date: Option<SessionDate>,
    /// Evaluated against `now`.
    pub state: Option<SessionState>,
    /// Sessions this player belongs to.
    pub player_id: Option<i64>,
    pub now: OffsetDateTime,
}

impl SessionFilter {
    pub fn matches(&self, session: &Session) -> bool {
        session.game_id == self.game_id
            && self.date.map_or(true, |d| session.date == d)
            && self.state.map_or(true, |s| session.state(self.now) == s)
            && self.player_id.map_or(true, |p| session.is_member(p))
    }
}

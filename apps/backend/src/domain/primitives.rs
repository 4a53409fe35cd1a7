//! Validated value types. Construction is the only way in, so anything
//! holding one of these can assume it is well-formed.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use lazy_regex::regex_is_match;
use serde::Serialize;
use time::{OffsetDateTime, UtcOffset};

use crate::errors::domain::{DomainError, ValidationKind};

pub const MIN_CAPACITY: i32 = 2;
pub const MAX_CAPACITY: i32 = 100;
pub const MAX_PAGE_LIMIT: u64 = 100;

const NAME_MIN: usize = 3;
const NAME_MAX: usize = 60;
const PLAYER_NAME_MIN: usize = 1;
const EMAIL_MIN: usize = 3;
const EMAIL_MAX: usize = 254;
const GENRE_MIN: usize = 3;
const GENRE_MAX: usize = 40;

fn bounded(
    raw: &str,
    field: &str,
    min: usize,
    max: usize,
    kind: ValidationKind,
) -> Result<String, DomainError> {
    let trimmed = raw.trim();
    let len = trimmed.chars().count();
    if len == 0 {
        return Err(DomainError::validation(kind, format!("{field} must not be empty")));
    }
    if len < min || len > max {
        return Err(DomainError::validation(
            kind,
            format!("{field} must be between {min} and {max} characters, got {len}"),
        ));
    }
    Ok(trimmed.to_string())
}

/// Game name or developer: trimmed, 3..=60 characters.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Name(String);

impl Name {
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        bounded(raw, "name", NAME_MIN, NAME_MAX, ValidationKind::InvalidName).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

/// Player display name: trimmed, 1..=60 characters.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct PlayerName(String);

impl PlayerName {
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        bounded(
            raw,
            "player name",
            PLAYER_NAME_MIN,
            NAME_MAX,
            ValidationKind::InvalidName,
        )
        .map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

/// Trimmed, lowercased email address.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Email(String);

impl Email {
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let email = bounded(raw, "email", EMAIL_MIN, EMAIL_MAX, ValidationKind::InvalidEmail)?
            .to_lowercase();
        if !regex_is_match!(r"^[^\s@]+@[^\s@]+\.[^\s@]+$", &email) {
            return Err(DomainError::validation(
                ValidationKind::InvalidEmail,
                format!("'{email}' is not a valid email address"),
            ));
        }
        Ok(Self(email))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Genre {
    Action,
    Adventure,
    Fighting,
    Horror,
    Mmo,
    Platformer,
    Puzzle,
    Racing,
    Rpg,
    Sandbox,
    Shooter,
    Simulation,
    Sports,
    Strategy,
    Survival,
}

impl Genre {
    pub const ALL: [Genre; 15] = [
        Genre::Action,
        Genre::Adventure,
        Genre::Fighting,
        Genre::Horror,
        Genre::Mmo,
        Genre::Platformer,
        Genre::Puzzle,
        Genre::Racing,
        Genre::Rpg,
        Genre::Sandbox,
        Genre::Shooter,
        Genre::Simulation,
        Genre::Sports,
        Genre::Strategy,
        Genre::Survival,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Genre::Action => "ACTION",
            Genre::Adventure => "ADVENTURE",
            Genre::Fighting => "FIGHTING",
            Genre::Horror => "HORROR",
            Genre::Mmo => "MMO",
            Genre::Platformer => "PLATFORMER",
            Genre::Puzzle => "PUZZLE",
            Genre::Racing => "RACING",
            Genre::Rpg => "RPG",
            Genre::Sandbox => "SANDBOX",
            Genre::Shooter => "SHOOTER",
            Genre::Simulation => "SIMULATION",
            Genre::Sports => "SPORTS",
            Genre::Strategy => "STRATEGY",
            Genre::Survival => "SURVIVAL",
        }
    }
}

impl FromStr for Genre {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = bounded(s, "genre", GENRE_MIN, GENRE_MAX, ValidationKind::InvalidGenre)?
            .to_ascii_uppercase();
        Genre::ALL
            .into_iter()
            .find(|g| g.as_str() == raw)
            .ok_or_else(|| {
                DomainError::validation(
                    ValidationKind::InvalidGenre,
                    format!("unknown genre '{raw}'"),
                )
            })
    }
}

impl fmt::Display for Genre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Non-empty, de-duplicated set of genres, iterated in a stable order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Genres(BTreeSet<Genre>);

impl Genres {
    pub fn new(genres: impl IntoIterator<Item = Genre>) -> Result<Self, DomainError> {
        let set: BTreeSet<Genre> = genres.into_iter().collect();
        if set.is_empty() {
            return Err(DomainError::validation(
                ValidationKind::EmptyGenres,
                "at least one genre is required",
            ));
        }
        Ok(Self(set))
    }

    pub fn parse<S: AsRef<str>>(raw: impl IntoIterator<Item = S>) -> Result<Self, DomainError> {
        let genres = raw
            .into_iter()
            .map(|s| s.as_ref().parse::<Genre>())
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(genres)
    }

    pub fn iter(&self) -> impl Iterator<Item = Genre> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True when every genre in `other` is also in `self`.
    pub fn is_superset(&self, other: &Genres) -> bool {
        self.0.is_superset(&other.0)
    }
}

/// Maximum number of players in a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Capacity(i32);

impl Capacity {
    pub fn new(value: i32) -> Result<Self, DomainError> {
        if !(MIN_CAPACITY..=MAX_CAPACITY).contains(&value) {
            return Err(DomainError::validation(
                ValidationKind::InvalidCapacity,
                format!("capacity must be between {MIN_CAPACITY} and {MAX_CAPACITY}, got {value}"),
            ));
        }
        Ok(Self(value))
    }

    pub fn get(&self) -> i32 {
        self.0
    }

    /// Whether `members` players fill the session.
    pub fn is_reached_by(&self, members: usize) -> bool {
        members >= self.0 as usize
    }
}

/// A session's scheduled time, in UTC and truncated to whole seconds so the
/// value compares equal after a round-trip through any backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct SessionDate(#[serde(with = "time::serde::rfc3339")] OffsetDateTime);

impl SessionDate {
    pub fn new(at: OffsetDateTime) -> Result<Self, DomainError> {
        let utc = at.to_offset(UtcOffset::UTC);
        OffsetDateTime::from_unix_timestamp(utc.unix_timestamp())
            .map(Self)
            .map_err(|e| {
                DomainError::validation(ValidationKind::InvalidDate, format!("invalid date: {e}"))
            })
    }

    pub fn get(&self) -> OffsetDateTime {
        self.0
    }

    pub fn is_after(&self, now: OffsetDateTime) -> bool {
        self.0 > now
    }
}

/// `limit` in 1..=100, `skip` non-negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    limit: u64,
    skip: u64,
}

impl PageRequest {
    pub fn new(limit: i64, skip: i64) -> Result<Self, DomainError> {
        if limit < 1 || limit as u64 > MAX_PAGE_LIMIT {
            return Err(DomainError::validation(
                ValidationKind::InvalidPage,
                format!("limit must be between 1 and {MAX_PAGE_LIMIT}, got {limit}"),
            ));
        }
        if skip < 0 {
            return Err(DomainError::validation(
                ValidationKind::InvalidPage,
                format!("skip must not be negative, got {skip}"),
            ));
        }
        Ok(Self {
            limit: limit as u64,
            skip: skip as u64,
        })
    }

    /// Largest page starting at the beginning.
    pub fn first(limit: u64) -> Self {
        Self {
            limit: limit.clamp(1, MAX_PAGE_LIMIT),
            skip: 0,
        }
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }

    pub fn skip(&self) -> u64 {
        self.skip
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::first(MAX_PAGE_LIMIT)
    }
}

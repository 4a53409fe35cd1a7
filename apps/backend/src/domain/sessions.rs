//! Sessions and the membership invariants.
//!
//! State is derived from the scheduled date and the caller's `now`; it is
//! never stored. The checks here are pure: stores call them again inside
//! their atomic section so concurrent writers see the same rules.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use time::OffsetDateTime;

use super::games::Game;
use super::players::Player;
use super::primitives::{Capacity, SessionDate};
use crate::errors::domain::{BadRequestKind, ConflictKind, DomainError, ValidationKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SessionState {
    #[serde(rename = "OPEN")]
    Open,
    #[serde(rename = "CLOSE")]
    Close,
}

impl SessionState {
    /// OPEN while the scheduled date is still in the future.
    pub fn at(date: SessionDate, now: OffsetDateTime) -> Self {
        if date.is_after(now) {
            SessionState::Open
        } else {
            SessionState::Close
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            SessionState::Open => "OPEN",
            SessionState::Close => "CLOSE",
        }
    }
}

impl FromStr for SessionState {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "OPEN" => Ok(SessionState::Open),
            "CLOSE" | "CLOSED" => Ok(SessionState::Close),
            other => Err(DomainError::validation(
                ValidationKind::Other("InvalidState".into()),
                format!("unknown session state '{other}'"),
            )),
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    pub id: i64,
    pub game_id: i64,
    pub capacity: Capacity,
    pub date: SessionDate,
    /// Ascending, no duplicates.
    pub player_ids: Vec<i64>,
}

impl Session {
    pub fn state(&self, now: OffsetDateTime) -> SessionState {
        SessionState::at(self.date, now)
    }

    pub fn is_member(&self, player_id: i64) -> bool {
        self.player_ids.binary_search(&player_id).is_ok()
    }

    pub fn is_full(&self) -> bool {
        self.capacity.is_reached_by(self.player_ids.len())
    }

    /// Whether `player_id` may join right now. Checked in this order:
    /// membership, capacity, state.
    pub fn ensure_can_join(&self, player_id: i64, now: OffsetDateTime) -> Result<(), DomainError> {
        if self.is_member(player_id) {
            return Err(DomainError::conflict(
                ConflictKind::PlayerAlreadyInSession,
                "Player already in session",
            ));
        }
        if self.is_full() {
            return Err(DomainError::bad_request(
                BadRequestKind::SessionFull,
                "Session is full",
            ));
        }
        if self.state(now) == SessionState::Close {
            return Err(DomainError::bad_request(
                BadRequestKind::SessionClosed,
                "Session is closed",
            ));
        }
        Ok(())
    }

    /// Takes the raw value so a too-small request reports the member count
    /// rather than the range.
    pub fn ensure_capacity_fits(&self, capacity: i32) -> Result<(), DomainError> {
        if i64::from(capacity) < self.player_ids.len() as i64 {
            return Err(DomainError::bad_request(
                BadRequestKind::CapacityBelowMembers,
                "capacity less than current players size",
            ));
        }
        Ok(())
    }

    /// Insert keeping `player_ids` sorted. Callers check membership first.
    pub fn admit(&mut self, player_id: i64) {
        if let Err(pos) = self.player_ids.binary_search(&player_id) {
            self.player_ids.insert(pos, player_id);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSession {
    pub game_id: i64,
    pub capacity: Capacity,
    pub date: SessionDate,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionUpdate {
    pub capacity: Option<Capacity>,
    pub date: Option<SessionDate>,
}

impl SessionUpdate {
    pub fn is_empty(&self) -> bool {
        self.capacity.is_none() && self.date.is_none()
    }
}

/// A session joined at read time with its game and players.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionDetails {
    pub session: Session,
    pub state: SessionState,
    pub game: Game,
    pub players: Vec<Player>,
}

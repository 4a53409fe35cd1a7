//! In-process backend.
//!
//! Every table lives behind one mutex, so each store call is a single
//! critical section: check-then-write sequences (capacity, uniqueness,
//! references) cannot interleave. Constraints the relational schema enforces
//! are emulated here with the same error kinds.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::domain::{Capacity, Email, Game, PlayerName, Session, SessionDate};

mod games;
mod players;
mod sessions;

#[derive(Debug, Clone)]
struct PlayerRow {
    name: PlayerName,
    email: Email,
    token_hash: String,
}

#[derive(Debug, Clone, Copy)]
struct SessionRow {
    game_id: i64,
    capacity: Capacity,
    date: SessionDate,
}

#[derive(Debug, Default)]
struct Tables {
    games: BTreeMap<i64, Game>,
    game_names: HashMap<String, i64>,
    players: BTreeMap<i64, PlayerRow>,
    emails: HashMap<String, i64>,
    tokens: HashMap<String, i64>,
    sessions: BTreeMap<i64, SessionRow>,
    /// (session_id, player_id)
    memberships: BTreeSet<(i64, i64)>,
    last_game_id: i64,
    last_player_id: i64,
    last_session_id: i64,
}

/// Sequence semantics: the first id handed out is 1, ids are never reused.
fn next_id(last: &mut i64) -> i64 {
    *last += 1;
    *last
}

impl Tables {
    fn members_of(&self, session_id: i64) -> Vec<i64> {
        self.memberships
            .range((session_id, i64::MIN)..=(session_id, i64::MAX))
            .map(|&(_, player_id)| player_id)
            .collect()
    }

    fn session(&self, id: i64) -> Option<Session> {
        self.sessions.get(&id).map(|row| Session {
            id,
            game_id: row.game_id,
            capacity: row.capacity,
            date: row.date,
            player_ids: self.members_of(id),
        })
    }

    fn drop_memberships_where(&mut self, mut pred: impl FnMut(i64, i64) -> bool) {
        self.memberships.retain(|&(sid, pid)| !pred(sid, pid));
    }
}

/// Cheap to clone; clones share the same tables.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

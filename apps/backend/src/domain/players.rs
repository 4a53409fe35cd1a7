use serde::Serialize;

use super::primitives::{Email, PlayerName};

/// Read model of a player. The credential hash stays in storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Player {
    pub id: i64,
    pub name: PlayerName,
    pub email: Email,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPlayer {
    pub name: PlayerName,
    pub email: Email,
    /// blake3 hex digest of the bearer token handed to the player
    pub token_hash: String,
}

/// Digest under which a bearer token is stored and looked up.
pub fn hash_token(token: &str) -> String {
    blake3::hash(token.as_bytes()).to_hex().to_string()
}

//! DTOs for the players adapter.

#[derive(Debug, Clone)]
pub struct PlayerCreate {
    pub name: String,
    pub email: String,
    pub token_hash: String,
}

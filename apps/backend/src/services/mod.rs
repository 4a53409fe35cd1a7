//! Domain services: orchestrate store calls and enforce the rules no single
//! store call can express.

use std::sync::Arc;

use crate::domain::Clock;
use crate::repos::Stores;

pub mod games;
pub mod players;
pub mod sessions;

pub use games::GameService;
pub use players::{CreatedPlayer, PlayerService};
pub use sessions::{SessionService, PLAYER_ADDED, PLAYER_REMOVED};

#[derive(Clone)]
pub struct Services {
    pub games: GameService,
    pub players: PlayerService,
    pub sessions: SessionService,
}

impl Services {
    pub fn new(stores: &Stores, clock: Arc<dyn Clock>) -> Self {
        Self {
            games: GameService::new(Arc::clone(&stores.games)),
            players: PlayerService::new(Arc::clone(&stores.players)),
            sessions: SessionService::new(stores.clone(), clock),
        }
    }
}

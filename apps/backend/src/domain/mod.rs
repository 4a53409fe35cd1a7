//! Pure domain model: validated primitives, entities, invariants and the
//! search contract. Nothing here touches storage or HTTP.

pub mod clock;
pub mod games;
pub mod players;
pub mod primitives;
pub mod search;
pub mod sessions;

pub use clock::{Clock, FixedClock, SystemClock};
pub use games::{Game, GameUpdate, NewGame};
pub use players::{hash_token, NewPlayer, Player};
pub use primitives::{
    Capacity, Email, Genre, Genres, Name, PageRequest, PlayerName, SessionDate, MAX_CAPACITY,
    MAX_PAGE_LIMIT, MIN_CAPACITY,
};
pub use search::{GameFilter, Page, PlayerFilter, SessionFilter};
pub use sessions::{NewSession, Session, SessionDetails, SessionState, SessionUpdate};

pub mod games;
pub mod games_genres;
pub mod players;
pub mod sessions;
pub mod sessions_players;

pub use games::Entity as Games;
pub use games_genres::Entity as GamesGenres;
pub use players::Entity as Players;
pub use sessions::Entity as Sessions;
pub use sessions_players::Entity as SessionsPlayers;

use backend::domain::{Capacity, Email, Genre, Genres, Name, NewGame, PlayerName, SessionDate};
use backend::AppError;
use backend_test_support::unique_helpers::{unique_email, unique_game_name};
use time::macros::datetime;
use time::{Duration, OffsetDateTime};

use super::backends::Harness;

/// The harness clock starts here.
pub const NOW: OffsetDateTime = datetime!(2030-06-01 12:00 UTC);

pub fn in_days(days: i64) -> SessionDate {
    SessionDate::new(NOW + Duration::days(days)).expect("valid date")
}

pub fn capacity(n: i32) -> Capacity {
    Capacity::new(n).expect("valid capacity")
}

pub fn new_game(name: &str, developer: &str, genres: &[Genre]) -> NewGame {
    NewGame {
        name: Name::parse(name).expect("valid name"),
        developer: Name::parse(developer).expect("valid developer"),
        genres: Genres::new(genres.iter().copied()).expect("valid genres"),
    }
}

pub async fn create_game(h: &Harness) -> Result<i64, AppError> {
    let game = new_game(&unique_game_name("game"), "Bethesda", &[Genre::Rpg]);
    Ok(h.services.games.create_game(game).await?)
}

pub async fn create_player(h: &Harness, name: &str) -> Result<i64, AppError> {
    let created = h
        .services
        .players
        .create_player(
            PlayerName::parse(name).expect("valid player name"),
            Email::parse(&unique_email(name)).expect("valid email"),
        )
        .await?;
    Ok(created.id)
}

pub async fn create_players(h: &Harness, n: usize) -> Result<Vec<i64>, AppError> {
    let mut ids = Vec::with_capacity(n);
    for i in 0..n {
        ids.push(create_player(h, &format!("player{i}")).await?);
    }
    Ok(ids)
}

/// An open session `days` ahead of the harness clock.
pub async fn create_session(
    h: &Harness,
    game_id: i64,
    cap: i32,
    days: i64,
) -> Result<i64, AppError> {
    Ok(h
        .services
        .sessions
        .create_session(capacity(cap), game_id, in_days(days))
        .await?)
}

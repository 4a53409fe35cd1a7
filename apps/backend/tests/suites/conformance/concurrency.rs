//! Racing joins against one session. Whatever the interleaving, the member
//! count never passes capacity and a player is admitted at most once.
//! Session creation racing a game delete ends in a typed outcome either way.

use backend::errors::domain::{BadRequestKind, ConflictKind, DomainError, NotFoundKind};
use backend::AppError;
use futures::future::join_all;

use crate::support::backends::Harness;
use crate::support::fixtures::{capacity, create_game, create_players, create_session, in_days};

async fn race_for_last_seats(h: Harness) -> Result<(), AppError> {
    let game_id = create_game(&h).await?;
    let session_id = create_session(&h, game_id, 2, 1).await?;
    let players = create_players(&h, 12).await?;

    let joins = players.iter().copied().map(|player_id| {
        let sessions = h.services.sessions.clone();
        tokio::spawn(async move { sessions.add_player(session_id, player_id).await })
    });

    let mut admitted = 0;
    let mut turned_away = 0;
    for joined in join_all(joins).await {
        match joined.expect("join task panicked") {
            Ok(_) => admitted += 1,
            Err(DomainError::BadRequest(BadRequestKind::SessionFull, _)) => turned_away += 1,
            Err(other) => panic!("unexpected error: {other:?}"),
        }
    }
    assert_eq!(admitted, 2);
    assert_eq!(turned_away, 10);

    let session = h.services.sessions.get_session(session_id).await?.session;
    assert_eq!(session.player_ids.len(), 2);
    assert!(session.player_ids.iter().all(|p| players.contains(p)));
    Ok(())
}

async fn duplicate_joins_admit_once(h: Harness) -> Result<(), AppError> {
    let game_id = create_game(&h).await?;
    let session_id = create_session(&h, game_id, 5, 1).await?;
    let player_id = create_players(&h, 1).await?[0];

    let joins = (0..4).map(|_| {
        let sessions = h.services.sessions.clone();
        tokio::spawn(async move { sessions.add_player(session_id, player_id).await })
    });

    let mut admitted = 0;
    for joined in join_all(joins).await {
        match joined.expect("join task panicked") {
            Ok(_) => admitted += 1,
            Err(DomainError::Conflict(ConflictKind::PlayerAlreadyInSession, _)) => {}
            Err(other) => panic!("unexpected error: {other:?}"),
        }
    }
    assert_eq!(admitted, 1);

    let session = h.services.sessions.get_session(session_id).await?.session;
    assert_eq!(session.player_ids, vec![player_id]);
    Ok(())
}

async fn create_races_game_delete(h: Harness) -> Result<(), AppError> {
    for _ in 0..8 {
        let game_id = create_game(&h).await?;
        let sessions = h.services.sessions.clone();
        let games = h.services.games.clone();
        let create = tokio::spawn(async move {
            sessions
                .create_session(capacity(2), game_id, in_days(1))
                .await
        });
        let delete = tokio::spawn(async move { games.delete_game(game_id).await });
        let created = create.await.expect("create task panicked");
        let deleted = delete.await.expect("delete task panicked");

        match (&created, &deleted) {
            (Ok(session_id), Err(DomainError::Conflict(ConflictKind::GameInUse, _))) => {
                let session = h.services.sessions.get_session(*session_id).await?.session;
                assert_eq!(session.game_id, game_id);
            }
            (Err(DomainError::NotFound(NotFoundKind::Game, _)), Ok(())) => {}
            other => panic!("unexpected outcome: {other:?}"),
        }
    }
    Ok(())
}

mod race_for_last_seats {
    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn memory() -> Result<(), backend::AppError> {
        let h = crate::support::backends::Harness::memory().await?;
        super::race_for_last_seats(h).await
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn sqlite() -> Result<(), backend::AppError> {
        let h = crate::support::backends::Harness::sqlite_memory().await?;
        super::race_for_last_seats(h).await
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    #[serial_test::serial]
    async fn sqlite_file() -> Result<(), backend::AppError> {
        let h = crate::support::backends::Harness::sqlite_file().await?;
        super::race_for_last_seats(h).await
    }
}

mod duplicate_joins_admit_once {
    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn memory() -> Result<(), backend::AppError> {
        let h = crate::support::backends::Harness::memory().await?;
        super::duplicate_joins_admit_once(h).await
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn sqlite() -> Result<(), backend::AppError> {
        let h = crate::support::backends::Harness::sqlite_memory().await?;
        super::duplicate_joins_admit_once(h).await
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    #[serial_test::serial]
    async fn sqlite_file() -> Result<(), backend::AppError> {
        let h = crate::support::backends::Harness::sqlite_file().await?;
        super::duplicate_joins_admit_once(h).await
    }
}

mod create_races_game_delete {
    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn memory() -> Result<(), backend::AppError> {
        let h = crate::support::backends::Harness::memory().await?;
        super::create_races_game_delete(h).await
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn sqlite() -> Result<(), backend::AppError> {
        let h = crate::support::backends::Harness::sqlite_memory().await?;
        super::create_races_game_delete(h).await
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    #[serial_test::serial]
    async fn sqlite_file() -> Result<(), backend::AppError> {
        let h = crate::support::backends::Harness::sqlite_file().await?;
        super::create_races_game_delete(h).await
    }
}

use backend::domain::{SessionState, SessionUpdate};
use backend::errors::domain::{
    BadRequestKind, ConflictKind, DomainError, NotFoundKind, ValidationKind,
};
use backend::services::{PLAYER_ADDED, PLAYER_REMOVED};
use backend::AppError;
use time::Duration;

use crate::support::backends::{both_backends, Harness};
use crate::support::fixtures::{
    capacity, create_game, create_player, create_players, create_session, in_days,
};

both_backends!(
    create_rejects_past_or_present_dates,
    create_requires_existing_game,
    create_then_get_round_trips,
    add_player_requires_session_and_player,
    closed_session_rejects_joins,
    remove_player_paths,
    capacity_update_never_drops_below_members,
    date_update_reschedules,
    delete_cascades_memberships,
    details_join_game_and_players,
);

async fn create_rejects_past_or_present_dates(h: Harness) -> Result<(), AppError> {
    let game_id = create_game(&h).await?;
    for days in [0, -1] {
        let err = h
            .services
            .sessions
            .create_session(capacity(4), game_id, in_days(days))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(ValidationKind::InvalidDate, _)));
    }
    Ok(())
}

async fn create_requires_existing_game(h: Harness) -> Result<(), AppError> {
    let err = h
        .services
        .sessions
        .create_session(capacity(4), 42, in_days(1))
        .await
        .unwrap_err();
    assert_eq!(err, DomainError::game_not_found());

    // the store enforces the reference on its own too
    let err = h
        .stores
        .sessions
        .create(backend::domain::NewSession {
            game_id: 42,
            capacity: capacity(4),
            date: in_days(1),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound(NotFoundKind::Game, _)));

    let gone = create_game(&h).await?;
    h.services.games.delete_game(gone).await?;
    let err = h
        .stores
        .sessions
        .create(backend::domain::NewSession {
            game_id: gone,
            capacity: capacity(4),
            date: in_days(1),
        })
        .await
        .unwrap_err();
    assert_eq!(err, DomainError::game_not_found());
    Ok(())
}

async fn create_then_get_round_trips(h: Harness) -> Result<(), AppError> {
    let game_id = create_game(&h).await?;
    let id = create_session(&h, game_id, 6, 3).await?;

    let session = h
        .stores
        .sessions
        .get_by_id(id)
        .await?
        .expect("session stored");
    assert_eq!(session.id, id);
    assert_eq!(session.game_id, game_id);
    assert_eq!(session.capacity, capacity(6));
    assert_eq!(session.date, in_days(3));
    assert!(session.player_ids.is_empty());
    assert_eq!(session.state(h.clock_now()), SessionState::Open);
    Ok(())
}

async fn add_player_requires_session_and_player(h: Harness) -> Result<(), AppError> {
    let game_id = create_game(&h).await?;
    let session_id = create_session(&h, game_id, 2, 1).await?;
    let player = create_player(&h, "Real").await?;

    let err = h.services.sessions.add_player(999, player).await.unwrap_err();
    assert_eq!(err, DomainError::session_not_found());

    let err = h.services.sessions.add_player(session_id, 999).await.unwrap_err();
    assert_eq!(err, DomainError::player_not_found());

    // same order inside the store
    let now = h.clock_now();
    let err = h.stores.sessions.add_player(999, 999, now).await.unwrap_err();
    assert!(matches!(err, DomainError::NotFound(NotFoundKind::Session, _)));
    let err = h
        .stores
        .sessions
        .add_player(session_id, 999, now)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound(NotFoundKind::Player, _)));

    assert_eq!(h.services.sessions.add_player(session_id, player).await?, PLAYER_ADDED);
    Ok(())
}

async fn closed_session_rejects_joins(h: Harness) -> Result<(), AppError> {
    let game_id = create_game(&h).await?;
    let session_id = create_session(&h, game_id, 3, 1).await?;
    let players = create_players(&h, 2).await?;
    h.services.sessions.add_player(session_id, players[0]).await?;

    // exactly at the scheduled date the session is closed
    h.clock.advance(Duration::days(1));
    let err = h
        .services
        .sessions
        .add_player(session_id, players[1])
        .await
        .unwrap_err();
    assert_eq!(
        err,
        DomainError::bad_request(BadRequestKind::SessionClosed, "Session is closed")
    );

    // membership is still checked first
    let err = h
        .services
        .sessions
        .add_player(session_id, players[0])
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::Conflict(ConflictKind::PlayerAlreadyInSession, _)
    ));

    let details = h.services.sessions.get_session(session_id).await?;
    assert_eq!(details.state, SessionState::Close);
    assert_eq!(details.session.player_ids, vec![players[0]]);
    Ok(())
}

async fn remove_player_paths(h: Harness) -> Result<(), AppError> {
    let game_id = create_game(&h).await?;
    let session_id = create_session(&h, game_id, 2, 1).await?;
    let players = create_players(&h, 2).await?;
    h.services.sessions.add_player(session_id, players[0]).await?;

    let err = h
        .services
        .sessions
        .remove_player(session_id, players[1])
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound(NotFoundKind::Membership, _)));

    let err = h.services.sessions.remove_player(999, players[0]).await.unwrap_err();
    assert_eq!(err, DomainError::session_not_found());
    let err = h.services.sessions.remove_player(session_id, 999).await.unwrap_err();
    assert_eq!(err, DomainError::player_not_found());

    assert_eq!(
        h.services.sessions.remove_player(session_id, players[0]).await?,
        PLAYER_REMOVED
    );
    let details = h.services.sessions.get_session(session_id).await?;
    assert!(details.session.player_ids.is_empty());

    // the seat is free again
    h.services.sessions.add_player(session_id, players[1]).await?;
    h.services.sessions.add_player(session_id, players[0]).await?;
    assert!(!h.stores.sessions.remove_player(session_id, 999).await?);
    Ok(())
}

async fn capacity_update_never_drops_below_members(h: Harness) -> Result<(), AppError> {
    let game_id = create_game(&h).await?;
    let session_id = create_session(&h, game_id, 4, 1).await?;
    for p in create_players(&h, 3).await? {
        h.services.sessions.add_player(session_id, p).await?;
    }

    for below in [2, 1, 0] {
        let err = h
            .services
            .sessions
            .update_session(session_id, Some(below), None)
            .await
            .unwrap_err();
        assert_eq!(
            err,
            DomainError::bad_request(
                BadRequestKind::CapacityBelowMembers,
                "capacity less than current players size"
            )
        );
    }
    // the store rejects it on its own as well
    let shrink = SessionUpdate {
        capacity: Some(capacity(2)),
        ..Default::default()
    };
    let err = h.stores.sessions.update(session_id, shrink).await.unwrap_err();
    assert!(matches!(
        err,
        DomainError::BadRequest(BadRequestKind::CapacityBelowMembers, _)
    ));
    let session = h.services.sessions.get_session(session_id).await?.session;
    assert_eq!(session.capacity, capacity(4));

    // above the member count but out of range is a validation error
    let err = h
        .services
        .sessions
        .update_session(session_id, Some(101), None)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation(ValidationKind::InvalidCapacity, _)));

    // equal to the member count is allowed and fills the session
    let updated = h
        .services
        .sessions
        .update_session(session_id, Some(3), None)
        .await?;
    assert_eq!(updated.capacity, capacity(3));
    assert!(updated.is_full());

    let extra = create_player(&h, "Extra").await?;
    let err = h.services.sessions.add_player(session_id, extra).await.unwrap_err();
    assert!(matches!(err, DomainError::BadRequest(BadRequestKind::SessionFull, _)));
    Ok(())
}

async fn date_update_reschedules(h: Harness) -> Result<(), AppError> {
    let game_id = create_game(&h).await?;
    let session_id = create_session(&h, game_id, 2, 1).await?;

    let updated = h
        .services
        .sessions
        .update_session(session_id, None, Some(in_days(10)))
        .await?;
    assert_eq!(updated.date, in_days(10));
    assert_eq!(updated.capacity, capacity(2));

    let err = h
        .services
        .sessions
        .update_session(session_id, None, Some(in_days(-2)))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation(ValidationKind::InvalidDate, _)));

    let err = h
        .services
        .sessions
        .update_session(session_id, None, None)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation(ValidationKind::EmptyUpdate, _)));

    let err = h
        .services
        .sessions
        .update_session(999, Some(5), None)
        .await
        .unwrap_err();
    assert_eq!(err, DomainError::session_not_found());
    Ok(())
}

async fn delete_cascades_memberships(h: Harness) -> Result<(), AppError> {
    let game_id = create_game(&h).await?;
    let doomed = create_session(&h, game_id, 2, 1).await?;
    let kept = create_session(&h, game_id, 2, 1).await?;
    let player = create_player(&h, "Member").await?;
    h.services.sessions.add_player(doomed, player).await?;
    h.services.sessions.add_player(kept, player).await?;

    h.services.sessions.delete_session(doomed).await?;
    assert_eq!(
        h.services.sessions.get_session(doomed).await.unwrap_err(),
        DomainError::session_not_found()
    );
    assert_eq!(
        h.services.sessions.delete_session(doomed).await.unwrap_err(),
        DomainError::session_not_found()
    );

    let remaining = h
        .services
        .sessions
        .list_sessions(game_id, None, None, Some(player), Default::default())
        .await?;
    let ids: Vec<i64> = remaining.items.iter().map(|s| s.id).collect();
    assert_eq!(ids, vec![kept]);
    Ok(())
}

async fn details_join_game_and_players(h: Harness) -> Result<(), AppError> {
    let game_id = create_game(&h).await?;
    let session_id = create_session(&h, game_id, 5, 2).await?;
    let players = create_players(&h, 3).await?;
    // join out of id order
    for &p in players.iter().rev() {
        h.services.sessions.add_player(session_id, p).await?;
    }

    let details = h.services.sessions.get_session(session_id).await?;
    assert_eq!(details.game, h.services.games.get_game(game_id).await?);
    assert_eq!(details.state, SessionState::Open);
    assert_eq!(details.session.player_ids, players);
    let player_ids: Vec<i64> = details.players.iter().map(|p| p.id).collect();
    assert_eq!(player_ids, players);
    Ok(())
}

use backend::domain::{PageRequest, SessionState};
use backend::errors::domain::DomainError;
use backend::AppError;
use time::Duration;

use crate::support::backends::{both_backends, Harness};
use crate::support::fixtures::{create_game, create_player, create_session, in_days};

both_backends!(
    sessions_total_ignores_paging,
    sessions_come_back_in_id_order,
    sessions_filter_by_exact_date,
    sessions_filter_by_state,
    sessions_filter_by_player,
    sessions_scoped_to_their_game,
    unknown_game_or_player_is_not_found,
);

fn page(limit: i64, skip: i64) -> PageRequest {
    PageRequest::new(limit, skip).unwrap()
}

async fn sessions_total_ignores_paging(h: Harness) -> Result<(), AppError> {
    let game_id = create_game(&h).await?;
    for days in 1..=5 {
        create_session(&h, game_id, 3, days).await?;
    }

    let one = h
        .services
        .sessions
        .list_sessions(game_id, None, None, None, page(1, 0))
        .await?;
    let all = h
        .services
        .sessions
        .list_sessions(game_id, None, None, None, page(100, 0))
        .await?;
    assert_eq!(one.items.len(), 1);
    assert_eq!(one.total_count, 5);
    assert_eq!(all.items.len(), 5);
    assert_eq!(all.total_count, 5);

    let past_end = h
        .services
        .sessions
        .list_sessions(game_id, None, None, None, page(10, 7))
        .await?;
    assert!(past_end.items.is_empty());
    assert_eq!(past_end.total_count, 5);
    Ok(())
}

async fn sessions_come_back_in_id_order(h: Harness) -> Result<(), AppError> {
    let game_id = create_game(&h).await?;
    let mut created = Vec::new();
    // later dates first so date order and id order disagree
    for days in [9, 3, 6, 1] {
        created.push(create_session(&h, game_id, 2, days).await?);
    }

    let mut seen = Vec::new();
    for skip in 0..4 {
        let p = h
            .services
            .sessions
            .list_sessions(game_id, None, None, None, page(1, skip))
            .await?;
        seen.extend(p.items.into_iter().map(|s| s.id));
    }
    let mut sorted = created.clone();
    sorted.sort_unstable();
    assert_eq!(seen, sorted);
    Ok(())
}

async fn sessions_filter_by_exact_date(h: Harness) -> Result<(), AppError> {
    let game_id = create_game(&h).await?;
    let a = create_session(&h, game_id, 2, 3).await?;
    create_session(&h, game_id, 2, 4).await?;
    let c = create_session(&h, game_id, 2, 3).await?;

    let found = h
        .services
        .sessions
        .list_sessions(game_id, Some(in_days(3)), None, None, page(10, 0))
        .await?;
    let ids: Vec<i64> = found.items.iter().map(|s| s.id).collect();
    assert_eq!(ids, vec![a, c]);
    assert_eq!(found.total_count, 2);

    let none = h
        .services
        .sessions
        .list_sessions(game_id, Some(in_days(8)), None, None, page(10, 0))
        .await?;
    assert_eq!(none.total_count, 0);
    Ok(())
}

async fn sessions_filter_by_state(h: Harness) -> Result<(), AppError> {
    let game_id = create_game(&h).await?;
    let soon = create_session(&h, game_id, 2, 1).await?;
    let later = create_session(&h, game_id, 2, 5).await?;

    let open = h
        .services
        .sessions
        .list_sessions(game_id, None, Some(SessionState::Open), None, page(10, 0))
        .await?;
    assert_eq!(open.total_count, 2);

    // two days on, the first session has started
    h.clock.advance(Duration::days(2));
    let open = h
        .services
        .sessions
        .list_sessions(game_id, None, Some(SessionState::Open), None, page(10, 0))
        .await?;
    let closed = h
        .services
        .sessions
        .list_sessions(game_id, None, Some(SessionState::Close), None, page(10, 0))
        .await?;
    assert_eq!(open.items.iter().map(|s| s.id).collect::<Vec<_>>(), vec![later]);
    assert_eq!(closed.items.iter().map(|s| s.id).collect::<Vec<_>>(), vec![soon]);

    // exactly at the scheduled time counts as closed
    h.clock.set(in_days(5).get());
    let closed = h
        .services
        .sessions
        .list_sessions(game_id, None, Some(SessionState::Close), None, page(10, 0))
        .await?;
    assert_eq!(closed.total_count, 2);
    Ok(())
}

async fn sessions_filter_by_player(h: Harness) -> Result<(), AppError> {
    let game_id = create_game(&h).await?;
    let s1 = create_session(&h, game_id, 3, 1).await?;
    let s2 = create_session(&h, game_id, 3, 2).await?;
    let s3 = create_session(&h, game_id, 3, 3).await?;
    let alice = create_player(&h, "Alice").await?;
    let bob = create_player(&h, "Bob").await?;

    h.services.sessions.add_player(s1, alice).await?;
    h.services.sessions.add_player(s3, alice).await?;
    h.services.sessions.add_player(s2, bob).await?;

    let mine = h
        .services
        .sessions
        .list_sessions(game_id, None, None, Some(alice), page(10, 0))
        .await?;
    assert_eq!(mine.items.iter().map(|s| s.id).collect::<Vec<_>>(), vec![s1, s3]);
    assert!(mine.items.iter().all(|s| s.is_member(alice)));

    // combined with date and paging
    let combined = h
        .services
        .sessions
        .list_sessions(game_id, Some(in_days(3)), None, Some(alice), page(1, 0))
        .await?;
    assert_eq!(combined.total_count, 1);
    assert_eq!(combined.items[0].id, s3);

    let carol = create_player(&h, "Carol").await?;
    let nobody = h
        .services
        .sessions
        .list_sessions(game_id, None, None, Some(carol), page(10, 0))
        .await?;
    assert_eq!(nobody.total_count, 0);
    Ok(())
}

async fn sessions_scoped_to_their_game(h: Harness) -> Result<(), AppError> {
    let first = create_game(&h).await?;
    let second = create_game(&h).await?;
    create_session(&h, first, 2, 1).await?;
    create_session(&h, first, 2, 2).await?;
    let other = create_session(&h, second, 2, 1).await?;

    let found = h
        .services
        .sessions
        .list_sessions(second, None, None, None, page(10, 0))
        .await?;
    assert_eq!(found.total_count, 1);
    assert_eq!(found.items[0].id, other);
    assert_eq!(found.items[0].game_id, second);
    Ok(())
}

async fn unknown_game_or_player_is_not_found(h: Harness) -> Result<(), AppError> {
    let err = h
        .services
        .sessions
        .list_sessions(77, None, None, None, page(10, 0))
        .await
        .unwrap_err();
    assert_eq!(err, DomainError::game_not_found());

    let game_id = create_game(&h).await?;
    let err = h
        .services
        .sessions
        .list_sessions(game_id, None, None, Some(77), page(10, 0))
        .await
        .unwrap_err();
    assert_eq!(err, DomainError::player_not_found());
    Ok(())
}

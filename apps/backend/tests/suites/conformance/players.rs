use backend::domain::{Email, PageRequest, Player, PlayerFilter, PlayerName};
use backend::errors::domain::{ConflictKind, DomainError, NotFoundKind};
use backend::AppError;

use crate::support::backends::{both_backends, Harness};
use crate::support::fixtures::{create_game, create_player, create_session};

both_backends!(
    create_then_get_round_trips,
    email_is_unique_case_insensitively,
    token_resolves_to_its_player,
    unknown_token_is_unauthorized,
    update_renames_player,
    delete_drops_memberships,
    search_by_name,
    get_many_skips_unknown_ids,
);

fn name(s: &str) -> PlayerName {
    PlayerName::parse(s).unwrap()
}

fn email(s: &str) -> Email {
    Email::parse(s).unwrap()
}

async fn create_then_get_round_trips(h: Harness) -> Result<(), AppError> {
    let created = h
        .services
        .players
        .create_player(name("Ada"), email("ada@example.test"))
        .await?;
    let player = h.services.players.get_player(created.id).await?;
    assert_eq!(
        player,
        Player {
            id: created.id,
            name: name("Ada"),
            email: email("ada@example.test"),
        }
    );
    Ok(())
}

async fn email_is_unique_case_insensitively(h: Harness) -> Result<(), AppError> {
    h.services
        .players
        .create_player(name("Grace"), email("grace@example.test"))
        .await?;
    let err = h
        .services
        .players
        .create_player(name("Other"), email("GRACE@Example.test"))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        DomainError::conflict(ConflictKind::UniqueEmail, "Player email already exists")
    );
    Ok(())
}

async fn token_resolves_to_its_player(h: Harness) -> Result<(), AppError> {
    let first = h
        .services
        .players
        .create_player(name("Linus"), email("linus@example.test"))
        .await?;
    let second = h
        .services
        .players
        .create_player(name("Ken"), email("ken@example.test"))
        .await?;
    assert_ne!(first.token, second.token);

    assert_eq!(h.services.players.resolve_token(&first.token).await?.id, first.id);
    assert_eq!(h.services.players.resolve_token(&second.token).await?.id, second.id);
    Ok(())
}

async fn unknown_token_is_unauthorized(h: Harness) -> Result<(), AppError> {
    create_player(&h, "someone").await?;
    let err = h
        .services
        .players
        .resolve_token("not-a-real-token")
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Unauthorized(_)));
    Ok(())
}

async fn update_renames_player(h: Harness) -> Result<(), AppError> {
    let id = create_player(&h, "Barbara").await?;
    let updated = h.services.players.update_player(id, name("Barbara L")).await?;
    assert_eq!(updated.name, name("Barbara L"));
    assert_eq!(h.services.players.get_player(id).await?, updated);

    let err = h
        .services
        .players
        .update_player(999, name("Ghost"))
        .await
        .unwrap_err();
    assert_eq!(err, DomainError::player_not_found());
    Ok(())
}

async fn delete_drops_memberships(h: Harness) -> Result<(), AppError> {
    let game_id = create_game(&h).await?;
    let session_id = create_session(&h, game_id, 3, 1).await?;
    let leaving = create_player(&h, "Leaving").await?;
    let staying = create_player(&h, "Staying").await?;
    h.services.sessions.add_player(session_id, leaving).await?;
    h.services.sessions.add_player(session_id, staying).await?;

    h.services.players.delete_player(leaving).await?;

    let details = h.services.sessions.get_session(session_id).await?;
    assert_eq!(details.session.player_ids, vec![staying]);
    assert_eq!(
        h.services.players.get_player(leaving).await.unwrap_err(),
        DomainError::player_not_found()
    );

    let err = h.services.players.delete_player(leaving).await.unwrap_err();
    assert!(matches!(err, DomainError::NotFound(NotFoundKind::Player, _)));
    Ok(())
}

async fn search_by_name(h: Harness) -> Result<(), AppError> {
    for n in ["Alice", "alicia", "Bob", "Malice"] {
        create_player(&h, n).await?;
    }
    let filter = PlayerFilter {
        name: Some("ALIC".into()),
    };
    let page = h
        .services
        .players
        .list_players(&filter, PageRequest::default())
        .await?;
    let found: Vec<&str> = page.items.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(found, vec!["Alice", "alicia", "Malice"]);
    assert_eq!(page.total_count, 3);

    let all = h
        .services
        .players
        .list_players(&PlayerFilter::default(), PageRequest::new(2, 1).unwrap())
        .await?;
    let found: Vec<&str> = all.items.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(found, vec!["alicia", "Bob"]);
    assert_eq!(all.total_count, 4);

    let emile = create_player(&h, "Émile").await?;
    let accented = PlayerFilter {
        name: Some("éMI".into()),
    };
    let page = h
        .services
        .players
        .list_players(&accented, PageRequest::default())
        .await?;
    assert_eq!(page.items.iter().map(|p| p.id).collect::<Vec<_>>(), vec![emile]);

    h.services.players.update_player(emile, name("Ødegaard")).await?;
    let renamed = PlayerFilter {
        name: Some("øDE".into()),
    };
    let page = h
        .services
        .players
        .list_players(&renamed, PageRequest::default())
        .await?;
    assert_eq!(page.total_count, 1);
    assert_eq!(page.items[0].id, emile);
    Ok(())
}

async fn get_many_skips_unknown_ids(h: Harness) -> Result<(), AppError> {
    let a = create_player(&h, "First").await?;
    let b = create_player(&h, "Second").await?;
    let found = h.stores.players.get_many(&[b, 12345, a]).await?;
    let ids: Vec<i64> = found.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![a, b]);
    assert!(h.stores.players.get_many(&[]).await?.is_empty());
    Ok(())
}

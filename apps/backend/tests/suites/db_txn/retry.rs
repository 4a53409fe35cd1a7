use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use backend::adapters::games_sea;
use backend::db::{Isolation, MAX_SERIALIZATION_RETRIES};
use backend::errors::domain::{DomainError, InfraErrorKind};
use backend::AppError;

use super::execute::{fresh_txns, skyrim};

fn lost_race() -> DomainError {
    DomainError::infra(InfraErrorKind::SerializationFailure, "Concurrent update conflict")
}

#[tokio::test]
async fn serialization_failure_reruns_the_unit_of_work() -> Result<(), AppError> {
    let txns = fresh_txns().await?;
    let attempts = Arc::new(AtomicU32::new(0));
    let counter = attempts.clone();

    let id = txns
        .execute(Isolation::Serializable, move |txn| {
            let counter = counter.clone();
            Box::pin(async move {
                // every attempt writes, so a leaked write would break the unique name
                let id = games_sea::create_game(txn, skyrim()).await?;
                if counter.fetch_add(1, Ordering::SeqCst) < 2 {
                    return Err(lost_race());
                }
                Ok(id)
            })
        })
        .await?;

    assert_eq!(attempts.load(Ordering::SeqCst), 3);
    let (rows, total) =
        games_sea::search(txns.connection(), &Default::default(), 10, 0).await?;
    assert_eq!(total, 1);
    assert_eq!(rows[0].id, id);
    Ok(())
}

#[tokio::test]
async fn exhausted_retries_time_out() -> Result<(), AppError> {
    let txns = fresh_txns().await?;
    let attempts = Arc::new(AtomicU32::new(0));
    let counter = attempts.clone();

    let err = txns
        .execute(Isolation::Serializable, move |_txn| {
            let counter = counter.clone();
            Box::pin(async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Err::<(), _>(lost_race())
            })
        })
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::Infra(InfraErrorKind::Timeout, _)));
    assert_eq!(
        attempts.load(Ordering::SeqCst),
        MAX_SERIALIZATION_RETRIES + 1
    );
    Ok(())
}

#[tokio::test]
async fn other_errors_are_not_retried() -> Result<(), AppError> {
    let txns = fresh_txns().await?;
    let attempts = Arc::new(AtomicU32::new(0));
    let counter = attempts.clone();

    let err = txns
        .execute(Isolation::ReadCommitted, move |_txn| {
            let counter = counter.clone();
            Box::pin(async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Err::<(), _>(DomainError::game_not_found())
            })
        })
        .await
        .unwrap_err();

    assert_eq!(err, DomainError::game_not_found());
    assert_eq!(attempts.load(Ordering::SeqCst), 1);
    Ok(())
}

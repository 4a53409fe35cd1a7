//! SeaORM adapter for session membership edges.

use std::collections::HashMap;

use sea_orm::{ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder, Set};

use crate::entities::sessions_players;

pub async fn add_member<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    session_id: i64,
    player_id: i64,
) -> Result<(), DbErr> {
    let edge = sessions_players::ActiveModel {
        session_id: Set(session_id),
        player_id: Set(player_id),
    };
    sessions_players::Entity::insert(edge)
        .exec_without_returning(conn)
        .await?;
    Ok(())
}

/// Rows removed; 0 when the player was not a member.
pub async fn remove_member<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    session_id: i64,
    player_id: i64,
) -> Result<u64, DbErr> {
    let result = sessions_players::Entity::delete_many()
        .filter(sessions_players::Column::SessionId.eq(session_id))
        .filter(sessions_players::Column::PlayerId.eq(player_id))
        .exec(conn)
        .await?;
    Ok(result.rows_affected)
}

/// Drop every membership of `player_id`.
pub async fn remove_player_everywhere<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    player_id: i64,
) -> Result<u64, DbErr> {
    let result = sessions_players::Entity::delete_many()
        .filter(sessions_players::Column::PlayerId.eq(player_id))
        .exec(conn)
        .await?;
    Ok(result.rows_affected)
}

/// Member ids in ascending order.
pub async fn player_ids_for<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    session_id: i64,
) -> Result<Vec<i64>, DbErr> {
    let rows = sessions_players::Entity::find()
        .filter(sessions_players::Column::SessionId.eq(session_id))
        .order_by_asc(sessions_players::Column::PlayerId)
        .all(conn)
        .await?;
    Ok(rows.into_iter().map(|r| r.player_id).collect())
}

/// Member ids per session; sessions without members are absent.
pub async fn player_ids_for_many<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    session_ids: &[i64],
) -> Result<HashMap<i64, Vec<i64>>, DbErr> {
    let mut by_session: HashMap<i64, Vec<i64>> = HashMap::new();
    if session_ids.is_empty() {
        return Ok(by_session);
    }
    let rows = sessions_players::Entity::find()
        .filter(sessions_players::Column::SessionId.is_in(session_ids.to_vec()))
        .order_by_asc(sessions_players::Column::SessionId)
        .order_by_asc(sessions_players::Column::PlayerId)
        .all(conn)
        .await?;
    for row in rows {
        by_session.entry(row.session_id).or_default().push(row.player_id);
    }
    Ok(by_session)
}

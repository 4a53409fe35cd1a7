//! SeaORM adapter for sessions - generic over ConnectionTrait.

use sea_orm::sea_query::{Expr, Query};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DbErr, EntityTrait, NotSet,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};

use crate::entities::{sessions, sessions_players};

pub mod dto;

pub use dto::{SessionChanges, SessionCreate, SessionSearch};

pub async fn create_session<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: SessionCreate,
) -> Result<i64, DbErr> {
    let session = sessions::ActiveModel {
        id: NotSet,
        game_id: Set(dto.game_id),
        capacity: Set(dto.capacity),
        date: Set(dto.date),
    }
    .insert(conn)
    .await?;
    Ok(session.id)
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    session_id: i64,
) -> Result<Option<sessions::Model>, DbErr> {
    sessions::Entity::find_by_id(session_id).one(conn).await
}

fn search_condition(search: &SessionSearch) -> Condition {
    let mut cond = Condition::all().add(sessions::Column::GameId.eq(search.game_id));

    if let Some(date) = search.date {
        cond = cond.add(sessions::Column::Date.eq(date));
    }
    if let Some(t) = search.after {
        cond = cond.add(sessions::Column::Date.gt(t));
    }
    if let Some(t) = search.not_after {
        cond = cond.add(sessions::Column::Date.lte(t));
    }
    if let Some(player_id) = search.player_id {
        let joined = Query::select()
            .column(sessions_players::Column::SessionId)
            .from(sessions_players::Entity)
            .and_where(Expr::col(sessions_players::Column::PlayerId).eq(player_id))
            .to_owned();
        cond = cond.add(sessions::Column::Id.in_subquery(joined));
    }

    cond
}

/// One page of matching sessions in id order, plus the total match count.
pub async fn search<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    search: &SessionSearch,
    limit: u64,
    skip: u64,
) -> Result<(Vec<sessions::Model>, u64), DbErr> {
    let cond = search_condition(search);

    let total = sessions::Entity::find()
        .filter(cond.clone())
        .count(conn)
        .await?;

    let models = sessions::Entity::find()
        .filter(cond)
        .order_by_asc(sessions::Column::Id)
        .limit(limit)
        .offset(skip)
        .all(conn)
        .await?;

    Ok((models, total))
}

pub async fn count_for_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<u64, DbErr> {
    sessions::Entity::find()
        .filter(sessions::Column::GameId.eq(game_id))
        .count(conn)
        .await
}

pub async fn update_session<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    session_id: i64,
    changes: SessionChanges,
) -> Result<u64, DbErr> {
    if changes.capacity.is_none() && changes.date.is_none() {
        return Ok(0);
    }
    let mut update = sessions::Entity::update_many().filter(sessions::Column::Id.eq(session_id));
    if let Some(capacity) = changes.capacity {
        update = update.col_expr(sessions::Column::Capacity, Expr::value(capacity));
    }
    if let Some(date) = changes.date {
        update = update.col_expr(sessions::Column::Date, Expr::value(date));
    }
    Ok(update.exec(conn).await?.rows_affected)
}

/// Delete a session and its membership edges.
pub async fn delete_session<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    session_id: i64,
) -> Result<u64, DbErr> {
    sessions_players::Entity::delete_many()
        .filter(sessions_players::Column::SessionId.eq(session_id))
        .exec(conn)
        .await?;
    let result = sessions::Entity::delete_by_id(session_id).exec(conn).await?;
    Ok(result.rows_affected)
}

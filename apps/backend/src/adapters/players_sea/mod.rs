//! SeaORM adapter for players - generic over ConnectionTrait.

use sea_orm::sea_query::{Expr, LikeExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DbErr, EntityTrait, NotSet,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};

use crate::domain::search::fold_case;
use crate::entities::players;

pub mod dto;

pub use dto::PlayerCreate;

pub async fn create_player<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: PlayerCreate,
) -> Result<i64, DbErr> {
    let player = players::ActiveModel {
        id: NotSet,
        name_lc: Set(fold_case(&dto.name)),
        name: Set(dto.name),
        email: Set(dto.email),
        token_hash: Set(dto.token_hash),
    }
    .insert(conn)
    .await?;
    Ok(player.id)
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    player_id: i64,
) -> Result<Option<players::Model>, DbErr> {
    players::Entity::find_by_id(player_id).one(conn).await
}

/// Players among `ids`, in id order; unknown ids are skipped.
pub async fn find_many<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    ids: &[i64],
) -> Result<Vec<players::Model>, DbErr> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    players::Entity::find()
        .filter(players::Column::Id.is_in(ids.to_vec()))
        .order_by_asc(players::Column::Id)
        .all(conn)
        .await
}

pub async fn find_by_token_hash<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    token_hash: &str,
) -> Result<Option<players::Model>, DbErr> {
    players::Entity::find()
        .filter(players::Column::TokenHash.eq(token_hash))
        .one(conn)
        .await
}

pub async fn exists<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    player_id: i64,
) -> Result<bool, DbErr> {
    let count = players::Entity::find()
        .filter(players::Column::Id.eq(player_id))
        .count(conn)
        .await?;
    Ok(count > 0)
}

/// `name_pattern` is a case-folded, escaped `LIKE` pattern matched against
/// `name_lc`.
pub async fn search<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    name_pattern: Option<&str>,
    limit: u64,
    skip: u64,
) -> Result<(Vec<players::Model>, u64), DbErr> {
    let mut cond = Condition::all();
    if let Some(pattern) = name_pattern {
        cond = cond.add(
            Expr::col((players::Entity, players::Column::NameLc))
                .like(LikeExpr::new(pattern).escape('\\')),
        );
    }

    let total = players::Entity::find()
        .filter(cond.clone())
        .count(conn)
        .await?;

    let models = players::Entity::find()
        .filter(cond)
        .order_by_asc(players::Column::Id)
        .limit(limit)
        .offset(skip)
        .all(conn)
        .await?;

    Ok((models, total))
}

pub async fn update_name<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    player_id: i64,
    name: String,
) -> Result<u64, DbErr> {
    let result = players::Entity::update_many()
        .col_expr(players::Column::NameLc, Expr::value(fold_case(&name)))
        .col_expr(players::Column::Name, Expr::value(name))
        .filter(players::Column::Id.eq(player_id))
        .exec(conn)
        .await?;
    Ok(result.rows_affected)
}

pub async fn delete_player<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    player_id: i64,
) -> Result<u64, DbErr> {
    let result = players::Entity::delete_by_id(player_id).exec(conn).await?;
    Ok(result.rows_affected)
}

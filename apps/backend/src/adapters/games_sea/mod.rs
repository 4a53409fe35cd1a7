//! SeaORM adapter for games - generic over ConnectionTrait.

use std::collections::HashMap;

use sea_orm::sea_query::{Expr, Func, LikeExpr, Query};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DbErr, EntityTrait, NotSet,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};

use crate::domain::search::fold_case;
use crate::entities::{games, games_genres};

pub mod dto;

pub use dto::{GameChanges, GameCreate, GameRecord, GameSearch};

async fn insert_genres<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
    genres: Vec<String>,
) -> Result<(), DbErr> {
    if genres.is_empty() {
        return Ok(());
    }
    let rows = genres.into_iter().map(|genre| games_genres::ActiveModel {
        game_id: Set(game_id),
        genre: Set(genre),
    });
    games_genres::Entity::insert_many(rows)
        .exec_without_returning(conn)
        .await?;
    Ok(())
}

/// Genres for each of `game_ids`, sorted by name.
async fn load_genres<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_ids: &[i64],
) -> Result<HashMap<i64, Vec<String>>, DbErr> {
    let mut by_game: HashMap<i64, Vec<String>> = HashMap::new();
    if game_ids.is_empty() {
        return Ok(by_game);
    }
    let rows = games_genres::Entity::find()
        .filter(games_genres::Column::GameId.is_in(game_ids.to_vec()))
        .order_by_asc(games_genres::Column::GameId)
        .order_by_asc(games_genres::Column::Genre)
        .all(conn)
        .await?;
    for row in rows {
        by_game.entry(row.game_id).or_default().push(row.genre);
    }
    Ok(by_game)
}

async fn attach_genres<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    models: Vec<games::Model>,
) -> Result<Vec<GameRecord>, DbErr> {
    let ids: Vec<i64> = models.iter().map(|m| m.id).collect();
    let mut genres = load_genres(conn, &ids).await?;
    Ok(models
        .into_iter()
        .map(|m| GameRecord {
            genres: genres.remove(&m.id).unwrap_or_default(),
            id: m.id,
            name: m.name,
            developer: m.developer,
        })
        .collect())
}

pub async fn create_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: GameCreate,
) -> Result<i64, DbErr> {
    let game = games::ActiveModel {
        id: NotSet,
        name_lc: Set(fold_case(&dto.name)),
        name: Set(dto.name),
        developer: Set(dto.developer),
    }
    .insert(conn)
    .await?;

    insert_genres(conn, game.id, dto.genres).await?;
    Ok(game.id)
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<Option<GameRecord>, DbErr> {
    let Some(model) = games::Entity::find_by_id(game_id).one(conn).await? else {
        return Ok(None);
    };
    Ok(attach_genres(conn, vec![model]).await?.pop())
}

pub async fn exists<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<bool, DbErr> {
    let count = games::Entity::find()
        .filter(games::Column::Id.eq(game_id))
        .count(conn)
        .await?;
    Ok(count > 0)
}

fn search_condition(search: &GameSearch) -> Condition {
    let mut cond = Condition::all();

    if let Some(developer) = &search.developer {
        cond = cond.add(games::Column::Developer.eq(developer.as_str()));
    }

    if let Some(pattern) = &search.name_pattern {
        cond = cond.add(
            Expr::col((games::Entity, games::Column::NameLc))
                .like(LikeExpr::new(pattern.as_str()).escape('\\')),
        );
    }

    if !search.genres.is_empty() {
        // superset: the game carries every requested genre
        let wanted = search.genres.len() as i64;
        let with_all = Query::select()
            .column(games_genres::Column::GameId)
            .from(games_genres::Entity)
            .and_where(games_genres::Column::Genre.is_in(search.genres.clone()))
            .group_by_col(games_genres::Column::GameId)
            .and_having(
                Expr::expr(Func::count_distinct(Expr::col(games_genres::Column::Genre)))
                    .eq(wanted),
            )
            .to_owned();
        cond = cond.add(games::Column::Id.in_subquery(with_all));
    }

    cond
}

/// One page of matching games in id order, plus the total match count.
pub async fn search<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    search: &GameSearch,
    limit: u64,
    skip: u64,
) -> Result<(Vec<GameRecord>, u64), DbErr> {
    let cond = search_condition(search);

    let total = games::Entity::find()
        .filter(cond.clone())
        .count(conn)
        .await?;

    let models = games::Entity::find()
        .filter(cond)
        .order_by_asc(games::Column::Id)
        .limit(limit)
        .offset(skip)
        .all(conn)
        .await?;

    Ok((attach_genres(conn, models).await?, total))
}

/// Apply `changes`; `false` when the game does not exist.
pub async fn update_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
    changes: GameChanges,
) -> Result<bool, DbErr> {
    if !exists(conn, game_id).await? {
        return Ok(false);
    }

    if changes.name.is_some() || changes.developer.is_some() {
        let mut update = games::Entity::update_many().filter(games::Column::Id.eq(game_id));
        if let Some(name) = changes.name {
            update = update
                .col_expr(games::Column::NameLc, Expr::value(fold_case(&name)))
                .col_expr(games::Column::Name, Expr::value(name));
        }
        if let Some(developer) = changes.developer {
            update = update.col_expr(games::Column::Developer, Expr::value(developer));
        }
        update.exec(conn).await?;
    }

    if let Some(genres) = changes.genres {
        games_genres::Entity::delete_many()
            .filter(games_genres::Column::GameId.eq(game_id))
            .exec(conn)
            .await?;
        insert_genres(conn, game_id, genres).await?;
    }

    Ok(true)
}

/// Delete a game and its genre rows; returns rows removed from `games`.
pub async fn delete_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<u64, DbErr> {
    games_genres::Entity::delete_many()
        .filter(games_genres::Column::GameId.eq(game_id))
        .exec(conn)
        .await?;
    let result = games::Entity::delete_by_id(game_id).exec(conn).await?;
    Ok(result.rows_affected)
}

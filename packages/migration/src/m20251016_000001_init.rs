use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_query::{ColumnDef, ForeignKeyAction, Index, Table};

#[derive(DeriveMigrationName)]
pub struct Migration;

// ----- Iden enums for tables & columns -----
#[derive(DeriveIden)]
enum Games {
    Table,
    Id,
    Name,
    NameLc,
    Developer,
}

#[derive(DeriveIden)]
enum GamesGenres {
    Table,
    GameId,
    Genre,
}

#[derive(DeriveIden)]
enum Players {
    Table,
    Id,
    Name,
    NameLc,
    Email,
    TokenHash,
}

#[derive(DeriveIden)]
enum Sessions {
    Table,
    Id,
    GameId,
    Capacity,
    Date,
}

#[derive(DeriveIden)]
enum SessionsPlayers {
    Table,
    SessionId,
    PlayerId,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // games
        manager
            .create_table(
                Table::create()
                    .table(Games::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Games::Id)
                            .big_integer()
                            .not_null()
                            .primary_key()
                            .auto_increment(),
                    )
                    .col(ColumnDef::new(Games::Name).string_len(60).not_null())
                    // Unicode-lowercased name; substring filters match against it
                    .col(ColumnDef::new(Games::NameLc).text().not_null())
                    .col(ColumnDef::new(Games::Developer).string_len(60).not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("games_name_key")
                    .table(Games::Table)
                    .col(Games::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ix_games_developer")
                    .table(Games::Table)
                    .col(Games::Developer)
                    .to_owned(),
            )
            .await?;

        // games_genres: one row per (game, genre); replaces an ARRAY column so
        // the superset query runs on both Postgres and SQLite
        manager
            .create_table(
                Table::create()
                    .table(GamesGenres::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(GamesGenres::GameId).big_integer().not_null())
                    .col(ColumnDef::new(GamesGenres::Genre).string_len(40).not_null())
                    .primary_key(
                        Index::create()
                            .name("games_genres_pkey")
                            .col(GamesGenres::GameId)
                            .col(GamesGenres::Genre),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_games_genres_game_id")
                            .from(GamesGenres::Table, GamesGenres::GameId)
                            .to(Games::Table, Games::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ix_games_genres_genre")
                    .table(GamesGenres::Table)
                    .col(GamesGenres::Genre)
                    .to_owned(),
            )
            .await?;

        // players
        manager
            .create_table(
                Table::create()
                    .table(Players::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Players::Id)
                            .big_integer()
                            .not_null()
                            .primary_key()
                            .auto_increment(),
                    )
                    .col(ColumnDef::new(Players::Name).string_len(60).not_null())
                    .col(ColumnDef::new(Players::NameLc).text().not_null())
                    .col(ColumnDef::new(Players::Email).string_len(254).not_null())
                    .col(ColumnDef::new(Players::TokenHash).string_len(64).not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("players_email_key")
                    .table(Players::Table)
                    .col(Players::Email)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("players_token_hash_key")
                    .table(Players::Table)
                    .col(Players::TokenHash)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // sessions
        manager
            .create_table(
                Table::create()
                    .table(Sessions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Sessions::Id)
                            .big_integer()
                            .not_null()
                            .primary_key()
                            .auto_increment(),
                    )
                    .col(ColumnDef::new(Sessions::GameId).big_integer().not_null())
                    .col(ColumnDef::new(Sessions::Capacity).integer().not_null())
                    .col(
                        ColumnDef::new(Sessions::Date)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_sessions_game_id")
                            .from(Sessions::Table, Sessions::GameId)
                            .to(Games::Table, Games::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ix_sessions_game_id")
                    .table(Sessions::Table)
                    .col(Sessions::GameId)
                    .to_owned(),
            )
            .await?;

        // sessions_players: membership edges
        manager
            .create_table(
                Table::create()
                    .table(SessionsPlayers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SessionsPlayers::SessionId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SessionsPlayers::PlayerId)
                            .big_integer()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .name("sessions_players_pkey")
                            .col(SessionsPlayers::SessionId)
                            .col(SessionsPlayers::PlayerId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_sessions_players_session_id")
                            .from(SessionsPlayers::Table, SessionsPlayers::SessionId)
                            .to(Sessions::Table, Sessions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_sessions_players_player_id")
                            .from(SessionsPlayers::Table, SessionsPlayers::PlayerId)
                            .to(Players::Table, Players::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ix_sessions_players_player_id")
                    .table(SessionsPlayers::Table)
                    .col(SessionsPlayers::PlayerId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // drop in reverse order + drop index before table
        manager
            .drop_index(
                Index::drop()
                    .name("ix_sessions_players_player_id")
                    .table(SessionsPlayers::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().table(SessionsPlayers::Table).to_owned())
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("ix_sessions_game_id")
                    .table(Sessions::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().table(Sessions::Table).to_owned())
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("players_token_hash_key")
                    .table(Players::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("players_email_key")
                    .table(Players::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().table(Players::Table).to_owned())
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("ix_games_genres_genre")
                    .table(GamesGenres::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().table(GamesGenres::Table).to_owned())
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("ix_games_developer")
                    .table(Games::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("games_name_key")
                    .table(Games::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().table(Games::Table).to_owned())
            .await?;

        Ok(())
    }
}

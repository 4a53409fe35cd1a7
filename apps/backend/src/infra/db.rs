use db_infra::db::{DbKind, RuntimeEnv};
use migration::MigrationCommand;
use sea_orm::DatabaseConnection;
use tracing::info;

use crate::error::AppError;

/// Connect and bring the schema up to date. Single entrypoint for the
/// relational backend.
pub async fn bootstrap_db(env: RuntimeEnv, db_kind: DbKind) -> Result<DatabaseConnection, AppError> {
    let conn = db_infra::connect(env, db_kind).await?;
    db_infra::run_migration(&conn, MigrationCommand::Up).await?;
    info!(env = ?env, db_kind = ?db_kind, "database ready");
    Ok(conn)
}

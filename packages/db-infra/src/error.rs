use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbInfraError {
    #[error("Configuration error: {message}")]
    Config { message: String },
    #[error("Connection error: {message}")]
    Connect {
        message: String,
        #[source]
        source: sqlx::Error,
    },
    #[error("Migration error: {message}")]
    Migration {
        message: String,
        #[source]
        source: sea_orm::DbErr,
    },
}

impl DbInfraError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}

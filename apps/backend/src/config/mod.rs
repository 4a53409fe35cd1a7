//! Process configuration read from the environment.

use std::env;
use std::str::FromStr;

use db_infra::db::{DbKind, RuntimeEnv};

use crate::error::AppError;

/// Which engine backs the stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Memory,
    Database(DbKind),
}

impl FromStr for StoreBackend {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" | "mem" => Ok(StoreBackend::Memory),
            other => other
                .parse::<DbKind>()
                .map(StoreBackend::Database)
                .map_err(|_| {
                    AppError::config(format!(
                        "unknown store '{other}' (expected memory | postgres | sqlite-file | sqlite-memory)"
                    ))
                }),
        }
    }
}

fn parse_env(raw: &str) -> Result<RuntimeEnv, AppError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "prod" | "production" => Ok(RuntimeEnv::Prod),
        "test" => Ok(RuntimeEnv::Test),
        other => Err(AppError::config(format!(
            "unknown APP_ENV '{other}' (expected prod | test)"
        ))),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppConfig {
    pub env: RuntimeEnv,
    pub store: StoreBackend,
}

impl AppConfig {
    /// `APP_ENV` (default `prod`) and `SESSIONS_STORE` (default `memory`).
    pub fn from_env() -> Result<Self, AppError> {
        let env = match env::var("APP_ENV") {
            Ok(raw) => parse_env(&raw)?,
            Err(_) => RuntimeEnv::Prod,
        };
        let store = match env::var("SESSIONS_STORE") {
            Ok(raw) => raw.parse()?,
            Err(_) => StoreBackend::Memory,
        };
        Ok(Self { env, store })
    }
}

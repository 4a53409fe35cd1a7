use actix_web::error::ResponseError;
use actix_web::http::header::{RETRY_AFTER, WWW_AUTHENTICATE};
use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use db_infra::DbInfraError;
use sea_orm::DbErr;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use crate::errors::domain::{
    BadRequestKind, ConflictKind, DomainError, InfraErrorKind, NotFoundKind, ValidationKind,
};
use crate::errors::ErrorCode;

/// RFC 7807 body rendered for every error response.
#[derive(Debug, Serialize)]
pub struct ProblemDetails {
    #[serde(rename = "type")]
    pub type_: String,
    pub title: String,
    pub status: u16,
    pub detail: String,
    pub code: String,
}

/// Boundary error: what a caller of the core sees once a `DomainError`
/// leaves the service layer.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {detail}")]
    Validation { code: ErrorCode, detail: String },
    #[error("Bad request: {detail}")]
    BadRequest { code: ErrorCode, detail: String },
    #[error("Unauthorized: {detail}")]
    Unauthorized { detail: String },
    #[error("Not found: {detail}")]
    NotFound { code: ErrorCode, detail: String },
    #[error("Conflict: {detail}")]
    Conflict { code: ErrorCode, detail: String },
    #[error("Database unavailable: {detail}")]
    DbUnavailable { detail: String },
    #[error("Timeout: {detail}")]
    Timeout { detail: String },
    #[error("Internal error: {detail}")]
    Internal { code: ErrorCode, detail: String },
    #[error("Configuration error: {detail}")]
    Config { detail: String },
}

impl AppError {
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::Validation { code, .. }
            | AppError::BadRequest { code, .. }
            | AppError::NotFound { code, .. }
            | AppError::Conflict { code, .. }
            | AppError::Internal { code, .. } => *code,
            AppError::Unauthorized { .. } => ErrorCode::Unauthorized,
            AppError::DbUnavailable { .. } => ErrorCode::DbUnavailable,
            AppError::Timeout { .. } => ErrorCode::DbTimeout,
            AppError::Config { .. } => ErrorCode::ConfigError,
        }
    }

    pub fn detail(&self) -> &str {
        match self {
            AppError::Validation { detail, .. }
            | AppError::BadRequest { detail, .. }
            | AppError::Unauthorized { detail }
            | AppError::NotFound { detail, .. }
            | AppError::Conflict { detail, .. }
            | AppError::DbUnavailable { detail }
            | AppError::Timeout { detail }
            | AppError::Internal { detail, .. }
            | AppError::Config { detail } => detail,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } | AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Conflict { .. } => StatusCode::CONFLICT,
            AppError::DbUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            AppError::Internal { .. } | AppError::Config { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn config(detail: impl Into<String>) -> Self {
        Self::Config {
            detail: detail.into(),
        }
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        Self::Internal {
            code: ErrorCode::InternalError,
            detail: detail.into(),
        }
    }

    fn humanize_code(code: &str) -> String {
        code.split('_')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    None => String::new(),
                    Some(first) => first
                        .to_uppercase()
                        .chain(chars.flat_map(char::to_lowercase))
                        .collect(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn validation_code(kind: &ValidationKind) -> ErrorCode {
    match kind {
        ValidationKind::InvalidName => ErrorCode::InvalidName,
        ValidationKind::InvalidEmail => ErrorCode::InvalidEmail,
        ValidationKind::InvalidGenre => ErrorCode::InvalidGenre,
        ValidationKind::EmptyGenres => ErrorCode::EmptyGenres,
        ValidationKind::InvalidCapacity => ErrorCode::InvalidCapacity,
        ValidationKind::InvalidDate => ErrorCode::InvalidDate,
        ValidationKind::InvalidPage => ErrorCode::InvalidPage,
        ValidationKind::EmptyUpdate => ErrorCode::EmptyUpdate,
        _ => ErrorCode::ValidationError,
    }
}

fn bad_request_code(kind: &BadRequestKind) -> ErrorCode {
    match kind {
        BadRequestKind::SessionFull => ErrorCode::SessionFull,
        BadRequestKind::SessionClosed => ErrorCode::SessionClosed,
        BadRequestKind::CapacityBelowMembers => ErrorCode::CapacityBelowMembers,
        _ => ErrorCode::BadRequest,
    }
}

fn not_found_code(kind: &NotFoundKind) -> ErrorCode {
    match kind {
        NotFoundKind::Game => ErrorCode::GameNotFound,
        NotFoundKind::Player => ErrorCode::PlayerNotFound,
        NotFoundKind::Session => ErrorCode::SessionNotFound,
        NotFoundKind::Membership => ErrorCode::MembershipNotFound,
        _ => ErrorCode::NotFound,
    }
}

fn conflict_code(kind: &ConflictKind) -> ErrorCode {
    match kind {
        ConflictKind::UniqueEmail => ErrorCode::UniqueEmail,
        ConflictKind::GameNameTaken => ErrorCode::GameNameTaken,
        ConflictKind::PlayerAlreadyInSession => ErrorCode::PlayerAlreadyInSession,
        ConflictKind::GameInUse => ErrorCode::GameInUse,
        _ => ErrorCode::Conflict,
    }
}

impl From<DomainError> for AppError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::Validation(kind, detail) => AppError::Validation {
                code: validation_code(&kind),
                detail,
            },
            DomainError::BadRequest(kind, detail) => AppError::BadRequest {
                code: bad_request_code(&kind),
                detail,
            },
            DomainError::Unauthorized(detail) => AppError::Unauthorized { detail },
            DomainError::NotFound(kind, detail) => AppError::NotFound {
                code: not_found_code(&kind),
                detail,
            },
            DomainError::Conflict(kind, detail) => AppError::Conflict {
                code: conflict_code(&kind),
                detail,
            },
            DomainError::Infra(kind, detail) => {
                error!(kind = ?kind, detail = %detail, "unexpected infrastructure failure");
                match kind {
                    InfraErrorKind::DbUnavailable => AppError::DbUnavailable { detail },
                    InfraErrorKind::Timeout => AppError::Timeout { detail },
                    InfraErrorKind::DataCorruption => AppError::Internal {
                        code: ErrorCode::DataCorruption,
                        detail,
                    },
                    _ => AppError::Internal {
                        code: ErrorCode::InternalError,
                        detail,
                    },
                }
            }
        }
    }
}

impl From<DbErr> for AppError {
    fn from(e: DbErr) -> Self {
        DomainError::from(e).into()
    }
}

impl From<DbInfraError> for AppError {
    fn from(e: DbInfraError) -> Self {
        match e {
            DbInfraError::Config { message } => AppError::Config { detail: message },
            DbInfraError::Connect { message, source } => {
                error!(error = %source, "database connection failed");
                AppError::DbUnavailable { detail: message }
            }
            DbInfraError::Migration { message, source } => {
                error!(error = %source, "database migration failed");
                AppError::internal(message)
            }
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        self.status()
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status();
        let code = self.code().as_str();

        let problem_details = ProblemDetails {
            type_: format!("/errors/{code}"),
            title: Self::humanize_code(code),
            status: status.as_u16(),
            detail: self.detail().to_string(),
            code: code.to_string(),
        };

        let mut builder = HttpResponse::build(status);
        builder.content_type("application/problem+json");
        match status {
            StatusCode::UNAUTHORIZED => {
                builder.insert_header((WWW_AUTHENTICATE, "Bearer"));
            }
            StatusCode::SERVICE_UNAVAILABLE => {
                builder.insert_header((RETRY_AFTER, "1"));
            }
            _ => {}
        }
        builder.json(problem_details)
    }
}

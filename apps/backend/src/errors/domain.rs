//! Domain-level error type used across services and stores.
//!
//! This error type is HTTP- and DB-agnostic. Boundary code converts it into
//! `crate::error::AppError` through the provided `From` implementation.

use std::error::Error;
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Malformed primitive input, rejected before anything touches storage.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ValidationKind {
    InvalidName,
    InvalidEmail,
    InvalidGenre,
    EmptyGenres,
    InvalidCapacity,
    InvalidDate,
    InvalidPage,
    EmptyUpdate,
    Other(String),
}

/// Business-rule violations on otherwise valid input.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum BadRequestKind {
    SessionFull,
    SessionClosed,
    CapacityBelowMembers,
    Other(String),
}

/// Infra error kinds to distinguish operational failures
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum InfraErrorKind {
    Timeout,
    DbUnavailable,
    SerializationFailure,
    DataCorruption,
    Other(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum NotFoundKind {
    Game,
    Player,
    Session,
    /// The player exists but is not registered in the session.
    Membership,
    Other(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConflictKind {
    UniqueEmail,
    GameNameTaken,
    PlayerAlreadyInSession,
    /// A game cannot be deleted while a session references it.
    GameInUse,
    Other(String),
}

/// Central domain error type
#[derive(Debug, Clone, PartialEq)]
pub enum DomainError {
    Validation(ValidationKind, String),
    BadRequest(BadRequestKind, String),
    Conflict(ConflictKind, String),
    NotFound(NotFoundKind, String),
    /// Unknown or revoked credential
    Unauthorized(String),
    /// Infrastructure/operational failures; the only kind logged as unexpected
    Infra(InfraErrorKind, String),
}

impl Display for DomainError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            DomainError::Validation(kind, d) => write!(f, "validation error {kind:?}: {d}"),
            DomainError::BadRequest(kind, d) => write!(f, "bad request {kind:?}: {d}"),
            DomainError::Conflict(kind, d) => write!(f, "conflict {kind:?}: {d}"),
            DomainError::NotFound(kind, d) => write!(f, "not found {kind:?}: {d}"),
            DomainError::Unauthorized(d) => write!(f, "unauthorized: {d}"),
            DomainError::Infra(kind, d) => write!(f, "infra {kind:?}: {d}"),
        }
    }
}

impl Error for DomainError {}

impl DomainError {
    pub fn validation(kind: ValidationKind, detail: impl Into<String>) -> Self {
        Self::Validation(kind, detail.into())
    }
    pub fn bad_request(kind: BadRequestKind, detail: impl Into<String>) -> Self {
        Self::BadRequest(kind, detail.into())
    }
    pub fn conflict(kind: ConflictKind, detail: impl Into<String>) -> Self {
        Self::Conflict(kind, detail.into())
    }
    pub fn not_found(kind: NotFoundKind, detail: impl Into<String>) -> Self {
        Self::NotFound(kind, detail.into())
    }
    pub fn unauthorized(detail: impl Into<String>) -> Self {
        Self::Unauthorized(detail.into())
    }
    pub fn infra(kind: InfraErrorKind, detail: impl Into<String>) -> Self {
        Self::Infra(kind, detail.into())
    }

    pub fn game_not_found() -> Self {
        Self::not_found(NotFoundKind::Game, "Game not found")
    }
    pub fn player_not_found() -> Self {
        Self::not_found(NotFoundKind::Player, "Player not found")
    }
    pub fn session_not_found() -> Self {
        Self::not_found(NotFoundKind::Session, "Session not found")
    }

    /// Human-readable cause, without the kind prefix.
    pub fn detail(&self) -> &str {
        match self {
            DomainError::Validation(_, d)
            | DomainError::BadRequest(_, d)
            | DomainError::Conflict(_, d)
            | DomainError::NotFound(_, d)
            | DomainError::Unauthorized(d)
            | DomainError::Infra(_, d) => d,
        }
    }

    /// True for failures a retry of the whole transaction may resolve.
    pub fn is_serialization_failure(&self) -> bool {
        matches!(
            self,
            DomainError::Infra(InfraErrorKind::SerializationFailure, _)
        )
    }
}

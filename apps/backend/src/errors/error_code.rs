//! Error codes for the sessions backend.
//!
//! Add new codes here; never pass ad-hoc strings as error codes.
//! All codes are SCREAMING_SNAKE_CASE and map 1:1 to the strings that
//! appear in problem-details bodies.

use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Authentication
    Unauthorized,

    // Request validation
    InvalidName,
    InvalidEmail,
    InvalidGenre,
    EmptyGenres,
    InvalidCapacity,
    InvalidDate,
    InvalidPage,
    EmptyUpdate,
    ValidationError,

    // Business rules
    SessionFull,
    SessionClosed,
    CapacityBelowMembers,
    BadRequest,

    // Resource not found
    GameNotFound,
    PlayerNotFound,
    SessionNotFound,
    MembershipNotFound,
    NotFound,

    // Conflicts
    UniqueEmail,
    GameNameTaken,
    PlayerAlreadyInSession,
    GameInUse,
    Conflict,

    // System errors
    DbUnavailable,
    DbTimeout,
    DataCorruption,
    ConfigError,
    InternalError,
}

impl ErrorCode {
    /// The exact string that appears in responses.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Unauthorized => "UNAUTHORIZED",

            Self::InvalidName => "INVALID_NAME",
            Self::InvalidEmail => "INVALID_EMAIL",
            Self::InvalidGenre => "INVALID_GENRE",
            Self::EmptyGenres => "EMPTY_GENRES",
            Self::InvalidCapacity => "INVALID_CAPACITY",
            Self::InvalidDate => "INVALID_DATE",
            Self::InvalidPage => "INVALID_PAGE",
            Self::EmptyUpdate => "EMPTY_UPDATE",
            Self::ValidationError => "VALIDATION_ERROR",

            Self::SessionFull => "SESSION_FULL",
            Self::SessionClosed => "SESSION_CLOSED",
            Self::CapacityBelowMembers => "CAPACITY_BELOW_MEMBERS",
            Self::BadRequest => "BAD_REQUEST",

            Self::GameNotFound => "GAME_NOT_FOUND",
            Self::PlayerNotFound => "PLAYER_NOT_FOUND",
            Self::SessionNotFound => "SESSION_NOT_FOUND",
            Self::MembershipNotFound => "MEMBERSHIP_NOT_FOUND",
            Self::NotFound => "NOT_FOUND",

            Self::UniqueEmail => "UNIQUE_EMAIL",
            Self::GameNameTaken => "GAME_NAME_TAKEN",
            Self::PlayerAlreadyInSession => "PLAYER_ALREADY_IN_SESSION",
            Self::GameInUse => "GAME_IN_USE",
            Self::Conflict => "CONFLICT",

            Self::DbUnavailable => "DB_UNAVAILABLE",
            Self::DbTimeout => "DB_TIMEOUT",
            Self::DataCorruption => "DATA_CORRUPTION",
            Self::ConfigError => "CONFIG_ERROR",
            Self::InternalError => "INTERNAL_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

//! # DomainError
//!
//! Centralized error handling for the feedback board. Maps domain failures
//! to the taxonomy the API adapter translates into HTTP statuses.

use thiserror::Error;

/// The primary error type for all domain operations.
///
/// Display strings are the wire messages; the API adapter wraps them in a
/// `{"error": "..."}` body without rephrasing.
#[derive(Error, Debug)]
pub enum DomainError {
    /// Referenced entity absent (e.g. feedback item, comment, user)
    #[error("{0} not found")]
    NotFound(String),

    /// Missing or invalid required fields
    #[error("{0}")]
    Validation(String),

    /// Missing or non-matching bearer token
    #[error("{0}")]
    Unauthorized(String),

    /// Unknown email or wrong password at login; the two cases surface
    /// distinct messages, matching the source behavior
    #[error("{0}")]
    InvalidCredentials(String),

    /// Email collision at registration
    #[error("{0}")]
    DuplicateAccount(String),

    /// Request body not parseable as JSON
    #[error("{0}")]
    Malformed(String),

    /// Persistence layer unavailable or a stored document failed to decode
    #[error("storage failure: {0}")]
    Storage(String),
}

/// A specialized Result type for feedback-board logic.
pub type DomainResult<T> = std::result::Result<T, DomainError>;

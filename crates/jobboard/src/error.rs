//! Error types for jobboard.
//!
//! Every failure the query core can produce is a plain return value with a
//! named variant; nothing in this crate panics on bad input or unwinds for
//! control flow. The orchestration layer owns the mapping onto transport
//! responses, but [`BoardError::status_code`] records the intended codes so
//! the mapping lives in one place.

use crate::validate::{ValidationCode, ValidationErrors};
use thiserror::Error;

/// Result type alias for jobboard operations.
pub type BoardResult<T> = Result<T, BoardError>;

/// Error taxonomy shared by the query core and its callers.
#[derive(Debug, Error)]
pub enum BoardError {
    /// A partial update arrived with no fields to set.
    #[error("no data: update payload is empty")]
    EmptyPayload,

    /// A field name was supplied that the entity's allow-list does not permit.
    #[error("field '{field}' is not an updatable or filterable column")]
    ColumnNotAllowed { field: String },

    /// Structured schema violations collected by a typed validator.
    #[error("validation failed: {0}")]
    Validation(ValidationErrors),

    /// Actor lacks the required role. Produced by the auth layer, never by
    /// the query core; carried here so the taxonomy is complete.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// A lookup by identifier matched no row.
    #[error("not found: {0}")]
    NotFound(String),

    /// Duplicate natural key. The authoritative source is a storage-level
    /// uniqueness violation (see [`BoardError::from_db_error`]); an advisory
    /// read-then-insert pre-check is racy and must not be relied on.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Placeholder/parameter bookkeeping broke inside the assembler. This is
    /// a programming defect in a caller, not bad user input.
    #[error("query contract violated: {0}")]
    Contract(String),

    /// Query execution error from the store.
    #[error("query error: {0}")]
    Query(#[from] tokio_postgres::Error),

    /// Any other unexpected failure.
    #[error("{0}")]
    Internal(String),
}

impl BoardError {
    /// Create a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Create a conflict error.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    /// Create a contract error.
    pub fn contract(message: impl Into<String>) -> Self {
        Self::Contract(message.into())
    }

    /// Check if this is a not-found error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Check if this is a conflict error.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict(_))
    }

    /// HTTP status code the orchestration layer maps this error onto.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::EmptyPayload | Self::ColumnNotAllowed { .. } | Self::Validation(_) => 400,
            Self::Conflict(_) => 400,
            Self::Unauthorized(_) => 401,
            Self::NotFound(_) => 404,
            Self::Contract(_) | Self::Query(_) | Self::Internal(_) => 500,
        }
    }

    /// Parse a tokio_postgres error into a more specific BoardError.
    ///
    /// SQLSTATE 23505 (unique violation) becomes [`BoardError::Conflict`]:
    /// the uniqueness constraint, not the advisory pre-check, is the
    /// enforcement point for duplicate natural keys. 23503 (foreign key
    /// violation) is user-caused — a bad `companyHandle` on create — and
    /// becomes a [`BoardError::Validation`], not a 500-class failure.
    pub fn from_db_error(err: tokio_postgres::Error) -> Self {
        if let Some(db_err) = err.as_db_error()
            && let Some(mapped) = Self::classify_sqlstate(
                db_err.code().code(),
                db_err.constraint().unwrap_or("unknown"),
                db_err.message(),
            )
        {
            return mapped;
        }
        Self::Query(err)
    }

    /// SQLSTATE classification, split from [`from_db_error`] because
    /// `tokio_postgres::Error` cannot be constructed without a connection.
    ///
    /// [`from_db_error`]: Self::from_db_error
    fn classify_sqlstate(code: &str, constraint: &str, message: &str) -> Option<Self> {
        match code {
            "23505" => Some(Self::Conflict(format!("{constraint}: {message}"))),
            "23503" => {
                let mut errs = ValidationErrors::new();
                errs.add(
                    constraint,
                    ValidationCode::Custom("foreign_key".into()),
                    message,
                );
                Some(Self::Validation(errs))
            }
            _ => None,
        }
    }
}

impl From<ValidationErrors> for BoardError {
    fn from(errs: ValidationErrors) -> Self {
        Self::Validation(errs)
    }
}

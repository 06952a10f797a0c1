//! # Order Error Type
//!
//! What callers of `OrderService::place_order` see.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Figures Store                      │
//! │                                                                         │
//! │  ValidationError ──┐                                                    │
//! │  CoreError ────────┼──► OrderError ──► code()  ──► UNKNOWN_KIND         │
//! │  DbError ──► CoreError::Storage ──┘              VALIDATION_ERROR     │
//! │                                                  INSUFFICIENT_STOCK   │
//! │                                                  PERSISTENCE_ERROR    │
//! │                                                  INTERNAL             │
//! │                                                                         │
//! │  Serialized for adapters as:                                            │
//! │  { "code": "INSUFFICIENT_STOCK",                                        │
//! │    "message": "Insufficient stock for Square: available 3, ..." }      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Serialize, Serializer};
use thiserror::Error;

use crate::config::ConfigError;
use figures_core::{CoreError, FigureKind, ValidationError};

/// Errors returned by the order workflow.
#[derive(Debug, Error)]
pub enum OrderError {
    /// A cart line failed validation (unknown kind, bad geometry, bad count).
    ///
    /// `line` is the zero-based index of the offending cart position.
    #[error("Line {line} rejected: {source}")]
    Rejected {
        line: usize,
        #[source]
        source: CoreError,
    },

    /// The cart as a whole is unacceptable (empty, too many lines).
    #[error("Cart rejected: {0}")]
    InvalidCart(#[from] ValidationError),

    /// Not enough stock; nothing was reserved.
    #[error("Insufficient stock for {kind}: available {available}, requested {requested}")]
    InsufficientStock {
        kind: FigureKind,
        available: u32,
        requested: u32,
    },

    /// A store failed; any reservation was released before returning.
    #[error("Persistence failed: {0}")]
    Persistence(String),

    /// A bug or an unrecoverable state (leaked reservation, broken invariant).
    #[error("Internal error: {0}")]
    Internal(String),

    /// Bootstrap failure.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Machine-readable error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// The cart names a kind no constructor is registered for (400)
    UnknownKind,

    /// Input validation failed (400)
    ValidationError,

    /// Not enough stock (409)
    InsufficientStock,

    /// A store failed (503)
    PersistenceError,

    /// Internal error (500)
    Internal,
}

impl OrderError {
    /// The stable code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            OrderError::Rejected {
                source: CoreError::UnknownKind(_),
                ..
            } => ErrorCode::UnknownKind,
            OrderError::Rejected { .. } | OrderError::InvalidCart(_) => ErrorCode::ValidationError,
            OrderError::InsufficientStock { .. } => ErrorCode::InsufficientStock,
            OrderError::Persistence(_) => ErrorCode::PersistenceError,
            OrderError::Internal(_) | OrderError::Config(_) => ErrorCode::Internal,
        }
    }

    /// Maps a store failure raised while reserving or releasing.
    pub(crate) fn from_store(err: CoreError) -> Self {
        match err {
            CoreError::InsufficientStock {
                kind,
                available,
                requested,
            } => OrderError::InsufficientStock {
                kind,
                available,
                requested,
            },
            CoreError::Storage(msg) => OrderError::Persistence(msg),
            other => OrderError::Internal(other.to_string()),
        }
    }
}

/// Wire shape of an error: `{ "code": ..., "message": ... }`.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

impl From<&OrderError> for ErrorBody {
    fn from(err: &OrderError) -> Self {
        ErrorBody {
            code: err.code(),
            message: err.to_string(),
        }
    }
}

impl Serialize for OrderError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        ErrorBody::from(self).serialize(serializer)
    }
}

/// Result type for the order workflow.
pub type OrderResult<T> = Result<T, OrderError>;

//! # Errors
//!
//! ```text
//! ValidationError ──► CoreError ──► OrderError (figures-service) ──► caller
//!                        ▲
//!            DbError ────┘ (as CoreError::Storage)
//! ```
//!
//! `ValidationError` covers everything that can be decided from the cart
//! alone. `CoreError` adds the outcomes that need a store or a price table.

use thiserror::Error;

use crate::figure::FigureKind;

// =============================================================================
// Core Error
// =============================================================================

#[derive(Debug, Error)]
pub enum CoreError {
    /// The cart names a figure kind nobody registered a constructor for.
    #[error("Unknown figure kind: {0}")]
    UnknownKind(FigureKind),

    /// Insufficient stock to reserve a cart.
    ///
    /// ## User Workflow
    /// ```text
    /// Cart: Square × 10
    ///      │
    ///      ▼
    /// check_and_reserve: available=3
    ///      │
    ///      ▼
    /// InsufficientStock { kind: "Square", available: 3, requested: 10 }
    ///      │
    ///      ▼
    /// Nothing reserved, nothing persisted
    /// ```
    #[error("Insufficient stock for {kind}: available {available}, requested {requested}")]
    InsufficientStock {
        kind: FigureKind,
        available: u32,
        requested: u32,
    },

    /// A validated figure has no pricing rule.
    #[error("No pricing rule registered for {0}")]
    MissingPriceRule(FigureKind),

    /// A price does not fit in `i64` cents (huge area or count).
    #[error("Price out of range: {0}")]
    PriceOverflow(String),

    /// A registered constructor built a figure of another kind.
    #[error("Constructor for {requested} built a {built}")]
    KindMismatch {
        requested: FigureKind,
        built: FigureKind,
    },

    /// The inventory detected a would-be negative count.
    ///
    /// This is a bug signal: the reservation protocol makes it unreachable.
    #[error("Inventory invariant violated: {0}")]
    InternalInvariant(String),

    /// A storage backend (database, remote store) failed.
    #[error("Storage failure: {0}")]
    Storage(String),

    /// The cart line itself is malformed.
    #[error("Invalid line: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Raised before any inventory is touched.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    /// Measurements break the figure's geometric constraints.
    #[error("{kind} restrictions not met: {reason}")]
    GeometryViolation { kind: FigureKind, reason: String },

    /// Wrong number of measurements for the figure kind.
    #[error("{kind} takes {expected} measurement(s), got {actual}")]
    MeasurementCount {
        kind: FigureKind,
        expected: usize,
        actual: usize,
    },

    /// Empty kind name.
    #[error("{field} must not be empty")]
    Required { field: String },

    #[error("{field} must be at least 1")]
    MustBePositive { field: String },

    /// Count or cart size outside the accepted bounds.
    #[error("{field} must be in {min}..={max}")]
    OutOfRange { field: String, min: i64, max: i64 },
}

impl ValidationError {
    /// Creates a GeometryViolation for a given kind.
    pub fn geometry(kind: FigureKind, reason: impl Into<String>) -> Self {
        ValidationError::GeometryViolation {
            kind,
            reason: reason.into(),
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::InsufficientStock {
            kind: FigureKind::square(),
            available: 3,
            requested: 10,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock for Square: available 3, requested 10"
        );

        let err = CoreError::UnknownKind(FigureKind::new("Hexagon"));
        assert_eq!(err.to_string(), "Unknown figure kind: Hexagon");

        let err = CoreError::KindMismatch {
            requested: FigureKind::new("Disc"),
            built: FigureKind::circle(),
        };
        assert_eq!(err.to_string(), "Constructor for Disc built a Circle");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::geometry(FigureKind::triangle(), "side 5 >= 1 + 1");
        assert_eq!(
            err.to_string(),
            "Triangle restrictions not met: side 5 >= 1 + 1"
        );

        let err = ValidationError::MeasurementCount {
            kind: FigureKind::circle(),
            expected: 1,
            actual: 3,
        };
        assert_eq!(err.to_string(), "Circle takes 1 measurement(s), got 3");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "type".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}

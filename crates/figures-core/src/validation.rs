//! # Validation Module
//!
//! Cart-level input validation. Geometry checks live with each figure in
//! [`crate::figure`]; this module covers what surrounds them.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Transport adapter                                            │
//! │  └── Deserialization (types, missing fields)                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Cart size (1..=max lines)                                         │
//! │  └── Line count (1..=999)                                              │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Figure constructors                                          │
//! │  └── Arity, finiteness, geometric constraints                          │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 4: Inventory table                                              │
//! │  └── CHECK (available >= 0)                                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::MAX_ITEM_QUANTITY;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validates a requested figure count.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_ITEM_QUANTITY (999)
///
/// ## Example
/// ```rust
/// use figures_core::validation::validate_count;
///
/// assert!(validate_count(1).is_ok());
/// assert!(validate_count(0).is_err());
/// assert!(validate_count(1000).is_err());
/// ```
pub fn validate_count(count: u32) -> ValidationResult<()> {
    if count == 0 {
        return Err(ValidationError::MustBePositive {
            field: "count".to_string(),
        });
    }

    if count > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "count".to_string(),
            min: 1,
            max: i64::from(MAX_ITEM_QUANTITY),
        });
    }

    Ok(())
}

/// Validates the number of lines in a cart.
///
/// ## Rules
/// - At least one line
/// - At most `max_lines`
pub fn validate_cart_size(lines: usize, max_lines: usize) -> ValidationResult<()> {
    if lines == 0 {
        return Err(ValidationError::Required {
            field: "positions".to_string(),
        });
    }

    if lines > max_lines {
        return Err(ValidationError::OutOfRange {
            field: "positions".to_string(),
            min: 1,
            max: max_lines as i64,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

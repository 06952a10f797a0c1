//! # Figure Factory
//!
//! Turns a cart line's `(type, measurements)` into a [`ValidatedFigure`].
//!
//! ## Lookup
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  create("Circle", [2.0])                                                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  constructors: HashMap<FigureKind, Constructor>                         │
//! │  ├── "Triangle" → Triangle::from_measurements                           │
//! │  ├── "Square"   → Square::from_measurements                             │
//! │  └── "Circle"   → Circle::from_measurements  ← MATCH                    │
//! │       │                                                                 │
//! │       ├── not registered? → CoreError::UnknownKind                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Circle::from_measurements([2.0]) → ValidatedFigure or ValidationError  │
//! │       │                                                                 │
//! │       └── figure.kind() != "Circle"? → CoreError::KindMismatch          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Adding a Shape
//! ```rust
//! use figures_core::figure::{Figure, FigureKind, ValidatedFigure};
//! use figures_core::factory::FigureFactory;
//!
//! #[derive(Debug)]
//! struct Hexagon { side: f64 }
//!
//! impl Figure for Hexagon {
//!     fn kind(&self) -> FigureKind { FigureKind::new("Hexagon") }
//!     fn area(&self) -> f64 { 1.5 * 3f64.sqrt() * self.side * self.side }
//!     fn measurements(&self) -> Vec<f64> { vec![self.side] }
//! }
//!
//! let factory = FigureFactory::standard().register("Hexagon", |m: &[f64]| {
//!     Ok(ValidatedFigure::new(Hexagon { side: m[0] }))
//! });
//! assert!(factory.create(&FigureKind::new("Hexagon"), &[1.0]).is_ok());
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::figure::{Circle, FigureKind, Square, Triangle, ValidatedFigure};
use crate::validation::ValidationResult;

/// Most measurements any cart line may carry.
pub const MAX_MEASUREMENTS: usize = 3;

/// Builds and validates one figure kind from raw measurements.
pub type Constructor = Arc<dyn Fn(&[f64]) -> ValidationResult<ValidatedFigure> + Send + Sync>;

/// Registry of figure constructors keyed by kind.
#[derive(Clone, Default)]
pub struct FigureFactory {
    constructors: HashMap<FigureKind, Constructor>,
}

impl FigureFactory {
    /// Creates an empty factory. Every `create` fails until kinds are registered.
    pub fn new() -> Self {
        Self::default()
    }

    /// Factory with Triangle, Square and Circle registered.
    pub fn standard() -> Self {
        FigureFactory::new()
            .register(FigureKind::triangle(), Triangle::from_measurements)
            .register(FigureKind::square(), Square::from_measurements)
            .register(FigureKind::circle(), Circle::from_measurements)
    }

    /// Registers (or replaces) the constructor for a kind.
    pub fn register<F>(mut self, kind: impl Into<FigureKind>, constructor: F) -> Self
    where
        F: Fn(&[f64]) -> ValidationResult<ValidatedFigure> + Send + Sync + 'static,
    {
        self.constructors.insert(kind.into(), Arc::new(constructor));
        self
    }

    /// Returns true if the kind has a constructor.
    pub fn is_registered(&self, kind: &FigureKind) -> bool {
        self.constructors.contains_key(kind)
    }

    /// Registered kinds, sorted by name.
    pub fn kinds(&self) -> Vec<FigureKind> {
        let mut kinds: Vec<FigureKind> = self.constructors.keys().cloned().collect();
        kinds.sort();
        kinds
    }

    /// Constructs and validates a figure.
    ///
    /// ## Returns
    /// * `Ok(ValidatedFigure)` - measurements satisfy the kind's constraints
    /// * `Err(CoreError::UnknownKind)` - nobody registered this kind
    /// * `Err(CoreError::Validation)` - too many measurements or a failed
    ///   kind-specific check
    /// * `Err(CoreError::KindMismatch)` - the registered constructor built a
    ///   figure of another kind, which would price and reserve the wrong stock
    pub fn create(&self, kind: &FigureKind, measurements: &[f64]) -> CoreResult<ValidatedFigure> {
        let constructor = self
            .constructors
            .get(kind)
            .ok_or_else(|| CoreError::UnknownKind(kind.clone()))?;

        if measurements.len() > MAX_MEASUREMENTS {
            return Err(ValidationError::OutOfRange {
                field: "measurements".to_string(),
                min: 1,
                max: MAX_MEASUREMENTS as i64,
            }
            .into());
        }

        let figure = constructor(measurements)?;
        let built = figure.kind();
        if built != *kind {
            return Err(CoreError::KindMismatch {
                requested: kind.clone(),
                built,
            });
        }
        Ok(figure)
    }
}

impl fmt::Debug for FigureFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FigureFactory")
            .field("kinds", &self.kinds())
            .finish()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::figure::Figure;

    #[test]
    fn test_standard_kinds() {
        let factory = FigureFactory::standard();
        assert_eq!(
            factory.kinds(),
            vec![
                FigureKind::circle(),
                FigureKind::square(),
                FigureKind::triangle()
            ]
        );
    }

    #[test]
    fn test_create_dispatches_by_kind() {
        let factory = FigureFactory::standard();

        let circle = factory.create(&FigureKind::circle(), &[1.0]).unwrap();
        assert_eq!(circle.kind(), FigureKind::circle());

        let triangle = factory
            .create(&FigureKind::triangle(), &[3.0, 4.0, 5.0])
            .unwrap();
        assert_eq!(triangle.kind(), FigureKind::triangle());
    }

    #[test]
    fn test_unknown_kind() {
        let factory = FigureFactory::standard();
        let err = factory
            .create(&FigureKind::new("Hexagon"), &[1.0])
            .unwrap_err();
        assert!(matches!(err, CoreError::UnknownKind(kind) if kind.as_str() == "Hexagon"));

        // Kinds are case-sensitive
        assert!(factory.create(&FigureKind::new("circle"), &[1.0]).is_err());
    }

    #[test]
    fn test_empty_factory_rejects_everything() {
        let factory = FigureFactory::new();
        assert!(matches!(
            factory.create(&FigureKind::circle(), &[1.0]),
            Err(CoreError::UnknownKind(_))
        ));
    }

    #[test]
    fn test_validation_error_surfaces() {
        let factory = FigureFactory::standard();
        let err = factory
            .create(&FigureKind::triangle(), &[1.0, 1.0, 5.0])
            .unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::GeometryViolation { .. })
        ));
    }

    #[test]
    fn test_too_many_measurements() {
        let factory = FigureFactory::standard();
        let err = factory
            .create(&FigureKind::triangle(), &[3.0, 4.0, 5.0, 6.0])
            .unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::OutOfRange { .. })
        ));
    }

    #[derive(Debug)]
    struct Rectangle {
        width: f64,
        height: f64,
    }

    impl Figure for Rectangle {
        fn kind(&self) -> FigureKind {
            FigureKind::new("Rectangle")
        }

        fn area(&self) -> f64 {
            self.width * self.height
        }

        fn measurements(&self) -> Vec<f64> {
            vec![self.width, self.height]
        }
    }

    #[test]
    fn test_register_new_kind() {
        let factory = FigureFactory::standard().register("Rectangle", |m: &[f64]| match m {
            [w, h] if *w >= 0.0 && *h >= 0.0 => Ok(ValidatedFigure::new(Rectangle {
                width: *w,
                height: *h,
            })),
            _ => Err(ValidationError::geometry(
                FigureKind::new("Rectangle"),
                "needs two non-negative sides",
            )),
        });

        let rect = factory
            .create(&FigureKind::new("Rectangle"), &[2.0, 3.0])
            .unwrap();
        assert!((rect.area() - 6.0).abs() < 1e-9);
        assert!(factory.is_registered(&FigureKind::new("Rectangle")));
        assert!(factory.is_registered(&FigureKind::circle()));
    }

    #[test]
    fn test_constructor_must_build_its_own_kind() {
        let factory = FigureFactory::standard().register("Disc", Circle::from_measurements);

        let err = factory.create(&FigureKind::new("Disc"), &[1.0]).unwrap_err();
        match err {
            CoreError::KindMismatch { requested, built } => {
                assert_eq!(requested, FigureKind::new("Disc"));
                assert_eq!(built, FigureKind::circle());
            }
            other => panic!("expected KindMismatch, got {other:?}"),
        }

        // Validation still runs first
        assert!(matches!(
            factory.create(&FigureKind::new("Disc"), &[-1.0]),
            Err(CoreError::Validation(_))
        ));
        assert!(factory.create(&FigureKind::circle(), &[1.0]).is_ok());
    }
}

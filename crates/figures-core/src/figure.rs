//! # Figures
//!
//! Geometric shapes sold by the store. Every shape owns exactly the
//! measurements its geometry needs and validates itself on construction.
//!
//! ## Shape Model
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Figure (trait)                                 │
//! │                 kind() · area() · measurements()                        │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Triangle     │   │     Square      │   │     Circle      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  a, b, c        │   │  side           │   │  radius         │       │
//! │  │  a < b + c  ×3  │   │  side >= 0      │   │  radius >= 0    │       │
//! │  │  Heron          │   │  side²          │   │  π·r²           │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ValidatedFigure = Arc<dyn Figure>, only obtainable through validation │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! New shapes implement [`Figure`] and get registered in the
//! [`FigureFactory`](crate::factory::FigureFactory); nothing here changes.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::f64::consts::PI;
use std::fmt;
use std::sync::Arc;

use crate::error::ValidationError;
use crate::validation::ValidationResult;

// =============================================================================
// Figure Kind
// =============================================================================

/// Name of a triangle figure.
pub const TRIANGLE: &str = "Triangle";
/// Name of a square figure.
pub const SQUARE: &str = "Square";
/// Name of a circle figure.
pub const CIRCLE: &str = "Circle";

/// Identifier of a figure type ("Triangle", "Circle", ...).
///
/// A string newtype rather than an enum so new kinds can be registered
/// without touching this crate. Comparison is case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FigureKind(String);

impl FigureKind {
    /// Creates a kind from any string. No validation; see [`FigureKind::parse`].
    pub fn new(name: impl Into<String>) -> Self {
        FigureKind(name.into())
    }

    /// Parses a kind from cart input, trimming surrounding whitespace.
    ///
    /// ## Example
    /// ```rust
    /// use figures_core::FigureKind;
    ///
    /// assert_eq!(FigureKind::parse(" Circle ").unwrap(), FigureKind::circle());
    /// assert!(FigureKind::parse("   ").is_err());
    /// ```
    pub fn parse(raw: &str) -> ValidationResult<Self> {
        let name = raw.trim();
        if name.is_empty() {
            return Err(ValidationError::Required {
                field: "type".to_string(),
            });
        }
        Ok(FigureKind(name.to_string()))
    }

    pub fn triangle() -> Self {
        FigureKind::new(TRIANGLE)
    }

    pub fn square() -> Self {
        FigureKind::new(SQUARE)
    }

    pub fn circle() -> Self {
        FigureKind::new(CIRCLE)
    }

    /// Returns the kind name.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FigureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for FigureKind {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for FigureKind {
    fn from(name: &str) -> Self {
        FigureKind::new(name)
    }
}

// =============================================================================
// Figure Trait
// =============================================================================

/// Behaviour every shape provides once its measurements have been validated.
pub trait Figure: fmt::Debug + Send + Sync {
    /// The kind this figure is registered and priced under.
    fn kind(&self) -> FigureKind;

    /// Surface area in square units.
    fn area(&self) -> f64;

    /// The figure's own measurements in canonical order.
    fn measurements(&self) -> Vec<f64>;
}

// =============================================================================
// Validated Figure
// =============================================================================

/// A figure whose measurements passed kind-specific validation.
///
/// Cheap to clone (shared pointer) and immutable.
#[derive(Debug, Clone)]
pub struct ValidatedFigure(Arc<dyn Figure>);

impl ValidatedFigure {
    /// Wraps a figure. Callers must only pass figures built by a validating
    /// constructor such as [`Triangle::new`].
    pub fn new(figure: impl Figure + 'static) -> Self {
        ValidatedFigure(Arc::new(figure))
    }

    pub fn kind(&self) -> FigureKind {
        self.0.kind()
    }

    pub fn area(&self) -> f64 {
        self.0.area()
    }

    pub fn measurements(&self) -> Vec<f64> {
        self.0.measurements()
    }
}

/// Checks arity and finiteness, returning the measurements as a fixed array.
fn take_measurements<const N: usize>(
    kind: &str,
    measurements: &[f64],
) -> ValidationResult<[f64; N]> {
    let values = <[f64; N]>::try_from(measurements).map_err(|_| {
        ValidationError::MeasurementCount {
            kind: FigureKind::new(kind),
            expected: N,
            actual: measurements.len(),
        }
    })?;

    if let Some(bad) = values.iter().find(|v| !v.is_finite()) {
        return Err(ValidationError::geometry(
            FigureKind::new(kind),
            format!("measurement {bad} is not a finite number"),
        ));
    }

    Ok(values)
}

// =============================================================================
// Triangle
// =============================================================================

/// A triangle given by its three side lengths.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    a: f64,
    b: f64,
    c: f64,
}

impl Triangle {
    /// Validates the triangle inequality for all three sides.
    ///
    /// ## Rules
    /// Each side must be strictly shorter than the sum of the other two.
    /// Degenerate triangles (1, 1, 2) are rejected; this also rules out
    /// zero and negative sides.
    ///
    /// ## Example
    /// ```rust
    /// use figures_core::figure::Triangle;
    ///
    /// assert!(Triangle::new(3.0, 4.0, 5.0).is_ok());
    /// assert!(Triangle::new(1.0, 1.0, 5.0).is_err());
    /// ```
    pub fn new(a: f64, b: f64, c: f64) -> ValidationResult<Self> {
        for (side, x, y) in [(a, b, c), (b, a, c), (c, a, b)] {
            if !(side < x + y) {
                return Err(ValidationError::geometry(
                    FigureKind::triangle(),
                    format!("side {side} is not shorter than {x} + {y}"),
                ));
            }
        }
        Ok(Triangle { a, b, c })
    }

    /// Factory constructor: exactly three finite sides.
    pub fn from_measurements(measurements: &[f64]) -> ValidationResult<ValidatedFigure> {
        let [a, b, c] = take_measurements::<3>(TRIANGLE, measurements)?;
        Ok(ValidatedFigure::new(Triangle::new(a, b, c)?))
    }
}

impl Figure for Triangle {
    fn kind(&self) -> FigureKind {
        FigureKind::triangle()
    }

    /// Heron's formula from the semi-perimeter.
    fn area(&self) -> f64 {
        let p = (self.a + self.b + self.c) / 2.0;
        let product = p * (p - self.a) * (p - self.b) * (p - self.c);
        // Rounding on near-degenerate triangles can dip just below zero.
        // NaN (inf × 0 on huge sides) is kept so pricing refuses it.
        if product < 0.0 {
            0.0
        } else {
            product.sqrt()
        }
    }

    fn measurements(&self) -> Vec<f64> {
        vec![self.a, self.b, self.c]
    }
}

// =============================================================================
// Square
// =============================================================================

/// A square given by its side length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Square {
    side: f64,
}

impl Square {
    /// Validates a square side. Zero is allowed, negative is not.
    pub fn new(side: f64) -> ValidationResult<Self> {
        if side < 0.0 {
            return Err(ValidationError::geometry(
                FigureKind::square(),
                format!("side {side} is negative"),
            ));
        }
        Ok(Square { side })
    }

    /// Factory constructor: exactly one finite side.
    pub fn from_measurements(measurements: &[f64]) -> ValidationResult<ValidatedFigure> {
        let [side] = take_measurements::<1>(SQUARE, measurements)?;
        Ok(ValidatedFigure::new(Square::new(side)?))
    }
}

impl Figure for Square {
    fn kind(&self) -> FigureKind {
        FigureKind::square()
    }

    fn area(&self) -> f64 {
        self.side * self.side
    }

    fn measurements(&self) -> Vec<f64> {
        vec![self.side]
    }
}

// =============================================================================
// Circle
// =============================================================================

/// A circle given by its radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    radius: f64,
}

impl Circle {
    /// Validates a radius. Zero is allowed, negative is not.
    pub fn new(radius: f64) -> ValidationResult<Self> {
        if radius < 0.0 {
            return Err(ValidationError::geometry(
                FigureKind::circle(),
                format!("radius {radius} is negative"),
            ));
        }
        Ok(Circle { radius })
    }

    /// Factory constructor: exactly one finite radius.
    pub fn from_measurements(measurements: &[f64]) -> ValidationResult<ValidatedFigure> {
        let [radius] = take_measurements::<1>(CIRCLE, measurements)?;
        Ok(ValidatedFigure::new(Circle::new(radius)?))
    }
}

impl Figure for Circle {
    fn kind(&self) -> FigureKind {
        FigureKind::circle()
    }

    fn area(&self) -> f64 {
        PI * self.radius * self.radius
    }

    fn measurements(&self) -> Vec<f64> {
        vec![self.radius]
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn assert_geometry_violation(result: ValidationResult<ValidatedFigure>) {
        match result {
            Err(ValidationError::GeometryViolation { .. }) => {}
            other => panic!("expected GeometryViolation, got {other:?}"),
        }
    }

    #[test]
    fn test_triangle_valid() {
        let figure = Triangle::from_measurements(&[3.0, 4.0, 5.0]).unwrap();
        assert_eq!(figure.kind(), FigureKind::triangle());
        assert!((figure.area() - 6.0).abs() < 1e-9);
        assert_eq!(figure.measurements(), vec![3.0, 4.0, 5.0]);
    }

    #[test]
    fn test_triangle_inequality_violations() {
        assert_geometry_violation(Triangle::from_measurements(&[1.0, 1.0, 5.0]));
        assert_geometry_violation(Triangle::from_measurements(&[5.0, 1.0, 1.0]));
        assert_geometry_violation(Triangle::from_measurements(&[1.0, 5.0, 1.0]));
        // Degenerate: 2 is not strictly less than 1 + 1
        assert_geometry_violation(Triangle::from_measurements(&[1.0, 1.0, 2.0]));
        assert_geometry_violation(Triangle::from_measurements(&[0.0, 0.0, 0.0]));
        assert_geometry_violation(Triangle::from_measurements(&[-3.0, 4.0, 5.0]));
    }

    #[test]
    fn test_triangle_arity() {
        let err = Triangle::from_measurements(&[3.0, 4.0]).unwrap_err();
        assert_eq!(
            err,
            ValidationError::MeasurementCount {
                kind: FigureKind::triangle(),
                expected: 3,
                actual: 2,
            }
        );
    }

    #[test]
    fn test_square_boundaries() {
        assert!(Square::from_measurements(&[0.0]).is_ok());
        assert_geometry_violation(Square::from_measurements(&[-0.5]));

        let square = Square::from_measurements(&[3.0]).unwrap();
        assert!((square.area() - 9.0).abs() < 1e-9);
    }

    #[test]
    fn test_square_takes_single_side() {
        // Squares are not described by three sides
        assert!(matches!(
            Square::from_measurements(&[2.0, 2.0, 2.0]),
            Err(ValidationError::MeasurementCount { expected: 1, actual: 3, .. })
        ));
    }

    #[test]
    fn test_circle_boundaries() {
        let zero = Circle::from_measurements(&[0.0]).unwrap();
        assert_eq!(zero.area(), 0.0);
        assert_geometry_violation(Circle::from_measurements(&[-1.0]));

        let circle = Circle::from_measurements(&[2.0]).unwrap();
        assert!((circle.area() - 4.0 * PI).abs() < 1e-9);
    }

    #[test]
    fn test_non_finite_measurements_rejected() {
        assert_geometry_violation(Circle::from_measurements(&[f64::NAN]));
        assert_geometry_violation(Square::from_measurements(&[f64::INFINITY]));
        assert_geometry_violation(Triangle::from_measurements(&[3.0, f64::NAN, 5.0]));
    }

    #[test]
    fn test_kind_parse() {
        assert_eq!(FigureKind::parse("Square").unwrap(), FigureKind::square());
        assert_eq!(FigureKind::parse("  Circle\t").unwrap().as_str(), "Circle");
        assert!(FigureKind::parse("").is_err());
    }

    proptest! {
        #[test]
        fn prop_triangle_inequality_decides_validity(
            a in 0.01f64..1000.0,
            b in 0.01f64..1000.0,
            c in 0.01f64..1000.0,
        ) {
            let satisfies = a < b + c && b < a + c && c < a + b;
            let result = Triangle::from_measurements(&[a, b, c]);
            prop_assert_eq!(result.is_ok(), satisfies);
            if let Ok(figure) = result {
                prop_assert!(figure.area() >= 0.0);
                prop_assert!(!figure.area().is_nan());
            }
        }

        #[test]
        fn prop_negative_square_and_circle_rejected(value in -1000.0f64..-0.0001) {
            prop_assert!(Square::from_measurements(&[value]).is_err());
            prop_assert!(Circle::from_measurements(&[value]).is_err());
        }
    }
}

//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  Areas are f64:  π × 2² × 0.9 = 11.309733552923255                      │
//! │  Summing many of those as floats drifts a little on every line.         │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    Each unit price is rounded ONCE to whole cents (1131)                │
//! │    Everything after that (× count, Σ lines) is exact integer math       │
//! │                                                                         │
//! │  Every step is checked: a price that leaves i64 cents is a              │
//! │  PriceOverflow error, never a wrapped or saturated number.              │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use figures_core::money::Money;
//! use figures_core::pricing::PriceMultiplier;
//!
//! // Unit price of an area-6.0 figure at ×1.2
//! let unit = Money::from_area(6.0, PriceMultiplier::from_bps(12_000)).unwrap();
//! assert_eq!(unit.cents(), 720);
//!
//! // Two of them
//! assert_eq!(unit.multiply_quantity(2).unwrap().to_string(), "14.40");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{CoreError, CoreResult};
use crate::pricing::PriceMultiplier;

// 2^63 is exactly representable; anything at or above it does not fit.
const I64_LIMIT: f64 = i64::MAX as f64;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in cents.
///
/// ## Where Money is Used
/// ```text
/// area × multiplier ──► OrderLine.unit_price ──► × count ──► OrderLine.line_total
///                                                                  │
///                                           Σ line totals ──► Order.total
///                                                                  │
///                                  OrderStorage::save ──► confirmed total
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Prices an area with a multiplier, rounding to the nearest cent
    /// (half away from zero).
    ///
    /// ## Example
    /// ```rust
    /// use figures_core::money::Money;
    /// use figures_core::pricing::PriceMultiplier;
    ///
    /// let circle_area = std::f64::consts::PI * 4.0;
    /// let unit = Money::from_area(circle_area, PriceMultiplier::from_bps(9_000)).unwrap();
    /// assert_eq!(unit.cents(), 1131); // 11.3097... rounds to 11.31
    /// ```
    ///
    /// ## Errors
    /// `PriceOverflow` when the result is not finite or leaves `i64` cents.
    pub fn from_area(area: f64, multiplier: PriceMultiplier) -> CoreResult<Self> {
        // bps / 10_000 gives the factor, × 100 converts to cents
        let cents = (area * f64::from(multiplier.bps()) / 100.0).round();

        if !cents.is_finite() || cents >= I64_LIMIT || cents < -I64_LIMIT {
            return Err(CoreError::PriceOverflow(format!(
                "area {area} at x{} is not a representable price",
                multiplier.factor()
            )));
        }
        Ok(Money(cents as i64))
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the whole units portion.
    #[inline]
    pub const fn units(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the cents portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Multiplies money by a quantity.
    ///
    /// ## Example
    /// ```rust
    /// use figures_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(720);
    /// assert_eq!(unit_price.multiply_quantity(2).unwrap().cents(), 1440);
    /// assert!(Money::from_cents(i64::MAX).multiply_quantity(2).is_err());
    /// ```
    pub fn multiply_quantity(&self, qty: u32) -> CoreResult<Self> {
        self.0
            .checked_mul(i64::from(qty))
            .map(Money)
            .ok_or_else(|| CoreError::PriceOverflow(format!("{self} x {qty}")))
    }

    /// Adds two amounts.
    pub fn checked_add(&self, other: Money) -> CoreResult<Self> {
        self.0
            .checked_add(other.0)
            .map(Money)
            .ok_or_else(|| CoreError::PriceOverflow(format!("{self} + {other}")))
    }

    /// Sums amounts, failing on the first step that overflows.
    pub fn total<I>(amounts: I) -> CoreResult<Self>
    where
        I: IntoIterator<Item = Money>,
    {
        amounts
            .into_iter()
            .try_fold(Money::zero(), |acc, amount| acc.checked_add(amount))
    }

    /// The value as a float, for display or comparisons in tests only.
    #[inline]
    pub fn as_f64(&self) -> f64 {
        self.0 as f64 / 100.0
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Plain decimal rendering ("11.31"); currency is the caller's concern.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.units().abs(), self.cents_part())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1131);
        assert_eq!(money.cents(), 1131);
        assert_eq!(money.units(), 11);
        assert_eq!(money.cents_part(), 31);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(1440).to_string(), "14.40");
        assert_eq!(Money::from_cents(5).to_string(), "0.05");
        assert_eq!(Money::from_cents(-550).to_string(), "-5.50");
        assert_eq!(Money::zero().to_string(), "0.00");
    }

    #[test]
    fn test_from_area_rounding() {
        let x1 = PriceMultiplier::from_bps(10_000);
        assert_eq!(Money::from_area(9.0, x1).unwrap().cents(), 900);
        assert_eq!(Money::from_area(0.004, x1).unwrap().cents(), 0);
        assert_eq!(Money::from_area(0.006, x1).unwrap().cents(), 1);
        assert_eq!(Money::from_area(0.0, x1).unwrap(), Money::zero());
    }

    #[test]
    fn test_from_area_out_of_range() {
        let x09 = PriceMultiplier::from_bps(9_000);

        // π × (1e12)² × 0.9 × 100 ≈ 2.8e26 cents
        let huge = std::f64::consts::PI * 1e24;
        assert!(matches!(
            Money::from_area(huge, x09),
            Err(CoreError::PriceOverflow(_))
        ));
        assert!(Money::from_area(f64::INFINITY, x09).is_err());
        assert!(Money::from_area(f64::MAX, x09).is_err());

        // Exactly 2^63 cents is one past i64::MAX
        let x1 = PriceMultiplier::from_bps(10_000);
        assert!(Money::from_area(2f64.powi(63) / 100.0, x1).is_err());
        assert!(Money::from_area(2f64.powi(62) / 100.0, x1).is_ok());
    }

    #[test]
    fn test_sum_and_quantity() {
        let lines = vec![
            Money::from_cents(720).multiply_quantity(2).unwrap(),
            Money::from_cents(1131),
        ];
        assert_eq!(Money::total(lines).unwrap().cents(), 2571);
        assert_eq!(Money::total(Vec::<Money>::new()).unwrap(), Money::zero());

        let running = Money::from_cents(100);
        assert_eq!(running.checked_add(Money::from_cents(1)).unwrap().cents(), 101);
    }

    #[test]
    fn test_quantity_and_sum_overflow() {
        let unit = Money::from_cents(i64::MAX / 2 + 1);

        let err = unit.multiply_quantity(2).unwrap_err();
        assert!(matches!(err, CoreError::PriceOverflow(_)));

        let err = Money::total([unit, unit]).unwrap_err();
        assert!(matches!(err, CoreError::PriceOverflow(_)));

        assert_eq!(unit.multiply_quantity(1).unwrap(), unit);
    }
}

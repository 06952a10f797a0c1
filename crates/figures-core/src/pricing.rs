//! # Pricing Policy
//!
//! Per-kind multipliers applied to a figure's area.
//!
//! ## Formula
//! ```text
//! unit_price  = area(figure) × multiplier(kind)     (rounded to cents)
//! line_total  = unit_price × count
//! order_total = Σ line_total
//! ```
//!
//! ## Defaults
//! | Kind     | Multiplier | bps    |
//! |----------|-----------:|-------:|
//! | Triangle | ×1.2       | 12 000 |
//! | Circle   | ×0.9       |  9 000 |
//! | Square   | ×1.0       | 10 000 |
//!
//! Square's ×1.0 is a configuration default, not a business rule; override it
//! in the `[pricing]` section of the config file.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{CoreError, CoreResult};
use crate::figure::{FigureKind, ValidatedFigure};
use crate::money::Money;

/// Default Triangle multiplier (×1.2).
pub const TRIANGLE_MULTIPLIER_BPS: u32 = 12_000;
/// Default Circle multiplier (×0.9).
pub const CIRCLE_MULTIPLIER_BPS: u32 = 9_000;
/// Default Square multiplier (×1.0).
pub const SQUARE_MULTIPLIER_BPS: u32 = 10_000;

// =============================================================================
// Price Multiplier
// =============================================================================

/// Price multiplier represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 1/10000, so 12 000 bps = ×1.2 exactly. No float
/// multiplier ever sits in configuration or in the pricing table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PriceMultiplier(u32);

impl PriceMultiplier {
    /// Creates a multiplier from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        PriceMultiplier(bps)
    }

    /// Returns the multiplier in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the multiplier as a factor (for display only).
    #[inline]
    pub fn factor(&self) -> f64 {
        f64::from(self.0) / 10_000.0
    }
}

// =============================================================================
// Pricing Policy
// =============================================================================

/// Table of multipliers keyed by figure kind.
#[derive(Debug, Clone, Default)]
pub struct PricingPolicy {
    multipliers: HashMap<FigureKind, PriceMultiplier>,
}

impl PricingPolicy {
    /// Creates an empty policy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Policy with the Triangle, Circle and Square defaults.
    pub fn standard() -> Self {
        PricingPolicy::new()
            .with_rule(
                FigureKind::triangle(),
                PriceMultiplier::from_bps(TRIANGLE_MULTIPLIER_BPS),
            )
            .with_rule(
                FigureKind::circle(),
                PriceMultiplier::from_bps(CIRCLE_MULTIPLIER_BPS),
            )
            .with_rule(
                FigureKind::square(),
                PriceMultiplier::from_bps(SQUARE_MULTIPLIER_BPS),
            )
    }

    /// Adds or replaces the rule for a kind.
    pub fn with_rule(mut self, kind: impl Into<FigureKind>, multiplier: PriceMultiplier) -> Self {
        self.multipliers.insert(kind.into(), multiplier);
        self
    }

    /// Multiplier for a kind.
    pub fn multiplier(&self, kind: &FigureKind) -> CoreResult<PriceMultiplier> {
        self.multipliers
            .get(kind)
            .copied()
            .ok_or_else(|| CoreError::MissingPriceRule(kind.clone()))
    }

    /// Price of a single figure.
    pub fn unit_price(&self, figure: &ValidatedFigure) -> CoreResult<Money> {
        let multiplier = self.multiplier(&figure.kind())?;
        Money::from_area(figure.area(), multiplier)
    }

    /// Price of `count` identical figures.
    ///
    /// Fails with `PriceOverflow` rather than wrapping when a huge figure
    /// or count leaves the `i64` cents range.
    pub fn line_total(&self, figure: &ValidatedFigure, count: u32) -> CoreResult<Money> {
        self.unit_price(figure)?.multiply_quantity(count)
    }

    /// Kinds from `kinds` that have no rule, in input order.
    ///
    /// Used at startup to refuse a factory/pricing mismatch.
    pub fn missing_rules<'a>(
        &self,
        kinds: impl IntoIterator<Item = &'a FigureKind>,
    ) -> Vec<FigureKind> {
        kinds
            .into_iter()
            .filter(|kind| !self.multipliers.contains_key(*kind))
            .cloned()
            .collect()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

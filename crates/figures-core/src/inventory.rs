//! # Inventory Planning
//!
//! Pure batch arithmetic shared by every inventory store.
//!
//! ## Check-and-Reserve as One Step
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ❌ WRONG: check everything, then reserve everything                    │
//! │     for item: if available < count → reject                            │
//! │     for item: available -= count      ← another order ran in between   │
//! │                                                                         │
//! │  ✅ CORRECT: plan + apply under ONE exclusive section                   │
//! │     lock                                                                │
//! │       plan_reservation(levels, items)  → new levels or first shortfall │
//! │       write all new levels                                             │
//! │     unlock                                                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The functions here never mutate; the store applies the returned plan.

use std::collections::HashMap;

use crate::error::{CoreError, CoreResult};
use crate::figure::FigureKind;
use crate::order::ReservationItem;

/// Computes post-reservation levels for a batch.
///
/// ## Rules
/// - Missing kinds count as zero available
/// - Items are checked in input order; the first shortfall is reported
/// - Repeated kinds in `items` draw from the same running level
///
/// ## Returns
/// * `Ok(levels)` - new level for every kind touched, in first-seen order
/// * `Err(CoreError::InsufficientStock)` - nothing should be applied
pub fn plan_reservation(
    levels: &HashMap<FigureKind, u32>,
    items: &[ReservationItem],
) -> CoreResult<Vec<(FigureKind, u32)>> {
    let mut planned: Vec<(FigureKind, u32)> = Vec::with_capacity(items.len());

    for item in items {
        let slot = match planned.iter().position(|(kind, _)| *kind == item.kind) {
            Some(index) => index,
            None => {
                let current = levels.get(&item.kind).copied().unwrap_or(0);
                planned.push((item.kind.clone(), current));
                planned.len() - 1
            }
        };

        let available = planned[slot].1;
        planned[slot].1 = available
            .checked_sub(item.count)
            .ok_or_else(|| CoreError::InsufficientStock {
                kind: item.kind.clone(),
                available,
                requested: item.count,
            })?;
    }

    Ok(planned)
}

/// Computes post-release levels for a batch.
///
/// ## Returns
/// * `Ok(levels)` - new level for every kind touched
/// * `Err(CoreError::InternalInvariant)` - a level would overflow `u32`
pub fn plan_release(
    levels: &HashMap<FigureKind, u32>,
    items: &[ReservationItem],
) -> CoreResult<Vec<(FigureKind, u32)>> {
    let mut planned: Vec<(FigureKind, u32)> = Vec::with_capacity(items.len());

    for item in items {
        let slot = match planned.iter().position(|(kind, _)| *kind == item.kind) {
            Some(index) => index,
            None => {
                let current = levels.get(&item.kind).copied().unwrap_or(0);
                planned.push((item.kind.clone(), current));
                planned.len() - 1
            }
        };

        planned[slot].1 = planned[slot].1.checked_add(item.count).ok_or_else(|| {
            CoreError::InternalInvariant(format!("{} stock level overflow", item.kind))
        })?;
    }

    Ok(planned)
}

// =============================================================================
// Unit Tests
// =============================================================================

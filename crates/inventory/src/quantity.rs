//! Quantity-update decision and low-stock signalling.
//!
//! `apply_quantity_change` is the single place where a stock count drives the
//! persisted status. It never touches storage; callers persist the returned
//! [`QuantityChange`] and hand any [`LowStockSignal`] to a [`LowStockNotifier`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use rainforest_core::{DomainError, DomainResult, SpeciesId};

use crate::species::{Species, SpeciesPatch, SpeciesStatus};

/// A validated, non-negative stock count.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Quantity(i64);

impl Quantity {
    pub const ZERO: Quantity = Quantity(0);

    pub fn new(value: i64) -> DomainResult<Self> {
        if value < 0 {
            return Err(DomainError::InvalidQuantity);
        }
        Ok(Self(value))
    }

    /// Parse a client-supplied quantity.
    ///
    /// Accepts JSON integers and strings holding a base-10 integer. Missing,
    /// null, fractional, non-numeric and negative values are rejected.
    pub fn from_json(value: Option<&Value>) -> DomainResult<Self> {
        value
            .and_then(parse_count)
            .map(Self)
            .ok_or(DomainError::InvalidQuantity)
    }

    pub fn get(self) -> i64 {
        self.0
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }
}

impl TryFrom<i64> for Quantity {
    type Error = DomainError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Quantity> for i64 {
    fn from(value: Quantity) -> Self {
        value.0
    }
}

impl core::fmt::Display for Quantity {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Non-negative integer from a JSON number or numeric string.
pub(crate) fn parse_count(value: &Value) -> Option<i64> {
    let n = match value {
        Value::Number(n) => n.as_i64()?,
        Value::String(s) => s.trim().parse::<i64>().ok()?,
        _ => return None,
    };
    (n >= 0).then_some(n)
}

/// Outcome of a quantity update, ready to persist.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct QuantityChange {
    pub species_id: SpeciesId,
    pub quantity: Quantity,
    pub status: SpeciesStatus,
    /// Advisory only; never blocks the update.
    pub low_stock: bool,
}

impl QuantityChange {
    /// Decide the new status for an already-validated quantity.
    ///
    /// Zero stock is `OutOfStock`; anything else is `Available`, which also
    /// replaces a `Reserved` status.
    pub fn decide(current: &Species, quantity: Quantity) -> Self {
        let status = if quantity.is_zero() {
            SpeciesStatus::OutOfStock
        } else {
            SpeciesStatus::Available
        };

        Self {
            species_id: current.id,
            quantity,
            status,
            low_stock: quantity.get() <= current.minimum_threshold,
        }
    }

    /// The store-level update this change amounts to.
    pub fn to_patch(&self) -> SpeciesPatch {
        SpeciesPatch {
            quantity: Some(self.quantity.get()),
            status: Some(self.status),
            ..Default::default()
        }
    }

    /// Build the low-stock signal for the persisted record, if one is due.
    pub fn low_stock_signal(&self, updated: &Species, now: DateTime<Utc>) -> Option<LowStockSignal> {
        self.low_stock.then(|| LowStockSignal {
            species_id: updated.id,
            name: updated.name.clone(),
            quantity: self.quantity,
            minimum_threshold: updated.minimum_threshold,
            raised_at: now,
        })
    }
}

/// Validate a requested quantity against the current record and derive the
/// status to persist.
pub fn apply_quantity_change(current: &Species, requested: Option<&Value>) -> DomainResult<QuantityChange> {
    let quantity = Quantity::from_json(requested)?;
    Ok(QuantityChange::decide(current, quantity))
}

/// Advisory raised when stock falls to or below a species' threshold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LowStockSignal {
    pub species_id: SpeciesId,
    pub name: String,
    pub quantity: Quantity,
    pub minimum_threshold: i64,
    pub raised_at: DateTime<Utc>,
}

/// Sink for low-stock signals.
///
/// Implementations must not block: the signal is fire-and-forget and the
/// request that raised it does not wait on delivery.
pub trait LowStockNotifier: Send + Sync {
    fn notify(&self, signal: &LowStockSignal);
}

impl<N> LowStockNotifier for std::sync::Arc<N>
where
    N: LowStockNotifier + ?Sized,
{
    fn notify(&self, signal: &LowStockSignal) {
        (**self).notify(signal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::species::{NewSpecies, SpeciesKind};
    use serde_json::json;

    fn species_with(quantity: i64, status: SpeciesStatus, threshold: i64) -> Species {
        let mut new = NewSpecies::new("Poison dart frog", SpeciesKind::Animal, "Dendrobates tinctorius");
        new.quantity = quantity;
        new.status = status;
        new.minimum_threshold = threshold;
        Species::create(new, Utc::now())
    }

    #[test]
    fn zero_is_out_of_stock() {
        let s = species_with(10, SpeciesStatus::Available, 5);
        let change = apply_quantity_change(&s, Some(&json!(0))).unwrap();
        assert_eq!(change.status, SpeciesStatus::OutOfStock);
        assert_eq!(change.quantity, Quantity::ZERO);
        assert!(change.low_stock);
    }

    #[test]
    fn restock_overwrites_reserved() {
        let s = species_with(0, SpeciesStatus::Reserved, 5);
        let change = apply_quantity_change(&s, Some(&json!(20))).unwrap();
        assert_eq!(change.status, SpeciesStatus::Available);
        assert!(!change.low_stock);
    }

    #[test]
    fn rejects_negative_non_numeric_and_missing() {
        let s = species_with(3, SpeciesStatus::Available, 5);
        for bad in [
            Some(json!(-1)),
            Some(json!("abc")),
            Some(json!(null)),
            Some(json!(2.5)),
            Some(json!(5.0)),
            Some(json!("12abc")),
            None,
        ] {
            let result = apply_quantity_change(&s, bad.as_ref());
            assert_eq!(result, Err(DomainError::InvalidQuantity), "input {bad:?}");
        }
    }

    #[test]
    fn accepts_integer_strings() {
        let s = species_with(3, SpeciesStatus::Available, 5);
        let change = apply_quantity_change(&s, Some(&json!(" 8 "))).unwrap();
        assert_eq!(change.quantity.get(), 8);
    }

    #[test]
    fn threshold_boundary_is_inclusive() {
        let s = species_with(10, SpeciesStatus::Available, 5);
        assert!(apply_quantity_change(&s, Some(&json!(5))).unwrap().low_stock);
        assert!(!apply_quantity_change(&s, Some(&json!(6))).unwrap().low_stock);
    }

    #[test]
    fn patch_carries_quantity_and_status_only() {
        let s = species_with(10, SpeciesStatus::Available, 5);
        let patch = apply_quantity_change(&s, Some(&json!(0))).unwrap().to_patch();
        assert_eq!(patch.quantity, Some(0));
        assert_eq!(patch.status, Some(SpeciesStatus::OutOfStock));
        assert_eq!(patch.name, None);
        assert_eq!(patch.minimum_threshold, None);
    }

    #[test]
    fn signal_only_when_low() {
        let s = species_with(10, SpeciesStatus::Available, 5);
        let now = Utc::now();

        let low = QuantityChange::decide(&s, Quantity::new(2).unwrap());
        let signal = low.low_stock_signal(&s, now).unwrap();
        assert_eq!(signal.name, "Poison dart frog");
        assert_eq!(signal.quantity.get(), 2);
        assert_eq!(signal.minimum_threshold, 5);

        let fine = QuantityChange::decide(&s, Quantity::new(50).unwrap());
        assert!(fine.low_stock_signal(&s, now).is_none());
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        fn any_status() -> impl Strategy<Value = SpeciesStatus> {
            prop::sample::select(SpeciesStatus::ALL.to_vec())
        }

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 512,
                ..ProptestConfig::default()
            })]

            /// Property: status is OutOfStock exactly when the new quantity is zero.
            #[test]
            fn status_tracks_zero(
                current in 0i64..10_000,
                status in any_status(),
                threshold in 0i64..100,
                requested in 0i64..10_000,
            ) {
                let s = species_with(current, status, threshold);
                let change = apply_quantity_change(&s, Some(&json!(requested))).unwrap();
                let expected = if requested == 0 { SpeciesStatus::OutOfStock } else { SpeciesStatus::Available };
                prop_assert_eq!(change.status, expected);
                prop_assert_eq!(change.quantity.get(), requested);
            }

            /// Property: low-stock is raised iff quantity <= threshold, regardless of status.
            #[test]
            fn low_stock_iff_at_or_below_threshold(
                status in any_status(),
                threshold in 0i64..1_000,
                requested in 0i64..2_000,
            ) {
                let s = species_with(1, status, threshold);
                let change = apply_quantity_change(&s, Some(&json!(requested))).unwrap();
                prop_assert_eq!(change.low_stock, requested <= threshold);
            }

            /// Property: every negative request is rejected.
            #[test]
            fn negatives_rejected(requested in i64::MIN..0) {
                let s = species_with(1, SpeciesStatus::Available, 5);
                prop_assert_eq!(
                    apply_quantity_change(&s, Some(&json!(requested))),
                    Err(DomainError::InvalidQuantity)
                );
            }
        }
    }
}

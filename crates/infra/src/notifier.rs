//! Low-stock signal sinks.

use std::sync::Mutex;

use tracing::warn;

use rainforest_inventory::{LowStockNotifier, LowStockSignal};

/// Emits each signal as a structured `warn!` event.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLowStockNotifier;

impl LowStockNotifier for TracingLowStockNotifier {
    fn notify(&self, signal: &LowStockSignal) {
        warn!(
            species_id = %signal.species_id,
            quantity = signal.quantity.get(),
            minimum_threshold = signal.minimum_threshold,
            "Low stock alert for {}: {} remaining",
            signal.name,
            signal.quantity
        );
    }
}

/// Keeps every signal it receives; used by tests to observe alerts.
#[derive(Debug, Default)]
pub struct InMemoryLowStockNotifier {
    signals: Mutex<Vec<LowStockSignal>>,
}

impl InMemoryLowStockNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn signals(&self) -> Vec<LowStockSignal> {
        self.signals.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

impl LowStockNotifier for InMemoryLowStockNotifier {
    fn notify(&self, signal: &LowStockSignal) {
        if let Ok(mut signals) = self.signals.lock() {
            signals.push(signal.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rainforest_core::SpeciesId;
    use rainforest_inventory::Quantity;

    #[test]
    fn records_signals_in_order() {
        let notifier = InMemoryLowStockNotifier::new();
        for n in [3, 1] {
            notifier.notify(&LowStockSignal {
                species_id: SpeciesId::new(),
                name: "Glass frog".into(),
                quantity: Quantity::new(n).unwrap(),
                minimum_threshold: 5,
                raised_at: Utc::now(),
            });
        }

        let quantities: Vec<i64> = notifier.signals().iter().map(|s| s.quantity.get()).collect();
        assert_eq!(quantities, vec![3, 1]);
    }
}

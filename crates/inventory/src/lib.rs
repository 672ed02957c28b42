//! Species inventory domain.
//!
//! This crate contains the species record, its closed-set enums, input
//! validation and the quantity-update decision, implemented purely as
//! deterministic domain logic (no IO, no HTTP, no storage).

pub mod filter;
pub mod quantity;
pub mod species;

pub use filter::SpeciesFilter;
pub use quantity::{
    LowStockNotifier, LowStockSignal, Quantity, QuantityChange, apply_quantity_change,
};
pub use species::{
    DEFAULT_MINIMUM_THRESHOLD, JsonMap, NewSpecies, Species, SpeciesInput, SpeciesKind,
    SpeciesPatch, SpeciesStatus,
};

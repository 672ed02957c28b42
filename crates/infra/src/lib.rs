//! Infrastructure layer: record stores, database wiring, notifiers.

pub mod bootstrap;
pub mod db;
pub mod error;
pub mod notifier;
pub mod species_store;
pub mod user_store;

mod integration_tests;

pub use bootstrap::{AdminSeed, BootstrapError, ensure_admin};
pub use error::{StoreError, StoreResult};
pub use notifier::{InMemoryLowStockNotifier, TracingLowStockNotifier};
pub use species_store::{InMemorySpeciesStore, PostgresSpeciesStore, SpeciesStore};
pub use user_store::{InMemoryUserStore, PostgresUserStore, UserStore};

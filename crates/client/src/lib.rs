//! Client for the species API plus the view state behind the inventory
//! dashboard: species form, table rows and notifications.

pub mod api;
pub mod dashboard;
pub mod error;
pub mod form;
pub mod table;

pub use api::{Session, SpeciesApi, SpeciesBackend, filter_params};
pub use dashboard::{Dashboard, Notification, NotificationKind};
pub use error::ClientError;
pub use form::{FormError, FormMode, SpeciesForm};
pub use table::{BadgeTone, QuantityEditor, SpeciesRow, badge_tone, rows};

//! Entity trait: a record whose identity survives every field update.

/// Persisted record with a stable identifier.
///
/// Implemented by species and users; in-memory stores key their maps on
/// [`Entity::id`], and log lines use [`Entity::label`].
pub trait Entity {
    /// Strongly-typed identifier. Never reassigned after creation.
    type Id: Copy + Eq + Ord + core::hash::Hash + core::fmt::Debug + core::fmt::Display;

    fn id(&self) -> Self::Id;

    /// Short human-readable label (display name, username).
    fn label(&self) -> &str;
}

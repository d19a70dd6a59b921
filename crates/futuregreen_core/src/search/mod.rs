//! Full-text search over rendered descriptions.
//!
//! # Responsibility
//! - Keep an FTS5 index of description text for projects and contacts.
//! - Expose ranked keyword search with stable entity IDs.
//!
//! # Invariants
//! - At most one index row exists per `(entity_kind, entity_id)`.
//! - Indexed text is the tag-stripped rendered HTML.

pub mod description_fts;

//! Use-case services over repositories.
//!
//! # Responsibility
//! - Run the save lifecycle: derive slugs, render markup, recompute derived
//!   fields, persist, refresh the search index.
//! - Keep callers decoupled from storage details.

pub mod contact_service;
pub mod credit_service;
pub mod project_service;
pub mod staff_service;

use uuid::Uuid;

/// Result of a save through a service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveOutcome {
    pub id: Uuid,
    /// `true` when the record was inserted rather than updated.
    pub created: bool,
    /// `true` when `description_html` differs from the stored value (empty
    /// for new records).
    pub html_changed: bool,
}

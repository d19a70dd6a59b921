//! Domain model for the studio site.
//!
//! # Responsibility
//! - Define portfolio projects, contacts, staff and project credits.
//! - Keep derived fields next to the records they belong to.
//! - Keep unit conversion and name splitting as pure functions.
//!
//! # Invariants
//! - Every record is identified by a stable UUID.
//! - Derived fields (`area_normalized`, `description_html`, person name
//!   parts) are recomputed from source fields, never edited directly.

pub mod contact;
pub mod credit;
pub mod measurement;
pub mod name;
pub mod project;
pub mod slug;
pub mod staff;
pub mod unit;

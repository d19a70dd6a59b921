//! Studio staff: employee types and per-contact employment details.
//!
//! # Invariants
//! - Only person contacts can carry [`Employment`].
//! - Employee type slugs are unique across the site.

use crate::model::slug::is_valid_slug;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub type EmployeeTypeId = Uuid;

/// Employment status; new staff default to full-time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmploymentStatus {
    #[default]
    FullTime,
    Contract,
    Former,
}

impl EmploymentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FullTime => "full_time",
            Self::Contract => "contract",
            Self::Former => "former",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "full_time" => Some(Self::FullTime),
            "contract" => Some(Self::Contract),
            "former" => Some(Self::Former),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::FullTime => "Full-time",
            Self::Contract => "Contract",
            Self::Former => "Former",
        }
    }
}

/// Staff grouping such as "Landscape Architect" or "Field Crew".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeType {
    pub id: EmployeeTypeId,
    pub name: String,
    pub slug: String,
    pub description: String,
}

impl EmployeeType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            slug: String::new(),
            description: String::new(),
        }
    }

    pub fn validate(&self) -> Result<(), EmployeeTypeValidationError> {
        if self.name.trim().is_empty() {
            return Err(EmployeeTypeValidationError::BlankName);
        }
        if !is_valid_slug(&self.slug) {
            return Err(EmployeeTypeValidationError::InvalidSlug(self.slug.clone()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmployeeTypeValidationError {
    BlankName,
    InvalidSlug(String),
}

impl Display for EmployeeTypeValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankName => write!(f, "employee type name cannot be blank"),
            Self::InvalidSlug(slug) => write!(f, "invalid employee type slug `{slug}`"),
        }
    }
}

impl Error for EmployeeTypeValidationError {}

/// Employment details attached to a staff contact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employment {
    pub employee_type_id: EmployeeTypeId,
    pub job_title: String,
    #[serde(default)]
    pub status: EmploymentStatus,
}

impl Employment {
    pub fn new(employee_type_id: EmployeeTypeId, job_title: impl Into<String>) -> Self {
        Self {
            employee_type_id,
            job_title: job_title.into(),
            status: EmploymentStatus::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{EmployeeType, EmployeeTypeValidationError, EmploymentStatus};

    #[test]
    fn status_codes_round_trip_and_label() {
        for status in [
            EmploymentStatus::FullTime,
            EmploymentStatus::Contract,
            EmploymentStatus::Former,
        ] {
            assert_eq!(EmploymentStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(EmploymentStatus::default(), EmploymentStatus::FullTime);
        assert_eq!(EmploymentStatus::FullTime.label(), "Full-time");
        assert_eq!(EmploymentStatus::parse("1"), None);
    }

    #[test]
    fn employee_type_needs_name_and_slug() {
        let mut kind = EmployeeType::new("  ");
        assert_eq!(kind.validate(), Err(EmployeeTypeValidationError::BlankName));

        kind.name = "Field Crew".to_string();
        assert_eq!(
            kind.validate(),
            Err(EmployeeTypeValidationError::InvalidSlug(String::new()))
        );

        kind.slug = "field-crew".to_string();
        assert_eq!(kind.validate(), Ok(()));
    }
}

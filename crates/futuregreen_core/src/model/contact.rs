//! Contact domain model for people and organizations.
//!
//! # Responsibility
//! - Define the contact record credited on projects as client,
//!   collaborator, designer or builder.
//! - Attach derived name parts to person contacts only.
//!
//! # Invariants
//! - Only `ContactKind::Person` carries first/middle/last name parts; other
//!   kinds cannot hold them.
//! - Person name parts are recomputed from `name` on every save.
//! - Staff (contacts with [`Employment`]) are always people.

use crate::markup::Described;
use crate::model::name::{split_name, NameError, PersonName};
use crate::model::slug::is_valid_slug;
use crate::model::staff::Employment;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub type ContactId = Uuid;

/// Fieldless contact category, used for storage and filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactCategory {
    Person,
    Commercial,
    Educational,
    NonProfit,
    Governmental,
}

impl ContactCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Person => "person",
            Self::Commercial => "commercial",
            Self::Educational => "educational",
            Self::NonProfit => "non_profit",
            Self::Governmental => "governmental",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "person" => Some(Self::Person),
            "commercial" => Some(Self::Commercial),
            "educational" => Some(Self::Educational),
            "non_profit" => Some(Self::NonProfit),
            "governmental" => Some(Self::Governmental),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Person => "Person",
            Self::Commercial => "Commercial Business",
            Self::Educational => "Educational Institution",
            Self::NonProfit => "Non-Profit Organization",
            Self::Governmental => "Governmental Organization",
        }
    }
}

/// Contact kind; the person variant owns the derived name parts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContactKind {
    Person(PersonName),
    Commercial,
    Educational,
    NonProfit,
    Governmental,
}

impl Default for ContactKind {
    fn default() -> Self {
        Self::Person(PersonName::default())
    }
}

impl ContactKind {
    /// Kind with empty derived fields for `category`.
    pub fn from_category(category: ContactCategory) -> Self {
        match category {
            ContactCategory::Person => Self::Person(PersonName::default()),
            ContactCategory::Commercial => Self::Commercial,
            ContactCategory::Educational => Self::Educational,
            ContactCategory::NonProfit => Self::NonProfit,
            ContactCategory::Governmental => Self::Governmental,
        }
    }

    pub fn category(&self) -> ContactCategory {
        match self {
            Self::Person(_) => ContactCategory::Person,
            Self::Commercial => ContactCategory::Commercial,
            Self::Educational => ContactCategory::Educational,
            Self::NonProfit => ContactCategory::NonProfit,
            Self::Governmental => ContactCategory::Governmental,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContactValidationError {
    BlankName,
    InvalidSlug(String),
    /// Country must be empty or a two-letter uppercase ISO code.
    InvalidCountry(String),
    BlankJobTitle,
    /// Employment attached to an organization.
    EmployeeNotPerson,
}

impl Display for ContactValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankName => write!(f, "contact name cannot be blank"),
            Self::InvalidSlug(slug) => write!(f, "invalid contact slug `{slug}`"),
            Self::InvalidCountry(code) => write!(f, "invalid country code `{code}`"),
            Self::BlankJobTitle => write!(f, "employee job title cannot be blank"),
            Self::EmployeeNotPerson => write!(f, "only person contacts can be employees"),
        }
    }
}

impl Error for ContactValidationError {}

/// Contact record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub id: ContactId,
    pub kind: ContactKind,
    /// Full display name.
    pub name: String,
    pub slug: String,
    pub description: String,
    #[serde(default)]
    pub(crate) description_html: String,
    pub address_line1: String,
    pub address_line2: String,
    pub city: String,
    /// State or province.
    pub state: String,
    /// Zip or postal code.
    pub postal_code: String,
    pub country: String,
    pub email: String,
    pub phone: String,
    pub mobile: String,
    pub fax: String,
    pub website: String,
    /// Set for studio staff.
    #[serde(default)]
    pub employment: Option<Employment>,
}

impl Contact {
    /// Creates a contact with a generated stable ID and blank optional fields.
    pub fn new(category: ContactCategory, name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind: ContactKind::from_category(category),
            name: name.into(),
            slug: String::new(),
            description: String::new(),
            description_html: String::new(),
            address_line1: String::new(),
            address_line2: String::new(),
            city: String::new(),
            state: String::new(),
            postal_code: String::new(),
            country: String::new(),
            email: String::new(),
            phone: String::new(),
            mobile: String::new(),
            fax: String::new(),
            website: String::new(),
            employment: None,
        }
    }

    /// Shorthand for a person contact.
    pub fn person(name: impl Into<String>) -> Self {
        Self::new(ContactCategory::Person, name)
    }

    /// Shorthand for a staff member.
    pub fn employee(name: impl Into<String>, employment: Employment) -> Self {
        Self {
            employment: Some(employment),
            ..Self::person(name)
        }
    }

    pub fn category(&self) -> ContactCategory {
        self.kind.category()
    }

    pub fn is_employee(&self) -> bool {
        self.employment.is_some()
    }

    /// Derived name parts; `None` for organizations.
    pub fn person_name(&self) -> Option<&PersonName> {
        match &self.kind {
            ContactKind::Person(parts) => Some(parts),
            _ => None,
        }
    }

    /// Recomputes person name parts from `name`.
    ///
    /// Staff with an organization kind are switched to `Person` first.
    /// Organizations have nothing to derive and always succeed. On error the
    /// previous kind and parts are left untouched.
    pub fn refresh_person_name(&mut self) -> Result<(), NameError> {
        match &mut self.kind {
            ContactKind::Person(parts) => *parts = split_name(&self.name)?,
            _ if self.employment.is_some() => {
                self.kind = ContactKind::Person(split_name(&self.name)?);
            }
            _ => {}
        }
        Ok(())
    }

    /// Checks record-level invariants before persistence.
    pub fn validate(&self) -> Result<(), ContactValidationError> {
        if self.name.trim().is_empty() {
            return Err(ContactValidationError::BlankName);
        }
        if !is_valid_slug(&self.slug) {
            return Err(ContactValidationError::InvalidSlug(self.slug.clone()));
        }
        let country_ok = self.country.is_empty()
            || (self.country.len() == 2 && self.country.chars().all(|c| c.is_ascii_uppercase()));
        if !country_ok {
            return Err(ContactValidationError::InvalidCountry(self.country.clone()));
        }
        if let Some(employment) = &self.employment {
            if self.person_name().is_none() {
                return Err(ContactValidationError::EmployeeNotPerson);
            }
            if employment.job_title.trim().is_empty() {
                return Err(ContactValidationError::BlankJobTitle);
            }
        }
        Ok(())
    }
}

impl Described for Contact {
    fn description(&self) -> &str {
        &self.description
    }

    fn description_html(&self) -> &str {
        &self.description_html
    }

    fn set_description_html(&mut self, html: String) {
        self.description_html = html;
    }
}

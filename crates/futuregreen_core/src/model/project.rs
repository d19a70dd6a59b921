//! Portfolio project domain model.
//!
//! # Responsibility
//! - Define the project record shown in the public portfolio.
//! - Carry the physical measurement and the description HTML cache.
//!
//! # Invariants
//! - `id` is stable and never reused for another project.
//! - `name` is not blank; `slug` is a normalized slug once saved.
//! - `date_end` is not earlier than `date_start` when both are set.
//! - Only `ProjectStatus::Live` projects are listed and compared publicly.

use crate::markup::Described;
use crate::model::measurement::Measurement;
use crate::model::slug::is_valid_slug;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub type ProjectId = Uuid;

/// Publication state of a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    /// Publicly displayed and used as the relative-size basis.
    #[default]
    Live,
    Hidden,
    Pending,
    Draft,
}

impl ProjectStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Live => "live",
            Self::Hidden => "hidden",
            Self::Pending => "pending",
            Self::Draft => "draft",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "live" => Some(Self::Live),
            "hidden" => Some(Self::Hidden),
            "pending" => Some(Self::Pending),
            "draft" => Some(Self::Draft),
            _ => None,
        }
    }
}

/// Validation failures for project records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectValidationError {
    BlankName,
    InvalidSlug(String),
    InvalidDateWindow { start: i64, end: i64 },
}

impl Display for ProjectValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankName => write!(f, "project name cannot be blank"),
            Self::InvalidSlug(slug) => write!(f, "invalid project slug `{slug}`"),
            Self::InvalidDateWindow { start, end } => {
                write!(f, "date_end ({end}) must be >= date_start ({start})")
            }
        }
    }
}

impl Error for ProjectValidationError {}

/// Portfolio project record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    /// Unique URL slug; derived from `name` on save when left blank.
    pub slug: String,
    pub short_description: String,
    /// Raw author text, interpreted by the configured markup mode.
    pub description: String,
    /// Rendered cache of `description`; refreshed on every save.
    #[serde(default)]
    pub(crate) description_html: String,
    /// Unix epoch milliseconds. `None` while the project is a proposal.
    pub date_start: Option<i64>,
    /// Unix epoch milliseconds; estimated for projects in progress.
    pub date_end: i64,
    pub external_url: String,
    pub address: Option<String>,
    pub status: ProjectStatus,
    pub featured: bool,
    pub measurement: Measurement,
}

impl Project {
    /// Creates a live project with a generated stable ID.
    ///
    /// The slug is left blank and filled on first save.
    pub fn new(name: impl Into<String>, date_end: i64, measurement: Measurement) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            slug: String::new(),
            short_description: String::new(),
            description: String::new(),
            description_html: String::new(),
            date_start: None,
            date_end,
            external_url: String::new(),
            address: None,
            status: ProjectStatus::Live,
            featured: false,
            measurement,
        }
    }

    pub fn is_live(&self) -> bool {
        self.status == ProjectStatus::Live
    }

    /// Returns whether the project finished before `as_of` (epoch ms).
    pub fn is_completed(&self, as_of: i64) -> bool {
        self.date_end <= as_of
    }

    /// Checks record-level invariants before persistence.
    pub fn validate(&self) -> Result<(), ProjectValidationError> {
        if self.name.trim().is_empty() {
            return Err(ProjectValidationError::BlankName);
        }
        if !is_valid_slug(&self.slug) {
            return Err(ProjectValidationError::InvalidSlug(self.slug.clone()));
        }
        if let Some(start) = self.date_start {
            if self.date_end < start {
                return Err(ProjectValidationError::InvalidDateWindow {
                    start,
                    end: self.date_end,
                });
            }
        }
        Ok(())
    }
}

impl Described for Project {
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

//! Contact credits on portfolio projects.

use crate::model::contact::ContactId;
use crate::model::project::ProjectId;
use serde::{Deserialize, Serialize};

/// Part a contact played on a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectRole {
    Designer,
    Builder,
    Client,
    Collaborator,
}

impl ProjectRole {
    pub const ALL: [Self; 4] = [Self::Designer, Self::Builder, Self::Client, Self::Collaborator];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Designer => "designer",
            Self::Builder => "builder",
            Self::Client => "client",
            Self::Collaborator => "collaborator",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "designer" => Some(Self::Designer),
            "builder" => Some(Self::Builder),
            "client" => Some(Self::Client),
            "collaborator" => Some(Self::Collaborator),
            _ => None,
        }
    }

    /// Designers and builders are studio staff; clients and collaborators
    /// can be any contact.
    pub fn requires_employee(self) -> bool {
        matches!(self, Self::Designer | Self::Builder)
    }
}

/// One contact credited in one role on one project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProjectCredit {
    pub project_id: ProjectId,
    pub contact_id: ContactId,
    pub role: ProjectRole,
}

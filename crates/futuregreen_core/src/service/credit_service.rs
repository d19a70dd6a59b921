//! Credits linking contacts to portfolio projects.
//!
//! # Invariants
//! - Designer and builder credits go to staff only.
//! - Public lookups from a contact only return live projects.

use crate::model::contact::{Contact, ContactId};
use crate::model::credit::{ProjectCredit, ProjectRole};
use crate::model::project::{Project, ProjectId};
use crate::repo::contact_repo::ContactRepository;
use crate::repo::credit_repo::CreditRepository;
use crate::repo::project_repo::ProjectRepository;
use crate::repo::{RepoError, RepoResult};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug)]
pub enum CreditServiceError {
    ProjectNotFound(ProjectId),
    ContactNotFound(ContactId),
    /// Staff-only role offered to a contact without employment.
    NotAnEmployee {
        contact_id: ContactId,
        role: ProjectRole,
    },
    Repo(RepoError),
}

impl Display for CreditServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ProjectNotFound(id) => write!(f, "project not found: {id}"),
            Self::ContactNotFound(id) => write!(f, "contact not found: {id}"),
            Self::NotAnEmployee { contact_id, role } => write!(
                f,
                "contact {contact_id} is not staff and cannot be credited as {}",
                role.as_str()
            ),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for CreditServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for CreditServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

pub struct CreditService<K: CreditRepository, P: ProjectRepository, C: ContactRepository> {
    credits: K,
    projects: P,
    contacts: C,
}

impl<K: CreditRepository, P: ProjectRepository, C: ContactRepository> CreditService<K, P, C> {
    pub fn new(credits: K, projects: P, contacts: C) -> Self {
        Self {
            credits,
            projects,
            contacts,
        }
    }

    /// Credits `contact_id` on `project_id`; `Ok(false)` when already credited.
    pub fn add_credit(
        &self,
        project_id: ProjectId,
        contact_id: ContactId,
        role: ProjectRole,
    ) -> Result<bool, CreditServiceError> {
        if self.projects.get_project(project_id)?.is_none() {
            return Err(CreditServiceError::ProjectNotFound(project_id));
        }
        let contact = self
            .contacts
            .get_contact(contact_id)?
            .ok_or(CreditServiceError::ContactNotFound(contact_id))?;
        if role.requires_employee() && !contact.is_employee() {
            warn!(
                "event=credit_add module=service status=rejected project={project_id} contact={contact_id} role={} error_code=not_staff",
                role.as_str()
            );
            return Err(CreditServiceError::NotAnEmployee { contact_id, role });
        }

        let added = self.credits.add_credit(&ProjectCredit {
            project_id,
            contact_id,
            role,
        })?;
        info!(
            "event=credit_add module=service status=ok project={project_id} contact={contact_id} role={} added={added}",
            role.as_str()
        );
        Ok(added)
    }

    pub fn remove_credit(
        &self,
        project_id: ProjectId,
        contact_id: ContactId,
        role: ProjectRole,
    ) -> RepoResult<bool> {
        self.credits.remove_credit(&ProjectCredit {
            project_id,
            contact_id,
            role,
        })
    }

    /// Contacts credited on a project in `role`, ordered by name.
    pub fn credited_contacts(
        &self,
        project_id: ProjectId,
        role: ProjectRole,
    ) -> RepoResult<Vec<Contact>> {
        let mut contacts = Vec::new();
        for credit in self.credits.list_project_credits(project_id, Some(role))? {
            if let Some(contact) = self.contacts.get_contact(credit.contact_id)? {
                contacts.push(contact);
            }
        }
        Ok(contacts)
    }

    pub fn project_credits(&self, project_id: ProjectId) -> RepoResult<Vec<ProjectCredit>> {
        self.credits.list_project_credits(project_id, None)
    }

    /// Live projects a contact is credited on, latest end date first.
    pub fn credited_projects(
        &self,
        contact_id: ContactId,
    ) -> RepoResult<Vec<(ProjectRole, Project)>> {
        let mut projects = Vec::new();
        for credit in self.credits.list_contact_credits(contact_id)? {
            match self.projects.get_project(credit.project_id)? {
                Some(project) if project.is_live() => projects.push((credit.role, project)),
                _ => {}
            }
        }
        Ok(projects)
    }
}

//! Contact use-case service.
//!
//! # Invariants
//! - Every save re-renders `description_html` with the configured contact
//!   markup mode.
//! - Person contacts get fresh name parts on every save; a name with no
//!   tokens rejects the save before anything is written.
//! - Staff are saved as people whatever kind they arrived with.

use crate::config::SiteConfig;
use crate::markup::{Described, MarkupMode, MarkupRenderer};
use crate::model::contact::{Contact, ContactCategory, ContactId, ContactValidationError};
use crate::model::name::NameError;
use crate::model::staff::{EmployeeTypeId, EmploymentStatus};
use crate::model::slug::slug_or_fallback;
use crate::repo::contact_repo::{ContactListQuery, ContactRepository};
use crate::repo::{RepoError, RepoResult};
use crate::search::description_fts::{DescriptionIndex, EntityKind, SearchError};
use crate::service::SaveOutcome;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for contact use-cases.
#[derive(Debug)]
pub enum ContactServiceError {
    /// Person contact whose name has no tokens to split.
    EmptyName,
    Validation(ContactValidationError),
    ContactNotFound(ContactId),
    DuplicateSlug(String),
    UnknownEmployeeType(EmployeeTypeId),
    Repo(RepoError),
    Search(SearchError),
}

impl Display for ContactServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "person contact name is empty"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::ContactNotFound(id) => write!(f, "contact not found: {id}"),
            Self::DuplicateSlug(slug) => write!(f, "contact slug already in use: `{slug}`"),
            Self::UnknownEmployeeType(id) => write!(f, "employee type not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::Search(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ContactServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::Search(err) => Some(err),
            Self::EmptyName
            | Self::ContactNotFound(_)
            | Self::DuplicateSlug(_)
            | Self::UnknownEmployeeType(_) => None,
        }
    }
}

impl From<RepoError> for ContactServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::ContactNotFound(id),
            RepoError::DuplicateSlug(slug) => Self::DuplicateSlug(slug),
            RepoError::MissingReference(id) => Self::UnknownEmployeeType(id),
            RepoError::ContactValidation(err) => Self::Validation(err),
            other => Self::Repo(other),
        }
    }
}

impl From<NameError> for ContactServiceError {
    fn from(value: NameError) -> Self {
        match value {
            NameError::EmptyName => Self::EmptyName,
        }
    }
}

impl From<ContactValidationError> for ContactServiceError {
    fn from(value: ContactValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<SearchError> for ContactServiceError {
    fn from(value: SearchError) -> Self {
        Self::Search(value)
    }
}

/// Contact service facade over repository and index implementations.
pub struct ContactService<R: ContactRepository, I: DescriptionIndex> {
    repo: R,
    index: I,
    renderer: MarkupRenderer,
    markup: MarkupMode,
}

impl<R: ContactRepository, I: DescriptionIndex> ContactService<R, I> {
    pub fn new(repo: R, index: I, config: &SiteConfig) -> Self {
        Self::with_renderer(repo, index, MarkupRenderer::default(), config.contact_markup)
    }

    pub fn with_renderer(repo: R, index: I, renderer: MarkupRenderer, markup: MarkupMode) -> Self {
        Self {
            repo,
            index,
            renderer,
            markup,
        }
    }

    /// Saves a contact, inserting it when its id is unknown.
    pub fn save(&self, contact: &mut Contact) -> Result<SaveOutcome, ContactServiceError> {
        if let Err(err) = contact.refresh_person_name() {
            warn!(
                "event=contact_save module=service status=rejected id={} error_code=empty_name",
                contact.id
            );
            return Err(err.into());
        }
        if contact.slug.trim().is_empty() {
            contact.slug = slug_or_fallback(&contact.name, "contact", contact.id);
        }
        self.renderer.refresh(contact, self.markup);
        contact.validate()?;

        let stored = self.repo.get_contact(contact.id)?;
        let created = stored.is_none();
        let stored_html = stored.as_ref().map_or("", |stored| stored.description_html());
        let html_changed = stored_html != contact.description_html();
        if created {
            self.repo.create_contact(contact)?;
        } else {
            self.repo.update_contact(contact)?;
        }

        let indexed = self.index.is_current(
            EntityKind::Contact,
            contact.id,
            contact.description_html(),
        )?;
        if html_changed || !indexed {
            self.index
                .upsert(EntityKind::Contact, contact.id, contact.description_html())?;
        }

        info!(
            "event=contact_save module=service status=ok id={} kind={} staff={} created={} html_changed={}",
            contact.id,
            contact.category().as_str(),
            contact.is_employee(),
            created,
            html_changed
        );
        Ok(SaveOutcome {
            id: contact.id,
            created,
            html_changed,
        })
    }

    pub fn get_contact(&self, id: ContactId) -> RepoResult<Option<Contact>> {
        self.repo.get_contact(id)
    }

    pub fn get_contact_by_slug(&self, slug: &str) -> RepoResult<Option<Contact>> {
        self.repo.get_contact_by_slug(slug)
    }

    /// Lists contacts, people first, optionally limited to one category.
    pub fn list_contacts(&self, category: Option<ContactCategory>) -> RepoResult<Vec<Contact>> {
        self.repo.list_contacts(&ContactListQuery {
            category,
            ..ContactListQuery::default()
        })
    }

    /// Staff ordered by name, optionally limited to one employment status.
    pub fn list_staff(&self, status: Option<EmploymentStatus>) -> RepoResult<Vec<Contact>> {
        self.repo.list_contacts(&ContactListQuery {
            staff_only: true,
            employment_status: status,
            ..ContactListQuery::default()
        })
    }

    pub fn delete_contact(&self, id: ContactId) -> Result<(), ContactServiceError> {
        self.repo.delete_contact(id)?;
        self.index.remove(EntityKind::Contact, id)?;
        info!("event=contact_delete module=service status=ok id={id}");
        Ok(())
    }
}

//! Employee type use-cases.

use crate::model::slug::slug_or_fallback;
use crate::model::staff::{EmployeeType, EmployeeTypeId, EmployeeTypeValidationError};
use crate::repo::staff_repo::EmployeeTypeRepository;
use crate::repo::{RepoError, RepoResult};
use crate::service::SaveOutcome;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug)]
pub enum StaffServiceError {
    Validation(EmployeeTypeValidationError),
    EmployeeTypeNotFound(EmployeeTypeId),
    DuplicateSlug(String),
    /// Employees still carry this type.
    EmployeeTypeInUse(EmployeeTypeId),
    Repo(RepoError),
}

impl Display for StaffServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::EmployeeTypeNotFound(id) => write!(f, "employee type not found: {id}"),
            Self::DuplicateSlug(slug) => write!(f, "employee type slug already in use: `{slug}`"),
            Self::EmployeeTypeInUse(id) => write!(f, "employee type {id} is still assigned"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for StaffServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::EmployeeTypeNotFound(_)
            | Self::DuplicateSlug(_)
            | Self::EmployeeTypeInUse(_) => None,
        }
    }
}

impl From<RepoError> for StaffServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::EmployeeTypeNotFound(id),
            RepoError::DuplicateSlug(slug) => Self::DuplicateSlug(slug),
            RepoError::InUse(id) => Self::EmployeeTypeInUse(id),
            RepoError::EmployeeTypeValidation(err) => Self::Validation(err),
            other => Self::Repo(other),
        }
    }
}

impl From<EmployeeTypeValidationError> for StaffServiceError {
    fn from(value: EmployeeTypeValidationError) -> Self {
        Self::Validation(value)
    }
}

pub struct StaffService<R: EmployeeTypeRepository> {
    repo: R,
}

impl<R: EmployeeTypeRepository> StaffService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Saves an employee type, filling a blank slug from the name.
    pub fn save_employee_type(
        &self,
        employee_type: &mut EmployeeType,
    ) -> Result<SaveOutcome, StaffServiceError> {
        if employee_type.slug.trim().is_empty() {
            employee_type.slug =
                slug_or_fallback(&employee_type.name, "staff", employee_type.id);
        }
        employee_type.validate()?;

        let created = self.repo.get_employee_type(employee_type.id)?.is_none();
        if created {
            self.repo.create_employee_type(employee_type)?;
        } else {
            self.repo.update_employee_type(employee_type)?;
        }

        info!(
            "event=employee_type_save module=service status=ok id={} created={created}",
            employee_type.id
        );
        Ok(SaveOutcome {
            id: employee_type.id,
            created,
            html_changed: false,
        })
    }

    pub fn get_employee_type_by_slug(&self, slug: &str) -> RepoResult<Option<EmployeeType>> {
        self.repo.get_employee_type_by_slug(slug)
    }

    pub fn list_employee_types(&self) -> RepoResult<Vec<EmployeeType>> {
        self.repo.list_employee_types()
    }

    pub fn delete_employee_type(&self, id: EmployeeTypeId) -> Result<(), StaffServiceError> {
        if let Err(err) = self.repo.delete_employee_type(id) {
            warn!("event=employee_type_delete module=service status=error id={id} error={err}");
            return Err(err.into());
        }
        info!("event=employee_type_delete module=service status=ok id={id}");
        Ok(())
    }
}

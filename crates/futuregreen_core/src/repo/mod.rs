//! Repository layer abstractions and SQLite implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts.
//! - Isolate SQL details from service orchestration.
//!
//! # Invariants
//! - Write paths validate records before SQL mutations.
//! - Read paths reject corrupt persisted state instead of masking it.
//! - APIs return semantic errors (`NotFound`, `DuplicateSlug`) in addition to
//!   DB transport errors.

pub mod contact_repo;
pub mod credit_repo;
pub mod project_repo;
pub mod staff_repo;

use crate::db::DbError;
use crate::model::contact::ContactValidationError;
use crate::model::project::ProjectValidationError;
use crate::model::staff::EmployeeTypeValidationError;
use rusqlite::types::Value;
use rusqlite::ErrorCode;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error shared by project, contact and staff persistence.
#[derive(Debug)]
pub enum RepoError {
    ProjectValidation(ProjectValidationError),
    ContactValidation(ContactValidationError),
    EmployeeTypeValidation(EmployeeTypeValidationError),
    Db(DbError),
    NotFound(Uuid),
    /// Another record already uses this slug.
    DuplicateSlug(String),
    /// A written row points at a record that does not exist.
    MissingReference(Uuid),
    /// The record is still referenced and cannot be deleted.
    InUse(Uuid),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ProjectValidation(err) => write!(f, "{err}"),
            Self::ContactValidation(err) => write!(f, "{err}"),
            Self::EmployeeTypeValidation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "record not found: {id}"),
            Self::DuplicateSlug(slug) => write!(f, "slug already in use: `{slug}`"),
            Self::MissingReference(id) => write!(f, "referenced record not found: {id}"),
            Self::InUse(id) => write!(f, "record {id} is still referenced"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::ProjectValidation(err) => Some(err),
            Self::ContactValidation(err) => Some(err),
            Self::EmployeeTypeValidation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound(_)
            | Self::DuplicateSlug(_)
            | Self::MissingReference(_)
            | Self::InUse(_)
            | Self::InvalidData(_) => None,
        }
    }
}

impl From<ProjectValidationError> for RepoError {
    fn from(value: ProjectValidationError) -> Self {
        Self::ProjectValidation(value)
    }
}

impl From<ContactValidationError> for RepoError {
    fn from(value: ContactValidationError) -> Self {
        Self::ContactValidation(value)
    }
}

impl From<EmployeeTypeValidationError> for RepoError {
    fn from(value: EmployeeTypeValidationError) -> Self {
        Self::EmployeeTypeValidation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Maps a write failure, turning slug uniqueness violations into
/// [`RepoError::DuplicateSlug`].
pub(crate) fn map_write_error(err: rusqlite::Error, slug: &str) -> RepoError {
    if let rusqlite::Error::SqliteFailure(failure, Some(message)) = &err {
        if failure.code == ErrorCode::ConstraintViolation && message.contains(".slug") {
            return RepoError::DuplicateSlug(slug.to_string());
        }
    }
    RepoError::from(err)
}

pub(crate) fn is_foreign_key_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY
    )
}

/// Appends `LIMIT`/`OFFSET` clauses and their bind values.
pub(crate) fn push_pagination(
    sql: &mut String,
    bind_values: &mut Vec<Value>,
    limit: Option<u32>,
    offset: u32,
) {
    match limit {
        Some(limit) => {
            sql.push_str(" LIMIT ?");
            bind_values.push(Value::Integer(i64::from(limit)));
        }
        None if offset > 0 => sql.push_str(" LIMIT -1"),
        None => return,
    }
    if offset > 0 {
        sql.push_str(" OFFSET ?");
        bind_values.push(Value::Integer(i64::from(offset)));
    }
}

pub(crate) fn parse_uuid(value: &str, column: &str) -> RepoResult<Uuid> {
    Uuid::parse_str(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid value `{value}` in {column}")))
}

pub(crate) fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}

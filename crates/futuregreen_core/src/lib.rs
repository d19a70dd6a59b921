//! Core domain logic for the FutureGreen studio site.
//! This crate owns the derived-field rules for portfolio projects and
//! contacts: unit normalization, markup rendering and name splitting, plus
//! staff records and project credits.

pub mod config;
pub mod db;
pub mod logging;
pub mod markup;
pub mod model;
pub mod repo;
pub mod search;
pub mod service;

pub use config::SiteConfig;
pub use logging::{default_log_level, init_logging, init_logging_from_config, logging_status};
pub use markup::{strip_tags, Described, MarkupEngine, MarkupMode, MarkupRenderer};
pub use model::contact::{Contact, ContactCategory, ContactId, ContactKind, ContactValidationError};
pub use model::credit::{ProjectCredit, ProjectRole};
pub use model::measurement::{relative_size, Measurement, MeasurementError};
pub use model::name::{split_name, NameError, PersonName};
pub use model::project::{Project, ProjectId, ProjectStatus, ProjectValidationError};
pub use model::slug::{slug_or_fallback, slugify};
pub use model::staff::{
    EmployeeType, EmployeeTypeId, EmployeeTypeValidationError, Employment, EmploymentStatus,
};
pub use model::unit::{convert, AreaUnit, ConversionError};
pub use repo::contact_repo::{ContactListQuery, ContactRepository, SqliteContactRepository};
pub use repo::credit_repo::{CreditRepository, SqliteCreditRepository};
pub use repo::project_repo::{
    Direction, ProjectListQuery, ProjectOrder, ProjectPhase, ProjectRepository,
    SqliteProjectRepository,
};
pub use repo::staff_repo::{EmployeeTypeRepository, SqliteEmployeeTypeRepository};
pub use repo::{RepoError, RepoResult};
pub use search::description_fts::{
    search_descriptions, DescriptionIndex, EntityKind, SearchError, SearchHit, SearchQuery,
    SqliteDescriptionIndex,
};
pub use service::contact_service::{ContactService, ContactServiceError};
pub use service::credit_service::{CreditService, CreditServiceError};
pub use service::project_service::{ProjectService, ProjectServiceError};
pub use service::staff_service::{StaffService, StaffServiceError};
pub use service::SaveOutcome;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

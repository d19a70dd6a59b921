//! Portfolio project use-case service.
//!
//! # Responsibility
//! - Save projects: slug, markup, measurement normalization, persistence.
//! - Compute relative size against the largest live project.
//! - Provide the public listings (recent, by scale, completed, current).
//!
//! # Invariants
//! - Every save re-renders `description_html` with the configured project
//!   markup mode and recomputes `area_normalized`.
//! - Only live projects are kept in the search index.

use crate::config::SiteConfig;
use crate::markup::{Described, MarkupMode, MarkupRenderer};
use crate::model::measurement::{relative_size, MeasurementError};
use crate::model::project::{Project, ProjectId, ProjectValidationError};
use crate::model::slug::slug_or_fallback;
use crate::repo::project_repo::{
    Direction, ProjectListQuery, ProjectOrder, ProjectPhase, ProjectRepository,
};
use crate::repo::{RepoError, RepoResult};
use crate::search::description_fts::{DescriptionIndex, EntityKind, SearchError};
use crate::service::SaveOutcome;
use log::{debug, info};
use rust_decimal::Decimal;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for project use-cases.
#[derive(Debug)]
pub enum ProjectServiceError {
    Measurement(MeasurementError),
    Validation(ProjectValidationError),
    ProjectNotFound(ProjectId),
    DuplicateSlug(String),
    Repo(RepoError),
    Search(SearchError),
}

impl Display for ProjectServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Measurement(err) => write!(f, "{err}"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::ProjectNotFound(id) => write!(f, "project not found: {id}"),
            Self::DuplicateSlug(slug) => write!(f, "project slug already in use: `{slug}`"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::Search(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ProjectServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Measurement(err) => Some(err),
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::Search(err) => Some(err),
            Self::ProjectNotFound(_) | Self::DuplicateSlug(_) => None,
        }
    }
}

impl From<RepoError> for ProjectServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::ProjectNotFound(id),
            RepoError::DuplicateSlug(slug) => Self::DuplicateSlug(slug),
            RepoError::ProjectValidation(err) => Self::Validation(err),
            other => Self::Repo(other),
        }
    }
}

impl From<MeasurementError> for ProjectServiceError {
    fn from(value: MeasurementError) -> Self {
        Self::Measurement(value)
    }
}

impl From<ProjectValidationError> for ProjectServiceError {
    fn from(value: ProjectValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<SearchError> for ProjectServiceError {
    fn from(value: SearchError) -> Self {
        Self::Search(value)
    }
}

/// Project service facade over repository and index implementations.
pub struct ProjectService<R: ProjectRepository, I: DescriptionIndex> {
    repo: R,
    index: I,
    renderer: MarkupRenderer,
    markup: MarkupMode,
}

impl<R: ProjectRepository, I: DescriptionIndex> ProjectService<R, I> {
    /// Creates a service rendering with the built-in engines and the
    /// configured project markup mode.
    pub fn new(repo: R, index: I, config: &SiteConfig) -> Self {
        Self::with_renderer(repo, index, MarkupRenderer::default(), config.project_markup)
    }

    pub fn with_renderer(repo: R, index: I, renderer: MarkupRenderer, markup: MarkupMode) -> Self {
        Self {
            repo,
            index,
            renderer,
            markup,
        }
    }

    /// Saves a project, inserting it when its id is unknown.
    ///
    /// # Contract
    /// - Fills a blank slug from the name.
    /// - Re-renders `description_html` and recomputes `area_normalized`.
    /// - `html_changed` compares against the stored row, so a retry after a
    ///   failed save still reports the change.
    /// - Refreshes the search entry when the HTML changed or the entry is
    ///   missing or stale; non-live projects are removed from the index.
    pub fn save(&self, project: &mut Project) -> Result<SaveOutcome, ProjectServiceError> {
        if project.slug.trim().is_empty() {
            project.slug = slug_or_fallback(&project.name, "project", project.id);
        }
        self.renderer.refresh(project, self.markup);
        project.measurement.normalize()?;
        project.validate()?;

        let stored = self.repo.get_project(project.id)?;
        let created = stored.is_none();
        let stored_html = stored.as_ref().map_or("", |stored| stored.description_html());
        let html_changed = stored_html != project.description_html();
        if created {
            self.repo.create_project(project)?;
        } else {
            self.repo.update_project(project)?;
        }

        if project.is_live() {
            let indexed = self.index.is_current(
                EntityKind::Project,
                project.id,
                project.description_html(),
            )?;
            if html_changed || !indexed {
                self.index
                    .upsert(EntityKind::Project, project.id, project.description_html())?;
                debug!(
                    "event=search_reindex module=service entity=project id={}",
                    project.id
                );
            }
        } else {
            self.index.remove(EntityKind::Project, project.id)?;
        }

        info!(
            "event=project_save module=service status=ok id={} created={} html_changed={} markup={} engine={}",
            project.id,
            created,
            html_changed,
            self.markup,
            self.renderer.engine_name(self.markup)
        );
        Ok(SaveOutcome {
            id: project.id,
            created,
            html_changed,
        })
    }

    pub fn get_project(&self, id: ProjectId) -> RepoResult<Option<Project>> {
        self.repo.get_project(id)
    }

    pub fn get_project_by_slug(&self, slug: &str) -> RepoResult<Option<Project>> {
        self.repo.get_project_by_slug(slug)
    }

    /// Size of `project` as a percentage of the largest live project.
    ///
    /// # Errors
    /// - [`MeasurementError::NoComparisonBasis`] when no live project exists
    ///   or the largest live area is zero.
    pub fn relative_size(&self, project: &Project) -> Result<Decimal, ProjectServiceError> {
        let max = self.repo.max_live_area_normalized()?;
        Ok(relative_size(project.measurement.area_normalized(), max)?)
    }

    /// Live projects, latest end date first.
    pub fn list_live(&self, limit: Option<u32>, offset: u32) -> RepoResult<Vec<Project>> {
        self.repo.list_projects(&ProjectListQuery {
            limit,
            offset,
            ..ProjectListQuery::live()
        })
    }

    pub fn list_featured(&self, limit: Option<u32>) -> RepoResult<Vec<Project>> {
        self.repo.list_projects(&ProjectListQuery {
            featured_only: true,
            limit,
            ..ProjectListQuery::live()
        })
    }

    /// Live projects ordered by normalized area.
    pub fn list_by_scale(&self, ascending: bool) -> RepoResult<Vec<Project>> {
        let order = if ascending {
            ProjectOrder::AreaAscending
        } else {
            ProjectOrder::AreaDescending
        };
        self.repo.list_projects(&ProjectListQuery {
            order,
            ..ProjectListQuery::live()
        })
    }

    /// Live projects whose end date is at or before `as_of` (epoch ms).
    pub fn list_completed(&self, as_of: i64) -> RepoResult<Vec<Project>> {
        self.repo.list_projects(&ProjectListQuery {
            phase: Some(ProjectPhase::Completed { as_of }),
            ..ProjectListQuery::live()
        })
    }

    /// Live projects still in progress at `as_of` (epoch ms).
    pub fn list_current(&self, as_of: i64) -> RepoResult<Vec<Project>> {
        self.repo.list_projects(&ProjectListQuery {
            phase: Some(ProjectPhase::Current { as_of }),
            ..ProjectListQuery::live()
        })
    }

    /// Next project in the newest-first listing, i.e. the next older one.
    pub fn next_project(&self, project: &Project) -> RepoResult<Option<Project>> {
        self.repo.adjacent_live_project(project, Direction::Older)
    }

    /// Previous project in the newest-first listing, i.e. the next newer one.
    pub fn previous_project(&self, project: &Project) -> RepoResult<Option<Project>> {
        self.repo.adjacent_live_project(project, Direction::Newer)
    }

    pub fn delete_project(&self, id: ProjectId) -> Result<(), ProjectServiceError> {
        self.repo.delete_project(id)?;
        self.index.remove(EntityKind::Project, id)?;
        info!("event=project_delete module=service status=ok id={id}");
        Ok(())
    }
}

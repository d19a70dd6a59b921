//! Project repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD and listing APIs over the `projects` table.
//! - Provide the "max normalized area over live projects" aggregate used for
//!   relative size.
//!
//! # Invariants
//! - Decimals are stored as canonical text and parsed back exactly.
//! - Rows whose `area_normalized` disagrees with `area`/`unit` are rejected.

use crate::markup::Described;
use crate::model::measurement::Measurement;
use crate::model::project::{Project, ProjectId, ProjectStatus};
use crate::model::unit::AreaUnit;
use crate::repo::{
    bool_to_int, map_write_error, parse_uuid, push_pagination, RepoError, RepoResult,
};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use rust_decimal::Decimal;

const PROJECT_SELECT_SQL: &str = "SELECT
    uuid,
    name,
    slug,
    short_description,
    description,
    description_html,
    date_start,
    date_end,
    external_url,
    address,
    status,
    featured,
    area,
    unit,
    area_normalized
FROM projects";

/// Sort order for project listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProjectOrder {
    /// Latest `date_end` first, then name.
    #[default]
    Recent,
    /// Smallest normalized area first.
    AreaAscending,
    /// Largest normalized area first.
    AreaDescending,
}

/// Completion filter relative to a reference instant (epoch ms).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectPhase {
    /// `date_end <= as_of`.
    Completed { as_of: i64 },
    /// `date_end > as_of`.
    Current { as_of: i64 },
}

/// Neighbor direction within the newest-first listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Older,
    Newer,
}

/// Query options for listing projects.
#[derive(Debug, Clone, Default)]
pub struct ProjectListQuery {
    pub status: Option<ProjectStatus>,
    pub featured_only: bool,
    pub phase: Option<ProjectPhase>,
    pub order: ProjectOrder,
    pub limit: Option<u32>,
    pub offset: u32,
}

impl ProjectListQuery {
    /// Live projects in the default order.
    pub fn live() -> Self {
        Self {
            status: Some(ProjectStatus::Live),
            ..Self::default()
        }
    }
}

/// Repository interface for project persistence.
pub trait ProjectRepository {
    fn create_project(&self, project: &Project) -> RepoResult<ProjectId>;
    fn update_project(&self, project: &Project) -> RepoResult<()>;
    fn get_project(&self, id: ProjectId) -> RepoResult<Option<Project>>;
    fn get_project_by_slug(&self, slug: &str) -> RepoResult<Option<Project>>;
    fn list_projects(&self, query: &ProjectListQuery) -> RepoResult<Vec<Project>>;
    /// Largest `area_normalized` among live projects, `None` when none exist.
    fn max_live_area_normalized(&self) -> RepoResult<Option<Decimal>>;
    /// Neighbor of `project` in the `Recent` listing order
    /// (`date_end` desc, then name, then id).
    fn adjacent_live_project(
        &self,
        project: &Project,
        direction: Direction,
    ) -> RepoResult<Option<Project>>;
    fn delete_project(&self, id: ProjectId) -> RepoResult<()>;
}

/// SQLite-backed project repository.
pub struct SqliteProjectRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteProjectRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn query_projects(&self, sql: &str, bind_values: Vec<Value>) -> RepoResult<Vec<Project>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut projects = Vec::new();
        while let Some(row) = rows.next()? {
            projects.push(parse_project_row(row)?);
        }
        Ok(projects)
    }
}

impl ProjectRepository for SqliteProjectRepository<'_> {
    fn create_project(&self, project: &Project) -> RepoResult<ProjectId> {
        project.validate()?;
        let measurement = &project.measurement;

        self.conn
            .execute(
                "INSERT INTO projects (
                    uuid,
                    name,
                    slug,
                    short_description,
                    description,
                    description_html,
                    date_start,
                    date_end,
                    external_url,
                    address,
                    status,
                    featured,
                    area,
                    unit,
                    area_normalized
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15);",
                params![
                    project.id.to_string(),
                    project.name.as_str(),
                    project.slug.as_str(),
                    project.short_description.as_str(),
                    project.description.as_str(),
                    project.description_html(),
                    project.date_start,
                    project.date_end,
                    project.external_url.as_str(),
                    project.address.as_deref(),
                    project.status.as_str(),
                    bool_to_int(project.featured),
                    measurement.area().to_string(),
                    measurement.unit().as_str(),
                    measurement.area_normalized().to_string(),
                ],
            )
            .map_err(|err| map_write_error(err, &project.slug))?;

        Ok(project.id)
    }

    fn update_project(&self, project: &Project) -> RepoResult<()> {
        project.validate()?;
        let measurement = &project.measurement;

        let changed = self
            .conn
            .execute(
                "UPDATE projects
                 SET
                    name = ?1,
                    slug = ?2,
                    short_description = ?3,
                    description = ?4,
                    description_html = ?5,
                    date_start = ?6,
                    date_end = ?7,
                    external_url = ?8,
                    address = ?9,
                    status = ?10,
                    featured = ?11,
                    area = ?12,
                    unit = ?13,
                    area_normalized = ?14,
                    updated_at = (strftime('%s', 'now') * 1000)
                 WHERE uuid = ?15;",
                params![
                    project.name.as_str(),
                    project.slug.as_str(),
                    project.short_description.as_str(),
                    project.description.as_str(),
                    project.description_html(),
                    project.date_start,
                    project.date_end,
                    project.external_url.as_str(),
                    project.address.as_deref(),
                    project.status.as_str(),
                    bool_to_int(project.featured),
                    measurement.area().to_string(),
                    measurement.unit().as_str(),
                    measurement.area_normalized().to_string(),
                    project.id.to_string(),
                ],
            )
            .map_err(|err| map_write_error(err, &project.slug))?;

        if changed == 0 {
            return Err(RepoError::NotFound(project.id));
        }
        Ok(())
    }

    fn get_project(&self, id: ProjectId) -> RepoResult<Option<Project>> {
        let sql = format!("{PROJECT_SELECT_SQL} WHERE uuid = ?");
        let mut found = self.query_projects(&sql, vec![Value::Text(id.to_string())])?;
        Ok(found.pop())
    }

    fn get_project_by_slug(&self, slug: &str) -> RepoResult<Option<Project>> {
        let sql = format!("{PROJECT_SELECT_SQL} WHERE slug = ?");
        let mut found = self.query_projects(&sql, vec![Value::Text(slug.to_string())])?;
        Ok(found.pop())
    }

    fn list_projects(&self, query: &ProjectListQuery) -> RepoResult<Vec<Project>> {
        let mut sql = format!("{PROJECT_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(status) = query.status {
            sql.push_str(" AND status = ?");
            bind_values.push(Value::Text(status.as_str().to_string()));
        }
        if query.featured_only {
            sql.push_str(" AND featured = 1");
        }
        match query.phase {
            Some(ProjectPhase::Completed { as_of }) => {
                sql.push_str(" AND date_end <= ?");
                bind_values.push(Value::Integer(as_of));
            }
            Some(ProjectPhase::Current { as_of }) => {
                sql.push_str(" AND date_end > ?");
                bind_values.push(Value::Integer(as_of));
            }
            None => {}
        }

        sql.push_str(match query.order {
            ProjectOrder::Recent => " ORDER BY date_end DESC, name ASC, uuid ASC",
            ProjectOrder::AreaAscending => {
                " ORDER BY CAST(area_normalized AS REAL) ASC, name ASC, uuid ASC"
            }
            ProjectOrder::AreaDescending => {
                " ORDER BY CAST(area_normalized AS REAL) DESC, name ASC, uuid ASC"
            }
        });
        push_pagination(&mut sql, &mut bind_values, query.limit, query.offset);

        self.query_projects(&sql, bind_values)
    }

    fn max_live_area_normalized(&self) -> RepoResult<Option<Decimal>> {
        let mut stmt = self
            .conn
            .prepare("SELECT area_normalized FROM projects WHERE status = 'live';")?;
        let mut rows = stmt.query([])?;
        let mut max: Option<Decimal> = None;

        // Folded in Rust so the comparison stays exact decimal arithmetic.
        while let Some(row) = rows.next()? {
            let text: String = row.get(0)?;
            let value = parse_decimal(&text, "projects.area_normalized")?;
            max = Some(max.map_or(value, |current| current.max(value)));
        }
        Ok(max)
    }

    fn adjacent_live_project(
        &self,
        project: &Project,
        direction: Direction,
    ) -> RepoResult<Option<Project>> {
        let clause = match direction {
            Direction::Older => {
                " AND (date_end < ?1 OR (date_end = ?1
                      AND (name > ?2 OR (name = ?2 AND uuid > ?3))))
                  ORDER BY date_end DESC, name ASC, uuid ASC LIMIT 1"
            }
            Direction::Newer => {
                " AND (date_end > ?1 OR (date_end = ?1
                      AND (name < ?2 OR (name = ?2 AND uuid < ?3))))
                  ORDER BY date_end ASC, name DESC, uuid DESC LIMIT 1"
            }
        };
        let sql = format!("{PROJECT_SELECT_SQL} WHERE status = 'live'{clause}");
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params![
            project.date_end,
            project.name,
            project.id.to_string()
        ])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_project_row(row)?)),
            None => Ok(None),
        }
    }

    fn delete_project(&self, id: ProjectId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM projects WHERE uuid = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }
        Ok(())
    }
}

fn parse_project_row(row: &Row<'_>) -> RepoResult<Project> {
    let uuid_text: String = row.get("uuid")?;
    let id = parse_uuid(&uuid_text, "projects.uuid")?;

    let status_text: String = row.get("status")?;
    let status = ProjectStatus::parse(&status_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid status `{status_text}` in projects.status"))
    })?;

    let unit_text: String = row.get("unit")?;
    let unit = AreaUnit::parse(&unit_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid unit `{unit_text}` in projects.unit"))
    })?;

    let featured = match row.get::<_, i64>("featured")? {
        0 => false,
        1 => true,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid featured value `{other}` in projects.featured"
            )));
        }
    };

    let area = parse_decimal(&row.get::<_, String>("area")?, "projects.area")?;
    let area_normalized = parse_decimal(
        &row.get::<_, String>("area_normalized")?,
        "projects.area_normalized",
    )?;
    let measurement = Measurement::from_stored(area, unit, area_normalized)
        .map_err(|message| RepoError::InvalidData(format!("project {id}: {message}")))?;

    let project = Project {
        id,
        name: row.get("name")?,
        slug: row.get("slug")?,
        short_description: row.get("short_description")?,
        description: row.get("description")?,
        description_html: row.get("description_html")?,
        date_start: row.get("date_start")?,
        date_end: row.get("date_end")?,
        external_url: row.get("external_url")?,
        address: row.get("address")?,
        status,
        featured,
        measurement,
    };
    project.validate()?;
    Ok(project)
}

fn parse_decimal(value: &str, column: &str) -> RepoResult<Decimal> {
    value
        .parse::<Decimal>()
        .map_err(|_| RepoError::InvalidData(format!("invalid decimal `{value}` in {column}")))
}

//! Project credit persistence (`project_contacts`).
//!
//! # Invariants
//! - A contact holds a given role on a project at most once.
//! - Credits disappear with their project or contact.

use crate::model::contact::ContactId;
use crate::model::credit::{ProjectCredit, ProjectRole};
use crate::model::project::ProjectId;
use crate::repo::{is_foreign_key_violation, parse_uuid, RepoError, RepoResult};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};

const ROLE_RANK_SQL: &str = "CASE project_contacts.role
        WHEN 'designer' THEN 1
        WHEN 'builder' THEN 2
        WHEN 'client' THEN 3
        ELSE 4
    END";

pub trait CreditRepository {
    /// Returns `false` when the credit already existed.
    fn add_credit(&self, credit: &ProjectCredit) -> RepoResult<bool>;
    /// Returns `false` when there was nothing to remove.
    fn remove_credit(&self, credit: &ProjectCredit) -> RepoResult<bool>;
    /// Credits on one project by role rank, then contact name.
    fn list_project_credits(
        &self,
        project_id: ProjectId,
        role: Option<ProjectRole>,
    ) -> RepoResult<Vec<ProjectCredit>>;
    /// Credits held by one contact, most recently finished project first.
    fn list_contact_credits(&self, contact_id: ContactId) -> RepoResult<Vec<ProjectCredit>>;
}

pub struct SqliteCreditRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCreditRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn query_credits(&self, sql: &str, bind_values: Vec<Value>) -> RepoResult<Vec<ProjectCredit>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut credits = Vec::new();
        while let Some(row) = rows.next()? {
            credits.push(parse_credit_row(row)?);
        }
        Ok(credits)
    }
}

impl CreditRepository for SqliteCreditRepository<'_> {
    fn add_credit(&self, credit: &ProjectCredit) -> RepoResult<bool> {
        let inserted = self
            .conn
            .execute(
                "INSERT INTO project_contacts (project_uuid, contact_uuid, role)
                 VALUES (?1, ?2, ?3)
                 ON CONFLICT DO NOTHING;",
                params![
                    credit.project_id.to_string(),
                    credit.contact_id.to_string(),
                    credit.role.as_str(),
                ],
            )
            .map_err(|err| {
                if is_foreign_key_violation(&err) {
                    RepoError::MissingReference(credit.project_id)
                } else {
                    RepoError::from(err)
                }
            })?;
        Ok(inserted == 1)
    }

    fn remove_credit(&self, credit: &ProjectCredit) -> RepoResult<bool> {
        let removed = self.conn.execute(
            "DELETE FROM project_contacts
             WHERE project_uuid = ?1 AND contact_uuid = ?2 AND role = ?3;",
            params![
                credit.project_id.to_string(),
                credit.contact_id.to_string(),
                credit.role.as_str(),
            ],
        )?;
        Ok(removed == 1)
    }

    fn list_project_credits(
        &self,
        project_id: ProjectId,
        role: Option<ProjectRole>,
    ) -> RepoResult<Vec<ProjectCredit>> {
        let mut sql = String::from(
            "SELECT project_contacts.project_uuid, project_contacts.contact_uuid, project_contacts.role
             FROM project_contacts
             JOIN contacts ON contacts.uuid = project_contacts.contact_uuid
             WHERE project_contacts.project_uuid = ?",
        );
        let mut bind_values = vec![Value::Text(project_id.to_string())];
        if let Some(role) = role {
            sql.push_str(" AND project_contacts.role = ?");
            bind_values.push(Value::Text(role.as_str().to_string()));
        }
        sql.push_str(&format!(
            " ORDER BY {ROLE_RANK_SQL}, contacts.name ASC, contacts.uuid ASC;"
        ));
        self.query_credits(&sql, bind_values)
    }

    fn list_contact_credits(&self, contact_id: ContactId) -> RepoResult<Vec<ProjectCredit>> {
        let sql = format!(
            "SELECT project_contacts.project_uuid, project_contacts.contact_uuid, project_contacts.role
             FROM project_contacts
             JOIN projects ON projects.uuid = project_contacts.project_uuid
             WHERE project_contacts.contact_uuid = ?
             ORDER BY projects.date_end DESC, projects.name ASC, {ROLE_RANK_SQL};"
        );
        self.query_credits(&sql, vec![Value::Text(contact_id.to_string())])
    }
}

fn parse_credit_row(row: &Row<'_>) -> RepoResult<ProjectCredit> {
    let project_text: String = row.get(0)?;
    let contact_text: String = row.get(1)?;
    let role_text: String = row.get(2)?;
    let role = ProjectRole::parse(&role_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid role `{role_text}` in project_contacts.role"
        ))
    })?;

    Ok(ProjectCredit {
        project_id: parse_uuid(&project_text, "project_contacts.project_uuid")?,
        contact_id: parse_uuid(&contact_text, "project_contacts.contact_uuid")?,
        role,
    })
}

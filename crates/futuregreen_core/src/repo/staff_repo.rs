//! Employee type persistence.

use crate::model::staff::{EmployeeType, EmployeeTypeId};
use crate::repo::{is_foreign_key_violation, map_write_error, parse_uuid, RepoError, RepoResult};
use rusqlite::{params, Connection, Row};

const EMPLOYEE_TYPE_SELECT_SQL: &str = "SELECT uuid, name, slug, description FROM employee_types";

pub trait EmployeeTypeRepository {
    fn create_employee_type(&self, employee_type: &EmployeeType) -> RepoResult<EmployeeTypeId>;
    fn update_employee_type(&self, employee_type: &EmployeeType) -> RepoResult<()>;
    fn get_employee_type(&self, id: EmployeeTypeId) -> RepoResult<Option<EmployeeType>>;
    fn get_employee_type_by_slug(&self, slug: &str) -> RepoResult<Option<EmployeeType>>;
    /// All types ordered by name.
    fn list_employee_types(&self) -> RepoResult<Vec<EmployeeType>>;
    /// Fails with [`RepoError::InUse`] while any employee has this type.
    fn delete_employee_type(&self, id: EmployeeTypeId) -> RepoResult<()>;
}

pub struct SqliteEmployeeTypeRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteEmployeeTypeRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn query_one(&self, sql: &str, key: String) -> RepoResult<Option<EmployeeType>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query([key])?;
        let found = match rows.next()? {
            Some(row) => Some(parse_employee_type_row(row)?),
            None => None,
        };
        Ok(found)
    }
}

impl EmployeeTypeRepository for SqliteEmployeeTypeRepository<'_> {
    fn create_employee_type(&self, employee_type: &EmployeeType) -> RepoResult<EmployeeTypeId> {
        employee_type.validate()?;
        self.conn
            .execute(
                "INSERT INTO employee_types (uuid, name, slug, description)
                 VALUES (?1, ?2, ?3, ?4);",
                params![
                    employee_type.id.to_string(),
                    employee_type.name.as_str(),
                    employee_type.slug.as_str(),
                    employee_type.description.as_str(),
                ],
            )
            .map_err(|err| map_write_error(err, &employee_type.slug))?;
        Ok(employee_type.id)
    }

    fn update_employee_type(&self, employee_type: &EmployeeType) -> RepoResult<()> {
        employee_type.validate()?;
        let changed = self
            .conn
            .execute(
                "UPDATE employee_types SET name = ?1, slug = ?2, description = ?3 WHERE uuid = ?4;",
                params![
                    employee_type.name.as_str(),
                    employee_type.slug.as_str(),
                    employee_type.description.as_str(),
                    employee_type.id.to_string(),
                ],
            )
            .map_err(|err| map_write_error(err, &employee_type.slug))?;
        if changed == 0 {
            return Err(RepoError::NotFound(employee_type.id));
        }
        Ok(())
    }

    fn get_employee_type(&self, id: EmployeeTypeId) -> RepoResult<Option<EmployeeType>> {
        let sql = format!("{EMPLOYEE_TYPE_SELECT_SQL} WHERE uuid = ?1;");
        self.query_one(&sql, id.to_string())
    }

    fn get_employee_type_by_slug(&self, slug: &str) -> RepoResult<Option<EmployeeType>> {
        let sql = format!("{EMPLOYEE_TYPE_SELECT_SQL} WHERE slug = ?1;");
        self.query_one(&sql, slug.to_string())
    }

    fn list_employee_types(&self) -> RepoResult<Vec<EmployeeType>> {
        let sql = format!("{EMPLOYEE_TYPE_SELECT_SQL} ORDER BY name ASC, uuid ASC;");
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query([])?;
        let mut types = Vec::new();
        while let Some(row) = rows.next()? {
            types.push(parse_employee_type_row(row)?);
        }
        Ok(types)
    }

    fn delete_employee_type(&self, id: EmployeeTypeId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute(
                "DELETE FROM employee_types WHERE uuid = ?1;",
                [id.to_string()],
            )
            .map_err(|err| {
                if is_foreign_key_violation(&err) {
                    RepoError::InUse(id)
                } else {
                    RepoError::from(err)
                }
            })?;
        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }
        Ok(())
    }
}

fn parse_employee_type_row(row: &Row<'_>) -> RepoResult<EmployeeType> {
    let uuid_text: String = row.get("uuid")?;
    let employee_type = EmployeeType {
        id: parse_uuid(&uuid_text, "employee_types.uuid")?,
        name: row.get("name")?,
        slug: row.get("slug")?,
        description: row.get("description")?,
    };
    employee_type.validate()?;
    Ok(employee_type)
}

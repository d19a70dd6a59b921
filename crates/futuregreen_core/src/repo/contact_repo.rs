//! Contact repository contracts and SQLite implementation.
//!
//! # Invariants
//! - Name-part columns are blank for every non-person row.
//! - Employment lives in `employees`, written in the same transaction as the
//!   contact row; an `employees` row exists only for staff.
//! - Listing order is kind rank (person first), then name.

use crate::markup::Described;
use crate::model::contact::{Contact, ContactCategory, ContactId, ContactKind};
use crate::model::name::PersonName;
use crate::model::staff::{EmployeeTypeId, Employment, EmploymentStatus};
use crate::repo::{
    is_foreign_key_violation, map_write_error, parse_uuid, push_pagination, RepoError, RepoResult,
};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};

const CONTACT_SELECT_SQL: &str = "SELECT
    uuid,
    contact_type,
    name,
    slug,
    description,
    description_html,
    first_name,
    middle_name,
    last_name,
    address_line1,
    address_line2,
    city,
    state,
    postal_code,
    country,
    email,
    phone,
    mobile,
    fax,
    website,
    employees.employee_type_uuid AS employee_type_uuid,
    employees.job_title AS job_title,
    employees.status AS employment_status
FROM contacts
LEFT JOIN employees ON employees.contact_uuid = contacts.uuid";

const CONTACT_ORDER_SQL: &str = " ORDER BY CASE contact_type
        WHEN 'person' THEN 1
        WHEN 'commercial' THEN 2
        WHEN 'educational' THEN 3
        WHEN 'non_profit' THEN 4
        ELSE 5
    END, name ASC, uuid ASC";

/// Query options for listing contacts.
#[derive(Debug, Clone, Default)]
pub struct ContactListQuery {
    pub category: Option<ContactCategory>,
    /// Only contacts with employment.
    pub staff_only: bool,
    pub employee_type: Option<EmployeeTypeId>,
    pub employment_status: Option<EmploymentStatus>,
    pub limit: Option<u32>,
    pub offset: u32,
}

/// Repository interface for contact persistence.
pub trait ContactRepository {
    fn create_contact(&self, contact: &Contact) -> RepoResult<ContactId>;
    fn update_contact(&self, contact: &Contact) -> RepoResult<()>;
    fn get_contact(&self, id: ContactId) -> RepoResult<Option<Contact>>;
    fn get_contact_by_slug(&self, slug: &str) -> RepoResult<Option<Contact>>;
    fn list_contacts(&self, query: &ContactListQuery) -> RepoResult<Vec<Contact>>;
    fn delete_contact(&self, id: ContactId) -> RepoResult<()>;
}

/// SQLite-backed contact repository.
pub struct SqliteContactRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteContactRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn query_contacts(&self, sql: &str, bind_values: Vec<Value>) -> RepoResult<Vec<Contact>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut contacts = Vec::new();
        while let Some(row) = rows.next()? {
            contacts.push(parse_contact_row(row)?);
        }
        Ok(contacts)
    }
}

impl ContactRepository for SqliteContactRepository<'_> {
    fn create_contact(&self, contact: &Contact) -> RepoResult<ContactId> {
        contact.validate()?;
        let parts = name_columns(contact);
        let tx = self.conn.unchecked_transaction()?;

        tx.execute(
            "INSERT INTO contacts (
                uuid,
                contact_type,
                name,
                slug,
                description,
                description_html,
                first_name,
                middle_name,
                last_name,
                address_line1,
                address_line2,
                city,
                state,
                postal_code,
                country,
                email,
                phone,
                mobile,
                fax,
                website
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10,
                      ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20);",
            params![
                contact.id.to_string(),
                contact.category().as_str(),
                contact.name.as_str(),
                contact.slug.as_str(),
                contact.description.as_str(),
                contact.description_html(),
                parts.first_name,
                parts.middle_name,
                parts.last_name,
                contact.address_line1.as_str(),
                contact.address_line2.as_str(),
                contact.city.as_str(),
                contact.state.as_str(),
                contact.postal_code.as_str(),
                contact.country.as_str(),
                contact.email.as_str(),
                contact.phone.as_str(),
                contact.mobile.as_str(),
                contact.fax.as_str(),
                contact.website.as_str(),
            ],
        )
        .map_err(|err| map_write_error(err, &contact.slug))?;
        write_employment(&tx, contact)?;
        tx.commit()?;

        Ok(contact.id)
    }

    fn update_contact(&self, contact: &Contact) -> RepoResult<()> {
        contact.validate()?;
        let parts = name_columns(contact);
        let tx = self.conn.unchecked_transaction()?;

        let changed = tx
            .execute(
                "UPDATE contacts
                 SET
                    contact_type = ?1,
                    name = ?2,
                    slug = ?3,
                    description = ?4,
                    description_html = ?5,
                    first_name = ?6,
                    middle_name = ?7,
                    last_name = ?8,
                    address_line1 = ?9,
                    address_line2 = ?10,
                    city = ?11,
                    state = ?12,
                    postal_code = ?13,
                    country = ?14,
                    email = ?15,
                    phone = ?16,
                    mobile = ?17,
                    fax = ?18,
                    website = ?19,
                    updated_at = (strftime('%s', 'now') * 1000)
                 WHERE uuid = ?20;",
                params![
                    contact.category().as_str(),
                    contact.name.as_str(),
                    contact.slug.as_str(),
                    contact.description.as_str(),
                    contact.description_html(),
                    parts.first_name,
                    parts.middle_name,
                    parts.last_name,
                    contact.address_line1.as_str(),
                    contact.address_line2.as_str(),
                    contact.city.as_str(),
                    contact.state.as_str(),
                    contact.postal_code.as_str(),
                    contact.country.as_str(),
                    contact.email.as_str(),
                    contact.phone.as_str(),
                    contact.mobile.as_str(),
                    contact.fax.as_str(),
                    contact.website.as_str(),
                    contact.id.to_string(),
                ],
            )
            .map_err(|err| map_write_error(err, &contact.slug))?;

        if changed == 0 {
            return Err(RepoError::NotFound(contact.id));
        }
        write_employment(&tx, contact)?;
        tx.commit()?;
        Ok(())
    }

    fn get_contact(&self, id: ContactId) -> RepoResult<Option<Contact>> {
        let sql = format!("{CONTACT_SELECT_SQL} WHERE contacts.uuid = ?");
        let mut found = self.query_contacts(&sql, vec![Value::Text(id.to_string())])?;
        Ok(found.pop())
    }

    fn get_contact_by_slug(&self, slug: &str) -> RepoResult<Option<Contact>> {
        let sql = format!("{CONTACT_SELECT_SQL} WHERE slug = ?");
        let mut found = self.query_contacts(&sql, vec![Value::Text(slug.to_string())])?;
        Ok(found.pop())
    }

    fn list_contacts(&self, query: &ContactListQuery) -> RepoResult<Vec<Contact>> {
        let mut sql = format!("{CONTACT_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(category) = query.category {
            sql.push_str(" AND contact_type = ?");
            bind_values.push(Value::Text(category.as_str().to_string()));
        }
        if query.staff_only {
            sql.push_str(" AND employees.contact_uuid IS NOT NULL");
        }
        if let Some(employee_type) = query.employee_type {
            sql.push_str(" AND employees.employee_type_uuid = ?");
            bind_values.push(Value::Text(employee_type.to_string()));
        }
        if let Some(status) = query.employment_status {
            sql.push_str(" AND employees.status = ?");
            bind_values.push(Value::Text(status.as_str().to_string()));
        }
        sql.push_str(CONTACT_ORDER_SQL);
        push_pagination(&mut sql, &mut bind_values, query.limit, query.offset);

        self.query_contacts(&sql, bind_values)
    }

    fn delete_contact(&self, id: ContactId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM contacts WHERE uuid = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }
        Ok(())
    }
}

fn write_employment(conn: &Connection, contact: &Contact) -> RepoResult<()> {
    let Some(employment) = &contact.employment else {
        conn.execute(
            "DELETE FROM employees WHERE contact_uuid = ?1;",
            [contact.id.to_string()],
        )?;
        return Ok(());
    };

    conn.execute(
        "INSERT INTO employees (contact_uuid, employee_type_uuid, job_title, status)
         VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT (contact_uuid) DO UPDATE SET
            employee_type_uuid = excluded.employee_type_uuid,
            job_title = excluded.job_title,
            status = excluded.status;",
        params![
            contact.id.to_string(),
            employment.employee_type_id.to_string(),
            employment.job_title.as_str(),
            employment.status.as_str(),
        ],
    )
    .map_err(|err| {
        if is_foreign_key_violation(&err) {
            RepoError::MissingReference(employment.employee_type_id)
        } else {
            RepoError::from(err)
        }
    })?;
    Ok(())
}

struct NameColumns<'a> {
    first_name: &'a str,
    middle_name: &'a str,
    last_name: &'a str,
}

fn name_columns(contact: &Contact) -> NameColumns<'_> {
    match contact.person_name() {
        Some(parts) => NameColumns {
            first_name: &parts.first_name,
            middle_name: &parts.middle_name,
            last_name: &parts.last_name,
        },
        None => NameColumns {
            first_name: "",
            middle_name: "",
            last_name: "",
        },
    }
}

fn parse_contact_row(row: &Row<'_>) -> RepoResult<Contact> {
    let uuid_text: String = row.get("uuid")?;
    let id = parse_uuid(&uuid_text, "contacts.uuid")?;

    let type_text: String = row.get("contact_type")?;
    let category = ContactCategory::parse(&type_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid contact type `{type_text}` in contacts.contact_type"
        ))
    })?;

    let parts = PersonName {
        first_name: row.get("first_name")?,
        middle_name: row.get("middle_name")?,
        last_name: row.get("last_name")?,
    };
    let kind = match category {
        ContactCategory::Person => ContactKind::Person(parts),
        other if parts == PersonName::default() => ContactKind::from_category(other),
        other => {
            return Err(RepoError::InvalidData(format!(
                "contact {id} of type `{}` has name parts",
                other.as_str()
            )));
        }
    };

    let contact = Contact {
        id,
        kind,
        name: row.get("name")?,
        slug: row.get("slug")?,
        description: row.get("description")?,
        description_html: row.get("description_html")?,
        address_line1: row.get("address_line1")?,
        address_line2: row.get("address_line2")?,
        city: row.get("city")?,
        state: row.get("state")?,
        postal_code: row.get("postal_code")?,
        country: row.get("country")?,
        email: row.get("email")?,
        phone: row.get("phone")?,
        mobile: row.get("mobile")?,
        fax: row.get("fax")?,
        website: row.get("website")?,
        employment: parse_employment(row, id)?,
    };
    contact.validate()?;
    Ok(contact)
}

fn parse_employment(row: &Row<'_>, id: ContactId) -> RepoResult<Option<Employment>> {
    let Some(type_text) = row.get::<_, Option<String>>("employee_type_uuid")? else {
        return Ok(None);
    };
    let status_text: String = row.get("employment_status")?;
    let status = EmploymentStatus::parse(&status_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid employment status `{status_text}` for contact {id}"
        ))
    })?;

    Ok(Some(Employment {
        employee_type_id: parse_uuid(&type_text, "employees.employee_type_uuid")?,
        job_title: row.get("job_title")?,
        status,
    }))
}

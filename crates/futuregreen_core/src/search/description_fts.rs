//! SQLite FTS5 description index.

use crate::db::DbError;
use crate::markup::strip_tags;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub type SearchResult<T> = Result<T, SearchError>;

/// Search-layer error for query parsing, DB interaction and row decoding.
#[derive(Debug)]
pub enum SearchError {
    /// Raw query text is not a valid FTS5 expression.
    InvalidQuery {
        query: String,
        message: String,
    },
    Db(DbError),
    InvalidData(String),
}

impl Display for SearchError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidQuery { query, message } => {
                write!(f, "invalid full-text query `{query}`: {message}")
            }
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid search row: {message}"),
        }
    }
}

impl Error for SearchError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::InvalidQuery { .. } | Self::InvalidData(_) => None,
        }
    }
}

impl From<rusqlite::Error> for SearchError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Kind of record a description belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Project,
    Contact,
}

impl EntityKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Project => "project",
            Self::Contact => "contact",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "project" => Some(Self::Project),
            "contact" => Some(Self::Contact),
            _ => None,
        }
    }
}

/// Index maintenance used by the save path.
pub trait DescriptionIndex {
    /// Replaces the indexed text for one entity.
    fn upsert(&self, kind: EntityKind, id: Uuid, description_html: &str) -> SearchResult<()>;
    /// Drops the entity from the index; missing entries are not an error.
    fn remove(&self, kind: EntityKind, id: Uuid) -> SearchResult<()>;
    fn contains(&self, kind: EntityKind, id: Uuid) -> SearchResult<bool>;
    /// Whether the entry exists and holds the text `description_html`
    /// indexes to.
    fn is_current(&self, kind: EntityKind, id: Uuid, description_html: &str) -> SearchResult<bool>;
}

/// FTS5-backed description index.
pub struct SqliteDescriptionIndex<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteDescriptionIndex<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl DescriptionIndex for SqliteDescriptionIndex<'_> {
    fn upsert(&self, kind: EntityKind, id: Uuid, description_html: &str) -> SearchResult<()> {
        self.remove(kind, id)?;
        self.conn.execute(
            "INSERT INTO description_fts (body, entity_kind, entity_id) VALUES (?1, ?2, ?3);",
            params![strip_tags(description_html), kind.as_str(), id.to_string()],
        )?;
        Ok(())
    }

    fn remove(&self, kind: EntityKind, id: Uuid) -> SearchResult<()> {
        self.conn.execute(
            "DELETE FROM description_fts WHERE entity_kind = ?1 AND entity_id = ?2;",
            params![kind.as_str(), id.to_string()],
        )?;
        Ok(())
    }

    fn contains(&self, kind: EntityKind, id: Uuid) -> SearchResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(
                SELECT 1 FROM description_fts WHERE entity_kind = ?1 AND entity_id = ?2
            );",
            params![kind.as_str(), id.to_string()],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }

    fn is_current(&self, kind: EntityKind, id: Uuid, description_html: &str) -> SearchResult<bool> {
        let mut stmt = self.conn.prepare(
            "SELECT body FROM description_fts WHERE entity_kind = ?1 AND entity_id = ?2;",
        )?;
        let mut rows = stmt.query(params![kind.as_str(), id.to_string()])?;
        let current = match rows.next()? {
            Some(row) => row.get::<_, String>(0)? == strip_tags(description_html),
            None => false,
        };
        Ok(current)
    }
}

/// Search options.
#[derive(Debug, Clone)]
pub struct SearchQuery {
    pub text: String,
    pub kind: Option<EntityKind>,
    pub limit: u32,
    /// Pass `text` through as a raw FTS5 expression instead of quoting terms.
    pub raw_fts_syntax: bool,
}

impl SearchQuery {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: None,
            limit: 20,
            raw_fts_syntax: false,
        }
    }
}

/// Single ranked search hit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub entity_id: Uuid,
    pub kind: EntityKind,
    pub snippet: String,
}

/// Searches indexed descriptions; blank queries return no hits.
pub fn search_descriptions(conn: &Connection, query: &SearchQuery) -> SearchResult<Vec<SearchHit>> {
    let Some(match_expr) = build_match_expression(query) else {
        return Ok(Vec::new());
    };
    if query.limit == 0 {
        return Ok(Vec::new());
    }

    let mut sql = String::from(
        "SELECT
            entity_id,
            entity_kind,
            snippet(description_fts, 0, '[', ']', ' ... ', 10) AS snippet
         FROM description_fts
         WHERE description_fts MATCH ?",
    );
    let mut bind_values: Vec<Value> = vec![Value::Text(match_expr.clone())];

    if let Some(kind) = query.kind {
        sql.push_str(" AND entity_kind = ?");
        bind_values.push(Value::Text(kind.as_str().to_string()));
    }
    sql.push_str(" ORDER BY bm25(description_fts), entity_id ASC LIMIT ?");
    bind_values.push(Value::Integer(i64::from(query.limit)));

    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt
        .query(params_from_iter(bind_values))
        .map_err(|err| map_query_error(err, &match_expr))?;
    let mut hits = Vec::new();
    while let Some(row) = rows
        .next()
        .map_err(|err| map_query_error(err, &match_expr))?
    {
        hits.push(parse_search_hit(row)?);
    }
    Ok(hits)
}

fn parse_search_hit(row: &Row<'_>) -> SearchResult<SearchHit> {
    let id_text: String = row.get("entity_id")?;
    let entity_id = Uuid::parse_str(&id_text)
        .map_err(|_| SearchError::InvalidData(format!("invalid uuid `{id_text}`")))?;

    let kind_text: String = row.get("entity_kind")?;
    let kind = EntityKind::parse(&kind_text)
        .ok_or_else(|| SearchError::InvalidData(format!("invalid kind `{kind_text}`")))?;

    Ok(SearchHit {
        entity_id,
        kind,
        snippet: row.get("snippet")?,
    })
}

fn build_match_expression(query: &SearchQuery) -> Option<String> {
    let text = query.text.trim();
    if text.is_empty() {
        return None;
    }
    if query.raw_fts_syntax {
        return Some(text.to_string());
    }

    // Quote each term so user punctuation is never parsed as FTS syntax.
    let terms = text
        .split_whitespace()
        .map(|term| format!("\"{}\"", term.replace('"', "\"\"")))
        .collect::<Vec<_>>();
    Some(terms.join(" AND "))
}

fn map_query_error(err: rusqlite::Error, query: &str) -> SearchError {
    let is_syntax_error = matches!(
        &err,
        rusqlite::Error::SqliteFailure(_, Some(message))
            if message.to_lowercase().contains("syntax")
                || message.contains("malformed MATCH")
                || message.contains("unterminated")
    );
    if is_syntax_error {
        return SearchError::InvalidQuery {
            query: query.to_string(),
            message: err.to_string(),
        };
    }
    SearchError::Db(DbError::Sqlite(err))
}

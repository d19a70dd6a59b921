use futuregreen_core::db::open_db_in_memory;
use futuregreen_core::{
    search_descriptions, DescriptionIndex, EntityKind, SearchError, SearchQuery,
    SqliteDescriptionIndex,
};
use uuid::Uuid;

#[test]
fn upsert_replaces_previous_text() {
    let conn = open_db_in_memory().unwrap();
    let index = SqliteDescriptionIndex::new(&conn);
    let id = Uuid::new_v4();

    index
        .upsert(EntityKind::Project, id, "<p>alpha bioswale</p>")
        .unwrap();
    index
        .upsert(EntityKind::Project, id, "<p>beta bioswale</p>")
        .unwrap();

    assert!(search_descriptions(&conn, &SearchQuery::new("alpha"))
        .unwrap()
        .is_empty());
    let hits = search_descriptions(&conn, &SearchQuery::new("bioswale")).unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].entity_id, id);
}

#[test]
fn indexed_text_has_tags_stripped() {
    let conn = open_db_in_memory().unwrap();
    let index = SqliteDescriptionIndex::new(&conn);
    let id = Uuid::new_v4();
    index
        .upsert(EntityKind::Contact, id, "<p class=\"lead\">Arborist</p>")
        .unwrap();

    assert!(search_descriptions(&conn, &SearchQuery::new("lead"))
        .unwrap()
        .is_empty());
    let hits = search_descriptions(&conn, &SearchQuery::new("arborist")).unwrap();
    assert_eq!(hits[0].snippet, "[Arborist]");
}

#[test]
fn kind_filter_limits_hits() {
    let conn = open_db_in_memory().unwrap();
    let index = SqliteDescriptionIndex::new(&conn);
    let project_id = Uuid::new_v4();
    let contact_id = Uuid::new_v4();
    index
        .upsert(EntityKind::Project, project_id, "rain garden")
        .unwrap();
    index
        .upsert(EntityKind::Contact, contact_id, "rain specialist")
        .unwrap();

    let mut query = SearchQuery::new("rain");
    query.kind = Some(EntityKind::Contact);
    let hits = search_descriptions(&conn, &query).unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].entity_id, contact_id);
}

#[test]
fn blank_query_and_zero_limit_return_nothing() {
    let conn = open_db_in_memory().unwrap();
    let index = SqliteDescriptionIndex::new(&conn);
    index
        .upsert(EntityKind::Project, Uuid::new_v4(), "anything")
        .unwrap();

    assert!(search_descriptions(&conn, &SearchQuery::new("  "))
        .unwrap()
        .is_empty());
    let mut query = SearchQuery::new("anything");
    query.limit = 0;
    assert!(search_descriptions(&conn, &query).unwrap().is_empty());
}

#[test]
fn punctuation_is_quoted_unless_raw_syntax_requested() {
    let conn = open_db_in_memory().unwrap();
    let index = SqliteDescriptionIndex::new(&conn);
    index
        .upsert(EntityKind::Project, Uuid::new_v4(), "green roof")
        .unwrap();

    let hits = search_descriptions(&conn, &SearchQuery::new("roof\"")).unwrap();
    assert_eq!(hits.len(), 1);

    let mut raw = SearchQuery::new("roof AND (");
    raw.raw_fts_syntax = true;
    let err = search_descriptions(&conn, &raw).unwrap_err();
    assert!(matches!(err, SearchError::InvalidQuery { .. }), "got {err}");
}

#[test]
fn remove_is_silent_for_missing_entries() {
    let conn = open_db_in_memory().unwrap();
    let index = SqliteDescriptionIndex::new(&conn);
    let id = Uuid::new_v4();

    index.remove(EntityKind::Project, id).unwrap();
    assert!(!index.contains(EntityKind::Project, id).unwrap());
}

#[test]
fn entry_is_current_only_for_matching_text() {
    let conn = open_db_in_memory().unwrap();
    let index = SqliteDescriptionIndex::new(&conn);
    let id = Uuid::new_v4();

    assert!(!index.is_current(EntityKind::Contact, id, "<p>hedge</p>").unwrap());
    index
        .upsert(EntityKind::Contact, id, "<p>hedge</p>")
        .unwrap();
    assert!(index.is_current(EntityKind::Contact, id, "<p>hedge</p>").unwrap());
    assert!(index.is_current(EntityKind::Contact, id, "hedge").unwrap());
    assert!(!index.is_current(EntityKind::Contact, id, "<p>fence</p>").unwrap());
    assert!(!index.is_current(EntityKind::Project, id, "<p>hedge</p>").unwrap());
}

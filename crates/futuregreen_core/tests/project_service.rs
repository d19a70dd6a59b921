use futuregreen_core::db::open_db_in_memory;
use futuregreen_core::{
    search_descriptions, AreaUnit, Described, DescriptionIndex, EntityKind, Measurement,
    MeasurementError, Project, ProjectService, ProjectServiceError, ProjectStatus,
    ProjectValidationError, SearchQuery, SiteConfig, SqliteDescriptionIndex,
    SqliteProjectRepository,
};
use rusqlite::Connection;
use rust_decimal::Decimal;

type Service<'conn> = ProjectService<SqliteProjectRepository<'conn>, SqliteDescriptionIndex<'conn>>;

fn service(conn: &Connection) -> Service<'_> {
    ProjectService::new(
        SqliteProjectRepository::new(conn),
        SqliteDescriptionIndex::new(conn),
        &SiteConfig::default(),
    )
}

fn dec(value: &str) -> Decimal {
    value.parse().unwrap()
}

fn project(name: &str, date_end: i64, area: &str, unit: AreaUnit) -> Project {
    Project::new(name, date_end, Measurement::new(dec(area), unit).unwrap())
}

fn names(projects: &[Project]) -> Vec<&str> {
    projects.iter().map(|project| project.name.as_str()).collect()
}

#[test]
fn save_fills_slug_renders_and_normalizes() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    let mut riverside = project("Riverside Park: Phase II", 1_000, "2", AreaUnit::Acre);
    riverside.description = "Restored **wetland** edge".to_string();
    let outcome = service.save(&mut riverside).unwrap();

    assert!(outcome.created);
    assert!(outcome.html_changed);
    assert_eq!(riverside.slug, "riverside-park-phase-ii");
    assert_eq!(
        riverside.description_html(),
        "<p>Restored <strong>wetland</strong> edge</p>\n"
    );

    let loaded = service.get_project(riverside.id).unwrap().unwrap();
    assert_eq!(loaded.measurement.area_normalized(), dec("87120"));
    assert_eq!(loaded, riverside);
}

#[test]
fn resave_updates_and_reports_unchanged_html() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    let mut plaza = project("Civic Plaza", 1_000, "2", AreaUnit::Acre);
    plaza.description = "Paving and trees".to_string();
    service.save(&mut plaza).unwrap();

    plaza.measurement.set_unit(AreaUnit::SquareFoot).unwrap();
    let outcome = service.save(&mut plaza).unwrap();
    assert!(!outcome.created);
    assert!(!outcome.html_changed);

    let loaded = service.get_project_by_slug("civic-plaza").unwrap().unwrap();
    assert_eq!(loaded.measurement.unit(), AreaUnit::SquareFoot);
    assert_eq!(loaded.measurement.area_normalized(), dec("2"));
}

#[test]
fn duplicate_slug_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    service
        .save(&mut project("Roof Garden", 1_000, "10", AreaUnit::SquareFoot))
        .unwrap();
    let err = service
        .save(&mut project("Roof  Garden!", 2_000, "10", AreaUnit::SquareFoot))
        .unwrap_err();
    assert!(
        matches!(&err, ProjectServiceError::DuplicateSlug(slug) if slug == "roof-garden"),
        "unexpected error: {err}"
    );
}

#[test]
fn invalid_records_are_rejected_before_write() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    let mut blank = project("   ", 1_000, "1", AreaUnit::Acre);
    assert!(matches!(
        service.save(&mut blank).unwrap_err(),
        ProjectServiceError::Validation(ProjectValidationError::BlankName)
    ));

    let mut reversed = project("Backwards", 1_000, "1", AreaUnit::Acre);
    reversed.date_start = Some(5_000);
    assert!(matches!(
        service.save(&mut reversed).unwrap_err(),
        ProjectServiceError::Validation(ProjectValidationError::InvalidDateWindow { .. })
    ));

    assert!(service.list_live(None, 0).unwrap().is_empty());
}

#[test]
fn listings_only_show_live_projects_in_order() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    let mut small = project("Small Courtyard", 3_000, "500", AreaUnit::SquareFoot);
    let mut large = project("Large Campus", 1_000, "3", AreaUnit::Acre);
    large.featured = true;
    let mut medium = project("Medium Park", 2_000, "1000", AreaUnit::SquareMeter);
    let mut hidden = project("Hidden Study", 4_000, "1", AreaUnit::Hectare);
    hidden.status = ProjectStatus::Hidden;
    for project in [&mut small, &mut large, &mut medium, &mut hidden] {
        service.save(project).unwrap();
    }

    assert_eq!(
        names(&service.list_live(None, 0).unwrap()),
        ["Small Courtyard", "Medium Park", "Large Campus"]
    );
    assert_eq!(
        names(&service.list_live(Some(1), 1).unwrap()),
        ["Medium Park"]
    );
    assert_eq!(
        names(&service.list_featured(None).unwrap()),
        ["Large Campus"]
    );
    assert_eq!(
        names(&service.list_by_scale(true).unwrap()),
        ["Small Courtyard", "Medium Park", "Large Campus"]
    );
    assert_eq!(
        names(&service.list_by_scale(false).unwrap()),
        ["Large Campus", "Medium Park", "Small Courtyard"]
    );
    let completed = service.list_completed(2_000).unwrap();
    assert_eq!(names(&completed), ["Medium Park", "Large Campus"]);
    assert!(completed.iter().all(|project| project.is_completed(2_000)));
    let current = service.list_current(2_000).unwrap();
    assert_eq!(names(&current), ["Small Courtyard"]);
    assert!(!current[0].is_completed(2_000));
}

#[test]
fn next_is_older_and_previous_is_newer() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    let mut first = project("First", 100, "1", AreaUnit::Acre);
    let mut second = project("Second", 200, "1", AreaUnit::Acre);
    let mut third = project("Third", 300, "1", AreaUnit::Acre);
    let mut draft = project("Draft", 150, "1", AreaUnit::Acre);
    draft.status = ProjectStatus::Draft;
    for project in [&mut first, &mut second, &mut third, &mut draft] {
        service.save(project).unwrap();
    }

    let next = service.next_project(&second).unwrap().unwrap();
    assert_eq!(next.id, first.id);
    let previous = service.previous_project(&second).unwrap().unwrap();
    assert_eq!(previous.id, third.id);

    assert!(service.next_project(&first).unwrap().is_none());
    assert!(service.previous_project(&third).unwrap().is_none());
}

#[test]
fn adjacency_walks_the_listing_when_end_dates_tie() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    for mut project in [
        project("Gamma", 100, "1", AreaUnit::Acre),
        project("Beta", 200, "1", AreaUnit::Acre),
        project("Alpha", 200, "1", AreaUnit::Acre),
        project("Delta", 200, "1", AreaUnit::Acre),
        project("Omega", 300, "1", AreaUnit::Acre),
    ] {
        service.save(&mut project).unwrap();
    }

    let listed = service.list_live(None, 0).unwrap();
    assert_eq!(names(&listed), ["Omega", "Alpha", "Beta", "Delta", "Gamma"]);

    for pair in listed.windows(2) {
        let next = service.next_project(&pair[0]).unwrap().unwrap();
        assert_eq!(next.name, pair[1].name);
        let previous = service.previous_project(&pair[1]).unwrap().unwrap();
        assert_eq!(previous.name, pair[0].name);
    }
    assert!(service.next_project(&listed[4]).unwrap().is_none());
    assert!(service.previous_project(&listed[0]).unwrap().is_none());
}

#[test]
fn relative_size_uses_largest_live_project() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    let mut pending = project("Pending Survey", 100, "250", AreaUnit::SquareFoot);
    pending.status = ProjectStatus::Pending;
    service.save(&mut pending).unwrap();
    assert!(matches!(
        service.relative_size(&pending).unwrap_err(),
        ProjectServiceError::Measurement(MeasurementError::NoComparisonBasis)
    ));

    let mut biggest = project("Biggest", 200, "1000", AreaUnit::SquareFoot);
    service.save(&mut biggest).unwrap();
    let mut huge_hidden = project("Huge Hidden", 300, "10", AreaUnit::Hectare);
    huge_hidden.status = ProjectStatus::Hidden;
    service.save(&mut huge_hidden).unwrap();

    assert_eq!(service.relative_size(&pending).unwrap(), dec("25"));
    assert_eq!(service.relative_size(&biggest).unwrap(), dec("100"));
}

#[test]
fn relative_size_with_zero_max_has_no_basis() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    let mut empty_lot = project("Empty Lot", 100, "0", AreaUnit::SquareFoot);
    service.save(&mut empty_lot).unwrap();
    assert!(matches!(
        service.relative_size(&empty_lot).unwrap_err(),
        ProjectServiceError::Measurement(MeasurementError::NoComparisonBasis)
    ));
}

#[test]
fn search_index_follows_live_status() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    let index = SqliteDescriptionIndex::new(&conn);

    let mut meadow = project("Meadow", 100, "1", AreaUnit::Acre);
    meadow.description = "Native **pollinator** meadow".to_string();
    service.save(&mut meadow).unwrap();

    let hits = search_descriptions(&conn, &SearchQuery::new("pollinator")).unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].entity_id, meadow.id);
    assert_eq!(hits[0].kind, EntityKind::Project);

    meadow.status = ProjectStatus::Hidden;
    service.save(&mut meadow).unwrap();
    assert!(!index.contains(EntityKind::Project, meadow.id).unwrap());

    meadow.status = ProjectStatus::Live;
    service.save(&mut meadow).unwrap();
    assert!(index.contains(EntityKind::Project, meadow.id).unwrap());

    service.delete_project(meadow.id).unwrap();
    assert!(!index.contains(EntityKind::Project, meadow.id).unwrap());
    assert!(service.get_project(meadow.id).unwrap().is_none());
}

#[test]
fn deleting_unknown_project_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    let ghost = project("Ghost", 100, "1", AreaUnit::Acre);

    assert!(matches!(
        service.delete_project(ghost.id).unwrap_err(),
        ProjectServiceError::ProjectNotFound(id) if id == ghost.id
    ));
}

#[test]
fn retry_after_failed_save_still_reindexes_new_description() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    let mut meadow = project("Meadow", 100, "1", AreaUnit::Acre);
    meadow.description = "oldword".to_string();
    service.save(&mut meadow).unwrap();
    service
        .save(&mut project("Orchard", 200, "1", AreaUnit::Acre))
        .unwrap();

    meadow.description = "newword".to_string();
    meadow.slug = "orchard".to_string();
    assert!(matches!(
        service.save(&mut meadow).unwrap_err(),
        ProjectServiceError::DuplicateSlug(_)
    ));

    meadow.slug = "meadow".to_string();
    let outcome = service.save(&mut meadow).unwrap();
    assert!(!outcome.created);
    assert!(outcome.html_changed);

    let fresh = search_descriptions(&conn, &SearchQuery::new("newword")).unwrap();
    assert_eq!(fresh.len(), 1);
    assert_eq!(fresh[0].entity_id, meadow.id);
    assert!(search_descriptions(&conn, &SearchQuery::new("oldword"))
        .unwrap()
        .is_empty());
}

#[test]
fn stale_index_entry_is_rewritten_on_save() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    let index = SqliteDescriptionIndex::new(&conn);

    let mut meadow = project("Meadow", 100, "1", AreaUnit::Acre);
    meadow.description = "wildflower".to_string();
    service.save(&mut meadow).unwrap();

    index
        .upsert(EntityKind::Project, meadow.id, "something else")
        .unwrap();
    let outcome = service.save(&mut meadow).unwrap();
    assert!(!outcome.html_changed);
    assert!(index
        .is_current(EntityKind::Project, meadow.id, meadow.description_html())
        .unwrap());
}

#[test]
fn names_without_ascii_letters_still_save() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    let mut garden = project("日本庭園", 100, "1", AreaUnit::Acre);
    service.save(&mut garden).unwrap();
    assert!(!garden.slug.is_empty());
    assert!(service.get_project_by_slug(&garden.slug).unwrap().is_some());

    let mut marks = project("???", 100, "1", AreaUnit::Acre);
    service.save(&mut marks).unwrap();
    assert_eq!(
        marks.slug,
        format!("project-{:08x}", marks.id.as_fields().0)
    );
}

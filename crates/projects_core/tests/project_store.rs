use projects_core::{
    Material, Project, ProjectRepository, RepoError, SqliteConnectionProvider,
    SqliteProjectRepository, Step, StoreConfig, StoreFault,
};
use rusqlite::Connection;
use rust_decimal_macros::dec;
use tempfile::TempDir;

const DB_FILE: &str = "projects.sqlite3";

type Store = SqliteProjectRepository<SqliteConnectionProvider>;

fn setup() -> (TempDir, Store) {
    let dir = tempfile::tempdir().unwrap();
    let store = SqliteProjectRepository::from_config(StoreConfig::new(dir.path().join(DB_FILE)));
    (dir, store)
}

fn raw_connection(dir: &TempDir) -> Connection {
    Connection::open(dir.path().join(DB_FILE)).unwrap()
}

fn count_rows(dir: &TempDir, sql: &str) -> i64 {
    raw_connection(dir)
        .query_row(sql, [], |row| row.get(0))
        .unwrap()
}

fn shed() -> Project {
    let mut project = Project::new("Build shed", dec!(10.5), 3);
    project.notes = Some("none".to_string());
    project
}

fn insert_with_children(store: &Store) -> i64 {
    let project_id = store.insert_project(shed()).unwrap().project_id.unwrap();

    let mut lumber = Material::new(project_id, "2x4 lumber");
    lumber.num_required = Some(12);
    lumber.cost = Some(dec!(7.25));
    store.insert_material(lumber).unwrap().unwrap();
    store
        .insert_material(Material::new(project_id, "Roofing nails"))
        .unwrap()
        .unwrap();

    store
        .insert_step(Step::new(project_id, "Level the ground"))
        .unwrap()
        .unwrap();
    store
        .insert_step(Step::new(project_id, "Frame the walls"))
        .unwrap()
        .unwrap();

    store.assign_category(project_id, "Woodworking").unwrap();
    store.assign_category(project_id, "Outdoor").unwrap();
    project_id
}

#[test]
fn insert_assigns_generated_id_and_round_trips_scalars() {
    let (_dir, store) = setup();

    let inserted = store.insert_project(shed()).unwrap();
    let project_id = inserted.project_id.expect("insert must assign an id");

    let loaded = store.fetch_project_by_id(project_id).unwrap().unwrap();
    assert_eq!(loaded, inserted);
    assert_eq!(loaded.estimated_hours, dec!(10.5));
    assert_eq!(loaded.actual_hours, dec!(0));
    assert_eq!(loaded.notes.as_deref(), Some("none"));
    assert!(loaded.materials.is_empty());
    assert!(loaded.steps.is_empty());
    assert!(loaded.categories.is_empty());
}

#[test]
fn insert_assigns_distinct_ids() {
    let (_dir, store) = setup();

    let first = store.insert_project(shed()).unwrap();
    let second = store
        .insert_project(Project::new("Paint fence", dec!(4), 1))
        .unwrap();
    assert_ne!(first.project_id, second.project_id);
}

#[test]
fn insert_rejects_project_that_already_has_an_id() {
    let (dir, store) = setup();

    let mut project = shed();
    project.project_id = Some(42);
    let err = store.insert_project(project).unwrap_err();
    assert!(matches!(
        err,
        RepoError::IdAlreadyAssigned {
            entity: "project",
            id: 42
        }
    ));

    store.fetch_all_projects().unwrap();
    assert_eq!(count_rows(&dir, "SELECT COUNT(*) FROM project;"), 0);
}

#[test]
fn fetch_all_on_empty_store_is_empty() {
    let (_dir, store) = setup();
    assert!(store.fetch_all_projects().unwrap().is_empty());
}

#[test]
fn fetch_all_sorts_by_name_and_never_carries_children() {
    let (_dir, store) = setup();

    store
        .insert_project(Project::new("Paint fence", dec!(4), 1))
        .unwrap();
    insert_with_children(&store);
    store
        .insert_project(Project::new("Add deck", dec!(30), 4))
        .unwrap();

    let projects = store.fetch_all_projects().unwrap();
    let names: Vec<_> = projects
        .iter()
        .map(|project| project.project_name.as_str())
        .collect();
    assert_eq!(names, ["Add deck", "Build shed", "Paint fence"]);
    assert!(projects.iter().all(|project| !project.has_children()));
}

#[test]
fn fetch_by_id_for_unknown_id_returns_none() {
    let (_dir, store) = setup();
    store.insert_project(shed()).unwrap();

    assert!(store.fetch_project_by_id(9_999).unwrap().is_none());
}

#[test]
fn fetch_by_id_hydrates_the_whole_aggregate() {
    let (_dir, store) = setup();
    let project_id = insert_with_children(&store);

    let project = store.fetch_project_by_id(project_id).unwrap().unwrap();

    assert_eq!(project.materials.len(), 2);
    assert_eq!(project.materials[0].material_name, "2x4 lumber");
    assert_eq!(project.materials[0].num_required, Some(12));
    assert_eq!(project.materials[0].cost, Some(dec!(7.25)));
    assert_eq!(project.materials[1].cost, None);

    let steps: Vec<_> = project
        .steps
        .iter()
        .map(|step| (step.step_order, step.step_text.as_str()))
        .collect();
    assert_eq!(
        steps,
        [(Some(1), "Level the ground"), (Some(2), "Frame the walls")]
    );

    let categories: Vec<_> = project
        .categories
        .iter()
        .map(|category| category.category_name.as_str())
        .collect();
    assert_eq!(categories, ["Outdoor", "Woodworking"]);
    assert!(project
        .materials
        .iter()
        .all(|material| material.project_id == project_id));
}

#[test]
fn children_of_other_projects_are_not_attached() {
    let (_dir, store) = setup();
    let with_children = insert_with_children(&store);
    let bare = store
        .insert_project(Project::new("Paint fence", dec!(4), 1))
        .unwrap()
        .project_id
        .unwrap();

    let project = store.fetch_project_by_id(bare).unwrap().unwrap();
    assert!(!project.has_children());
    assert!(store
        .fetch_project_by_id(with_children)
        .unwrap()
        .unwrap()
        .has_children());
}

#[test]
fn failing_step_fetch_yields_error_instead_of_partial_project() {
    let (dir, store) = setup();
    let project_id = insert_with_children(&store);

    raw_connection(&dir)
        .execute_batch("DROP TABLE step;")
        .unwrap();

    let err = store.fetch_project_by_id(project_id).unwrap_err();
    match err {
        RepoError::Operation {
            operation: "fetch_project_by_id",
            source: StoreFault::Sqlite(inner),
        } => assert!(inner.to_string().contains("step")),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn failing_category_fetch_yields_error_instead_of_partial_project() {
    let (dir, store) = setup();
    let project_id = insert_with_children(&store);

    raw_connection(&dir)
        .execute_batch("DROP TABLE project_category;")
        .unwrap();

    let err = store.fetch_project_by_id(project_id).unwrap_err();
    assert_eq!(err.operation(), Some("fetch_project_by_id"));
    assert!(!err.is_connectivity());
}

#[test]
fn failed_category_link_rolls_back_the_new_category() {
    let (dir, store) = setup();
    let project_id = store.insert_project(shed()).unwrap().project_id.unwrap();

    raw_connection(&dir)
        .execute_batch(
            "CREATE TRIGGER reject_links BEFORE INSERT ON project_category
             BEGIN
                SELECT RAISE(ABORT, 'links disabled');
             END;",
        )
        .unwrap();

    let err = store.assign_category(project_id, "Garden").unwrap_err();
    assert_eq!(err.operation(), Some("assign_category"));

    assert!(store.fetch_all_categories().unwrap().is_empty());
    assert_eq!(count_rows(&dir, "SELECT COUNT(*) FROM category;"), 0);
}

#[test]
fn assign_category_reuses_existing_category_and_is_idempotent() {
    let (dir, store) = setup();
    let first = store.insert_project(shed()).unwrap().project_id.unwrap();
    let second = store
        .insert_project(Project::new("Raised beds", dec!(6), 2))
        .unwrap()
        .project_id
        .unwrap();

    let a = store.assign_category(first, "Garden").unwrap().unwrap();
    let b = store.assign_category(second, "garden").unwrap().unwrap();
    store.assign_category(first, "Garden").unwrap().unwrap();

    assert_eq!(a.category_id, b.category_id);
    assert_eq!(store.fetch_all_categories().unwrap().len(), 1);
    assert_eq!(
        count_rows(&dir, "SELECT COUNT(*) FROM project_category;"),
        2
    );
}

#[test]
fn child_inserts_for_unknown_project_return_none() {
    let (dir, store) = setup();

    assert!(store
        .insert_material(Material::new(77, "Glue"))
        .unwrap()
        .is_none());
    assert!(store.insert_step(Step::new(77, "Clamp")).unwrap().is_none());
    assert!(store.assign_category(77, "Crafts").unwrap().is_none());

    assert_eq!(count_rows(&dir, "SELECT COUNT(*) FROM material;"), 0);
    assert_eq!(count_rows(&dir, "SELECT COUNT(*) FROM category;"), 0);
}

#[test]
fn explicit_step_order_is_kept_and_next_order_follows_it() {
    let (_dir, store) = setup();
    let project_id = store.insert_project(shed()).unwrap().project_id.unwrap();

    let mut first = Step::new(project_id, "Buy lumber");
    first.step_order = Some(10);
    let first = store.insert_step(first).unwrap().unwrap();
    let second = store
        .insert_step(Step::new(project_id, "Cut lumber"))
        .unwrap()
        .unwrap();

    assert_eq!(first.step_order, Some(10));
    assert_eq!(second.step_order, Some(11));
    assert!(second.step_id.is_some());
}

#[test]
fn modify_updates_existing_row_and_reports_true() {
    let (_dir, store) = setup();
    let mut project = store.insert_project(shed()).unwrap();

    project.actual_hours = dec!(4.0);
    project.notes = None;
    assert!(store.modify_project_details(&project).unwrap());

    let loaded = store
        .fetch_project_by_id(project.project_id.unwrap())
        .unwrap()
        .unwrap();
    assert_eq!(loaded.actual_hours, dec!(4));
    assert_eq!(loaded.notes, None);
}

#[test]
fn modify_reports_false_for_unknown_id_and_changes_nothing() {
    let (_dir, store) = setup();
    let existing = store.insert_project(shed()).unwrap();

    let mut ghost = shed();
    ghost.project_id = Some(existing.project_id.unwrap() + 100);
    ghost.project_name = "Ghost".to_string();
    assert!(!store.modify_project_details(&ghost).unwrap());

    let projects = store.fetch_all_projects().unwrap();
    assert_eq!(projects, vec![existing]);
}

#[test]
fn modify_requires_an_assigned_id() {
    let (_dir, store) = setup();
    let err = store.modify_project_details(&shed()).unwrap_err();
    assert!(matches!(err, RepoError::IdUnassigned { entity: "project" }));
}

#[test]
fn delete_removes_project_and_cascades_children() {
    let (dir, store) = setup();
    let project_id = insert_with_children(&store);

    assert!(store.delete_project(project_id).unwrap());
    assert!(store.fetch_project_by_id(project_id).unwrap().is_none());

    assert_eq!(count_rows(&dir, "SELECT COUNT(*) FROM material;"), 0);
    assert_eq!(count_rows(&dir, "SELECT COUNT(*) FROM step;"), 0);
    assert_eq!(
        count_rows(&dir, "SELECT COUNT(*) FROM project_category;"),
        0
    );
    // Categories are shared and outlive the project.
    assert_eq!(count_rows(&dir, "SELECT COUNT(*) FROM category;"), 2);
}

#[test]
fn delete_reports_false_for_unknown_id() {
    let (_dir, store) = setup();
    let existing = store.insert_project(shed()).unwrap();

    assert!(!store.delete_project(existing.project_id.unwrap() + 1).unwrap());
    assert_eq!(store.fetch_all_projects().unwrap().len(), 1);
}

#[test]
fn unreachable_database_is_a_connectivity_error() {
    let dir = tempfile::tempdir().unwrap();
    let store = SqliteProjectRepository::from_config(StoreConfig::new(
        dir.path().join("no-such-dir").join(DB_FILE),
    ));

    let err = store.fetch_all_projects().unwrap_err();
    assert!(err.is_connectivity());
    assert_eq!(err.operation(), None);

    let err = store.insert_project(shed()).unwrap_err();
    assert!(matches!(err, RepoError::Connectivity(_)));
}

#[test]
fn malformed_row_is_reported_as_mapping_fault() {
    let (dir, store) = setup();
    store.insert_project(shed()).unwrap();

    raw_connection(&dir)
        .execute(
            "INSERT INTO project (project_name, estimated_hours, actual_hours, difficulty)
             VALUES ('Broken', 'lots', '0', 2);",
            [],
        )
        .unwrap();

    let err = store.fetch_all_projects().unwrap_err();
    match err {
        RepoError::Operation {
            source: StoreFault::Mapping { entity, column, .. },
            ..
        } => {
            assert_eq!(entity, "Project");
            assert_eq!(column, "estimated_hours");
        }
        other => panic!("unexpected error: {other}"),
    }
}

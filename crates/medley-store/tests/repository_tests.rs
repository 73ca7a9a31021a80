// Integration tests for the generic entity repository
// Covers: insert/fetch round-trip, existence lifecycle, full and partial
// updates, and batch-destroy precondition validation

use medley_core::model::{Patch, Scene, ScenePatch, Tag};
use medley_core::MedleyErrorKind;
use medley_store::repo::Repository;
use rusqlite::Connection;

fn setup_test_db() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    medley_store::migrations::apply_migrations(&mut conn).unwrap();
    conn
}

#[test]
fn test_insert_get_round_trip() {
    // Given: a scene with every descriptor field populated
    let conn = setup_test_db();
    let repo: Repository<Scene> = Repository::new(&conn);

    let mut scene = Scene::new("Harbor at Dawn");
    scene.details = Some("long take".to_string());
    scene.date = Some("2024-03-01".to_string());
    scene.rating = Some(85);
    scene.organized = true;

    // When: we insert and re-fetch it
    let created = repo.insert(&scene).unwrap();
    let fetched = repo.get_by_id(created.id).unwrap();

    // Then: every descriptor-described field round-trips
    assert!(created.id > 0);
    assert_eq!(fetched.title, "Harbor at Dawn");
    assert_eq!(fetched.details.as_deref(), Some("long take"));
    assert_eq!(fetched.date.as_deref(), Some("2024-03-01"));
    assert_eq!(fetched.rating, Some(85));
    assert!(fetched.organized);
    assert_eq!(fetched, created);
}

#[test]
fn test_get_by_id_missing_is_not_found() {
    let conn = setup_test_db();
    let repo: Repository<Scene> = Repository::new(&conn);

    let err = repo.get_by_id(999).unwrap_err();
    assert_eq!(err.kind(), MedleyErrorKind::NotFound);
}

#[test]
fn test_exists_lifecycle() {
    let conn = setup_test_db();
    let repo: Repository<Scene> = Repository::new(&conn);

    // Before insert
    assert!(!repo.exists(1).unwrap());

    // After insert
    let created = repo.insert(&Scene::new("A")).unwrap();
    assert!(repo.exists(created.id).unwrap());

    // After destroy
    repo.destroy(&[created.id]).unwrap();
    assert!(!repo.exists(created.id).unwrap());
}

#[test]
fn test_full_update_replaces_all_columns() {
    let conn = setup_test_db();
    let repo: Repository<Scene> = Repository::new(&conn);

    let created = repo.insert(&Scene::new("Before")).unwrap();

    let mut changed = created.clone();
    changed.title = "After".to_string();
    changed.rating = Some(50);
    repo.update(created.id, &changed).unwrap();

    let fetched = repo.get_by_id(created.id).unwrap();
    assert_eq!(fetched.title, "After");
    assert_eq!(fetched.rating, Some(50));
}

#[test]
fn test_update_missing_id_is_not_exist() {
    let conn = setup_test_db();
    let repo: Repository<Scene> = Repository::new(&conn);

    let err = repo.update(999, &Scene::new("X")).unwrap_err();
    assert_eq!(err.kind(), MedleyErrorKind::NotExist);
}

#[test]
fn test_partial_update_touches_only_present_fields() {
    let conn = setup_test_db();
    let repo: Repository<Scene> = Repository::new(&conn);

    let mut scene = Scene::new("Keep me");
    scene.details = Some("keep these details".to_string());
    scene.rating = Some(40);
    let created = repo.insert(&scene).unwrap();

    // Only rating is present in the patch
    let patch = ScenePatch {
        rating: Patch::Value(90),
        ..Default::default()
    };
    repo.update_partial(created.id, &patch).unwrap();

    let fetched = repo.get_by_id(created.id).unwrap();
    assert_eq!(fetched.rating, Some(90));
    assert_eq!(fetched.title, "Keep me");
    assert_eq!(fetched.details.as_deref(), Some("keep these details"));
}

#[test]
fn test_partial_update_null_clears_nullable_column() {
    let conn = setup_test_db();
    let repo: Repository<Scene> = Repository::new(&conn);

    let mut scene = Scene::new("Nullable");
    scene.details = Some("to be cleared".to_string());
    let created = repo.insert(&scene).unwrap();

    let patch = ScenePatch {
        details: Patch::Null,
        ..Default::default()
    };
    repo.update_partial(created.id, &patch).unwrap();

    let fetched = repo.get_by_id(created.id).unwrap();
    assert_eq!(fetched.details, None);
}

#[test]
fn test_partial_update_null_on_non_nullable_is_invalid() {
    let conn = setup_test_db();
    let repo: Repository<Scene> = Repository::new(&conn);
    let created = repo.insert(&Scene::new("Strict")).unwrap();

    let patch = ScenePatch {
        title: Patch::Null,
        ..Default::default()
    };
    let err = repo.update_partial(created.id, &patch).unwrap_err();
    assert_eq!(err.kind(), MedleyErrorKind::InvalidInput);

    // Row is untouched
    assert_eq!(repo.get_by_id(created.id).unwrap().title, "Strict");
}

#[test]
fn test_all_absent_partial_update_is_a_successful_noop() {
    // Given: a stored scene
    let conn = setup_test_db();
    let repo: Repository<Scene> = Repository::new(&conn);
    let created = repo.insert(&Scene::new("Untouched")).unwrap();

    // When: we apply a patch with zero present fields
    repo.update_partial(created.id, &ScenePatch::default())
        .unwrap();

    // Then: the call succeeded and the row is identical
    let fetched = repo.get_by_id(created.id).unwrap();
    assert_eq!(fetched, created);
}

#[test]
fn test_partial_update_missing_id_is_not_exist() {
    let conn = setup_test_db();
    let repo: Repository<Scene> = Repository::new(&conn);

    let err = repo
        .update_partial(999, &ScenePatch::default())
        .unwrap_err();
    assert_eq!(err.kind(), MedleyErrorKind::NotExist);
}

#[test]
fn test_destroy_existing_rejects_whole_batch_on_one_missing_id() {
    // Given: two stored scenes and one id that does not exist
    let conn = setup_test_db();
    let repo: Repository<Scene> = Repository::new(&conn);
    let a = repo.insert(&Scene::new("A")).unwrap();
    let b = repo.insert(&Scene::new("B")).unwrap();

    // When: the batch contains the missing id
    let err = repo.destroy_existing(&[a.id, 999, b.id]).unwrap_err();

    // Then: the call fails and nothing was deleted
    assert_eq!(err.kind(), MedleyErrorKind::NotExist);
    assert!(repo.exists(a.id).unwrap());
    assert!(repo.exists(b.id).unwrap());
}

#[test]
fn test_destroy_existing_deletes_valid_batch() {
    let conn = setup_test_db();
    let repo: Repository<Scene> = Repository::new(&conn);
    let a = repo.insert(&Scene::new("A")).unwrap();
    let b = repo.insert(&Scene::new("B")).unwrap();

    repo.destroy_existing(&[a.id, b.id]).unwrap();

    assert!(!repo.exists(a.id).unwrap());
    assert!(!repo.exists(b.id).unwrap());
}

#[test]
fn test_tag_unique_name_surfaces_constraint_violation() {
    let conn = setup_test_db();
    let repo: Repository<Tag> = Repository::new(&conn);

    repo.insert(&Tag::new("duplicate")).unwrap();
    let err = repo.insert(&Tag::new("duplicate")).unwrap_err();
    assert_eq!(err.kind(), MedleyErrorKind::ConstraintViolation);
}

#[test]
fn test_repository_works_inside_caller_transaction() {
    // The repository never commits; rolling back the caller's transaction
    // discards its writes.
    let mut conn = setup_test_db();

    let id = {
        let tx = conn.transaction().unwrap();
        let id = {
            let repo: Repository<Scene> = Repository::new(&tx);
            repo.insert(&Scene::new("Ephemeral")).unwrap().id
        };
        tx.rollback().unwrap();
        id
    };

    let repo: Repository<Scene> = Repository::new(&conn);
    assert!(!repo.exists(id).unwrap());
}

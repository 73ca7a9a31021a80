// Integration tests for the relationship-table repositories
// Covers: plain join semantics, insert-or-ignore outcomes, ordered file
// relations, string lists, external ids, and captions

use medley_core::model::{Caption, ExternalId, Scene, Tag};
use medley_core::MedleyErrorKind;
use medley_store::repo::{
    CaptionRepository, ExternalIdRepository, FilesRepository, JoinInsert, JoinRepository,
    Repository, StringRepository,
};
use rusqlite::Connection;

fn setup_test_db() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    medley_store::migrations::apply_migrations(&mut conn).unwrap();
    conn
}

fn insert_scene(conn: &Connection, title: &str) -> i64 {
    let repo: Repository<Scene> = Repository::new(conn);
    repo.insert(&Scene::new(title)).unwrap().id
}

fn insert_tag(conn: &Connection, name: &str) -> i64 {
    let repo: Repository<Tag> = Repository::new(conn);
    repo.insert(&Tag::new(name)).unwrap().id
}

fn insert_file(conn: &Connection, basename: &str) -> i64 {
    conn.execute(
        "INSERT INTO files (basename, size, created_at, updated_at) VALUES (?, 0, 0, 0)",
        [basename],
    )
    .unwrap();
    conn.last_insert_rowid()
}

fn scene_tags(conn: &Connection) -> JoinRepository<'_> {
    JoinRepository::new(conn, "scenes_tags", "scene_id", "tag_id")
}

#[test]
fn test_join_insert_duplicate_pair_is_constraint_violation() {
    let conn = setup_test_db();
    let scene = insert_scene(&conn, "S");
    let tag = insert_tag(&conn, "t1");

    let joins = scene_tags(&conn);
    joins.insert(scene, &[tag]).unwrap();

    let err = joins.insert(scene, &[tag]).unwrap_err();
    assert_eq!(err.kind(), MedleyErrorKind::ConstraintViolation);
}

#[test]
fn test_insert_or_ignore_is_idempotent_and_tagged() {
    // Given: one existing join
    let conn = setup_test_db();
    let scene = insert_scene(&conn, "S");
    let tag = insert_tag(&conn, "t1");

    let joins = scene_tags(&conn);

    // When: the same pair is inserted twice via insert_or_ignore
    let first = joins.insert_or_ignore(scene, &[tag]).unwrap();
    let second = joins.insert_or_ignore(scene, &[tag]).unwrap();

    // Then: the outcomes distinguish the two cases and one row remains
    assert_eq!(first, vec![JoinInsert::Inserted]);
    assert_eq!(second, vec![JoinInsert::AlreadyExists]);
    assert_eq!(joins.get_ids(scene).unwrap(), vec![tag]);
}

#[test]
fn test_replace_discards_prior_set() {
    let conn = setup_test_db();
    let scene = insert_scene(&conn, "S");
    let t1 = insert_tag(&conn, "t1");
    let t2 = insert_tag(&conn, "t2");
    let t3 = insert_tag(&conn, "t3");

    let joins = scene_tags(&conn);
    joins.insert(scene, &[t1, t2]).unwrap();
    joins.replace(scene, &[t3]).unwrap();

    assert_eq!(joins.get_ids(scene).unwrap(), vec![t3]);
}

#[test]
fn test_destroy_joins_removes_only_named_pairs() {
    let conn = setup_test_db();
    let scene = insert_scene(&conn, "S");
    let t1 = insert_tag(&conn, "t1");
    let t2 = insert_tag(&conn, "t2");

    let joins = scene_tags(&conn);
    joins.insert(scene, &[t1, t2]).unwrap();
    joins.destroy_joins(scene, &[t1]).unwrap();

    assert_eq!(joins.get_ids(scene).unwrap(), vec![t2]);
}

#[test]
fn test_get_ids_with_foreign_table_ordering() {
    // Tags joined through the tags table come back in name order, not
    // insertion order
    let conn = setup_test_db();
    let scene = insert_scene(&conn, "S");
    let zebra = insert_tag(&conn, "zebra");
    let apple = insert_tag(&conn, "apple");

    let joins = JoinRepository::new(&conn, "scenes_tags", "scene_id", "tag_id")
        .with_ordering("tags", "tags.name ASC");
    joins.insert(scene, &[zebra, apple]).unwrap();

    assert_eq!(joins.get_ids(scene).unwrap(), vec![apple, zebra]);
}

#[test]
fn test_get_ids_with_explicit_order_by() {
    let conn = setup_test_db();
    let scene = insert_scene(&conn, "S");
    let t1 = insert_tag(&conn, "t1");
    let t2 = insert_tag(&conn, "t2");

    let joins = JoinRepository::new(&conn, "scenes_tags", "scene_id", "tag_id")
        .with_order_by("scenes_tags.tag_id DESC");
    joins.insert(scene, &[t1, t2]).unwrap();

    let mut expected = vec![t1, t2];
    expected.sort_unstable_by(|a, b| b.cmp(a));
    assert_eq!(joins.get_ids(scene).unwrap(), expected);
}

#[test]
fn test_files_get_yields_primary_first() {
    // Given: files inserted as [a(primary=false), b(primary=true),
    // c(primary=false)]
    let conn = setup_test_db();
    let scene = insert_scene(&conn, "S");
    let a = insert_file(&conn, "a.mp4");
    let b = insert_file(&conn, "b.mp4");
    let c = insert_file(&conn, "c.mp4");

    let files = FilesRepository::new(&conn, "scenes_files", "scene_id");
    files
        .replace(scene, &[(a, false), (b, true), (c, false)])
        .unwrap();

    // When: we read them back
    let got = files.get(scene).unwrap();

    // Then: the primary file leads; the rest keep storage-return order
    assert_eq!(got[0], b);
    assert_eq!(got.len(), 3);
    assert!(got.contains(&a));
    assert!(got.contains(&c));
}

#[test]
fn test_files_get_many_partitions_by_input_order() {
    let conn = setup_test_db();
    let s1 = insert_scene(&conn, "S1");
    let s2 = insert_scene(&conn, "S2");
    let f1 = insert_file(&conn, "f1.mp4");
    let f2 = insert_file(&conn, "f2.mp4");
    let f3 = insert_file(&conn, "f3.mp4");

    let files = FilesRepository::new(&conn, "scenes_files", "scene_id");
    files.replace(s1, &[(f1, true)]).unwrap();
    files.replace(s2, &[(f2, false), (f3, true)]).unwrap();

    // Query in reversed input order; output follows the input ids
    let got = files.get_many(&[s2, s1], false).unwrap();
    assert_eq!(got.len(), 2);
    assert_eq!(got[0][0], f3); // s2's primary first
    assert_eq!(got[0].len(), 2);
    assert_eq!(got[1], vec![f1]);
}

#[test]
fn test_files_get_many_primary_only() {
    let conn = setup_test_db();
    let s1 = insert_scene(&conn, "S1");
    let f1 = insert_file(&conn, "f1.mp4");
    let f2 = insert_file(&conn, "f2.mp4");

    let files = FilesRepository::new(&conn, "scenes_files", "scene_id");
    files.replace(s1, &[(f1, false), (f2, true)]).unwrap();

    let got = files.get_many(&[s1], true).unwrap();
    assert_eq!(got, vec![vec![f2]]);
}

#[test]
fn test_string_relation_replace_scenario() {
    // Given: owner has values ["a", "b"]
    let conn = setup_test_db();
    let scene = insert_scene(&conn, "S");

    let urls = StringRepository::new(&conn, "scene_urls", "scene_id", "url");
    urls.replace(scene, &["a".to_string(), "b".to_string()])
        .unwrap();

    // When: we replace with ["c"]
    urls.replace(scene, &["c".to_string()]).unwrap();

    // Then: exactly ["c"] remains
    assert_eq!(urls.get(scene).unwrap(), vec!["c".to_string()]);
}

#[test]
fn test_string_relation_preserves_insertion_order() {
    let conn = setup_test_db();
    let scene = insert_scene(&conn, "S");

    let urls = StringRepository::new(&conn, "scene_urls", "scene_id", "url");
    let values: Vec<String> = ["x", "y", "z"].iter().map(|s| s.to_string()).collect();
    urls.replace(scene, &values).unwrap();

    assert_eq!(urls.get(scene).unwrap(), values);
}

#[test]
fn test_external_id_relation_round_trip() {
    let conn = setup_test_db();
    let scene = insert_scene(&conn, "S");

    let externals = ExternalIdRepository::new(&conn, "scene_external_ids", "scene_id");
    let refs = vec![
        ExternalId {
            endpoint: "https://meta.example.com".to_string(),
            external_id: "abc123".to_string(),
        },
        ExternalId {
            endpoint: "https://other.example.com".to_string(),
            external_id: "xyz789".to_string(),
        },
    ];
    externals.replace(scene, &refs).unwrap();

    assert_eq!(externals.get(scene).unwrap(), refs);

    // Replace drops the old set entirely
    externals.replace(scene, &refs[..1]).unwrap();
    assert_eq!(externals.get(scene).unwrap(), refs[..1].to_vec());
}

#[test]
fn test_caption_relation_round_trip() {
    let conn = setup_test_db();
    let file = insert_file(&conn, "movie.mp4");

    let captions = CaptionRepository::new(&conn, "video_captions", "file_id");
    let tracks = vec![
        Caption {
            language_code: "en".to_string(),
            filename: "movie.en.srt".to_string(),
            caption_type: "srt".to_string(),
        },
        Caption {
            language_code: "de".to_string(),
            filename: "movie.de.vtt".to_string(),
            caption_type: "vtt".to_string(),
        },
    ];
    captions.replace(file, &tracks).unwrap();

    assert_eq!(captions.get(file).unwrap(), tracks);
}

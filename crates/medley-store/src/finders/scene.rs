//! Scene finder
//!
//! Composes the generic repository and the relationship repositories into
//! scene-level operations. All table and column names live here; the
//! repositories underneath are entity-agnostic.

#![allow(clippy::result_large_err)]

use medley_core::model::{Caption, ExternalId, Scene, ScenePatch};
use rusqlite::types::Value;
use rusqlite::Connection;

use crate::errors::Result;
use crate::repo::{
    CaptionRepository, ExternalIdRepository, FilesRepository, FindQuery, JoinRepository,
    Repository, StringRepository,
};

/// Search filter for [`SceneStore::query`]
///
/// All criteria are optional and combine with AND. `tag_ids` requires the
/// scene to carry *every* listed tag.
#[derive(Debug, Clone, Default)]
pub struct SceneFilter {
    /// Substring match against the title
    pub title_contains: Option<String>,
    /// Match the organized flag
    pub organized: Option<bool>,
    /// Scene must carry all of these tags
    pub tag_ids: Vec<i64>,
    /// 1-based page and page size; None returns the full id list
    pub page: Option<(u64, u64)>,
}

/// Scene operations bound to one connection/transaction
pub struct SceneStore<'conn> {
    conn: &'conn Connection,
    repo: Repository<'conn, Scene>,
}

impl<'conn> SceneStore<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self {
            conn,
            repo: Repository::new(conn),
        }
    }

    fn tags(&self) -> JoinRepository<'conn> {
        JoinRepository::new(self.conn, "scenes_tags", "scene_id", "tag_id")
            .with_ordering("tags", "tags.name ASC")
    }

    fn performers(&self) -> JoinRepository<'conn> {
        JoinRepository::new(self.conn, "scenes_performers", "scene_id", "performer_id")
    }

    fn urls(&self) -> StringRepository<'conn> {
        StringRepository::new(self.conn, "scene_urls", "scene_id", "url")
    }

    fn external_ids(&self) -> ExternalIdRepository<'conn> {
        ExternalIdRepository::new(self.conn, "scene_external_ids", "scene_id")
    }

    fn files(&self) -> FilesRepository<'conn> {
        FilesRepository::new(self.conn, "scenes_files", "scene_id")
    }

    fn captions(&self) -> CaptionRepository<'conn> {
        CaptionRepository::new(self.conn, "video_captions", "file_id")
    }

    // ----- CRUD -----

    pub fn create(&self, scene: &Scene) -> Result<Scene> {
        self.repo.insert(scene)
    }

    pub fn find(&self, id: i64) -> Result<Scene> {
        self.repo.get_by_id(id)
    }

    pub fn exists(&self, id: i64) -> Result<bool> {
        self.repo.exists(id)
    }

    pub fn update(&self, id: i64, scene: &Scene) -> Result<()> {
        self.repo.update(id, scene)
    }

    pub fn update_partial(&self, id: i64, patch: &ScenePatch) -> Result<()> {
        self.repo.update_partial(id, patch)
    }

    pub fn destroy(&self, ids: &[i64]) -> Result<()> {
        self.repo.destroy(ids)
    }

    pub fn destroy_existing(&self, ids: &[i64]) -> Result<()> {
        self.repo.destroy_existing(ids)
    }

    // ----- search -----

    /// Find scene ids matching the filter, returning `(ids, total_count)`.
    ///
    /// The count covers the whole filtered set regardless of pagination.
    pub fn query(&self, filter: &SceneFilter) -> Result<(Vec<i64>, i64)> {
        let mut body = String::from("SELECT scenes.id FROM scenes");
        if !filter.tag_ids.is_empty() {
            body.push_str(" LEFT JOIN scenes_tags ON scenes_tags.scene_id = scenes.id");
        }

        let mut query = FindQuery::new(body);

        if let Some(title) = &filter.title_contains {
            query.add_where("scenes.title LIKE ?");
            query.add_arg(format!("%{}%", title));
        }

        if let Some(organized) = filter.organized {
            query.add_where("scenes.organized = ?");
            query.add_arg(organized);
        }

        if !filter.tag_ids.is_empty() {
            let marks: Vec<&str> = filter.tag_ids.iter().map(|_| "?").collect();
            query.add_where(format!("scenes_tags.tag_id IN ({})", marks.join(", ")));
            query.add_args(filter.tag_ids.iter().map(|&id| Value::Integer(id)));
            query.add_having("COUNT(DISTINCT scenes_tags.tag_id) = ?");
            query.add_arg(filter.tag_ids.len() as i64);
        }

        query.sort_by("scenes.id ASC");
        if let Some((page, per_page)) = filter.page {
            query.paginate(page, per_page);
        }

        self.repo.query(&query)
    }

    // ----- relationships -----

    pub fn tag_ids(&self, scene_id: i64) -> Result<Vec<i64>> {
        self.tags().get_ids(scene_id)
    }

    pub fn add_tags(&self, scene_id: i64, tag_ids: &[i64]) -> Result<()> {
        self.tags().insert(scene_id, tag_ids)
    }

    pub fn set_tags(&self, scene_id: i64, tag_ids: &[i64]) -> Result<()> {
        self.tags().replace(scene_id, tag_ids)
    }

    pub fn performer_ids(&self, scene_id: i64) -> Result<Vec<i64>> {
        self.performers().get_ids(scene_id)
    }

    pub fn set_performers(&self, scene_id: i64, performer_ids: &[i64]) -> Result<()> {
        self.performers().replace(scene_id, performer_ids)
    }

    pub fn urls_for(&self, scene_id: i64) -> Result<Vec<String>> {
        self.urls().get(scene_id)
    }

    pub fn set_urls(&self, scene_id: i64, urls: &[String]) -> Result<()> {
        self.urls().replace(scene_id, urls)
    }

    pub fn external_ids_for(&self, scene_id: i64) -> Result<Vec<ExternalId>> {
        self.external_ids().get(scene_id)
    }

    pub fn set_external_ids(&self, scene_id: i64, external_ids: &[ExternalId]) -> Result<()> {
        self.external_ids().replace(scene_id, external_ids)
    }

    /// File ids behind a scene, primary file first
    pub fn file_ids(&self, scene_id: i64) -> Result<Vec<i64>> {
        self.files().get(scene_id)
    }

    /// File ids for a batch of scenes, each list primary-first, output
    /// order matching the input id order
    pub fn file_ids_many(&self, scene_ids: &[i64], primary_only: bool) -> Result<Vec<Vec<i64>>> {
        self.files().get_many(scene_ids, primary_only)
    }

    /// Set the file list for a scene; `(file_id, is_primary)` pairs
    pub fn set_files(&self, scene_id: i64, file_ids: &[(i64, bool)]) -> Result<()> {
        self.files().replace(scene_id, file_ids)
    }

    /// Captions for one file
    pub fn captions_for_file(&self, file_id: i64) -> Result<Vec<Caption>> {
        self.captions().get(file_id)
    }

    /// Replace the captions for one file
    pub fn set_captions_for_file(&self, file_id: i64, captions: &[Caption]) -> Result<()> {
        self.captions().replace(file_id, captions)
    }
}

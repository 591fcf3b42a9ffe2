//! Repository for the `projects` table.

use async_trait::async_trait;
use sqlx::PgPool;

use portal_core::page;
use portal_core::types::ProjectId;

use crate::models::project::{CreateProject, Project, ProjectFilter, UpdateProject};
use crate::repositories::Repository;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "project_id, user_id, title, video_url, key_concept, poster_url, \
     share_code, user_prompt, cover_url, thumbnail_url, banner_url, share_poster_url, \
     created_at, updated_at";

/// Filter clause shared by the listing query and its count. Absent binds
/// leave the corresponding column unconstrained.
const FILTER_WHERE: &str = "($1::BIGINT IS NULL OR project_id = $1) \
     AND ($2::TEXT IS NULL OR user_id = $2) \
     AND ($3::TIMESTAMPTZ IS NULL OR created_at >= $3) \
     AND ($4::TIMESTAMPTZ IS NULL OR created_at <= $4)";

/// Postgres-backed CRUD plus the list/share lookups the HTTP layer uses.
#[derive(Clone)]
pub struct ProjectRepository {
    pool: PgPool,
}

impl ProjectRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Page through projects matching `filter`, newest first.
    ///
    /// Returns the page of rows together with the filtered total, so the
    /// caller can derive the page count.
    pub async fn list_filtered(
        &self,
        filter: &ProjectFilter,
        page: i64,
        page_size: i64,
    ) -> Result<(Vec<Project>, i64), sqlx::Error> {
        let total = self.count_filtered(filter).await?;

        let query = format!(
            "SELECT {COLUMNS} FROM projects WHERE {FILTER_WHERE} \
             ORDER BY created_at DESC LIMIT $5 OFFSET $6"
        );
        let items = sqlx::query_as::<_, Project>(&query)
            .bind(filter.project_id)
            .bind(&filter.user_id)
            .bind(filter.created_from)
            .bind(filter.created_until)
            .bind(page_size)
            .bind(page::offset(page, page_size))
            .fetch_all(&self.pool)
            .await?;

        Ok((items, total))
    }

    /// Count projects matching `filter`.
    pub async fn count_filtered(&self, filter: &ProjectFilter) -> Result<i64, sqlx::Error> {
        let query = format!("SELECT COUNT(*) FROM projects WHERE {FILTER_WHERE}");
        sqlx::query_scalar::<_, i64>(&query)
            .bind(filter.project_id)
            .bind(&filter.user_id)
            .bind(filter.created_from)
            .bind(filter.created_until)
            .fetch_one(&self.pool)
            .await
    }

    /// Look up a project by its public share code.
    pub async fn find_by_share_code(&self, code: &str) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE share_code = $1");
        sqlx::query_as::<_, Project>(&query)
            .bind(code)
            .fetch_optional(&self.pool)
            .await
    }
}

#[async_trait]
impl Repository for ProjectRepository {
    type Entity = Project;
    type Id = ProjectId;
    type Create = CreateProject;
    type Update = UpdateProject;

    async fn get_by_id(&self, id: ProjectId) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE project_id = $1");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn get_all(&self, skip: i64, limit: i64) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM projects ORDER BY created_at DESC LIMIT $1 OFFSET $2"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(limit)
            .bind(skip)
            .fetch_all(&self.pool)
            .await
    }

    async fn create(&self, input: &CreateProject) -> Result<Project, sqlx::Error> {
        let query = format!(
            "INSERT INTO projects (project_id, user_id, title, video_url, key_concept, \
                poster_url, share_code, user_prompt, cover_url, thumbnail_url, banner_url, \
                share_poster_url) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(input.project_id)
            .bind(&input.user_id)
            .bind(&input.title)
            .bind(&input.video_url)
            .bind(&input.key_concept)
            .bind(&input.poster_url)
            .bind(&input.share_code)
            .bind(&input.user_prompt)
            .bind(&input.cover_url)
            .bind(&input.thumbnail_url)
            .bind(&input.banner_url)
            .bind(&input.share_poster_url)
            .fetch_one(&self.pool)
            .await
    }

    async fn update(
        &self,
        id: ProjectId,
        input: &UpdateProject,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "UPDATE projects SET \
                title = COALESCE($2, title), \
                video_url = COALESCE($3, video_url), \
                key_concept = COALESCE($4, key_concept), \
                poster_url = COALESCE($5, poster_url), \
                share_code = COALESCE($6, share_code), \
                user_prompt = COALESCE($7, user_prompt), \
                cover_url = COALESCE($8, cover_url), \
                thumbnail_url = COALESCE($9, thumbnail_url), \
                banner_url = COALESCE($10, banner_url), \
                share_poster_url = COALESCE($11, share_poster_url), \
                updated_at = NOW() \
             WHERE project_id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.video_url)
            .bind(&input.key_concept)
            .bind(&input.poster_url)
            .bind(&input.share_code)
            .bind(&input.user_prompt)
            .bind(&input.cover_url)
            .bind(&input.thumbnail_url)
            .bind(&input.banner_url)
            .bind(&input.share_poster_url)
            .fetch_optional(&self.pool)
            .await
    }

    async fn delete(&self, id: ProjectId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM projects WHERE project_id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

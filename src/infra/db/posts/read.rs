use async_trait::async_trait;

use crate::application::repos::{PostsRepo, RepoError};
use crate::domain::entities::PostRecord;
use crate::domain::types::PostId;

use crate::infra::db::{PostgresRepositories, map_sqlx_error};

use super::types::PostRow;

#[async_trait]
impl PostsRepo for PostgresRepositories {
    async fn list_posts(&self) -> Result<Vec<PostRecord>, RepoError> {
        let rows = sqlx::query_as::<_, PostRow>(
            r#"
            SELECT id, title, content, slug, created_at, updated_at
            FROM posts
            ORDER BY created_at DESC, seq DESC
            "#,
        )
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(PostRecord::from).collect())
    }

    async fn find_by_id(&self, id: &PostId) -> Result<Option<PostRecord>, RepoError> {
        let row = sqlx::query_as::<_, PostRow>(
            r#"
            SELECT id, title, content, slug, created_at, updated_at
            FROM posts
            WHERE id = $1
            "#,
        )
        .bind(id.as_str())
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(PostRecord::from))
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<PostRecord>, RepoError> {
        let row = sqlx::query_as::<_, PostRow>(
            r#"
            SELECT id, title, content, slug, created_at, updated_at
            FROM posts
            WHERE slug = $1
            "#,
        )
        .bind(slug)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(PostRecord::from))
    }

    async fn health_check(&self) -> Result<(), RepoError> {
        self.ping().await.map_err(map_sqlx_error)
    }
}

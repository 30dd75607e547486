use async_trait::async_trait;

use crate::application::repos::{NewPostRecord, PostsWriteRepo, RepoError, UpdatePostParams};
use crate::domain::entities::PostRecord;
use crate::domain::types::PostId;

use crate::infra::db::{PostgresRepositories, map_sqlx_error};

use super::types::PostRow;

#[async_trait]
impl PostsWriteRepo for PostgresRepositories {
    async fn insert_post(&self, params: NewPostRecord) -> Result<PostRecord, RepoError> {
        let NewPostRecord {
            id,
            title,
            content,
            slug,
            created_at,
        } = params;

        let row = sqlx::query_as::<_, PostRow>(
            r#"
            INSERT INTO posts (id, title, content, slug, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $5)
            RETURNING id, title, content, slug, created_at, updated_at
            "#,
        )
        .bind(id.as_str())
        .bind(title)
        .bind(content)
        .bind(slug)
        .bind(created_at)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(PostRecord::from(row))
    }

    async fn update_post(&self, params: UpdatePostParams) -> Result<PostRecord, RepoError> {
        let UpdatePostParams {
            id,
            title,
            slug,
            content,
            updated_at,
        } = params;

        let row = sqlx::query_as::<_, PostRow>(
            r#"
            UPDATE posts
            SET title = COALESCE($2, title),
                slug = COALESCE($3, slug),
                content = COALESCE($4, content),
                updated_at = GREATEST(created_at, $5)
            WHERE id = $1
            RETURNING id, title, content, slug, created_at, updated_at
            "#,
        )
        .bind(id.as_str())
        .bind(title)
        .bind(slug)
        .bind(content)
        .bind(updated_at)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        row.map(PostRecord::from).ok_or(RepoError::NotFound)
    }

    async fn delete_post(&self, id: &PostId) -> Result<(), RepoError> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id.as_str())
            .execute(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

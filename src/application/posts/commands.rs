use metrics::counter;
use tracing::{info, warn};

use crate::application::repos::{NewPostRecord, UpdatePostParams};
use crate::domain::entities::PostRecord;
use crate::domain::slug::validate_slug;
use crate::domain::types::PostId;

use super::service::PostService;
use super::types::{
    CreatePostCommand, POST_SLUG_CONFLICTS_METRIC, POSTS_CREATED_METRIC, POSTS_DELETED_METRIC,
    POSTS_UPDATED_METRIC, PostServiceError, UpdatePostCommand, ensure_non_empty,
    normalize_optional,
};

impl PostService {
    pub async fn create_post(
        &self,
        actor: &str,
        command: CreatePostCommand,
    ) -> Result<PostRecord, PostServiceError> {
        ensure_non_empty(&command.title, "title")?;
        ensure_non_empty(&command.slug, "slug")?;
        ensure_non_empty(&command.content, "content")?;
        validate_slug(&command.slug).map_err(PostServiceError::invalid_slug)?;

        // Early answer only; the store's unique constraint decides.
        if self.reader.find_by_slug(&command.slug).await?.is_some() {
            return Err(self.slug_conflict(actor, command.slug));
        }

        let now = self.clock.now();
        let params = NewPostRecord {
            id: self.ids.next_id(),
            title: command.title,
            content: command.content,
            slug: command.slug,
            created_at: now,
        };
        let slug = params.slug.clone();

        let post = match self.writer.insert_post(params).await {
            Ok(post) => post,
            Err(err) => {
                return Err(match PostServiceError::from_write(err, Some(&slug)) {
                    PostServiceError::Conflict { slug } => self.slug_conflict(actor, slug),
                    other => other,
                });
            }
        };

        counter!(POSTS_CREATED_METRIC).increment(1);
        info!(
            target: "scriptorium::posts",
            actor = actor,
            post_id = %post.id,
            slug = %post.slug,
            "post created"
        );

        Ok(post)
    }

    pub async fn update_post(
        &self,
        actor: &str,
        command: UpdatePostCommand,
    ) -> Result<PostRecord, PostServiceError> {
        let title = normalize_optional(command.title);
        let slug = normalize_optional(command.slug);
        let content = normalize_optional(command.content);

        let existing = self
            .reader
            .find_by_id(&command.id)
            .await?
            .ok_or(PostServiceError::NotFound)?;

        if let Some(candidate) = slug.as_deref() {
            validate_slug(candidate).map_err(PostServiceError::invalid_slug)?;
            if let Some(owner) = self.reader.find_by_slug(candidate).await?
                && owner.id != existing.id
            {
                return Err(self.slug_conflict(actor, candidate.to_string()));
            }
        }

        let params = UpdatePostParams {
            id: existing.id,
            title,
            slug: slug.clone(),
            content,
            updated_at: self.clock.now(),
        };

        let post = match self.writer.update_post(params).await {
            Ok(post) => post,
            Err(err) => {
                return Err(match PostServiceError::from_write(err, slug.as_deref()) {
                    PostServiceError::Conflict { slug } => self.slug_conflict(actor, slug),
                    other => other,
                });
            }
        };

        counter!(POSTS_UPDATED_METRIC).increment(1);
        info!(
            target: "scriptorium::posts",
            actor = actor,
            post_id = %post.id,
            slug = %post.slug,
            previous_slug = %existing.slug,
            "post updated"
        );

        Ok(post)
    }

    pub async fn delete_post(&self, actor: &str, id: &PostId) -> Result<(), PostServiceError> {
        self.writer.delete_post(id).await?;

        counter!(POSTS_DELETED_METRIC).increment(1);
        info!(
            target: "scriptorium::posts",
            actor = actor,
            post_id = %id,
            "post deleted"
        );

        Ok(())
    }

    fn slug_conflict(&self, actor: &str, slug: String) -> PostServiceError {
        counter!(POST_SLUG_CONFLICTS_METRIC).increment(1);
        warn!(
            target: "scriptorium::posts",
            actor = actor,
            slug = %slug,
            "slug already in use"
        );
        PostServiceError::Conflict { slug }
    }
}

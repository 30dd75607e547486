use crate::application::repos::RepoError;
use crate::domain::entities::PostRecord;
use crate::domain::types::PostId;

use super::service::PostService;
use super::types::PostServiceError;

impl PostService {
    pub async fn get_post(&self, id: &PostId) -> Result<PostRecord, PostServiceError> {
        self.reader
            .find_by_id(id)
            .await?
            .ok_or(PostServiceError::NotFound)
    }

    pub async fn get_post_by_slug(&self, slug: &str) -> Result<PostRecord, PostServiceError> {
        self.reader
            .find_by_slug(slug)
            .await?
            .ok_or(PostServiceError::NotFound)
    }

    pub async fn list_posts(&self) -> Result<Vec<PostRecord>, PostServiceError> {
        Ok(self.reader.list_posts().await?)
    }

    pub async fn health_check(&self) -> Result<(), RepoError> {
        self.reader.health_check().await
    }
}

//! In-process post store.
//!
//! Backs the test suites and `serve` when no database URL is configured.
//! Every operation holds the single lock for its whole duration, so a slug
//! check and the write that depends on it cannot interleave with another
//! writer.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::application::repos::{
    NewPostRecord, POSTS_ID_CONSTRAINT, POSTS_SLUG_CONSTRAINT, PostsRepo, PostsWriteRepo,
    RepoError, UpdatePostParams,
};
use crate::domain::entities::PostRecord;
use crate::domain::types::PostId;

#[derive(Clone, Default)]
pub struct MemoryRepositories {
    state: Arc<RwLock<MemoryState>>,
}

#[derive(Default)]
struct MemoryState {
    posts: HashMap<PostId, StoredPost>,
    slugs: HashMap<String, PostId>,
    next_seq: u64,
}

struct StoredPost {
    seq: u64,
    record: PostRecord,
}

impl MemoryRepositories {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.state.read().await.posts.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl PostsRepo for MemoryRepositories {
    async fn list_posts(&self) -> Result<Vec<PostRecord>, RepoError> {
        let state = self.state.read().await;
        let mut rows: Vec<&StoredPost> = state.posts.values().collect();
        rows.sort_by(|a, b| {
            b.record
                .created_at
                .cmp(&a.record.created_at)
                .then(b.seq.cmp(&a.seq))
        });
        Ok(rows.into_iter().map(|row| row.record.clone()).collect())
    }

    async fn find_by_id(&self, id: &PostId) -> Result<Option<PostRecord>, RepoError> {
        let state = self.state.read().await;
        Ok(state.posts.get(id).map(|row| row.record.clone()))
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<PostRecord>, RepoError> {
        let state = self.state.read().await;
        Ok(state
            .slugs
            .get(slug)
            .and_then(|id| state.posts.get(id))
            .map(|row| row.record.clone()))
    }

    async fn health_check(&self) -> Result<(), RepoError> {
        Ok(())
    }
}

#[async_trait]
impl PostsWriteRepo for MemoryRepositories {
    async fn insert_post(&self, params: NewPostRecord) -> Result<PostRecord, RepoError> {
        let mut state = self.state.write().await;

        if state.posts.contains_key(&params.id) {
            return Err(RepoError::duplicate(POSTS_ID_CONSTRAINT));
        }
        if state.slugs.contains_key(&params.slug) {
            return Err(RepoError::duplicate(POSTS_SLUG_CONSTRAINT));
        }

        let record = PostRecord {
            id: params.id,
            title: params.title,
            content: params.content,
            slug: params.slug,
            created_at: params.created_at,
            updated_at: params.created_at,
        };

        state.next_seq += 1;
        let seq = state.next_seq;
        state
            .slugs
            .insert(record.slug.clone(), record.id.clone());
        state.posts.insert(
            record.id.clone(),
            StoredPost {
                seq,
                record: record.clone(),
            },
        );

        Ok(record)
    }

    async fn update_post(&self, params: UpdatePostParams) -> Result<PostRecord, RepoError> {
        let mut state = self.state.write().await;
        let MemoryState { posts, slugs, .. } = &mut *state;

        let stored = posts.get_mut(&params.id).ok_or(RepoError::NotFound)?;

        if let Some(slug) = params.slug.as_ref()
            && let Some(owner) = slugs.get(slug)
            && owner != &params.id
        {
            return Err(RepoError::duplicate(POSTS_SLUG_CONSTRAINT));
        }

        let record = &mut stored.record;
        if let Some(title) = params.title {
            record.title = title;
        }
        if let Some(content) = params.content {
            record.content = content;
        }
        if let Some(slug) = params.slug
            && slug != record.slug
        {
            slugs.remove(&record.slug);
            slugs.insert(slug.clone(), record.id.clone());
            record.slug = slug;
        }
        record.updated_at = params.updated_at.max(record.created_at);

        Ok(record.clone())
    }

    async fn delete_post(&self, id: &PostId) -> Result<(), RepoError> {
        let mut state = self.state.write().await;
        let removed = state.posts.remove(id).ok_or(RepoError::NotFound)?;
        state.slugs.remove(&removed.record.slug);
        Ok(())
    }
}

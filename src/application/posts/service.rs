use std::sync::Arc;

use crate::application::clock::{Clock, IdGenerator};
use crate::application::repos::{PostsRepo, PostsWriteRepo};

/// Business rules for creating, editing, deleting and reading posts.
#[derive(Clone)]
pub struct PostService {
    pub(crate) reader: Arc<dyn PostsRepo>,
    pub(crate) writer: Arc<dyn PostsWriteRepo>,
    pub(crate) ids: Arc<dyn IdGenerator>,
    pub(crate) clock: Arc<dyn Clock>,
}

impl PostService {
    pub fn new(
        reader: Arc<dyn PostsRepo>,
        writer: Arc<dyn PostsWriteRepo>,
        ids: Arc<dyn IdGenerator>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            reader,
            writer,
            ids,
            clock,
        }
    }
}

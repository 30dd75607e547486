use std::sync::Arc;

use crate::application::admin_gate::AdminGate;
use crate::application::posts::PostService;

#[derive(Clone)]
pub struct ApiState {
    pub posts: Arc<PostService>,
    pub admin_gate: Arc<AdminGate>,
}

impl ApiState {
    pub fn new(posts: PostService, admin_gate: AdminGate) -> Self {
        Self {
            posts: Arc::new(posts),
            admin_gate: Arc::new(admin_gate),
        }
    }
}

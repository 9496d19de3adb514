use std::sync::Arc;

use crate::{middleware::auth::SessionKeys, store::StorefrontStore};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn StorefrontStore>,
    pub sessions: SessionKeys,
}

impl AppState {
    pub fn new(store: Arc<dyn StorefrontStore>, sessions: SessionKeys) -> Self {
        Self { store, sessions }
    }
}

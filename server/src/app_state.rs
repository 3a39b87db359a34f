use std::sync::Arc;

use vellum_core::{model::repository::db::DbPool, upload::ImageStore};

pub struct AppState {
    pub pool: DbPool,
    pub image_store: Arc<dyn ImageStore>,
}

pub type SharedState = Arc<AppState>;

use axum::Router;

use crate::app_state::SharedState;

pub mod gallery;
pub mod post;

pub fn api_router() -> Router<SharedState> {
    Router::new().nest("/api/posts", post::router())
}

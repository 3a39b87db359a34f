use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};

use vellum_core::model::{
    self,
    repository::{self, post::CreatePost, post::Visibility},
};

use crate::{
    app_state::SharedState,
    http_error::{ApiError, ApiResult},
    schema::{CreatePostRequest, Image, Post},
};

pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/", get(get_published_posts).post(create_post))
        .route("/slug/:slug", get(get_post_by_slug))
        .merge(super::gallery::router())
}

#[utoipa::path(
    get,
    path = "/api/posts",
    responses((status = 200, body=Vec<Post>)),
)]
#[tracing::instrument(skip(app_state))]
pub async fn get_published_posts(
    State(app_state): State<SharedState>,
) -> ApiResult<Json<Vec<Post>>> {
    let posts = repository::post::get_published_posts(&app_state.pool).await?;
    let mut out = Vec::with_capacity(posts.len());
    for post in posts {
        let images = repository::post::get_post_images(&app_state.pool, post.id).await?;
        out.push(Post::from_model(&post, &images));
    }
    Ok(Json(out))
}

#[utoipa::path(
    get,
    path = "/api/posts/slug/{slug}",
    params(("slug" = String, Path,)),
    responses((status = 200, body=Post), (status = 404)),
)]
#[tracing::instrument(skip(app_state))]
pub async fn get_post_by_slug(
    State(app_state): State<SharedState>,
    Path(slug): Path<String>,
) -> ApiResult<Json<Post>> {
    let post = repository::post::get_post_by_slug(&app_state.pool, &slug, Visibility::PublishedOnly)
        .await?
        .ok_or(ApiError::NotFound("post"))?;
    let images = repository::post::get_post_images(&app_state.pool, post.id).await?;
    Ok(Json(Post::from_model(&post, &images)))
}

#[utoipa::path(
    post,
    path = "/api/posts",
    request_body = CreatePostRequest,
    responses((status = 201, body=Post), (status = 400)),
)]
#[tracing::instrument(skip(app_state, request))]
pub async fn create_post(
    State(app_state): State<SharedState>,
    Json(request): Json<CreatePostRequest>,
) -> ApiResult<(StatusCode, Json<Post>)> {
    let title = request.title.unwrap_or_default();
    let content = request.content.unwrap_or_default();
    if title.is_empty() || content.is_empty() {
        return Err(ApiError::Invalid(
            "Title and content are required".to_owned(),
        ));
    }
    let create = CreatePost {
        title,
        content,
        // an omitted status means the post starts out as a draft
        status: request
            .status
            .map(crate::schema::PostStatus::into_model)
            .unwrap_or(model::PostStatus::Draft),
        images: request.images.into_iter().map(Image::into_model).collect(),
    };
    let post_id = repository::post::insert_post(&app_state.pool, &create).await?;
    let post = repository::post::get_post(&app_state.pool, post_id, Visibility::All)
        .await?
        .ok_or(ApiError::NotFound("post"))?;
    let images = repository::post::get_post_images(&app_state.pool, post_id).await?;
    Ok((StatusCode::CREATED, Json(Post::from_model(&post, &images))))
}

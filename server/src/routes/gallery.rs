use axum::{
    extract::{Multipart, Path, State},
    routing::{patch, post, put},
    Json, Router,
};

use vellum_core::{
    gallery::{self, ImageField},
    model::{
        repository::{self, post::Visibility},
        ImageRecord, PostId,
    },
    upload::UploadFile,
};

use crate::{
    app_state::{AppState, SharedState},
    http_error::{ApiError, ApiResult},
    schema::{EditImageRequest, Image, SetPriorityRequest},
};

pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/:id/images", post(upload_images))
        .route("/:id/images/:index", patch(edit_image).delete(remove_image))
        .route("/:id/images/:index/priority", put(set_image_priority))
}

async fn load_post_images(
    app_state: &AppState,
    id: i64,
) -> Result<(PostId, Vec<ImageRecord>), ApiError> {
    let post_id = PostId(id);
    repository::post::get_post(&app_state.pool, post_id, Visibility::All)
        .await?
        .ok_or(ApiError::NotFound("post"))?;
    let images = repository::post::get_post_images(&app_state.pool, post_id).await?;
    Ok((post_id, images))
}

fn to_schema(images: &[ImageRecord]) -> Vec<Image> {
    images.iter().map(Image::from_model).collect()
}

/// Upload one or more image files and append them to the post's gallery.
///
/// Fields are consumed strictly in order: each file's upload fully settles
/// and, on success, is committed before the next field is read, so
/// priorities always follow the order files were sent. A failed file is
/// skipped; the rest of the batch still goes through and its error is
/// reported after the last field.
#[utoipa::path(
    post,
    path = "/api/posts/{id}/images",
    responses((status = 200, body=Vec<Image>), (status = 400), (status = 404)),
)]
#[tracing::instrument(skip(app_state, multipart))]
pub async fn upload_images(
    State(app_state): State<SharedState>,
    Path(id): Path<i64>,
    mut multipart: Multipart,
) -> ApiResult<Json<Vec<Image>>> {
    let (post_id, mut images) = load_post_images(&app_state, id).await?;
    let mut first_error = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| ApiError::Invalid(format!("Invalid multipart data: {}", err)))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().unwrap_or("image").to_owned();
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_owned();
        let bytes = field
            .bytes()
            .await
            .map_err(|err| ApiError::Invalid(format!("Invalid multipart data: {}", err)))?;
        let file = UploadFile {
            file_name,
            content_type,
            bytes: bytes.to_vec(),
        };
        match gallery::upload_and_append(app_state.image_store.as_ref(), &images, &file).await {
            Ok(updated) => {
                images = updated;
                repository::post::replace_post_images(&app_state.pool, post_id, &images).await?;
            }
            Err(err) => {
                if first_error.is_none() {
                    first_error = Some(err);
                }
            }
        }
    }
    if let Some(err) = first_error {
        return Err(err.into());
    }
    Ok(Json(to_schema(&images)))
}

#[utoipa::path(
    delete,
    path = "/api/posts/{id}/images/{index}",
    responses((status = 200, body=Vec<Image>), (status = 400), (status = 404)),
)]
#[tracing::instrument(skip(app_state))]
pub async fn remove_image(
    State(app_state): State<SharedState>,
    Path((id, index)): Path<(i64, usize)>,
) -> ApiResult<Json<Vec<Image>>> {
    let (post_id, images) = load_post_images(&app_state, id).await?;
    if index >= images.len() {
        return Err(ApiError::Invalid(format!(
            "image index {} out of range",
            index
        )));
    }
    let updated = gallery::remove(&images, index);
    repository::post::replace_post_images(&app_state.pool, post_id, &updated).await?;
    Ok(Json(to_schema(&updated)))
}

/// Move an image to a new 1-based rank. A target outside 1..=N is a no-op
/// and returns the unchanged sequence.
#[utoipa::path(
    put,
    path = "/api/posts/{id}/images/{index}/priority",
    request_body = SetPriorityRequest,
    responses((status = 200, body=Vec<Image>), (status = 400), (status = 404)),
)]
#[tracing::instrument(skip(app_state))]
pub async fn set_image_priority(
    State(app_state): State<SharedState>,
    Path((id, index)): Path<(i64, usize)>,
    Json(request): Json<SetPriorityRequest>,
) -> ApiResult<Json<Vec<Image>>> {
    let (post_id, images) = load_post_images(&app_state, id).await?;
    if index >= images.len() {
        return Err(ApiError::Invalid(format!(
            "image index {} out of range",
            index
        )));
    }
    let updated = gallery::reorder(&images, index, request.priority);
    if updated != images {
        repository::post::replace_post_images(&app_state.pool, post_id, &updated).await?;
    }
    Ok(Json(to_schema(&updated)))
}

#[utoipa::path(
    patch,
    path = "/api/posts/{id}/images/{index}",
    request_body = EditImageRequest,
    responses((status = 200, body=Vec<Image>), (status = 400), (status = 404)),
)]
#[tracing::instrument(skip(app_state, request))]
pub async fn edit_image(
    State(app_state): State<SharedState>,
    Path((id, index)): Path<(i64, usize)>,
    Json(request): Json<EditImageRequest>,
) -> ApiResult<Json<Vec<Image>>> {
    let (post_id, mut images) = load_post_images(&app_state, id).await?;
    if index >= images.len() {
        return Err(ApiError::Invalid(format!(
            "image index {} out of range",
            index
        )));
    }
    if let Some(title) = request.title {
        images = gallery::edit_field(&images, index, ImageField::Title(title));
    }
    if let Some(description) = request.description {
        images = gallery::edit_field(&images, index, ImageField::Description(description));
    }
    repository::post::replace_post_images(&app_state.pool, post_id, &images).await?;
    Ok(Json(to_schema(&images)))
}

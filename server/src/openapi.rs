use utoipa::OpenApi;

use crate::{routes, schema};

#[derive(OpenApi)]
#[openapi(
    paths(
        routes::post::get_published_posts,
        routes::post::get_post_by_slug,
        routes::post::create_post,
        routes::gallery::upload_images,
        routes::gallery::remove_image,
        routes::gallery::set_image_priority,
        routes::gallery::edit_image,
    ),
    components(schemas(
        schema::Post,
        schema::PostStatus,
        schema::Image,
        schema::CreatePostRequest,
        schema::SetPriorityRequest,
        schema::EditImageRequest,
    ))
)]
pub struct ApiDoc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use vellum_core::model;

use super::Image;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum PostStatus {
    Draft,
    Published,
}

impl PostStatus {
    pub fn from_model(value: model::PostStatus) -> PostStatus {
        match value {
            model::PostStatus::Draft => PostStatus::Draft,
            model::PostStatus::Published => PostStatus::Published,
        }
    }

    pub fn into_model(self) -> model::PostStatus {
        match self {
            PostStatus::Draft => model::PostStatus::Draft,
            PostStatus::Published => model::PostStatus::Published,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub status: PostStatus,
    pub images: Vec<Image>,
    pub created_at: DateTime<Utc>,
    pub changed_at: DateTime<Utc>,
}

impl Post {
    pub fn from_model(post: &model::Post, images: &[model::ImageRecord]) -> Post {
        Post {
            id: post.id.0,
            title: post.title.clone(),
            slug: post.slug.clone(),
            content: post.content.clone(),
            status: PostStatus::from_model(post.status),
            images: images.iter().map(Image::from_model).collect(),
            created_at: post.created_at,
            changed_at: post.changed_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub status: Option<PostStatus>,
    #[serde(default)]
    pub images: Vec<Image>,
}

use eyre::Result;
use sqlx::FromRow;

use crate::model::{
    util::datetime_from_db_repr, ImageRecord, Post, PostId, PostStatus,
};

#[derive(sqlx::Type, Debug, Clone, PartialEq, Eq, Copy)]
#[repr(i32)]
pub enum DbPostStatus {
    Draft = 1,
    Published = 2,
}

impl From<PostStatus> for DbPostStatus {
    fn from(value: PostStatus) -> Self {
        match value {
            PostStatus::Draft => DbPostStatus::Draft,
            PostStatus::Published => DbPostStatus::Published,
        }
    }
}

impl From<DbPostStatus> for PostStatus {
    fn from(value: DbPostStatus) -> Self {
        match value {
            DbPostStatus::Draft => PostStatus::Draft,
            DbPostStatus::Published => PostStatus::Published,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct DbPost {
    pub id: PostId,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub status: DbPostStatus,
    pub created_at: String,
    pub changed_at: String,
}

impl TryFrom<DbPost> for Post {
    type Error = eyre::Report;

    fn try_from(value: DbPost) -> Result<Post> {
        Ok(Post {
            id: value.id,
            title: value.title,
            slug: value.slug,
            content: value.content,
            status: value.status.into(),
            created_at: datetime_from_db_repr(&value.created_at)?,
            changed_at: datetime_from_db_repr(&value.changed_at)?,
        })
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct DbPostImage {
    pub post_id: PostId,
    pub idx: i64,
    pub url: String,
    pub title: String,
    pub description: String,
}

impl From<DbPostImage> for ImageRecord {
    fn from(value: DbPostImage) -> Self {
        ImageRecord {
            url: value.url,
            title: value.title,
            description: value.description,
            priority: value.idx + 1,
        }
    }
}

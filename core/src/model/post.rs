use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::PostId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PostStatus {
    Draft,
    Published,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub id: PostId,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub status: PostStatus,
    pub created_at: DateTime<Utc>,
    pub changed_at: DateTime<Utc>,
}

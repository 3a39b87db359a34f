use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use vellum_core::model;

/// Wire shape of one gallery image, identical to the stored record. The
/// sequence a client receives is the sequence it sends back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    pub url: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub priority: i64,
}

impl Image {
    pub fn from_model(record: &model::ImageRecord) -> Image {
        Image {
            url: record.url.clone(),
            title: record.title.clone(),
            description: record.description.clone(),
            priority: record.priority,
        }
    }

    pub fn into_model(self) -> model::ImageRecord {
        model::ImageRecord {
            url: self.url,
            title: self.title,
            description: self.description,
            priority: self.priority,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SetPriorityRequest {
    pub priority: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EditImageRequest {
    pub title: Option<String>,
    pub description: Option<String>,
}

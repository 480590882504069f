use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::application::services::ImportedRecord;
use crate::domain::entities::GeneratedContent;
use crate::domain::value_objects::ContentType;

#[derive(Debug, Deserialize)]
pub struct GenerateContentRequestDto {
    pub content_type: ContentType,
    pub prompt: String,
}

#[derive(Debug, Serialize)]
pub struct GeneratedContentDto {
    pub content_type: ContentType,
    pub raw_text: String,
    pub content: Value,
    pub repaired: bool,
}

impl From<GeneratedContent> for GeneratedContentDto {
    fn from(value: GeneratedContent) -> Self {
        Self {
            content_type: value.content_type,
            raw_text: value.raw_text,
            content: value.value,
            repaired: value.repaired,
        }
    }
}

/// Import request; `content` is the reviewed (possibly edited) JSON
#[derive(Debug, Deserialize)]
pub struct ImportContentRequestDto {
    pub content_type: ContentType,
    pub content: Value,
}

#[derive(Debug, Serialize)]
pub struct ImportContentResponseDto {
    pub imported: Vec<ImportedRecord>,
}

#[derive(Debug, Serialize)]
pub struct ContentTypeDto {
    pub name: &'static str,
    pub label: &'static str,
    pub collection: Option<&'static str>,
}

impl From<ContentType> for ContentTypeDto {
    fn from(value: ContentType) -> Self {
        Self {
            name: value.name(),
            label: value.label(),
            collection: value.collection(),
        }
    }
}

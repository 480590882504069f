//! Generated admin content and the records it imports as

use serde::Serialize;
use serde_json::Value;

use crate::domain::value_objects::ContentType;

/// Model output that is known to parse as JSON
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeneratedContent {
    pub content_type: ContentType,
    /// Fence-stripped text as the model produced it
    pub raw_text: String,
    #[serde(skip)]
    pub value: Value,
    /// Whether the repair pass produced this content
    pub repaired: bool,
}

/// One record to write into the document store
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportableRecord {
    pub collection: String,
    pub payload: Value,
}

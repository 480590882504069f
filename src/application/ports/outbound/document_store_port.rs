//! Document store port - Generic collection/document persistence
//!
//! Mirrors the operations of a hosted document database: documents are JSON
//! objects addressed by `collection/id`. Permission failures are their own
//! error variant so callers can surface them instead of folding them into a
//! generic failure.

use std::fmt;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::{Map, Value};

/// The kind of operation attempted against the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreOperation {
    Create,
    Write,
    Update,
    Delete,
}

impl fmt::Display for StoreOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StoreOperation::Create => "create",
            StoreOperation::Write => "write",
            StoreOperation::Update => "update",
            StoreOperation::Delete => "delete",
        };
        f.write_str(name)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Permission denied: {operation} on {path}")]
    PermissionDenied {
        path: String,
        operation: StoreOperation,
    },
    #[error("Document not found: {path}")]
    NotFound { path: String },
    #[error("Invalid document path: {0}")]
    InvalidPath(String),
    #[error("Document must be a JSON object: {path}")]
    NotAnObject { path: String },
    #[error("Database error: {0}")]
    Database(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// A stored document
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    pub id: String,
    pub data: Map<String, Value>,
}

#[async_trait]
pub trait DocumentStorePort: Send + Sync {
    async fn get_document(&self, collection: &str, id: &str)
        -> Result<Option<Document>, StoreError>;

    /// All documents of a collection, in insertion order
    async fn get_collection(&self, collection: &str) -> Result<Vec<Document>, StoreError>;

    /// Create or replace a document; with `merge` the top-level fields of
    /// `data` are merged into an existing document instead
    async fn set_document(
        &self,
        collection: &str,
        id: &str,
        data: Map<String, Value>,
        merge: bool,
    ) -> Result<(), StoreError>;

    /// Create a document with a store-assigned id
    async fn add_document(
        &self,
        collection: &str,
        data: Map<String, Value>,
    ) -> Result<String, StoreError>;

    /// Merge fields into an existing document; missing documents are an error
    async fn update_document(
        &self,
        collection: &str,
        id: &str,
        data: Map<String, Value>,
    ) -> Result<(), StoreError>;

    async fn delete_document(&self, collection: &str, id: &str) -> Result<(), StoreError>;
}

pub fn document_path(collection: &str, id: &str) -> String {
    format!("{}/{}", collection, id)
}

/// Reject empty or slash-containing segments before touching the store
pub fn validate_segment(segment: &str) -> Result<(), StoreError> {
    if segment.trim().is_empty() || segment.contains('/') {
        return Err(StoreError::InvalidPath(segment.to_string()));
    }
    Ok(())
}

/// Shallow merge: top-level fields of `patch` overwrite those of `target`
pub fn merge_fields(target: &mut Map<String, Value>, patch: Map<String, Value>) {
    for (key, value) in patch {
        target.insert(key, value);
    }
}

/// Accept only JSON objects as document bodies
pub fn into_object(path: &str, value: Value) -> Result<Map<String, Value>, StoreError> {
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(StoreError::NotAnObject {
            path: path.to_string(),
        }),
    }
}

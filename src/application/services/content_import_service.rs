//! Content Import Service - writes generated content into the document store
//!
//! Import is a separate step the admin triggers after reviewing generated
//! content. Single-record types go to their fixed collection; a Season
//! carries its own collection per record.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tracing::{info, instrument};

use crate::application::ports::outbound::{
    into_object, validate_segment, DocumentStorePort, StoreError,
};
use crate::domain::entities::ImportableRecord;
use crate::domain::value_objects::ContentType;

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("{content_type} content must be a JSON object")]
    ExpectedObject { content_type: ContentType },
    #[error("Season content must be a JSON array of {{collection, data}} records")]
    ExpectedArray,
    #[error("Season record {index} is malformed: {reason}")]
    MalformedRecord { index: usize, reason: String },
    #[error("Nothing to import")]
    Empty,
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// A record written by an import
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportedRecord {
    pub collection: String,
    pub id: String,
}

/// Turn parsed content into the records to write, validating everything
/// before anything is written.
pub fn plan_records(
    content_type: ContentType,
    content: &Value,
) -> Result<Vec<ImportableRecord>, ImportError> {
    let Some(collection) = content_type.collection() else {
        return plan_season(content);
    };

    if !content.is_object() {
        return Err(ImportError::ExpectedObject { content_type });
    }
    Ok(vec![ImportableRecord {
        collection: collection.to_string(),
        payload: content.clone(),
    }])
}

fn plan_season(content: &Value) -> Result<Vec<ImportableRecord>, ImportError> {
    let entries = content.as_array().ok_or(ImportError::ExpectedArray)?;
    if entries.is_empty() {
        return Err(ImportError::Empty);
    }

    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let malformed = |reason: &str| ImportError::MalformedRecord {
                index,
                reason: reason.to_string(),
            };
            let collection = entry
                .get("collection")
                .and_then(Value::as_str)
                .ok_or_else(|| malformed("missing string field 'collection'"))?;
            validate_segment(collection).map_err(|_| malformed("invalid collection name"))?;
            let data = entry
                .get("data")
                .filter(|d| d.is_object())
                .ok_or_else(|| malformed("missing object field 'data'"))?;
            Ok(ImportableRecord {
                collection: collection.to_string(),
                payload: data.clone(),
            })
        })
        .collect()
}

#[derive(Clone)]
pub struct ContentImportService {
    store: Arc<dyn DocumentStorePort>,
}

impl ContentImportService {
    pub fn new(store: Arc<dyn DocumentStorePort>) -> Self {
        Self { store }
    }

    /// Write every record in order; stops at the first store failure
    #[instrument(skip(self, content))]
    pub async fn import(
        &self,
        content_type: ContentType,
        content: &Value,
    ) -> Result<Vec<ImportedRecord>, ImportError> {
        let records = plan_records(content_type, content)?;

        let mut imported = Vec::with_capacity(records.len());
        for record in records {
            let data = into_object(&record.collection, record.payload)?;
            let id = self.store.add_document(&record.collection, data).await?;
            imported.push(ImportedRecord {
                collection: record.collection,
                id,
            });
        }

        info!(count = imported.len(), "Imported generated content");
        Ok(imported)
    }
}

//! Collection access rules
//!
//! A decorator over any document store that rejects writes to read-only
//! collections with `StoreError::PermissionDenied`, the way a hosted
//! document database enforces its security rules.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};
use tracing::error;

use crate::application::ports::outbound::{
    document_path, Document, DocumentStorePort, StoreError, StoreOperation,
};

#[derive(Debug, Clone, Default)]
pub struct AccessRules {
    read_only: HashSet<String>,
}

impl AccessRules {
    pub fn read_only<I, S>(collections: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            read_only: collections.into_iter().map(Into::into).collect(),
        }
    }

    pub fn allows_write(&self, collection: &str) -> bool {
        !self.read_only.contains(collection)
    }
}

pub struct RuleEnforcedStore {
    inner: Arc<dyn DocumentStorePort>,
    rules: AccessRules,
}

impl RuleEnforcedStore {
    pub fn new(inner: Arc<dyn DocumentStorePort>, rules: AccessRules) -> Self {
        Self { inner, rules }
    }

    fn check_write(
        &self,
        collection: &str,
        path: String,
        operation: StoreOperation,
    ) -> Result<(), StoreError> {
        if self.rules.allows_write(collection) {
            return Ok(());
        }
        error!(%path, %operation, "Store permission denied");
        Err(StoreError::PermissionDenied { path, operation })
    }
}

#[async_trait]
impl DocumentStorePort for RuleEnforcedStore {
    async fn get_document(
        &self,
        collection: &str,
        id: &str,
    ) -> Result<Option<Document>, StoreError> {
        self.inner.get_document(collection, id).await
    }

    async fn get_collection(&self, collection: &str) -> Result<Vec<Document>, StoreError> {
        self.inner.get_collection(collection).await
    }

    async fn set_document(
        &self,
        collection: &str,
        id: &str,
        data: Map<String, Value>,
        merge: bool,
    ) -> Result<(), StoreError> {
        self.check_write(collection, document_path(collection, id), StoreOperation::Write)?;
        self.inner.set_document(collection, id, data, merge).await
    }

    async fn add_document(
        &self,
        collection: &str,
        data: Map<String, Value>,
    ) -> Result<String, StoreError> {
        self.check_write(collection, collection.to_string(), StoreOperation::Create)?;
        self.inner.add_document(collection, data).await
    }

    async fn update_document(
        &self,
        collection: &str,
        id: &str,
        data: Map<String, Value>,
    ) -> Result<(), StoreError> {
        self.check_write(collection, document_path(collection, id), StoreOperation::Update)?;
        self.inner.update_document(collection, id, data).await
    }

    async fn delete_document(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        self.check_write(collection, document_path(collection, id), StoreOperation::Delete)?;
        self.inner.delete_document(collection, id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::persistence::InMemoryDocumentStore;
    use serde_json::json;

    fn guarded() -> (Arc<InMemoryDocumentStore>, RuleEnforcedStore) {
        let inner = Arc::new(InMemoryDocumentStore::new());
        let store = RuleEnforcedStore::new(inner.clone(), AccessRules::read_only(["classes"]));
        (inner, store)
    }

    fn data() -> Map<String, Value> {
        json!({"name": "Mago"}).as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn test_writes_to_read_only_collection_denied() {
        let (inner, store) = guarded();
        inner.set_document("classes", "mago", data(), false).await.unwrap();

        let err = store.delete_document("classes", "mago").await.unwrap_err();
        assert!(matches!(
            err,
            StoreError::PermissionDenied { ref path, operation: StoreOperation::Delete } if path == "classes/mago"
        ));

        let err = store.set_document("classes", "mago", data(), true).await.unwrap_err();
        assert!(matches!(err, StoreError::PermissionDenied { operation: StoreOperation::Write, .. }));

        let err = store.update_document("classes", "mago", data()).await.unwrap_err();
        assert!(matches!(err, StoreError::PermissionDenied { operation: StoreOperation::Update, .. }));

        assert!(inner.get_document("classes", "mago").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_reads_and_other_collections_pass_through() {
        let (_, store) = guarded();

        assert!(store.get_collection("classes").await.unwrap().is_empty());
        let id = store.add_document("weapons", data()).await.unwrap();
        assert!(store.get_document("weapons", &id).await.unwrap().is_some());
    }
}

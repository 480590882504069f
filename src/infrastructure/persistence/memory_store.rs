//! In-memory store adapters
//!
//! Used when `MUNDO_STORE_BACKEND=memory` and as fakes in service tests.

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::application::ports::outbound::{
    document_path, merge_fields, validate_segment, CharacterStoreError, CharacterStorePort,
    Document, DocumentStorePort, StoreError,
};
use crate::domain::entities::PlayerCharacter;

/// Collections keep their documents in insertion order
#[derive(Default)]
pub struct InMemoryDocumentStore {
    collections: RwLock<HashMap<String, Vec<Document>>>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStorePort for InMemoryDocumentStore {
    async fn get_document(
        &self,
        collection: &str,
        id: &str,
    ) -> Result<Option<Document>, StoreError> {
        validate_segment(collection)?;
        validate_segment(id)?;
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.iter().find(|d| d.id == id))
            .cloned())
    }

    async fn get_collection(&self, collection: &str) -> Result<Vec<Document>, StoreError> {
        validate_segment(collection)?;
        let collections = self.collections.read().await;
        Ok(collections.get(collection).cloned().unwrap_or_default())
    }

    async fn set_document(
        &self,
        collection: &str,
        id: &str,
        data: Map<String, Value>,
        merge: bool,
    ) -> Result<(), StoreError> {
        validate_segment(collection)?;
        validate_segment(id)?;
        let mut collections = self.collections.write().await;
        let docs = collections.entry(collection.to_string()).or_default();

        match docs.iter_mut().find(|d| d.id == id) {
            Some(existing) if merge => merge_fields(&mut existing.data, data),
            Some(existing) => existing.data = data,
            None => docs.push(Document {
                id: id.to_string(),
                data,
            }),
        }
        Ok(())
    }

    async fn add_document(
        &self,
        collection: &str,
        data: Map<String, Value>,
    ) -> Result<String, StoreError> {
        validate_segment(collection)?;
        let id = Uuid::new_v4().to_string();
        let mut collections = self.collections.write().await;
        collections
            .entry(collection.to_string())
            .or_default()
            .push(Document {
                id: id.clone(),
                data,
            });
        Ok(id)
    }

    async fn update_document(
        &self,
        collection: &str,
        id: &str,
        data: Map<String, Value>,
    ) -> Result<(), StoreError> {
        validate_segment(collection)?;
        validate_segment(id)?;
        let mut collections = self.collections.write().await;
        let existing = collections
            .get_mut(collection)
            .and_then(|docs| docs.iter_mut().find(|d| d.id == id))
            .ok_or_else(|| StoreError::NotFound {
                path: document_path(collection, id),
            })?;
        merge_fields(&mut existing.data, data);
        Ok(())
    }

    async fn delete_document(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        validate_segment(collection)?;
        validate_segment(id)?;
        let mut collections = self.collections.write().await;
        if let Some(docs) = collections.get_mut(collection) {
            docs.retain(|d| d.id != id);
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryCharacterStore {
    character: RwLock<Option<PlayerCharacter>>,
}

impl InMemoryCharacterStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CharacterStorePort for InMemoryCharacterStore {
    async fn load(&self) -> Result<Option<PlayerCharacter>, CharacterStoreError> {
        Ok(self.character.read().await.clone())
    }

    async fn save(&self, character: &PlayerCharacter) -> Result<(), CharacterStoreError> {
        *self.character.write().await = Some(character.clone());
        Ok(())
    }
}

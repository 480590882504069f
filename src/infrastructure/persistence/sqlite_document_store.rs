use async_trait::async_trait;
use serde_json::{Map, Value};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::application::ports::outbound::{
    document_path, merge_fields, validate_segment, Document, DocumentStorePort, StoreError,
};

pub struct SqliteDocumentStore {
    pool: SqlitePool,
}

impl SqliteDocumentStore {
    pub async fn new(pool: SqlitePool) -> Result<Self, sqlx::Error> {
        sqlx::query(r#"
            CREATE TABLE IF NOT EXISTS documents (
                collection TEXT NOT NULL,
                id TEXT NOT NULL,
                data TEXT NOT NULL,
                created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
                updated_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
                PRIMARY KEY (collection, id)
            )
        "#).execute(&pool).await?;

        Ok(Self { pool })
    }
}

fn db_error(e: sqlx::Error) -> StoreError {
    StoreError::Database(e.to_string())
}

fn encode(data: &Map<String, Value>) -> Result<String, StoreError> {
    serde_json::to_string(data).map_err(|e| StoreError::Serialization(e.to_string()))
}

fn decode(path: &str, raw: &str) -> Result<Map<String, Value>, StoreError> {
    serde_json::from_str(raw)
        .map_err(|e| StoreError::Serialization(format!("{}: {}", path, e)))
}

#[async_trait]
impl DocumentStorePort for SqliteDocumentStore {
    async fn get_document(
        &self,
        collection: &str,
        id: &str,
    ) -> Result<Option<Document>, StoreError> {
        validate_segment(collection)?;
        validate_segment(id)?;

        let row: Option<(String,)> =
            sqlx::query_as("SELECT data FROM documents WHERE collection = ? AND id = ?")
                .bind(collection)
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(db_error)?;

        row.map(|(raw,)| {
            Ok(Document {
                id: id.to_string(),
                data: decode(&document_path(collection, id), &raw)?,
            })
        })
        .transpose()
    }

    async fn get_collection(&self, collection: &str) -> Result<Vec<Document>, StoreError> {
        validate_segment(collection)?;

        let rows: Vec<(String, String)> =
            sqlx::query_as("SELECT id, data FROM documents WHERE collection = ? ORDER BY rowid")
                .bind(collection)
                .fetch_all(&self.pool)
                .await
                .map_err(db_error)?;

        rows.into_iter()
            .map(|(id, raw)| {
                let data = decode(&document_path(collection, &id), &raw)?;
                Ok(Document { id, data })
            })
            .collect()
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

        let mut tx = self.pool.begin().await.map_err(db_error)?;

        let data = if merge {
            let existing: Option<(String,)> =
                sqlx::query_as("SELECT data FROM documents WHERE collection = ? AND id = ?")
                    .bind(collection)
                    .bind(id)
                    .fetch_optional(&mut *tx)
                    .await
                    .map_err(db_error)?;
            match existing {
                Some((raw,)) => {
                    let mut current = decode(&document_path(collection, id), &raw)?;
                    merge_fields(&mut current, data);
                    current
                }
                None => data,
            }
        } else {
            data
        };

        // Upsert keeps the original rowid so collection order is stable
        sqlx::query(r#"
            INSERT INTO documents (collection, id, data) VALUES (?, ?, ?)
            ON CONFLICT(collection, id) DO UPDATE SET data = excluded.data, updated_at = CURRENT_TIMESTAMP
        "#)
            .bind(collection)
            .bind(id)
            .bind(encode(&data)?)
            .execute(&mut *tx)
            .await
            .map_err(db_error)?;

        tx.commit().await.map_err(db_error)
    }

    async fn add_document(
        &self,
        collection: &str,
        data: Map<String, Value>,
    ) -> Result<String, StoreError> {
        validate_segment(collection)?;

        let id = Uuid::new_v4().to_string();
        sqlx::query("INSERT INTO documents (collection, id, data) VALUES (?, ?, ?)")
            .bind(collection)
            .bind(&id)
            .bind(encode(&data)?)
            .execute(&self.pool)
            .await
            .map_err(db_error)?;

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
        let path = document_path(collection, id);

        let mut tx = self.pool.begin().await.map_err(db_error)?;
        let existing: Option<(String,)> =
            sqlx::query_as("SELECT data FROM documents WHERE collection = ? AND id = ?")
                .bind(collection)
                .bind(id)
                .fetch_optional(&mut *tx)
                .await
                .map_err(db_error)?;
        let (raw,) = existing.ok_or_else(|| StoreError::NotFound { path: path.clone() })?;

        let mut current = decode(&path, &raw)?;
        merge_fields(&mut current, data);

        sqlx::query("UPDATE documents SET data = ?, updated_at = CURRENT_TIMESTAMP WHERE collection = ? AND id = ?")
            .bind(encode(&current)?)
            .bind(collection)
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(db_error)?;

        tx.commit().await.map_err(db_error)
    }

    async fn delete_document(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        validate_segment(collection)?;
        validate_segment(id)?;

        sqlx::query("DELETE FROM documents WHERE collection = ? AND id = ?")
            .bind(collection)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error)?;

        Ok(())
    }
}

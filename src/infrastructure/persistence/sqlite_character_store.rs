use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::application::ports::outbound::{
    CharacterStoreError, CharacterStorePort, CHARACTER_STORAGE_KEY,
};
use crate::domain::entities::PlayerCharacter;

/// Keeps the character as a JSON value in a key/value table
pub struct SqliteCharacterStore {
    pool: SqlitePool,
}

impl SqliteCharacterStore {
    pub async fn new(pool: SqlitePool) -> Result<Self, sqlx::Error> {
        sqlx::query(r#"
            CREATE TABLE IF NOT EXISTS kv_store (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
            )
        "#).execute(&pool).await?;

        Ok(Self { pool })
    }
}

#[async_trait]
impl CharacterStorePort for SqliteCharacterStore {
    async fn load(&self) -> Result<Option<PlayerCharacter>, CharacterStoreError> {
        let row: Option<(String,)> = sqlx::query_as("SELECT value FROM kv_store WHERE key = ?")
            .bind(CHARACTER_STORAGE_KEY)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| CharacterStoreError::Database(e.to_string()))?;

        row.map(|(raw,)| {
            serde_json::from_str(&raw).map_err(|e| CharacterStoreError::Serialization(e.to_string()))
        })
        .transpose()
    }

    async fn save(&self, character: &PlayerCharacter) -> Result<(), CharacterStoreError> {
        let value = serde_json::to_string(character)
            .map_err(|e| CharacterStoreError::Serialization(e.to_string()))?;

        sqlx::query("INSERT OR REPLACE INTO kv_store (key, value, updated_at) VALUES (?, ?, CURRENT_TIMESTAMP)")
            .bind(CHARACTER_STORAGE_KEY)
            .bind(value)
            .execute(&self.pool)
            .await
            .map_err(|e| CharacterStoreError::Database(e.to_string()))?;

        Ok(())
    }
}

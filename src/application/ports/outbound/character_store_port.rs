use async_trait::async_trait;

use crate::domain::entities::PlayerCharacter;

/// Well-known key the character record is stored under
pub const CHARACTER_STORAGE_KEY: &str = "mundoMiticoCharacter";

#[derive(Debug, thiserror::Error)]
pub enum CharacterStoreError {
    #[error("Database error: {0}")]
    Database(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Storage for the single player character record
#[async_trait]
pub trait CharacterStorePort: Send + Sync {
    async fn load(&self) -> Result<Option<PlayerCharacter>, CharacterStoreError>;
    async fn save(&self, character: &PlayerCharacter) -> Result<(), CharacterStoreError>;
}

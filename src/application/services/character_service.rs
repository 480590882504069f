//! Character Service - creation and display of the player's character

use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::application::dto::{CharacterSheetDto, CreateCharacterRequest};
use crate::application::ports::outbound::{CharacterStoreError, CharacterStorePort};
use crate::domain::entities::{Attribute, PlayerCharacter};

const MAX_NAME_LENGTH: usize = 60;

#[derive(Debug, thiserror::Error)]
pub enum CharacterError {
    #[error("Invalid character: {0}")]
    Validation(String),
    #[error("No character has been created yet")]
    NotFound,
    #[error(transparent)]
    Store(#[from] CharacterStoreError),
}

#[derive(Clone)]
pub struct CharacterService {
    store: Arc<dyn CharacterStorePort>,
}

impl CharacterService {
    pub fn new(store: Arc<dyn CharacterStorePort>) -> Self {
        Self { store }
    }

    /// Create a fresh character, replacing any existing one
    #[instrument(skip(self, request), fields(name = %request.name))]
    pub async fn create(
        &self,
        request: CreateCharacterRequest,
    ) -> Result<PlayerCharacter, CharacterError> {
        validate(&request)?;

        let attributes = request
            .attributes
            .into_iter()
            .map(|a| Attribute::new(a.name.trim(), a.value))
            .collect();
        let character = PlayerCharacter::new(
            request.name.trim(),
            request.class_name.trim(),
            request.race_name.trim(),
            request.max_hp,
        )
        .with_attributes(attributes);

        self.store.save(&character).await?;
        info!("Created character {}", character.name);
        Ok(character)
    }

    pub async fn get(&self) -> Result<PlayerCharacter, CharacterError> {
        debug!("Loading character");
        self.store.load().await?.ok_or(CharacterError::NotFound)
    }

    pub async fn sheet(&self) -> Result<CharacterSheetDto, CharacterError> {
        self.get().await.map(CharacterSheetDto::from)
    }
}

fn validate(request: &CreateCharacterRequest) -> Result<(), CharacterError> {
    let name = request.name.trim();
    if name.is_empty() {
        return Err(CharacterError::Validation("name is required".to_string()));
    }
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(CharacterError::Validation(format!(
            "name must be at most {} characters",
            MAX_NAME_LENGTH
        )));
    }
    if request.class_name.trim().is_empty() {
        return Err(CharacterError::Validation("class is required".to_string()));
    }
    if request.race_name.trim().is_empty() {
        return Err(CharacterError::Validation("race is required".to_string()));
    }
    if request.max_hp == 0 {
        return Err(CharacterError::Validation(
            "max HP must be greater than zero".to_string(),
        ));
    }
    if request.attributes.iter().any(|a| a.name.trim().is_empty()) {
        return Err(CharacterError::Validation(
            "attribute names must not be empty".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::dto::AttributeDto;
    use crate::infrastructure::persistence::InMemoryCharacterStore;

    fn request() -> CreateCharacterRequest {
        CreateCharacterRequest {
            name: "  Aria  ".to_string(),
            class_name: "Guerreira".to_string(),
            race_name: "Elfa".to_string(),
            max_hp: 40,
            attributes: vec![AttributeDto {
                name: "Força".to_string(),
                value: 14,
            }],
        }
    }

    #[tokio::test]
    async fn test_create_persists_character() {
        let store = Arc::new(InMemoryCharacterStore::new());
        let service = CharacterService::new(store.clone());

        let created = service.create(request()).await.unwrap();

        assert_eq!(created.name, "Aria");
        assert_eq!(created.current_hp, 40);
        assert_eq!(store.load().await.unwrap(), Some(created));
    }

    #[tokio::test]
    async fn test_create_validates_input() {
        let service = CharacterService::new(Arc::new(InMemoryCharacterStore::new()));

        let mut no_name = request();
        no_name.name = "   ".to_string();
        assert!(matches!(service.create(no_name).await, Err(CharacterError::Validation(_))));

        let mut no_hp = request();
        no_hp.max_hp = 0;
        assert!(matches!(service.create(no_hp).await, Err(CharacterError::Validation(_))));

        let mut long_name = request();
        long_name.name = "a".repeat(61);
        assert!(matches!(service.create(long_name).await, Err(CharacterError::Validation(_))));
    }

    #[tokio::test]
    async fn test_get_without_character() {
        let service = CharacterService::new(Arc::new(InMemoryCharacterStore::new()));
        assert!(matches!(service.get().await, Err(CharacterError::NotFound)));
    }

    #[tokio::test]
    async fn test_sheet_reports_hp_percentage() {
        let store = Arc::new(InMemoryCharacterStore::new());
        let mut character = PlayerCharacter::new("Aria", "Guerreira", "Elfa", 40);
        character.set_hp(10);
        store.save(&character).await.unwrap();

        let sheet = CharacterService::new(store).sheet().await.unwrap();

        assert_eq!(sheet.hp_percent, 25);
        assert_eq!(sheet.character.name, "Aria");
    }
}

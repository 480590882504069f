use serde::{Deserialize, Serialize};

use crate::domain::entities::PlayerCharacter;

#[derive(Debug, Clone, Deserialize)]
pub struct AttributeDto {
    pub name: String,
    pub value: i32,
}

/// Request to create the player character
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCharacterRequest {
    pub name: String,
    pub class_name: String,
    pub race_name: String,
    pub max_hp: u32,
    #[serde(default)]
    pub attributes: Vec<AttributeDto>,
}

/// Character plus the values the sheet view derives from it
#[derive(Debug, Clone, Serialize)]
pub struct CharacterSheetDto {
    pub character: PlayerCharacter,
    pub hp_percent: u32,
    pub is_down: bool,
}

impl From<PlayerCharacter> for CharacterSheetDto {
    fn from(character: PlayerCharacter) -> Self {
        let hp_percent = if character.max_hp == 0 {
            0
        } else {
            (u64::from(character.current_hp) * 100 / u64::from(character.max_hp)) as u32
        };
        Self {
            is_down: character.is_down(),
            hp_percent,
            character,
        }
    }
}

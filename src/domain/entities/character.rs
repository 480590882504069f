//! Player character entity - the single record held for the player

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A named attribute on the character sheet (Força, Destreza, ...)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    pub value: i32,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: i32) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// The player's character as persisted by the character store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerCharacter {
    pub name: String,
    pub class_name: String,
    pub race_name: String,
    pub level: u32,
    pub experience: u32,
    pub current_hp: u32,
    pub max_hp: u32,
    pub attributes: Vec<Attribute>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PlayerCharacter {
    /// Create a level 1 character at full health
    pub fn new(
        name: impl Into<String>,
        class_name: impl Into<String>,
        race_name: impl Into<String>,
        max_hp: u32,
    ) -> Self {
        let now = Utc::now();
        Self {
            name: name.into(),
            class_name: class_name.into(),
            race_name: race_name.into(),
            level: 1,
            experience: 0,
            current_hp: max_hp,
            max_hp,
            attributes: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_attributes(mut self, attributes: Vec<Attribute>) -> Self {
        self.attributes = attributes;
        self
    }

    /// Set current HP, clamped to `0..=max_hp`
    pub fn set_hp(&mut self, hp: u32) {
        self.current_hp = hp.min(self.max_hp);
        self.touch();
    }

    pub fn gain_experience(&mut self, amount: u32) {
        self.experience = self.experience.saturating_add(amount);
        self.touch();
    }

    /// Recovery-on-defeat: back to a quarter of max HP (rounded down)
    pub fn recover_from_defeat(&mut self) {
        self.set_hp(self.max_hp / 4);
    }

    pub fn is_down(&self) -> bool {
        self.current_hp == 0
    }

    /// One-line summary used in prompts
    pub fn summary(&self) -> String {
        let attributes = if self.attributes.is_empty() {
            "none".to_string()
        } else {
            self.attributes
                .iter()
                .map(|a| format!("{} {}", a.name, a.value))
                .collect::<Vec<_>>()
                .join(", ")
        };
        format!(
            "{} ({} {}, level {}), HP {}/{}, attributes: {}",
            self.name,
            self.race_name,
            self.class_name,
            self.level,
            self.current_hp,
            self.max_hp,
            attributes
        )
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

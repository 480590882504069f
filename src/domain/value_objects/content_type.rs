//! Admin content types and their static lookup table
//!
//! Every content type maps to one row: its display label, the collection it
//! is imported into, and the example JSON shape handed to the model. Adding
//! a content type means adding a variant and a row, nothing else.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One of the admin-generated content categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum ContentType {
    Class,
    Race,
    Ability,
    Weapon,
    Map,
    ClassGroup,
    Season,
}

/// A row of the content type table
#[derive(Debug)]
pub struct ContentTypeInfo {
    pub name: &'static str,
    /// Label shown to admins (Portuguese, as the game is)
    pub label: &'static str,
    /// Extra accepted spellings, compared case-insensitively
    pub aliases: &'static [&'static str],
    /// Target collection; `None` when records carry their own
    pub collection: Option<&'static str>,
    pub example: &'static str,
}

// Order must follow the enum declaration, see `ContentType::info`.
static CONTENT_TYPES: [ContentTypeInfo; 7] = [
    ContentTypeInfo {
        name: "Class",
        label: "Classe",
        aliases: &[],
        collection: Some("classes"),
        example: r#"{"name": "Guerreiro", "description": "Combatente treinado no uso de armas e armaduras pesadas.", "hitDie": 10, "primaryAttribute": "Força", "abilities": ["Golpe Poderoso", "Segundo Fôlego"]}"#,
    },
    ContentTypeInfo {
        name: "Race",
        label: "Raça",
        aliases: &["Raca"],
        collection: Some("races"),
        example: r#"{"name": "Elfo", "description": "Povo longevo das florestas antigas.", "attributeBonuses": {"Destreza": 2, "Sabedoria": 1}, "traits": ["Visão no Escuro", "Transe"]}"#,
    },
    ContentTypeInfo {
        name: "Ability",
        label: "Habilidade",
        aliases: &[],
        collection: Some("abilities"),
        example: r#"{"name": "Bola de Fogo", "description": "Uma esfera de chamas explode no ponto escolhido.", "type": "Mágica", "cost": 5, "damage": "3d6"}"#,
    },
    ContentTypeInfo {
        name: "Weapon",
        label: "Arma",
        aliases: &[],
        collection: Some("weapons"),
        example: r#"{"name": "Lâmina Sombria", "description": "Espada forjada sob a lua nova.", "type": "Espada", "damage": "1d8", "rarity": "Rara"}"#,
    },
    ContentTypeInfo {
        name: "Map",
        label: "Mapa",
        aliases: &["GameMap"],
        collection: Some("gameMaps"),
        example: r#"{"name": "Floresta Sussurrante", "description": "Mata densa onde as árvores parecem conversar.", "regions": [{"name": "Clareira da Lua", "danger": "Baixo"}, {"name": "Covil do Lobo", "danger": "Alto"}]}"#,
    },
    ContentTypeInfo {
        name: "ClassGroup",
        label: "Grupo de Classes",
        aliases: &["Class Group", "GrupoDeClasses"],
        collection: Some("classGroups"),
        example: r#"{"name": "Combatentes", "description": "Classes focadas em combate corpo a corpo.", "classes": ["Guerreiro", "Paladino", "Bárbaro"]}"#,
    },
    ContentTypeInfo {
        name: "Season",
        label: "Temporada",
        aliases: &[],
        collection: None,
        example: r#"[{"collection": "classes", "data": {"name": "Caçador de Névoa", "description": "Rastreador das terras enevoadas."}}, {"collection": "weapons", "data": {"name": "Arco de Bruma", "damage": "1d8"}}]"#,
    },
];

impl ContentType {
    pub const ALL: [ContentType; 7] = [
        ContentType::Class,
        ContentType::Race,
        ContentType::Ability,
        ContentType::Weapon,
        ContentType::Map,
        ContentType::ClassGroup,
        ContentType::Season,
    ];

    pub fn info(&self) -> &'static ContentTypeInfo {
        &CONTENT_TYPES[*self as usize]
    }

    pub fn name(&self) -> &'static str {
        self.info().name
    }

    pub fn label(&self) -> &'static str {
        self.info().label
    }

    /// Fixed collection for single-record types, `None` for `Season`
    pub fn collection(&self) -> Option<&'static str> {
        self.info().collection
    }

    pub fn example_json(&self) -> &'static str {
        self.info().example
    }

    /// Whether one generation yields several records across collections
    pub fn is_multi_record(&self) -> bool {
        self.collection().is_none()
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a tag names no known content type
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown content type: {0}")]
pub struct UnknownContentType(pub String);

impl FromStr for ContentType {
    type Err = UnknownContentType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        ContentType::ALL
            .into_iter()
            .find(|ct| {
                let info = ct.info();
                info.name.to_lowercase() == wanted
                    || info.label.to_lowercase() == wanted
                    || info.aliases.iter().any(|a| a.to_lowercase() == wanted)
            })
            .ok_or_else(|| UnknownContentType(s.to_string()))
    }
}

impl TryFrom<String> for ContentType {
    type Error = UnknownContentType;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ContentType> for &'static str {
    fn from(value: ContentType) -> Self {
        value.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_rows_follow_enum_order() {
        for ct in ContentType::ALL {
            assert_eq!(ct.info().name, format!("{:?}", ct));
        }
    }

    #[test]
    fn test_collection_table() {
        assert_eq!(ContentType::Class.collection(), Some("classes"));
        assert_eq!(ContentType::Race.collection(), Some("races"));
        assert_eq!(ContentType::Ability.collection(), Some("abilities"));
        assert_eq!(ContentType::Weapon.collection(), Some("weapons"));
        assert_eq!(ContentType::Map.collection(), Some("gameMaps"));
        assert_eq!(ContentType::ClassGroup.collection(), Some("classGroups"));
        assert_eq!(ContentType::Season.collection(), None);
        assert!(ContentType::Season.is_multi_record());
    }

    #[test]
    fn test_parse_english_and_portuguese_tags() {
        assert_eq!("Weapon".parse::<ContentType>().unwrap(), ContentType::Weapon);
        assert_eq!("Arma".parse::<ContentType>().unwrap(), ContentType::Weapon);
        assert_eq!(" raça ".parse::<ContentType>().unwrap(), ContentType::Race);
        assert_eq!("grupo de classes".parse::<ContentType>().unwrap(), ContentType::ClassGroup);
        assert_eq!("Temporada".parse::<ContentType>().unwrap(), ContentType::Season);
        assert!("Dragão".parse::<ContentType>().is_err());
    }

    #[test]
    fn test_examples_are_valid_json() {
        for ct in ContentType::ALL {
            let parsed: serde_json::Value = serde_json::from_str(ct.example_json()).unwrap();
            assert_eq!(parsed.is_array(), ct.is_multi_record(), "{}", ct);
        }
    }

    #[test]
    fn test_serde_uses_name_and_accepts_label() {
        let json = serde_json::to_string(&ContentType::ClassGroup).unwrap();
        assert_eq!(json, "\"ClassGroup\"");
        let ct: ContentType = serde_json::from_str("\"Mapa\"").unwrap();
        assert_eq!(ct, ContentType::Map);
    }
}

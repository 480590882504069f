use serde::{Deserialize, Serialize};

use crate::domain::entities::{Encounter, Enemy, PlayerCharacter};
use crate::domain::services::CombatOutcome;

/// Request to start an encounter against a new enemy
#[derive(Debug, Clone, Deserialize)]
pub struct StartEncounterRequest {
    pub enemy_name: String,
    pub max_hp: u32,
    pub attack: u32,
    pub defense: u32,
}

impl From<StartEncounterRequest> for Enemy {
    fn from(value: StartEncounterRequest) -> Self {
        Enemy::new(value.enemy_name.trim(), value.max_hp, value.attack, value.defense)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlayerActionRequest {
    pub action: String,
}

/// What a turn produced, for the combat log and HP bars
#[derive(Debug, Clone, Serialize)]
pub struct TurnReport {
    pub turn: u32,
    pub narrative: String,
    pub enemy_action_narrative: Option<String>,
    pub player_damage: u32,
    pub enemy_damage: u32,
    pub player: PlayerCharacter,
    pub enemy: Enemy,
    pub outcome: CombatOutcome,
    /// False when the combat call failed and nothing changed
    pub applied: bool,
    pub experience_gained: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct EncounterDto {
    #[serde(flatten)]
    pub encounter: Encounter,
    pub finished: bool,
}

impl From<Encounter> for EncounterDto {
    fn from(encounter: Encounter) -> Self {
        Self {
            finished: encounter.is_finished(),
            encounter,
        }
    }
}

//! Encounter entity - one fight between the player and a single enemy

use serde::{Deserialize, Serialize};

use crate::domain::services::combat_rules::{self, CombatOutcome, CombatTurnResult};
use crate::domain::value_objects::EncounterId;

use super::PlayerCharacter;

/// An AI-controlled enemy; lives only as long as its encounter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enemy {
    pub name: String,
    pub current_hp: u32,
    pub max_hp: u32,
    pub attack: u32,
    pub defense: u32,
}

impl Enemy {
    pub fn new(name: impl Into<String>, max_hp: u32, attack: u32, defense: u32) -> Self {
        Self {
            name: name.into(),
            current_hp: max_hp,
            max_hp,
            attack,
            defense,
        }
    }

    pub fn set_hp(&mut self, hp: u32) {
        self.current_hp = hp.min(self.max_hp);
    }

    pub fn summary(&self) -> String {
        format!(
            "{}, HP {}/{}, attack {}, defense {}",
            self.name, self.current_hp, self.max_hp, self.attack, self.defense
        )
    }
}

/// Entry in the encounter's turn log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnRecord {
    pub turn: u32,
    pub player_action: String,
    pub narrative: String,
    /// False when the combat call failed and the turn was a filler
    pub applied: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Encounter {
    pub id: EncounterId,
    pub enemy: Enemy,
    /// Number of the turn awaiting the player's action, starting at 1
    pub turn: u32,
    pub outcome: CombatOutcome,
    pub log: Vec<TurnRecord>,
}

impl Encounter {
    pub fn new(enemy: Enemy) -> Self {
        Self {
            id: EncounterId::new(),
            enemy,
            turn: 1,
            outcome: CombatOutcome::Ongoing,
            log: Vec::new(),
        }
    }

    pub fn is_finished(&self) -> bool {
        self.outcome.is_terminal()
    }

    /// Apply an AI-decided turn to the player and this encounter's enemy.
    ///
    /// Callers must check `is_finished` first; a finished encounter takes no
    /// further turns.
    pub fn apply_turn(
        &mut self,
        player: &mut PlayerCharacter,
        player_action: &str,
        result: &CombatTurnResult,
    ) -> CombatOutcome {
        let outcome = combat_rules::apply_turn(player, &mut self.enemy, result);
        self.log.push(TurnRecord {
            turn: self.turn,
            player_action: player_action.to_string(),
            narrative: result.turn_narrative.clone(),
            applied: true,
        });
        self.outcome = outcome;
        if outcome == CombatOutcome::Ongoing {
            self.turn += 1;
        }
        outcome
    }

    /// Record a turn where nothing was applied
    pub fn record_filler(&mut self, player_action: &str, narrative: &str) {
        self.log.push(TurnRecord {
            turn: self.turn,
            player_action: player_action.to_string(),
            narrative: narrative.to_string(),
            applied: false,
        });
    }
}

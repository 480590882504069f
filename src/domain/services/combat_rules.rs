//! Combat rules - how one AI-decided turn changes both combatants
//!
//! Damage magnitudes come from the model; these rules only floor hit points
//! at zero and decide the outcome. The enemy check runs first, so a turn
//! that drops both combatants is a victory; the player then gets the same
//! recovery as after a defeat.

use serde::{Deserialize, Serialize};

use crate::domain::entities::{Enemy, PlayerCharacter};

/// Experience awarded to the player for defeating an enemy
pub const VICTORY_EXPERIENCE: u32 = 50;

/// State of an encounter after a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CombatOutcome {
    Ongoing,
    PlayerVictory,
    PlayerDefeat,
}

impl CombatOutcome {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, CombatOutcome::Ongoing)
    }
}

/// What the combat flow decided for one turn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatTurnResult {
    pub enemy_action_narrative: String,
    pub player_damage: u32,
    pub enemy_damage: u32,
    pub turn_narrative: String,
}

pub fn apply_damage(hp: u32, damage: u32) -> u32 {
    hp.saturating_sub(damage)
}

pub fn outcome_for(player_hp: u32, enemy_hp: u32) -> CombatOutcome {
    if enemy_hp == 0 {
        CombatOutcome::PlayerVictory
    } else if player_hp == 0 {
        CombatOutcome::PlayerDefeat
    } else {
        CombatOutcome::Ongoing
    }
}

/// Apply a turn result to both combatants, including the victory reward
/// and the recovery-on-defeat policy.
pub fn apply_turn(
    player: &mut PlayerCharacter,
    enemy: &mut Enemy,
    result: &CombatTurnResult,
) -> CombatOutcome {
    let new_enemy_hp = apply_damage(enemy.current_hp, result.enemy_damage);
    let new_player_hp = apply_damage(player.current_hp, result.player_damage);

    enemy.set_hp(new_enemy_hp);
    player.set_hp(new_player_hp);

    let outcome = outcome_for(new_player_hp, new_enemy_hp);
    match outcome {
        CombatOutcome::PlayerVictory => {
            player.gain_experience(VICTORY_EXPERIENCE);
            if player.is_down() {
                player.recover_from_defeat();
            }
        }
        CombatOutcome::PlayerDefeat => player.recover_from_defeat(),
        CombatOutcome::Ongoing => {}
    }
    outcome
}

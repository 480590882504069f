//! Combat Service - turn resolution for player vs. enemy encounters
//!
//! Each turn asks the combat flow for the enemy's reaction and both damage
//! values, applies them through the combat rules and persists the player.
//! A failed combat call is not fatal: the turn becomes a filler that changes
//! nothing and the encounter stays open.
//!
//! Encounters are isolated by id. Each one sits behind its own mutex so a
//! second turn for the same encounter waits for the first to finish.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::{json, Value};
use tokio::sync::{Mutex, RwLock};
use tracing::{info, instrument, warn};

use crate::application::dto::TurnReport;
use crate::application::ports::outbound::{CharacterStoreError, CharacterStorePort};
use crate::application::services::llm::flows::COMBAT_TURN_FLOW;
use crate::application::services::llm::{FlowError, FlowOutput, FlowRunner};
use crate::domain::entities::{Encounter, Enemy, PlayerCharacter};
use crate::domain::services::{CombatOutcome, CombatTurnResult};
use crate::domain::value_objects::EncounterId;

/// Narrative used when the combat call fails
pub const CONFUSED_ENEMY_NARRATIVE: &str = "The enemy seems confused.";

#[derive(Debug, thiserror::Error)]
pub enum CombatError {
    #[error("Create a character before starting an encounter")]
    CharacterMissing,
    #[error("Invalid enemy: {0}")]
    InvalidEnemy(String),
    #[error("Action must not be empty")]
    EmptyAction,
    #[error("Encounter not found: {0}")]
    EncounterNotFound(EncounterId),
    #[error("Encounter {0} is already over")]
    EncounterFinished(EncounterId),
    #[error(transparent)]
    Store(#[from] CharacterStoreError),
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CombatFlowReply {
    enemy_action_narrative: String,
    player_damage: i64,
    enemy_damage: i64,
    turn_narrative: String,
}

fn clamp_damage(damage: i64) -> u32 {
    damage.clamp(0, i64::from(u32::MAX)) as u32
}

pub struct CombatService {
    flows: FlowRunner,
    characters: Arc<dyn CharacterStorePort>,
    encounters: RwLock<HashMap<EncounterId, Arc<Mutex<Encounter>>>>,
}

impl CombatService {
    pub fn new(flows: FlowRunner, characters: Arc<dyn CharacterStorePort>) -> Self {
        Self {
            flows,
            characters,
            encounters: RwLock::new(HashMap::new()),
        }
    }

    #[instrument(skip(self, enemy), fields(enemy = %enemy.name))]
    pub async fn start_encounter(&self, enemy: Enemy) -> Result<Encounter, CombatError> {
        if enemy.name.trim().is_empty() {
            return Err(CombatError::InvalidEnemy("name is required".to_string()));
        }
        if enemy.max_hp == 0 {
            return Err(CombatError::InvalidEnemy(
                "max HP must be greater than zero".to_string(),
            ));
        }

        self.load_player().await?;

        let encounter = Encounter::new(enemy);
        self.encounters
            .write()
            .await
            .insert(encounter.id, Arc::new(Mutex::new(encounter.clone())));
        info!(encounter_id = %encounter.id, "Encounter started");
        Ok(encounter)
    }

    pub async fn get_encounter(&self, id: EncounterId) -> Result<Encounter, CombatError> {
        let handle = self.handle(id).await?;
        let encounter = handle.lock().await;
        Ok(encounter.clone())
    }

    /// Leave an encounter, finished or not
    pub async fn end_encounter(&self, id: EncounterId) -> Result<(), CombatError> {
        self.encounters
            .write()
            .await
            .remove(&id)
            .map(|_| info!(encounter_id = %id, "Encounter ended"))
            .ok_or(CombatError::EncounterNotFound(id))
    }

    /// Play one turn of an encounter and persist the player's new state
    #[instrument(skip(self, action))]
    pub async fn take_turn(&self, id: EncounterId, action: &str) -> Result<TurnReport, CombatError> {
        let action = action.trim();
        if action.is_empty() {
            return Err(CombatError::EmptyAction);
        }

        let handle = self.handle(id).await?;
        let mut encounter = handle.lock().await;
        if encounter.is_finished() {
            return Err(CombatError::EncounterFinished(id));
        }

        // Work on a copy; the encounter only moves on once the player is saved
        let mut player = self.load_player().await?;
        let mut next = encounter.clone();
        let report = self.resolve_turn(&mut player, &mut next, action).await;
        if report.applied {
            self.characters.save(&player).await?;
        }
        *encounter = next;

        info!(
            encounter_id = %id,
            turn = report.turn,
            outcome = ?report.outcome,
            applied = report.applied,
            "Combat turn resolved"
        );
        Ok(report)
    }

    /// Resolve one turn against the given combatants, updating both in place.
    ///
    /// Persisting the player is left to the caller.
    pub async fn resolve_turn(
        &self,
        player: &mut PlayerCharacter,
        encounter: &mut Encounter,
        action: &str,
    ) -> TurnReport {
        let turn = encounter.turn;
        match self.request_turn(player, &encounter.enemy, action).await {
            Ok(result) => {
                let experience_before = player.experience;
                let outcome = encounter.apply_turn(player, action, &result);
                TurnReport {
                    turn,
                    narrative: result.turn_narrative,
                    enemy_action_narrative: Some(result.enemy_action_narrative),
                    player_damage: result.player_damage,
                    enemy_damage: result.enemy_damage,
                    player: player.clone(),
                    enemy: encounter.enemy.clone(),
                    outcome,
                    applied: true,
                    experience_gained: player.experience.saturating_sub(experience_before),
                }
            }
            Err(e) => {
                warn!(error = %e, "Combat flow failed, playing a filler turn");
                encounter.record_filler(action, CONFUSED_ENEMY_NARRATIVE);
                TurnReport {
                    turn,
                    narrative: CONFUSED_ENEMY_NARRATIVE.to_string(),
                    enemy_action_narrative: None,
                    player_damage: 0,
                    enemy_damage: 0,
                    player: player.clone(),
                    enemy: encounter.enemy.clone(),
                    outcome: CombatOutcome::Ongoing,
                    applied: false,
                    experience_gained: 0,
                }
            }
        }
    }

    async fn request_turn(
        &self,
        player: &PlayerCharacter,
        enemy: &Enemy,
        action: &str,
    ) -> Result<CombatTurnResult, FlowError> {
        let input = json!({
            "player": player.summary(),
            "enemy": enemy.summary(),
            "action": action,
        });
        let FlowOutput::Json(object) = self.flows.invoke(&COMBAT_TURN_FLOW, input).await? else {
            return Err(FlowError::SchemaMismatch {
                flow: COMBAT_TURN_FLOW.name,
                reason: "expected a JSON reply".to_string(),
            });
        };
        let reply: CombatFlowReply =
            serde_json::from_value(Value::Object(object)).map_err(|e| FlowError::SchemaMismatch {
                flow: COMBAT_TURN_FLOW.name,
                reason: e.to_string(),
            })?;

        Ok(CombatTurnResult {
            enemy_action_narrative: reply.enemy_action_narrative,
            player_damage: clamp_damage(reply.player_damage),
            enemy_damage: clamp_damage(reply.enemy_damage),
            turn_narrative: reply.turn_narrative,
        })
    }

    async fn handle(&self, id: EncounterId) -> Result<Arc<Mutex<Encounter>>, CombatError> {
        self.encounters
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(CombatError::EncounterNotFound(id))
    }

    async fn load_player(&self) -> Result<PlayerCharacter, CombatError> {
        self.characters
            .load()
            .await?
            .ok_or(CombatError::CharacterMissing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use std::sync::atomic::{AtomicBool, Ordering};

    use async_trait::async_trait;

    use crate::application::ports::outbound::testing::ScriptedLlm;
    use crate::domain::services::VICTORY_EXPERIENCE;
    use crate::infrastructure::persistence::InMemoryCharacterStore;

    /// Character store whose saves can be switched to fail
    struct FlakyCharacterStore {
        inner: InMemoryCharacterStore,
        fail_saves: AtomicBool,
    }

    #[async_trait]
    impl CharacterStorePort for FlakyCharacterStore {
        async fn load(&self) -> Result<Option<PlayerCharacter>, CharacterStoreError> {
            self.inner.load().await
        }

        async fn save(&self, character: &PlayerCharacter) -> Result<(), CharacterStoreError> {
            if self.fail_saves.load(Ordering::SeqCst) {
                return Err(CharacterStoreError::Database("disk full".to_string()));
            }
            self.inner.save(character).await
        }
    }

    fn turn_json(player_damage: i64, enemy_damage: i64) -> String {
        json!({
            "enemyActionNarrative": "O goblin golpeia com sua adaga.",
            "playerDamage": player_damage,
            "enemyDamage": enemy_damage,
            "turnNarrative": "Sua espada encontra o alvo."
        })
        .to_string()
    }

    async fn setup(
        llm: ScriptedLlm,
        player_hp: u32,
    ) -> (Arc<ScriptedLlm>, Arc<InMemoryCharacterStore>, CombatService) {
        let llm = Arc::new(llm);
        let store = Arc::new(InMemoryCharacterStore::new());
        let mut player = PlayerCharacter::new("Aria", "Guerreira", "Elfa", 100);
        player.set_hp(player_hp);
        store.save(&player).await.unwrap();
        let service = CombatService::new(
            FlowRunner::new(llm.clone(), Duration::from_secs(5)),
            store.clone(),
        );
        (llm, store, service)
    }

    #[tokio::test]
    async fn test_victory_scenario_awards_experience() {
        let (_, store, service) = setup(ScriptedLlm::new().reply(turn_json(10, 60)), 100).await;
        let encounter = service
            .start_encounter(Enemy::new("Goblin", 50, 8, 3))
            .await
            .unwrap();

        let report = service.take_turn(encounter.id, "Ataco com a espada").await.unwrap();

        assert_eq!(report.outcome, CombatOutcome::PlayerVictory);
        assert_eq!(report.enemy.current_hp, 0);
        assert_eq!(report.player.current_hp, 90);
        assert_eq!(report.experience_gained, VICTORY_EXPERIENCE);
        let saved = store.load().await.unwrap().unwrap();
        assert_eq!(saved.experience, 50);
        assert_eq!(saved.current_hp, 90);
    }

    #[tokio::test]
    async fn test_defeat_persists_quarter_hp() {
        let (_, store, service) = setup(ScriptedLlm::new().reply(turn_json(30, 5)), 20).await;
        let encounter = service
            .start_encounter(Enemy::new("Troll", 80, 15, 6))
            .await
            .unwrap();

        let report = service.take_turn(encounter.id, "Defendo").await.unwrap();

        assert_eq!(report.outcome, CombatOutcome::PlayerDefeat);
        assert_eq!(store.load().await.unwrap().unwrap().current_hp, 25);
    }

    #[tokio::test]
    async fn test_negative_damage_is_treated_as_zero() {
        let (_, _, service) = setup(ScriptedLlm::new().reply(turn_json(-5, -10)), 100).await;
        let encounter = service
            .start_encounter(Enemy::new("Goblin", 50, 8, 3))
            .await
            .unwrap();

        let report = service.take_turn(encounter.id, "Espero").await.unwrap();

        assert_eq!(report.player.current_hp, 100);
        assert_eq!(report.enemy.current_hp, 50);
        assert_eq!(report.outcome, CombatOutcome::Ongoing);
    }

    #[tokio::test]
    async fn test_failed_combat_call_is_a_filler_turn() {
        let (_, store, service) = setup(
            ScriptedLlm::new()
                .fail("model offline")
                .reply("the goblin is sad")
                .reply(turn_json(5, 5)),
            100,
        )
        .await;
        let encounter = service
            .start_encounter(Enemy::new("Goblin", 50, 8, 3))
            .await
            .unwrap();

        for _ in 0..2 {
            let report = service.take_turn(encounter.id, "Ataco").await.unwrap();
            assert!(!report.applied);
            assert_eq!(report.narrative, CONFUSED_ENEMY_NARRATIVE);
            assert_eq!(report.outcome, CombatOutcome::Ongoing);
            assert_eq!(report.turn, 1);
        }
        assert_eq!(store.load().await.unwrap().unwrap().current_hp, 100);

        let report = service.take_turn(encounter.id, "Ataco").await.unwrap();
        assert!(report.applied);
        assert_eq!(report.turn, 1);

        let state = service.get_encounter(encounter.id).await.unwrap();
        assert_eq!(state.turn, 2);
        assert_eq!(state.enemy.current_hp, 45);
        assert_eq!(state.log.len(), 3);
    }

    #[tokio::test]
    async fn test_failed_save_leaves_encounter_untouched() {
        let store = Arc::new(FlakyCharacterStore {
            inner: InMemoryCharacterStore::new(),
            fail_saves: AtomicBool::new(false),
        });
        store
            .save(&PlayerCharacter::new("Aria", "Guerreira", "Elfa", 100))
            .await
            .unwrap();
        let llm = Arc::new(
            ScriptedLlm::new()
                .reply(turn_json(10, 60))
                .reply(turn_json(10, 60)),
        );
        let service = CombatService::new(
            FlowRunner::new(llm, Duration::from_secs(5)),
            store.clone(),
        );
        let encounter = service
            .start_encounter(Enemy::new("Goblin", 50, 8, 3))
            .await
            .unwrap();

        store.fail_saves.store(true, Ordering::SeqCst);
        let err = service.take_turn(encounter.id, "Ataco").await.unwrap_err();
        assert!(matches!(err, CombatError::Store(_)));

        let state = service.get_encounter(encounter.id).await.unwrap();
        assert_eq!(state.outcome, CombatOutcome::Ongoing);
        assert_eq!(state.turn, 1);
        assert_eq!(state.enemy.current_hp, 50);
        assert!(state.log.is_empty());
        assert_eq!(store.load().await.unwrap().unwrap().experience, 0);

        store.fail_saves.store(false, Ordering::SeqCst);
        let report = service.take_turn(encounter.id, "Ataco").await.unwrap();
        assert_eq!(report.outcome, CombatOutcome::PlayerVictory);
        assert_eq!(store.load().await.unwrap().unwrap().experience, VICTORY_EXPERIENCE);
    }

    #[tokio::test]
    async fn test_knockout_victory_leaves_player_able_to_fight() {
        let (_, store, service) = setup(
            ScriptedLlm::new().reply(turn_json(99, 99)).reply(turn_json(0, 5)),
            40,
        )
        .await;
        let encounter = service
            .start_encounter(Enemy::new("Goblin", 20, 4, 1))
            .await
            .unwrap();

        let report = service.take_turn(encounter.id, "Tudo ou nada").await.unwrap();
        assert_eq!(report.outcome, CombatOutcome::PlayerVictory);
        assert_eq!(report.player.current_hp, 25);

        let saved = store.load().await.unwrap().unwrap();
        assert_eq!(saved.experience, VICTORY_EXPERIENCE);
        assert!(!saved.is_down());

        let next = service.start_encounter(Enemy::new("Goblin", 20, 4, 1)).await.unwrap();
        let report = service.take_turn(next.id, "Ataco").await.unwrap();
        assert!(report.applied);
    }

    #[tokio::test]
    async fn test_finished_encounter_rejects_turns() {
        let (llm, _, service) = setup(ScriptedLlm::new().reply(turn_json(0, 999)), 100).await;
        let encounter = service
            .start_encounter(Enemy::new("Rato", 5, 1, 0))
            .await
            .unwrap();
        service.take_turn(encounter.id, "Piso no rato").await.unwrap();

        let err = service.take_turn(encounter.id, "De novo").await.unwrap_err();

        assert!(matches!(err, CombatError::EncounterFinished(id) if id == encounter.id));
        assert_eq!(llm.calls(), 1);
    }

    #[tokio::test]
    async fn test_prompt_summarizes_both_combatants() {
        let (llm, _, service) = setup(ScriptedLlm::new().reply(turn_json(1, 1)), 100).await;
        let encounter = service
            .start_encounter(Enemy::new("Goblin", 50, 8, 3))
            .await
            .unwrap();

        service.take_turn(encounter.id, "Lanço uma pedra").await.unwrap();

        let prompt = llm.request(0).messages.last().unwrap().content.clone();
        assert!(prompt.contains("HP 100/100"));
        assert!(prompt.contains("Goblin, HP 50/50, attack 8, defense 3"));
        assert!(prompt.contains("Lanço uma pedra"));
    }

    #[tokio::test]
    async fn test_start_requires_character() {
        let service = CombatService::new(
            FlowRunner::new(Arc::new(ScriptedLlm::new()), Duration::from_secs(5)),
            Arc::new(InMemoryCharacterStore::new()),
        );

        let err = service
            .start_encounter(Enemy::new("Goblin", 50, 8, 3))
            .await
            .unwrap_err();

        assert!(matches!(err, CombatError::CharacterMissing));
    }

    #[tokio::test]
    async fn test_encounters_are_isolated() {
        let (_, _, service) = setup(ScriptedLlm::new().reply(turn_json(0, 10)), 100).await;
        let first = service.start_encounter(Enemy::new("Lobo", 30, 5, 2)).await.unwrap();
        let second = service.start_encounter(Enemy::new("Lobo", 30, 5, 2)).await.unwrap();

        service.take_turn(first.id, "Ataco").await.unwrap();

        assert_eq!(service.get_encounter(first.id).await.unwrap().enemy.current_hp, 20);
        assert_eq!(service.get_encounter(second.id).await.unwrap().enemy.current_hp, 30);
    }

    #[tokio::test]
    async fn test_end_encounter_removes_it() {
        let (_, _, service) = setup(ScriptedLlm::new(), 100).await;
        let encounter = service.start_encounter(Enemy::new("Lobo", 30, 5, 2)).await.unwrap();

        service.end_encounter(encounter.id).await.unwrap();

        assert!(matches!(
            service.get_encounter(encounter.id).await,
            Err(CombatError::EncounterNotFound(_))
        ));
        assert!(service.end_encounter(encounter.id).await.is_err());
    }
}

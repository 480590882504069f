//! Shared application state

use std::sync::Arc;

use anyhow::Result;

use crate::application::ports::outbound::{CharacterStorePort, DocumentStorePort, LlmPort};
use crate::application::services::llm::FlowRunner;
use crate::application::services::{
    CharacterService, CombatService, ContentGenerationService, ContentImportService,
    GameMasterService, PuzzleService,
};
use crate::infrastructure::config::{AppConfig, StoreBackend};
use crate::infrastructure::ollama::OllamaClient;
use crate::infrastructure::persistence::{
    self, AccessRules, InMemoryCharacterStore, InMemoryDocumentStore, RuleEnforcedStore,
    SqliteCharacterStore, SqliteDocumentStore,
};

/// Shared application state
pub struct AppState {
    pub config: AppConfig,
    /// Document store with collection access rules applied
    pub documents: Arc<dyn DocumentStorePort>,
    // Application services
    pub content_generation: ContentGenerationService,
    pub content_import: ContentImportService,
    pub characters: CharacterService,
    pub combat: CombatService,
    pub puzzles: PuzzleService,
    pub game_master: GameMasterService,
}

impl AppState {
    pub async fn new(config: AppConfig) -> Result<Self> {
        let llm: Arc<dyn LlmPort> = Arc::new(OllamaClient::new(
            &config.ollama_base_url,
            &config.ollama_model,
            config.ai_timeout(),
        ));

        let (documents, characters): (Arc<dyn DocumentStorePort>, Arc<dyn CharacterStorePort>) =
            match config.store_backend {
                StoreBackend::Sqlite => {
                    let pool = persistence::connect(&config.database_url).await?;
                    (
                        Arc::new(SqliteDocumentStore::new(pool.clone()).await?),
                        Arc::new(SqliteCharacterStore::new(pool).await?),
                    )
                }
                StoreBackend::Memory => (
                    Arc::new(InMemoryDocumentStore::new()),
                    Arc::new(InMemoryCharacterStore::new()),
                ),
            };

        Ok(Self::with_adapters(config, llm, documents, characters))
    }

    /// Wire services around already-built adapters
    pub fn with_adapters(
        config: AppConfig,
        llm: Arc<dyn LlmPort>,
        documents: Arc<dyn DocumentStorePort>,
        characters: Arc<dyn CharacterStorePort>,
    ) -> Self {
        let documents: Arc<dyn DocumentStorePort> = Arc::new(RuleEnforcedStore::new(
            documents,
            AccessRules::read_only(config.read_only_collections()),
        ));
        let flows = FlowRunner::new(llm, config.ai_timeout());

        Self {
            content_generation: ContentGenerationService::new(flows.clone()),
            content_import: ContentImportService::new(documents.clone()),
            characters: CharacterService::new(characters.clone()),
            combat: CombatService::new(flows.clone(), characters.clone()),
            puzzles: PuzzleService::new(),
            game_master: GameMasterService::new(flows, characters, config.chat_history_limit),
            documents,
            config,
        }
    }
}

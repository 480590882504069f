//! Game Master Service - narrative chat with the AI game master

use std::sync::Arc;

use serde_json::json;
use tracing::{instrument, warn};

use crate::application::dto::{ChatResponseDto, ChatTurnDto};
use crate::application::ports::outbound::{CharacterStorePort, ChatMessage};
use crate::application::services::llm::flows::GAME_MASTER_FLOW;
use crate::application::services::llm::{FlowOutput, FlowRunner};

/// Line used when the game master cannot be reached
pub const SILENT_GAME_MASTER_REPLY: &str =
    "O mestre do jogo se perde em pensamentos por um instante. Tente novamente.";

#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("Message must not be empty")]
    EmptyMessage,
}

#[derive(Clone)]
pub struct GameMasterService {
    flows: FlowRunner,
    characters: Arc<dyn CharacterStorePort>,
    history_limit: usize,
}

impl GameMasterService {
    pub fn new(
        flows: FlowRunner,
        characters: Arc<dyn CharacterStorePort>,
        history_limit: usize,
    ) -> Self {
        Self {
            flows,
            characters,
            history_limit,
        }
    }

    #[instrument(skip_all)]
    pub async fn reply(
        &self,
        history: &[ChatTurnDto],
        message: &str,
    ) -> Result<ChatResponseDto, ChatError> {
        let message = message.trim();
        if message.is_empty() {
            return Err(ChatError::EmptyMessage);
        }

        // A missing or unreadable character only loses context
        let character = match self.characters.load().await {
            Ok(Some(character)) => character.summary(),
            Ok(None) => "not created yet".to_string(),
            Err(e) => {
                warn!(error = %e, "Could not load character for chat");
                "unknown".to_string()
            }
        };

        let skip = history.len().saturating_sub(self.history_limit);
        let messages: Vec<ChatMessage> = history[skip..].iter().map(ChatMessage::from).collect();
        let input = json!({ "character": character, "message": message });

        let reply = match self
            .flows
            .invoke_with_history(&GAME_MASTER_FLOW, input, messages)
            .await
        {
            Ok(FlowOutput::Text(text)) if !text.trim().is_empty() => Some(text.trim().to_string()),
            Ok(_) => None,
            Err(e) => {
                warn!(error = %e, "Game master flow failed");
                None
            }
        };

        Ok(match reply {
            Some(reply) => ChatResponseDto {
                reply,
                fallback: false,
            },
            None => ChatResponseDto {
                reply: SILENT_GAME_MASTER_REPLY.to_string(),
                fallback: true,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::application::dto::ChatRoleDto;
    use crate::application::ports::outbound::testing::ScriptedLlm;
    use crate::application::ports::outbound::MessageRole;
    use crate::domain::entities::PlayerCharacter;
    use crate::infrastructure::persistence::InMemoryCharacterStore;

    fn turn(role: ChatRoleDto, content: &str) -> ChatTurnDto {
        ChatTurnDto {
            role,
            content: content.to_string(),
        }
    }

    #[tokio::test]
    async fn test_reply_includes_character_and_trimmed_history() {
        let llm = Arc::new(ScriptedLlm::new().reply("A taverna silencia quando você entra."));
        let store = Arc::new(InMemoryCharacterStore::new());
        store
            .save(&PlayerCharacter::new("Aria", "Guerreira", "Elfa", 40))
            .await
            .unwrap();
        let service = GameMasterService::new(
            FlowRunner::new(llm.clone(), Duration::from_secs(5)),
            store,
            2,
        );
        let history = vec![
            turn(ChatRoleDto::Player, "primeira"),
            turn(ChatRoleDto::GameMaster, "segunda"),
            turn(ChatRoleDto::Player, "terceira"),
        ];

        let response = service.reply(&history, "Entro na taverna").await.unwrap();

        assert!(!response.fallback);
        assert_eq!(response.reply, "A taverna silencia quando você entra.");
        let request = llm.request(0);
        assert_eq!(request.messages.len(), 3);
        assert_eq!(request.messages[0].role, MessageRole::Assistant);
        assert_eq!(request.messages[0].content, "segunda");
        let prompt = &request.messages[2].content;
        assert!(prompt.contains("Aria"));
        assert!(prompt.contains("Entro na taverna"));
    }

    #[tokio::test]
    async fn test_llm_failure_falls_back() {
        let service = GameMasterService::new(
            FlowRunner::new(Arc::new(ScriptedLlm::new().fail("offline")), Duration::from_secs(5)),
            Arc::new(InMemoryCharacterStore::new()),
            20,
        );

        let response = service.reply(&[], "Olá?").await.unwrap();

        assert!(response.fallback);
        assert_eq!(response.reply, SILENT_GAME_MASTER_REPLY);
    }

    #[tokio::test]
    async fn test_empty_message_rejected() {
        let service = GameMasterService::new(
            FlowRunner::new(Arc::new(ScriptedLlm::new()), Duration::from_secs(5)),
            Arc::new(InMemoryCharacterStore::new()),
            20,
        );

        assert!(matches!(service.reply(&[], "  ").await, Err(ChatError::EmptyMessage)));
    }
}

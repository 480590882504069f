use serde::{Deserialize, Serialize};

use crate::application::ports::outbound::{ChatMessage, MessageRole};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatRoleDto {
    Player,
    GameMaster,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurnDto {
    pub role: ChatRoleDto,
    pub content: String,
}

impl From<&ChatTurnDto> for ChatMessage {
    fn from(value: &ChatTurnDto) -> Self {
        let role = match value.role {
            ChatRoleDto::Player => MessageRole::User,
            ChatRoleDto::GameMaster => MessageRole::Assistant,
        };
        ChatMessage {
            role,
            content: value.content.clone(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequestDto {
    #[serde(default)]
    pub history: Vec<ChatTurnDto>,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatResponseDto {
    pub reply: String,
    /// True when the model was unavailable and a stock line was used
    pub fallback: bool,
}

use std::sync::Arc;

use axum::{extract::State, Json};

use crate::application::dto::{ChatRequestDto, ChatResponseDto};
use crate::infrastructure::http::ApiError;
use crate::infrastructure::state::AppState;

pub async fn chat(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ChatRequestDto>,
) -> Result<Json<ChatResponseDto>, ApiError> {
    Ok(Json(state.game_master.reply(&req.history, &req.message).await?))
}

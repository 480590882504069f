use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};

use crate::application::dto::{CharacterSheetDto, CreateCharacterRequest};
use crate::domain::entities::PlayerCharacter;
use crate::infrastructure::http::ApiError;
use crate::infrastructure::state::AppState;

pub async fn get_character(
    State(state): State<Arc<AppState>>,
) -> Result<Json<PlayerCharacter>, ApiError> {
    Ok(Json(state.characters.get().await?))
}

/// Create (or replace) the player character
pub async fn create_character(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateCharacterRequest>,
) -> Result<(StatusCode, Json<PlayerCharacter>), ApiError> {
    let character = state.characters.create(req).await?;
    Ok((StatusCode::CREATED, Json(character)))
}

pub async fn get_character_sheet(
    State(state): State<Arc<AppState>>,
) -> Result<Json<CharacterSheetDto>, ApiError> {
    Ok(Json(state.characters.sheet().await?))
}

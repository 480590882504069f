use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::application::dto::{EncounterDto, PlayerActionRequest, StartEncounterRequest, TurnReport};
use crate::domain::value_objects::EncounterId;
use crate::infrastructure::http::ApiError;
use crate::infrastructure::state::AppState;

pub async fn start_encounter(
    State(state): State<Arc<AppState>>,
    Json(req): Json<StartEncounterRequest>,
) -> Result<(StatusCode, Json<EncounterDto>), ApiError> {
    let encounter = state.combat.start_encounter(req.into()).await?;
    Ok((StatusCode::CREATED, Json(encounter.into())))
}

pub async fn get_encounter(
    State(state): State<Arc<AppState>>,
    Path(id): Path<EncounterId>,
) -> Result<Json<EncounterDto>, ApiError> {
    Ok(Json(state.combat.get_encounter(id).await?.into()))
}

pub async fn take_turn(
    State(state): State<Arc<AppState>>,
    Path(id): Path<EncounterId>,
    Json(req): Json<PlayerActionRequest>,
) -> Result<Json<TurnReport>, ApiError> {
    Ok(Json(state.combat.take_turn(id, &req.action).await?))
}

pub async fn end_encounter(
    State(state): State<Arc<AppState>>,
    Path(id): Path<EncounterId>,
) -> Result<StatusCode, ApiError> {
    state.combat.end_encounter(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

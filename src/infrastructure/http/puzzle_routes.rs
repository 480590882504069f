use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::application::dto::{AnswerResponseDto, StartChallengeRequest, SubmitAnswerRequest};
use crate::application::services::puzzle_service;
use crate::domain::entities::{PuzzleChallenge, PuzzleDefinition, PuzzleVerdict};
use crate::domain::value_objects::PuzzleChallengeId;
use crate::infrastructure::http::ApiError;
use crate::infrastructure::state::AppState;

pub async fn list_puzzles(State(state): State<Arc<AppState>>) -> Json<&'static [PuzzleDefinition]> {
    Json(state.puzzles.catalog())
}

pub async fn start_challenge(
    State(state): State<Arc<AppState>>,
    Json(req): Json<StartChallengeRequest>,
) -> Result<(StatusCode, Json<PuzzleChallenge>), ApiError> {
    let challenge = state.puzzles.start_challenge(req.puzzle_id.as_deref()).await?;
    Ok((StatusCode::CREATED, Json(challenge)))
}

pub async fn submit_answer(
    State(state): State<Arc<AppState>>,
    Path(id): Path<PuzzleChallengeId>,
    Json(req): Json<SubmitAnswerRequest>,
) -> Result<Json<AnswerResponseDto>, ApiError> {
    let (verdict, challenge) = state.puzzles.submit(id, &req.answer).await?;
    Ok(Json(AnswerResponseDto {
        verdict,
        challenge,
        input: String::new(),
    }))
}

/// Drop a challenge, solved or not
pub async fn end_challenge(
    State(state): State<Arc<AppState>>,
    Path(id): Path<PuzzleChallengeId>,
) -> Result<StatusCode, ApiError> {
    state.puzzles.end_challenge(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Check an answer without opening a challenge
pub async fn check_answer(
    Path(puzzle_id): Path<String>,
    Json(req): Json<SubmitAnswerRequest>,
) -> Result<Json<PuzzleVerdict>, ApiError> {
    Ok(Json(puzzle_service::check(&puzzle_id, &req.answer)?))
}

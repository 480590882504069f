use std::sync::Arc;

use axum::{extract::State, Json};

use crate::application::dto::{
    ContentTypeDto, GenerateContentRequestDto, GeneratedContentDto, ImportContentRequestDto,
    ImportContentResponseDto,
};
use crate::domain::value_objects::ContentType;
use crate::infrastructure::http::ApiError;
use crate::infrastructure::state::AppState;

/// Generate content for review; nothing is stored
pub async fn generate_content(
    State(state): State<Arc<AppState>>,
    Json(req): Json<GenerateContentRequestDto>,
) -> Result<Json<GeneratedContentDto>, ApiError> {
    let content = state
        .content_generation
        .generate(req.content_type, &req.prompt)
        .await?;
    Ok(Json(content.into()))
}

/// Store reviewed content in its collection(s)
pub async fn import_content(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ImportContentRequestDto>,
) -> Result<Json<ImportContentResponseDto>, ApiError> {
    let imported = state
        .content_import
        .import(req.content_type, &req.content)
        .await?;
    Ok(Json(ImportContentResponseDto { imported }))
}

pub async fn list_content_types() -> Json<Vec<ContentTypeDto>> {
    Json(ContentType::ALL.into_iter().map(ContentTypeDto::from).collect())
}

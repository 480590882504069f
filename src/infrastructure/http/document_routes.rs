use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::application::ports::outbound::{document_path, into_object, Document};
use crate::infrastructure::http::ApiError;
use crate::infrastructure::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SetDocumentQuery {
    #[serde(default = "merge_by_default")]
    pub merge: bool,
}

fn merge_by_default() -> bool {
    true
}

pub async fn list_documents(
    State(state): State<Arc<AppState>>,
    Path(collection): Path<String>,
) -> Result<Json<Vec<Document>>, ApiError> {
    Ok(Json(state.documents.get_collection(&collection).await?))
}

pub async fn get_document(
    State(state): State<Arc<AppState>>,
    Path((collection, id)): Path<(String, String)>,
) -> Result<Json<Document>, ApiError> {
    state
        .documents
        .get_document(&collection, &id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Document not found: {}", document_path(&collection, &id))))
}

pub async fn add_document(
    State(state): State<Arc<AppState>>,
    Path(collection): Path<String>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let data = into_object(&collection, body)?;
    let id = state.documents.add_document(&collection, data).await?;
    Ok((StatusCode::CREATED, Json(json!({ "id": id }))))
}

pub async fn set_document(
    State(state): State<Arc<AppState>>,
    Path((collection, id)): Path<(String, String)>,
    Query(query): Query<SetDocumentQuery>,
    Json(body): Json<Value>,
) -> Result<StatusCode, ApiError> {
    let data = into_object(&document_path(&collection, &id), body)?;
    state
        .documents
        .set_document(&collection, &id, data, query.merge)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn update_document(
    State(state): State<Arc<AppState>>,
    Path((collection, id)): Path<(String, String)>,
    Json(body): Json<Value>,
) -> Result<StatusCode, ApiError> {
    let data = into_object(&document_path(&collection, &id), body)?;
    state.documents.update_document(&collection, &id, data).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_document(
    State(state): State<Arc<AppState>>,
    Path((collection, id)): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
    state.documents.delete_document(&collection, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

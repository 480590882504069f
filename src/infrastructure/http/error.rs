//! Mapping of service errors onto HTTP responses

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

use crate::application::ports::outbound::{StoreError, StoreOperation};
use crate::application::services::{
    CharacterError, ChatError, CombatError, GenerationError, ImportError, PuzzleError,
};

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    Conflict(String),
    PermissionDenied {
        message: String,
        path: String,
        operation: StoreOperation,
    },
    /// The AI produced nothing usable; `text` is what it produced, if anything
    Generation {
        message: String,
        text: Option<String>,
    },
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, json!({ "error": message })),
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, json!({ "error": message })),
            ApiError::Conflict(message) => (StatusCode::CONFLICT, json!({ "error": message })),
            ApiError::PermissionDenied {
                message,
                path,
                operation,
            } => (
                StatusCode::FORBIDDEN,
                json!({ "error": message, "path": path, "operation": operation }),
            ),
            ApiError::Generation { message, text } => (
                StatusCode::BAD_GATEWAY,
                json!({ "error": message, "text": text }),
            ),
            ApiError::Internal(message) => {
                error!(error = %message, "Request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, json!({ "error": message }))
            }
        };
        (status, Json(body)).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        let message = e.to_string();
        match e {
            StoreError::PermissionDenied { path, operation } => ApiError::PermissionDenied {
                message,
                path,
                operation,
            },
            StoreError::NotFound { .. } => ApiError::NotFound(message),
            StoreError::InvalidPath(_) | StoreError::NotAnObject { .. } => {
                ApiError::BadRequest(message)
            }
            StoreError::Database(_) | StoreError::Serialization(_) => ApiError::Internal(message),
        }
    }
}

impl From<GenerationError> for ApiError {
    fn from(e: GenerationError) -> Self {
        match e {
            GenerationError::EmptyPrompt => ApiError::BadRequest(e.to_string()),
            _ => ApiError::Generation {
                text: e.offending_text().map(str::to_string),
                message: e.to_string(),
            },
        }
    }
}

impl From<ImportError> for ApiError {
    fn from(e: ImportError) -> Self {
        match e {
            ImportError::Store(store) => store.into(),
            _ => ApiError::BadRequest(e.to_string()),
        }
    }
}

impl From<CharacterError> for ApiError {
    fn from(e: CharacterError) -> Self {
        match e {
            CharacterError::Validation(_) => ApiError::BadRequest(e.to_string()),
            CharacterError::NotFound => ApiError::NotFound(e.to_string()),
            CharacterError::Store(_) => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<CombatError> for ApiError {
    fn from(e: CombatError) -> Self {
        match e {
            CombatError::InvalidEnemy(_) | CombatError::EmptyAction => {
                ApiError::BadRequest(e.to_string())
            }
            CombatError::CharacterMissing | CombatError::EncounterNotFound(_) => {
                ApiError::NotFound(e.to_string())
            }
            CombatError::EncounterFinished(_) => ApiError::Conflict(e.to_string()),
            CombatError::Store(_) => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<PuzzleError> for ApiError {
    fn from(e: PuzzleError) -> Self {
        ApiError::NotFound(e.to_string())
    }
}

impl From<ChatError> for ApiError {
    fn from(e: ChatError) -> Self {
        ApiError::BadRequest(e.to_string())
    }
}

//! HTTP REST API routes

mod character_routes;
mod chat_routes;
mod content_routes;
mod document_routes;
mod encounter_routes;
mod error;
mod puzzle_routes;

use std::sync::Arc;

use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::infrastructure::state::AppState;

pub use error::ApiError;

/// Create all API routes
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new()
        // Content generation and import
        .route("/api/content/generate", post(content_routes::generate_content))
        .route("/api/content/import", post(content_routes::import_content))
        .route("/api/content/types", get(content_routes::list_content_types))
        // Document collections
        .route(
            "/api/collections/{collection}",
            get(document_routes::list_documents).post(document_routes::add_document),
        )
        .route(
            "/api/collections/{collection}/{id}",
            get(document_routes::get_document)
                .put(document_routes::set_document)
                .patch(document_routes::update_document)
                .delete(document_routes::delete_document),
        )
        // Player character
        .route(
            "/api/character",
            get(character_routes::get_character).post(character_routes::create_character),
        )
        .route("/api/character/sheet", get(character_routes::get_character_sheet))
        // Combat
        .route("/api/encounters", post(encounter_routes::start_encounter))
        .route(
            "/api/encounters/{id}",
            get(encounter_routes::get_encounter).delete(encounter_routes::end_encounter),
        )
        .route("/api/encounters/{id}/turns", post(encounter_routes::take_turn))
        // Puzzles
        .route("/api/puzzles", get(puzzle_routes::list_puzzles))
        .route("/api/puzzles/{puzzle_id}/check", post(puzzle_routes::check_answer))
        .route("/api/puzzles/challenges", post(puzzle_routes::start_challenge))
        .route(
            "/api/puzzles/challenges/{id}",
            delete(puzzle_routes::end_challenge),
        )
        .route(
            "/api/puzzles/challenges/{id}/answers",
            post(puzzle_routes::submit_answer),
        )
        // Game master chat
        .route("/api/chat", post(chat_routes::chat))
}

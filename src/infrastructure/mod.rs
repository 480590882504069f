//! Infrastructure layer - External adapters and implementations
//!
//! This layer contains:
//! - Persistence: SQLite and in-memory document/character stores
//! - HTTP: REST API routes
//! - Ollama: LLM integration for content, combat and chat
//! - Config: Application configuration
//! - State: Shared application state

pub mod config;
pub mod http;
pub mod ollama;
pub mod persistence;
pub mod state;

//! Application layer - Use cases over the domain
//!
//! This layer contains:
//! - Ports: LLM, document store and character store interfaces
//! - Services: content generation/import, combat, puzzles, character, chat
//! - DTOs: request/response shapes for the HTTP layer

pub mod dto;
pub mod ports;
pub mod services;

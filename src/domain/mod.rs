//! Domain layer - Core game rules with no I/O
//!
//! This layer contains:
//! - Entities: PlayerCharacter, Encounter, PuzzleChallenge, GeneratedContent
//! - Value Objects: ContentType table, identifiers
//! - Domain Services: Combat rules

pub mod entities;
pub mod services;
pub mod value_objects;

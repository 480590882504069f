//! Application services - Use case implementations
//!
//! Each service depends on outbound ports only, so tests swap in scripted
//! LLMs and in-memory stores.

pub mod character_service;
pub mod combat_service;
pub mod content_generation_service;
pub mod content_import_service;
pub mod game_master_service;
pub mod llm;
pub mod puzzle_service;

pub use character_service::{CharacterError, CharacterService};
pub use combat_service::{CombatError, CombatService, CONFUSED_ENEMY_NARRATIVE};
pub use content_generation_service::{ContentGenerationService, GenerationError};
pub use content_import_service::{ContentImportService, ImportError, ImportedRecord};
pub use game_master_service::{ChatError, GameMasterService};
pub use puzzle_service::{PuzzleError, PuzzleService};

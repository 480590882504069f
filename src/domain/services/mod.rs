//! Domain services - Pure game rules with no I/O

pub mod combat_rules;

pub use combat_rules::{CombatOutcome, CombatTurnResult, VICTORY_EXPERIENCE};

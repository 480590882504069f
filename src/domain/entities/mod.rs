//! Domain entities - Core game objects

mod character;
mod content;
mod encounter;
mod puzzle;

pub use character::{Attribute, PlayerCharacter};
pub use content::{GeneratedContent, ImportableRecord};
pub use encounter::{Encounter, Enemy, TurnRecord};
pub use puzzle::{
    find_puzzle, ChallengeState, PuzzleCategory, PuzzleChallenge, PuzzleDefinition,
    PuzzleVerdict, PUZZLES,
};

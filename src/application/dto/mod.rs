//! Data Transfer Objects - For API boundaries
//!
//! DTOs live in the application layer so the HTTP layer can
//! serialize/deserialize without reaching into service internals.

mod character;
mod chat;
mod combat;
mod content;
mod puzzle;

pub use character::*;
pub use chat::*;
pub use combat::*;
pub use content::*;
pub use puzzle::*;

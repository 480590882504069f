//! Persistence adapters
//!
//! SQLite-backed document and character stores, in-memory equivalents, and
//! the access-rule decorator that guards read-only collections.

mod access_rules;
mod memory_store;
mod sqlite_character_store;
mod sqlite_document_store;

pub use access_rules::{AccessRules, RuleEnforcedStore};
pub use memory_store::{InMemoryCharacterStore, InMemoryDocumentStore};
pub use sqlite_character_store::SqliteCharacterStore;
pub use sqlite_document_store::SqliteDocumentStore;

use anyhow::{Context, Result};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

pub async fn connect(database_url: &str) -> Result<SqlitePool> {
    SqlitePoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await
        .with_context(|| format!("Failed to open database {}", database_url))
}

/// Every connection to `sqlite::memory:` is a separate database, so tests
/// pin the pool to one connection.
#[cfg(test)]
pub async fn memory_pool() -> Result<SqlitePool, sqlx::Error> {
    SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
}

//! Outbound ports - Interfaces that the application requires from external systems

mod character_store_port;
mod document_store_port;
mod llm_port;

#[cfg(test)]
pub mod testing;

pub use character_store_port::{CharacterStoreError, CharacterStorePort, CHARACTER_STORAGE_KEY};
pub use document_store_port::{
    document_path, into_object, merge_fields, validate_segment, Document, DocumentStorePort,
    StoreError, StoreOperation,
};
pub use llm_port::{
    ChatMessage, FinishReason, LlmError, LlmPort, LlmRequest, LlmResponse, MessageRole,
    TokenUsage,
};

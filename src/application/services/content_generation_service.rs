//! Content Generation Service - AI-generated admin content with one repair pass
//!
//! Generation runs as a small state machine:
//!
//! ```text
//! Generating --valid--> Done
//! Generating --malformed--> Repairing --valid--> Done
//!                                     --malformed--> Failed
//! ```
//!
//! `Repairing` is only entered from `Generating`, so a request makes at most
//! two model calls.

use serde_json::{json, Value};
use tracing::{info, instrument, warn};

use crate::application::services::llm::flows::{
    content_examples, CONTENT_GENERATION_FLOW, CONTENT_REPAIR_FLOW,
};
use crate::application::services::llm::{strip_code_fences, Flow, FlowError, FlowOutput, FlowRunner};
use crate::domain::entities::GeneratedContent;
use crate::domain::value_objects::ContentType;

#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("Prompt text must not be empty")]
    EmptyPrompt,
    #[error("Content generation failed: no content produced")]
    NoContent,
    #[error("Content generation failed: repair produced no content")]
    RepairNoContent,
    #[error("Content generation failed: invalid JSON after repair attempt")]
    InvalidJsonAfterRepair { text: String },
    #[error("Content generation failed: {0}")]
    Flow(#[from] FlowError),
}

impl GenerationError {
    /// The model output that could not be used, for diagnostics
    pub fn offending_text(&self) -> Option<&str> {
        match self {
            GenerationError::InvalidJsonAfterRepair { text } => Some(text),
            _ => None,
        }
    }
}

enum GenerationStage {
    Generating,
    Repairing { malformed: String },
    Done(GeneratedContent),
    Failed(GenerationError),
}

#[derive(Clone)]
pub struct ContentGenerationService {
    flows: FlowRunner,
}

impl ContentGenerationService {
    pub fn new(flows: FlowRunner) -> Self {
        Self { flows }
    }

    #[instrument(skip(self, prompt))]
    pub async fn generate(
        &self,
        content_type: ContentType,
        prompt: &str,
    ) -> Result<GeneratedContent, GenerationError> {
        if prompt.trim().is_empty() {
            return Err(GenerationError::EmptyPrompt);
        }

        let mut stage = GenerationStage::Generating;
        loop {
            stage = match stage {
                GenerationStage::Generating => {
                    let input = json!({
                        "content_type": content_type.name(),
                        "prompt": prompt,
                        "examples": content_examples(),
                    });
                    match self.run(&CONTENT_GENERATION_FLOW, input).await {
                        Err(e) => GenerationStage::Failed(e.into()),
                        Ok(text) if text.is_empty() => {
                            GenerationStage::Failed(GenerationError::NoContent)
                        }
                        Ok(text) => match parse_json(&text) {
                            Some(value) => GenerationStage::Done(GeneratedContent {
                                content_type,
                                raw_text: text,
                                value,
                                repaired: false,
                            }),
                            None => {
                                warn!("Generated content is not valid JSON, attempting repair");
                                GenerationStage::Repairing { malformed: text }
                            }
                        },
                    }
                }
                GenerationStage::Repairing { malformed } => {
                    let input = json!({ "malformed": malformed });
                    match self.run(&CONTENT_REPAIR_FLOW, input).await {
                        Err(e) => GenerationStage::Failed(e.into()),
                        Ok(text) if text.is_empty() => {
                            GenerationStage::Failed(GenerationError::RepairNoContent)
                        }
                        Ok(text) => match parse_json(&text) {
                            Some(value) => GenerationStage::Done(GeneratedContent {
                                content_type,
                                raw_text: text,
                                value,
                                repaired: true,
                            }),
                            None => GenerationStage::Failed(
                                GenerationError::InvalidJsonAfterRepair { text },
                            ),
                        },
                    }
                }
                GenerationStage::Done(content) => {
                    info!(repaired = content.repaired, "Generated content");
                    return Ok(content);
                }
                GenerationStage::Failed(error) => {
                    warn!(error = %error, "Content generation failed");
                    return Err(error);
                }
            };
        }
    }

    /// Run a text flow and return its fence-stripped reply
    async fn run(&self, flow: &Flow, input: Value) -> Result<String, FlowError> {
        match self.flows.invoke(flow, input).await? {
            FlowOutput::Text(text) => Ok(strip_code_fences(&text).to_string()),
            FlowOutput::Json(_) => Err(FlowError::SchemaMismatch {
                flow: flow.name,
                reason: "content flows must declare a text output".to_string(),
            }),
        }
    }
}

fn parse_json(text: &str) -> Option<Value> {
    serde_json::from_str(text).ok()
}

//! LLM plumbing: the flow runner and the engine's flow definitions

pub mod flow;
pub mod flows;

pub use flow::{
    strip_code_fences, FieldType, Flow, FlowError, FlowOutput, FlowRunner, OutputSchema,
    SchemaField,
};

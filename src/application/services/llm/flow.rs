//! Flows - declarative prompt contracts and the one function that runs them
//!
//! A flow names its inputs, its output shape and a template. `FlowRunner`
//! renders the template, calls the model under a timeout and coerces the
//! reply into the declared output.

use std::sync::Arc;
use std::time::Duration;

use serde_json::{Map, Number, Value};
use tracing::{debug, warn};

use crate::application::ports::outbound::{ChatMessage, LlmPort, LlmRequest};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    String,
    Integer,
}

#[derive(Debug, Clone, Copy)]
pub struct SchemaField {
    pub name: &'static str,
    pub field_type: FieldType,
    pub description: &'static str,
}

impl SchemaField {
    pub const fn string(name: &'static str, description: &'static str) -> Self {
        Self {
            name,
            field_type: FieldType::String,
            description,
        }
    }

    pub const fn integer(name: &'static str, description: &'static str) -> Self {
        Self {
            name,
            field_type: FieldType::Integer,
            description,
        }
    }
}

/// Shape of a flow's reply
#[derive(Debug, Clone, Copy)]
pub enum OutputSchema {
    /// The reply text itself
    Text,
    /// A JSON object carrying these fields
    Json(&'static [SchemaField]),
}

#[derive(Debug, Clone, Copy)]
pub struct Flow {
    pub name: &'static str,
    pub system_prompt: &'static str,
    pub input_schema: &'static [SchemaField],
    pub output: OutputSchema,
    /// Template with `{{field}}` placeholders for each input
    pub template: &'static str,
    pub temperature: f32,
}

/// Parsed reply of a flow
#[derive(Debug, Clone, PartialEq)]
pub enum FlowOutput {
    Text(String),
    Json(Map<String, Value>),
}

#[derive(Debug, thiserror::Error)]
pub enum FlowError {
    #[error("Flow '{flow}' is missing input '{field}'")]
    MissingInput { flow: &'static str, field: &'static str },
    #[error("Flow '{flow}' input '{field}' has the wrong type")]
    InvalidInput { flow: &'static str, field: &'static str },
    #[error("Flow '{flow}' LLM call failed: {message}")]
    Llm { flow: &'static str, message: String },
    #[error("Flow '{flow}' timed out after {seconds}s")]
    Timeout { flow: &'static str, seconds: u64 },
    #[error("Flow '{flow}' output does not match its schema: {reason}")]
    SchemaMismatch { flow: &'static str, reason: String },
}

impl Flow {
    /// Substitute every declared input into the template
    pub fn render(&self, input: &Map<String, Value>) -> Result<String, FlowError> {
        let mut rendered = self.template.to_string();
        for field in self.input_schema {
            let value = input.get(field.name).ok_or(FlowError::MissingInput {
                flow: self.name,
                field: field.name,
            })?;
            let text = match (field.field_type, value) {
                (FieldType::String, Value::String(s)) => s.clone(),
                (FieldType::Integer, Value::Number(n)) if n.is_i64() || n.is_u64() => {
                    n.to_string()
                }
                _ => {
                    return Err(FlowError::InvalidInput {
                        flow: self.name,
                        field: field.name,
                    })
                }
            };
            rendered = rendered.replace(&format!("{{{{{}}}}}", field.name), &text);
        }
        Ok(rendered)
    }

    /// Check a model reply against the output schema
    pub fn parse_output(&self, content: &str) -> Result<FlowOutput, FlowError> {
        let fields = match self.output {
            OutputSchema::Text => return Ok(FlowOutput::Text(content.to_string())),
            OutputSchema::Json(fields) => fields,
        };

        let mismatch = |reason: String| FlowError::SchemaMismatch {
            flow: self.name,
            reason,
        };

        let value: Value = serde_json::from_str(strip_code_fences(content))
            .map_err(|e| mismatch(format!("not JSON: {}", e)))?;
        let Value::Object(mut object) = value else {
            return Err(mismatch("expected a JSON object".to_string()));
        };

        for field in fields {
            let value = object
                .get(field.name)
                .ok_or_else(|| mismatch(format!("missing field '{}'", field.name)))?;
            let coerced = coerce(field.field_type, value)
                .ok_or_else(|| mismatch(format!("field '{}' has the wrong type", field.name)))?;
            object.insert(field.name.to_string(), coerced);
        }

        Ok(FlowOutput::Json(object))
    }
}

fn coerce(field_type: FieldType, value: &Value) -> Option<Value> {
    match (field_type, value) {
        (FieldType::String, Value::String(_)) => Some(value.clone()),
        (FieldType::Integer, Value::Number(n)) => {
            if let Some(i) = n.as_i64() {
                Some(Value::Number(i.into()))
            } else {
                // Models sometimes answer 12.0 for 12
                n.as_f64()
                    .filter(|f| f.fract() == 0.0 && f.is_finite())
                    .map(|f| Value::Number(Number::from(f as i64)))
            }
        }
        (FieldType::Integer, Value::String(s)) => {
            s.trim().parse::<i64>().ok().map(|i| Value::Number(i.into()))
        }
        _ => None,
    }
}

/// Remove a leading ```` ```json ```` (or bare ```` ``` ````) and a trailing
/// ```` ``` ```` around a model reply.
pub fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let without_open = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    without_open
        .strip_suffix("```")
        .unwrap_or(without_open)
        .trim()
}

/// Runs flows against an LLM port
#[derive(Clone)]
pub struct FlowRunner {
    llm: Arc<dyn LlmPort>,
    timeout: Duration,
}

impl FlowRunner {
    pub fn new(llm: Arc<dyn LlmPort>, timeout: Duration) -> Self {
        Self { llm, timeout }
    }

    pub async fn invoke(&self, flow: &Flow, input: Value) -> Result<FlowOutput, FlowError> {
        self.invoke_with_history(flow, input, Vec::new()).await
    }

    /// Like `invoke`, with earlier conversation turns placed before the
    /// rendered prompt
    pub async fn invoke_with_history(
        &self,
        flow: &Flow,
        input: Value,
        history: Vec<ChatMessage>,
    ) -> Result<FlowOutput, FlowError> {
        let input = match input {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        let prompt = flow.render(&input)?;

        let mut messages = history;
        messages.push(ChatMessage::user(prompt));
        let request = LlmRequest::new(messages)
            .with_system_prompt(flow.system_prompt)
            .with_temperature(flow.temperature);

        debug!(flow = flow.name, "Invoking flow");
        let response = tokio::time::timeout(self.timeout, self.llm.generate(request))
            .await
            .map_err(|_| {
                warn!(flow = flow.name, seconds = self.timeout.as_secs(), "Flow timed out");
                FlowError::Timeout {
                    flow: flow.name,
                    seconds: self.timeout.as_secs(),
                }
            })?
            .map_err(|e| FlowError::Llm {
                flow: flow.name,
                message: e.to_string(),
            })?;

        flow.parse_output(&response.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::outbound::testing::ScriptedLlm;
    use serde_json::json;

    const ECHO_INPUTS: &[SchemaField] = &[
        SchemaField::string("hero", "Hero name"),
        SchemaField::integer("level", "Hero level"),
    ];

    const REPORT_FIELDS: &[SchemaField] = &[
        SchemaField::string("summary", "What happened"),
        SchemaField::integer("damage", "Damage dealt"),
    ];

    const TEXT_FLOW: Flow = Flow {
        name: "echo",
        system_prompt: "You echo.",
        input_schema: ECHO_INPUTS,
        output: OutputSchema::Text,
        template: "{{hero}} is level {{level}}. Again: {{hero}}.",
        temperature: 0.2,
    };

    const JSON_FLOW: Flow = Flow {
        name: "report",
        system_prompt: "You report.",
        input_schema: ECHO_INPUTS,
        output: OutputSchema::Json(REPORT_FIELDS),
        template: "Report on {{hero}}",
        temperature: 0.2,
    };

    fn input() -> Map<String, Value> {
        json!({"hero": "Aria", "level": 3}).as_object().unwrap().clone()
    }

    #[test]
    fn test_render_substitutes_every_placeholder() {
        let rendered = TEXT_FLOW.render(&input()).unwrap();
        assert_eq!(rendered, "Aria is level 3. Again: Aria.");
    }

    #[test]
    fn test_render_rejects_missing_and_mistyped_inputs() {
        let missing = json!({"hero": "Aria"}).as_object().unwrap().clone();
        assert!(matches!(
            TEXT_FLOW.render(&missing),
            Err(FlowError::MissingInput { field: "level", .. })
        ));

        let mistyped = json!({"hero": 7, "level": 3}).as_object().unwrap().clone();
        assert!(matches!(
            TEXT_FLOW.render(&mistyped),
            Err(FlowError::InvalidInput { field: "hero", .. })
        ));
    }

    #[test]
    fn test_strip_code_fences() {
        assert_eq!(strip_code_fences("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fences("```\n[1]\n```"), "[1]");
        assert_eq!(strip_code_fences("  {\"a\":1}  "), "{\"a\":1}");
        assert_eq!(strip_code_fences("{\"a\":1}\n```"), "{\"a\":1}");
    }

    #[test]
    fn test_parse_output_coerces_integers() {
        let output = JSON_FLOW
            .parse_output(r#"```json
{"summary": "ok", "damage": "12", "extra": true}
```"#)
            .unwrap();
        let FlowOutput::Json(object) = output else {
            panic!("expected JSON output");
        };
        assert_eq!(object["damage"], json!(12));
        assert_eq!(object["extra"], json!(true));

        let output = JSON_FLOW.parse_output(r#"{"summary": "ok", "damage": 7.0}"#).unwrap();
        assert_eq!(output, FlowOutput::Json(json!({"summary": "ok", "damage": 7}).as_object().unwrap().clone()));
    }

    #[test]
    fn test_parse_output_rejects_schema_mismatch() {
        assert!(matches!(
            JSON_FLOW.parse_output(r#"{"summary": "ok"}"#),
            Err(FlowError::SchemaMismatch { .. })
        ));
        assert!(matches!(
            JSON_FLOW.parse_output(r#"{"summary": "ok", "damage": "lots"}"#),
            Err(FlowError::SchemaMismatch { .. })
        ));
        assert!(matches!(
            JSON_FLOW.parse_output("the goblin hits you"),
            Err(FlowError::SchemaMismatch { .. })
        ));
    }

    #[tokio::test]
    async fn test_invoke_sends_system_prompt_and_rendered_template() {
        let llm = Arc::new(ScriptedLlm::new().reply("Aria!"));
        let runner = FlowRunner::new(llm.clone(), Duration::from_secs(5));

        let output = runner
            .invoke(&TEXT_FLOW, json!({"hero": "Aria", "level": 3}))
            .await
            .unwrap();

        assert_eq!(output, FlowOutput::Text("Aria!".to_string()));
        let request = llm.request(0);
        assert_eq!(request.system_prompt.as_deref(), Some("You echo."));
        assert_eq!(request.messages.last().unwrap().content, "Aria is level 3. Again: Aria.");
    }

    #[tokio::test]
    async fn test_invoke_missing_input_makes_no_call() {
        let llm = Arc::new(ScriptedLlm::new().reply("unused"));
        let runner = FlowRunner::new(llm.clone(), Duration::from_secs(5));

        let result = runner.invoke(&TEXT_FLOW, json!({"level": 1})).await;

        assert!(matches!(result, Err(FlowError::MissingInput { .. })));
        assert_eq!(llm.calls(), 0);
    }

    #[tokio::test]
    async fn test_invoke_times_out() {
        let llm = Arc::new(
            ScriptedLlm::new()
                .reply("too late")
                .with_delay(Duration::from_secs(5)),
        );
        let runner = FlowRunner::new(llm, Duration::from_millis(20));

        let result = runner.invoke(&TEXT_FLOW, json!({"hero": "Aria", "level": 3})).await;

        assert!(matches!(result, Err(FlowError::Timeout { flow: "echo", .. })));
    }

    #[tokio::test]
    async fn test_invoke_maps_llm_failure() {
        let llm = Arc::new(ScriptedLlm::new().fail("connection refused"));
        let runner = FlowRunner::new(llm, Duration::from_secs(5));

        let result = runner.invoke(&TEXT_FLOW, json!({"hero": "Aria", "level": 3})).await;

        assert!(matches!(result, Err(FlowError::Llm { message, .. }) if message.contains("connection refused")));
    }
}

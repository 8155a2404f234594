//! The `slack` agent tool — schema + dispatcher behind the shared `Tool` trait.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Map, Value};
use switchboard_core::config::ConfigSource;
use switchboard_core::tool::{Tool, ToolResult};
use tracing::warn;

use crate::action::ActionKind;
use crate::client::SlackActions;
use crate::dispatch::dispatch;

pub struct SlackTool {
    client: Arc<dyn SlackActions>,
    config: Arc<dyn ConfigSource>,
}

impl SlackTool {
    pub fn new(client: Arc<dyn SlackActions>, config: Arc<dyn ConfigSource>) -> Self {
        Self { client, config }
    }
}

#[async_trait]
impl Tool for SlackTool {
    fn name(&self) -> &str {
        "slack"
    }

    fn label(&self) -> &str {
        "Slack"
    }

    fn description(&self) -> &str {
        "Manage Slack messages, reactions, and pins."
    }

    fn input_schema(&self) -> Value {
        input_schema()
    }

    async fn execute(&self, input: Value) -> ToolResult {
        let Value::Object(params) = input else {
            return ToolResult::error("slack tool input must be a JSON object");
        };

        // fresh snapshot per call so config edits apply immediately
        let config = match self.config.snapshot() {
            Ok(c) => c,
            Err(e) => return ToolResult::error(e.to_string()),
        };

        match dispatch(&params, &config, self.client.as_ref()).await {
            Ok(envelope) => ToolResult::json(&envelope.into_value()),
            Err(e) => {
                warn!(code = e.code(), error = %e, "slack action failed");
                ToolResult::error(e.to_string())
            }
        }
    }
}

/// JSON Schema: one object variant per action literal.
pub fn input_schema() -> Value {
    let variants: Vec<Value> = ActionKind::ALL.iter().map(variant_schema).collect();
    json!({ "oneOf": variants })
}

fn variant_schema(kind: &ActionKind) -> Value {
    let mut properties = Map::new();
    properties.insert(
        "action".to_string(),
        json!({ "type": "string", "const": kind.as_str() }),
    );
    for name in kind.required_params().iter().chain(kind.optional_params()) {
        properties.insert(name.to_string(), json!({ "type": param_type(name) }));
    }

    let mut required = vec!["action"];
    required.extend_from_slice(kind.required_params());

    json!({
        "type": "object",
        "properties": properties,
        "required": required,
        "additionalProperties": false,
    })
}

fn param_type(name: &str) -> &'static str {
    match name {
        "limit" => "number",
        _ => "string",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn variant<'a>(schema: &'a Value, action: &str) -> &'a Value {
        schema["oneOf"]
            .as_array()
            .unwrap()
            .iter()
            .find(|v| v["properties"]["action"]["const"] == action)
            .unwrap_or_else(|| panic!("no variant for {action}"))
    }

    #[test]
    fn schema_has_one_variant_per_action() {
        let schema = input_schema();
        assert_eq!(schema["oneOf"].as_array().unwrap().len(), ActionKind::ALL.len());
    }

    #[test]
    fn send_message_variant() {
        let schema = input_schema();
        let v = variant(&schema, "sendMessage");
        assert_eq!(v["required"], json!(["action", "to", "content"]));
        assert_eq!(v["properties"]["mediaUrl"]["type"], "string");
        assert_eq!(v["properties"]["replyTo"]["type"], "string");
    }

    #[test]
    fn read_messages_limit_is_numeric() {
        let schema = input_schema();
        let v = variant(&schema, "readMessages");
        assert_eq!(v["required"], json!(["action", "channelId"]));
        assert_eq!(v["properties"]["limit"]["type"], "number");
    }

    #[test]
    fn emoji_list_takes_no_params() {
        let schema = input_schema();
        let v = variant(&schema, "emojiList");
        assert_eq!(v["required"], json!(["action"]));
        assert_eq!(v["properties"].as_object().unwrap().len(), 1);
    }
}

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{ArchError, ArchResult};

/// Output schema for structured LLM responses
///
/// Defines the shape a model response must conform to for a flow call to
/// succeed. The provider is asked for natively schema-shaped output where it
/// supports that, and the parsed response is validated against the same
/// schema before it is handed back to the caller: a response that fails
/// validation fails the call, it is never passed through partially
/// populated.
///
/// # Examples
///
/// ```rust
/// use archaive_core::schema::OutputSchema;
/// use serde_json::json;
///
/// let schema = OutputSchema::from_json_schema(json!({
///     "type": "object",
///     "properties": {
///         "summary": {"type": "string"},
///         "sources": {"type": "array", "items": {"type": "string"}}
///     },
///     "required": ["summary", "sources"]
/// }));
///
/// assert!(schema.validate(&json!({"summary": "ok", "sources": []})).is_ok());
/// assert!(schema.validate(&json!({"summary": "ok"})).is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputSchema {
    /// JSON Schema definition
    pub schema: Value,

    /// Optional description of what this schema represents
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Whether to enforce the schema on responses (strict mode)
    #[serde(default = "default_strict")]
    pub strict: bool,
}

fn default_strict() -> bool {
    true
}

impl OutputSchema {
    /// Create from a JSON Schema definition
    pub fn from_json_schema(schema: Value) -> Self {
        Self {
            schema,
            description: None,
            strict: true,
        }
    }

    /// Create with description
    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }

    /// Set strict mode
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Raw schema for providers that accept a native response schema
    pub fn to_response_schema(&self) -> Value {
        self.schema.clone()
    }

    /// Validate output against this schema
    ///
    /// Structural validation: type match, required object properties present
    /// and non-null (recursively), array item validation, enum membership.
    pub fn validate(&self, output: &Value) -> ArchResult<()> {
        if !self.strict {
            return Ok(());
        }
        validate_value(&self.schema, output, "$")
    }

    /// System prompt instructions for providers without native schema support
    pub fn to_system_instructions(&self) -> String {
        let mut instructions = String::from(
            "You MUST format your response as structured JSON matching this schema:\n\n",
        );

        if let Some(desc) = &self.description {
            instructions.push_str(&format!("Description: {}\n\n", desc));
        }

        instructions.push_str(&format!(
            "Schema:\n{}\n\n",
            serde_json::to_string_pretty(&self.schema).unwrap_or_default()
        ));

        instructions.push_str(
            "Respond ONLY with valid JSON matching this schema. Do not include any explanation or markdown formatting."
        );

        instructions
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn type_matches(expected: &str, value: &Value) -> bool {
    match expected {
        // "integer" is a number without a fractional part
        "integer" => value.as_i64().is_some() || value.as_u64().is_some(),
        other => other == json_type_name(value),
    }
}

fn is_nullable(schema: &Value) -> bool {
    if schema.get("nullable").and_then(|n| n.as_bool()) == Some(true) {
        return true;
    }
    match schema.get("type") {
        Some(Value::Array(types)) => types.iter().any(|t| t.as_str() == Some("null")),
        Some(Value::String(t)) => t == "null",
        _ => false,
    }
}

fn validate_value(schema: &Value, value: &Value, path: &str) -> ArchResult<()> {
    if value.is_null() {
        if is_nullable(schema) {
            return Ok(());
        }
        return Err(ArchError::schema(format!("{}: unexpected null", path)));
    }

    // Type check: accepts a single type name or a list of alternatives
    match schema.get("type") {
        Some(Value::String(expected)) => {
            if !type_matches(expected, value) {
                return Err(ArchError::schema(format!(
                    "{}: expected type '{}', got '{}'",
                    path,
                    expected,
                    json_type_name(value)
                )));
            }
        }
        Some(Value::Array(types)) => {
            let ok = types
                .iter()
                .filter_map(|t| t.as_str())
                .any(|t| type_matches(t, value));
            if !ok {
                return Err(ArchError::schema(format!(
                    "{}: value type '{}' not among allowed types",
                    path,
                    json_type_name(value)
                )));
            }
        }
        _ => {}
    }

    // Enum membership
    if let Some(Value::Array(allowed)) = schema.get("enum") {
        if !allowed.contains(value) {
            return Err(ArchError::schema(format!(
                "{}: value {} not in enum",
                path, value
            )));
        }
    }

    match value {
        Value::Object(map) => {
            if let Some(Value::Array(required)) = schema.get("required") {
                for req in required.iter().filter_map(|r| r.as_str()) {
                    if !map.contains_key(req) {
                        return Err(ArchError::schema(format!(
                            "{}: missing required property '{}'",
                            path, req
                        )));
                    }
                }
            }
            if let Some(Value::Object(props)) = schema.get("properties") {
                for (key, prop_schema) in props {
                    if let Some(prop_value) = map.get(key) {
                        validate_value(prop_schema, prop_value, &format!("{}.{}", path, key))?;
                    }
                }
            }
        }
        Value::Array(items) => {
            if let Some(item_schema) = schema.get("items") {
                for (i, item) in items.iter().enumerate() {
                    validate_value(item_schema, item, &format!("{}[{}]", path, i))?;
                }
            }
        }
        _ => {}
    }

    Ok(())
}

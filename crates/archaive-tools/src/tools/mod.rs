//! Tool implementations
//!
//! Each lookup tool lives in its own module. All of them are synchronous
//! table lookups wrapped in the async `Tool` trait.

pub mod company;
pub mod github;

/// Common utilities for tool implementations
pub mod common {
    /// Standard JSON schema for a tool with the given properties
    pub fn create_schema(properties: serde_json::Value, required: Vec<&str>) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": properties,
            "required": required
        })
    }
}

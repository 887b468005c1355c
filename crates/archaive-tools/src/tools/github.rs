//! GitHub search lookup
//!
//! Simulated GitHub code search. The table is keyed by lowercased query;
//! anything not in the table yields an empty result list, never an error,
//! so the model can probe freely.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::OnceLock;
use tracing::debug;

use archaive_core::{ArchResult, Tool, ToolDefinition, ToolInput, ToolResult};

use super::common::create_schema;

fn search_data() -> &'static HashMap<&'static str, Value> {
    static DATA: OnceLock<HashMap<&'static str, Value>> = OnceLock::new();
    DATA.get_or_init(|| {
        HashMap::from([(
            "stripe",
            json!([
                {
                    "type": "repo",
                    "path": "stripe/stripe-node",
                    "description": "Node.js library for the Stripe API."
                },
                {
                    "type": "file",
                    "path": "stripe/stripe-node/lib/stripe.js",
                    "description": "Main entry point of the Stripe Node.js client."
                },
                {
                    "type": "repo",
                    "path": "stripe/react-stripe-js",
                    "description": "React components for Stripe.js and Stripe Elements."
                },
                {
                    "type": "file",
                    "path": "stripe/stripe-js/src/stripe.ts",
                    "description": "Stripe.js loader implementation."
                }
            ]),
        )])
    })
}

/// Searches a static index of GitHub repositories and files
pub struct GitHubSearchTool;

impl GitHubSearchTool {
    pub fn new() -> Self {
        Self
    }
}

impl Default for GitHubSearchTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for GitHubSearchTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "search_github".to_string(),
            description: "Searches GitHub for repositories and files relevant to a software entity. Returns a list of matches; an empty list means nothing was found.".to_string(),
            parameters: create_schema(
                json!({
                    "query": {
                        "type": "string",
                        "description": "The search query, e.g. a company or product name like \"stripe\"."
                    }
                }),
                vec!["query"],
            ),
        }
    }

    async fn execute(&self, input: ToolInput) -> ArchResult<ToolResult> {
        let query: String = input.get_arg("query")?;
        debug!(query = %query, "Searching GitHub index");

        let key = query.to_lowercase();
        let results = search_data()
            .get(key.as_str())
            .cloned()
            .unwrap_or_else(|| json!([]));

        Ok(ToolResult::ok(json!({ "results": results })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_stripe_returns_fixed_four_entries() {
        let tool = GitHubSearchTool::new();
        let result = tool
            .execute(ToolInput::new(json!({"query": "stripe"})))
            .await
            .unwrap();
        let results = result.content["results"].as_array().unwrap();
        assert_eq!(results.len(), 4);
        assert_eq!(results[0]["type"], "repo");
        assert_eq!(results[0]["path"], "stripe/stripe-node");
        assert_eq!(results[1]["type"], "file");
    }

    #[tokio::test]
    async fn test_lookup_is_case_insensitive() {
        let tool = GitHubSearchTool::new();
        let result = tool
            .execute(ToolInput::new(json!({"query": "Stripe"})))
            .await
            .unwrap();
        assert_eq!(result.content["results"].as_array().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_lookup_is_exact_not_substring() {
        let tool = GitHubSearchTool::new();
        let result = tool
            .execute(ToolInput::new(json!({"query": "how is stripe built"})))
            .await
            .unwrap();
        assert!(result.content["results"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_query_returns_empty_list() {
        let tool = GitHubSearchTool::new();
        let result = tool
            .execute(ToolInput::new(json!({"query": "eiffel tower"})))
            .await
            .unwrap();
        assert!(result.success);
        assert!(result.content["results"].as_array().unwrap().is_empty());
    }
}

//! Company information lookup
//!
//! Simulated database of company information, mimicking a Crunchbase-like
//! API. Keys are lowercased company names; a miss returns a not-found
//! record rather than an error.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::OnceLock;
use tracing::debug;

use archaive_core::{ArchResult, Tool, ToolDefinition, ToolInput, ToolResult};

use super::common::create_schema;

fn company_data() -> &'static HashMap<&'static str, Value> {
    static DATA: OnceLock<HashMap<&'static str, Value>> = OnceLock::new();
    DATA.get_or_init(|| {
        HashMap::from([
            (
                "stripe",
                json!({
                    "name": "Stripe",
                    "description": "Stripe is an Irish-American financial services and software as a service (SaaS) company dual-headquartered in San Francisco, United States and Dublin, Ireland. The company primarily offers payment processing software and application programming interfaces (APIs) for e-commerce websites and mobile applications.",
                    "founded": 2010,
                    "founders": ["Patrick Collison", "John Collison"],
                    "valuation": "$65 billion (as of 2024)",
                }),
            ),
            (
                "openai",
                json!({
                    "name": "OpenAI",
                    "description": "OpenAI is an American artificial intelligence (AI) research organization consisting of the non-profit OpenAI, Inc. and its for-profit subsidiary corporation OpenAI Global, LLC. OpenAI conducts AI research with the declared intention of promoting and developing friendly AI in a way that benefits humanity as a whole.",
                    "founded": 2015,
                    "founders": ["Elon Musk", "Sam Altman", "Greg Brockman", "Ilya Sutskever", "Wojciech Zaremba"],
                    "keyProducts": ["GPT series", "DALL-E", "Sora"],
                }),
            ),
        ])
    })
}

/// Returns static information about a well-known company
pub struct CompanyInfoTool;

impl CompanyInfoTool {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CompanyInfoTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for CompanyInfoTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "get_company_info".to_string(),
            description: "Returns information about a specific company, such as its description, founding year, founders, and valuation.".to_string(),
            parameters: create_schema(
                json!({
                    "company_name": {
                        "type": "string",
                        "description": "The name of the company to look up. Should be a single, well-known name like \"Stripe\" or \"OpenAI\"."
                    }
                }),
                vec!["company_name"],
            ),
        }
    }

    async fn execute(&self, input: ToolInput) -> ArchResult<ToolResult> {
        let company_name: String = input.get_arg("company_name")?;
        debug!(company = %company_name, "Looking up company info");

        let key = company_name.to_lowercase();
        let record = company_data()
            .get(key.as_str())
            .cloned()
            .unwrap_or_else(|| json!({ "error": "Company not found." }));

        Ok(ToolResult::ok(record))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_known_company_case_insensitive() {
        let tool = CompanyInfoTool::new();
        let result = tool
            .execute(ToolInput::new(json!({"company_name": "Stripe"})))
            .await
            .unwrap();
        assert!(result.success);
        assert_eq!(result.content["name"], "Stripe");
        assert_eq!(result.content["founded"], 2010);
        assert_eq!(result.content["founders"][0], "Patrick Collison");
    }

    #[tokio::test]
    async fn test_openai_record() {
        let tool = CompanyInfoTool::new();
        let result = tool
            .execute(ToolInput::new(json!({"company_name": "OPENAI"})))
            .await
            .unwrap();
        assert_eq!(result.content["name"], "OpenAI");
        assert_eq!(result.content["keyProducts"][0], "GPT series");
    }

    #[tokio::test]
    async fn test_unknown_company_returns_not_found() {
        let tool = CompanyInfoTool::new();
        let result = tool
            .execute(ToolInput::new(json!({"company_name": "unknown-co"})))
            .await
            .unwrap();
        assert!(result.success);
        assert_eq!(result.content["error"], "Company not found.");
    }

    #[tokio::test]
    async fn test_missing_argument_is_tool_error() {
        let tool = CompanyInfoTool::new();
        assert!(tool.execute(ToolInput::new(json!({}))).await.is_err());
    }
}

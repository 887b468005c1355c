//! Query response flow
//!
//! Answers "how is this built?" queries with a structured blueprint for
//! either a digital entity (app, SaaS, business) or a physical one
//! (building, bridge). This is the only flow that exposes lookup tools to
//! the model: `get_company_info` and `search_github`.

use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::OnceLock;

use archaive_core::{
    check_min_len, ArchResult, FieldError, FlowInput, FlowSpec, OutputSchema, PromptTemplate,
};

use crate::runner::FlowRunner;

const PROMPT: &str = r#"You are the ArchAIve, the eternal codex of civilization. Your purpose is to unify the world's digital and physical knowledge into buildable blueprints.

A user has submitted the following query: "{{query}}"

1.  First, determine if the query is about a digital entity (software, app, SaaS, business) or a physical entity (building, skyscraper, bridge). Set the 'is_digital' flag accordingly.
2.  Based on your determination, populate either the 'digital_blueprint' or the 'physical_blueprint' object with as much detail as possible.
3.  If the query is about a specific company, use the get_company_info tool to fetch details and incorporate them into your response.
4.  If the query is about a software entity, you MUST use the search_github tool to find relevant repositories and files. Populate the 'github_files' array with the results. If no results are found, return an empty array.
5.  For software entities, find a relevant and illustrative code snippet for the 'code_example' field. This could be from the search_github tool results or a general example. If none is found, return null.
6.  For every piece of information, you MUST cite your sources. Populate the 'sources' array with URLs. If you are making an assumption, state it.
7.  If some information is unavailable, return a partial JSON with null for the missing fields. Do not make up information you cannot verify.
8.  Finally, write a concise summary of your findings.

Analyze the query and generate the structured JSON response."#;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResponseInput {
    /// The user's search query
    pub query: String,
}

impl FlowInput for QueryResponseInput {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();
        check_min_len(&mut errors, "query", &self.query, 1, "Please enter a search query.");
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn prompt_fields(&self) -> Vec<(&'static str, String)> {
        vec![("query", self.query.clone())]
    }
}

/// Entry kind in a GitHub search result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GitHubFileKind {
    Repo,
    File,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubFile {
    #[serde(rename = "type")]
    pub kind: GitHubFileKind,
    pub path: String,
    pub description: String,
}

/// Structured blueprint for a digital entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppBlueprint {
    /// Name of the application or company
    pub name: String,

    /// Kind of entity, e.g. "Business/Fintech"
    #[serde(rename = "type")]
    pub kind: String,

    /// Key technologies and frameworks used
    #[serde(default)]
    pub tech_stack: Option<Vec<String>>,

    /// A relevant code snippet or reference to a file
    #[serde(default)]
    pub code_example: Option<String>,

    /// How the entity makes money
    #[serde(default)]
    pub business_model: Option<String>,

    /// High-level steps to build a similar entity
    pub step_by_step_build: Vec<String>,

    /// Relevant GitHub repositories or files
    #[serde(default)]
    pub github_files: Option<Vec<GitHubFile>>,

    /// URLs for the data sources
    pub sources: Vec<String>,
}

/// Structured blueprint for a physical entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildingBlueprint {
    /// Name of the building or structure
    pub name: String,

    /// Kind of structure, e.g. "Skyscraper"
    #[serde(rename = "type")]
    pub kind: String,

    /// Links or references to blueprint files (e.g. CAD.dwg)
    #[serde(default)]
    pub blueprint_files: Option<Vec<String>>,

    /// Primary construction materials
    pub materials: Vec<String>,

    /// Main engineering firm responsible
    #[serde(default)]
    pub engineering_firm: Option<String>,

    /// High-level steps of construction
    pub construction_steps: Vec<String>,

    /// URLs or references for the data sources
    pub sources: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResponseOutput {
    /// Whether the query is about a digital entity or a physical one
    pub is_digital: bool,

    /// Populated when the query is about a digital entity
    pub digital_blueprint: Option<AppBlueprint>,

    /// Populated when the query is about a physical entity
    pub physical_blueprint: Option<BuildingBlueprint>,

    /// A summary of the findings
    pub summary: String,
}

pub fn spec() -> &'static FlowSpec {
    static SPEC: OnceLock<FlowSpec> = OnceLock::new();
    SPEC.get_or_init(|| FlowSpec {
        name: "query_response",
        description: "Answer a search query with a structured digital or physical blueprint",
        prompt: PromptTemplate::new(PROMPT),
        output_schema: OutputSchema::from_json_schema(json!({
            "type": "object",
            "properties": {
                "is_digital": {
                    "type": "boolean",
                    "description": "Is the query about a digital entity (app, SaaS) or a physical one (building)?"
                },
                "digital_blueprint": {
                    "type": "object",
                    "nullable": true,
                    "description": "The structured blueprint for a digital entity.",
                    "properties": {
                        "name": {"type": "string", "description": "The name of the application or company."},
                        "type": {"type": "string", "description": "The type of entity, e.g., \"Business/Fintech\"."},
                        "tech_stack": {
                            "type": "array",
                            "nullable": true,
                            "items": {"type": "string"},
                            "description": "The key technologies and frameworks used."
                        },
                        "code_example": {
                            "type": "string",
                            "nullable": true,
                            "description": "A relevant code snippet or reference to a file."
                        },
                        "business_model": {
                            "type": "string",
                            "nullable": true,
                            "description": "How the entity makes money."
                        },
                        "step_by_step_build": {
                            "type": "array",
                            "items": {"type": "string"},
                            "description": "High-level steps to build a similar entity."
                        },
                        "github_files": {
                            "type": "array",
                            "nullable": true,
                            "description": "A list of relevant GitHub repositories or files.",
                            "items": {
                                "type": "object",
                                "properties": {
                                    "type": {"type": "string", "enum": ["repo", "file"]},
                                    "path": {"type": "string"},
                                    "description": {"type": "string"}
                                },
                                "required": ["type", "path", "description"]
                            }
                        },
                        "sources": {
                            "type": "array",
                            "items": {"type": "string"},
                            "description": "List of URLs for the data sources."
                        }
                    },
                    "required": ["name", "type", "step_by_step_build", "sources"]
                },
                "physical_blueprint": {
                    "type": "object",
                    "nullable": true,
                    "description": "The structured blueprint for a physical entity.",
                    "properties": {
                        "name": {"type": "string", "description": "The name of the building or structure."},
                        "type": {"type": "string", "description": "The type of structure, e.g., \"Skyscraper\"."},
                        "blueprint_files": {
                            "type": "array",
                            "nullable": true,
                            "items": {"type": "string"},
                            "description": "Links or references to blueprint files (e.g., CAD.dwg)."
                        },
                        "materials": {
                            "type": "array",
                            "items": {"type": "string"},
                            "description": "The primary construction materials."
                        },
                        "engineering_firm": {
                            "type": "string",
                            "nullable": true,
                            "description": "The main engineering firm responsible."
                        },
                        "construction_steps": {
                            "type": "array",
                            "items": {"type": "string"},
                            "description": "High-level steps of construction."
                        },
                        "sources": {
                            "type": "array",
                            "items": {"type": "string"},
                            "description": "List of URLs or references for the data sources."
                        }
                    },
                    "required": ["name", "type", "materials", "construction_steps", "sources"]
                },
                "summary": {
                    "type": "string",
                    "description": "A summary of the findings."
                }
            },
            "required": ["is_digital", "digital_blueprint", "physical_blueprint", "summary"]
        }))
        .with_description("Structured blueprint answering a build query"),
    })
}

pub async fn generate_query_response(
    runner: &FlowRunner,
    input: &QueryResponseInput,
) -> ArchResult<QueryResponseOutput> {
    runner.run(spec(), input, true).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_query_rejected() {
        let input = QueryResponseInput {
            query: "".to_string(),
        };
        let errors = input.validate().unwrap_err();
        assert_eq!(errors[0].field, "query");
        assert_eq!(errors[0].message, "Please enter a search query.");
    }

    #[test]
    fn test_query_substituted_into_prompt() {
        let input = QueryResponseInput {
            query: "how is stripe built".to_string(),
        };
        let rendered = spec().prompt.render(&input.prompt_fields());
        assert!(rendered.contains("\"how is stripe built\""));
    }

    #[test]
    fn test_output_deserializes_with_null_blueprints() {
        let output: QueryResponseOutput = serde_json::from_value(json!({
            "is_digital": false,
            "digital_blueprint": null,
            "physical_blueprint": {
                "name": "Eiffel Tower",
                "type": "Tower",
                "materials": ["wrought iron"],
                "construction_steps": ["foundations", "lattice assembly"],
                "sources": ["https://example.com/eiffel"]
            },
            "summary": "A wrought iron lattice tower."
        }))
        .unwrap();
        assert!(!output.is_digital);
        assert!(output.digital_blueprint.is_none());
        assert_eq!(output.physical_blueprint.unwrap().name, "Eiffel Tower");
    }

    #[test]
    fn test_github_file_kind_roundtrip() {
        let file: GitHubFile = serde_json::from_value(json!({
            "type": "repo",
            "path": "stripe/stripe-node",
            "description": "Node.js library"
        }))
        .unwrap();
        assert_eq!(file.kind, GitHubFileKind::Repo);
        assert_eq!(serde_json::to_value(&file).unwrap()["type"], "repo");
    }

    #[test]
    fn test_schema_rejects_missing_summary() {
        let err = spec()
            .output_schema
            .validate(&json!({
                "is_digital": true,
                "digital_blueprint": null,
                "physical_blueprint": null
            }))
            .unwrap_err();
        assert!(err.to_string().contains("summary"));
    }
}

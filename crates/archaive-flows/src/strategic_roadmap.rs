//! Strategic roadmap flow
//!
//! Produces a roadmap with integrated code templates and architecture
//! diagrams from a project description, desired outcomes, and available
//! resources.

use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::OnceLock;

use archaive_core::{
    check_min_len, ArchResult, FieldError, FlowInput, FlowSpec, OutputSchema, PromptTemplate,
};

use crate::runner::FlowRunner;

const PROMPT: &str = "You are a strategic planning expert. You will generate a strategic roadmap with integrated code templates and architecture diagrams based on the project description, desired outcomes, and available resources.

Project Description: {{project_description}}
Desired Outcomes: {{desired_outcomes}}
Available Resources: {{available_resources}}";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategicRoadmapInput {
    pub project_description: String,
    pub desired_outcomes: String,
    pub available_resources: String,
}

impl FlowInput for StrategicRoadmapInput {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();
        check_min_len(
            &mut errors,
            "project_description",
            &self.project_description,
            10,
            "Please provide a more detailed project description.",
        );
        check_min_len(
            &mut errors,
            "desired_outcomes",
            &self.desired_outcomes,
            10,
            "Please describe the desired outcomes in more detail.",
        );
        check_min_len(
            &mut errors,
            "available_resources",
            &self.available_resources,
            5,
            "Please list the available resources.",
        );
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn prompt_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("project_description", self.project_description.clone()),
            ("desired_outcomes", self.desired_outcomes.clone()),
            ("available_resources", self.available_resources.clone()),
        ]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategicRoadmapOutput {
    /// The generated strategic roadmap
    pub roadmap: String,

    /// The integrated code templates
    pub code_templates: String,

    /// The architecture diagrams
    pub architecture_diagrams: String,
}

pub fn spec() -> &'static FlowSpec {
    static SPEC: OnceLock<FlowSpec> = OnceLock::new();
    SPEC.get_or_init(|| FlowSpec {
        name: "strategic_roadmap",
        description: "Generate a strategic roadmap with code templates and architecture diagrams",
        prompt: PromptTemplate::new(PROMPT),
        output_schema: OutputSchema::from_json_schema(json!({
            "type": "object",
            "properties": {
                "roadmap": {
                    "type": "string",
                    "description": "The generated strategic roadmap."
                },
                "code_templates": {
                    "type": "string",
                    "description": "The integrated code templates."
                },
                "architecture_diagrams": {
                    "type": "string",
                    "description": "The architecture diagrams."
                }
            },
            "required": ["roadmap", "code_templates", "architecture_diagrams"]
        }))
        .with_description("Strategic roadmap with supporting artifacts"),
    })
}

pub async fn generate_strategic_roadmap(
    runner: &FlowRunner,
    input: &StrategicRoadmapInput,
) -> ArchResult<StrategicRoadmapOutput> {
    runner.run(spec(), input, false).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_resources_rejected() {
        let input = StrategicRoadmapInput {
            project_description: "A long enough project description.".to_string(),
            desired_outcomes: "A long enough set of outcomes.".to_string(),
            available_resources: "two".to_string(),
        };
        let errors = input.validate().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "available_resources");
        assert_eq!(errors[0].message, "Please list the available resources.");
    }

    #[test]
    fn test_prompt_substitution() {
        let input = StrategicRoadmapInput {
            project_description: "Blueprint catalog service".to_string(),
            desired_outcomes: "Launch in two quarters".to_string(),
            available_resources: "Three engineers".to_string(),
        };
        let rendered = spec().prompt.render(&input.prompt_fields());
        assert!(rendered.contains("Project Description: Blueprint catalog service"));
        assert!(rendered.contains("Desired Outcomes: Launch in two quarters"));
        assert!(rendered.contains("Available Resources: Three engineers"));
    }
}

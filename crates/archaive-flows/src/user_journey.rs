//! User journey map flow
//!
//! Generates a textual user journey map for a software project or building
//! design. Architecture and business documentation are optional; when
//! absent the model is told to make intelligent assumptions and the
//! corresponding placeholders render empty.

use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::OnceLock;

use archaive_core::{
    check_min_len, ArchResult, FieldError, FlowInput, FlowSpec, OutputSchema, PromptTemplate,
};

use crate::runner::FlowRunner;

const PROMPT: &str = "You are an expert UX designer specializing in user journey maps.

Based on the description of the software project or building design, architecture documentation, and business documentation, generate a user journey map.
Infer the key user states and interactions from the provided documentation. If documentation isn't provided, reason and make intelligent assumptions.

Project Description: {{project_description}}
Architecture Documentation: {{architecture_documentation}}
Business Documentation: {{business_documentation}}

Ensure that the generated user journey map provides a comprehensive overview of the user experience, highlighting key touchpoints and potential pain points. Return the user journey map as a well-formatted text.";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserJourneyInput {
    /// A detailed description of the software project or building design
    pub project_description: String,

    /// Optional architecture documentation
    #[serde(default)]
    pub architecture_documentation: Option<String>,

    /// Optional business documentation
    #[serde(default)]
    pub business_documentation: Option<String>,
}

impl FlowInput for UserJourneyInput {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();
        check_min_len(
            &mut errors,
            "project_description",
            &self.project_description,
            10,
            "Please provide a more detailed project description.",
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
            (
                "architecture_documentation",
                self.architecture_documentation.clone().unwrap_or_default(),
            ),
            (
                "business_documentation",
                self.business_documentation.clone().unwrap_or_default(),
            ),
        ]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserJourneyOutput {
    /// A textual representation of the generated user journey map
    pub user_journey_map: String,
}

pub fn spec() -> &'static FlowSpec {
    static SPEC: OnceLock<FlowSpec> = OnceLock::new();
    SPEC.get_or_init(|| FlowSpec {
        name: "user_journey",
        description: "Generate a user journey map for a software project or building design",
        prompt: PromptTemplate::new(PROMPT),
        output_schema: OutputSchema::from_json_schema(json!({
            "type": "object",
            "properties": {
                "user_journey_map": {
                    "type": "string",
                    "description": "A textual representation of the generated user journey map."
                }
            },
            "required": ["user_journey_map"]
        }))
        .with_description("User journey map"),
    })
}

pub async fn generate_user_journey_map(
    runner: &FlowRunner,
    input: &UserJourneyInput,
) -> ArchResult<UserJourneyOutput> {
    runner.run(spec(), input, false).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_optional_fields_render_empty() {
        let input = UserJourneyInput {
            project_description: "A static catalog of building blueprints.".to_string(),
            architecture_documentation: None,
            business_documentation: None,
        };
        let rendered = spec().prompt.render(&input.prompt_fields());
        assert!(rendered.contains("Architecture Documentation: \n"));
        assert!(rendered.contains("Business Documentation: \n"));
    }

    #[test]
    fn test_optional_fields_substituted_when_set() {
        let input = UserJourneyInput {
            project_description: "A static catalog of building blueprints.".to_string(),
            architecture_documentation: Some("Three-tier web architecture".to_string()),
            business_documentation: None,
        };
        let rendered = spec().prompt.render(&input.prompt_fields());
        assert!(rendered.contains("Architecture Documentation: Three-tier web architecture"));
    }

    #[test]
    fn test_short_description_rejected() {
        let input = UserJourneyInput {
            project_description: "too short".to_string(),
            architecture_documentation: None,
            business_documentation: None,
        };
        // 9 characters, below the minimum of 10
        let errors = input.validate().unwrap_err();
        assert_eq!(errors[0].field, "project_description");
    }
}

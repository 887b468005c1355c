//! Investor pitch deck flow
//!
//! Generates pitch deck content and a business model from a build guide
//! summary, target investor profile, market analysis, and competitive
//! landscape.

use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::OnceLock;

use archaive_core::{
    check_min_len, ArchResult, FieldError, FlowInput, FlowSpec, OutputSchema, PromptTemplate,
};

use crate::runner::FlowRunner;

const PROMPT: &str = "You are an expert in creating investor pitch decks and business models.

Based on the following build guide summary, target investor profile, market analysis, and competitive landscape, generate a compelling investor pitch deck and business model.

Build Guide Summary: {{build_guide_summary}}
Target Investor: {{target_investor}}
Market Analysis: {{market_analysis}}
Competitive Landscape: {{competitive_landscape}}";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvestorPitchInput {
    pub build_guide_summary: String,
    pub target_investor: String,
    pub market_analysis: String,
    pub competitive_landscape: String,
}

impl FlowInput for InvestorPitchInput {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();
        check_min_len(
            &mut errors,
            "build_guide_summary",
            &self.build_guide_summary,
            10,
            "Please provide a more detailed summary.",
        );
        check_min_len(
            &mut errors,
            "target_investor",
            &self.target_investor,
            3,
            "Please specify the target investor.",
        );
        check_min_len(
            &mut errors,
            "market_analysis",
            &self.market_analysis,
            10,
            "Please provide a more detailed market analysis.",
        );
        check_min_len(
            &mut errors,
            "competitive_landscape",
            &self.competitive_landscape,
            10,
            "Please provide a more detailed competitive landscape.",
        );
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn prompt_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("build_guide_summary", self.build_guide_summary.clone()),
            ("target_investor", self.target_investor.clone()),
            ("market_analysis", self.market_analysis.clone()),
            ("competitive_landscape", self.competitive_landscape.clone()),
        ]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvestorPitchOutput {
    /// The generated content for the investor pitch deck
    pub pitch_deck_content: String,

    /// The generated business model
    pub business_model: String,
}

pub fn spec() -> &'static FlowSpec {
    static SPEC: OnceLock<FlowSpec> = OnceLock::new();
    SPEC.get_or_init(|| FlowSpec {
        name: "investor_pitch",
        description: "Generate an investor pitch deck and business model from a build guide",
        prompt: PromptTemplate::new(PROMPT),
        output_schema: OutputSchema::from_json_schema(json!({
            "type": "object",
            "properties": {
                "pitch_deck_content": {
                    "type": "string",
                    "description": "The generated content for the investor pitch deck."
                },
                "business_model": {
                    "type": "string",
                    "description": "The generated business model."
                }
            },
            "required": ["pitch_deck_content", "business_model"]
        }))
        .with_description("Investor pitch deck and business model"),
    })
}

pub async fn generate_investor_pitch(
    runner: &FlowRunner,
    input: &InvestorPitchInput,
) -> ArchResult<InvestorPitchOutput> {
    runner.run(spec(), input, false).await
}

//! ArchAIve Flows - the generation flows behind the ArchAIve demo app
//!
//! Each flow is a named pipeline: typed input with validation rules, a
//! prompt template, and a typed output with a declared schema. The
//! `FlowRunner` drives an invocation against any `Model` implementation;
//! the query flow additionally round-trips through the lookup tools in
//! `archaive-tools`.

pub mod investor_pitch;
pub mod query_response;
pub mod runner;
pub mod strategic_roadmap;
pub mod user_journey;

pub use investor_pitch::{generate_investor_pitch, InvestorPitchInput, InvestorPitchOutput};
pub use query_response::{
    generate_query_response, AppBlueprint, BuildingBlueprint, GitHubFile, GitHubFileKind,
    QueryResponseInput, QueryResponseOutput,
};
pub use runner::FlowRunner;
pub use strategic_roadmap::{
    generate_strategic_roadmap, StrategicRoadmapInput, StrategicRoadmapOutput,
};
pub use user_journey::{generate_user_journey_map, UserJourneyInput, UserJourneyOutput};

use archaive_core::FlowSpec;

/// All flow specifications, for discovery (e.g. `archaivectl list`)
pub fn all_specs() -> Vec<&'static FlowSpec> {
    vec![
        investor_pitch::spec(),
        strategic_roadmap::spec(),
        user_journey::spec(),
        query_response::spec(),
    ]
}

// ArchAIve Core - Foundation types and traits for the ArchAIve flow engine
//
// A flow is a named pipeline: validate typed input, render a prompt
// template, call a model provider requesting schema-shaped output, validate
// and parse the response. This crate holds the types every other crate
// builds on; providers live in archaive-llm, built-in tools in
// archaive-tools, and the flows themselves in archaive-flows.

pub mod error;
pub mod flow;
pub mod model;
pub mod schema;
pub mod tool;

pub use error::{ArchError, ArchResult, FieldError};
pub use flow::{check_min_len, FlowInput, FlowSpec, PromptTemplate};
pub use model::{
    Model, ModelConfig, ModelProvider, ModelRequest, ModelResponse, MessageRole, RequestMessage,
    StopReason,
};
pub use schema::OutputSchema;
pub use tool::{Tool, ToolCall, ToolDefinition, ToolExecutor, ToolInput, ToolOutput, ToolResult};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Maximum model/tool round trips in a single flow invocation
pub const MAX_TOOL_ROUNDS: usize = 8;

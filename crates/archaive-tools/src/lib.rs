//! ArchAIve Tools - built-in lookup tools for flows
//!
//! Tools here are pure functions over static in-memory tables: given a name
//! or query string, lowercase it and look it up. There is no external I/O
//! and no error path beyond a "not found" record, so the model can call
//! them freely mid-generation.
//!
//! # Example
//!
//! ```rust,ignore
//! use archaive_tools::{ToolRegistry, CompanyInfoTool, GitHubSearchTool};
//!
//! let mut registry = ToolRegistry::new();
//! registry.register(CompanyInfoTool::new());
//! registry.register(GitHubSearchTool::new());
//! let executor = registry.into_executor();
//! ```

pub mod registry;
pub mod tools;

pub use registry::{BuiltinToolExecutor, ToolRegistry};
pub use tools::company::CompanyInfoTool;
pub use tools::github::GitHubSearchTool;

/// Registry with every built-in tool registered
pub fn default_registry() -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(CompanyInfoTool::new());
    registry.register(GitHubSearchTool::new());
    registry
}

//! ArchAIve LLM - model provider implementations
//!
//! Providers implement `archaive_core::Model`: a single best-effort
//! `generate` call per request, no retry or backoff. The Google provider
//! talks to the Gemini `generateContent` REST API; the mock provider
//! returns canned responses for tests.

pub mod provider;

pub use provider::create_provider;
#[cfg(feature = "google")]
pub use provider::google::GoogleProvider;
pub use provider::mock::MockProvider;

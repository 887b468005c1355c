#[cfg(feature = "google")]
pub mod google;
pub mod mock;

use std::sync::Arc;

use archaive_core::{ArchResult, Model, ModelConfig, ModelProvider};

/// Create a provider from configuration
pub fn create_provider(config: ModelConfig) -> ArchResult<Arc<dyn Model>> {
    match config.provider {
        #[cfg(feature = "google")]
        ModelProvider::Google => Ok(Arc::new(google::GoogleProvider::create(config)?)),
        #[cfg(not(feature = "google"))]
        ModelProvider::Google => Err(archaive_core::ArchError::config(
            "Google provider support is not compiled in (enable the 'google' feature)",
        )),
        ModelProvider::Mock => Ok(Arc::new(mock::MockProvider::with_config(config))),
    }
}

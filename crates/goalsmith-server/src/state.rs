use std::sync::Arc;

use serde::Serialize;

use goalsmith_core::{Pipeline, TextGen};
use textgen_client::ProviderConfig;

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Pipeline,
    pub providers: ProviderStatus,
}

impl AppState {
    pub fn new(generator: Arc<dyn TextGen>, providers: ProviderStatus) -> Self {
        Self {
            pipeline: Pipeline::new(generator),
            providers,
        }
    }
}

/// Sanitized view of the provider configuration: which legs are configured
/// and which model the primary uses. Never exposes credentials.
#[derive(Debug, Clone, Serialize)]
pub struct ProviderStatus {
    pub model: String,
    pub primary_configured: bool,
    pub fallback_configured: bool,
}

impl ProviderStatus {
    pub fn from_config(config: &ProviderConfig) -> Self {
        Self {
            model: config.mistral_model.clone(),
            primary_configured: config.primary_configured(),
            fallback_configured: config.fallback_configured(),
        }
    }
}

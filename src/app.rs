//! Application state and service initialization
//!
//! Centralizes service construction and dependency injection so the
//! completion-provider client is built once per process and shared as an
//! immutable collaborator across requests.

use std::sync::Arc;

use crate::model::Config;
use crate::service::llm::CompletionBackend;
use crate::service::{AnalysisService, GroqClient};

/// Application state injected into request handlers
pub struct AppState {
    /// Message analysis service. `None` when the provider credential is not
    /// configured; `/analyze` then reports a configuration error.
    pub analysis: Option<AnalysisService>,
}

impl AppState {
    /// Initialize services from configuration.
    ///
    /// A missing provider credential is not fatal at startup; it is
    /// surfaced per request as a configuration error.
    pub fn new(config: &Config) -> Self {
        let analysis = match config.api_key.as_deref() {
            Some(api_key) => {
                let backend: Arc<dyn CompletionBackend> =
                    Arc::new(GroqClient::new(api_key, &config.provider));
                tracing::info!(
                    model = %config.provider.model,
                    base_url = %config.provider.base_url,
                    "Completion provider configured"
                );
                Some(AnalysisService::new(backend))
            }
            None => {
                tracing::warn!(
                    "GROQ_API_KEY is not set; /analyze will return a configuration error"
                );
                None
            }
        };

        Self { analysis }
    }
}

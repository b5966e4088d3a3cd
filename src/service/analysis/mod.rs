//! Message risk analysis service
//!
//! Sends the user's message to the completion provider and normalizes the
//! untrusted completion into a well-formed risk assessment. Provider
//! failures are absorbed into the fixed fallback assessment; the caller
//! always receives a complete, valid value.

use std::sync::Arc;

use crate::model::RiskAssessment;
use crate::service::llm::CompletionBackend;

pub mod normalize;
pub mod prompts;

use normalize::normalize_completion;
use prompts::ANALYSIS_SYSTEM_PROMPT;

/// Service for analyzing messages for scam risk
#[derive(Clone)]
pub struct AnalysisService {
    backend: Arc<dyn CompletionBackend>,
}

impl AnalysisService {
    /// Create a new analysis service over a completion backend
    pub fn new(backend: Arc<dyn CompletionBackend>) -> Self {
        Self { backend }
    }

    /// Analyze a message for scam risk.
    ///
    /// Single attempt, no retry: a provider failure (network, status,
    /// timeout) is logged and absorbed into the fallback assessment rather
    /// than surfaced to the caller.
    pub async fn analyze(&self, message: &str) -> RiskAssessment {
        let start_time = std::time::Instant::now();

        tracing::debug!(
            message_length = message.len(),
            "Initiating completion request for message analysis"
        );

        match self.backend.complete(ANALYSIS_SYSTEM_PROMPT, message).await {
            Ok(raw) => {
                let elapsed = start_time.elapsed();
                tracing::info!(
                    elapsed_ms = elapsed.as_millis(),
                    completion_length = raw.len(),
                    "Completion request finished"
                );
                normalize_completion(&raw)
            }
            Err(e) => {
                let elapsed = start_time.elapsed();
                tracing::error!(
                    elapsed_ms = elapsed.as_millis(),
                    error = %e,
                    "Completion request failed, using fallback assessment"
                );
                RiskAssessment::fallback()
            }
        }
    }
}

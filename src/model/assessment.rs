//! Risk assessment domain model

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Reasoning entry used when the provider call or the completion parse fails.
pub const FALLBACK_REASON: &str = "Unable to fully analyze message safely";

/// Recommended action used when no usable actions are available.
pub const FALLBACK_ACTION: &str = "Verify sender manually";

/// Risk score used when the provider supplies no usable numeric score.
pub const DEFAULT_RISK_SCORE: u8 = 50;

/// Qualitative risk level for a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Derive the level from a score using the canonical banding:
    /// Low = 0-30, Medium = 31-69, High = 70-100.
    pub fn for_score(score: u8) -> Self {
        if score >= 70 {
            RiskLevel::High
        } else if score >= 31 {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }

    /// Parse an exact level label.
    ///
    /// Anything other than "Low", "Medium" or "High" is rejected so the
    /// caller can re-derive the level from the score instead.
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Low" => Some(RiskLevel::Low),
            "Medium" => Some(RiskLevel::Medium),
            "High" => Some(RiskLevel::High),
            _ => None,
        }
    }
}

/// Scam-risk assessment for a single message
///
/// The invariants are enforced by the normalizer: the score is always within
/// [0, 100] and both `reasoning` and `actions` carry at least one entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RiskAssessment {
    /// Numeric risk score in [0, 100]
    pub risk_score: u8,
    /// Qualitative risk level
    pub risk_level: RiskLevel,
    /// Reasoning points explaining the score, never empty
    pub reasoning: Vec<String>,
    /// Recommended follow-up steps, never empty
    pub actions: Vec<String>,
}

impl RiskAssessment {
    /// Fixed assessment returned whenever the provider call or its output
    /// cannot produce a trustworthy result.
    pub fn fallback() -> Self {
        Self {
            risk_score: DEFAULT_RISK_SCORE,
            risk_level: RiskLevel::Medium,
            reasoning: vec![FALLBACK_REASON.to_string()],
            actions: vec![FALLBACK_ACTION.to_string()],
        }
    }
}

pub mod assessment;
pub mod config;

pub use assessment::{RiskAssessment, RiskLevel, DEFAULT_RISK_SCORE, FALLBACK_ACTION, FALLBACK_REASON};
pub use config::{Config, ProviderConfig};

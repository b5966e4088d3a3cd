//! Normalization of untrusted model completions
//!
//! Converts the raw completion text into a `RiskAssessment` that always
//! satisfies the domain invariants. The completion is untrusted input: it
//! may be empty, plain prose, JSON wrapped in markdown fences, or JSON with
//! missing or wrongly-typed fields. Normalization never fails; when nothing
//! usable can be recovered the fixed fallback assessment is returned.

use serde_json::Value;

use crate::model::{RiskAssessment, RiskLevel, DEFAULT_RISK_SCORE, FALLBACK_ACTION};

/// Reasoning entry used when the parsed payload yields no usable reasoning.
const NO_REASONING_FALLBACK: &str = "No reasoning provided.";

/// Outcome of the two-stage completion parse
#[derive(Debug)]
enum ParseOutcome {
    /// The completion parsed to a JSON value, possibly after fence stripping
    Parsed(Value),
    /// Neither the raw text nor the fence-stripped text is valid JSON
    Unparseable,
}

/// Normalize a raw completion into a valid assessment.
///
/// Parse stages:
/// 1. Strict JSON parse of the raw text as-is
/// 2. On failure, strip markdown code fences and retry
/// 3. On a second failure, return the fixed fallback assessment
///
/// A successfully parsed value goes through per-field coercion where each
/// field defaults individually; malformed fields never cause total fallback.
pub fn normalize_completion(raw: &str) -> RiskAssessment {
    match parse_completion(raw) {
        ParseOutcome::Parsed(Value::Null) => {
            tracing::warn!("Completion parsed to JSON null, using fallback assessment");
            RiskAssessment::fallback()
        }
        ParseOutcome::Parsed(value) => {
            tracing::debug!(parsed = %value, "Parsed completion payload");
            assessment_from_value(&value)
        }
        ParseOutcome::Unparseable => {
            tracing::warn!(
                completion_length = raw.len(),
                "Completion is not valid JSON, using fallback assessment"
            );
            RiskAssessment::fallback()
        }
    }
}

fn parse_completion(raw: &str) -> ParseOutcome {
    if let Ok(value) = serde_json::from_str::<Value>(raw) {
        return ParseOutcome::Parsed(value);
    }

    match serde_json::from_str::<Value>(&strip_code_fences(raw)) {
        Ok(value) => ParseOutcome::Parsed(value),
        Err(_) => ParseOutcome::Unparseable,
    }
}

/// Remove markdown code-fence markers anywhere in the text.
///
/// Strips "```" fences, consuming a "json" language tag (case-insensitive)
/// when one immediately follows, then trims surrounding whitespace.
fn strip_code_fences(raw: &str) -> String {
    let mut cleaned = String::with_capacity(raw.len());
    let mut rest = raw;

    while let Some(pos) = rest.find("```") {
        cleaned.push_str(&rest[..pos]);
        rest = &rest[pos + 3..];
        if rest
            .get(..4)
            .is_some_and(|tag| tag.eq_ignore_ascii_case("json"))
        {
            rest = &rest[4..];
        }
    }
    cleaned.push_str(rest);

    cleaned.trim().to_string()
}

/// Assemble an assessment from a parsed (but still untrusted) value
fn assessment_from_value(value: &Value) -> RiskAssessment {
    let risk_score = coerce_score(value.get("risk_score").or_else(|| value.get("riskScore")));
    let reasoning = coerce_reasoning(value.get("reasoning"));
    let actions = coerce_actions(value.get("actions"));
    let risk_level = coerce_level(
        value.get("risk_level").or_else(|| value.get("riskLevel")),
        risk_score,
    );

    RiskAssessment {
        risk_score,
        risk_level,
        reasoning,
        actions,
    }
}

/// Coerce the supplied score to an integer in [0, 100].
///
/// Numbers and base-10 numeric strings truncate toward zero; anything else
/// defaults to 50 before clamping.
fn coerce_score(value: Option<&Value>) -> u8 {
    let parsed = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    match parsed {
        Some(n) if n.is_finite() => n.trunc().clamp(0.0, 100.0) as u8,
        _ => DEFAULT_RISK_SCORE,
    }
}

/// Coerce reasoning to a non-empty sequence.
///
/// A single non-empty string is wrapped as a one-element sequence; a
/// sequence keeps its non-empty string elements in order; any other shape
/// yields the canned fallback entry.
fn coerce_reasoning(value: Option<&Value>) -> Vec<String> {
    let entries = match value {
        Some(Value::String(s)) if !s.trim().is_empty() => vec![s.trim().to_string()],
        Some(Value::Array(items)) => non_empty_strings(items),
        _ => Vec::new(),
    };

    if entries.is_empty() {
        vec![NO_REASONING_FALLBACK.to_string()]
    } else {
        entries
    }
}

/// Coerce actions to a non-empty sequence
fn coerce_actions(value: Option<&Value>) -> Vec<String> {
    let entries = match value {
        Some(Value::Array(items)) => non_empty_strings(items),
        _ => Vec::new(),
    };

    if entries.is_empty() {
        vec![FALLBACK_ACTION.to_string()]
    } else {
        entries
    }
}

/// Resolve the level: a valid supplied label is trusted as-is, anything
/// else is derived from the already-clamped score.
fn coerce_level(value: Option<&Value>, score: u8) -> RiskLevel {
    value
        .and_then(Value::as_str)
        .and_then(RiskLevel::from_label)
        .unwrap_or_else(|| RiskLevel::for_score(score))
}

fn non_empty_strings(items: &[Value]) -> Vec<String> {
    items
        .iter()
        .filter_map(|item| match item {
            Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
            _ => None,
        })
        .collect()
}

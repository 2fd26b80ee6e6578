//! Decision Types
//!
//! Core types for the risk decision engine. No logic, only data structures.

use serde::{Deserialize, Serialize};

// ============================================================================
// CLASSIFICATION LABEL
// ============================================================================

/// Binary classification outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Label {
    Benign,
    Phishing,
}

impl Label {
    pub fn as_str(&self) -> &'static str {
        match self {
            Label::Benign => "Benign",
            Label::Phishing => "Phishing",
        }
    }
}

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// VERDICT
// ============================================================================

/// Full decision for the scan endpoint: label, calibrated (or fixed
/// heuristic) confidence, 0-100 risk score and the tiered advisory message.
#[derive(Debug, Clone, Serialize)]
pub struct Verdict {
    pub label: Label,
    /// Max class probability on the model path, fixed constant on the
    /// heuristic path.
    pub confidence: f64,
    /// Probability mass assigned to the phishing class x 100, or the
    /// indicator fraction x 100 in heuristic mode.
    pub risk_score: f64,
    pub message: &'static str,
}

// ============================================================================
// PATTERN VERDICT
// ============================================================================

/// Reduced decision for the direct scan surface, which reports no risk score.
#[derive(Debug, Clone, Serialize)]
pub struct PatternVerdict {
    pub label: Label,
    pub confidence: f64,
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_serializes_to_display_form() {
        assert_eq!(serde_json::to_string(&Label::Phishing).unwrap(), "\"Phishing\"");
        assert_eq!(Label::Benign.to_string(), "Benign");
    }
}

//! Risk Decision Engine
//!
//! Turns a feature vector plus (optional) model output into a verdict. Two
//! paths per call, selected by Model Gateway availability: the model path
//! scores with the classifier, the heuristic path counts fixed risk signals.
//! A prediction-time failure never fails the request; it is logged and the
//! call degrades to the heuristic path.

use super::features::UrlFeatures;
use super::model::{ModelError, ModelGateway};
use super::rules::{
    HEURISTIC_BENIGN_CONFIDENCE, HEURISTIC_DOT_LIMIT, HEURISTIC_LONG_URL,
    HEURISTIC_PHISHING_CONFIDENCE, HEURISTIC_PHISHING_MIN, HEURISTIC_SIGNAL_COUNT, HIGH_RISK_MIN,
    MEDIUM_RISK_MIN, MSG_BENIGN, MSG_DEMO_MODE, MSG_HIGH_RISK, MSG_LOW_RISK, MSG_MEDIUM_RISK,
    PATTERN_BENIGN_CONFIDENCE, PATTERN_DOT_LIMIT, PATTERN_HYPHEN_LIMIT,
    PATTERN_PHISHING_CONFIDENCE, PATTERN_VERIFY_MIN_LEN, PHISHING_CLASS,
};
use super::types::{Label, PatternVerdict, Verdict};

// ============================================================================
// PRIMARY DECISION (scan endpoint)
// ============================================================================

/// Decide on a single URL's feature vector.
pub fn decide(features: &UrlFeatures, gateway: &ModelGateway) -> Verdict {
    match model_decision(features, gateway) {
        Ok(verdict) => verdict,
        Err(ModelError::NotLoaded) => {
            tracing::debug!("no model artifact held, using heuristic policy");
            heuristic_verdict(features)
        }
        Err(e) => {
            tracing::warn!("model prediction failed, falling back to heuristic: {e}");
            heuristic_verdict(features)
        }
    }
}

fn model_decision(
    features: &UrlFeatures,
    gateway: &ModelGateway,
) -> Result<Verdict, ModelError> {
    let matrix = [features.to_row()];
    let labels = gateway.predict(&matrix)?;
    let probabilities = gateway.predict_probability(&matrix)?;

    let label = labels
        .first()
        .copied()
        .ok_or_else(|| ModelError::Inference("empty label output".to_string()))?;
    let probabilities = probabilities
        .into_iter()
        .next()
        .ok_or_else(|| ModelError::Inference("empty probability output".to_string()))?;

    Ok(model_verdict(label, &probabilities))
}

/// Build a verdict from raw classifier output.
///
/// Confidence is the max class probability. The risk score is the phishing
/// class's probability mass scaled to 0-100; a degenerate single-entry
/// probability vector is reused as the phishing probability.
pub fn model_verdict(class: i64, probabilities: &[f32]) -> Verdict {
    let phishing_probability = probabilities
        .get(PHISHING_CLASS as usize)
        .or_else(|| probabilities.first())
        .copied()
        .unwrap_or(0.0) as f64;

    let confidence = probabilities.iter().fold(0.0f32, |acc, &p| acc.max(p)) as f64;
    let risk_score = phishing_probability * 100.0;

    let label = if class == PHISHING_CLASS {
        Label::Phishing
    } else {
        Label::Benign
    };

    let message = match label {
        Label::Phishing if risk_score >= HIGH_RISK_MIN => MSG_HIGH_RISK,
        Label::Phishing if risk_score >= MEDIUM_RISK_MIN => MSG_MEDIUM_RISK,
        Label::Phishing => MSG_LOW_RISK,
        Label::Benign => MSG_BENIGN,
    };

    Verdict {
        label,
        confidence,
        risk_score,
        message,
    }
}

/// No-model fallback: count six fixed binary risk signals.
pub fn heuristic_verdict(features: &UrlFeatures) -> Verdict {
    let mut indicators = 0u32;
    if features.has_at_symbol == 1 {
        indicators += 1;
    }
    if features.is_ip_address == 1 {
        indicators += 1;
    }
    if features.has_suspicious_tld == 1 {
        indicators += 1;
    }
    if features.has_phishing_keyword == 1 {
        indicators += 1;
    }
    if features.url_length > HEURISTIC_LONG_URL {
        indicators += 1;
    }
    if features.num_dots > HEURISTIC_DOT_LIMIT {
        indicators += 1;
    }

    let risk_score =
        ((indicators as f64 / HEURISTIC_SIGNAL_COUNT as f64) * 100.0).min(100.0);

    let (label, confidence) = if indicators >= HEURISTIC_PHISHING_MIN {
        (Label::Phishing, HEURISTIC_PHISHING_CONFIDENCE)
    } else {
        (Label::Benign, HEURISTIC_BENIGN_CONFIDENCE)
    };

    Verdict {
        label,
        confidence,
        risk_score,
        // The heuristic's score is not model-calibrated, so no tiering.
        message: MSG_DEMO_MODE,
    }
}

// ============================================================================
// DIRECT-SURFACE DECISION (pattern-scan policy)
// ============================================================================

/// Decide for the direct scan surface: model when available, otherwise the
/// pattern-scan rule set. A separate policy from `heuristic_verdict`; the two
/// gate the Phishing label on different signals and are never merged.
pub fn quick_decide(url: &str, features: &UrlFeatures, gateway: &ModelGateway) -> PatternVerdict {
    let matrix = [features.to_row()];
    let model_outcome = gateway
        .predict(&matrix)
        .and_then(|labels| Ok((labels, gateway.predict_probability(&matrix)?)));

    match model_outcome {
        Ok((labels, probabilities)) => {
            let class = labels.first().copied().unwrap_or(0);
            let confidence = probabilities
                .first()
                .map(|row| row.iter().fold(0.0f32, |acc, &p| acc.max(p)) as f64)
                .unwrap_or(0.0);
            let label = if class == PHISHING_CLASS {
                Label::Phishing
            } else {
                Label::Benign
            };
            PatternVerdict { label, confidence }
        }
        Err(ModelError::NotLoaded) => pattern_scan_verdict(url),
        Err(e) => {
            tracing::warn!("direct scan model prediction failed, using pattern rules: {e}");
            pattern_scan_verdict(url)
        }
    }
}

/// Fixed pattern rule set for the direct surface.
pub fn pattern_scan_verdict(url: &str) -> PatternVerdict {
    let lower = url.to_lowercase();

    let is_phishing = (lower.contains("secure-") && (url.contains(".tk") || url.contains(".ml")))
        || (lower.contains("verify") && url.chars().count() > PATTERN_VERIFY_MIN_LEN)
        || lower.contains("login.php")
        || (lower.contains("confirm") && url.matches('-').count() > PATTERN_HYPHEN_LIMIT)
        || url.matches('.').count() > PATTERN_DOT_LIMIT
        || url.contains('0')
        || url.contains('1');

    if is_phishing {
        PatternVerdict {
            label: Label::Phishing,
            confidence: PATTERN_PHISHING_CONFIDENCE,
        }
    } else {
        PatternVerdict {
            label: Label::Benign,
            confidence: PATTERN_BENIGN_CONFIDENCE,
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::features::extract;

    #[test]
    fn model_verdict_high_risk() {
        let verdict = model_verdict(1, &[0.1, 0.9]);
        assert_eq!(verdict.label, Label::Phishing);
        assert!((verdict.confidence - 0.9).abs() < 1e-6);
        assert!((verdict.risk_score - 90.0).abs() < 1e-4);
        assert_eq!(verdict.message, MSG_HIGH_RISK);
    }

    #[test]
    fn model_verdict_message_tiers() {
        assert_eq!(model_verdict(1, &[0.25, 0.75]).message, MSG_MEDIUM_RISK);
        assert_eq!(model_verdict(1, &[0.5, 0.5]).message, MSG_LOW_RISK);
        assert_eq!(model_verdict(0, &[0.95, 0.05]).message, MSG_BENIGN);
    }

    #[test]
    fn benign_message_ignores_score() {
        let verdict = model_verdict(0, &[0.02, 0.98]);
        assert_eq!(verdict.label, Label::Benign);
        assert_eq!(verdict.message, MSG_BENIGN);
    }

    #[test]
    fn single_entry_probability_is_reused_as_phishing_mass() {
        let verdict = model_verdict(1, &[0.8]);
        assert!((verdict.risk_score - 80.0).abs() < 1e-4);
        assert!((verdict.confidence - 0.8).abs() < 1e-6);
    }

    #[test]
    fn heuristic_flags_stacked_signals() {
        // IP literal + paypal/login/verify keywords + trailing .tk: three
        // indicators out of six.
        let features = extract("http://192.168.1.1/paypal-login-verify.tk");
        let verdict = heuristic_verdict(&features);
        assert_eq!(verdict.label, Label::Phishing);
        assert!((verdict.risk_score - 50.0).abs() < 1e-6);
        assert!((verdict.confidence - 0.75).abs() < 1e-9);
        assert_eq!(verdict.message, MSG_DEMO_MODE);
    }

    #[test]
    fn heuristic_passes_clean_url() {
        let verdict = heuristic_verdict(&extract("https://www.rust-lang.org/"));
        assert_eq!(verdict.label, Label::Benign);
        assert_eq!(verdict.risk_score, 0.0);
        assert!((verdict.confidence - 0.80).abs() < 1e-9);
    }

    #[test]
    fn decide_takes_heuristic_path_when_gateway_absent() {
        let gateway = ModelGateway::new();
        let verdict = decide(&extract("https://www.rust-lang.org/"), &gateway);
        assert_eq!(verdict.message, MSG_DEMO_MODE);
        assert_eq!(verdict.label, Label::Benign);
    }

    #[test]
    fn pattern_scan_hits_each_rule() {
        assert_eq!(
            pattern_scan_verdict("https://secure-update.tk/a").label,
            Label::Phishing
        );
        assert_eq!(
            pattern_scan_verdict("https://example.com/account/verify-your-details-now-please")
                .label,
            Label::Phishing
        );
        assert_eq!(
            pattern_scan_verdict("https://example.com/login.php").label,
            Label::Phishing
        );
        assert_eq!(
            pattern_scan_verdict("https://example.com/confirm-a-b-c-d").label,
            Label::Phishing
        );
        assert_eq!(
            pattern_scan_verdict("https://a.b.c.d.example.com/").label,
            Label::Phishing
        );
    }

    #[test]
    fn pattern_scan_passes_clean_url() {
        let verdict = pattern_scan_verdict("https://example.com/about");
        assert_eq!(verdict.label, Label::Benign);
        assert!((verdict.confidence - 0.92).abs() < 1e-9);
    }

    #[test]
    fn quick_decide_uses_pattern_rules_without_model() {
        let gateway = ModelGateway::new();
        let url = "https://example.com/login.php";
        let verdict = quick_decide(url, &extract(url), &gateway);
        assert_eq!(verdict.label, Label::Phishing);
        assert!((verdict.confidence - 0.85).abs() < 1e-9);
    }

    #[test]
    fn the_two_heuristic_policies_stay_distinct() {
        // login.php trips the pattern-scan rules but only counts as one
        // keyword signal for the primary heuristic.
        let url = "https://example.com/login.php";
        let primary = heuristic_verdict(&extract(url));
        let pattern = pattern_scan_verdict(url);
        assert_eq!(primary.label, Label::Benign);
        assert_eq!(pattern.label, Label::Phishing);
    }
}

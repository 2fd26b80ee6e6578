//! Risk Decision Rules & Thresholds
//!
//! Constants for the decision policies. No decision logic here, only the
//! numbers and word lists the policies are defined over.

// ============================================================================
// CLASS CODES
// ============================================================================

/// Class code the trained artifact assigns to phishing URLs.
pub const PHISHING_CLASS: i64 = 1;

// ============================================================================
// LEXICAL SIGNAL LISTS
// ============================================================================

/// Keywords whose presence anywhere in the lower-cased URL flags
/// `has_phishing_keyword`.
pub const PHISHING_KEYWORDS: &[&str] = &[
    "login", "signin", "account", "update", "confirm", "verify",
    "secure", "ebay", "paypal", "amazon", "bank", "apple",
];

/// High-risk suffixes, matched as a trailing substring of the whole URL.
pub const SUSPICIOUS_SUFFIXES: &[&str] = &[
    ".tk", ".ml", ".ga", ".cf", ".gq", ".xyz", ".top",
];

// ============================================================================
// MODEL-PATH MESSAGE TIERS
// ============================================================================

/// Phishing risk score at or above this = high-risk advisory.
pub const HIGH_RISK_MIN: f64 = 90.0;

/// Phishing risk score at or above this (below HIGH_RISK_MIN) = medium-risk.
pub const MEDIUM_RISK_MIN: f64 = 70.0;

pub const MSG_HIGH_RISK: &str =
    "HIGH RISK: This URL is highly likely to be a phishing attempt. Do not proceed.";
pub const MSG_MEDIUM_RISK: &str =
    "MEDIUM RISK: This URL shows signs of phishing. Proceed with caution.";
pub const MSG_LOW_RISK: &str =
    "LOW RISK: This URL may be suspicious. Verify before proceeding.";
pub const MSG_BENIGN: &str = "This URL appears to be legitimate.";
pub const MSG_DEMO_MODE: &str = "Demo mode prediction (model not trained yet)";

// ============================================================================
// PRIMARY HEURISTIC (no-model fallback for the scan endpoint)
// ============================================================================

/// Number of binary signals the primary heuristic evaluates.
pub const HEURISTIC_SIGNAL_COUNT: u32 = 6;

/// Indicator count at or above this = Phishing.
pub const HEURISTIC_PHISHING_MIN: u32 = 3;

/// URL length above this counts as one indicator.
pub const HEURISTIC_LONG_URL: u32 = 75;

/// Dot count above this counts as one indicator.
pub const HEURISTIC_DOT_LIMIT: u32 = 4;

/// Fixed confidences for the two outcomes. Deliberately not derived from the
/// indicator count; the heuristic's score is not calibrated.
pub const HEURISTIC_PHISHING_CONFIDENCE: f64 = 0.75;
pub const HEURISTIC_BENIGN_CONFIDENCE: f64 = 0.80;

// ============================================================================
// PATTERN-SCAN POLICY (direct scan surface, no-model fallback)
// ============================================================================
// Kept as an independent rule set; the two heuristics are invoked from
// different call paths with different expected outputs and must never be
// merged.

/// `verify` keyword only counts with a URL longer than this.
pub const PATTERN_VERIFY_MIN_LEN: usize = 50;

/// `confirm` keyword only counts with more hyphens than this.
pub const PATTERN_HYPHEN_LIMIT: usize = 3;

/// Dot count above this is a standalone pattern hit.
pub const PATTERN_DOT_LIMIT: usize = 3;

pub const PATTERN_PHISHING_CONFIDENCE: f64 = 0.85;
pub const PATTERN_BENIGN_CONFIDENCE: f64 = 0.92;

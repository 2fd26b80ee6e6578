//! Feature Layout - Centralized Feature Definition
//!
//! **CRITICAL: This file controls the feature schema**
//!
//! ## Rules (NEVER break these):
//! 1. Add feature → increment FEATURE_VERSION
//! 2. Change order → increment FEATURE_VERSION
//! 3. Remove or redefine feature → increment FEATURE_VERSION
//!
//! ## Why versioning matters:
//! - A trained artifact is only valid against the exact name list and order it
//!   was trained with. Any silent change produces silently wrong predictions.
//! - Log replay / training data compatibility
//! - Cross-version migrations

use crc32fast::Hasher;
use serde::{Deserialize, Serialize};

// ============================================================================
// FEATURE VERSION
// ============================================================================

/// Current feature layout version.
/// MUST be incremented when layout changes.
pub const FEATURE_VERSION: u8 = 1;

// ============================================================================
// FEATURE LAYOUT (Authoritative source)
// ============================================================================

/// Feature names in the exact order they appear in the vector.
/// This is the SINGLE SOURCE OF TRUTH for the feature schema, shared between
/// training (external pipeline) and inference.
pub const FEATURE_LAYOUT: &[&str] = &[
    // === Length (0-1) ===
    "url_length",                  // 0: Total character length of the URL
    "domain_length",               // 1: Character length of the authority

    // === Protocol (2-3) ===
    "has_https",                   // 2: URL starts with https://
    "has_http",                    // 3: URL starts with http://

    // === Character counts (4-12) ===
    "num_dots",                    // 4
    "num_hyphens",                 // 5
    "num_underscores",             // 6
    "num_slashes",                 // 7
    "num_question_marks",          // 8
    "num_equal_signs",             // 9
    "num_at_symbols",              // 10
    "num_ampersands",              // 11
    "num_percent_signs",           // 12

    // === Suspicious patterns (13-14) ===
    "has_at_symbol",               // 13: @ present anywhere
    "has_double_slash_redirect",   // 14: more than one // occurrence

    // === Digits (15-16) ===
    "num_digits",                  // 15: Count of decimal digit characters
    "digit_ratio",                 // 16: num_digits / url_length

    // === Structural (17-27) ===
    "subdomain_length",            // 17
    "has_subdomain",               // 18
    "num_subdomains",              // 19: Subdomain segment count
    "path_length",                 // 20
    "num_path_tokens",             // 21: Path segments, empty path counts 1
    "has_query_params",            // 22
    "num_query_params",            // 23
    "is_ip_address",               // 24: Four-dotted-decimal host
    "has_port",                    // 25: Colon in authority, non-IP host only
    "tld_length",                  // 26: Suffix character length
    "has_suspicious_tld",          // 27: URL ends in a high-risk suffix

    // === Content (28-29) ===
    "has_phishing_keyword",        // 28: Known phishing keyword substring
    "url_entropy",                 // 29: Shannon entropy of the URL string
];

/// Total number of features.
/// IMPORTANT: Must match FEATURE_LAYOUT.len()!
pub const FEATURE_COUNT: usize = 30;

// ============================================================================
// LAYOUT HASH
// ============================================================================

/// Compute CRC32 hash of the feature layout.
/// Used to detect layout mismatches between a trained artifact and this build.
pub fn layout_hash() -> u32 {
    let mut hasher = Hasher::new();

    hasher.update(&[FEATURE_VERSION]);

    for name in FEATURE_LAYOUT {
        hasher.update(name.as_bytes());
        hasher.update(&[0]); // Separator
    }

    hasher.finalize()
}

// ============================================================================
// LAYOUT INFO
// ============================================================================

/// Complete layout information for serialization/logging.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutInfo {
    pub version: u8,
    pub hash: u32,
    pub feature_count: usize,
    pub feature_names: Vec<String>,
}

impl LayoutInfo {
    pub fn current() -> Self {
        Self {
            version: FEATURE_VERSION,
            hash: layout_hash(),
            feature_count: FEATURE_COUNT,
            feature_names: FEATURE_LAYOUT.iter().map(|s| s.to_string()).collect(),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

//! URL Feature Extractor
//!
//! Pure transformation from a raw URL string to the fixed 30-feature vector
//! defined by `layout::FEATURE_LAYOUT`. Total over arbitrary input: features
//! derived from the literal string are always computed, and a structural
//! decomposition failure degrades the eleven structural features to zero
//! instead of propagating.

use std::collections::HashMap;

use serde::Serialize;

use super::layout::FEATURE_COUNT;
use super::rules::{PHISHING_KEYWORDS, SUSPICIOUS_SUFFIXES};
use super::urlparts::{self, UrlParts};

// ============================================================================
// FEATURE VECTOR
// ============================================================================

/// One extracted feature vector. Field order IS the schema order; the
/// serialized snapshot and `to_row` both follow `FEATURE_LAYOUT`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UrlFeatures {
    pub url_length: u32,
    pub domain_length: u32,
    pub has_https: u32,
    pub has_http: u32,
    pub num_dots: u32,
    pub num_hyphens: u32,
    pub num_underscores: u32,
    pub num_slashes: u32,
    pub num_question_marks: u32,
    pub num_equal_signs: u32,
    pub num_at_symbols: u32,
    pub num_ampersands: u32,
    pub num_percent_signs: u32,
    pub has_at_symbol: u32,
    pub has_double_slash_redirect: u32,
    pub num_digits: u32,
    pub digit_ratio: f64,
    pub subdomain_length: u32,
    pub has_subdomain: u32,
    pub num_subdomains: u32,
    pub path_length: u32,
    pub num_path_tokens: u32,
    pub has_query_params: u32,
    pub num_query_params: u32,
    pub is_ip_address: u32,
    pub has_port: u32,
    pub tld_length: u32,
    pub has_suspicious_tld: u32,
    pub has_phishing_keyword: u32,
    pub url_entropy: f64,
}

impl UrlFeatures {
    /// Numeric row in schema order, ready for the model input matrix.
    pub fn to_row(&self) -> [f32; FEATURE_COUNT] {
        [
            self.url_length as f32,
            self.domain_length as f32,
            self.has_https as f32,
            self.has_http as f32,
            self.num_dots as f32,
            self.num_hyphens as f32,
            self.num_underscores as f32,
            self.num_slashes as f32,
            self.num_question_marks as f32,
            self.num_equal_signs as f32,
            self.num_at_symbols as f32,
            self.num_ampersands as f32,
            self.num_percent_signs as f32,
            self.has_at_symbol as f32,
            self.has_double_slash_redirect as f32,
            self.num_digits as f32,
            self.digit_ratio as f32,
            self.subdomain_length as f32,
            self.has_subdomain as f32,
            self.num_subdomains as f32,
            self.path_length as f32,
            self.num_path_tokens as f32,
            self.has_query_params as f32,
            self.num_query_params as f32,
            self.is_ip_address as f32,
            self.has_port as f32,
            self.tld_length as f32,
            self.has_suspicious_tld as f32,
            self.has_phishing_keyword as f32,
            self.url_entropy as f32,
        ]
    }

    /// Named lookup against the schema, used to keep `to_row` and
    /// `FEATURE_LAYOUT` provably in sync.
    pub fn get(&self, name: &str) -> Option<f64> {
        let value = match name {
            "url_length" => self.url_length as f64,
            "domain_length" => self.domain_length as f64,
            "has_https" => self.has_https as f64,
            "has_http" => self.has_http as f64,
            "num_dots" => self.num_dots as f64,
            "num_hyphens" => self.num_hyphens as f64,
            "num_underscores" => self.num_underscores as f64,
            "num_slashes" => self.num_slashes as f64,
            "num_question_marks" => self.num_question_marks as f64,
            "num_equal_signs" => self.num_equal_signs as f64,
            "num_at_symbols" => self.num_at_symbols as f64,
            "num_ampersands" => self.num_ampersands as f64,
            "num_percent_signs" => self.num_percent_signs as f64,
            "has_at_symbol" => self.has_at_symbol as f64,
            "has_double_slash_redirect" => self.has_double_slash_redirect as f64,
            "num_digits" => self.num_digits as f64,
            "digit_ratio" => self.digit_ratio,
            "subdomain_length" => self.subdomain_length as f64,
            "has_subdomain" => self.has_subdomain as f64,
            "num_subdomains" => self.num_subdomains as f64,
            "path_length" => self.path_length as f64,
            "num_path_tokens" => self.num_path_tokens as f64,
            "has_query_params" => self.has_query_params as f64,
            "num_query_params" => self.num_query_params as f64,
            "is_ip_address" => self.is_ip_address as f64,
            "has_port" => self.has_port as f64,
            "tld_length" => self.tld_length as f64,
            "has_suspicious_tld" => self.has_suspicious_tld as f64,
            "has_phishing_keyword" => self.has_phishing_keyword as f64,
            "url_entropy" => self.url_entropy,
            _ => return None,
        };
        Some(value)
    }
}

// ============================================================================
// EXTRACTION
// ============================================================================

/// Extract the full feature vector from a URL string.
pub fn extract(url: &str) -> UrlFeatures {
    let url_length = url.chars().count() as u32;
    let lower = url.to_lowercase();

    let num_digits = url.chars().filter(|c| c.is_ascii_digit()).count() as u32;
    let digit_ratio = if url_length > 0 {
        num_digits as f64 / url_length as f64
    } else {
        0.0
    };

    let mut features = UrlFeatures {
        url_length,
        has_https: flag(url.starts_with("https://")),
        has_http: flag(url.starts_with("http://")),
        num_dots: count_char(url, '.'),
        num_hyphens: count_char(url, '-'),
        num_underscores: count_char(url, '_'),
        num_slashes: count_char(url, '/'),
        num_question_marks: count_char(url, '?'),
        num_equal_signs: count_char(url, '='),
        num_at_symbols: count_char(url, '@'),
        num_ampersands: count_char(url, '&'),
        num_percent_signs: count_char(url, '%'),
        has_at_symbol: flag(url.contains('@')),
        has_double_slash_redirect: flag(url.matches("//").count() > 1),
        num_digits,
        digit_ratio,
        has_phishing_keyword: flag(PHISHING_KEYWORDS.iter().any(|k| lower.contains(k))),
        url_entropy: shannon_entropy(url),
        ..UrlFeatures::default()
    };

    if let Some(parts) = urlparts::split(url) {
        apply_structural(&mut features, &parts, url);
    }
    // On decomposition failure every structural field keeps its zero default.

    features
}

fn apply_structural(features: &mut UrlFeatures, parts: &UrlParts, url: &str) {
    let domain = urlparts::domain_parts(&parts.authority);

    features.domain_length = parts.authority.chars().count() as u32;

    features.subdomain_length = domain.subdomain.chars().count() as u32;
    features.has_subdomain = flag(!domain.subdomain.is_empty());
    features.num_subdomains = if domain.subdomain.is_empty() {
        0
    } else {
        domain.subdomain.split('.').count() as u32
    };

    features.path_length = parts.path.chars().count() as u32;
    features.num_path_tokens = parts.path.split('/').count() as u32;

    features.has_query_params = flag(!parts.query.is_empty());
    features.num_query_params = if parts.query.is_empty() {
        0
    } else {
        parts.query.split('&').count() as u32
    };

    features.is_ip_address = flag(urlparts::is_ip_literal(&parts.authority));
    // Ordering matters: a colon on an IP-literal host is its port, not a
    // separate signal.
    features.has_port = flag(parts.authority.contains(':') && features.is_ip_address == 0);

    features.tld_length = domain.suffix.chars().count() as u32;
    features.has_suspicious_tld =
        flag(SUSPICIOUS_SUFFIXES.iter().any(|suffix| url.ends_with(suffix)));
}

fn flag(condition: bool) -> u32 {
    condition as u32
}

fn count_char(s: &str, c: char) -> u32 {
    s.matches(c).count() as u32
}

/// Shannon entropy in bits over the character frequency distribution.
pub fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, u32> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    let length = s.chars().count() as f64;
    let mut entropy = 0.0;
    for &count in freq.values() {
        let probability = count as f64 / length;
        entropy -= probability * probability.log2();
    }
    // A single repeated character yields -0.0.
    entropy + 0.0
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::layout::FEATURE_LAYOUT;

    #[test]
    fn every_layout_name_resolves_and_matches_row() {
        let features = extract("https://user@mail.example.co.uk:8443/a/b?x=1&y=2%20#frag");
        let row = features.to_row();
        for (index, name) in FEATURE_LAYOUT.iter().enumerate() {
            let named = features
                .get(name)
                .unwrap_or_else(|| panic!("unknown feature name {name}"));
            assert!(
                (row[index] as f64 - named).abs() < 1e-6,
                "row[{index}] diverges from {name}"
            );
        }
    }

    #[test]
    fn empty_string_is_all_defaults_except_path_tokens() {
        let features = extract("");
        assert_eq!(features.url_length, 0);
        assert_eq!(features.digit_ratio, 0.0);
        assert_eq!(features.url_entropy, 0.0);
        // An empty path still splits into one (empty) token.
        assert_eq!(features.num_path_tokens, 1);
        assert_eq!(features.is_ip_address, 0);
        assert_eq!(features.has_suspicious_tld, 0);
    }

    #[test]
    fn protocol_flags_are_mutually_exclusive() {
        for url in ["https://a.com", "http://a.com", "ftp://a.com", "a.com", ""] {
            let features = extract(url);
            assert!(features.has_https + features.has_http <= 1, "url: {url}");
        }
        assert_eq!(extract("https://a.com").has_https, 1);
        assert_eq!(extract("http://a.com").has_http, 1);
    }

    #[test]
    fn character_counts() {
        let features = extract("http://a.b-c.com/p_q/r?x=1&y=2%20@z");
        assert_eq!(features.num_dots, 2);
        assert_eq!(features.num_hyphens, 1);
        assert_eq!(features.num_underscores, 1);
        assert_eq!(features.num_slashes, 4);
        assert_eq!(features.num_question_marks, 1);
        assert_eq!(features.num_equal_signs, 2);
        assert_eq!(features.num_ampersands, 1);
        assert_eq!(features.num_percent_signs, 1);
        assert_eq!(features.num_at_symbols, 1);
        assert_eq!(features.has_at_symbol, 1);
    }

    #[test]
    fn double_slash_redirect_needs_a_second_occurrence() {
        assert_eq!(extract("https://example.com/a").has_double_slash_redirect, 0);
        assert_eq!(extract("https://example.com//redirect").has_double_slash_redirect, 1);
    }

    #[test]
    fn digit_ratio_stays_in_unit_interval() {
        for url in ["", "abc", "1234", "http://192.168.1.1/x9"] {
            let ratio = extract(url).digit_ratio;
            assert!((0.0..=1.0).contains(&ratio), "url: {url}");
        }
        assert_eq!(extract("abc").digit_ratio, 0.0);
        assert_eq!(extract("1111").digit_ratio, 1.0);
    }

    #[test]
    fn ip_detection_is_pattern_only() {
        assert_eq!(extract("http://192.168.1.1/admin").is_ip_address, 1);
        assert_eq!(extract("http://example.com/admin").is_ip_address, 0);
        // Octet ranges are deliberately unchecked.
        assert_eq!(extract("http://999.999.999.999/").is_ip_address, 1);
    }

    #[test]
    fn port_flag_excludes_ip_hosts() {
        assert_eq!(extract("http://192.168.1.1:8080/").has_port, 0);
        assert_eq!(extract("http://example.com:8080/").has_port, 1);
        assert_eq!(extract("http://example.com/").has_port, 0);
    }

    #[test]
    fn suspicious_suffix_is_a_trailing_match_on_the_whole_url() {
        assert_eq!(extract("http://free-prizes.tk").has_suspicious_tld, 1);
        assert_eq!(extract("http://example.com").has_suspicious_tld, 0);
        // Trailing path text triggers the check too; the match is not limited
        // to the extracted suffix field.
        assert_eq!(extract("http://example.com/download.xyz").has_suspicious_tld, 1);
    }

    #[test]
    fn keyword_match_is_case_insensitive() {
        assert_eq!(extract("https://www.PayPal-support.com").has_phishing_keyword, 1);
        assert_eq!(extract("https://docs.rs/crates").has_phishing_keyword, 0);
    }

    #[test]
    fn subdomain_features() {
        let features = extract("https://a.b.example.com/");
        assert_eq!(features.subdomain_length, 3);
        assert_eq!(features.has_subdomain, 1);
        assert_eq!(features.num_subdomains, 2);

        let bare = extract("https://example.com/");
        assert_eq!(bare.has_subdomain, 0);
        assert_eq!(bare.num_subdomains, 0);
    }

    #[test]
    fn path_and_query_features() {
        let features = extract("https://example.com/a/b/c?x=1&y=2&z=3");
        assert_eq!(features.path_length, 6);
        assert_eq!(features.num_path_tokens, 4);
        assert_eq!(features.has_query_params, 1);
        assert_eq!(features.num_query_params, 3);

        let bare = extract("https://example.com");
        assert_eq!(bare.path_length, 0);
        assert_eq!(bare.num_path_tokens, 1);
        assert_eq!(bare.has_query_params, 0);
        assert_eq!(bare.num_query_params, 0);
    }

    #[test]
    fn malformed_authority_zeroes_structural_features_only() {
        let features = extract("http://[::1/path");
        assert_eq!(features.domain_length, 0);
        assert_eq!(features.path_length, 0);
        assert_eq!(features.num_path_tokens, 0);
        assert_eq!(features.is_ip_address, 0);
        // Raw-string features are still live.
        assert!(features.url_length > 0);
        assert!(features.url_entropy > 0.0);
        assert_eq!(features.num_slashes, 3);
    }

    #[test]
    fn entropy_properties() {
        assert_eq!(shannon_entropy(""), 0.0);
        assert_eq!(shannon_entropy("aaaa"), 0.0);
        // Four uniformly distributed distinct characters: log2(4) bits.
        assert!((shannon_entropy("abcd") - 2.0).abs() < 1e-9);
        assert!(shannon_entropy("abab") < shannon_entropy("abcd"));
    }

    #[test]
    fn tld_length_counts_multi_label_suffixes() {
        assert_eq!(extract("https://mail.example.co.uk/").tld_length, 5);
        assert_eq!(extract("https://example.com/").tld_length, 3);
    }
}

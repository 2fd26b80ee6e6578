//! URL structural decomposition
//!
//! Splits a raw URL string into scheme/authority/path/query and the authority
//! into subdomain/domain/suffix. Deliberately lax: the host is never validated
//! beyond shape (a four-dotted host like `999.999.999.999` still counts as an
//! IP literal), default ports are not normalized away, and an empty path stays
//! empty instead of becoming `/`. Trained artifacts depend on these exact
//! values, so a stricter general-purpose URL parser cannot be substituted.

use once_cell::sync::Lazy;
use regex::Regex;

/// Four dotted decimal groups, 1-3 digits each. Octet ranges are intentionally
/// NOT bounded to 0-255; tightening this changes feature values and
/// invalidates every previously trained artifact.
static IP_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3}$").expect("static ip pattern"));

/// Suffixes that are registered under a second-level label. Compact stand-in
/// for the public suffix list, covering the registries that actually show up
/// in URL corpora.
const MULTI_LABEL_SUFFIXES: &[&str] = &[
    "co.uk", "org.uk", "ac.uk", "gov.uk", "me.uk", "net.uk",
    "co.jp", "ne.jp", "or.jp", "ac.jp",
    "com.au", "net.au", "org.au", "edu.au", "gov.au",
    "co.nz", "net.nz", "org.nz",
    "com.br", "net.br", "org.br", "gov.br",
    "co.in", "net.in", "org.in",
    "co.za", "co.kr", "co.id",
    "com.cn", "net.cn", "org.cn",
    "com.mx", "com.ar", "com.tr", "com.sg", "com.hk", "com.tw",
    "com.my", "com.ph", "com.vn",
];

/// scheme-stripped, fragment-stripped decomposition of a URL string
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UrlParts {
    /// host[:port] component, possibly with userinfo
    pub authority: String,
    pub path: String,
    pub query: String,
}

/// subdomain / registrable domain / suffix split of a host
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DomainParts {
    pub subdomain: String,
    pub domain: String,
    pub suffix: String,
}

/// Split a URL string into authority/path/query.
///
/// Returns `None` only when the authority carries a mismatched `[`/`]` pair,
/// the one malformed shape the decomposition refuses to interpret. Callers
/// substitute zero-valued structural features in that case.
pub fn split(url: &str) -> Option<UrlParts> {
    // Fragment never contributes to any feature.
    let rest = match url.find('#') {
        Some(pos) => &url[..pos],
        None => url,
    };

    // Strip "scheme:" when the prefix is a well-formed scheme name.
    let rest = match rest.find(':') {
        Some(pos) if is_scheme(&rest[..pos]) => &rest[pos + 1..],
        _ => rest,
    };

    // Authority is only present after a literal "//".
    let (authority, rest) = if let Some(after) = rest.strip_prefix("//") {
        let end = after.find(['/', '?']).unwrap_or(after.len());
        (&after[..end], &after[end..])
    } else {
        ("", rest)
    };

    if authority.contains('[') != authority.contains(']') {
        return None;
    }

    let (path, query) = match rest.find('?') {
        Some(pos) => (&rest[..pos], &rest[pos + 1..]),
        None => (rest, ""),
    };

    Some(UrlParts {
        authority: authority.to_string(),
        path: path.to_string(),
        query: query.to_string(),
    })
}

fn is_scheme(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

/// True when the host portion of the authority (before any port, userinfo
/// included) matches the lax dotted-decimal pattern.
pub fn is_ip_literal(authority: &str) -> bool {
    let before_port = authority.split(':').next().unwrap_or("");
    IP_PATTERN.is_match(before_port)
}

/// Decompose the authority's host into subdomain/domain/suffix.
///
/// IP-literal hosts have no suffix and no subdomain. Unknown single-label
/// hosts become the domain.
pub fn domain_parts(authority: &str) -> DomainParts {
    let host = authority
        .rsplit('@')
        .next()
        .unwrap_or("")
        .split(':')
        .next()
        .unwrap_or("")
        .trim_end_matches('.');

    if host.is_empty() {
        return DomainParts::default();
    }

    if IP_PATTERN.is_match(host) {
        return DomainParts {
            domain: host.to_string(),
            ..DomainParts::default()
        };
    }

    let labels: Vec<&str> = host.split('.').collect();

    if labels.len() >= 2 {
        let tail2 = labels[labels.len() - 2..].join(".").to_lowercase();
        if MULTI_LABEL_SUFFIXES.contains(&tail2.as_str()) {
            let n = labels.len();
            if n == 2 {
                // The whole host is a suffix, e.g. "co.uk".
                return DomainParts {
                    suffix: labels[n - 2..].join("."),
                    ..DomainParts::default()
                };
            }
            return DomainParts {
                subdomain: labels[..n - 3].join("."),
                domain: labels[n - 3].to_string(),
                suffix: labels[n - 2..].join("."),
            };
        }
    }

    match labels.len() {
        1 => DomainParts {
            domain: labels[0].to_string(),
            ..DomainParts::default()
        },
        n => DomainParts {
            subdomain: labels[..n - 2].join("."),
            domain: labels[n - 2].to_string(),
            suffix: labels[n - 1].to_string(),
        },
    }
}

// ============================================================================
// TESTS
// ============================================================================

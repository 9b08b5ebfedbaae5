//! URL classification and name extraction
//!
//! Decides whether loosely-written configuration values refer to a network
//! resource, normalizes them, and pulls a human-readable name out of the
//! hostname.

use once_cell::sync::Lazy;
use regex::Regex;

/// Scheme prepended by [`normalize`] when the string has none.
pub const DEFAULT_SCHEME: &str = "https";

/// Generic second-level components under country-code TLDs where the real
/// name sits one label further left (example.co.uk → example).
const GENERIC_SECOND_LEVELS: [&str; 5] = ["co", "com", "org", "net", "ac"];

/// Git remote shorthand: user@host:path.git
static GIT_REMOTE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^git@[A-Za-z0-9][-A-Za-z0-9.]+\.[A-Za-z]{2,}:[A-Za-z0-9/_.-]+\.git$")
        .expect("valid regex")
});

/// Generic URL: optional scheme, hostname-with-TLD or dotted-quad IPv4,
/// optional port, path, query, and fragment.
static URL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?x)^
        (?:(?:https?|ftp|sftp|ftps|ssh|git|ws|wss)://)?
        (?:[A-Za-z0-9][-A-Za-z0-9.]+\.[A-Za-z]{2,}|\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3})
        (?::[0-9]+)?
        (?:/[-A-Za-z0-9%_.~\#+]*)*
        (?:\?[-A-Za-z0-9%_&=.~\#+]*)?
        (?:\#[-A-Za-z0-9%_&=.~\#+/]*)?
        $",
    )
    .expect("valid regex")
});

static SCHEME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9+.-]*://").expect("valid regex"));

static HOST_PREFIX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:[A-Za-z][A-Za-z0-9+.-]*://)?(?:www\.)?").expect("valid regex"));

static IPV4_PREFIX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3}").expect("valid regex"));

/// Check whether a string looks like a URL or a git remote shorthand.
pub fn is_url_like(s: &str) -> bool {
    GIT_REMOTE_RE.is_match(s) || URL_RE.is_match(s)
}

/// Normalize a URL-like string by prepending [`DEFAULT_SCHEME`] when no
/// scheme is present. Git remotes and strings that already carry a scheme
/// are returned unchanged. Returns `None` for non-URL-like input.
pub fn normalize(s: &str) -> Option<String> {
    normalize_with_scheme(s, DEFAULT_SCHEME)
}

/// [`normalize`] with a caller-chosen default scheme.
pub fn normalize_with_scheme(s: &str, default_scheme: &str) -> Option<String> {
    if !is_url_like(s) {
        return None;
    }
    if s.starts_with("git@") || SCHEME_RE.is_match(s) {
        return Some(s.to_string());
    }
    Some(format!("{}://{}", default_scheme, s))
}

/// Heuristically extract a display name from a URL's hostname.
///
/// Strips the scheme and a leading `www.`, truncates at the first path,
/// port, query, or fragment delimiter, and picks the second-to-last label
/// (third-to-last under generic country-code second levels). Dotted-quad
/// hosts collapse to the literal `"IP Address"`.
pub fn extract_name(s: &str) -> Option<String> {
    if !is_url_like(s) {
        return None;
    }

    let stripped = HOST_PREFIX_RE.replace(s, "");
    if IPV4_PREFIX_RE.is_match(&stripped) {
        return Some("IP Address".to_string());
    }

    let host = stripped
        .split(['/', ':', '?', '#'])
        .next()
        .unwrap_or_default();
    let labels: Vec<&str> = host.split('.').collect();
    if labels.len() < 2 {
        return None;
    }

    let second_to_last = labels[labels.len() - 2];
    if labels.len() >= 3 && GENERIC_SECOND_LEVELS.contains(&second_to_last) {
        return Some(labels[labels.len() - 3].to_string());
    }
    Some(second_to_last.to_string())
}

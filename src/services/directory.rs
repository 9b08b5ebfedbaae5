//! Static provider directory
//!
//! An ordered snapshot of known providers loaded once from YAML. Supports
//! lookup by slug/alias and matching a URL against per-provider patterns.
//! Declaration order is significant: when several entries could match, the
//! first one wins.

use regex::{Regex, RegexBuilder};
use serde::Deserialize;
use serde_yaml::Value;
use std::fs;
use std::path::Path;
use tracing::warn;

use crate::services::url_classifier;

/// Bundled directory snapshot, compiled into the binary.
const BUNDLED_SOURCE: &str = include_str!("../../data/providers.yml");

/// One known provider.
#[derive(Debug, Clone)]
pub struct ProviderEntry {
    /// Unique slug, the directory's primary key.
    pub key: String,
    /// Canonical display name.
    pub name: String,
    /// Canonical/default URL, if known.
    pub url: Option<String>,
    /// Reference image, if known.
    pub image_url: Option<String>,
    /// Alternate slugs, lowercased.
    aliases: Vec<String>,
    /// Case-insensitive pattern matched against normalized URLs.
    pattern: Option<Regex>,
}

/// Raw YAML shape of a directory entry.
#[derive(Deserialize)]
struct RawEntry {
    name: String,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    url_pattern: Option<String>,
    /// Comma-delimited in the source.
    #[serde(default)]
    aliases: Option<String>,
    #[serde(default)]
    image_url: Option<String>,
}

/// Ordered, read-only collection of provider entries.
#[derive(Debug, Clone, Default)]
pub struct ProviderDirectory {
    entries: Vec<ProviderEntry>,
}

impl ProviderDirectory {
    /// Directory built from the bundled snapshot.
    pub fn bundled() -> Self {
        Self::from_source(BUNDLED_SOURCE)
    }

    /// Empty directory; every lookup and match misses.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load a directory from a YAML file. A missing or malformed file
    /// degrades to an empty directory rather than failing the caller.
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(source) => Self::from_source(&source),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to read provider directory");
                Self::default()
            }
        }
    }

    /// Load a directory from YAML source. Malformed top-level structure
    /// degrades to an empty directory; a malformed entry is dropped and a
    /// bad `url_pattern` only disables matching for that entry.
    pub fn from_source(source: &str) -> Self {
        let raw: serde_yaml::Mapping = match serde_yaml::from_str(source) {
            Ok(m) => m,
            Err(e) => {
                warn!(error = %e, "malformed provider directory source, using empty directory");
                return Self::default();
            }
        };

        let mut entries = Vec::with_capacity(raw.len());
        for (key, value) in raw {
            let key = match key {
                Value::String(k) => k,
                other => {
                    warn!(key = ?other, "skipping provider entry with non-string key");
                    continue;
                }
            };
            let raw_entry: RawEntry = match serde_yaml::from_value(value) {
                Ok(e) => e,
                Err(e) => {
                    warn!(key = %key, error = %e, "skipping malformed provider entry");
                    continue;
                }
            };

            let pattern = raw_entry.url_pattern.as_deref().and_then(|p| {
                RegexBuilder::new(p)
                    .case_insensitive(true)
                    .build()
                    .map_err(|e| {
                        warn!(key = %key, error = %e, "invalid url_pattern, entry will not match URLs");
                    })
                    .ok()
            });

            let aliases = raw_entry
                .aliases
                .as_deref()
                .unwrap_or_default()
                .split(',')
                .map(|a| a.trim().to_lowercase())
                .filter(|a| !a.is_empty())
                .collect();

            entries.push(ProviderEntry {
                key,
                name: raw_entry.name,
                url: raw_entry.url,
                image_url: raw_entry.image_url,
                aliases,
                pattern,
            });
        }

        Self { entries }
    }

    /// Look up a provider by slug or alias, case-insensitively. Key matches
    /// take precedence over alias matches; among alias matches the first
    /// entry in declaration order wins.
    pub fn lookup(&self, slug: &str) -> Option<&ProviderEntry> {
        let slug = slug.trim().to_lowercase();
        if slug.is_empty() {
            return None;
        }
        self.entries
            .iter()
            .find(|e| e.key == slug)
            .or_else(|| self.entries.iter().find(|e| e.aliases.contains(&slug)))
    }

    /// Find the first entry in declaration order whose `url_pattern` matches
    /// the normalized URL. Returns `None` for non-URL-like input.
    pub fn match_url(&self, url: &str) -> Option<&ProviderEntry> {
        let normalized = url_classifier::normalize(url)?;
        self.entries
            .iter()
            .find(|e| e.pattern.as_ref().is_some_and(|p| p.is_match(&normalized)))
    }

    /// All entries in declaration order.
    pub fn entries(&self) -> &[ProviderEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ProviderDirectory {
        ProviderDirectory::from_source(
            r#"
namecheap:
  name: Namecheap
  url: https://namecheap.com
  url_pattern: 'namecheap\.com'
  aliases: name-cheap, nc
godaddy:
  name: GoDaddy
  url: https://godaddy.com
  url_pattern: 'godaddy\.com'
  image_url: https://godaddy.com/favicon.ico
broadmatch:
  name: Broad
  url_pattern: 'example\.'
narrowmatch:
  name: Narrow
  url_pattern: 'example\.com'
"#,
        )
    }

    // ========== loading ==========

    #[test]
    fn test_load_preserves_declaration_order() {
        let dir = sample();
        let keys: Vec<&str> = dir.entries().iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, ["namecheap", "godaddy", "broadmatch", "narrowmatch"]);
    }

    #[test]
    fn test_malformed_source_degrades_to_empty() {
        let dir = ProviderDirectory::from_source(": not [ valid yaml");
        assert!(dir.is_empty());
    }

    #[test]
    fn test_non_mapping_source_degrades_to_empty() {
        let dir = ProviderDirectory::from_source("- a\n- b\n");
        assert!(dir.is_empty());
    }

    #[test]
    fn test_entry_missing_name_is_skipped() {
        let dir = ProviderDirectory::from_source("broken:\n  url: https://x.com\nok:\n  name: Ok\n");
        assert_eq!(dir.len(), 1);
        assert_eq!(dir.entries()[0].key, "ok");
    }

    #[test]
    fn test_invalid_pattern_disables_matching_only() {
        let dir = ProviderDirectory::from_source("p:\n  name: P\n  url_pattern: '['\n");
        assert_eq!(dir.len(), 1);
        assert!(dir.lookup("p").is_some());
        assert!(dir.match_url("https://p.com").is_none());
    }

    #[test]
    fn test_missing_file_degrades_to_empty() {
        let dir = ProviderDirectory::from_path("/nonexistent/providers.yml");
        assert!(dir.is_empty());
    }

    // ========== lookup ==========

    #[test]
    fn test_lookup_by_key() {
        let dir = sample();
        let entry = dir.lookup("namecheap").unwrap();
        assert_eq!(entry.name, "Namecheap");
        assert_eq!(entry.url.as_deref(), Some("https://namecheap.com"));
    }

    #[test]
    fn test_lookup_case_insensitive() {
        let dir = sample();
        assert_eq!(dir.lookup("GODADDY").unwrap().name, "GoDaddy");
        assert_eq!(dir.lookup("  GoDaddy  ").unwrap().name, "GoDaddy");
    }

    #[test]
    fn test_lookup_by_alias() {
        let dir = sample();
        let entry = dir.lookup("name-cheap").unwrap();
        assert_eq!(entry.key, "namecheap");
        assert_eq!(entry.name, "Namecheap");
        assert_eq!(dir.lookup("NC").unwrap().key, "namecheap");
    }

    #[test]
    fn test_lookup_miss() {
        let dir = sample();
        assert!(dir.lookup("nonexistent-provider").is_none());
        assert!(dir.lookup("").is_none());
    }

    // ========== match_url ==========

    #[test]
    fn test_match_url_normalizes_before_matching() {
        let dir = sample();
        // bare host gets https:// prepended, then the pattern applies
        assert_eq!(dir.match_url("namecheap.com").unwrap().name, "Namecheap");
        assert_eq!(
            dir.match_url("https://www.godaddy.com").unwrap().name,
            "GoDaddy"
        );
    }

    #[test]
    fn test_match_url_first_declared_wins() {
        let dir = sample();
        // both broadmatch and narrowmatch patterns hit; declaration order decides
        assert_eq!(dir.match_url("https://example.com").unwrap().name, "Broad");
    }

    #[test]
    fn test_match_url_case_insensitive() {
        let dir = sample();
        assert_eq!(dir.match_url("NAMECHEAP.COM").unwrap().name, "Namecheap");
    }

    #[test]
    fn test_match_url_rejects_non_url() {
        let dir = sample();
        assert!(dir.match_url("not-a-url").is_none());
    }

    #[test]
    fn test_match_url_no_pattern_hit() {
        let dir = sample();
        assert!(dir.match_url("https://unrelated.io").is_none());
    }

    // ========== bundled snapshot ==========

    #[test]
    fn test_bundled_loads() {
        let dir = ProviderDirectory::bundled();
        assert!(!dir.is_empty());
        assert!(dir.lookup("github").is_some());
        assert!(dir.lookup("namecheap").is_some());
    }

    #[test]
    fn test_bundled_matches_hosting_urls() {
        let dir = ProviderDirectory::bundled();
        assert_eq!(dir.match_url("app.netlify.com/sites").unwrap().name, "Netlify");
        assert_eq!(dir.match_url("mysite.netlify.app").unwrap().name, "Netlify");
        assert_eq!(
            dir.match_url("user-project.github.io").unwrap().name,
            "GitHub Pages"
        );
        assert_eq!(
            dir.match_url("https://myapp.herokuapp.com").unwrap().name,
            "Heroku"
        );
        assert_eq!(
            dir.match_url("example.firebaseapp.com").unwrap().name,
            "Firebase Hosting"
        );
        assert_eq!(
            dir.match_url("https://aws.amazon.com").unwrap().name,
            "Amazon Web Services"
        );
    }
}

//! Directory candidate analyzer
//!
//! Scans parsed documents for services that resolved to a bare name — no
//! URL, no children, no directory entry — which are the natural candidates
//! for new provider directory entries.

use crate::parsers::document::{FieldValue, ParsedDocument};
use crate::services::directory::ProviderDirectory;
use crate::types::Service;

/// A provider name seen in configuration but absent from the directory.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    /// Name as it first appeared.
    pub name: String,
    /// Field names it was seen under, deduplicated, in encounter order.
    pub field_types: Vec<String>,
    /// Domains it was seen in, deduplicated, in encounter order.
    pub domains: Vec<String>,
}

/// Find directory candidates in a parsed document, most widely used first.
pub fn find_directory_candidates(
    document: &ParsedDocument,
    directory: &ProviderDirectory,
) -> Vec<Candidate> {
    // keyed by lowercased name, order of first encounter preserved
    let mut candidates: Vec<(String, Candidate)> = Vec::new();

    for domain in document.domains() {
        for field in domain.fields() {
            let FieldValue::Services(services) = &field.value else {
                continue;
            };
            for service in services {
                collect(
                    service,
                    &field.name,
                    &domain.name,
                    directory,
                    &mut candidates,
                );
            }
        }
    }

    let mut result: Vec<Candidate> = candidates.into_iter().map(|(_, c)| c).collect();
    result.sort_by_key(|c| std::cmp::Reverse(c.domains.len()));
    result
}

fn collect(
    service: &Service,
    field: &str,
    domain: &str,
    directory: &ProviderDirectory,
    candidates: &mut Vec<(String, Candidate)>,
) {
    let is_candidate =
        service.url.is_none() && service.is_leaf() && directory.lookup(&service.name).is_none();

    if is_candidate {
        let key = service.name.to_lowercase();
        let idx = match candidates.iter().position(|(k, _)| *k == key) {
            Some(i) => i,
            None => {
                candidates.push((
                    key,
                    Candidate {
                        name: service.name.clone(),
                        field_types: Vec::new(),
                        domains: Vec::new(),
                    },
                ));
                candidates.len() - 1
            }
        };
        let entry = &mut candidates[idx].1;
        if !entry.field_types.iter().any(|t| t == field) {
            entry.field_types.push(field.to_string());
        }
        if !entry.domains.iter().any(|d| d == domain) {
            entry.domains.push(domain.to_string());
        }
    }

    for child in &service.children {
        collect(child, field, domain, directory, candidates);
    }
}

/// Render a plain-text report of directory candidates.
pub fn report(document: &ParsedDocument, directory: &ProviderDirectory) -> String {
    let candidates = find_directory_candidates(document, directory);

    if candidates.is_empty() {
        return "All services have URLs or are already in the directory. \
                No candidates for addition."
            .to_string();
    }

    let mut lines = vec![
        "DIRECTORY CANDIDATES REPORT".to_string(),
        "===========================".to_string(),
        format!(
            "Found {} potential provider(s) to add to the directory:",
            candidates.len()
        ),
        String::new(),
    ];

    for candidate in &candidates {
        lines.push(format!("{}:", candidate.name));
        lines.push(format!(
            "  - Used in {} domain(s): {}",
            candidate.domains.len(),
            candidate.domains.join(", ")
        ));
        lines.push(format!(
            "  - Used as field type(s): {}",
            candidate.field_types.join(", ")
        ));
        lines.push(String::new());
    }

    lines.join("\n")
}

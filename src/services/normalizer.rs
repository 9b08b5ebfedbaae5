//! Normalization engine
//!
//! Turns one arbitrarily-shaped configuration node into zero, one, or a tree
//! of [`Service`] records. Dispatch is an exhaustive match over the YAML
//! value union; provider identity is resolved against a [`ProviderDirectory`]
//! passed explicitly through every recursive call.
//!
//! The engine never fails past its own boundary: an unusable shape or a
//! construction fault becomes `None` plus a diagnostic log line, and the
//! caller skips that field.

use serde_yaml::{Mapping, Value};
use tracing::{debug, warn};

use crate::services::directory::ProviderDirectory;
use crate::services::url_classifier;
use crate::types::{Result, Service};

/// Normalize one input node into a service tree.
///
/// `hint` is the configuration field name the node appeared under, used as a
/// fallback or parent name. Returns `None` when no service can be produced;
/// callers must treat that as "skip", never as fatal.
pub fn normalize(node: &Value, hint: Option<&str>, directory: &ProviderDirectory) -> Option<Service> {
    match normalize_node(node, hint, directory) {
        Ok(service) => service,
        Err(e) => {
            warn!(error = %e, input = ?node, "failed to build service");
            None
        }
    }
}

fn normalize_node(
    node: &Value,
    hint: Option<&str>,
    directory: &ProviderDirectory,
) -> Result<Option<Service>> {
    match node {
        Value::String(s) => normalize_string(s, hint, directory),
        Value::Mapping(map) => normalize_mapping(map, hint, directory),
        Value::Sequence(seq) => normalize_sequence(seq, hint, directory),
        // null, bool, number, tagged: nothing to build a service from
        _ => Ok(None),
    }
}

/// A bare string is either a URL or a provider slug.
fn normalize_string(
    s: &str,
    hint: Option<&str>,
    directory: &ProviderDirectory,
) -> Result<Option<Service>> {
    if let Some(url) = url_classifier::normalize(s) {
        let matched = directory.match_url(&url);
        let name = matched
            .map(|e| e.name.clone())
            .or_else(|| url_classifier::extract_name(&url))
            .or_else(|| hint.map(str::to_string));
        let Some(name) = name else {
            debug!(input = %s, "no name resolvable for URL-like value");
            return Ok(None);
        };
        let image_url = matched.and_then(|e| e.image_url.clone());
        return Ok(Some(
            Service::new(name)?.with_url(url).with_image_url(image_url),
        ));
    }

    // slug: canonical entry if the directory knows it, raw name otherwise
    match directory.lookup(s) {
        Some(entry) => {
            let mut service = Service::new(entry.name.clone())?
                .with_image_url(entry.image_url.clone());
            if let Some(url) = &entry.url {
                service = service.with_url(url.clone());
            }
            Ok(Some(service))
        }
        None => Ok(Some(Service::new(s)?)),
    }
}

/// Mapping dispatch, first matching rule wins:
/// empty `service` guard, exact `{service, url}` shape, all-URL listing,
/// mixed attribute bag, generic `service`+`url` keys, recursive
/// decomposition.
fn normalize_mapping(
    map: &Mapping,
    hint: Option<&str>,
    directory: &ProviderDirectory,
) -> Result<Option<Service>> {
    // an explicit service key with nothing behind it is a refusal to guess
    if let Some(v) = get_entry(map, "service") {
        if matches!(v, Value::Null) || matches!(v, Value::String(s) if s.is_empty()) {
            debug!("mapping has an empty service key, refusing to guess");
            return Ok(None);
        }
    }

    // exact shape: service and url are both strings, extra keys ignored
    if let (Some(Value::String(service)), Some(Value::String(url))) =
        (get_entry(map, "service"), get_entry(map, "url"))
    {
        return service_url_leaf(service, Some(url.clone()), directory).map(Some);
    }

    // listing: every value is a URL-like string
    let all_url_like = !map.is_empty()
        && map
            .iter()
            .all(|(_, v)| matches!(v, Value::String(s) if url_classifier::is_url_like(s)));
    if all_url_like {
        let mut children = Vec::new();
        for (k, v) in map {
            let (Some(key), Value::String(url)) = (value_to_string(k), v) else {
                continue;
            };
            children.push(url_pair_child(&key, url, directory)?);
        }
        if !children.is_empty() {
            if let Some(h) = hint {
                return Ok(Some(Service::new(h)?.with_children(children)));
            }
        }
        if children.len() == 1 {
            return Ok(children.pop());
        }
        // several URL children and no hint: recursive decomposition below
        // wraps them under "Unknown"
    }

    // attribute bag: URLs mixed with other data, no provider identity
    let url_like_values = map
        .iter()
        .filter(|(_, v)| matches!(v, Value::String(s) if url_classifier::is_url_like(s)))
        .count();
    if url_like_values > 0 && url_like_values < map.len() {
        let Some(h) = hint else {
            debug!("mixed mapping without a type hint, nothing to name it");
            return Ok(None);
        };
        let mut properties = Mapping::new();
        for (k, v) in map {
            let Some(key) = value_to_string(k) else { continue };
            properties.insert(Value::String(key), v.clone());
        }
        return Ok(Some(Service::new(h)?.with_properties(properties)));
    }

    // generic service + url keys (values not necessarily strings)
    if let (Some(service), Some(url)) = (get_entry(map, "service"), get_entry(map, "url")) {
        let Some(name) = value_to_string(service) else {
            debug!(value = ?service, "service key is not a scalar");
            return Ok(None);
        };
        return service_url_leaf(&name, value_to_string(url), directory).map(Some);
    }

    // recursive decomposition: one child per key
    let mut children = Vec::new();
    for (k, v) in map {
        let Some(key) = value_to_string(k) else { continue };
        let child = match v {
            Value::Mapping(m) => match normalize_node(v, Some(&key), directory)? {
                Some(c) => Some(c),
                None => url_leaf_fallback(&key, m, directory)?,
            },
            Value::String(s) if url_classifier::is_url_like(s) => {
                let image_url = directory.match_url(s).and_then(|e| e.image_url.clone());
                Some(
                    Service::new(capitalize(&key))?
                        .with_url(s.clone())
                        .with_image_url(image_url),
                )
            }
            _ => None,
        };
        if let Some(c) = child {
            children.push(c);
        }
    }

    match (children.len(), hint) {
        (0, _) => Ok(None),
        (_, Some(h)) => Ok(Some(Service::new(h)?.with_children(children))),
        (1, None) => Ok(children.pop()),
        (_, None) => Ok(Some(Service::new("Unknown")?.with_children(children))),
    }
}

/// Sequence: recurse with the same hint; bare scalars become value leaves
/// rather than being dropped.
fn normalize_sequence(
    seq: &[Value],
    hint: Option<&str>,
    directory: &ProviderDirectory,
) -> Result<Option<Service>> {
    let mut children = Vec::new();
    for item in seq {
        match item {
            Value::Null | Value::Tagged(_) => {}
            Value::Mapping(_) | Value::Sequence(_) => {
                if let Some(c) = normalize_node(item, hint, directory)? {
                    children.push(c);
                }
            }
            Value::String(s) if url_classifier::is_url_like(s) => {
                if let Some(c) = normalize_node(item, hint, directory)? {
                    children.push(c);
                }
            }
            // non-URL scalar element: keep the raw value under the hint
            _ => {
                let name = hint.unwrap_or("value");
                children.push(Service::new(name)?.with_value(item.clone()));
            }
        }
    }

    match hint {
        Some(h) => Ok(Some(Service::new(h)?.with_children(children))),
        None if children.len() == 1 => Ok(children.pop()),
        None => Ok(None),
    }
}

/// Leaf for the `{service, url}` shapes: capitalized name, image resolved by
/// slug lookup first, URL match second.
fn service_url_leaf(
    service: &str,
    url: Option<String>,
    directory: &ProviderDirectory,
) -> Result<Service> {
    let entry = directory
        .lookup(service)
        .or_else(|| url.as_deref().and_then(|u| directory.match_url(u)));
    let image_url = entry.and_then(|e| e.image_url.clone());

    let mut leaf = Service::new(capitalize(service))?.with_image_url(image_url);
    if let Some(url) = url {
        leaf = leaf.with_url(url);
    }
    Ok(leaf)
}

/// Child for one key/URL pair of an all-URL mapping. Name priority:
/// URL match, slug lookup on the key, capitalized key. The image comes only
/// from the URL match.
fn url_pair_child(key: &str, url: &str, directory: &ProviderDirectory) -> Result<Service> {
    let matched = directory.match_url(url);
    let name = matched
        .map(|e| e.name.clone())
        .or_else(|| directory.lookup(key).map(|e| e.name.clone()))
        .unwrap_or_else(|| capitalize(key));
    let image_url = matched.and_then(|e| e.image_url.clone());
    Ok(Service::new(name)?
        .with_url(url)
        .with_image_url(image_url))
}

/// Last resort for a nested mapping that produced nothing: wrap whatever
/// URL-like leaves it holds under the raw key.
fn url_leaf_fallback(
    key: &str,
    map: &Mapping,
    directory: &ProviderDirectory,
) -> Result<Option<Service>> {
    let mut leaves = Vec::new();
    for (k, v) in map {
        if let (Some(sub_key), Value::String(url)) = (value_to_string(k), v) {
            if url_classifier::is_url_like(url) {
                leaves.push(url_pair_child(&sub_key, url, directory)?);
            }
        }
    }
    if leaves.is_empty() {
        return Ok(None);
    }
    Ok(Some(Service::new(key)?.with_children(leaves)))
}

fn get_entry<'a>(map: &'a Mapping, key: &str) -> Option<&'a Value> {
    map.iter()
        .find(|(k, _)| matches!(k, Value::String(s) if s == key))
        .map(|(_, v)| v)
}

pub(crate) fn value_to_string(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Upper-case the first character, lower-case the rest ("GITHUB" → "Github").
/// Directory entries supply their own canonical casing instead.
pub(crate) fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(|c| c.to_lowercase()))
            .collect(),
        None => String::new(),
    }
}

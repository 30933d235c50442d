//! Dependency-manifest parsing and merging.
//!
//! Neurons may carry a `requirements.txt`-style manifest; after a neuron is
//! materialized its manifest is folded into the consumer's root manifest.
//! Only `==` pins carry a version; all other specifiers are kept as a bare
//! name. When both sides pin the same package, the higher version wins
//! where both parse, otherwise the neuron's pin takes precedence.

use std::collections::BTreeMap;

use semver::Version;

/// Parse manifest text into `name -> version` (empty version for unpinned).
///
/// Comments (`# …`, whole-line or trailing) and blank lines are ignored.
/// Specifiers other than `==` (`>=`, `~=`, …) store an empty version.
pub fn parse(content: &str) -> BTreeMap<String, String> {
    let mut deps = BTreeMap::new();
    for line in content.lines() {
        let line = match line.find('#') {
            Some(idx) => &line[..idx],
            None => line,
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let spec_start = line.find(['=', '<', '>', '~', '!']);
        let (name, version) = match spec_start {
            Some(idx) => {
                let name = line[..idx].trim();
                let rest = line[idx..].trim();
                let version = rest
                    .strip_prefix("==")
                    .map(|v| v.trim().to_string())
                    .unwrap_or_default();
                (name, version)
            }
            None => (line, String::new()),
        };
        if !name.is_empty() {
            deps.insert(name.to_string(), version);
        }
    }
    deps
}

/// Pick the version that survives a merge of the same package.
///
/// Both parseable: the higher one. Otherwise the neuron's version wins,
/// except that an empty neuron version never erases an existing pin.
fn pick_version(existing: &str, neuron: &str) -> String {
    if existing == neuron {
        return existing.to_string();
    }
    if let (Ok(a), Ok(b)) = (Version::parse(existing), Version::parse(neuron)) {
        return if b >= a { neuron } else { existing }.to_string();
    }
    if neuron.is_empty() {
        return existing.to_string();
    }
    neuron.to_string()
}

/// Merge a neuron's manifest into the consumer's, neuron taking precedence.
///
/// Returns serialized manifest text, sorted by package name.
pub fn merge(consumer: &str, neuron: &str) -> String {
    let mut merged = parse(consumer);
    for (name, version) in parse(neuron) {
        let entry = merged.entry(name).or_default();
        *entry = pick_version(entry, &version);
    }
    serialize(&merged)
}

/// Serialize a dependency map: `name==version` for pins, bare `name` else.
pub fn serialize(deps: &BTreeMap<String, String>) -> String {
    let mut out = String::new();
    for (name, version) in deps {
        if version.is_empty() {
            out.push_str(name);
        } else {
            out.push_str(&format!("{}=={}", name, version));
        }
        out.push('\n');
    }
    out
}

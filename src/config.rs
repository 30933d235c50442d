//! Descriptor schema and parsing for `.brain` and `.neurons` files.
//!
//! Both descriptors are INI documents with case-sensitive keys. The brain
//! descriptor lives at a brain repository root and declares what the brain
//! exports; the consumer descriptor lives at a consumer root and declares
//! which brains it tracks, the sync policy, and the neuron mapping table.
//!
//! Everything is modeled as tagged records ([`BrainConfig`], [`BrainEntry`],
//! [`SyncPolicy`], [`Mapping`]) rather than loose maps, and serialization
//! preserves user-assigned `[MAP]` keys so a load/save cycle round-trips.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::defaults;
use crate::error::{Error, Result};
use crate::filesystem;

/// A key-value entry in an INI section.
#[derive(Clone, Debug)]
struct IniEntry {
    key: String,
    value: String,
}

/// A section in an INI document (name plus ordered entries).
#[derive(Clone, Debug)]
struct IniSection {
    name: String,
    entries: Vec<IniEntry>,
}

/// Parse INI content into ordered sections.
///
/// Supports `[section]` headers, `key = value` pairs, and `#`/`;` comments.
/// Keys keep their case; insertion order is preserved.
fn parse_ini(content: &str) -> Vec<IniSection> {
    let mut sections: Vec<IniSection> = Vec::new();
    for line in content.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with(';') {
            continue;
        }
        if trimmed.starts_with('[') && trimmed.ends_with(']') {
            sections.push(IniSection {
                name: trimmed[1..trimmed.len() - 1].trim().to_string(),
                entries: Vec::new(),
            });
        } else if let Some(pos) = trimmed.find('=') {
            let entry = IniEntry {
                key: trimmed[..pos].trim().to_string(),
                value: trimmed[pos + 1..].trim().to_string(),
            };
            match sections.last_mut() {
                Some(section) => section.entries.push(entry),
                None => sections.push(IniSection {
                    name: String::new(),
                    entries: vec![entry],
                }),
            }
        }
    }
    sections
}

fn find_section<'a>(sections: &'a [IniSection], name: &str) -> Option<&'a IniSection> {
    sections.iter().find(|s| s.name == name)
}

/// Parse a boolean recognized from `true/yes/1` and `false/no/0`.
fn parse_bool(value: &str) -> Option<bool> {
    match value.to_lowercase().as_str() {
        "true" | "yes" | "1" => Some(true),
        "false" | "no" | "0" => Some(false),
        _ => None,
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

////// BRAIN DESCRIPTOR //////

/// Permission a brain grants on an exported path pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportPermission {
    ReadOnly,
    ReadWrite,
}

impl ExportPermission {
    pub fn as_str(self) -> &'static str {
        match self {
            ExportPermission::ReadOnly => "readonly",
            ExportPermission::ReadWrite => "readwrite",
        }
    }
}

/// One `[EXPORT]` line: a path pattern and its permission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRule {
    pub pattern: String,
    pub permission: ExportPermission,
}

/// One `[ACCESS]` line: an entity and the path patterns it may touch.
///
/// Parsed and round-tripped; never enforced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessRule {
    pub entity: String,
    pub paths: Vec<String>,
}

/// Value of an `[UPDATE_POLICY]` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolicyValue {
    Flag(bool),
    Paths(Vec<String>),
    Text(String),
}

/// One `[UPDATE_POLICY]` entry, preserved for round-trips.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyEntry {
    pub key: String,
    pub value: PolicyValue,
}

/// The brain descriptor (`.brain` at the brain repository root).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrainConfig {
    pub id: String,
    pub description: Option<String>,
    pub export: Vec<ExportRule>,
    pub access: Vec<AccessRule>,
    pub update_policy: Vec<PolicyEntry>,
}

fn brain_err(message: impl Into<String>) -> Error {
    Error::BrainConfig {
        message: message.into(),
    }
}

/// Parse a brain descriptor from INI text.
pub fn parse_brain(content: &str) -> Result<BrainConfig> {
    let sections = parse_ini(content);

    let brain = find_section(&sections, "BRAIN")
        .ok_or_else(|| brain_err("Missing required [BRAIN] section"))?;
    let id = brain
        .entries
        .iter()
        .find(|e| e.key == "ID")
        .map(|e| e.value.clone())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| brain_err("Missing required ID field in [BRAIN] section"))?;
    let description = brain
        .entries
        .iter()
        .find(|e| e.key == "DESCRIPTION")
        .map(|e| e.value.clone());

    let export_section = find_section(&sections, "EXPORT")
        .ok_or_else(|| brain_err("Missing required [EXPORT] section"))?;
    let mut export = Vec::new();
    for entry in &export_section.entries {
        let permission = match entry.value.as_str() {
            "" | "readonly" => ExportPermission::ReadOnly,
            "readwrite" => ExportPermission::ReadWrite,
            other => {
                return Err(brain_err(format!(
                    "Invalid export permission '{}' for '{}'",
                    other, entry.key
                )))
            }
        };
        export.push(ExportRule {
            pattern: entry.key.clone(),
            permission,
        });
    }

    let access = find_section(&sections, "ACCESS")
        .map(|s| {
            s.entries
                .iter()
                .map(|e| AccessRule {
                    entity: e.key.clone(),
                    paths: split_list(&e.value),
                })
                .collect()
        })
        .unwrap_or_default();

    let update_policy = find_section(&sections, "UPDATE_POLICY")
        .map(|s| {
            s.entries
                .iter()
                .map(|e| {
                    let value = if e.key == "PROTECTED_PATHS" {
                        PolicyValue::Paths(split_list(&e.value))
                    } else if let Some(flag) = parse_bool(&e.value) {
                        PolicyValue::Flag(flag)
                    } else {
                        PolicyValue::Text(e.value.clone())
                    };
                    PolicyEntry {
                        key: e.key.clone(),
                        value,
                    }
                })
                .collect()
        })
        .unwrap_or_default();

    Ok(BrainConfig {
        id,
        description,
        export,
        access,
        update_policy,
    })
}

/// Load a brain descriptor from `path`.
pub fn load_brain(path: &Path) -> Result<BrainConfig> {
    if !path.exists() {
        return Err(brain_err(format!(
            "Brain configuration file not found: {}",
            path.display()
        )));
    }
    parse_brain(&filesystem::read_text(path)?)
}

/// Serialize a brain descriptor back to INI text.
pub fn serialize_brain(config: &BrainConfig) -> String {
    let mut out = String::new();
    out.push_str("[BRAIN]\n");
    out.push_str(&format!("ID = {}\n", config.id));
    if let Some(desc) = &config.description {
        out.push_str(&format!("DESCRIPTION = {}\n", desc));
    }
    out.push_str("\n[EXPORT]\n");
    for rule in &config.export {
        out.push_str(&format!("{} = {}\n", rule.pattern, rule.permission.as_str()));
    }
    if !config.access.is_empty() {
        out.push_str("\n[ACCESS]\n");
        for rule in &config.access {
            out.push_str(&format!("{} = {}\n", rule.entity, rule.paths.join(",")));
        }
    }
    if !config.update_policy.is_empty() {
        out.push_str("\n[UPDATE_POLICY]\n");
        for entry in &config.update_policy {
            let value = match &entry.value {
                PolicyValue::Flag(b) => b.to_string(),
                PolicyValue::Paths(paths) => paths.join(","),
                PolicyValue::Text(t) => t.clone(),
            };
            out.push_str(&format!("{} = {}\n", entry.key, value));
        }
    }
    out
}

/// Save a brain descriptor to `path`.
pub fn save_brain(config: &BrainConfig, path: &Path) -> Result<()> {
    filesystem::write_text(path, &serialize_brain(config))
}

////// CONSUMER DESCRIPTOR //////

/// How a content conflict between the brain and the local copy is settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConflictStrategy {
    /// Ask the user (degrades to [`ConflictStrategy::PreferBrain`] when
    /// local modifications are disallowed or the session is not a TTY).
    #[default]
    Prompt,
    PreferBrain,
    PreferLocal,
}

impl ConflictStrategy {
    pub fn as_str(self) -> &'static str {
        match self {
            ConflictStrategy::Prompt => "prompt",
            ConflictStrategy::PreferBrain => "prefer_brain",
            ConflictStrategy::PreferLocal => "prefer_local",
        }
    }
}

impl FromStr for ConflictStrategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "prompt" => Ok(ConflictStrategy::Prompt),
            "prefer_brain" => Ok(ConflictStrategy::PreferBrain),
            "prefer_local" => Ok(ConflictStrategy::PreferLocal),
            other => Err(Error::NeuronsConfig {
                message: format!(
                    "Invalid CONFLICT_STRATEGY '{}' (expected prompt, prefer_brain or prefer_local)",
                    other
                ),
            }),
        }
    }
}

impl fmt::Display for ConflictStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A registered brain: where it lives and which branch is tracked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrainEntry {
    pub remote: String,
    pub branch: Option<String>,
    /// Extra argument string, round-tripped but never forwarded to git.
    pub args: Option<String>,
}

impl BrainEntry {
    /// Branch to track, falling back to the default.
    pub fn tracked_branch(&self) -> &str {
        self.branch.as_deref().unwrap_or(defaults::DEFAULT_BRANCH)
    }
}

/// The `[SYNC_POLICY]` section with its documented defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncPolicy {
    pub auto_sync_on_pull: bool,
    pub conflict_strategy: ConflictStrategy,
    pub allow_local_modifications: bool,
    pub allow_push_to_brain: bool,
    pub auto_sync_on_checkout: bool,
}

impl Default for SyncPolicy {
    fn default() -> Self {
        Self {
            auto_sync_on_pull: true,
            conflict_strategy: ConflictStrategy::Prompt,
            allow_local_modifications: false,
            allow_push_to_brain: false,
            auto_sync_on_checkout: false,
        }
    }
}

/// One `[MAP]` entry: a neuron shared from a brain into the consumer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mapping {
    pub brain_id: String,
    /// Brain-relative source path. A trailing separator marks a directory.
    pub source: String,
    /// Consumer-relative destination path.
    pub destination: String,
    /// Original config key, kept so round-trips preserve user names.
    pub key: Option<String>,
}

/// The consumer descriptor (`.neurons` at the consumer repository root).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NeuronsConfig {
    /// Brain registry in declaration order.
    pub brains: Vec<(String, BrainEntry)>,
    pub policy: SyncPolicy,
    /// Mapping list in declaration order; order drives sync precedence.
    pub mappings: Vec<Mapping>,
}

impl NeuronsConfig {
    /// Empty configuration with default policy.
    pub fn new() -> Self {
        Self {
            brains: Vec::new(),
            policy: SyncPolicy::default(),
            mappings: Vec::new(),
        }
    }

    /// Look up a brain entry by id.
    pub fn brain(&self, id: &str) -> Option<&BrainEntry> {
        self.brains
            .iter()
            .find(|(name, _)| name == id)
            .map(|(_, entry)| entry)
    }
}

impl Default for NeuronsConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn neurons_err(message: impl Into<String>) -> Error {
    Error::NeuronsConfig {
        message: message.into(),
    }
}

/// Parse a mapping value of the form `brain::source::destination`.
///
/// The two-part form `source::destination` is accepted only when exactly
/// one brain is registered.
fn parse_mapping(
    key: &str,
    value: &str,
    brains: &[(String, BrainEntry)],
) -> Result<Mapping> {
    let parts: Vec<&str> = value.split("::").collect();
    let (brain_id, source, destination) = match parts.as_slice() {
        [brain, src, dst] => (brain.to_string(), src.to_string(), dst.to_string()),
        [src, dst] if brains.len() == 1 => {
            (brains[0].0.clone(), src.to_string(), dst.to_string())
        }
        [_, _] => {
            return Err(neurons_err(format!(
                "Mapping '{}' omits the brain but {} brains are defined",
                key,
                brains.len()
            )))
        }
        _ => {
            return Err(neurons_err(format!(
                "Malformed mapping '{}': expected brain::source::destination, got '{}'",
                key, value
            )))
        }
    };
    if brain_id.is_empty() || source.is_empty() || destination.is_empty() {
        return Err(neurons_err(format!(
            "Malformed mapping '{}': empty part in '{}'",
            key, value
        )));
    }
    if !brains.iter().any(|(name, _)| *name == brain_id) {
        return Err(neurons_err(format!(
            "Unknown brain '{}' referenced in [MAP] entry '{}'",
            brain_id, key
        )));
    }
    Ok(Mapping {
        brain_id,
        source,
        destination,
        key: Some(key.to_string()),
    })
}

/// Parse a consumer descriptor from INI text.
pub fn parse_neurons(content: &str) -> Result<NeuronsConfig> {
    let sections = parse_ini(content);

    let mut brains: Vec<(String, BrainEntry)> = Vec::new();
    for section in &sections {
        let Some(id) = section.name.strip_prefix("BRAIN:") else {
            continue;
        };
        let id = id.trim();
        if id.is_empty() {
            return Err(neurons_err("Brain section with empty id"));
        }
        let get = |key: &str| {
            section
                .entries
                .iter()
                .find(|e| e.key == key)
                .map(|e| e.value.clone())
        };
        let remote = get("REMOTE")
            .filter(|v| !v.is_empty())
            .ok_or_else(|| neurons_err(format!("Missing required REMOTE for brain '{}'", id)))?;
        brains.push((
            id.to_string(),
            BrainEntry {
                remote,
                branch: get("BRANCH").filter(|v| !v.is_empty()),
                args: get("ARGS").filter(|v| !v.is_empty()),
            },
        ));
    }

    let mut policy = SyncPolicy::default();
    if let Some(section) = find_section(&sections, "SYNC_POLICY") {
        for entry in &section.entries {
            let flag = || {
                parse_bool(&entry.value).ok_or_else(|| {
                    neurons_err(format!(
                        "Invalid boolean '{}' for {}",
                        entry.value, entry.key
                    ))
                })
            };
            match entry.key.as_str() {
                "AUTO_SYNC_ON_PULL" => policy.auto_sync_on_pull = flag()?,
                "CONFLICT_STRATEGY" => {
                    policy.conflict_strategy = entry.value.parse()?;
                }
                "ALLOW_LOCAL_MODIFICATIONS" => policy.allow_local_modifications = flag()?,
                "ALLOW_PUSH_TO_BRAIN" => policy.allow_push_to_brain = flag()?,
                "AUTO_SYNC_ON_CHECKOUT" => policy.auto_sync_on_checkout = flag()?,
                _ => {}
            }
        }
    }

    let map_section = find_section(&sections, "MAP")
        .ok_or_else(|| neurons_err("Missing required [MAP] section"))?;
    let mut mappings = Vec::new();
    for entry in &map_section.entries {
        mappings.push(parse_mapping(&entry.key, &entry.value, &brains)?);
    }

    Ok(NeuronsConfig {
        brains,
        policy,
        mappings,
    })
}

/// Load a consumer descriptor from `path`.
pub fn load_neurons(path: &Path) -> Result<NeuronsConfig> {
    if !path.exists() {
        return Err(neurons_err(format!(
            "Neurons configuration file not found: {}",
            path.display()
        )));
    }
    parse_neurons(&filesystem::read_text(path)?)
}

/// Serialize a consumer descriptor back to INI text.
///
/// `[MAP]` entries keep their original keys; entries that never had one get
/// a synthesized `map{i}`.
pub fn serialize_neurons(config: &NeuronsConfig) -> String {
    let mut out = String::new();
    for (id, entry) in &config.brains {
        out.push_str(&format!("[BRAIN:{}]\n", id));
        out.push_str(&format!("REMOTE = {}\n", entry.remote));
        if let Some(branch) = &entry.branch {
            out.push_str(&format!("BRANCH = {}\n", branch));
        }
        if let Some(args) = &entry.args {
            out.push_str(&format!("ARGS = {}\n", args));
        }
        out.push('\n');
    }

    let policy = &config.policy;
    out.push_str("[SYNC_POLICY]\n");
    out.push_str(&format!("AUTO_SYNC_ON_PULL = {}\n", policy.auto_sync_on_pull));
    out.push_str(&format!(
        "CONFLICT_STRATEGY = {}\n",
        policy.conflict_strategy
    ));
    out.push_str(&format!(
        "ALLOW_LOCAL_MODIFICATIONS = {}\n",
        policy.allow_local_modifications
    ));
    out.push_str(&format!(
        "ALLOW_PUSH_TO_BRAIN = {}\n",
        policy.allow_push_to_brain
    ));
    out.push_str(&format!(
        "AUTO_SYNC_ON_CHECKOUT = {}\n",
        policy.auto_sync_on_checkout
    ));

    out.push_str("\n[MAP]\n");
    for (i, mapping) in config.mappings.iter().enumerate() {
        let key = mapping
            .key
            .clone()
            .unwrap_or_else(|| format!("map{}", i));
        out.push_str(&format!(
            "{} = {}::{}::{}\n",
            key, mapping.brain_id, mapping.source, mapping.destination
        ));
    }
    out
}

/// Save a consumer descriptor to `path`.
pub fn save_neurons(config: &NeuronsConfig, path: &Path) -> Result<()> {
    filesystem::write_text(path, &serialize_neurons(config))
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_BRAIN: &str = "\
[BRAIN]
ID = test-brain
DESCRIPTION = Test brain repository

[EXPORT]
libs/**/*.py = readonly
config/*.json = readwrite
data/ =

[ACCESS]
user1 = libs/**/*.py, config/*.json
group_all = *

[UPDATE_POLICY]
REQUIRE_REVIEW = true
PROTECTED_PATHS = libs/core/*,other/path
NOTIFY_LIST = dev@example.com
";

    #[test]
    fn test_parse_full_brain_config() {
        let config = parse_brain(FULL_BRAIN).unwrap();
        assert_eq!(config.id, "test-brain");
        assert_eq!(config.description.as_deref(), Some("Test brain repository"));
        assert_eq!(config.export.len(), 3);
        assert_eq!(config.export[0].permission, ExportPermission::ReadOnly);
        assert_eq!(config.export[1].permission, ExportPermission::ReadWrite);
        // Empty value means readonly.
        assert_eq!(config.export[2].permission, ExportPermission::ReadOnly);
        assert_eq!(config.access[0].entity, "user1");
        assert_eq!(
            config.access[0].paths,
            vec!["libs/**/*.py".to_string(), "config/*.json".to_string()]
        );
        assert_eq!(
            config.update_policy[0].value,
            PolicyValue::Flag(true)
        );
        assert_eq!(
            config.update_policy[1].value,
            PolicyValue::Paths(vec!["libs/core/*".into(), "other/path".into()])
        );
        assert_eq!(
            config.update_policy[2].value,
            PolicyValue::Text("dev@example.com".into())
        );
    }

    #[test]
    fn test_minimal_brain_has_no_optional_sections() {
        let config = parse_brain("[BRAIN]\nID = minimal\n\n[EXPORT]\nlibs/* = readonly\n").unwrap();
        assert_eq!(config.id, "minimal");
        assert!(config.description.is_none());
        assert!(config.access.is_empty());
        assert!(config.update_policy.is_empty());
    }

    #[test]
    fn test_brain_missing_id_is_error() {
        let err = parse_brain("[BRAIN]\nDESCRIPTION = x\n\n[EXPORT]\na = readonly\n").unwrap_err();
        assert!(err.to_string().contains("Missing required ID field"));
    }

    #[test]
    fn test_brain_missing_export_is_error() {
        let err = parse_brain("[BRAIN]\nID = x\n").unwrap_err();
        assert!(err.to_string().contains("Missing required [EXPORT] section"));
    }

    #[test]
    fn test_brain_round_trip() {
        let config = parse_brain(FULL_BRAIN).unwrap();
        let reloaded = parse_brain(&serialize_brain(&config)).unwrap();
        assert_eq!(config, reloaded);
    }

    const FULL_NEURONS: &str = "\
[BRAIN:core-lib]
REMOTE = git@github.com:org/core-lib.git
BRANCH = main

[BRAIN:analytics]
REMOTE = git@github.com:org/analytics.git
BRANCH = stable
ARGS = --filter=blob:none

[SYNC_POLICY]
AUTO_SYNC_ON_PULL = true
CONFLICT_STRATEGY = prompt
ALLOW_LOCAL_MODIFICATIONS = false
ALLOW_PUSH_TO_BRAIN = false

[MAP]
map_str = core-lib::libs/utils/strings.py::src/utils/strings.py
map_cfg = core-lib::libs/config/::config/
map_model = analytics::models/linear.py::src/models/linear.py
";

    #[test]
    fn test_parse_full_neurons_config() {
        let config = parse_neurons(FULL_NEURONS).unwrap();
        assert_eq!(config.brains.len(), 2);
        assert_eq!(
            config.brain("core-lib").unwrap().remote,
            "git@github.com:org/core-lib.git"
        );
        assert_eq!(
            config.brain("analytics").unwrap().args.as_deref(),
            Some("--filter=blob:none")
        );
        assert!(config.policy.auto_sync_on_pull);
        assert_eq!(config.policy.conflict_strategy, ConflictStrategy::Prompt);
        assert_eq!(config.mappings.len(), 3);
        let m = &config.mappings[0];
        assert_eq!(
            (m.brain_id.as_str(), m.source.as_str(), m.destination.as_str()),
            ("core-lib", "libs/utils/strings.py", "src/utils/strings.py")
        );
        assert_eq!(m.key.as_deref(), Some("map_str"));
    }

    #[test]
    fn test_neurons_defaults_applied() {
        let config =
            parse_neurons("[BRAIN:minimal]\nREMOTE = git@example.com:m.git\n\n[MAP]\n").unwrap();
        assert!(config.policy.auto_sync_on_pull);
        assert!(!config.policy.allow_local_modifications);
        assert!(!config.policy.allow_push_to_brain);
        assert!(!config.policy.auto_sync_on_checkout);
        assert_eq!(config.brain("minimal").unwrap().tracked_branch(), "main");
    }

    #[test]
    fn test_neurons_missing_map_is_error() {
        let err = parse_neurons("[BRAIN:x]\nREMOTE = url\n").unwrap_err();
        assert!(err.to_string().contains("Missing required [MAP] section"));
    }

    #[test]
    fn test_neurons_empty_map_allowed() {
        let config = parse_neurons("[BRAIN:x]\nREMOTE = url\n\n[MAP]\n").unwrap();
        assert!(config.mappings.is_empty());
    }

    #[test]
    fn test_unknown_brain_in_map_is_error() {
        let content = "[BRAIN:core]\nREMOTE = url\n\n[MAP]\nm = other::a::b\n";
        let err = parse_neurons(content).unwrap_err();
        assert!(err.to_string().contains("Unknown brain 'other'"));
    }

    #[test]
    fn test_two_part_mapping_requires_single_brain() {
        let single = "[BRAIN:only]\nREMOTE = url\n\n[MAP]\nm = src.py::dst.py\n";
        let config = parse_neurons(single).unwrap();
        assert_eq!(config.mappings[0].brain_id, "only");

        let double = "[BRAIN:a]\nREMOTE = u1\n\n[BRAIN:b]\nREMOTE = u2\n\n[MAP]\nm = s::d\n";
        assert!(parse_neurons(double).is_err());
    }

    #[test]
    fn test_empty_mapping_part_is_error() {
        let content = "[BRAIN:x]\nREMOTE = url\n\n[MAP]\nm = x::::dst\n";
        assert!(parse_neurons(content).is_err());
    }

    #[test]
    fn test_missing_remote_is_error() {
        let err = parse_neurons("[BRAIN:x]\nBRANCH = main\n\n[MAP]\n").unwrap_err();
        assert!(err.to_string().contains("Missing required REMOTE"));
    }

    #[test]
    fn test_neurons_round_trip_preserves_keys() {
        let config = parse_neurons(FULL_NEURONS).unwrap();
        let reloaded = parse_neurons(&serialize_neurons(&config)).unwrap();
        assert_eq!(config, reloaded);
        assert_eq!(reloaded.mappings[1].key.as_deref(), Some("map_cfg"));
    }

    #[test]
    fn test_serialize_synthesizes_map_keys() {
        let mut config = NeuronsConfig::new();
        config.brains.push((
            "b".into(),
            BrainEntry {
                remote: "url".into(),
                branch: None,
                args: None,
            },
        ));
        config.mappings.push(Mapping {
            brain_id: "b".into(),
            source: "s".into(),
            destination: "d".into(),
            key: None,
        });
        let text = serialize_neurons(&config);
        assert!(text.contains("map0 = b::s::d"));
    }

    #[test]
    fn test_keys_are_case_sensitive() {
        // Lowercase `id` must not satisfy the required uppercase ID.
        let err = parse_brain("[BRAIN]\nid = nope\n\n[EXPORT]\na = readonly\n").unwrap_err();
        assert!(err.to_string().contains("Missing required ID field"));
    }

    #[test]
    fn test_conflict_strategy_parse() {
        assert_eq!(
            "prefer_brain".parse::<ConflictStrategy>().unwrap(),
            ConflictStrategy::PreferBrain
        );
        assert!("brainwash".parse::<ConflictStrategy>().is_err());
    }
}

//! The neuron synchronization engine.
//!
//! For each mapping the engine clones the brain at its tracked branch into a
//! scoped temp directory, materializes the neuron's content into the
//! consumer (resolving conflicts per the effective strategy), folds any
//! neuron-owned dependency manifest into the consumer's root manifest, and
//! reports a per-neuron result. Failures are captured in the result record;
//! a batch (`sync_all`) never aborts because one neuron failed.

use std::fmt;
use std::path::{Path, PathBuf};

use log::{debug, info};
use walkdir::WalkDir;

use crate::config::{ConflictStrategy, Mapping, NeuronsConfig};
use crate::conflict::{self, Resolved};
use crate::defaults;
use crate::error::{Error, Result};
use crate::filesystem;
use crate::git;
use crate::requirements;

/// What the sync did to the destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncAction {
    Added,
    Updated,
    Unchanged,
    Skipped,
}

impl fmt::Display for SyncAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SyncAction::Added => "added",
            SyncAction::Updated => "updated",
            SyncAction::Unchanged => "unchanged",
            SyncAction::Skipped => "skipped",
        };
        f.write_str(s)
    }
}

/// Outcome of syncing one neuron.
#[derive(Debug, Clone)]
pub struct SyncResult {
    pub success: bool,
    pub action: SyncAction,
    pub message: String,
    pub requirements_merged: bool,
    pub brain_id: String,
    pub source: String,
    pub destination: String,
}

impl SyncResult {
    fn error(mapping: &Mapping, message: String) -> Self {
        Self {
            success: false,
            action: SyncAction::Skipped,
            message,
            requirements_merged: false,
            brain_id: mapping.brain_id.clone(),
            source: mapping.source.clone(),
            destination: mapping.destination.clone(),
        }
    }
}

/// Per-invocation knobs (CLI overrides and terminal state).
#[derive(Debug, Clone, Copy, Default)]
pub struct SyncOptions {
    /// `--strategy` override for this call.
    pub strategy_override: Option<ConflictStrategy>,
    /// `--reset`: treat local modifications as allowed for this call,
    /// suppressing the prompt-to-prefer-brain degradation.
    pub allow_local_override: bool,
    /// Whether a controlling terminal is available for prompts.
    pub interactive: bool,
}

/// Sync a single neuron described by `mapping`.
pub fn sync_neuron(
    config: &NeuronsConfig,
    mapping: &Mapping,
    repo_root: &Path,
    options: &SyncOptions,
) -> SyncResult {
    match sync_neuron_inner(config, mapping, repo_root, options) {
        Ok(result) => result,
        Err(e) => SyncResult::error(mapping, e.to_string()),
    }
}

fn sync_neuron_inner(
    config: &NeuronsConfig,
    mapping: &Mapping,
    repo_root: &Path,
    options: &SyncOptions,
) -> Result<SyncResult> {
    let brain = config.brain(&mapping.brain_id).ok_or_else(|| Error::NeuronsConfig {
        message: format!("Unknown brain '{}'", mapping.brain_id),
    })?;

    let mut policy = config.policy.clone();
    if options.allow_local_override {
        policy.allow_local_modifications = true;
    }
    let strategy = conflict::effective_strategy(&policy, options.strategy_override);

    info!(
        "syncing {}::{} -> {}",
        mapping.brain_id, mapping.source, mapping.destination
    );
    let clone = git::temp_clone(&brain.remote, Some(brain.tracked_branch()))?;

    let src = clone.root().join(mapping.source.trim_end_matches('/'));
    let dst = repo_root.join(mapping.destination.trim_end_matches('/'));
    filesystem::ensure_parent(&dst)?;

    if !src.exists() {
        return Err(Error::SourceNotFound {
            brain_id: mapping.brain_id.clone(),
            source_path: mapping.source.clone(),
        });
    }

    let action = if src.is_dir() {
        sync_directory(&src, &dst, mapping, strategy, options.interactive)?
    } else {
        sync_file(&src, &dst, mapping, strategy, options.interactive)?
    };

    let requirements_merged = merge_neuron_requirements(&src, mapping, repo_root)?;

    // The temp clone is removed when `clone` drops, on success and error alike.
    Ok(SyncResult {
        success: true,
        action,
        message: format!("{} {}", action, mapping.destination),
        requirements_merged,
        brain_id: mapping.brain_id.clone(),
        source: mapping.source.clone(),
        destination: mapping.destination.clone(),
    })
}

/// Manifest file names that belong to the neuron itself and are not copied
/// into the consumer during a directory walk.
fn neuron_manifest_names(src: &Path) -> Vec<String> {
    let mut names = vec![defaults::REQUIREMENTS_FILE.to_string()];
    if let Some(base) = src.file_name().and_then(|n| n.to_str()) {
        names.push(format!("{}{}", base, defaults::REQUIREMENTS_FILE));
    }
    names
}

fn sync_directory(
    src: &Path,
    dst: &Path,
    mapping: &Mapping,
    strategy: ConflictStrategy,
    interactive: bool,
) -> Result<SyncAction> {
    if !dst.is_dir() {
        // Missing, or a file where a directory belongs: replace wholesale.
        let replaced = dst.exists();
        if replaced {
            std::fs::remove_file(dst)?;
        }
        filesystem::copy_dir_all(src, dst)?;
        return Ok(if replaced {
            SyncAction::Updated
        } else {
            SyncAction::Added
        });
    }

    let skip_names = neuron_manifest_names(src);
    let mut added = false;
    let mut updated = false;

    for entry in WalkDir::new(src).min_depth(1) {
        let entry = entry.map_err(|e| Error::Sync {
            message: format!("failed to walk {}: {}", src.display(), e),
        })?;
        let rel = entry
            .path()
            .strip_prefix(src)
            .expect("walkdir yields children of src");
        if rel.components().any(|c| c.as_os_str() == ".git") {
            continue;
        }
        let target = dst.join(rel);

        if entry.file_type().is_dir() {
            filesystem::ensure_dir(&target)?;
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        if skip_names.iter().any(|s| *s == name) {
            debug!("skipping neuron manifest {}", rel.display());
            continue;
        }

        let brain_bytes = filesystem::read_bytes(entry.path())?;
        if !target.exists() {
            filesystem::write_bytes(&target, &brain_bytes)?;
            added = true;
            continue;
        }
        let local_bytes = filesystem::read_bytes(&target)?;
        if !conflict::detect_conflict(&local_bytes, &brain_bytes) {
            continue;
        }
        let label = format!(
            "{}/{}",
            mapping.destination.trim_end_matches('/'),
            rel.display()
        );
        let Resolved { content, .. } =
            conflict::resolve(&label, &local_bytes, &brain_bytes, strategy, interactive)?;
        if content != local_bytes {
            filesystem::write_bytes(&target, &content)?;
            updated = true;
        }
    }

    Ok(if updated {
        SyncAction::Updated
    } else if added {
        SyncAction::Added
    } else {
        SyncAction::Unchanged
    })
}

fn sync_file(
    src: &Path,
    dst: &Path,
    mapping: &Mapping,
    strategy: ConflictStrategy,
    interactive: bool,
) -> Result<SyncAction> {
    let brain_bytes = filesystem::read_bytes(src)?;

    if dst.is_dir() {
        std::fs::remove_dir_all(dst)?;
        filesystem::write_bytes(dst, &brain_bytes)?;
        return Ok(SyncAction::Updated);
    }
    if !dst.exists() {
        filesystem::write_bytes(dst, &brain_bytes)?;
        return Ok(SyncAction::Added);
    }

    let local_bytes = filesystem::read_bytes(dst)?;
    if !conflict::detect_conflict(&local_bytes, &brain_bytes) {
        return Ok(SyncAction::Unchanged);
    }
    let Resolved { content, .. } = conflict::resolve(
        &mapping.destination,
        &local_bytes,
        &brain_bytes,
        strategy,
        interactive,
    )?;
    if content == local_bytes {
        return Ok(SyncAction::Unchanged);
    }
    filesystem::write_bytes(dst, &content)?;
    Ok(SyncAction::Updated)
}

/// Locate a neuron's dependency manifest inside the brain clone.
///
/// Directory neurons may carry `<dir>/requirements.txt` or the concatenated
/// `<dir>/<basename>requirements.txt`; file neurons a sibling file named
/// `<file name>requirements.txt` (no separator in either concatenation).
fn find_neuron_manifest(src: &Path) -> Option<PathBuf> {
    if src.is_dir() {
        let plain = src.join(defaults::REQUIREMENTS_FILE);
        if plain.is_file() {
            return Some(plain);
        }
        let base = src.file_name()?.to_str()?;
        let concatenated = src.join(format!("{}{}", base, defaults::REQUIREMENTS_FILE));
        if concatenated.is_file() {
            return Some(concatenated);
        }
        return None;
    }
    let name = src.file_name()?.to_str()?;
    let sibling = src.with_file_name(format!("{}{}", name, defaults::REQUIREMENTS_FILE));
    sibling.is_file().then_some(sibling)
}

/// Fold a neuron's manifest into the consumer's root manifest.
///
/// Returns whether a manifest was found and merged.
fn merge_neuron_requirements(src: &Path, mapping: &Mapping, repo_root: &Path) -> Result<bool> {
    let Some(manifest) = find_neuron_manifest(src) else {
        return Ok(false);
    };
    let neuron_reqs = filesystem::read_text(&manifest)?;
    let root_manifest = repo_root.join(defaults::REQUIREMENTS_FILE);
    let consumer_reqs = if root_manifest.exists() {
        filesystem::read_text(&root_manifest)?
    } else {
        String::new()
    };
    let merged = requirements::merge(&consumer_reqs, &neuron_reqs);
    filesystem::write_text(&root_manifest, &merged)?;
    info!(
        "merged requirements from {}::{}",
        mapping.brain_id, mapping.source
    );
    Ok(true)
}

/// Sync every mapping in order, collecting per-neuron results.
///
/// A failing neuron is recorded and the batch continues.
pub fn sync_all(
    config: &NeuronsConfig,
    repo_root: &Path,
    options: &SyncOptions,
) -> Vec<SyncResult> {
    config
        .mappings
        .iter()
        .map(|mapping| sync_neuron(config, mapping, repo_root, options))
        .collect()
}

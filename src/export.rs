//! The export engine: committing locally modified neurons back upstream.
//!
//! Export is the inverse of sync. Modified neurons are grouped by brain and
//! each group is committed in one of two ways: directly into the working
//! tree of a local non-bare brain that is clean and on the right branch, or
//! via a scoped clone that is committed and pushed. The brain's own export
//! table is not consulted; the only gate is the consumer's
//! `ALLOW_PUSH_TO_BRAIN` policy.

use std::path::Path;

use log::info;

use crate::config::{BrainEntry, Mapping, NeuronsConfig};
use crate::error::{Error, Result};
use crate::filesystem;
use crate::git;

/// Outcome of exporting one brain's group of neurons.
#[derive(Debug, Clone)]
pub struct ExportOutcome {
    pub success: bool,
    pub message: String,
    /// Commit id in the brain, when one was created.
    pub commit: Option<String>,
    pub exported: Vec<Mapping>,
}

/// Export `mappings` (already detected as modified) back to their brains.
///
/// Returns one outcome per brain, in first-seen order. A failing brain does
/// not prevent the others from being processed. Fails outright only on the
/// policy gate.
pub fn export_neurons(
    config: &NeuronsConfig,
    mappings: &[Mapping],
    repo_root: &Path,
    message: Option<&str>,
) -> Result<Vec<(String, ExportOutcome)>> {
    if !config.policy.allow_push_to_brain {
        return Err(Error::Policy {
            message: "export is disabled: set ALLOW_PUSH_TO_BRAIN = true in [SYNC_POLICY]"
                .to_string(),
        });
    }

    // Group by brain, preserving first-seen order.
    let mut groups: Vec<(String, Vec<Mapping>)> = Vec::new();
    for mapping in mappings {
        match groups.iter_mut().find(|(id, _)| *id == mapping.brain_id) {
            Some((_, group)) => group.push(mapping.clone()),
            None => groups.push((mapping.brain_id.clone(), vec![mapping.clone()])),
        }
    }

    let mut outcomes = Vec::new();
    for (brain_id, group) in groups {
        let outcome = match config.brain(&brain_id) {
            Some(brain) => export_to_brain(brain, &group, repo_root, message),
            None => ExportOutcome {
                success: false,
                message: format!("Unknown brain '{}'", brain_id),
                commit: None,
                exported: Vec::new(),
            },
        };
        outcomes.push((brain_id, outcome));
    }
    Ok(outcomes)
}

/// Default commit message enumerating each exported pair.
fn default_message(group: &[Mapping]) -> String {
    let mut msg = format!("Export {} neuron(s) from consumer\n", group.len());
    for mapping in group {
        msg.push_str(&format!("\n{} <- {}", mapping.source, mapping.destination));
    }
    msg
}

fn export_to_brain(
    brain: &BrainEntry,
    group: &[Mapping],
    repo_root: &Path,
    message: Option<&str>,
) -> ExportOutcome {
    let result = match local_brain_worktree(brain) {
        Some(brain_root) => export_direct(&brain_root, brain, group, repo_root, message),
        None => export_via_clone(brain, group, repo_root, message),
    };
    match result {
        Ok(outcome) => outcome,
        Err(e) => ExportOutcome {
            success: false,
            message: e.to_string(),
            commit: None,
            exported: Vec::new(),
        },
    }
}

/// Working tree of a local non-bare brain eligible for the direct path.
///
/// Eligible iff the remote is a `file://` URL naming an existing non-bare
/// repository whose checked-out branch matches the configured branch (any
/// branch qualifies when none is configured) and whose tree is clean.
fn local_brain_worktree(brain: &BrainEntry) -> Option<std::path::PathBuf> {
    let path = brain.remote.strip_prefix("file://")?;
    let root = Path::new(path);
    if !root.is_dir() || !git::is_repo(root) || git::is_bare(root).ok()? {
        return None;
    }
    if let Some(configured) = &brain.branch {
        if git::current_branch(root).ok()? != *configured {
            return None;
        }
    }
    if !git::changed_files(root).ok()?.is_empty() {
        return None;
    }
    Some(root.to_path_buf())
}

/// Copy one neuron's consumer content to `source` under `target_root`.
fn copy_neuron(mapping: &Mapping, repo_root: &Path, target_root: &Path) -> Result<()> {
    let from = repo_root.join(mapping.destination.trim_end_matches('/'));
    let to = target_root.join(mapping.source.trim_end_matches('/'));
    if !from.exists() {
        return Err(Error::Sync {
            message: format!("local neuron content missing: {}", mapping.destination),
        });
    }
    if from.is_dir() {
        filesystem::copy_dir_all(&from, &to)?;
    } else {
        filesystem::ensure_parent(&to)?;
        std::fs::copy(&from, &to)?;
    }
    Ok(())
}

/// Commit staged neuron content in `root` and return the commit id.
fn add_and_commit(root: &Path, message: &str) -> Result<String> {
    git::run_in(&["add", "."], root)?;
    git::run_in(&["commit", "-m", message], root)?;
    git::run_in(&["rev-parse", "HEAD"], root)
}

/// Direct path: commit straight into the local brain's working tree.
fn export_direct(
    brain_root: &Path,
    _brain: &BrainEntry,
    group: &[Mapping],
    repo_root: &Path,
    message: Option<&str>,
) -> Result<ExportOutcome> {
    info!("exporting directly into {}", brain_root.display());
    for mapping in group {
        copy_neuron(mapping, repo_root, brain_root)?;
    }
    let msg = message
        .map(str::to_string)
        .unwrap_or_else(|| default_message(group));
    let commit = add_and_commit(brain_root, &msg)?;
    Ok(ExportOutcome {
        success: true,
        message: format!("committed {} directly (no push needed)", &commit[..7.min(commit.len())]),
        commit: Some(commit),
        exported: group.to_vec(),
    })
}

/// Fallback path: clone, commit, push, clean up.
fn export_via_clone(
    brain: &BrainEntry,
    group: &[Mapping],
    repo_root: &Path,
    message: Option<&str>,
) -> Result<ExportOutcome> {
    let clone = git::temp_clone(&brain.remote, brain.branch.as_deref())?;
    for mapping in group {
        copy_neuron(mapping, repo_root, clone.root())?;
    }
    let msg = message
        .map(str::to_string)
        .unwrap_or_else(|| default_message(group));
    let commit = add_and_commit(clone.root(), &msg)?;
    git::run_in(&["push", "--quiet", "origin", "HEAD"], clone.root())?;
    // The clone is removed when it drops, whether or not the push succeeded.
    Ok(ExportOutcome {
        success: true,
        message: format!("pushed {} to {}", &commit[..7.min(commit.len())], brain.remote),
        commit: Some(commit),
        exported: group.to_vec(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SyncPolicy;

    fn mapping(brain: &str, source: &str, destination: &str) -> Mapping {
        Mapping {
            brain_id: brain.into(),
            source: source.into(),
            destination: destination.into(),
            key: None,
        }
    }

    #[test]
    fn test_export_gated_by_policy() {
        let config = NeuronsConfig {
            brains: vec![(
                "b".into(),
                BrainEntry {
                    remote: "file:///tmp/nowhere".into(),
                    branch: None,
                    args: None,
                },
            )],
            policy: SyncPolicy::default(),
            mappings: Vec::new(),
        };
        let err = export_neurons(
            &config,
            &[mapping("b", "s", "d")],
            Path::new("/tmp"),
            None,
        )
        .unwrap_err();
        assert!(matches!(err, Error::Policy { .. }));
    }

    #[test]
    fn test_default_message_enumerates_pairs() {
        let group = vec![
            mapping("b", "utils/common.py", "src/shared/common_utils.py"),
            mapping("b", "assets/", "vendor/assets/"),
        ];
        let msg = default_message(&group);
        assert!(msg.contains("utils/common.py <- src/shared/common_utils.py"));
        assert!(msg.contains("assets/ <- vendor/assets/"));
        assert!(msg.lines().count() > 1);
    }

    #[test]
    fn test_local_worktree_rejects_non_file_urls() {
        let brain = BrainEntry {
            remote: "git@github.com:org/repo.git".into(),
            branch: None,
            args: None,
        };
        assert!(local_brain_worktree(&brain).is_none());
    }

    #[test]
    fn test_grouping_preserves_first_seen_order() {
        let config = NeuronsConfig {
            brains: vec![
                (
                    "beta".into(),
                    BrainEntry {
                        remote: "file:///does/not/exist".into(),
                        branch: None,
                        args: None,
                    },
                ),
                (
                    "alpha".into(),
                    BrainEntry {
                        remote: "file:///does/not/exist".into(),
                        branch: None,
                        args: None,
                    },
                ),
            ],
            policy: SyncPolicy {
                allow_push_to_brain: true,
                ..SyncPolicy::default()
            },
            mappings: Vec::new(),
        };
        let mappings = vec![
            mapping("beta", "s1", "d1"),
            mapping("alpha", "s2", "d2"),
            mapping("beta", "s3", "d3"),
        ];
        let outcomes =
            export_neurons(&config, &mappings, Path::new("/tmp"), None).unwrap();
        // Both brains fail (nonexistent remotes) but grouping and order hold.
        assert_eq!(outcomes.len(), 2);
        assert_eq!(outcomes[0].0, "beta");
        assert_eq!(outcomes[1].0, "alpha");
        assert!(!outcomes[0].1.success);
    }
}

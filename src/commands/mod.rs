//! Subcommand implementations.
//!
//! Each subcommand lives in its own module with a clap `Args` struct and an
//! `execute` function. Shared helpers for locating the consumer root and
//! loading/printing live here.

pub mod add_brain;
pub mod add_neuron;
pub mod brain_init;
pub mod checkout;
pub mod clone;
pub mod completions;
pub mod export;
pub mod init;
pub mod list;
pub mod pull;
pub mod push;
pub mod remove_neuron;
pub mod status;
pub mod sync;

use std::path::PathBuf;

use anyhow::{Context, Result};

use git_brain::config::NeuronsConfig;
use git_brain::output::OutputConfig;
use git_brain::sync::SyncResult;
use git_brain::{config, defaults, git};

/// Build the output configuration from the global `--color` flag.
pub fn output_config(color_flag: &str) -> OutputConfig {
    OutputConfig::from_env_and_flag(color_flag)
}

/// Root of the consumer repository containing the current directory.
///
/// Falls back to the current directory when it is not inside a git
/// repository, so descriptor-only commands still work before `git init`.
pub(crate) fn consumer_root() -> Result<PathBuf> {
    let cwd = std::env::current_dir().context("Failed to get current directory")?;
    Ok(git::toplevel(&cwd).unwrap_or(cwd))
}

/// Load the consumer descriptor from the repository root.
pub(crate) fn load_neurons_config(root: &std::path::Path) -> Result<NeuronsConfig> {
    let path = root.join(defaults::NEURONS_FILE);
    config::load_neurons(&path).with_context(|| {
        format!(
            "No usable {} file at {}; run `git-brain init` first",
            defaults::NEURONS_FILE,
            root.display()
        )
    })
}

/// Print per-neuron sync results; returns true when every neuron succeeded.
pub(crate) fn print_sync_results(results: &[SyncResult]) -> bool {
    let mut ok = true;
    for result in results {
        if result.success {
            let mut line = format!("  {:9} {}", result.action.to_string(), result.destination);
            if result.requirements_merged {
                line.push_str("  (requirements merged)");
            }
            println!("{}", line);
        } else {
            ok = false;
            println!("  error     {}: {}", result.destination, result.message);
        }
    }
    ok
}

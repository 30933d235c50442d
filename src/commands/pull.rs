//! pull command implementation
//!
//! Runs `git pull`, then synchronizes neurons when `AUTO_SYNC_ON_PULL` is
//! enabled in the consumer's sync policy.

use anyhow::Result;
use clap::Args;

use git_brain::sync::{self, SyncOptions};
use git_brain::git;

/// Arguments for the pull command
#[derive(Args, Debug)]
pub struct PullArgs {
    /// Extra arguments forwarded to git pull
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub git_args: Vec<String>,
}

/// Execute the `pull` command.
pub fn execute(args: PullArgs) -> Result<()> {
    let root = super::consumer_root()?;

    let mut git_args = vec!["pull".to_string()];
    git_args.extend(args.git_args);
    let arg_refs: Vec<&str> = git_args.iter().map(String::as_str).collect();
    let code = git::passthrough(&arg_refs, Some(&root))?;
    if code != 0 {
        std::process::exit(code);
    }

    let Ok(cfg) = super::load_neurons_config(&root) else {
        return Ok(());
    };
    if !cfg.policy.auto_sync_on_pull || cfg.mappings.is_empty() {
        return Ok(());
    }

    println!("Syncing {} neuron(s) after pull:", cfg.mappings.len());
    let options = SyncOptions {
        interactive: console::user_attended(),
        ..SyncOptions::default()
    };
    let results = sync::sync_all(&cfg, &root, &options);
    if !super::print_sync_results(&results) {
        std::process::exit(git_brain::exit_codes::ERROR);
    }
    Ok(())
}

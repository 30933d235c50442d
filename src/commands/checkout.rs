//! checkout command implementation
//!
//! Runs `git checkout`, then synchronizes neurons when
//! `AUTO_SYNC_ON_CHECKOUT` is enabled in the sync policy.

use anyhow::Result;
use clap::Args;

use git_brain::sync::{self, SyncOptions};
use git_brain::git;

/// Arguments for the checkout command
#[derive(Args, Debug)]
pub struct CheckoutArgs {
    /// Extra arguments forwarded to git checkout
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub git_args: Vec<String>,
}

/// Execute the `checkout` command.
pub fn execute(args: CheckoutArgs) -> Result<()> {
    let root = super::consumer_root()?;

    let mut git_args = vec!["checkout".to_string()];
    git_args.extend(args.git_args);
    let arg_refs: Vec<&str> = git_args.iter().map(String::as_str).collect();
    let code = git::passthrough(&arg_refs, Some(&root))?;
    if code != 0 {
        std::process::exit(code);
    }

    let Ok(cfg) = super::load_neurons_config(&root) else {
        return Ok(());
    };
    if !cfg.policy.auto_sync_on_checkout || cfg.mappings.is_empty() {
        return Ok(());
    }

    println!("Syncing {} neuron(s) after checkout:", cfg.mappings.len());
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

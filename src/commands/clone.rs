//! clone command implementation
//!
//! Runs `git clone`; when the fresh clone carries a `.neurons` descriptor,
//! its neurons are synchronized in place so the checkout is complete.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use git_brain::sync::{self, SyncOptions};
use git_brain::{config, defaults, git};

/// Arguments for the clone command
#[derive(Args, Debug)]
pub struct CloneArgs {
    /// Repository URL to clone
    pub url: String,

    /// Target directory (git's default when omitted)
    pub directory: Option<String>,

    /// Extra arguments forwarded to git clone
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub git_args: Vec<String>,
}

/// Directory a clone of `url` lands in when none is given.
fn default_clone_dir(url: &str) -> String {
    url.trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or(url)
        .trim_end_matches(".git")
        .to_string()
}

/// Execute the `clone` command.
pub fn execute(args: CloneArgs) -> Result<()> {
    let mut git_args = vec!["clone".to_string(), args.url.clone()];
    if let Some(dir) = &args.directory {
        git_args.push(dir.clone());
    }
    git_args.extend(args.git_args);
    let arg_refs: Vec<&str> = git_args.iter().map(String::as_str).collect();
    let code = git::passthrough(&arg_refs, None)?;
    if code != 0 {
        std::process::exit(code);
    }

    let target = PathBuf::from(
        args.directory
            .clone()
            .unwrap_or_else(|| default_clone_dir(&args.url)),
    );
    let descriptor = target.join(defaults::NEURONS_FILE);
    if !descriptor.exists() {
        return Ok(());
    }

    let cfg = config::load_neurons(&descriptor)?;
    if cfg.mappings.is_empty() {
        return Ok(());
    }

    println!(
        "Clone defines {} neuron(s); syncing:",
        cfg.mappings.len()
    );
    let options = SyncOptions {
        interactive: console::user_attended(),
        ..SyncOptions::default()
    };
    let results = sync::sync_all(&cfg, &target, &options);
    if !super::print_sync_results(&results) {
        std::process::exit(git_brain::exit_codes::ERROR);
    }
    Ok(())
}

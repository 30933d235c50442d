//! sync command implementation
//!
//! Synchronizes all mapped neurons (or the subset whose destinations match
//! the given paths) from their brains into the consumer working tree.

use anyhow::Result;
use clap::Args;

use git_brain::config::ConflictStrategy;
use git_brain::sync::{self, SyncOptions};

/// Arguments for the sync command
#[derive(Args, Debug)]
pub struct SyncArgs {
    /// Destination paths to sync (all mapped neurons when omitted)
    pub paths: Vec<String>,

    /// Override the conflict strategy for this call
    /// (prompt, prefer_brain, prefer_local)
    #[arg(long, value_name = "STRATEGY")]
    pub strategy: Option<String>,

    /// Allow local modifications for this call, so `prompt` actually
    /// prompts instead of degrading to prefer_brain
    #[arg(long)]
    pub reset: bool,
}

/// Execute the `sync` command.
pub fn execute(args: SyncArgs) -> Result<()> {
    let root = super::consumer_root()?;
    let cfg = super::load_neurons_config(&root)?;

    let strategy_override = args
        .strategy
        .as_deref()
        .map(str::parse::<ConflictStrategy>)
        .transpose()?;

    let options = SyncOptions {
        strategy_override,
        allow_local_override: args.reset,
        interactive: console::user_attended(),
    };

    let selected: Vec<_> = if args.paths.is_empty() {
        cfg.mappings.clone()
    } else {
        let wanted: Vec<String> = args
            .paths
            .iter()
            .map(|p| p.trim_end_matches('/').to_string())
            .collect();
        let selected: Vec<_> = cfg
            .mappings
            .iter()
            .filter(|m| wanted.contains(&m.destination.trim_end_matches('/').to_string()))
            .cloned()
            .collect();
        if selected.is_empty() {
            anyhow::bail!("No mapped neuron matches the given path(s)");
        }
        selected
    };

    if selected.is_empty() {
        println!("No neurons mapped; nothing to sync.");
        return Ok(());
    }

    println!("Syncing {} neuron(s):", selected.len());
    let results: Vec<_> = selected
        .iter()
        .map(|mapping| sync::sync_neuron(&cfg, mapping, &root, &options))
        .collect();

    let ok = super::print_sync_results(&results);
    if !ok {
        std::process::exit(git_brain::exit_codes::ERROR);
    }
    Ok(())
}

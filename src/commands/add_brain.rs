//! add-brain command implementation
//!
//! Registers (or updates) a brain in the consumer's `.neurons` file.

use anyhow::Result;
use clap::Args;

use git_brain::config::{BrainEntry, NeuronsConfig};
use git_brain::{config, defaults};

/// Arguments for the add-brain command
#[derive(Args, Debug)]
pub struct AddBrainArgs {
    /// Name under which the brain is referenced in mappings
    pub name: String,

    /// Remote URL of the brain repository
    pub remote: String,

    /// Branch to track (defaults to main)
    pub branch: Option<String>,
}

/// Execute the `add-brain` command.
pub fn execute(args: AddBrainArgs) -> Result<()> {
    let root = super::consumer_root()?;
    let path = root.join(defaults::NEURONS_FILE);

    let mut cfg = if path.exists() {
        config::load_neurons(&path)?
    } else {
        NeuronsConfig::new()
    };

    let entry = BrainEntry {
        remote: args.remote,
        branch: args.branch,
        args: None,
    };
    match cfg.brains.iter_mut().find(|(name, _)| *name == args.name) {
        Some((_, existing)) => {
            *existing = entry;
            println!("Updated brain '{}'", args.name);
        }
        None => {
            cfg.brains.push((args.name.clone(), entry));
            println!("Added brain '{}'", args.name);
        }
    }

    config::save_neurons(&cfg, &path)?;
    Ok(())
}

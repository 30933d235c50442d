//! remove-neuron command implementation
//!
//! Removes the mapping whose destination matches the given path. The local
//! copy is left in place unless `--delete` is passed.

use anyhow::Result;
use clap::Args;

use git_brain::{config, defaults};

/// Arguments for the remove-neuron command
#[derive(Args, Debug)]
pub struct RemoveNeuronArgs {
    /// Destination path of the neuron to unmap
    pub destination: String,

    /// Also delete the local file or directory
    #[arg(long)]
    pub delete: bool,
}

/// Execute the `remove-neuron` command.
pub fn execute(args: RemoveNeuronArgs) -> Result<()> {
    let root = super::consumer_root()?;
    let path = root.join(defaults::NEURONS_FILE);
    let mut cfg = super::load_neurons_config(&root)?;

    let wanted = args.destination.trim_end_matches('/');
    let before = cfg.mappings.len();
    cfg.mappings
        .retain(|m| m.destination.trim_end_matches('/') != wanted);
    if cfg.mappings.len() == before {
        anyhow::bail!("No neuron mapped to '{}'", args.destination);
    }

    config::save_neurons(&cfg, &path)?;
    println!("Unmapped '{}'", args.destination);

    if args.delete {
        let local = root.join(wanted);
        if local.is_dir() {
            std::fs::remove_dir_all(&local)?;
            println!("Deleted directory '{}'", args.destination);
        } else if local.exists() {
            std::fs::remove_file(&local)?;
            println!("Deleted file '{}'", args.destination);
        }
    }
    Ok(())
}

//! add-neuron command implementation
//!
//! Parses a `brain::source::destination` mapping (the brain part may be
//! omitted when exactly one brain is registered), appends it to `[MAP]`,
//! and syncs the new neuron immediately.

use anyhow::Result;
use clap::Args;

use git_brain::sync::{self, SyncOptions};
use git_brain::{config, defaults};

/// Arguments for the add-neuron command
#[derive(Args, Debug)]
pub struct AddNeuronArgs {
    /// Mapping as brain::source::destination (or source::destination when
    /// exactly one brain is registered)
    pub mapping: String,

    /// Config key for the mapping (defaults to a synthesized map{i})
    #[arg(long)]
    pub key: Option<String>,

    /// Add the mapping without syncing it
    #[arg(long)]
    pub no_sync: bool,
}

/// Execute the `add-neuron` command.
pub fn execute(args: AddNeuronArgs) -> Result<()> {
    let root = super::consumer_root()?;
    let path = root.join(defaults::NEURONS_FILE);
    let mut cfg = super::load_neurons_config(&root)?;

    // Reuse the descriptor parser for validation by round-tripping the
    // candidate through serialized form.
    let key = args
        .key
        .clone()
        .unwrap_or_else(|| format!("map{}", cfg.mappings.len()));
    let mut appended = config::serialize_neurons(&cfg);
    appended.push_str(&format!("{} = {}\n", key, args.mapping));
    let reparsed = config::parse_neurons(&appended)?;
    let mapping = reparsed
        .mappings
        .last()
        .expect("appended mapping parsed")
        .clone();

    if cfg
        .mappings
        .iter()
        .any(|m| m.destination == mapping.destination)
    {
        anyhow::bail!(
            "Destination '{}' is already mapped",
            mapping.destination
        );
    }

    cfg.mappings.push(mapping.clone());
    config::save_neurons(&cfg, &path)?;
    println!(
        "Mapped {}::{} -> {}",
        mapping.brain_id, mapping.source, mapping.destination
    );

    if args.no_sync {
        return Ok(());
    }

    let options = SyncOptions {
        interactive: console::user_attended(),
        ..SyncOptions::default()
    };
    let result = sync::sync_neuron(&cfg, &mapping, &root, &options);
    super::print_sync_results(std::slice::from_ref(&result));
    if !result.success {
        std::process::exit(git_brain::exit_codes::ERROR);
    }
    Ok(())
}

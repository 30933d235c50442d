//! export command implementation
//!
//! Detects locally modified neurons (or filters to the given destination
//! paths), confirms, and commits them back to their brains via the export
//! engine.

use anyhow::Result;
use clap::Args;
use dialoguer::{theme::ColorfulTheme, Confirm};

use git_brain::{export, modified};

/// Arguments for the export command
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Destination paths to export (all modified neurons when omitted)
    pub paths: Vec<String>,

    /// Skip the interactive confirmation
    #[arg(short, long)]
    pub force: bool,

    /// Commit message to use instead of the generated summary
    #[arg(short, long)]
    pub message: Option<String>,
}

/// Execute the `export` command.
pub fn execute(args: ExportArgs) -> Result<()> {
    let root = super::consumer_root()?;
    let cfg = super::load_neurons_config(&root)?;

    // Explicit paths name the neurons to export; otherwise export whatever
    // is locally modified.
    let candidates = if args.paths.is_empty() {
        modified::modified_neurons(&cfg, &root)?
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

    if candidates.is_empty() {
        println!("No modified neurons to export.");
        return Ok(());
    }

    println!("Neurons to export:");
    for mapping in &candidates {
        println!(
            "  {} <- {}  (brain '{}')",
            mapping.source, mapping.destination, mapping.brain_id
        );
    }

    if !args.force && console::user_attended() {
        let confirmed = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt("Export these neurons to their brains?")
            .default(false)
            .interact()?;
        if !confirmed {
            anyhow::bail!("Aborted by user");
        }
    }

    let outcomes = export::export_neurons(&cfg, &candidates, &root, args.message.as_deref())?;

    let mut ok = true;
    for (brain_id, outcome) in &outcomes {
        if outcome.success {
            println!("  {}: {}", brain_id, outcome.message);
        } else {
            ok = false;
            println!("  {}: export failed - {}", brain_id, outcome.message);
        }
    }
    if !ok {
        std::process::exit(git_brain::exit_codes::ERROR);
    }
    Ok(())
}

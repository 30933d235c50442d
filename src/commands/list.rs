//! list command implementation
//!
//! Prints the neuron mapping table; `--verbose` adds the brain registry
//! and the effective sync policy.

use anyhow::Result;
use clap::Args;
use console::style;

use git_brain::{filesystem, output};

/// Arguments for the list command
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Also show brains and the sync policy
    #[arg(short, long)]
    pub verbose: bool,
}

/// Execute the `list` command.
pub fn execute(args: ListArgs, color_flag: &str) -> Result<()> {
    let root = super::consumer_root()?;
    let cfg = super::load_neurons_config(&root)?;
    let out = super::output_config(color_flag);

    if args.verbose {
        println!("{}", heading(&out, "Brains"));
        if cfg.brains.is_empty() {
            println!("  (none registered)");
        }
        for (id, brain) in &cfg.brains {
            println!(
                "  {} -> {} (branch {})",
                id,
                brain.remote,
                brain.tracked_branch()
            );
        }

        let policy = &cfg.policy;
        println!("\n{}", heading(&out, "Sync policy"));
        println!("  conflict strategy:         {}", policy.conflict_strategy);
        println!("  auto sync on pull:         {}", policy.auto_sync_on_pull);
        println!("  auto sync on checkout:     {}", policy.auto_sync_on_checkout);
        println!(
            "  allow local modifications: {}",
            policy.allow_local_modifications
        );
        println!("  allow push to brain:       {}", policy.allow_push_to_brain);
        println!();
    }

    println!("{}", heading(&out, "Neurons"));
    if cfg.mappings.is_empty() {
        println!("  (none mapped)");
        return Ok(());
    }
    for mapping in &cfg.mappings {
        let mut line = format!(
            "  {}::{} -> {}",
            mapping.brain_id, mapping.source, mapping.destination
        );
        if args.verbose {
            let local = root.join(mapping.destination.trim_end_matches('/'));
            line.push_str(&match local_size(&local) {
                Some(size) => format!("  ({})", filesystem::format_size(size)),
                None => "  (not synced)".to_string(),
            });
        }
        println!("{}", line);
    }
    Ok(())
}

/// Total size of the local copy, when one exists.
fn local_size(path: &std::path::Path) -> Option<u64> {
    if path.is_file() {
        return std::fs::metadata(path).ok().map(|m| m.len());
    }
    if path.is_dir() {
        let total = walkdir::WalkDir::new(path)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter_map(|e| e.metadata().ok())
            .map(|m| m.len())
            .sum();
        return Some(total);
    }
    None
}

fn heading(out: &output::OutputConfig, text: &str) -> String {
    if out.use_color {
        style(text).bold().to_string()
    } else {
        text.to_string()
    }
}

//! brain-init command implementation
//!
//! Creates a `.brain` descriptor at the current directory, declaring the
//! brain's identity and its export table.

use anyhow::Result;
use clap::Args;
use std::path::Path;

use git_brain::config::{BrainConfig, ExportPermission, ExportRule};
use git_brain::{config, defaults};

/// Arguments for the brain-init command
#[derive(Args, Debug)]
pub struct BrainInitArgs {
    /// Identifier for this brain (referenced by consumers)
    #[arg(long)]
    pub id: String,

    /// Human-readable description
    #[arg(long)]
    pub description: Option<String>,

    /// Export rule as <path>=<readonly|readwrite> (repeatable)
    #[arg(long = "export", value_name = "PATH=PERM")]
    pub exports: Vec<String>,

    /// Overwrite an existing .brain file
    #[arg(short, long)]
    pub force: bool,
}

/// Execute the `brain-init` command.
pub fn execute(args: BrainInitArgs) -> Result<()> {
    let path = Path::new(defaults::BRAIN_FILE);
    if path.exists() && !args.force {
        anyhow::bail!(
            "{} already exists. Use --force to overwrite.",
            defaults::BRAIN_FILE
        );
    }

    let mut export = Vec::new();
    for spec in &args.exports {
        export.push(parse_export_rule(spec)?);
    }
    if export.is_empty() {
        // A brain that exports nothing is useless; default to everything
        // readonly so consumers can start mapping immediately.
        export.push(ExportRule {
            pattern: "*".to_string(),
            permission: ExportPermission::ReadOnly,
        });
    }

    let brain = BrainConfig {
        id: args.id,
        description: args.description,
        export,
        access: Vec::new(),
        update_policy: Vec::new(),
    };
    config::save_brain(&brain, path)?;

    println!("Created {} for brain '{}'", defaults::BRAIN_FILE, brain.id);
    Ok(())
}

fn parse_export_rule(spec: &str) -> Result<ExportRule> {
    let (pattern, perm) = spec
        .split_once('=')
        .map(|(p, v)| (p.trim(), v.trim()))
        .unwrap_or((spec.trim(), "readonly"));
    if pattern.is_empty() {
        anyhow::bail!("Empty path in export rule '{}'", spec);
    }
    let permission = match perm {
        "" | "readonly" => ExportPermission::ReadOnly,
        "readwrite" => ExportPermission::ReadWrite,
        other => anyhow::bail!(
            "Invalid permission '{}' in export rule '{}' (expected readonly or readwrite)",
            other,
            spec
        ),
    };
    Ok(ExportRule {
        pattern: pattern.to_string(),
        permission,
    })
}

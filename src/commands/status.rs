//! status command implementation
//!
//! Passes through to `git status`, then reports which mapped neurons carry
//! local modifications.

use anyhow::Result;
use clap::Args;

use git_brain::{git, modified};

/// Arguments for the status command
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Extra arguments forwarded to git status
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub git_args: Vec<String>,
}

/// Execute the `status` command.
pub fn execute(args: StatusArgs) -> Result<()> {
    let root = super::consumer_root()?;

    let mut git_args = vec!["status".to_string()];
    git_args.extend(args.git_args);
    let arg_refs: Vec<&str> = git_args.iter().map(String::as_str).collect();
    let code = git::passthrough(&arg_refs, Some(&root))?;
    if code != 0 {
        std::process::exit(code);
    }

    // Descriptor-less repositories get plain git status only.
    let Ok(cfg) = super::load_neurons_config(&root) else {
        return Ok(());
    };
    let modified = modified::modified_neurons(&cfg, &root)?;
    if modified.is_empty() {
        println!("\nNo mapped neurons are locally modified.");
    } else {
        println!("\nLocally modified neurons:");
        for mapping in &modified {
            println!(
                "  {} (from brain '{}')",
                mapping.destination, mapping.brain_id
            );
        }
        println!("Use `git-brain export` to send them back, or `git-brain sync` to reset.");
    }
    Ok(())
}

//! init command implementation
//!
//! Runs `git init` (unless already inside a repository) and writes a
//! skeleton `.neurons` descriptor with the default sync policy, ready for
//! `add-brain` and `add-neuron`.

use anyhow::Result;
use clap::Args;

use git_brain::config::NeuronsConfig;
use git_brain::{config, defaults, git};

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Overwrite an existing .neurons file
    #[arg(short, long)]
    pub force: bool,
}

/// Execute the `init` command.
pub fn execute(args: InitArgs) -> Result<()> {
    let cwd = std::env::current_dir()?;
    if !git::is_repo(&cwd) {
        let code = git::passthrough(&["init"], Some(&cwd))?;
        if code != 0 {
            std::process::exit(code);
        }
    }

    let path = cwd.join(defaults::NEURONS_FILE);
    if path.exists() && !args.force {
        anyhow::bail!(
            "{} already exists. Use --force to overwrite.",
            defaults::NEURONS_FILE
        );
    }

    config::save_neurons(&NeuronsConfig::new(), &path)?;
    println!("Created {}", defaults::NEURONS_FILE);
    println!("Next: `git-brain add-brain <name> <remote> [branch]`");
    Ok(())
}

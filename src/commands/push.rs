//! push command implementation
//!
//! Runs `git push`; afterwards, when modified neurons exist and export is
//! enabled, reminds the user that `export` would send them upstream.

use anyhow::Result;
use clap::Args;

use git_brain::{git, modified};

/// Arguments for the push command
#[derive(Args, Debug)]
pub struct PushArgs {
    /// Extra arguments forwarded to git push
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub git_args: Vec<String>,
}

/// Execute the `push` command.
pub fn execute(args: PushArgs) -> Result<()> {
    let root = super::consumer_root()?;

    let mut git_args = vec!["push".to_string()];
    git_args.extend(args.git_args);
    let arg_refs: Vec<&str> = git_args.iter().map(String::as_str).collect();
    let code = git::passthrough(&arg_refs, Some(&root))?;
    if code != 0 {
        std::process::exit(code);
    }

    let Ok(cfg) = super::load_neurons_config(&root) else {
        return Ok(());
    };
    if !cfg.policy.allow_push_to_brain {
        return Ok(());
    }
    let modified = modified::modified_neurons(&cfg, &root)?;
    if !modified.is_empty() {
        println!(
            "\n{} modified neuron(s) were not exported; run `git-brain export` to send them upstream.",
            modified.len()
        );
    }
    Ok(())
}

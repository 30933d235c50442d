//! # CLI Argument Parsing and Command Dispatch
//!
//! This module defines the command-line interface for the `git-brain` tool
//! using the `clap` library. It is responsible for:
//!
//! - Defining the top-level CLI structure, including global arguments like
//!   `--color` and `--log-level`.
//! - Defining the available subcommands (e.g., `sync`, `export`, `list`).
//! - Dispatching to the appropriate command implementation based on the
//!   parsed arguments.
//!
//! Each subcommand is implemented in its own module under `src/commands/` to
//! keep the code organized and maintainable.

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use log::LevelFilter;

use crate::commands;

/// git-brain - Share versioned files between Git repositories
#[derive(Parser, Debug)]
#[command(name = "git-brain")]
#[command(
    version,
    about,
    long_about = "git-brain - Declaratively share files (neurons) from brain repositories"
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Colorize output (always, never, auto)
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    color: String,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, global = true, value_name = "LEVEL", default_value = "warn")]
    log_level: String,

    /// Increase output verbosity (can be repeated: --verbose --verbose)
    #[arg(long, global = true, action = ArgAction::Count, conflicts_with = "quiet")]
    verbose: u8,

    /// Suppress output except errors
    #[arg(long, global = true, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create a .brain descriptor in the current brain repository
    BrainInit(commands::brain_init::BrainInitArgs),

    /// Initialize a consumer repository with a skeleton .neurons file
    Init(commands::init::InitArgs),

    /// Register a brain in the .neurons file
    AddBrain(commands::add_brain::AddBrainArgs),

    /// Map a neuron from a brain and sync it immediately
    AddNeuron(commands::add_neuron::AddNeuronArgs),

    /// Remove a neuron mapping (optionally deleting the local copy)
    RemoveNeuron(commands::remove_neuron::RemoveNeuronArgs),

    /// Synchronize neurons from their brains
    Sync(commands::sync::SyncArgs),

    /// Export locally modified neurons back to their brains
    Export(commands::export::ExportArgs),

    /// List configured brains and neuron mappings
    List(commands::list::ListArgs),

    /// Show git status plus locally modified neurons
    Status(commands::status::StatusArgs),

    /// git pull, then sync neurons when the policy says so
    Pull(commands::pull::PullArgs),

    /// git push, with a reminder when modified neurons could be exported
    Push(commands::push::PushArgs),

    /// git checkout, then sync neurons when the policy says so
    Checkout(commands::checkout::CheckoutArgs),

    /// git clone, then sync neurons inside the fresh clone
    Clone(commands::clone::CloneArgs),

    /// Generate shell completion scripts
    Completions(commands::completions::CompletionsArgs),
}

impl Cli {
    /// Execute the parsed CLI command
    pub fn execute(self) -> Result<()> {
        self.init_logger()?;

        match self.command {
            Commands::BrainInit(args) => commands::brain_init::execute(args),
            Commands::Init(args) => commands::init::execute(args),
            Commands::AddBrain(args) => commands::add_brain::execute(args),
            Commands::AddNeuron(args) => commands::add_neuron::execute(args),
            Commands::RemoveNeuron(args) => commands::remove_neuron::execute(args),
            Commands::Sync(args) => commands::sync::execute(args),
            Commands::Export(args) => commands::export::execute(args),
            Commands::List(args) => commands::list::execute(args, &self.color),
            Commands::Status(args) => commands::status::execute(args),
            Commands::Pull(args) => commands::pull::execute(args),
            Commands::Push(args) => commands::push::execute(args),
            Commands::Checkout(args) => commands::checkout::execute(args),
            Commands::Clone(args) => commands::clone::execute(args),
            Commands::Completions(args) => commands::completions::execute(args),
        }
    }

    /// Initialize the logger with the specified log level and color settings
    fn init_logger(&self) -> Result<()> {
        let log_level = self.parse_log_level()?;
        let use_color = crate::commands::output_config(&self.color).use_color;

        env_logger::Builder::from_default_env()
            .filter_level(log_level)
            .write_style(if use_color {
                env_logger::WriteStyle::Auto
            } else {
                env_logger::WriteStyle::Never
            })
            .format_timestamp(None)
            .format_module_path(false)
            .format_target(false)
            .try_init()
            .map_err(|e| anyhow::anyhow!("Failed to initialize logger: {}", e))?;

        Ok(())
    }

    /// Parse the log level, considering --verbose and --quiet flags
    ///
    /// Priority order:
    /// 1. --quiet (always sets to Error level)
    /// 2. --verbose (sets Debug for 1, Trace for 2+)
    /// 3. --log-level (explicit level)
    fn parse_log_level(&self) -> Result<LevelFilter> {
        if self.quiet {
            return Ok(LevelFilter::Error);
        }

        if self.verbose > 0 {
            return Ok(match self.verbose {
                1 => LevelFilter::Debug,
                _ => LevelFilter::Trace,
            });
        }

        match self.log_level.to_lowercase().as_str() {
            "error" => Ok(LevelFilter::Error),
            "warn" => Ok(LevelFilter::Warn),
            "info" => Ok(LevelFilter::Info),
            "debug" => Ok(LevelFilter::Debug),
            "trace" => Ok(LevelFilter::Trace),
            "off" => Ok(LevelFilter::Off),
            _ => Err(anyhow::anyhow!(
                "Invalid log level: '{}'. Valid options are: error, warn, info, debug, trace, off",
                self.log_level
            )),
        }
    }
}

//! # git-brain Library
//!
//! Core functionality for the `git-brain` Git extension, which lets a
//! consumer repository declaratively import versioned files and directories
//! ("neurons") from upstream "brain" repositories, keep them synchronized,
//! and export local modifications back upstream.
//!
//! ## Core Concepts
//!
//! - **Configuration (`config`)**: typed representations of the `.brain`
//!   descriptor (what a brain exports) and the `.neurons` descriptor (which
//!   brains a consumer tracks, its sync policy, and the neuron mapping
//!   table), with a case-sensitive INI parser/serializer.
//! - **Git driver (`git`)**: the only place that spawns the `git`
//!   executable or parses porcelain output. Commands run with a timeout and
//!   produce typed errors carrying git's stderr.
//! - **Sync engine (`sync`)**: materializes each neuron from a scoped temp
//!   clone of its brain, resolving conflicts through the `conflict` module
//!   and folding neuron dependency manifests via `requirements`.
//! - **Export engine (`export`)**: the inverse operation, committing
//!   modified neurons back to their brains either directly (local non-bare
//!   brain) or through a clone-commit-push cycle.
//! - **Modified-neuron detection (`modified`)**: maps git's changed-file
//!   set onto the mapping table, matching directory neurons by prefix.
//!
//! ## Execution Flow
//!
//! A sync loads the consumer descriptor, then for each mapping clones the
//! brain at its tracked branch into a temp directory that is removed on
//! every exit path, materializes the neuron, and reports a per-neuron
//! result; failures never abort the batch. Export groups modified neurons
//! by brain and commits each group once.

pub mod config;
pub mod conflict;
pub mod defaults;
pub mod error;
pub mod export;
pub mod filesystem;
pub mod git;
pub mod modified;
pub mod output;
pub mod requirements;
pub mod sync;

/// Process exit codes used by the CLI.
pub mod exit_codes {
    /// Successful completion.
    pub const SUCCESS: i32 = 0;
    /// Policy or core error.
    pub const ERROR: i32 = 1;
}

//! Error handling types for the git-brain application

use thiserror::Error;

/// Main error type for git-brain operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("Brain configuration error: {message}")]
    BrainConfig { message: String },

    #[error("Neurons configuration error: {message}")]
    NeuronsConfig { message: String },

    #[error("Git command failed: git {command} - {stderr}")]
    GitCommand { command: String, stderr: String },

    #[error("Git command timed out after {seconds}s: git {command}")]
    GitTimeout { command: String, seconds: u64 },

    #[error("Failed to execute git: {message}")]
    GitExecution { message: String },

    #[error("Git executable not found on PATH")]
    GitNotFound,

    #[error("Source path '{source_path}' not found in brain '{brain_id}'")]
    SourceNotFound { brain_id: String, source_path: String },

    #[error("Sync error: {message}")]
    Sync { message: String },

    #[error("Policy error: {message}")]
    Policy { message: String },

    #[error("Aborted by user")]
    UserAbort,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for git-brain operations
pub type Result<T> = std::result::Result<T, Error>;

//! Error types for the `appdeploy` CLI.
//!
//! Deployment failures are outcomes, reported by the deployer itself. The
//! variants here cover what goes wrong before a deployment can start.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that stop the CLI before a deployment runs.
#[derive(Debug, Error)]
pub enum CliError {
    /// The configuration file exists but could not be read.
    #[error("could not read configuration file {}: {source}", path.display())]
    ConfigRead {
        /// Location of the configuration file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML or has unknown keys.
    #[error("invalid configuration file {}: {reason}", path.display())]
    ConfigParse {
        /// Location of the configuration file.
        path: PathBuf,
        /// Parser message.
        reason: String,
    },

    /// The deploy target is neither `local` nor an HTTP(S) URL.
    #[error("invalid target '{target}': expected 'local' or an http(s):// URL")]
    InvalidTarget {
        /// The rejected target.
        target: String,
    },
}

/// Result type for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

//! Command-line client for the `appdeploy` library.
//!
//! The `appdeploy` binary resolves its settings from flags, the environment
//! and a configuration file, then runs a single deployment and maps the
//! outcome to an exit status.
//!
//! # Modules
//!
//! - [`cli`] - Command-line argument definitions
//! - [`config`] - Configuration file loading and settings precedence
//! - [`dirs`] - Directory resolution abstraction for platform-specific paths
//! - [`error`] - CLI error types
//! - [`output`] - Terminal presentation of deployment messages
//! - [`run`] - Deployment execution for a parsed command
//! - [`target`] - Deploy target aliasing and validation

pub mod cli;
pub mod config;
pub mod dirs;
pub mod error;
pub mod output;
pub mod run;
pub mod target;

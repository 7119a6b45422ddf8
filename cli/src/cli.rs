//! CLI argument definitions for the `appdeploy` binary.
//!
//! This module defines the command-line interface using clap. It is separated
//! from the main entrypoint so that parsing can be tested without running a
//! deployment.

use camino::{Utf8Path, Utf8PathBuf};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Deserialize;

/// Deploy application packages to an activation service.
#[derive(Parser, Debug)]
#[command(name = "appdeploy")]
#[command(version, about)]
#[command(after_help = concat!(
    "TARGETS:\n",
    "  local                 The config server on this machine (http://127.0.0.1:19071)\n",
    "  http(s)://HOST:PORT   Any other config server\n\n",
    "The target is taken from --target, then APPDEPLOY_TARGET, then the\n",
    "configuration file, and defaults to local.\n\n",
    "EXAMPLES:\n",
    "  Deploy the application in the current directory:\n",
    "    $ appdeploy deploy\n\n",
    "  Prepare a packaged application without activating it:\n",
    "    $ appdeploy prepare target/application.zip\n\n",
    "  Activate the prepared application on a remote config server:\n",
    "    $ appdeploy activate -t http://config.example.com:19071",
))]
pub struct Cli {
    /// When to colour output [default: auto].
    #[arg(long, value_enum, global = true, value_name = "WHEN")]
    pub color: Option<ColorChoice>,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Prepare and activate an application package.
    Deploy(DeployArgs),

    /// Prepare an application package without activating it.
    Prepare(DeployArgs),

    /// Activate a previously prepared application package.
    Activate(TargetArgs),
}

impl Command {
    /// Returns `true` when the package should only be prepared.
    #[must_use]
    pub const fn prepare_only(&self) -> bool {
        matches!(self, Self::Prepare(_))
    }

    /// Application path handed to the deployer.
    ///
    /// Activation carries no application path, which selects the activate
    /// endpoint.
    #[must_use]
    pub fn application(&self) -> &Utf8Path {
        match self {
            Self::Deploy(args) | Self::Prepare(args) => &args.application,
            Self::Activate(_) => Utf8Path::new(""),
        }
    }

    /// Target given on the command line, if any.
    #[must_use]
    pub fn target(&self) -> Option<&str> {
        let args = match self {
            Self::Deploy(args) | Self::Prepare(args) => &args.target,
            Self::Activate(args) => args,
        };
        args.target.as_deref()
    }
}

/// Arguments for the deploy and prepare commands.
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct DeployArgs {
    /// Application directory, Maven project or zip archive.
    #[arg(value_name = "APPLICATION", default_value = ".")]
    pub application: Utf8PathBuf,

    /// Deploy target selection.
    #[command(flatten)]
    pub target: TargetArgs,
}

/// Deploy target selection shared by every command.
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetArgs {
    /// `local` or the URL of the config server.
    #[arg(short, long, value_name = "TARGET")]
    pub target: Option<String>,
}

/// Colour policy for terminal output.
#[derive(ValueEnum, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ColorChoice {
    /// Colour when writing to a terminal and `NO_COLOR` is unset.
    #[default]
    Auto,
    /// Always colour.
    Always,
    /// Never colour.
    Never,
}

impl ColorChoice {
    /// Decide whether to colour a stream.
    ///
    /// # Examples
    ///
    /// ```
    /// use appdeploy_cli::cli::ColorChoice;
    ///
    /// assert!(ColorChoice::Auto.enabled(true, false));
    /// assert!(!ColorChoice::Auto.enabled(true, true));
    /// assert!(ColorChoice::Always.enabled(false, true));
    /// ```
    #[must_use]
    pub const fn enabled(self, is_term: bool, no_color: bool) -> bool {
        match self {
            Self::Auto => is_term && !no_color,
            Self::Always => true,
            Self::Never => false,
        }
    }
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;

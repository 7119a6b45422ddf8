//! Configuration loading and settings precedence.
//!
//! Settings come from four layers, highest priority first: command-line
//! flags, the `APPDEPLOY_TARGET` environment variable, `config.toml` in the
//! platform configuration directory, and built-in defaults.

use std::path::Path;

use log::debug;
use serde::Deserialize;

use crate::cli::{Cli, ColorChoice};
use crate::dirs::BaseDirs;
use crate::error::{CliError, Result};
use crate::target::LOCAL_TARGET;

/// File name of the configuration file inside the configuration directory.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Environment variable overriding the configured target.
pub const TARGET_ENV: &str = "APPDEPLOY_TARGET";

/// Contents of `config.toml`. Every key is optional.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Default deploy target, `local` or a config server URL.
    pub target: Option<String>,
    /// Default colour policy.
    pub color: Option<ColorChoice>,
}

impl Config {
    /// Load `config.toml` from the configuration directory of `dirs`.
    ///
    /// A platform without a configuration directory, or a missing file,
    /// yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::ConfigRead`] when the file exists but cannot be
    /// read, and [`CliError::ConfigParse`] when it is malformed.
    pub fn load(dirs: &dyn BaseDirs) -> Result<Self> {
        let Some(dir) = dirs.config_dir() else {
            debug!("no configuration directory on this platform");
            return Ok(Self::default());
        };
        Self::from_path(&dir.join(CONFIG_FILE_NAME))
    }

    /// Load a configuration file, treating a missing file as empty.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::ConfigRead`] or [`CliError::ConfigParse`] as for
    /// [`Config::load`].
    pub fn from_path(path: &Path) -> Result<Self> {
        let source = match std::fs::read_to_string(path) {
            Ok(source) => source,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!("no configuration file at {}", path.display());
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(CliError::ConfigRead {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        debug!("loading configuration from {}", path.display());
        toml::from_str(&source).map_err(|err| CliError::ConfigParse {
            path: path.to_path_buf(),
            reason: err.message().to_owned(),
        })
    }
}

/// Effective settings for one invocation.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Settings {
    /// Target as given, before aliasing.
    pub target: String,
    /// Colour policy.
    pub color: ColorChoice,
}

impl Settings {
    /// Merge the layers in precedence order.
    ///
    /// # Examples
    ///
    /// ```
    /// use appdeploy_cli::cli::Cli;
    /// use appdeploy_cli::config::{Config, Settings};
    /// use clap::Parser;
    ///
    /// let cli = Cli::parse_from(["appdeploy", "deploy"]);
    /// let config = Config {
    ///     target: Some("http://cfg.example.com:19071".to_owned()),
    ///     color: None,
    /// };
    /// let settings = Settings::resolve(&cli, &config, Some("http://env:19071".to_owned()));
    /// assert_eq!(settings.target, "http://env:19071");
    /// ```
    #[must_use]
    pub fn resolve(cli: &Cli, config: &Config, env_target: Option<String>) -> Self {
        let target = cli
            .command
            .target()
            .map(str::to_owned)
            .or(env_target)
            .or_else(|| config.target.clone())
            .unwrap_or_else(|| LOCAL_TARGET.to_owned());
        let color = cli.color.or(config.color).unwrap_or_default();
        Self { target, color }
    }
}

/// The target named by `APPDEPLOY_TARGET`, ignoring blank values.
#[must_use]
pub fn env_target() -> Option<String> {
    std::env::var(TARGET_ENV)
        .ok()
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}

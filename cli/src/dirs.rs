//! Directory resolution abstraction for platform-specific paths.
//!
//! The configuration loader asks a [`BaseDirs`] implementation where the
//! configuration directory lives, so tests can point it anywhere.

use std::path::PathBuf;

use directories_next::ProjectDirs;

/// Application name used for the platform directories.
pub const APPLICATION_NAME: &str = "appdeploy";

/// Resolves the directories the CLI reads from.
#[cfg_attr(test, mockall::automock)]
pub trait BaseDirs {
    /// Directory holding `config.toml`, if the platform defines one.
    fn config_dir(&self) -> Option<PathBuf>;
}

/// [`BaseDirs`] backed by the platform conventions.
///
/// On Linux this honours `XDG_CONFIG_HOME`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemBaseDirs;

impl BaseDirs for SystemBaseDirs {
    fn config_dir(&self) -> Option<PathBuf> {
        ProjectDirs::from("", "", APPLICATION_NAME).map(|dirs| dirs.config_dir().to_path_buf())
    }
}

//! Deploy target aliasing and validation.

use crate::error::{CliError, Result};

/// Alias for the config server on this machine.
pub const LOCAL_TARGET: &str = "local";

/// URL the [`LOCAL_TARGET`] alias stands for.
pub const LOCAL_TARGET_URL: &str = "http://127.0.0.1:19071";

/// Resolve a target to the base URL of a config server.
///
/// `local` maps to [`LOCAL_TARGET_URL`]. Anything else must be an `http://`
/// or `https://` URL with a host; trailing slashes are removed.
///
/// # Errors
///
/// Returns [`CliError::InvalidTarget`] for any other value.
///
/// # Examples
///
/// ```
/// use appdeploy_cli::target::resolve_target;
///
/// assert_eq!(resolve_target("local").unwrap(), "http://127.0.0.1:19071");
/// assert_eq!(
///     resolve_target("https://cfg.example.com:19071/").unwrap(),
///     "https://cfg.example.com:19071"
/// );
/// assert!(resolve_target("cfg.example.com").is_err());
/// ```
pub fn resolve_target(target: &str) -> Result<String> {
    if target == LOCAL_TARGET {
        return Ok(LOCAL_TARGET_URL.to_owned());
    }

    let trimmed = target.trim_end_matches('/');
    let host = trimmed
        .strip_prefix("http://")
        .or_else(|| trimmed.strip_prefix("https://"));
    match host {
        Some(rest) if !rest.is_empty() && !rest.contains(char::is_whitespace) => {
            Ok(trimmed.to_owned())
        }
        _ => Err(CliError::InvalidTarget {
            target: target.to_owned(),
        }),
    }
}

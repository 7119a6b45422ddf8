//! Deployment execution for a parsed command.

use appdeploy::Deployer;
use appdeploy::report::Reporter;
use appdeploy::transport::HttpTransport;
use log::debug;

use crate::cli::Command;
use crate::error::Result;
use crate::target::resolve_target;

/// Run the deployment `command` describes against `target`.
///
/// Returns `true` only when the service accepted the package. Every other
/// outcome has already been reported through `reporter` or by `transport`.
///
/// # Errors
///
/// Returns [`crate::error::CliError::InvalidTarget`] when `target` is not a
/// supported target; nothing is sent in that case.
pub fn execute(
    command: &Command,
    target: &str,
    transport: &dyn HttpTransport,
    reporter: &dyn Reporter,
) -> Result<bool> {
    let url = resolve_target(target)?;
    debug!("resolved target {target} to {url}");
    let outcome =
        Deployer::new(transport, reporter).deploy(command.prepare_only(), command.application(), &url);
    Ok(outcome.is_some_and(|result| result.is_success()))
}

/// Process exit status for a finished run.
#[must_use]
pub const fn exit_code(succeeded: bool) -> i32 {
    if succeeded { 0 } else { 1 }
}

//! Deployment orchestration.
//!
//! [`Deployer::deploy`] runs one deployment: resolve the package, archive it
//! when it is a directory, open the archive, submit it to the activation
//! service and classify the response. Every invocation yields at most one
//! [`DeployOutcome`] and issues at most one request.

use std::fs::File;
use std::path::Path;
use std::time::Duration;

use camino::{Utf8Path, Utf8PathBuf};
use log::debug;
use tempfile::NamedTempFile;
use ureq::http::Uri;

use crate::archive::build_archive;
use crate::package::{ApplicationPackage, find_application_package};
use crate::report::Reporter;
use crate::transport::{DeployRequest, HttpResponse, HttpTransport, ZIP_CONTENT_TYPE, host_of};

/// Upper bound on a single deployment request.
pub const DEPLOY_TIMEOUT: Duration = Duration::from_secs(10 * 60);

/// Name of the remote service used in failure messages.
pub const SERVICE_NAME: &str = "Deploy service";

/// Path of the deploy API below the target, up to the operation segment.
const DEPLOY_API: &str = "/application/v2/tenant/default";

/// Remote operation selected by the request path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Validate the package without making it live.
    Prepare,
    /// Make a previously prepared package live.
    Activate,
    /// Validate the package and make it live.
    PrepareAndActivate,
}

impl Operation {
    /// Pick the operation for a deploy call.
    ///
    /// Prepare-only mode wins; otherwise an empty application path means
    /// activate and anything else means prepare-and-activate.
    ///
    /// # Examples
    ///
    /// ```
    /// use appdeploy::deploy::Operation;
    /// use camino::Utf8Path;
    ///
    /// assert_eq!(Operation::select(true, Utf8Path::new("app")), Operation::Prepare);
    /// assert_eq!(Operation::select(false, Utf8Path::new("")), Operation::Activate);
    /// assert_eq!(
    ///     Operation::select(false, Utf8Path::new("app")),
    ///     Operation::PrepareAndActivate
    /// );
    /// ```
    #[must_use]
    pub fn select(prepare_only: bool, application: &Utf8Path) -> Self {
        if prepare_only {
            Self::Prepare
        } else if application.as_str().is_empty() {
            Self::Activate
        } else {
            Self::PrepareAndActivate
        }
    }

    /// The final path segment of the deploy endpoint.
    #[must_use]
    pub const fn path_segment(self) -> &'static str {
        match self {
            Self::Prepare => "prepare",
            Self::Activate => "activate",
            Self::PrepareAndActivate => "prepareandactivate",
        }
    }

    /// Full endpoint URL for this operation against `target`.
    ///
    /// # Examples
    ///
    /// ```
    /// use appdeploy::deploy::Operation;
    ///
    /// assert_eq!(
    ///     Operation::Prepare.url("http://127.0.0.1:19071"),
    ///     "http://127.0.0.1:19071/application/v2/tenant/default/prepare"
    /// );
    /// ```
    #[must_use]
    pub fn url(self, target: &str) -> String {
        format!("{target}{DEPLOY_API}/{}", self.path_segment())
    }
}

/// The single result of a deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeployOutcome {
    /// The service accepted the package.
    Success {
        /// Resolved location of the deployed package.
        path: Utf8PathBuf,
    },
    /// The service rejected the package content (4xx).
    PackageError {
        /// HTTP status code.
        status: u16,
        /// Server explanation, verbatim.
        message: String,
    },
    /// The service failed to process the request (any other non-200).
    ServiceError {
        /// `host[:port]` of the service.
        host: String,
        /// HTTP status code.
        status: u16,
        /// Server explanation, verbatim.
        message: String,
    },
    /// The deployment could not proceed locally; nothing was sent.
    LocalError {
        /// Headline describing what failed.
        message: String,
        /// Underlying cause, when one is available.
        detail: Option<String>,
    },
}

impl DeployOutcome {
    /// Classify an HTTP response for `package`.
    ///
    /// # Examples
    ///
    /// ```
    /// use appdeploy::{ApplicationPackage, DeployOutcome};
    /// use appdeploy::transport::HttpResponse;
    ///
    /// let package = ApplicationPackage::new("app.zip");
    /// let outcome = DeployOutcome::classify(
    ///     &package,
    ///     "127.0.0.1:19071",
    ///     HttpResponse::new(401, "bad package"),
    /// );
    /// assert!(matches!(outcome, DeployOutcome::PackageError { status: 401, .. }));
    /// ```
    #[must_use]
    pub fn classify(package: &ApplicationPackage, host: &str, response: HttpResponse) -> Self {
        match response.status {
            200 => Self::Success {
                path: package.path().to_owned(),
            },
            status @ 400..=499 => Self::PackageError {
                status,
                message: response.body,
            },
            status => Self::ServiceError {
                host: host.to_owned(),
                status,
                message: response.body,
            },
        }
    }

    /// Returns `true` for [`DeployOutcome::Success`].
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Render the outcome through `reporter`.
    pub fn report(&self, reporter: &dyn Reporter) {
        match self {
            Self::Success { path } => reporter.success(&format!("Deployed {path}")),
            Self::PackageError { status, message } => {
                reporter.error(&format!("Invalid application package (Status {status}):"));
                reporter.detail(message);
            }
            Self::ServiceError {
                host,
                status,
                message,
            } => {
                let service = SERVICE_NAME.to_lowercase();
                reporter.error(&format!(
                    "Error from {service} at {host} (Status {status}):"
                ));
                reporter.detail(message);
            }
            Self::LocalError { message, detail } => {
                reporter.error(message);
                if let Some(cause) = detail {
                    reporter.detail(cause);
                }
            }
        }
    }

    fn local(message: impl Into<String>) -> Self {
        Self::LocalError {
            message: message.into(),
            detail: None,
        }
    }

    fn local_with_detail(message: impl Into<String>, detail: &impl std::fmt::Display) -> Self {
        Self::LocalError {
            message: message.into(),
            detail: Some(detail.to_string()),
        }
    }
}

/// The archive submitted for a package.
///
/// A temporary archive is deleted when this value is dropped, which happens
/// on every exit path out of [`Deployer::deploy`].
enum StagedArchive {
    Existing(Utf8PathBuf),
    Temporary(NamedTempFile),
}

impl StagedArchive {
    fn path(&self) -> &Path {
        match self {
            Self::Existing(path) => path.as_std_path(),
            Self::Temporary(file) => file.path(),
        }
    }
}

/// Runs deployments through injected transport and presentation
/// capabilities.
pub struct Deployer<'a> {
    transport: &'a dyn HttpTransport,
    reporter: &'a dyn Reporter,
    scratch_dir: Option<Utf8PathBuf>,
}

impl<'a> Deployer<'a> {
    /// Create a deployer that sends requests through `transport` and renders
    /// outcomes through `reporter`.
    #[must_use]
    pub fn new(transport: &'a dyn HttpTransport, reporter: &'a dyn Reporter) -> Self {
        Self {
            transport,
            reporter,
            scratch_dir: None,
        }
    }

    /// Create temporary archives in `dir` instead of the system temporary
    /// directory.
    #[must_use]
    pub fn with_scratch_dir(mut self, dir: impl Into<Utf8PathBuf>) -> Self {
        self.scratch_dir = Some(dir.into());
        self
    }

    /// Deploy the package found at `application` to `target`.
    ///
    /// With `prepare_only` the package is validated but not activated. An
    /// empty `application` activates a previously prepared package.
    ///
    /// The outcome is reported through the reporter and returned. `None`
    /// means the transport obtained no response and has reported the failure
    /// itself.
    #[must_use]
    pub fn deploy(
        &self,
        prepare_only: bool,
        application: &Utf8Path,
        target: &str,
    ) -> Option<DeployOutcome> {
        let outcome = self.run(prepare_only, application, target)?;
        outcome.report(self.reporter);
        Some(outcome)
    }

    fn run(
        &self,
        prepare_only: bool,
        application: &Utf8Path,
        target: &str,
    ) -> Option<DeployOutcome> {
        let package = match find_application_package(application) {
            Ok(package) => package,
            Err(err) => return Some(DeployOutcome::local(err.to_string())),
        };

        let staged = match self.stage(&package) {
            Ok(staged) => staged,
            Err(outcome) => return Some(outcome),
        };

        let mut body = match File::open(staged.path()) {
            Ok(file) => file,
            Err(err) => {
                return Some(DeployOutcome::local_with_detail(
                    format!("Could not open application package at {}", package.path()),
                    &err,
                ));
            }
        };

        let url = Operation::select(prepare_only, application).url(target);
        let host = match target_host(&url) {
            Ok(host) => host,
            Err(outcome) => return Some(outcome),
        };

        debug!("deploying {} to {url}", package.path());
        let request = DeployRequest {
            url: &url,
            content_type: ZIP_CONTENT_TYPE,
            body: &mut body,
        };
        let response = self
            .transport
            .execute(request, DEPLOY_TIMEOUT, SERVICE_NAME)?;
        Some(DeployOutcome::classify(&package, &host, response))
    }

    /// Archive a directory package into a temporary file; archives pass
    /// through untouched.
    fn stage(&self, package: &ApplicationPackage) -> Result<StagedArchive, DeployOutcome> {
        if package.is_archive() {
            return Ok(StagedArchive::Existing(package.path().to_owned()));
        }

        let temp = self.create_temp_archive().map_err(|err| {
            DeployOutcome::local_with_detail(
                "Could not create a temporary zip file for the application package",
                &err,
            )
        })?;
        build_archive(package.path(), temp.path())
            .map_err(|err| DeployOutcome::local(err.to_string()))?;
        debug!(
            "packaged {} into {}",
            package.path(),
            temp.path().display()
        );
        Ok(StagedArchive::Temporary(temp))
    }

    fn create_temp_archive(&self) -> std::io::Result<NamedTempFile> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("application").suffix(".zip");
        match &self.scratch_dir {
            Some(dir) => builder.tempfile_in(dir),
            None => builder.tempfile(),
        }
    }
}

/// Host of a deploy URL, rejecting targets that are not absolute URLs.
fn target_host(url: &str) -> Result<String, DeployOutcome> {
    let absolute = url
        .parse::<Uri>()
        .is_ok_and(|uri| uri.scheme().is_some() && uri.authority().is_some());
    if !absolute {
        return Err(DeployOutcome::local(format!(
            "Invalid deploy target URL '{url}'"
        )));
    }
    Ok(host_of(url))
}

#[cfg(test)]
#[path = "deploy_tests.rs"]
mod tests;

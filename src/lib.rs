//! Application package deployment against an activation service.
//!
//! This crate locates a deployable application package below an application
//! path, packages source directories into a relocatable zip archive, and
//! submits the archive to a remote activation service, classifying the
//! response into a single [`deploy::DeployOutcome`].
//!
//! # Modules
//!
//! - [`archive`] - Zip archive construction from an application directory
//! - [`deploy`] - Deployment orchestration and response classification
//! - [`error`] - Resolution and packaging error types
//! - [`package`] - Application package discovery across supported layouts
//! - [`report`] - Presentation capability consumed by the deployer
//! - [`transport`] - HTTP transport capability and the `ureq` implementation

pub mod archive;
pub mod deploy;
pub mod error;
pub mod package;
pub mod report;
pub mod transport;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use deploy::{DeployOutcome, Deployer};
pub use package::{ApplicationPackage, find_application_package};

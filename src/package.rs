//! Application package discovery.
//!
//! An application path may point at a packaged zip, a Maven project whose
//! build output holds the zip, a project with a conventional source
//! directory, or a bare application directory containing `services.xml`.
//! [`find_application_package`] checks these layouts in a fixed priority
//! order and returns the first match.

use camino::{Utf8Path, Utf8PathBuf};
use log::debug;

use crate::error::ResolutionError;

/// Build descriptor marking a Maven project.
pub const BUILD_DESCRIPTOR: &str = "pom.xml";

/// Build output holding the packaged application of a Maven project.
pub const BUILD_OUTPUT: [&str; 2] = ["target", "application.zip"];

/// Conventional source directory of an application package.
pub const SOURCE_SUBPATH: [&str; 3] = ["src", "main", "application"];

/// Services descriptor marking an application package directory.
pub const SERVICES_DESCRIPTOR: &str = "services.xml";

/// Client certificate probed by [`ApplicationPackage::has_certificate`].
const CLIENT_CERTIFICATE: [&str; 2] = ["security", "clients.pem"];

const ARCHIVE_EXTENSION: &str = "zip";

/// A resolved, deployable application package.
///
/// The path denotes either a zip archive or a directory tree that must be
/// archived before submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationPackage {
    path: Utf8PathBuf,
}

impl ApplicationPackage {
    /// Wraps a path known to hold an application package.
    #[must_use]
    pub fn new(path: impl Into<Utf8PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the archive or directory.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Returns `true` when the package is already a zip archive.
    ///
    /// # Examples
    ///
    /// ```
    /// use appdeploy::ApplicationPackage;
    ///
    /// assert!(ApplicationPackage::new("target/application.zip").is_archive());
    /// assert!(!ApplicationPackage::new("src/main/application").is_archive());
    /// ```
    #[must_use]
    pub fn is_archive(&self) -> bool {
        is_archive(&self.path)
    }

    /// Returns `true` when the package carries a client certificate.
    ///
    /// Archives are assumed to contain one; their contents are not inspected.
    #[must_use]
    pub fn has_certificate(&self) -> bool {
        if self.is_archive() {
            return true;
        }
        join_all(&self.path, &CLIENT_CERTIFICATE).exists()
    }
}

/// Locate the application package below `application`.
///
/// Layouts are tried in this order, first match wins:
///
/// 1. `application` itself is a `.zip` file;
/// 2. `application/pom.xml` exists, so `application/target/application.zip`
///    must exist too;
/// 3. `application/src/main/application` exists;
/// 4. `application/services.xml` exists, so the directory is the package.
///
/// An empty path is resolved against the current directory.
///
/// # Errors
///
/// Returns [`ResolutionError::IncompleteBuild`] when a `pom.xml` is present
/// without its build output, and [`ResolutionError::NotFound`] when no layout
/// matches.
pub fn find_application_package(
    application: &Utf8Path,
) -> Result<ApplicationPackage, ResolutionError> {
    let root = if application.as_str().is_empty() {
        Utf8Path::new(".")
    } else {
        application
    };

    if is_archive(root) {
        debug!("{root} is an application package archive");
        return Ok(ApplicationPackage::new(root));
    }

    if root.join(BUILD_DESCRIPTOR).exists() {
        let archive = join_all(root, &BUILD_OUTPUT);
        if !archive.exists() {
            return Err(ResolutionError::IncompleteBuild { expected: archive });
        }
        debug!("using build output {archive}");
        return Ok(ApplicationPackage::new(archive));
    }

    let source = join_all(root, &SOURCE_SUBPATH);
    if source.exists() {
        debug!("using application source directory {source}");
        return Ok(ApplicationPackage::new(source));
    }

    if root.join(SERVICES_DESCRIPTOR).exists() {
        debug!("{root} is an application package directory");
        return Ok(ApplicationPackage::new(root));
    }

    Err(ResolutionError::NotFound {
        path: application.to_owned(),
    })
}

fn is_archive(path: &Utf8Path) -> bool {
    path.extension() == Some(ARCHIVE_EXTENSION)
}

fn join_all(root: &Utf8Path, segments: &[&str]) -> Utf8PathBuf {
    segments
        .iter()
        .fold(root.to_owned(), |path, segment| path.join(segment))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const APPLICATIONS: &str = "tests/testdata/applications";

    fn fixture(name: &str) -> Utf8PathBuf {
        Utf8Path::new(APPLICATIONS).join(name)
    }

    #[rstest]
    #[case::archive_given_directly(
        "withTarget/target/application.zip",
        "withTarget/target/application.zip"
    )]
    #[case::pom_with_build_output("withTarget", "withTarget/target/application.zip")]
    #[case::source_directory("withSource", "withSource/src/main/application")]
    #[case::services_directory("withServices", "withServices")]
    #[case::source_directory_given_directly(
        "withSource/src/main/application",
        "withSource/src/main/application"
    )]
    fn resolves_supported_layouts(#[case] application: &str, #[case] expected: &str) {
        let package = find_application_package(&fixture(application)).expect("package resolves");
        assert_eq!(package.path(), fixture(expected));
    }

    #[test]
    fn build_descriptor_takes_priority_over_source_directory() {
        let package =
            find_application_package(&fixture("withPomAndSource")).expect("package resolves");
        assert_eq!(
            package.path(),
            fixture("withPomAndSource/target/application.zip")
        );
    }

    #[test]
    fn source_directory_takes_priority_over_services_descriptor() {
        let package =
            find_application_package(&fixture("withSourceAndServices")).expect("package resolves");
        assert_eq!(
            package.path(),
            fixture("withSourceAndServices/src/main/application")
        );
    }

    #[test]
    fn pom_without_build_output_is_an_incomplete_build() {
        let err = find_application_package(&fixture("withEmptyTarget"))
            .expect_err("resolution should fail");
        assert_eq!(
            err,
            ResolutionError::IncompleteBuild {
                expected: fixture("withEmptyTarget/target/application.zip"),
            }
        );
    }

    #[test]
    fn unknown_layout_is_not_found() {
        let err = find_application_package(&fixture("withNothing"))
            .expect_err("resolution should fail");
        assert!(matches!(err, ResolutionError::NotFound { ref path } if *path == fixture("withNothing")));
    }

    #[test]
    fn zip_extension_is_trusted_without_checking_existence() {
        let package = find_application_package(Utf8Path::new("missing/app.zip"))
            .expect("archive path is returned as is");
        assert!(package.is_archive());
    }

    #[rstest]
    #[case::archive("withTarget/target/application.zip", true)]
    #[case::directory_with_certificate("withCertificate", true)]
    #[case::directory_without_certificate("withServices", false)]
    fn certificate_presence(#[case] path: &str, #[case] expected: bool) {
        assert_eq!(ApplicationPackage::new(fixture(path)).has_certificate(), expected);
    }
}

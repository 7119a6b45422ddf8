//! Error types for package resolution and archive construction.
//!
//! Callers branch on the variant rather than on message text. The display
//! strings are written for operators and are surfaced verbatim as local
//! deployment failures.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Failure to locate a deployable application package.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResolutionError {
    /// None of the supported layouts matched the application path.
    #[error("Could not find an application package source in '{path}'")]
    NotFound {
        /// The application path that was inspected.
        path: Utf8PathBuf,
    },

    /// A Maven project was found but it has not been packaged yet.
    #[error("pom.xml exists but no target/application.zip. Run mvn package first")]
    IncompleteBuild {
        /// Where the packaged application was expected.
        expected: Utf8PathBuf,
    },
}

/// Failure to build a zip archive from an application directory.
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// The source directory is absolute, which would leak host paths into
    /// the archive entry names.
    #[error("Path must be relative, but '{path}'")]
    InvalidRoot {
        /// The rejected source path.
        path: Utf8PathBuf,
    },

    /// The source path does not exist.
    #[error("'{path}' should be an application package zip or dir, but does not exist")]
    Missing {
        /// The missing source path.
        path: Utf8PathBuf,
    },

    /// The source path is a regular file rather than a directory.
    #[error("'{path}' should be an application package dir, but is a (non-zip) file")]
    NotADirectory {
        /// The offending source path.
        path: Utf8PathBuf,
    },

    /// A file below the source directory has a name that is not valid UTF-8.
    #[error("cannot archive '{path}': file name is not valid UTF-8")]
    NonUtf8Path {
        /// Lossy rendering of the offending path.
        path: String,
    },

    /// Reading the source tree or writing the destination failed.
    #[error("could not write application package archive: {0}")]
    Io(#[from] std::io::Error),

    /// The zip writer rejected an entry or failed to finish the archive.
    #[error("could not write application package archive: {0}")]
    Zip(#[from] zip::result::ZipError),
}

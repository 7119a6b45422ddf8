//! Zip archive construction for application package directories.
//!
//! The activation service expects a zip whose entries are relative to the
//! package root. [`build_archive`] walks a relative source directory and
//! stores every regular file under its path with the source prefix removed.
//! Entry order follows the directory traversal and is not stable across
//! filesystems.

use std::fs::File;
use std::io;
use std::path::Path;

use camino::{Utf8Path, Utf8PathBuf};
use log::{debug, trace};
use walkdir::WalkDir;
use zip::CompressionMethod;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use crate::error::ArchiveError;

/// Write a zip archive of `source_dir` to `destination`.
///
/// `source_dir` must be a relative path to an existing directory. These
/// preconditions are checked before `destination` is opened, so a rejected
/// call leaves the filesystem untouched.
///
/// # Errors
///
/// Returns [`ArchiveError::InvalidRoot`], [`ArchiveError::Missing`] or
/// [`ArchiveError::NotADirectory`] when a precondition fails, and
/// [`ArchiveError::Io`], [`ArchiveError::Zip`] or
/// [`ArchiveError::NonUtf8Path`] when the walk or the write fails. A
/// partially written destination is left for the caller to discard.
pub fn build_archive(source_dir: &Utf8Path, destination: &Path) -> Result<(), ArchiveError> {
    validate_source(source_dir)?;

    let output = File::create(destination)?;
    let mut writer = ZipWriter::new(output);
    let mut entries = 0_usize;

    for walked in WalkDir::new(source_dir.as_std_path()) {
        let entry = walked.map_err(io::Error::from)?;
        if entry.file_type().is_dir() {
            continue;
        }

        let name = entry_name(source_dir, entry.path())?;
        trace!("adding {name} to application package archive");
        writer.start_file(name, entry_options())?;
        let mut input = File::open(entry.path())?;
        io::copy(&mut input, &mut writer)?;
        entries += 1;
    }

    writer.finish()?;
    debug!(
        "archived {entries} files from {source_dir} into {}",
        destination.display()
    );
    Ok(())
}

fn validate_source(source_dir: &Utf8Path) -> Result<(), ArchiveError> {
    if source_dir.is_absolute() {
        return Err(ArchiveError::InvalidRoot {
            path: source_dir.to_owned(),
        });
    }
    if !source_dir.exists() {
        return Err(ArchiveError::Missing {
            path: source_dir.to_owned(),
        });
    }
    if !source_dir.is_dir() {
        return Err(ArchiveError::NotADirectory {
            path: source_dir.to_owned(),
        });
    }
    Ok(())
}

/// Archive entry name for `path`: relative to `source_dir`, `/`-separated.
fn entry_name(source_dir: &Utf8Path, path: &Path) -> Result<String, ArchiveError> {
    let stripped = path
        .strip_prefix(source_dir.as_std_path())
        .unwrap_or(path)
        .to_path_buf();
    let relative = Utf8PathBuf::from_path_buf(stripped).map_err(|p| ArchiveError::NonUtf8Path {
        path: p.display().to_string(),
    })?;
    let segments: Vec<&str> = relative.components().map(|c| c.as_str()).collect();
    Ok(segments.join("/"))
}

fn entry_options() -> SimpleFileOptions {
    SimpleFileOptions::default().compression_method(CompressionMethod::Deflated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::io::Read;
    use tempfile::TempDir;
    use zip::ZipArchive;

    const SOURCE: &str = "tests/testdata/applications/withSource/src/main/application";

    fn read_entries(archive: &Path) -> BTreeMap<String, Vec<u8>> {
        let file = File::open(archive).expect("open archive");
        let mut zip = ZipArchive::new(file).expect("read archive");
        let mut entries = BTreeMap::new();
        for index in 0..zip.len() {
            let mut entry = zip.by_index(index).expect("archive entry");
            let mut contents = Vec::new();
            entry.read_to_end(&mut contents).expect("entry contents");
            entries.insert(entry.name().to_owned(), contents);
        }
        entries
    }

    #[test]
    fn entries_are_relative_to_the_source_directory() {
        let out = TempDir::new().expect("temp dir");
        let destination = out.path().join("application.zip");

        build_archive(Utf8Path::new(SOURCE), &destination).expect("archive builds");

        let entries = read_entries(&destination);
        let names: Vec<&str> = entries.keys().map(String::as_str).collect();
        assert_eq!(names, ["hosts.xml", "schemas/music.sd", "services.xml"]);
    }

    #[test]
    fn entry_contents_match_the_source_files() {
        let out = TempDir::new().expect("temp dir");
        let destination = out.path().join("application.zip");

        build_archive(Utf8Path::new(SOURCE), &destination).expect("archive builds");

        for (name, contents) in read_entries(&destination) {
            let original =
                std::fs::read(Utf8Path::new(SOURCE).join(&name)).expect("read source file");
            assert_eq!(contents, original, "content mismatch for {name}");
        }
    }

    #[test]
    fn archive_starts_with_zip_signature() {
        let out = TempDir::new().expect("temp dir");
        let destination = out.path().join("application.zip");

        build_archive(Utf8Path::new(SOURCE), &destination).expect("archive builds");

        let bytes = std::fs::read(&destination).expect("read archive");
        assert!(bytes.starts_with(b"PK\x03\x04"));
    }

    #[test]
    fn current_directory_prefix_is_stripped() {
        let out = TempDir::new().expect("temp dir");
        let destination = out.path().join("application.zip");
        let source = Utf8Path::new(".").join(SOURCE);

        build_archive(&source, &destination).expect("archive builds");

        assert!(read_entries(&destination).contains_key("services.xml"));
    }

    #[test]
    fn absolute_source_is_rejected_without_creating_destination() {
        let out = TempDir::new().expect("temp dir");
        let destination = out.path().join("application.zip");
        let absolute =
            Utf8PathBuf::try_from(out.path().to_path_buf()).expect("temp dir is UTF-8");

        let err = build_archive(&absolute, &destination).expect_err("absolute root rejected");

        assert!(matches!(err, ArchiveError::InvalidRoot { .. }));
        assert!(!destination.exists());
    }

    #[test]
    fn missing_source_is_rejected() {
        let out = TempDir::new().expect("temp dir");
        let destination = out.path().join("application.zip");

        let err = build_archive(Utf8Path::new("tests/testdata/no-such-application"), &destination)
            .expect_err("missing source rejected");

        assert!(matches!(err, ArchiveError::Missing { .. }));
        assert!(!destination.exists());
    }

    #[test]
    fn file_source_is_rejected() {
        let out = TempDir::new().expect("temp dir");
        let destination = out.path().join("application.zip");
        let file = Utf8Path::new(SOURCE).join("services.xml");

        let err = build_archive(&file, &destination).expect_err("file source rejected");

        assert!(matches!(err, ArchiveError::NotADirectory { .. }));
        assert!(!destination.exists());
    }
}

//! Local archiving of generated export files.
//!
//! Files land under `<root>/<YYYYMMDD>/<filename>`, one directory per
//! calendar day, created on first use. A same-named file is overwritten;
//! the timestamp-based filenames make collisions effectively impossible.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tracing::info;

/// Filesystem failure while archiving. Fatal to the request: without the
/// local file there is nothing to deliver.
#[derive(Debug, thiserror::Error)]
#[error("failed to write export file {path}: {source}")]
pub struct ArchiveError {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

/// Writes export files under a configured root directory.
#[derive(Debug, Clone)]
pub struct Archiver {
    root: PathBuf,
}

impl Archiver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Write `bytes` as `<root>/<YYYYMMDD>/<filename>`, creating the date
    /// directory as needed. Returns the full path of the written file.
    pub fn archive(
        &self,
        filename: &str,
        bytes: &[u8],
        date: NaiveDate,
    ) -> Result<PathBuf, ArchiveError> {
        let dir = self.root.join(date.format("%Y%m%d").to_string());
        fs::create_dir_all(&dir).map_err(|source| ArchiveError {
            path: dir.clone(),
            source,
        })?;

        let path = dir.join(filename);
        fs::write(&path, bytes).map_err(|source| ArchiveError {
            path: path.clone(),
            source,
        })?;

        info!("archived {} bytes to {}", bytes.len(), path.display());
        Ok(path)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()
    }

    #[test]
    fn writes_file_under_date_partition() {
        let tmp = tempfile::tempdir().unwrap();
        let archiver = Archiver::new(tmp.path());

        let path = archiver
            .archive("STORE_RETURN250301100000.CSV", b"hello", date())
            .unwrap();

        assert_eq!(
            path,
            tmp.path().join("20250301").join("STORE_RETURN250301100000.CSV")
        );
        assert_eq!(fs::read(&path).unwrap(), b"hello");
    }

    #[test]
    fn overwrites_existing_file() {
        let tmp = tempfile::tempdir().unwrap();
        let archiver = Archiver::new(tmp.path());

        archiver.archive("f.CSV", b"first", date()).unwrap();
        let path = archiver.archive("f.CSV", b"second", date()).unwrap();

        assert_eq!(fs::read(&path).unwrap(), b"second");
    }

    #[test]
    fn creates_intermediate_directories() {
        let tmp = tempfile::tempdir().unwrap();
        let archiver = Archiver::new(tmp.path().join("deep").join("exports"));

        let path = archiver.archive("f.CSV", b"x", date()).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn surfaces_write_failure_with_path() {
        let tmp = tempfile::tempdir().unwrap();
        // A file where the export root should be makes create_dir_all fail
        let blocker = tmp.path().join("root");
        fs::write(&blocker, b"").unwrap();

        let archiver = Archiver::new(&blocker);
        let err = archiver.archive("f.CSV", b"x", date()).unwrap_err();
        assert!(err.path.starts_with(&blocker));
    }
}

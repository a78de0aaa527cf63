//! File-system access used by package loading and sub-package discovery.
//!
//! Every read the pipeline performs goes through [`FileSystem`], so hosts can document
//! synthetic trees and tests can inject failures that are awkward to produce on disk.

use std::{fs, io, path::Path};

/// Extension of compilable source files.
pub const SOURCE_EXTENSION: &str = "rs";

/// Whether a file name names a compilable source file.
pub fn is_source_file(name: &str) -> bool {
    Path::new(name)
        .extension()
        .is_some_and(|ext| ext == SOURCE_EXTENSION)
}

/// A single directory entry as reported by [`FileSystem::read_dir`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    /// File name of the entry, without its parent path.
    pub name: String,
    /// Whether the entry is a directory.
    pub is_dir: bool,
}

impl DirEntry {
    /// An entry describing a regular file.
    pub fn file(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_dir: false,
        }
    }

    /// An entry describing a directory.
    pub fn dir(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_dir: true,
        }
    }
}

/// Blocking, read-only access to a tree of source files.
pub trait FileSystem {
    /// List the immediate entries of `path`, in the order the underlying store reports them.
    fn read_dir(&self, path: &Path) -> io::Result<Vec<DirEntry>>;

    /// Read the whole file at `path` as UTF-8.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;
}

/// The real file system.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsFileSystem;

impl FileSystem for OsFileSystem {
    fn read_dir(&self, path: &Path) -> io::Result<Vec<DirEntry>> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(path)? {
            let entry = entry?;
            // Follow symlinks so linked package directories count as directories.
            let is_dir = fs::metadata(entry.path())
                .map(|meta| meta.is_dir())
                .unwrap_or(false);
            entries.push(DirEntry {
                name: entry.file_name().to_string_lossy().into_owned(),
                is_dir,
            });
        }
        Ok(entries)
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        fs::read_to_string(path)
    }
}

impl<F: FileSystem + ?Sized> FileSystem for &F {
    fn read_dir(&self, path: &Path) -> io::Result<Vec<DirEntry>> {
        (**self).read_dir(path)
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        (**self).read_to_string(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use tempfile::TempDir;

    #[test]
    fn os_read_dir_reports_directories() -> io::Result<()> {
        let temp_dir = TempDir::new()?;
        fs::create_dir(temp_dir.path().join("sub"))?;
        File::create(temp_dir.path().join("lib.rs"))?;

        let mut entries = OsFileSystem.read_dir(temp_dir.path())?;
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        assert_eq!(entries, vec![DirEntry::file("lib.rs"), DirEntry::dir("sub")]);
        Ok(())
    }

    #[test]
    fn source_file_names() {
        assert!(is_source_file("lib.rs"));
        assert!(is_source_file("mod.test.rs"));
        assert!(!is_source_file("rs"));
        assert!(!is_source_file("README.md"));
        assert!(!is_source_file("lib.rs.orig"));
    }

    #[test]
    fn os_read_dir_missing_is_not_found() {
        let err = OsFileSystem
            .read_dir(Path::new("/non/existent/path"))
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}

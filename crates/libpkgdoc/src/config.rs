//! Search-root configuration shared by the loader and the sub-package discoverer.

use std::{
    env,
    io::{self, ErrorKind},
    path::PathBuf,
};

use tracing::debug;

use crate::{
    fs::{DirEntry, FileSystem},
    toolchain,
};

/// Environment variable overriding the workspace search root.
pub const WORKSPACE_ENV: &str = "PKGDOC_WORKSPACE";

/// Environment variable overriding the standard library search root.
pub const LIBRARY_ENV: &str = "PKGDOC_LIBRARY";

/// The two roots import paths are resolved against.
///
/// The workspace root is always consulted first. The library root, when present, is the
/// fallback for import paths that do not exist below the workspace root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRoots {
    /// Primary root holding the user's sources.
    pub workspace: PathBuf,
    /// Secondary root holding standard library sources.
    pub library: Option<PathBuf>,
}

impl SearchRoots {
    /// Roots with only a workspace root configured.
    pub fn new(workspace: impl Into<PathBuf>) -> Self {
        Self {
            workspace: workspace.into(),
            library: None,
        }
    }

    /// Set the fallback library root.
    pub fn with_library(mut self, library: impl Into<PathBuf>) -> Self {
        self.library = Some(library.into());
        self
    }

    /// Read roots from the environment.
    ///
    /// The workspace root is `PKGDOC_WORKSPACE` or the current directory. The library root is
    /// `PKGDOC_LIBRARY`, or the active toolchain's `rust-src` directory when that can be found.
    pub fn from_env() -> Self {
        Self::resolve(
            env::var_os(WORKSPACE_ENV).map(PathBuf::from),
            env::var_os(LIBRARY_ENV).map(PathBuf::from),
        )
    }

    /// Roots from explicit settings, filling in only what is missing.
    ///
    /// The toolchain is queried only when no library root is given.
    pub fn resolve(workspace: Option<PathBuf>, library: Option<PathBuf>) -> Self {
        let workspace = workspace.unwrap_or_else(|| PathBuf::from("."));
        let library = library.or_else(|| {
            toolchain::library_source_root()
                .map_err(|e| debug!("no library root: {e}"))
                .ok()
        });
        Self { workspace, library }
    }

    /// The candidate package directories for `import_path`, in search order.
    pub fn candidates(&self, import_path: &str) -> Vec<PathBuf> {
        let mut candidates = vec![self.workspace.join(import_path)];
        if let Some(library) = &self.library {
            candidates.push(library.join(import_path));
        }
        candidates
    }

    /// List the directory of `import_path` under the first root that has it.
    ///
    /// A root is passed over when the path is missing there or is not a directory. Any other
    /// failure is returned at once. When every root misses, the last miss is returned.
    pub fn list_package<F: FileSystem>(
        &self,
        fs: &F,
        import_path: &str,
    ) -> io::Result<(PathBuf, Vec<DirEntry>)> {
        let mut miss = None;
        for candidate in self.candidates(import_path) {
            match fs.read_dir(&candidate) {
                Ok(entries) => return Ok((candidate, entries)),
                Err(e) if is_missing(&e) => {
                    debug!("no package at {}: {e}", candidate.display());
                    miss = Some(e);
                }
                Err(e) => return Err(e),
            }
        }
        Err(miss.unwrap_or_else(|| io::Error::new(ErrorKind::NotFound, "no search roots")))
    }
}

/// Whether a listing error means there is no package directory at the path.
fn is_missing(err: &io::Error) -> bool {
    matches!(err.kind(), ErrorKind::NotFound | ErrorKind::NotADirectory)
}

impl Default for SearchRoots {
    fn default() -> Self {
        Self::from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::OsFileSystem;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn candidates_follow_search_order() {
        let roots = SearchRoots::new("/work").with_library("/lib");
        assert_eq!(
            roots.candidates("core/src/iter"),
            vec![
                PathBuf::from("/work/core/src/iter"),
                PathBuf::from("/lib/core/src/iter")
            ]
        );
    }

    #[test]
    fn resolve_keeps_explicit_roots() {
        let roots = SearchRoots::resolve(Some("/work".into()), Some("/lib".into()));
        assert_eq!(roots, SearchRoots::new("/work").with_library("/lib"));
    }

    #[test]
    fn list_package_skips_missing_roots() -> io::Result<()> {
        let workspace = TempDir::new()?;
        let library = TempDir::new()?;
        fs::write(workspace.path().join("pkg"), "not a directory")?;
        fs::create_dir_all(library.path().join("pkg"))?;
        fs::write(library.path().join("pkg/lib.rs"), "")?;

        let roots = SearchRoots::new(workspace.path()).with_library(library.path());
        let (dir, entries) = roots.list_package(&OsFileSystem, "pkg")?;
        assert_eq!(dir, library.path().join("pkg"));
        assert_eq!(entries, vec![DirEntry::file("lib.rs")]);

        let err = roots.list_package(&OsFileSystem, "other").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        Ok(())
    }

    #[test]
    fn candidates_without_library() {
        let roots = SearchRoots::new("/work");
        assert_eq!(roots.candidates("a"), vec![PathBuf::from("/work/a")]);
    }
}

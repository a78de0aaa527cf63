//! Finds the sub-packages below a package directory.

use std::{io, path::Path};

use tracing::debug;

use crate::{
    config::SearchRoots,
    fs::{FileSystem, is_source_file},
};

/// List the immediate subdirectories of `import_path` that directly contain source files.
///
/// The package directory is found the way the loader finds it: the workspace root first, then
/// the library root when the workspace has no directory at that path. Failing to list the
/// package directory itself is an error, but a subdirectory that cannot be listed just counts
/// as holding no sources. Names are returned in the order the file system lists them.
pub fn sub_packages<F: FileSystem>(
    fs: &F,
    roots: &SearchRoots,
    import_path: &str,
) -> io::Result<Vec<String>> {
    let (root, entries) = roots.list_package(fs, import_path)?;

    let packages: Vec<String> = entries
        .into_iter()
        .filter(|entry| entry.is_dir)
        .filter(|entry| has_source_files(fs, &root.join(&entry.name)))
        .map(|entry| entry.name)
        .collect();
    debug!(
        "found {} sub-packages under {}",
        packages.len(),
        root.display()
    );
    Ok(packages)
}

/// Whether `dir` directly holds a source file. Unlistable directories hold none.
fn has_source_files<F: FileSystem>(fs: &F, dir: &Path) -> bool {
    match fs.read_dir(dir) {
        Ok(entries) => entries
            .iter()
            .any(|entry| !entry.is_dir && is_source_file(&entry.name)),
        Err(_) => false,
    }
}

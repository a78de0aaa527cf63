use tracing::debug;

use crate::{
    config::SearchRoots,
    discover,
    error::{PkgdocError, Result},
    extract::{self, ExtractMode},
    fs::{FileSystem, OsFileSystem},
    import_path::ImportPath,
    loader,
    model::Package,
    normalize,
    render::Renderer,
};

/// Pkgdoc builds the documentation model of a single package.
///
/// A package is a directory of Rust source files, named by its import path relative to a
/// search root. Documenting a package loads and parses every file in that directory, groups
/// the declared items by kind and by the type they belong to, renders each declaration as
/// formatted source, and lists the subdirectories that are packages themselves.
///
/// Configuration is fixed when the instance is built. Each call to [`Pkgdoc::document`] is
/// independent, so one instance may be shared between threads when its file system allows.
#[derive(Debug, Clone)]
pub struct Pkgdoc<F: FileSystem = OsFileSystem> {
    /// Roots import paths are resolved against.
    roots: SearchRoots,

    /// Which declarations are extracted.
    mode: ExtractMode,

    /// Whether files that fail to parse are dropped instead of failing the load.
    suppress_errors: bool,

    /// All file-system access goes through this handle.
    fs: F,
}

impl Default for Pkgdoc {
    fn default() -> Self {
        Self::new()
    }
}

impl Pkgdoc {
    /// Creates a new instance reading the real file system, with search roots taken from the
    /// environment.
    ///
    /// # Import Paths
    ///
    /// An import path is a `/`-separated directory path below a search root:
    ///
    /// - mycrate/src
    /// - mycrate/src/net
    /// - core/src/iter
    ///
    /// The workspace root is searched first. Paths missing from it are looked up in the
    /// standard library source root, when one is configured.
    pub fn new() -> Self {
        Self::from_roots(SearchRoots::from_env())
    }

    /// Creates a new instance reading the real file system with the given search roots.
    ///
    /// Unlike [`Pkgdoc::new`], this never queries the environment or the toolchain.
    pub fn from_roots(roots: SearchRoots) -> Self {
        Self {
            roots,
            mode: ExtractMode::default(),
            suppress_errors: true,
            fs: OsFileSystem,
        }
    }
}

impl<F: FileSystem> Pkgdoc<F> {
    /// Replaces the search roots.
    ///
    /// Prefer [`Pkgdoc::from_roots`] when the roots are known up front.
    pub fn with_roots(mut self, roots: SearchRoots) -> Self {
        self.roots = roots;
        self
    }

    /// Sets which declarations are extracted.
    pub fn with_mode(mut self, mode: ExtractMode) -> Self {
        self.mode = mode;
        self
    }

    /// Enables or disables error suppression. With suppression disabled, the first file that
    /// fails to parse aborts the call with [`PkgdocError::Diagnostic`].
    pub fn with_suppress_errors(mut self, suppress_errors: bool) -> Self {
        self.suppress_errors = suppress_errors;
        self
    }

    /// Reads sources through `fs` instead.
    pub fn with_file_system<G: FileSystem>(self, fs: G) -> Pkgdoc<G> {
        Pkgdoc {
            roots: self.roots,
            mode: self.mode,
            suppress_errors: self.suppress_errors,
            fs,
        }
    }

    /// The configured search roots.
    pub fn roots(&self) -> &SearchRoots {
        &self.roots
    }

    /// Document the package at `import_path`.
    ///
    /// If the package is documented but its sub-packages cannot be listed, the error is
    /// [`PkgdocError::SubPackages`] and carries the otherwise complete package.
    pub fn document(&self, import_path: &str) -> Result<Package> {
        let import_path = ImportPath::parse(import_path)?;
        let loaded = loader::load(&self.fs, &self.roots, &import_path, self.suppress_errors)?;
        let raw = extract::extract(&loaded, self.mode);

        let renderer =
            Renderer::default().with_private_items(self.mode.contains(ExtractMode::ALL_DECLS));
        let mut package = normalize::normalize(&raw, &renderer);
        debug!(
            "documented {}: {} constants, {} variables, {} functions, {} types",
            package.import_path,
            package.constants.len(),
            package.variables.len(),
            package.functions.len(),
            package.types.len()
        );

        match discover::sub_packages(&self.fs, &self.roots, &package.import_path) {
            Ok(sub_packages) => {
                package.sub_packages = sub_packages;
                Ok(package)
            }
            Err(source) => Err(PkgdocError::SubPackages {
                package: Box::new(package),
                source,
            }),
        }
    }
}

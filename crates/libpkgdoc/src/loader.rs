//! Resolves import paths to parsed source files.

use std::{
    collections::BTreeMap,
    io::ErrorKind,
    path::{self, Path, PathBuf},
};

use syn::{Attribute, Expr, ExprLit, Lit, LitStr, Meta};
use tracing::debug;

use crate::{
    config::SearchRoots,
    error::{PkgdocError, Result},
    fs::{DirEntry, FileSystem, is_source_file},
    import_path::ImportPath,
    keywords::module_ident,
};

/// A package whose source files have been read and parsed.
#[derive(Debug)]
pub struct LoadedPackage {
    /// Identifier the package is referred to by.
    pub name: String,
    /// The import path the package was resolved from.
    pub import_path: ImportPath,
    /// Absolute path of the package directory.
    pub dir: PathBuf,
    /// Parsed files, keyed by absolute path.
    pub files: BTreeMap<PathBuf, syn::File>,
}

/// Resolve `import_path` against `roots` and parse every source file directly inside it.
///
/// With `suppress_errors` set, files that are not UTF-8 or fail to parse are dropped and
/// loading continues over the rest of the package. Otherwise the first such file aborts the
/// load.
///
/// Package docs given as `#![doc = include_str!("...")]` are read relative to the file.
pub fn load<F: FileSystem>(
    fs: &F,
    roots: &SearchRoots,
    import_path: &ImportPath,
    suppress_errors: bool,
) -> Result<LoadedPackage> {
    let (dir, entries) = locate(fs, roots, import_path)?;

    let mut names: Vec<String> = entries
        .into_iter()
        .filter(|entry| !entry.is_dir && is_source_file(&entry.name))
        .map(|entry| entry.name)
        .collect();
    names.sort();
    if names.is_empty() {
        return Err(PkgdocError::PackageNotFound {
            import_path: import_path.to_string(),
            reason: format!("no source files in {}", dir.display()),
        });
    }

    let dir = path::absolute(&dir)?;
    let mut files = BTreeMap::new();
    for name in names {
        let path = dir.join(name);
        let source = match fs.read_to_string(&path) {
            Ok(source) => source,
            Err(e) if e.kind() == ErrorKind::InvalidData => {
                if suppress_errors {
                    debug!("skipping {}: {e}", path.display());
                    continue;
                }
                return Err(PkgdocError::Diagnostic {
                    path,
                    message: e.to_string(),
                });
            }
            Err(e) => return Err(e.into()),
        };
        match syn::parse_file(&source) {
            Ok(mut ast) => {
                inline_included_docs(fs, &dir, &mut ast.attrs);
                files.insert(path, ast);
            }
            Err(e) if suppress_errors => debug!("skipping {}: {e}", path.display()),
            Err(e) => {
                return Err(PkgdocError::Diagnostic {
                    path,
                    message: e.to_string(),
                });
            }
        }
    }

    let name = package_name(fs, &dir, import_path);
    debug!(
        "loaded package {name} from {} ({} files)",
        dir.display(),
        files.len()
    );

    Ok(LoadedPackage {
        name,
        import_path: import_path.clone(),
        dir,
        files,
    })
}

/// Find the first search root holding `import_path`, returning the directory and its entries.
fn locate<F: FileSystem>(
    fs: &F,
    roots: &SearchRoots,
    import_path: &ImportPath,
) -> Result<(PathBuf, Vec<DirEntry>)> {
    let path = import_path.to_string();
    match roots.list_package(fs, &path) {
        Ok((dir, entries)) => {
            debug!("resolved {path} to {}", dir.display());
            Ok((dir, entries))
        }
        Err(e) => {
            let searched: Vec<String> = roots
                .candidates(&path)
                .iter()
                .map(|candidate| candidate.display().to_string())
                .collect();
            Err(PkgdocError::PackageNotFound {
                import_path: path,
                reason: format!("{e} (searched {})", searched.join(", ")),
            })
        }
    }
}

/// Replace `#![doc = include_str!("path")]` with the contents of the included file.
///
/// Files that cannot be read leave the attribute as it is, which contributes no text.
fn inline_included_docs<F: FileSystem>(fs: &F, dir: &Path, attrs: &mut [Attribute]) {
    for attr in attrs {
        if !attr.path().is_ident("doc") {
            continue;
        }
        let Meta::NameValue(nv) = &mut attr.meta else {
            continue;
        };
        let Expr::Macro(mac) = &nv.value else {
            continue;
        };
        if !mac.mac.path.is_ident("include_str") {
            continue;
        }
        let Ok(rel) = mac.mac.parse_body::<LitStr>() else {
            continue;
        };
        let included = dir.join(rel.value());
        match fs.read_to_string(&included) {
            Ok(text) => {
                nv.value = Expr::Lit(ExprLit {
                    attrs: Vec::new(),
                    lit: Lit::Str(LitStr::new(&text, rel.span())),
                });
            }
            Err(e) => debug!("cannot include {}: {e}", included.display()),
        }
    }
}

/// Work out the package identifier.
///
/// The `src` directory of a Cargo package takes the package name from its manifest; any other
/// directory is named after its last import path component.
fn package_name<F: FileSystem>(fs: &F, dir: &Path, import_path: &ImportPath) -> String {
    if import_path.last() == "src"
        && let Some(name) = dir
            .parent()
            .and_then(|crate_dir| manifest_package_name(fs, &crate_dir.join("Cargo.toml")))
    {
        return module_ident(&name);
    }
    module_ident(import_path.last())
}

/// Read the `[package]` name from a manifest, if there is one.
fn manifest_package_name<F: FileSystem>(fs: &F, manifest_path: &Path) -> Option<String> {
    let content = fs.read_to_string(manifest_path).ok()?;
    let manifest = cargo_toml::Manifest::from_slice(content.as_bytes()).ok()?;
    manifest.package.map(|package| package.name)
}

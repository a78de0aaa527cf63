//! Pkgdoc builds a documentation model for a package of Rust source files.
//!
//! A package is a directory of `.rs` files, named by an import path relative to a search root.
//! Documenting a package parses every file with `syn`, groups the top-level items into
//! constants, variables, functions and types, attaches constructors and `impl` items to the
//! types they belong to, and renders each declaration as formatted source without bodies.
//! Subdirectories that hold source files are reported as sub-packages.
//!
//! Two search roots are consulted: the workspace root, then the standard library source root
//! shipped with the `rust-src` toolchain component.
//!
//! ```no_run
//! use libpkgdoc::Pkgdoc;
//!
//! let package = Pkgdoc::new().document("core/src/iter")?;
//! println!("{}", package.synopsis);
//! # Ok::<(), libpkgdoc::PkgdocError>(())
//! ```

mod config;
mod discover;
pub mod doctext;
mod error;
mod extract;
mod fs;
mod highlight;
mod import_path;
mod keywords;
mod loader;
mod model;
mod normalize;
mod pkgdoc;
mod render;
mod toolchain;

pub use crate::{
    config::{LIBRARY_ENV, SearchRoots, WORKSPACE_ENV},
    discover::sub_packages,
    error::{PkgdocError, Result},
    extract::{ExtractMode, RawFunc, RawPackage, RawType, RawValue, extract},
    fs::{DirEntry, FileSystem, OsFileSystem, SOURCE_EXTENSION, is_source_file},
    highlight::highlight_code,
    import_path::ImportPath,
    loader::{LoadedPackage, load},
    model::{Doc, Function, Package, Type, Value},
    normalize::normalize,
    pkgdoc::Pkgdoc,
    render::Renderer,
    toolchain::{library_source_root, sysroot},
};

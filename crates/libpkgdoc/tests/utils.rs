// Dead code detection breaks here, because the integration test crates all use a disjoint set of
// the pub items.
#![allow(dead_code)]

use std::{fs, path::Path};

use libpkgdoc::{ExtractMode, Package, Pkgdoc, SearchRoots};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

/// A temporary workspace root holding packages.
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    /// Write `content` to `rel`, creating parent directories.
    pub fn file(self, rel: &str, content: &str) -> Self {
        let path = self.dir.path().join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
        self
    }

    /// Create an empty directory.
    pub fn dir(self, rel: &str) -> Self {
        fs::create_dir_all(self.dir.path().join(rel)).unwrap();
        self
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// A documenter searching only this workspace.
    pub fn pkgdoc(&self) -> Pkgdoc {
        Pkgdoc::from_roots(SearchRoots::new(self.root()))
    }
}

/// Document a single-file package.
pub fn document(source: &str, mode: ExtractMode) -> Package {
    let ws = Workspace::new().file("pkg/lib.rs", source);
    ws.pkgdoc().with_mode(mode).document("pkg").unwrap()
}

/// The declaration text of the only item in a package.
pub fn only_decl(pkg: &Package) -> String {
    let mut decls: Vec<&str> = Vec::new();
    decls.extend(pkg.constants.iter().map(|v| v.decl.as_str()));
    decls.extend(pkg.variables.iter().map(|v| v.decl.as_str()));
    decls.extend(pkg.functions.iter().map(|f| f.decl.as_str()));
    decls.extend(pkg.types.iter().map(|t| t.decl.as_str()));
    assert_eq!(decls.len(), 1, "expected exactly one declaration: {decls:?}");
    decls[0].to_string()
}

pub fn normalize_whitespace(s: &str) -> String {
    let lines: Vec<&str> = s
        .lines()
        .map(|line| line.trim_end())
        .filter(|line| !line.is_empty())
        .collect();

    let min_indent = lines
        .iter()
        .map(|line| line.len() - line.trim_start().len())
        .min()
        .unwrap_or(0);

    lines
        .into_iter()
        .map(|line| &line[min_indent..])
        .collect::<Vec<&str>>()
        .join("\n")
}

pub fn render(mode: ExtractMode, source: &str, expected_output: &str) {
    let rendered = only_decl(&document(source, mode));
    assert_eq!(
        normalize_whitespace(&rendered),
        normalize_whitespace(expected_output)
    );

    // The canonical form is a fixed point.
    let again = only_decl(&document(&rendered, mode));
    assert_eq!(again, rendered);
}

/// Idempotent rendering test
pub fn rt_idemp(source: &str) {
    render(ExtractMode::ALL_DECLS, source, source);
}

/// Render roundtrip
pub fn rt(source: &str, expected_output: &str) {
    render(ExtractMode::empty(), source, expected_output);
}

#[macro_export]
macro_rules! gen_tests {
    ($prefix:ident, {
        $(idemp {
            $idemp_name:ident: $input:expr
        })*
        $(rt {
            $rt_name:ident: {
                input: $rt_input:expr,
                output: $rt_output:expr
            }
        })*
        $(rt_custom {
            $rt_custom_name:ident: {
                mode: $rt_custom_mode:expr,
                input: $rt_custom_input:expr,
                output: $rt_custom_output:expr
            }
        })*
    }) => {
        mod $prefix {
            use super::*;

            $(
                #[test]
                fn $idemp_name() {
                    rt_idemp($input);
                }
            )*

            $(
                #[test]
                fn $rt_name() {
                    rt($rt_input, $rt_output);
                }
            )*

            $(
                #[test]
                fn $rt_custom_name() {
                    render($rt_custom_mode, $rt_custom_input, $rt_custom_output);
                }
            )*
        }
    };
}

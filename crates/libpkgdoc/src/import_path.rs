use std::fmt;

use crate::error::{PkgdocError, Result};

/// A validated package import path.
///
/// An import path is a `/`-separated path relative to a search root, naming a directory of
/// Rust source files.
///
/// # Examples of valid import paths:
///
/// - `mycrate/src`
/// - `mycrate/src/net`
/// - `core/src/iter`
/// - `/alloc/src/collections/` (surrounding slashes are ignored)
/// - `std\src\io` (backslashes are treated as separators)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportPath {
    components: Vec<String>,
}

impl ImportPath {
    /// Parse and normalize an import path.
    pub fn parse(input: &str) -> Result<Self> {
        let normalized = input.replace('\\', "/");
        let trimmed = normalized.trim_matches('/');
        if trimmed.is_empty() {
            return Err(PkgdocError::InvalidImportPath("empty string".to_string()));
        }

        let mut components = Vec::new();
        for (i, component) in trimmed.split('/').enumerate() {
            match component {
                "" => {
                    return Err(PkgdocError::InvalidImportPath(format!(
                        "empty component at position {i}"
                    )));
                }
                "." | ".." => {
                    return Err(PkgdocError::InvalidImportPath(format!(
                        "relative component {component:?} at position {i}"
                    )));
                }
                _ => components.push(component.to_string()),
            }
        }

        Ok(Self { components })
    }

    /// The final component, which names the package directory.
    pub fn last(&self) -> &str {
        self.components.last().map_or("", String::as_str)
    }

    /// The path components.
    pub fn components(&self) -> &[String] {
        &self.components
    }
}

impl fmt::Display for ImportPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.components.join("/"))
    }
}

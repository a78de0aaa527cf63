use std::{io, path::PathBuf};

use thiserror::Error;

use crate::model::Package;

/// Errors surfaced by the documentation pipeline.
#[derive(Error, Debug)]
pub enum PkgdocError {
    /// The import path is empty or contains invalid components.
    #[error("Invalid import path: {0}")]
    InvalidImportPath(String),

    /// The import path could not be resolved to a directory of source files.
    #[error("Package not found: {import_path}: {reason}")]
    PackageNotFound {
        /// Import path as requested by the caller.
        import_path: String,
        /// Why resolution failed.
        reason: String,
    },

    /// A source diagnostic, only raised when error suppression is disabled.
    #[error("{}: {message}", path.display())]
    Diagnostic {
        /// File the diagnostic refers to.
        path: PathBuf,
        /// Human readable description.
        message: String,
    },

    /// Failed to read a source file.
    #[error("Failed to read file: {0}")]
    Io(#[from] io::Error),

    /// The package was documented, but its sub-packages could not be listed.
    ///
    /// The fully populated package travels with the error so callers can decide whether to
    /// treat the result as a warning.
    #[error("Failed to list sub-packages of {}: {source}", package.import_path)]
    SubPackages {
        /// The package model built before discovery failed.
        package: Box<Package>,
        /// The root listing error.
        source: io::Error,
    },

    /// The Rust toolchain could not be queried for its library sources.
    #[error("Toolchain error: {0}")]
    Toolchain(String),

    /// Syntax highlighting failed.
    #[error("Highlighting error: {0}")]
    Highlight(String),
}

impl From<syntect::Error> for PkgdocError {
    fn from(err: syntect::Error) -> Self {
        Self::Highlight(err.to_string())
    }
}

impl PkgdocError {
    /// The partially populated package carried by a sub-package discovery failure.
    pub fn partial(&self) -> Option<&Package> {
        match self {
            Self::SubPackages { package, .. } => Some(package),
            _ => None,
        }
    }

    /// Consume the error, returning the partial package if there is one.
    pub fn into_partial(self) -> Option<Package> {
        match self {
            Self::SubPackages { package, .. } => Some(*package),
            _ => None,
        }
    }
}

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, PkgdocError>;

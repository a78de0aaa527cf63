use std::{path::PathBuf, process::Command};

use crate::error::{PkgdocError, Result};

/// Location of the standard library sources below a toolchain sysroot.
const LIBRARY_SRC: &[&str] = &["lib", "rustlib", "src", "rust", "library"];

/// Locate the active toolchain sysroot path.
pub fn sysroot() -> Result<PathBuf> {
    let rustc = which::which("rustc")
        .map_err(|e| PkgdocError::Toolchain(format!("Failed to locate rustc: {e}")))?;

    let output = Command::new(rustc)
        .args(["--print", "sysroot"])
        .output()
        .map_err(|e| PkgdocError::Toolchain(format!("Failed to get sysroot: {e}")))?;

    if !output.status.success() {
        return Err(PkgdocError::Toolchain(
            "rustc --print sysroot exited with an error".to_string(),
        ));
    }

    let sysroot = String::from_utf8(output.stdout)
        .map_err(|e| PkgdocError::Toolchain(format!("Invalid UTF-8 in sysroot path: {e}")))?
        .trim()
        .to_string();

    Ok(PathBuf::from(sysroot))
}

/// Locate the standard library source root of the active toolchain.
///
/// This requires the `rust-src` component.
pub fn library_source_root() -> Result<PathBuf> {
    let root = library_root_in(sysroot()?);
    if !root.is_dir() {
        return Err(PkgdocError::Toolchain(format!(
            "{} does not exist - run 'rustup component add rust-src'",
            root.display()
        )));
    }
    Ok(root)
}

/// The standard library source root below `sysroot`.
fn library_root_in(sysroot: PathBuf) -> PathBuf {
    LIBRARY_SRC
        .iter()
        .fold(sysroot, |path, component| path.join(component))
}

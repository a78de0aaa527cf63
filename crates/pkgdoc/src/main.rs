//! Command-line front end for libpkgdoc.

use std::{
    env,
    io::{self, IsTerminal, Write},
    path::PathBuf,
    process::{self, Command, Stdio},
    thread,
};

use anyhow::{Context, Result};
use clap::Parser;
use libpkgdoc::{
    ExtractMode, LIBRARY_ENV, Package, Pkgdoc, PkgdocError, SearchRoots, WORKSPACE_ENV,
};
use tracing_subscriber::EnvFilter;

mod output;

use output::TextRenderer;

/// Command-line arguments.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Import path of the package to document, relative to a search root
    import_path: String,

    /// Workspace search root, consulted first
    #[arg(long, env = WORKSPACE_ENV)]
    workspace_root: Option<PathBuf>,

    /// Standard library search root, consulted when the workspace root has no such package
    #[arg(long, env = LIBRARY_ENV)]
    library_root: Option<PathBuf>,

    /// Output the documentation model as JSON
    #[arg(long, default_value_t = false, conflicts_with = "html")]
    json: bool,

    /// Output the package documentation as HTML
    #[arg(long, default_value_t = false)]
    html: bool,

    /// Document private items
    #[arg(long, default_value_t = false)]
    private: bool,

    /// Attach trait implementation methods to their types
    #[arg(long, default_value_t = false)]
    trait_impls: bool,

    /// Fail on files that do not parse instead of skipping them
    #[arg(long, default_value_t = false)]
    strict: bool,

    /// Colorize output
    #[arg(long, default_value = "auto", value_parser = ["auto", "always", "never"], env = "PKGDOC_COLOR")]
    color: String,

    /// Disable paging
    #[arg(long, default_value_t = false)]
    no_page: bool,
}

impl Cli {
    /// Search roots from the flags. The toolchain is asked for a library root only when none
    /// was given.
    fn roots(&self) -> SearchRoots {
        SearchRoots::resolve(self.workspace_root.clone(), self.library_root.clone())
    }

    /// Extraction mode selected by the flags.
    fn mode(&self) -> ExtractMode {
        let mut mode = ExtractMode::empty();
        mode.set(ExtractMode::ALL_DECLS, self.private);
        mode.set(ExtractMode::TRAIT_IMPLS, self.trait_impls);
        mode
    }
}

/// Document the requested package, tolerating a failed sub-package listing.
fn document(cli: &Cli) -> Result<Package> {
    let pkgdoc = Pkgdoc::from_roots(cli.roots())
        .with_mode(cli.mode())
        .with_suppress_errors(!cli.strict);

    match pkgdoc.document(&cli.import_path) {
        Ok(package) => Ok(package),
        Err(PkgdocError::SubPackages { package, source }) => {
            eprintln!(
                "warning: failed to list sub-packages of {}: {source}",
                package.import_path
            );
            Ok(*package)
        }
        Err(err) => Err(err).with_context(|| format!("documenting {}", cli.import_path)),
    }
}

/// Document and print the requested package.
fn run(cli: &Cli) -> Result<()> {
    let should_highlight = match cli.color.as_str() {
        "never" => false,
        "always" => true,
        _ => io::stdout().is_terminal(),
    };

    let package = document(cli)?;
    let output = if cli.json {
        serde_json::to_string_pretty(&package).context("serializing package")?
    } else if cli.html {
        package.doc.html()
    } else {
        TextRenderer::new(should_highlight).render(&package)?
    };

    if io::stdout().is_terminal() && !cli.no_page {
        page_output(output)?;
    } else {
        print!("{output}");
    }
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(&cli) {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}

/// Pipe `content` through `$PAGER`, defaulting to `less`.
fn page_output(content: String) -> Result<()> {
    let pager = env::var("PAGER").unwrap_or_else(|_| "less".to_string());
    let mut child = Command::new(&pager)
        .stdin(Stdio::piped())
        .spawn()
        .with_context(|| format!("failed to start pager {pager}"))?;

    let mut stdin = child
        .stdin
        .take()
        .ok_or_else(|| io::Error::other("Failed to open stdin for pager"))?;

    thread::spawn(move || {
        stdin.write_all(content.as_bytes()).ok();
        // Dropping stdin signals EOF to the pager.
        drop(stdin);
    });

    let status = child.wait().context("failed to wait for pager")?;
    if !status.success() {
        eprintln!("Pager exited with non-zero status: {status}");
    }
    Ok(())
}

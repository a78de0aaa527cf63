//! Terminal syntax highlighting for rendered declarations.

use once_cell::sync::Lazy;
use syntect::{
    easy::HighlightLines,
    highlighting::{Style, Theme, ThemeSet},
    parsing::{SyntaxReference, SyntaxSet},
    util::{LinesWithEndings, as_24_bit_terminal_escaped},
};

use crate::{PkgdocError, Result};

/// Syntax definitions, loaded on first use.
static SYNTAX_SET: Lazy<SyntaxSet> = Lazy::new(SyntaxSet::load_defaults_newlines);
/// Bundled themes.
static THEME_SET: Lazy<ThemeSet> = Lazy::new(ThemeSet::load_defaults);
/// The Rust syntax definition.
static RUST_SYNTAX: Lazy<Option<&'static SyntaxReference>> =
    Lazy::new(|| SYNTAX_SET.find_syntax_by_extension("rs"));
/// Theme used for all output.
static THEME: Lazy<Option<&'static Theme>> =
    Lazy::new(|| THEME_SET.themes.get("Solarized (dark)"));

/// Highlight Rust source with 24-bit ANSI escapes.
///
/// The escapes are followed by a reset, so highlighted text can be concatenated with plain
/// text safely.
pub fn highlight_code(code: &str) -> Result<String> {
    let syntax = RUST_SYNTAX
        .ok_or_else(|| PkgdocError::Highlight("Rust syntax not found".to_string()))?;
    let theme = THEME
        .ok_or_else(|| PkgdocError::Highlight("Solarized (dark) theme not found".to_string()))?;
    let mut h = HighlightLines::new(syntax, theme);

    let mut output = String::new();
    for line in LinesWithEndings::from(code) {
        let ranges: Vec<(Style, &str)> = h.highlight_line(line, &SYNTAX_SET)?;
        output.push_str(&as_24_bit_terminal_escaped(&ranges[..], false));
    }
    output.push_str("\x1b[0m");
    Ok(output)
}

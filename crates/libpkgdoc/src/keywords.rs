//! Identifier and keyword helpers used while naming packages.

/// Rust reserved words that require raw identifier handling.
pub const RESERVED_WORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "do",
    "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if", "impl", "in",
    "let", "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub", "ref",
    "return", "static", "struct", "trait", "true", "try", "type", "typeof", "unsafe", "unsized",
    "use", "virtual", "where", "while", "yield",
];

/// Determine whether `ident` is a Rust keyword that needs escaping.
pub fn is_reserved_word(ident: &str) -> bool {
    RESERVED_WORDS.contains(&ident)
}

/// Turn a directory or crate name into the identifier used to refer to the module.
pub fn module_ident(name: &str) -> String {
    let ident = name.replace('-', "_");
    if is_reserved_word(&ident) {
        format!("r#{ident}")
    } else {
        ident
    }
}

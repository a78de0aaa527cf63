//! The documentation model handed to callers.
//!
//! Every collection preserves source declaration order. Entities are plain data: once a
//! [`Package`] is built nothing in this crate mutates it.

use std::fmt;

use serde::Serialize;

use crate::doctext;

/// Raw documentation text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Doc(
    /// The text exactly as extracted from doc comments.
    String,
);

impl Doc {
    /// Wrap raw documentation text.
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// The raw text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether there is no documentation.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Render the text as an escaped HTML fragment.
    pub fn html(&self) -> String {
        doctext::to_html(&self.0)
    }
}

impl fmt::Display for Doc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for Doc {
    fn from(text: String) -> Self {
        Self(text)
    }
}

impl From<&str> for Doc {
    fn from(text: &str) -> Self {
        Self(text.to_string())
    }
}

/// A documented package.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Package {
    /// Identifier the package is referred to by.
    pub name: String,
    /// Import path the package was resolved from.
    pub import_path: String,
    /// Package documentation.
    pub doc: Doc,
    /// First sentence of the package documentation.
    pub synopsis: String,
    /// Constants not associated with a type.
    pub constants: Vec<Value>,
    /// Statics not associated with a type.
    pub variables: Vec<Value>,
    /// Free functions that are not constructors of a type.
    pub functions: Vec<Function>,
    /// Named types.
    pub types: Vec<Type>,
    /// Names of immediate subdirectories holding source files.
    pub sub_packages: Vec<String>,
}

/// A constant or static.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Value {
    /// Documentation.
    pub doc: Doc,
    /// Canonical declaration text.
    pub decl: String,
}

/// A function, associated function or method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Function {
    /// Documentation.
    pub doc: Doc,
    /// Function name.
    pub name: String,
    /// Canonical signature with an empty body.
    pub decl: String,
}

/// A named type and the declarations associated with it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Type {
    /// Documentation.
    pub doc: Doc,
    /// Type name.
    pub name: String,
    /// Canonical declaration text.
    pub decl: String,
    /// Constants of this type, including associated constants.
    pub constants: Vec<Value>,
    /// Statics of this type.
    pub variables: Vec<Value>,
    /// Constructors and associated functions.
    pub functions: Vec<Function>,
    /// Functions taking `self`.
    pub methods: Vec<Function>,
}

impl Package {
    /// Look up a type by name.
    pub fn find_type(&self, name: &str) -> Option<&Type> {
        self.types.iter().find(|t| t.name == name)
    }

    /// Whether the package declares nothing.
    pub fn is_empty(&self) -> bool {
        self.constants.is_empty()
            && self.variables.is_empty()
            && self.functions.is_empty()
            && self.types.is_empty()
    }
}

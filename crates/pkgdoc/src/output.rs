//! Plain-text rendering of a documented package.

use libpkgdoc::{Doc, Function, Package, Result, Type, Value, highlight_code};

/// Indentation applied to documentation below a declaration.
const DOC_INDENT: &str = "    ";

/// Renders packages as text, optionally highlighting declarations.
pub struct TextRenderer {
    /// Whether declarations are syntax highlighted.
    highlight: bool,
}

impl TextRenderer {
    /// Create a renderer.
    pub fn new(highlight: bool) -> Self {
        Self { highlight }
    }

    /// Render the whole package.
    pub fn render(&self, pkg: &Package) -> Result<String> {
        let mut out = format!("package {} // import \"{}\"\n", pkg.name, pkg.import_path);
        if !pkg.doc.is_empty() {
            out.push('\n');
            out.push_str(pkg.doc.as_str());
        }

        if !pkg.constants.is_empty() {
            section(&mut out, "CONSTANTS");
            self.values(&mut out, &pkg.constants)?;
        }
        if !pkg.variables.is_empty() {
            section(&mut out, "VARIABLES");
            self.values(&mut out, &pkg.variables)?;
        }
        if !pkg.functions.is_empty() {
            section(&mut out, "FUNCTIONS");
            self.functions(&mut out, &pkg.functions)?;
        }
        if !pkg.types.is_empty() {
            section(&mut out, "TYPES");
            for ty in &pkg.types {
                self.ty(&mut out, ty)?;
            }
        }
        if !pkg.sub_packages.is_empty() {
            section(&mut out, "SUB-PACKAGES");
            for name in &pkg.sub_packages {
                out.push_str(DOC_INDENT);
                out.push_str(name);
                out.push('\n');
            }
        }
        Ok(out)
    }

    fn ty(&self, out: &mut String, ty: &Type) -> Result<()> {
        self.entry(out, &ty.decl, &ty.doc)?;
        self.values(out, &ty.constants)?;
        self.values(out, &ty.variables)?;
        self.functions(out, &ty.functions)?;
        self.functions(out, &ty.methods)
    }

    fn values(&self, out: &mut String, values: &[Value]) -> Result<()> {
        for value in values {
            self.entry(out, &value.decl, &value.doc)?;
        }
        Ok(())
    }

    fn functions(&self, out: &mut String, functions: &[Function]) -> Result<()> {
        for function in functions {
            self.entry(out, &function.decl, &function.doc)?;
        }
        Ok(())
    }

    /// A declaration followed by its indented documentation.
    fn entry(&self, out: &mut String, decl: &str, doc: &Doc) -> Result<()> {
        if self.highlight {
            out.push_str(&highlight_code(decl)?);
        } else {
            out.push_str(decl);
        }
        out.push('\n');
        for line in doc.as_str().lines() {
            if !line.is_empty() {
                out.push_str(DOC_INDENT);
                out.push_str(line);
            }
            out.push('\n');
        }
        out.push('\n');
        Ok(())
    }
}

/// Start a titled section.
fn section(out: &mut String, title: &str) {
    out.push('\n');
    out.push_str(title);
    out.push_str("\n\n");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn package() -> Package {
        Package {
            name: "shapes".to_string(),
            import_path: "geo/shapes".to_string(),
            doc: Doc::new("Shapes.\n"),
            synopsis: "Shapes.".to_string(),
            constants: vec![Value {
                doc: Doc::new("Circle constant.\n\nClose enough.\n"),
                decl: "pub const PI: f64 = 3.14;".to_string(),
            }],
            variables: Vec::new(),
            functions: Vec::new(),
            types: vec![Type {
                doc: Doc::new("A circle.\n"),
                name: "Circle".to_string(),
                decl: "pub struct Circle {}".to_string(),
                constants: Vec::new(),
                variables: Vec::new(),
                functions: Vec::new(),
                methods: vec![Function {
                    doc: Doc::default(),
                    name: "radius".to_string(),
                    decl: "pub fn radius(&self) -> f64 {}".to_string(),
                }],
            }],
            sub_packages: vec!["fill".to_string()],
        }
    }

    #[test]
    fn renders_sections() -> Result<()> {
        let text = TextRenderer::new(false).render(&package())?;
        let expected = "\
package shapes // import \"geo/shapes\"

Shapes.

CONSTANTS

pub const PI: f64 = 3.14;
    Circle constant.

    Close enough.


TYPES

pub struct Circle {}
    A circle.

pub fn radius(&self) -> f64 {}


SUB-PACKAGES

    fill
";
        assert_eq!(text, expected);
        Ok(())
    }

    #[test]
    fn highlighted_output_has_escapes() -> Result<()> {
        let text = TextRenderer::new(true).render(&package())?;
        assert!(text.contains("\x1b["));
        assert!(text.starts_with("package shapes"));
        Ok(())
    }
}

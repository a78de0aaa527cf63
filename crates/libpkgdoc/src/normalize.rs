//! Converts raw grouped declarations into the documentation model.

use crate::{
    doctext,
    extract::{RawFunc, RawPackage, RawType, RawValue},
    model::{Doc, Function, Package, Type, Value},
    render::Renderer,
};

/// Build the package model for `raw`, rendering every declaration with `renderer`.
///
/// Sub-packages are left empty; they are filled in by discovery.
pub fn normalize(raw: &RawPackage, renderer: &Renderer) -> Package {
    Package {
        name: raw.name.clone(),
        import_path: raw.import_path.clone(),
        doc: Doc::new(raw.doc.clone()),
        synopsis: doctext::synopsis(&raw.doc),
        constants: values(&raw.consts, renderer),
        variables: values(&raw.vars, renderer),
        functions: functions(&raw.funcs, renderer),
        types: raw.types.iter().map(|t| normalize_type(t, renderer)).collect(),
        sub_packages: Vec::new(),
    }
}

/// Normalize a type and everything associated with it.
fn normalize_type(raw: &RawType, renderer: &Renderer) -> Type {
    Type {
        doc: Doc::new(raw.doc.clone()),
        name: raw.name.clone(),
        decl: renderer.render_item(&raw.decl),
        constants: values(&raw.consts, renderer),
        variables: values(&raw.vars, renderer),
        functions: functions(&raw.funcs, renderer),
        methods: functions(&raw.methods, renderer),
    }
}

/// Normalize constants or statics.
fn values(raw: &[RawValue], renderer: &Renderer) -> Vec<Value> {
    raw.iter()
        .map(|v| Value {
            doc: Doc::new(v.doc.clone()),
            decl: renderer.render_item(&v.decl),
        })
        .collect()
}

/// Normalize functions.
fn functions(raw: &[RawFunc], renderer: &Renderer) -> Vec<Function> {
    raw.iter()
        .map(|f| Function {
            doc: Doc::new(f.doc.clone()),
            name: f.name.clone(),
            decl: renderer.render_fn(&f.decl),
        })
        .collect()
}

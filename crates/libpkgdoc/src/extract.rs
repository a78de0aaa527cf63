//! Groups the items of a loaded package into documented declarations.
//!
//! Items are collected in source order: files in file-name order, items in the order they
//! appear in each file. Constants, statics and free functions are attached to a documented
//! type when they produce that type; everything inside an `impl` block is attached to the
//! type the block implements.

use std::collections::{HashMap, HashSet};

use bitflags::bitflags;
use syn::{
    AttrStyle, Attribute, Expr, ExprLit, GenericArgument, ImplItem, Item, ItemConst, ItemFn,
    ItemImpl, Lit, Meta, PathArguments, ReturnType, Type, Visibility,
};
use tracing::trace;

use crate::{
    doctext::{indent_len, strip_indent},
    loader::LoadedPackage,
};

bitflags! {
    /// Controls which declarations are extracted.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ExtractMode: u32 {
        /// Extract every declaration, not only `pub` ones.
        const ALL_DECLS = 1 << 0;
        /// Attach methods from trait implementations to their self type.
        const TRAIT_IMPLS = 1 << 1;
    }
}

/// Smart pointer and wrapper types a constructor may return its type through.
const CONSTRUCTOR_WRAPPERS: &[&str] = &["Box", "Rc", "Arc", "Option", "Result"];

/// A constant or static with its documentation.
#[derive(Debug, Clone)]
pub struct RawValue {
    /// Documentation text.
    pub doc: String,
    /// The declaration, either `Item::Const` or `Item::Static`.
    pub decl: Item,
}

/// A function, associated function or method with its documentation.
#[derive(Debug, Clone)]
pub struct RawFunc {
    /// Documentation text.
    pub doc: String,
    /// Function name.
    pub name: String,
    /// The declaration. Associated functions are lifted out of their impl block.
    pub decl: ItemFn,
}

/// A named type with its documentation and associated declarations.
#[derive(Debug, Clone)]
pub struct RawType {
    /// Documentation text.
    pub doc: String,
    /// Type name.
    pub name: String,
    /// The declaration: a struct, enum, union, type alias or trait.
    pub decl: Item,
    /// Constants of this type, and associated constants.
    pub consts: Vec<RawValue>,
    /// Statics of this type.
    pub vars: Vec<RawValue>,
    /// Constructors and associated functions without a receiver.
    pub funcs: Vec<RawFunc>,
    /// Functions taking `self`.
    pub methods: Vec<RawFunc>,
}

/// Every documented declaration of a package, grouped.
#[derive(Debug, Clone)]
pub struct RawPackage {
    /// Package identifier.
    pub name: String,
    /// Import path the package was loaded from.
    pub import_path: String,
    /// Package documentation from inner doc comments.
    pub doc: String,
    /// Top-level constants.
    pub consts: Vec<RawValue>,
    /// Top-level statics.
    pub vars: Vec<RawValue>,
    /// Top-level functions.
    pub funcs: Vec<RawFunc>,
    /// Types, each with its associated declarations.
    pub types: Vec<RawType>,
}

/// Extract grouped declarations from a loaded package.
pub fn extract(pkg: &LoadedPackage, mode: ExtractMode) -> RawPackage {
    let mut extractor = Extractor::new(mode);
    let mut docs = Vec::new();

    for file in pkg.files.values() {
        let doc = inner_doc(&file.attrs);
        if !doc.is_empty() {
            docs.push(doc);
        }
        extractor.declare_types(&file.items);
    }
    for file in pkg.files.values() {
        extractor.collect(&file.items);
    }

    RawPackage {
        name: pkg.name.clone(),
        import_path: pkg.import_path.to_string(),
        doc: docs.join("\n"),
        consts: extractor.consts,
        vars: extractor.vars,
        funcs: extractor.funcs,
        types: extractor.types,
    }
}

/// Accumulates declarations while walking a package's files.
struct Extractor {
    mode: ExtractMode,
    /// Names of every type declared in the package, documented or not.
    declared: HashSet<String>,
    /// Index into `types` by type name.
    index: HashMap<String, usize>,
    consts: Vec<RawValue>,
    vars: Vec<RawValue>,
    funcs: Vec<RawFunc>,
    types: Vec<RawType>,
}

impl Extractor {
    fn new(mode: ExtractMode) -> Self {
        Self {
            mode,
            declared: HashSet::new(),
            index: HashMap::new(),
            consts: Vec::new(),
            vars: Vec::new(),
            funcs: Vec::new(),
            types: Vec::new(),
        }
    }

    fn visible(&self, vis: &Visibility) -> bool {
        self.mode.contains(ExtractMode::ALL_DECLS) || matches!(vis, Visibility::Public(_))
    }

    /// Record the types of a file. Runs over every file before anything is associated, so
    /// declarations may precede the type they belong to.
    fn declare_types(&mut self, items: &[Item]) {
        for item in items {
            if is_test_only(item_attrs(item)) {
                continue;
            }
            let (vis, ident) = match item {
                Item::Struct(s) => (&s.vis, &s.ident),
                Item::Enum(e) => (&e.vis, &e.ident),
                Item::Union(u) => (&u.vis, &u.ident),
                Item::Type(t) => (&t.vis, &t.ident),
                Item::Trait(t) => (&t.vis, &t.ident),
                _ => continue,
            };
            let name = ident.to_string();
            self.declared.insert(name.clone());
            if !self.visible(vis) || self.index.contains_key(&name) {
                continue;
            }
            self.index.insert(name.clone(), self.types.len());
            self.types.push(RawType {
                doc: outer_doc(item_attrs(item)),
                name,
                decl: item.clone(),
                consts: Vec::new(),
                vars: Vec::new(),
                funcs: Vec::new(),
                methods: Vec::new(),
            });
        }
    }

    fn collect(&mut self, items: &[Item]) {
        for item in items {
            if is_test_only(item_attrs(item)) {
                continue;
            }
            match item {
                Item::Const(c) if self.visible(&c.vis) => {
                    let value = raw_value(item, &c.attrs);
                    match self.owner(value_type(&c.ty)) {
                        Some(i) => self.types[i].consts.push(value),
                        None => self.consts.push(value),
                    }
                }
                Item::Static(s) if self.visible(&s.vis) => {
                    let value = raw_value(item, &s.attrs);
                    match self.owner(value_type(&s.ty)) {
                        Some(i) => self.types[i].vars.push(value),
                        None => self.vars.push(value),
                    }
                }
                Item::Fn(f) if self.visible(&f.vis) => {
                    let func = raw_func(f.clone());
                    match self.owner(constructed_type(&f.sig.output)) {
                        Some(i) => self.types[i].funcs.push(func),
                        None => self.funcs.push(func),
                    }
                }
                Item::Impl(imp) => self.collect_impl(imp),
                _ => {}
            }
        }
    }

    fn collect_impl(&mut self, imp: &ItemImpl) {
        let Some(name) = path_ident(&imp.self_ty) else {
            trace!("skipping impl for unnamed type");
            return;
        };
        let Some(&i) = self.index.get(&name) else {
            if self.declared.contains(&name) {
                trace!("skipping impl for hidden type {name}");
            } else {
                trace!("skipping impl for type {name} declared outside the package");
            }
            return;
        };
        let trait_impl = imp.trait_.is_some();
        if trait_impl && !self.mode.contains(ExtractMode::TRAIT_IMPLS) {
            return;
        }

        for impl_item in &imp.items {
            match impl_item {
                ImplItem::Fn(f) if !is_test_only(&f.attrs) => {
                    if !trait_impl && !self.visible(&f.vis) {
                        continue;
                    }
                    let func = raw_func(ItemFn {
                        attrs: f.attrs.clone(),
                        vis: f.vis.clone(),
                        sig: f.sig.clone(),
                        block: Box::new(f.block.clone()),
                    });
                    trace!("associating {} with {name}", func.name);
                    if f.sig.receiver().is_some() {
                        self.types[i].methods.push(func);
                    } else {
                        self.types[i].funcs.push(func);
                    }
                }
                ImplItem::Const(c) if !is_test_only(&c.attrs) => {
                    if !trait_impl && !self.visible(&c.vis) {
                        continue;
                    }
                    let decl = Item::Const(ItemConst {
                        attrs: c.attrs.clone(),
                        vis: c.vis.clone(),
                        const_token: c.const_token,
                        ident: c.ident.clone(),
                        generics: c.generics.clone(),
                        colon_token: c.colon_token,
                        ty: Box::new(c.ty.clone()),
                        eq_token: c.eq_token,
                        expr: Box::new(c.expr.clone()),
                        semi_token: c.semi_token,
                    });
                    self.types[i].consts.push(raw_value(&decl, &c.attrs));
                }
                _ => {}
            }
        }
    }

    /// The index of the documented type named `name`, if any.
    fn owner(&self, name: Option<String>) -> Option<usize> {
        name.and_then(|name| self.index.get(&name).copied())
    }
}

fn raw_value(item: &Item, attrs: &[Attribute]) -> RawValue {
    RawValue {
        doc: outer_doc(attrs),
        decl: item.clone(),
    }
}

fn raw_func(decl: ItemFn) -> RawFunc {
    RawFunc {
        doc: outer_doc(&decl.attrs),
        name: decl.sig.ident.to_string(),
        decl,
    }
}

fn item_attrs(item: &Item) -> &[Attribute] {
    match item {
        Item::Const(i) => &i.attrs,
        Item::Enum(i) => &i.attrs,
        Item::Fn(i) => &i.attrs,
        Item::Impl(i) => &i.attrs,
        Item::Static(i) => &i.attrs,
        Item::Struct(i) => &i.attrs,
        Item::Trait(i) => &i.attrs,
        Item::Type(i) => &i.attrs,
        Item::Union(i) => &i.attrs,
        _ => &[],
    }
}

/// Whether the attributes include `#[cfg(test)]`.
fn is_test_only(attrs: &[Attribute]) -> bool {
    attrs.iter().any(|attr| {
        attr.path().is_ident("cfg")
            && attr
                .parse_args::<syn::Ident>()
                .is_ok_and(|ident| ident == "test")
    })
}

/// The name of the type a path type refers to, looking through references and grouping.
fn value_type(ty: &Type) -> Option<String> {
    match ty {
        Type::Reference(r) => value_type(&r.elem),
        Type::Paren(p) => value_type(&p.elem),
        Type::Group(g) => value_type(&g.elem),
        _ => path_ident(ty),
    }
}

/// The type a function constructs, judged from its return type.
fn constructed_type(output: &ReturnType) -> Option<String> {
    let ReturnType::Type(_, ty) = output else {
        return None;
    };
    let Type::Path(path) = ty.as_ref() else {
        return None;
    };
    let segment = path.path.segments.last()?;
    if CONSTRUCTOR_WRAPPERS.contains(&segment.ident.to_string().as_str())
        && let PathArguments::AngleBracketed(args) = &segment.arguments
        && let Some(GenericArgument::Type(inner)) = args.args.first()
    {
        return path_ident(inner);
    }
    path_ident(ty)
}

/// The final identifier of an unqualified path type.
fn path_ident(ty: &Type) -> Option<String> {
    match ty {
        Type::Path(path) if path.qself.is_none() => path
            .path
            .segments
            .last()
            .map(|segment| segment.ident.to_string()),
        _ => None,
    }
}

/// Documentation of an item, from its `///` and `/** */` comments.
pub fn outer_doc(attrs: &[Attribute]) -> String {
    doc_text(attrs, |style| matches!(style, AttrStyle::Outer))
}

/// Documentation of a file, from its `//!` and `/*! */` comments.
pub fn inner_doc(attrs: &[Attribute]) -> String {
    doc_text(attrs, |style| matches!(style, AttrStyle::Inner(_)))
}

/// Documentation text carried by the doc attributes whose style is selected.
///
/// Every doc attribute contributes at least one line, so a bare `///` separates paragraphs.
/// Lines are unindented by their common leading whitespace, surrounding blank lines are
/// dropped, and every line ends with a newline.
fn doc_text(attrs: &[Attribute], select: impl Fn(&AttrStyle) -> bool) -> String {
    let mut lines = Vec::new();
    for attr in attrs {
        if !select(&attr.style) || !attr.path().is_ident("doc") {
            continue;
        }
        if let Meta::NameValue(nv) = &attr.meta
            && let Expr::Lit(ExprLit {
                lit: Lit::Str(s), ..
            }) = &nv.value
        {
            lines.extend(s.value().split('\n').map(|l| l.trim_end().to_string()));
        }
    }

    let indent = lines
        .iter()
        .filter(|line| !line.is_empty())
        .map(|line| indent_len(line))
        .min()
        .unwrap_or(0);

    let start = lines.iter().position(|l| !l.is_empty());
    let end = lines.iter().rposition(|l| !l.is_empty());
    let (Some(start), Some(end)) = (start, end) else {
        return String::new();
    };

    let mut text = String::new();
    for line in &lines[start..=end] {
        text.push_str(strip_indent(line, indent));
        text.push('\n');
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import_path::ImportPath;
    use pretty_assertions::assert_eq;
    use std::{collections::BTreeMap, path::PathBuf};

    fn package(files: &[(&str, &str)]) -> LoadedPackage {
        let files = files
            .iter()
            .map(|(name, source)| {
                (
                    PathBuf::from("/pkg").join(name),
                    syn::parse_file(source).unwrap(),
                )
            })
            .collect::<BTreeMap<_, _>>();
        LoadedPackage {
            name: "pkg".to_string(),
            import_path: ImportPath::parse("pkg").unwrap(),
            dir: PathBuf::from("/pkg"),
            files,
        }
    }

    fn func_names(funcs: &[RawFunc]) -> Vec<&str> {
        funcs.iter().map(|f| f.name.as_str()).collect()
    }

    #[test]
    fn doc_text_unindents_and_trims() {
        let file = syn::parse_file(
            r#"
            ///
            /// First line.
            ///
            ///     code
            ///
            fn f() {}
            "#,
        )
        .unwrap();
        let Item::Fn(f) = &file.items[0] else {
            panic!("expected a function");
        };
        assert_eq!(outer_doc(&f.attrs), "First line.\n\n    code\n");
    }

    #[test]
    fn block_doc_comments() {
        let file = syn::parse_file("/** Block\n docs. */\nfn f() {}").unwrap();
        let Item::Fn(f) = &file.items[0] else {
            panic!("expected a function");
        };
        assert_eq!(outer_doc(&f.attrs), "Block\ndocs.\n");
    }

    #[test]
    fn wide_whitespace_indent_keeps_text() {
        let file = syn::parse_file("///\u{3000}Wide indent line.\n/// normal line.\nfn f() {}").unwrap();
        let Item::Fn(f) = &file.items[0] else {
            panic!("expected a function");
        };
        assert_eq!(outer_doc(&f.attrs), "Wide indent line.\nnormal line.\n");
    }

    #[test]
    fn package_docs_concatenate_in_file_order() {
        let raw = extract(
            &package(&[("b.rs", "//! Second.\n"), ("a.rs", "//! First.\n")]),
            ExtractMode::default(),
        );
        assert_eq!(raw.doc, "First.\n\nSecond.\n");
    }

    #[test]
    fn groups_by_kind_in_source_order() {
        let raw = extract(
            &package(&[(
                "lib.rs",
                r#"
                pub const B: u32 = 2;
                pub const A: u32 = 1;
                pub static COUNTER: usize = 0;
                pub fn zeta() {}
                pub fn alpha() {}
                fn hidden() {}
                pub struct Zed;
                pub enum Alpha { One }
                pub trait Shape {}
                pub type Id = u64;
                "#,
            )]),
            ExtractMode::default(),
        );
        assert_eq!(raw.consts.len(), 2);
        assert_eq!(raw.vars.len(), 1);
        assert_eq!(func_names(&raw.funcs), vec!["zeta", "alpha"]);
        let types: Vec<_> = raw.types.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(types, vec!["Zed", "Alpha", "Shape", "Id"]);
    }

    #[test]
    fn associates_constructors_and_methods() {
        let raw = extract(
            &package(&[
                (
                    "a.rs",
                    r#"
                    pub const ORIGIN: Point = Point { x: 0, y: 0 };
                    pub fn parse(s: &str) -> Result<Point, String> { todo!() }
                    pub fn boxed() -> Box<Point> { todo!() }
                    pub fn distance(a: &Point, b: &Point) -> f64 { 0.0 }
                    "#,
                ),
                (
                    "b.rs",
                    r#"
                    pub struct Point { pub x: i32, pub y: i32 }
                    impl Point {
                        pub const UNIT: i32 = 1;
                        pub fn new(x: i32, y: i32) -> Self { Self { x, y } }
                        pub fn norm(&self) -> f64 { 0.0 }
                        fn private(&self) {}
                    }
                    impl std::fmt::Display for Point {
                        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { Ok(()) }
                    }
                    "#,
                ),
            ]),
            ExtractMode::default(),
        );

        assert!(raw.consts.is_empty());
        assert_eq!(func_names(&raw.funcs), vec!["distance"]);
        let point = &raw.types[0];
        assert_eq!(point.consts.len(), 2);
        assert_eq!(func_names(&point.funcs), vec!["parse", "boxed", "new"]);
        assert_eq!(func_names(&point.methods), vec!["norm"]);
    }

    #[test]
    fn trait_impls_and_private_items_follow_mode() {
        let source = r#"
            pub struct Point;
            struct Hidden;
            impl Hidden { pub fn touch(&self) {} }
            impl Point { fn private(&self) {} }
            impl Clone for Point { fn clone(&self) -> Self { Point } }
            pub fn make_hidden() -> Hidden { Hidden }
        "#;

        let raw = extract(&package(&[("lib.rs", source)]), ExtractMode::TRAIT_IMPLS);
        assert_eq!(raw.types.len(), 1);
        assert_eq!(func_names(&raw.types[0].methods), vec!["clone"]);
        assert_eq!(func_names(&raw.funcs), vec!["make_hidden"]);

        let raw = extract(&package(&[("lib.rs", source)]), ExtractMode::ALL_DECLS);
        let types: Vec<_> = raw.types.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(types, vec!["Point", "Hidden"]);
        assert_eq!(func_names(&raw.types[0].methods), vec!["private"]);
        assert_eq!(func_names(&raw.types[1].methods), vec!["touch"]);
        assert_eq!(func_names(&raw.types[1].funcs), vec!["make_hidden"]);
    }

    #[test]
    fn skips_test_only_items_and_foreign_impls() {
        let raw = extract(
            &package(&[(
                "lib.rs",
                r#"
                pub fn kept() {}
                #[cfg(test)]
                pub fn only_in_tests() {}
                #[cfg(test)]
                mod tests {}
                impl Elsewhere { pub fn lost(&self) {} }
                "#,
            )]),
            ExtractMode::default(),
        );
        assert_eq!(func_names(&raw.funcs), vec!["kept"]);
        assert!(raw.types.is_empty());
    }

    #[test]
    fn no_function_in_two_groups() {
        let raw = extract(
            &package(&[(
                "lib.rs",
                r#"
                pub struct A;
                pub struct B;
                impl A { pub fn new() -> B { B } pub fn run(&self) {} }
                impl B { pub fn run(&self) {} }
                pub fn make() -> A { A }
                "#,
            )]),
            ExtractMode::default(),
        );
        let total = raw.funcs.len()
            + raw
                .types
                .iter()
                .map(|t| t.funcs.len() + t.methods.len())
                .sum::<usize>();
        assert_eq!(total, 4);
        assert_eq!(func_names(&raw.types[0].funcs), vec!["new", "make"]);
        assert_eq!(func_names(&raw.types[0].methods), vec!["run"]);
        assert_eq!(func_names(&raw.types[1].methods), vec!["run"]);
        assert!(raw.types[1].funcs.is_empty());
    }
}

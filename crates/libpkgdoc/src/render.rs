//! Renders declarations back to canonical source text.

use std::mem;

use proc_macro2::TokenStream;
use quote::ToTokens;
use rust_format::{Formatter, PrettyPlease};
use syn::{
    AttrStyle, Attribute, Block, Field, Fields, Item, ItemFn, Token, TraitItem, Type, TypeInfer,
    Visibility, punctuated::Punctuated,
};
use tracing::warn;

/// Marks a braced struct or union body that had private fields removed.
const FILTERED_FIELDS: &str = "// contains filtered or unexported fields";

/// Renders declarations as formatted Rust source.
///
/// The item's own doc comments are removed, since they are carried separately, and function
/// bodies are elided. Doc comments on fields, variants and trait items are kept.
///
/// Unless private items are shown, private named fields are dropped and the body is marked
/// with [`FILTERED_FIELDS`]. Private tuple fields keep their position but their type is
/// replaced by `_`.
pub struct Renderer {
    formatter: PrettyPlease,
    /// Whether to keep private fields in struct and union declarations.
    private_items: bool,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer {
    /// Create a renderer that hides private fields.
    pub fn new() -> Self {
        Self {
            formatter: PrettyPlease::default(),
            private_items: false,
        }
    }

    /// Enables or disables rendering of private fields.
    pub fn with_private_items(mut self, private_items: bool) -> Self {
        self.private_items = private_items;
        self
    }

    /// Render a constant, static or type declaration.
    pub fn render_item(&self, item: &Item) -> String {
        let mut item = item.clone();
        let mut filtered = false;
        match &mut item {
            Item::Fn(f) => {
                strip_docs(&mut f.attrs);
                f.block = Box::new(empty_block());
            }
            Item::Trait(t) => {
                strip_docs(&mut t.attrs);
                for trait_item in &mut t.items {
                    if let TraitItem::Fn(f) = trait_item
                        && f.default.is_some()
                    {
                        f.default = None;
                        f.semi_token = Some(Default::default());
                    }
                }
            }
            Item::Struct(s) => {
                strip_docs(&mut s.attrs);
                match &mut s.fields {
                    Fields::Named(named) => filtered = self.filter_fields(&mut named.named),
                    Fields::Unnamed(unnamed) => self.hide_tuple_fields(&mut unnamed.unnamed),
                    Fields::Unit => {}
                }
            }
            Item::Union(u) => {
                strip_docs(&mut u.attrs);
                filtered = self.filter_fields(&mut u.fields.named);
            }
            Item::Const(c) => strip_docs(&mut c.attrs),
            Item::Static(s) => strip_docs(&mut s.attrs),
            Item::Enum(e) => strip_docs(&mut e.attrs),
            Item::Type(t) => strip_docs(&mut t.attrs),
            _ => {}
        }
        let text = self.format(item.into_token_stream());
        if filtered {
            mark_filtered(&text)
        } else {
            text
        }
    }

    /// Render a function signature with an empty body.
    pub fn render_fn(&self, f: &ItemFn) -> String {
        self.render_item(&Item::Fn(f.clone()))
    }

    /// Drop private named fields, returning whether any were dropped.
    fn filter_fields(&self, fields: &mut Punctuated<Field, Token![,]>) -> bool {
        if self.private_items {
            return false;
        }
        let before = fields.len();
        *fields = mem::take(fields)
            .into_iter()
            .filter(|field| matches!(field.vis, Visibility::Public(_)))
            .collect();
        fields.len() != before
    }

    /// Replace the type of each private tuple field with `_`.
    fn hide_tuple_fields(&self, fields: &mut Punctuated<Field, Token![,]>) {
        if self.private_items {
            return;
        }
        for field in fields.iter_mut() {
            if !matches!(field.vis, Visibility::Public(_)) {
                field.attrs.clear();
                field.ty = Type::Infer(TypeInfer {
                    underscore_token: Default::default(),
                });
            }
        }
    }

    fn format(&self, tokens: TokenStream) -> String {
        let unformatted = tokens.to_string();
        match self.formatter.format_tokens(tokens) {
            Ok(formatted) => formatted.trim_end().to_string(),
            Err(e) => {
                warn!("formatter rejected declaration, using raw tokens: {e}");
                unformatted
            }
        }
    }
}

/// Put the filtered-fields marker as the last line of a braced body.
fn mark_filtered(text: &str) -> String {
    if let Some(head) = text.strip_suffix("{}") {
        format!("{head}{{\n    {FILTERED_FIELDS}\n}}")
    } else if let Some(head) = text.strip_suffix('}') {
        format!("{head}    {FILTERED_FIELDS}\n}}")
    } else {
        text.to_string()
    }
}

fn strip_docs(attrs: &mut Vec<Attribute>) {
    attrs.retain(|attr| !(attr.style == AttrStyle::Outer && attr.path().is_ident("doc")));
}

fn empty_block() -> Block {
    Block {
        brace_token: Default::default(),
        stmts: Vec::new(),
    }
}

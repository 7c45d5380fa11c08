use proc_macro2::Span;
use syn::{Attribute, LitBool, LitStr, meta::ParseNestedMeta, spanned::Spanned};

use crate::MAPPABLE_ATTRIBUTE_NAME;

/// Type level `#[mappable(...)]` attributes.
#[derive(Debug)]
pub(crate) struct TypeAttributes {
    /// `#[mappable(type_path = "...")]`
    pub type_path: Option<LitStr>,
    /// Default is `true`, use `#[mappable(Typed = false)]` to disable it.
    pub impl_typed: bool,
    /// Default is `true`, use `#[mappable(Mappable = false)]` to disable it.
    pub impl_mappable: bool,
    /// `#[mappable(auto_register)]`
    pub auto_register: Option<Span>,
}

impl Default for TypeAttributes {
    #[inline]
    fn default() -> Self {
        Self {
            type_path: None,
            impl_typed: true,
            impl_mappable: true,
            auto_register: None,
        }
    }
}

impl TypeAttributes {
    pub fn parse_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut parsed = Self::default();
        for attr in attrs {
            if attr.path().is_ident(MAPPABLE_ATTRIBUTE_NAME) {
                attr.parse_nested_meta(|meta| parsed.parse_meta(meta))?;
            }
        }
        Ok(parsed)
    }

    fn parse_meta(&mut self, meta: ParseNestedMeta) -> syn::Result<()> {
        if meta.path.is_ident("type_path") {
            let lit: LitStr = meta.value()?.parse()?;
            if lit.value().trim().is_empty() {
                return Err(meta.error("`type_path` cannot be empty"));
            }
            if self.type_path.replace(lit).is_some() {
                return Err(meta.error("duplicate `type_path`"));
            }
        } else if meta.path.is_ident("Typed") {
            self.impl_typed = parse_switch(&meta)?;
        } else if meta.path.is_ident("Mappable") {
            self.impl_mappable = parse_switch(&meta)?;
        } else if meta.path.is_ident("auto_register") {
            self.auto_register = Some(meta.path.span());
        } else if meta.path.is_ident("rename")
            || meta.path.is_ident("transient")
            || meta.path.is_ident("flatten")
        {
            return Err(meta.error("this attribute can only be applied to fields"));
        } else {
            return Err(meta.error(
                "unknown attribute, expected `type_path`, `Typed`, `Mappable` or `auto_register`",
            ));
        }
        Ok(())
    }
}

// `Trait = false`; a bare `Trait` is redundant but accepted.
fn parse_switch(meta: &ParseNestedMeta) -> syn::Result<bool> {
    if meta.input.peek(syn::Token![=]) {
        let lit: LitBool = meta.value()?.parse()?;
        Ok(lit.value)
    } else {
        Ok(true)
    }
}

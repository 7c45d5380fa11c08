use syn::{Attribute, LitStr, meta::ParseNestedMeta};

use crate::MAPPABLE_ATTRIBUTE_NAME;

/// Field level `#[mappable(...)]` attributes.
#[derive(Default, Debug)]
pub(crate) struct FieldAttributes {
    /// `#[mappable(rename = "...")]`
    pub rename: Option<LitStr>,
    /// `#[mappable(transient)]`
    pub transient: bool,
    /// `#[mappable(flatten)]`
    pub flatten: bool,
}

impl FieldAttributes {
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
        if meta.path.is_ident("rename") {
            let lit: LitStr = meta.value()?.parse()?;
            if lit.value().is_empty() {
                return Err(meta.error("`rename` cannot be empty"));
            }
            if self.flatten {
                return Err(meta.error("a `flatten` field cannot be renamed"));
            }
            if self.rename.replace(lit).is_some() {
                return Err(meta.error("duplicate `rename`"));
            }
        } else if meta.path.is_ident("transient") {
            self.transient = true;
        } else if meta.path.is_ident("flatten") {
            if self.rename.is_some() {
                return Err(meta.error("a renamed field cannot be `flatten`"));
            }
            self.flatten = true;
        } else {
            return Err(meta.error("unknown attribute, expected `rename`, `transient` or `flatten`"));
        }
        Ok(())
    }
}

use std::collections::BTreeMap;

use syn::{Data, DeriveInput, Fields, Ident, Type, spanned::Spanned};

use super::{FieldAttributes, TypeAttributes};

/// Names that are transient unless renamed. Kept in sync with
/// `qj_map::naming::BASELINE_TRANSIENT`.
const BASELINE_TRANSIENT: [&str; 4] = ["superclass", "hash", "description", "debug_description"];

fn is_baseline_transient(name: &str) -> bool {
    name.starts_with('_') || BASELINE_TRANSIENT.contains(&name)
}

// -----------------------------------------------------------------------------
// MappableField

pub(crate) struct MappableField<'a> {
    pub ident: &'a Ident,
    pub ty: &'a Type,
    /// The field name without a raw identifier prefix.
    pub name: String,
    pub attrs: FieldAttributes,
}

impl MappableField<'_> {
    /// Transient by attribute, or by baseline name without a rename.
    pub fn is_transient(&self) -> bool {
        self.attrs.transient || (self.attrs.rename.is_none() && is_baseline_transient(&self.name))
    }

    pub fn external_name(&self) -> String {
        match &self.attrs.rename {
            Some(lit) => lit.value(),
            None => self.name.clone(),
        }
    }
}

// -----------------------------------------------------------------------------
// MappableStruct

pub(crate) struct MappableStruct<'a> {
    pub qj_map_path: syn::Path,
    pub ident: &'a Ident,
    pub attrs: TypeAttributes,
    pub fields: Vec<MappableField<'a>>,
}

impl<'a> MappableStruct<'a> {
    pub fn parse(ast: &'a DeriveInput) -> syn::Result<Self> {
        let attrs = TypeAttributes::parse_attrs(&ast.attrs)?;

        if !ast.generics.params.is_empty() {
            return Err(syn::Error::new(
                ast.generics.span(),
                "`Mappable` cannot be derived for generic types",
            ));
        }

        let named = match &ast.data {
            Data::Struct(data) => match &data.fields {
                Fields::Named(named) => named,
                _ => {
                    return Err(syn::Error::new(
                        ast.ident.span(),
                        "`Mappable` requires a struct with named fields",
                    ));
                }
            },
            Data::Enum(data) => {
                return Err(syn::Error::new(
                    data.enum_token.span,
                    "`Mappable` cannot be derived for enums",
                ));
            }
            Data::Union(data) => {
                return Err(syn::Error::new(
                    data.union_token.span,
                    "`Mappable` cannot be derived for unions",
                ));
            }
        };

        let mut fields = Vec::with_capacity(named.named.len());
        for field in &named.named {
            let Some(ident) = &field.ident else {
                return Err(syn::Error::new(field.span(), "expected a named field"));
            };
            let name = ident.to_string();
            let name = name.strip_prefix("r#").map(str::to_owned).unwrap_or(name);

            fields.push(MappableField {
                ident,
                ty: &field.ty,
                name,
                attrs: FieldAttributes::parse_attrs(&field.attrs)?,
            });
        }

        check_naming(&fields)?;

        Ok(Self {
            qj_map_path: crate::path::qj_map(),
            ident: &ast.ident,
            attrs,
            fields,
        })
    }
}

// Every mapped external name must belong to exactly one field.
fn check_naming(fields: &[MappableField]) -> syn::Result<()> {
    let mut claimed: BTreeMap<String, &str> = BTreeMap::new();

    for field in fields {
        if field.is_transient() || field.attrs.flatten {
            continue;
        }
        let external = field.external_name();
        if let Some(first) = claimed.insert(external.clone(), &field.name) {
            let span = field
                .attrs
                .rename
                .as_ref()
                .map_or_else(|| field.ident.span(), |lit| lit.span());
            return Err(syn::Error::new(
                span,
                format!("ambiguous naming: `{external}` is already the external name of `{first}`"),
            ));
        }
    }
    Ok(())
}

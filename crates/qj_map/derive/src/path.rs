//! Paths to items of `qj_map`, kept in one place so the generated code
//! follows the crate's layout.

use proc_macro2::TokenStream;
use quote::quote;

/// Get the correct access path to the `qj_map` crate.
///
/// 1. For crates that depend on `qj_map`, `::qj_map` is returned.
/// 2. For crates that depend on `qj_core`, `::qj_core::map` is returned.
/// 3. For other situations, `::qj_map` is returned, but this may be incorrect.
///
/// Reads the builder's `Cargo.toml`, so the path is obtained once per
/// derive and passed around.
pub(crate) fn qj_map() -> syn::Path {
    qj_macro_utils::Manifest::shared(|manifest| manifest.get_crate_path("qj_map"))
}

#[inline(always)]
pub(crate) fn macro_exports_(qj_map_path: &syn::Path) -> TokenStream {
    quote! {
        #qj_map_path::__macro_exports
    }
}

#[cfg(feature = "auto_register")]
#[inline(always)]
pub(crate) fn auto_register_(qj_map_path: &syn::Path) -> TokenStream {
    quote! {
        #qj_map_path::__macro_exports::auto_register
    }
}

#[inline(always)]
pub(crate) fn mappable_(qj_map_path: &syn::Path) -> TokenStream {
    quote! {
        #qj_map_path::Mappable
    }
}

#[inline(always)]
pub(crate) fn fields_(qj_map_path: &syn::Path) -> TokenStream {
    quote! {
        #qj_map_path::Fields
    }
}

#[inline(always)]
pub(crate) fn mapping_error_(qj_map_path: &syn::Path) -> TokenStream {
    quote! {
        #qj_map_path::MappingError
    }
}

// -----------------------------------------------------------------------------
// info

#[inline(always)]
pub(crate) fn typed_(qj_map_path: &syn::Path) -> TokenStream {
    quote! {
        #qj_map_path::info::Typed
    }
}

#[inline(always)]
pub(crate) fn object_info_(qj_map_path: &syn::Path) -> TokenStream {
    quote! {
        #qj_map_path::info::ObjectInfo
    }
}

#[inline(always)]
pub(crate) fn object_info_cell_(qj_map_path: &syn::Path) -> TokenStream {
    quote! {
        #qj_map_path::info::ObjectInfoCell
    }
}

#[inline(always)]
pub(crate) fn field_info_(qj_map_path: &syn::Path) -> TokenStream {
    quote! {
        #qj_map_path::info::FieldInfo
    }
}

#[inline(always)]
pub(crate) fn field_kind_(qj_map_path: &syn::Path) -> TokenStream {
    quote! {
        #qj_map_path::info::FieldKind
    }
}

// -----------------------------------------------------------------------------
// value

#[inline(always)]
pub(crate) fn field_value_(qj_map_path: &syn::Path) -> TokenStream {
    quote! {
        #qj_map_path::value::FieldValue
    }
}

#[inline(always)]
pub(crate) fn field_ref_(qj_map_path: &syn::Path) -> TokenStream {
    quote! {
        #qj_map_path::value::FieldRef
    }
}

#[inline(always)]
pub(crate) fn field_input_(qj_map_path: &syn::Path) -> TokenStream {
    quote! {
        #qj_map_path::value::FieldInput
    }
}

#[cfg(feature = "auto_register")]
#[inline(always)]
pub(crate) fn type_registry_(qj_map_path: &syn::Path) -> TokenStream {
    quote! {
        #qj_map_path::registry::TypeRegistry
    }
}

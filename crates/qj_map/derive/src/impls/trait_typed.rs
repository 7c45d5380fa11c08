use proc_macro2::TokenStream;
use quote::{quote, quote_spanned};
use syn::spanned::Spanned;

use crate::derive_data::MappableStruct;

/// Generate implementation code for `Typed`.
///
/// Similar to following:
///
/// ```ignore
/// impl Typed for Foo {
///     fn object_info() -> &'static ObjectInfo {
///         static CELL: ObjectInfoCell = ObjectInfoCell::new();
///         CELL.get_or_init(|| {
///             ObjectInfo::new::<Self>(&[
///                 FieldInfo::new::<String>("obj_id").with_external("id"),
///                 ......
///             ])
///         })
///     }
/// }
/// ```
pub(crate) fn impl_trait_typed(data: &MappableStruct) -> TokenStream {
    let qj_map_path = &data.qj_map_path;
    let typed_ = crate::path::typed_(qj_map_path);
    let object_info_ = crate::path::object_info_(qj_map_path);
    let object_info_cell_ = crate::path::object_info_cell_(qj_map_path);
    let field_info_ = crate::path::field_info_(qj_map_path);

    let field_infos = data.fields.iter().map(|field| {
        let ty = field.ty;
        let name = &field.name;
        let with_external = field
            .attrs
            .rename
            .as_ref()
            .map(|lit| quote!(.with_external(#lit)));
        let with_transient = field.attrs.transient.then(|| quote!(.with_transient()));
        // A flattened base must be `Typed`; the bound error points at its type.
        let constructor = if field.attrs.flatten {
            quote_spanned!(ty.span()=> #field_info_::flatten::<#ty>(#name))
        } else {
            quote!(#field_info_::new::<#ty>(#name))
        };

        quote! {
            #constructor
                #with_external
                #with_transient
        }
    });

    let with_type_path = data
        .attrs
        .type_path
        .as_ref()
        .map(|lit| quote!(.with_type_path(#lit)));

    let ident = data.ident;

    quote! {
        impl #typed_ for #ident {
            fn object_info() -> &'static #object_info_ {
                static CELL: #object_info_cell_ = #object_info_cell_::new();
                CELL.get_or_init(|| {
                    #object_info_::new::<Self>(&[ #(#field_infos),* ])
                        #with_type_path
                })
            }
        }
    }
}

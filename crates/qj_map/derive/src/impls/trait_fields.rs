use proc_macro2::TokenStream;
use quote::quote;

use crate::derive_data::MappableStruct;

/// Generate implementation code for `Fields`.
///
/// Fields are matched by internal name, transient ones included.
pub(crate) fn impl_trait_fields(data: &MappableStruct) -> TokenStream {
    let qj_map_path = &data.qj_map_path;
    let fields_ = crate::path::fields_(qj_map_path);
    let typed_ = crate::path::typed_(qj_map_path);
    let object_info_ = crate::path::object_info_(qj_map_path);
    let field_value_ = crate::path::field_value_(qj_map_path);
    let macro_exports_ = crate::path::macro_exports_(qj_map_path);

    let names: Vec<_> = data.fields.iter().map(|field| &field.name).collect();
    let idents: Vec<_> = data.fields.iter().map(|field| field.ident).collect();

    let ident = data.ident;

    quote! {
        impl #fields_ for #ident {
            #[inline]
            fn object_info(&self) -> &'static #object_info_ {
                <Self as #typed_>::object_info()
            }

            fn field(&self, name: &str) -> #macro_exports_::Option<&dyn #field_value_> {
                match name {
                    #(#names => #macro_exports_::Option::Some(&self.#idents),)*
                    _ => #macro_exports_::Option::None,
                }
            }

            fn field_mut(&mut self, name: &str) -> #macro_exports_::Option<&mut dyn #field_value_> {
                match name {
                    #(#names => #macro_exports_::Option::Some(&mut self.#idents),)*
                    _ => #macro_exports_::Option::None,
                }
            }

            #[inline]
            fn as_any(&self) -> &dyn #macro_exports_::Any {
                self
            }

            #[inline]
            fn as_any_mut(&mut self) -> &mut dyn #macro_exports_::Any {
                self
            }

            #[inline]
            fn into_any(self: #macro_exports_::Box<Self>) -> #macro_exports_::Box<dyn #macro_exports_::Any> {
                self
            }
        }
    }
}

use proc_macro2::TokenStream;
use quote::quote;

use crate::derive_data::MappableStruct;

/// Generate implementation code for `FieldValue`, so the type can be held by
/// fields of other mappable types.
pub(crate) fn impl_trait_field_value(data: &MappableStruct) -> TokenStream {
    let qj_map_path = &data.qj_map_path;
    let field_value_ = crate::path::field_value_(qj_map_path);
    let field_kind_ = crate::path::field_kind_(qj_map_path);
    let field_ref_ = crate::path::field_ref_(qj_map_path);
    let field_input_ = crate::path::field_input_(qj_map_path);
    let mappable_ = crate::path::mappable_(qj_map_path);
    let mapping_error_ = crate::path::mapping_error_(qj_map_path);
    let macro_exports_ = crate::path::macro_exports_(qj_map_path);

    let ident = data.ident;

    quote! {
        impl #field_value_ for #ident {
            #[inline]
            fn field_kind() -> #field_kind_ {
                #field_kind_::Object
            }

            #[inline]
            fn field_ref(&self) -> #field_ref_<'_> {
                #field_ref_::Object(self)
            }

            #[inline]
            fn assign(&mut self, input: #field_input_<'_>) -> #macro_exports_::Result<(), #mapping_error_> {
                #macro_exports_::assign_object(self, input)
            }

            #[inline]
            fn as_mappable(&self) -> #macro_exports_::Option<&dyn #mappable_> {
                #macro_exports_::Option::Some(self)
            }

            #[inline]
            fn as_mappable_mut(&mut self) -> #macro_exports_::Option<&mut dyn #mappable_> {
                #macro_exports_::Option::Some(self)
            }
        }
    }
}

//! Code generation for `#[derive(Mappable)]`.

// -----------------------------------------------------------------------------
// Modules

mod auto_register;
mod trait_field_value;
mod trait_fields;
mod trait_mappable;
mod trait_typed;

// -----------------------------------------------------------------------------
// Internal API

use proc_macro2::TokenStream;
use quote::quote;

use crate::derive_data::MappableStruct;

pub(crate) fn impl_mappable(data: &MappableStruct) -> TokenStream {
    let typed_tokens = if data.attrs.impl_typed {
        trait_typed::impl_trait_typed(data)
    } else {
        TokenStream::new()
    };
    let mappable_tokens = if data.attrs.impl_mappable {
        trait_mappable::impl_trait_mappable(data)
    } else {
        TokenStream::new()
    };
    let fields_tokens = trait_fields::impl_trait_fields(data);
    let field_value_tokens = trait_field_value::impl_trait_field_value(data);
    let auto_register_tokens = auto_register::get_auto_register_impl(data);

    quote! {
        const _: () = {
            #typed_tokens

            #fields_tokens

            #field_value_tokens

            #mappable_tokens

            #auto_register_tokens
        };
    }
}

use proc_macro2::TokenStream;

use crate::derive_data::MappableStruct;

/// Generate `auto_register` implementation
#[cfg(feature = "auto_register")]
pub(crate) fn get_auto_register_impl(data: &MappableStruct) -> TokenStream {
    use quote::quote_spanned;

    let Some(span) = data.attrs.auto_register else {
        return TokenStream::new();
    };

    let qj_map_path = &data.qj_map_path;
    let auto_register_ = crate::path::auto_register_(qj_map_path);
    let type_registry_ = crate::path::type_registry_(qj_map_path);
    let ident = data.ident;

    quote_spanned! { span =>
        fn __register(registry: &mut #type_registry_) {
            registry.register::<#ident>();
        }

        #auto_register_::inventory::submit!{
            #auto_register_::__AutoRegisterFunc(__register)
        }
    }
}

/// Generate `auto_register` implementation
#[cfg(not(feature = "auto_register"))]
pub(crate) fn get_auto_register_impl(_: &MappableStruct) -> TokenStream {
    TokenStream::new()
}

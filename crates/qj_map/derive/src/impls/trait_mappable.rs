use proc_macro2::TokenStream;
use quote::quote;

use crate::derive_data::MappableStruct;

/// Generate implementation code for `Mappable`, keeping every hook at its
/// default.
pub(crate) fn impl_trait_mappable(data: &MappableStruct) -> TokenStream {
    let mappable_ = crate::path::mappable_(&data.qj_map_path);
    let ident = data.ident;

    quote! {
        impl #mappable_ for #ident {}
    }
}

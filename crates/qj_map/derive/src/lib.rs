//! See [`Mappable`].
#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(clippy::std_instead_of_core, reason = "proc-macro lib")]
#![allow(clippy::std_instead_of_alloc, reason = "proc-macro lib")]

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

static MAPPABLE_ATTRIBUTE_NAME: &str = "mappable";

// -----------------------------------------------------------------------------
// Modules

mod derive_data;
mod impls;
mod path;

// -----------------------------------------------------------------------------
// Macros

/// # Mappable Derivation
///
/// `#[derive(Mappable)]` implements the following traits for a struct with
/// named fields:
///
/// - `Typed`: the static `ObjectInfo` (field table and naming policy).
/// - `Fields`: access to fields by internal name.
/// - `FieldValue`: so the type can be a field of another mappable type.
/// - `Mappable`: with every hook left at its default.
///
/// Every field type must implement `FieldValue`. Generic types, tuple
/// structs, unit structs, enums and unions are rejected.
///
/// ## Field Attributes
///
/// ### Rename
///
/// `rename` gives the key the field has in dictionaries. Keys are translated
/// in both directions.
///
/// ```rust, ignore
/// #[derive(Mappable, Default)]
/// struct Restaurant {
///     #[mappable(rename = "id")]
///     obj_id: String,
/// }
/// ```
///
/// Two fields claiming the same key is a compile error, including a rename
/// that collides with another field's own name.
///
/// ### Transient
///
/// `transient` fields are never serialized and never populated.
///
/// ```rust, ignore
/// #[derive(Mappable, Default)]
/// struct Menu {
///     title: String,
///     #[mappable(transient)]
///     selected: bool,
/// }
/// ```
///
/// Fields named `superclass`, `hash`, `description`, `debug_description` or
/// starting with `_` are transient without the attribute. Renaming such a
/// field makes it mapped again.
///
/// ### Flatten
///
/// `flatten` inlines the fields of a nested mappable value into the
/// dictionary of its owner. This is how a type shares the fields of a base
/// type. A flattened field cannot be renamed, and its type must itself
/// derive `Mappable` (`Option<Base>` or a scalar does not compile). The keys
/// of a base must not collide with the keys of its owner; a collision panics
/// when the owner's `ObjectInfo` is first built.
///
/// ```rust, ignore
/// #[derive(Mappable, Default)]
/// struct Entity {
///     #[mappable(rename = "id")]
///     obj_id: String,
/// }
///
/// #[derive(Mappable, Default)]
/// struct Restaurant {
///     #[mappable(flatten)]
///     entity: Entity,
///     name: String,
/// }
/// // `{ "id": "r-1", "name": "Qwik" }`
/// ```
///
/// ## Type Attributes
///
/// ### Disabling Default Implementations
///
/// `Typed` and `Mappable` can be switched off and implemented by hand. A
/// hand-written `Mappable` is how a type overrides the hooks.
///
/// ```rust, ignore
/// #[derive(Mappable, Default)]
/// #[mappable(Mappable = false)]
/// struct Foo { /* ... */ }
///
/// impl Mappable for Foo {
///     fn nested_type(&self, key: &str) -> Option<TypeHandle> { /* ... */ }
/// }
/// ```
///
/// ### Custom Type Path
///
/// The type path defaults to [`core::any::type_name`]. It is the name the
/// type is registered and reported under.
///
/// ```rust, ignore
/// #[derive(Mappable, Default)]
/// #[mappable(type_path = "model::Restaurant")]
/// struct Restaurant { /* ... */ }
/// ```
///
/// ### Auto Registration
///
/// `auto_register` submits the type to `TypeRegistry::auto_register`. The
/// type must implement `Default`.
///
/// ```rust, ignore
/// #[derive(Mappable, Default)]
/// #[mappable(auto_register)]
/// struct Restaurant { /* ... */ }
/// ```
///
/// This attribute is a no-op when the `auto_register` feature is disabled.
#[proc_macro_derive(Mappable, attributes(mappable))]
pub fn derive_mappable(input: TokenStream) -> TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);

    match derive_data::MappableStruct::parse(&ast) {
        Ok(data) => impls::impl_mappable(&data).into(),
        Err(err) => err.into_compile_error().into(),
    }
}

//! Nested type handles and lookup of mappable types by name.
//!
//! A [`TypeHandle`] is what [`Mappable::nested_type`](crate::Mappable::nested_type)
//! returns: enough to build a boxed object of a type from a dictionary. The
//! [`TypeRegistry`] stores handles and resolves them from type paths or
//! short type names, e.g. when the target type is only known at runtime.

mod type_handle;
mod type_registry;

pub use type_handle::TypeHandle;
pub use type_registry::{TypeRegistry, TypeRegistryArc};

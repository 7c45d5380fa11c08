//! Parsing of the derive input.

// -----------------------------------------------------------------------------
// Modules

mod field_attributes;
mod mappable_struct;
mod type_attributes;

// -----------------------------------------------------------------------------
// Internal API

pub(crate) use field_attributes::FieldAttributes;
pub(crate) use mappable_struct::{MappableField, MappableStruct};
pub(crate) use type_attributes::TypeAttributes;

//! The mapping engine: objects to dictionaries and back.
//!
//! Conversions are synchronous and depth-first; the engine keeps no state
//! between calls and every call builds a new graph.
//!
//! # Errors
//!
//! Structural errors such as [`MappingError::InvalidMappingTarget`] abort the
//! call. Field-level errors (see [`MappingError::is_field_level`]) are
//! logged with [`log::warn!`] and the field keeps its zero value, so a
//! partially malformed payload still yields an object.
//!
//! [`MappingError::InvalidMappingTarget`]: crate::MappingError::InvalidMappingTarget
//! [`MappingError::is_field_level`]: crate::MappingError::is_field_level

mod de;
mod ser;

pub use de::{
    array_from_value, assign_standard, dictionaries_to_array, from_dictionary, populate,
};
pub use ser::{array_to_dictionaries, to_dictionary, to_value, write_standard};

#[doc(hidden)]
pub use de::assign_object;

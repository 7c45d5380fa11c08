use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::any::Any;
use core::fmt;

use crate::info::ObjectInfo;
use crate::json::{self, JsonError};
use crate::registry::TypeHandle;
use crate::value::{Dictionary, FieldValue, Value};
use crate::{MappingError, engine};

// -----------------------------------------------------------------------------
// Fields

/// Object-safe access to the fields of a mappable object.
///
/// Implemented by [`#[derive(Mappable)]`](crate::derive::Mappable); not
/// meant to be implemented by hand.
pub trait Fields: Any {
    /// Returns the descriptor table of the concrete type.
    fn object_info(&self) -> &'static ObjectInfo;

    /// Returns the field with the given internal name.
    fn field(&self, name: &str) -> Option<&dyn FieldValue>;

    /// Returns the field with the given internal name, mutably.
    fn field_mut(&mut self, name: &str) -> Option<&mut dyn FieldValue>;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

// -----------------------------------------------------------------------------
// Mappable

/// A type the engine can convert to and from dictionaries.
///
/// Every method is a hook with a default; override only what a type needs.
///
/// # Examples
///
/// Routing a key through a custom conversion:
///
/// ```
/// use qj_map::{Mappable, MappingError, Value, derive::Mappable, engine};
/// use qj_map::temporal::DbDate;
///
/// #[derive(Mappable, Default)]
/// #[mappable(Mappable = false)]
/// struct Reservation {
///     party: String,
///     day: Option<DbDate>,
/// }
///
/// impl Mappable for Reservation {
///     fn set_field(&mut self, internal: &str, value: &Value) -> Result<(), MappingError> {
///         match internal {
///             "party" => self.party = value.as_str().unwrap_or_default().to_uppercase(),
///             _ => engine::assign_standard(self, internal, value)?,
///         }
///         Ok(())
///     }
/// }
///
/// let dictionary = qj_map::json::decode_dictionary(
///     r#"{ "party": "smith", "day": "2024-03-15" }"#,
/// ).unwrap();
/// let reservation: Reservation = engine::from_dictionary(&dictionary).unwrap();
///
/// assert_eq!(reservation.party, "SMITH");
/// assert!(reservation.day.is_some());
/// ```
pub trait Mappable: Fields {
    /// Returns the type to build for the value under `external_key`.
    ///
    /// Consulted for every key during deserialization. When it returns a
    /// handle and the raw value is a dictionary (or an array of
    /// dictionaries), the engine builds the nested object(s) through the
    /// handle instead of converting the raw value.
    ///
    /// Fields whose declared type is itself mappable do not need this hook.
    #[inline]
    fn nested_type(&self, external_key: &str) -> Option<TypeHandle> {
        let _ = external_key;
        None
    }

    /// Writes one field into `dictionary`.
    ///
    /// The default is [`engine::write_standard`].
    #[inline]
    fn serialize_field(
        &self,
        internal: &str,
        external: &str,
        dictionary: &mut Dictionary,
    ) -> Result<(), MappingError> {
        engine::write_standard(self, internal, external, dictionary)
    }

    /// Reads the entry `key` of `dictionary` into the field `internal`.
    ///
    /// Called for every key without a nested type, including keys that match
    /// no declared field. The default forwards the value to
    /// [`set_field`](Mappable::set_field).
    #[inline]
    fn write_field(
        &mut self,
        dictionary: &Dictionary,
        key: &str,
        internal: &str,
    ) -> Result<(), MappingError> {
        match dictionary.get(key) {
            Some(value) => self.set_field(internal, value),
            None => Ok(()),
        }
    }

    /// Assigns a raw value to the field `internal`.
    ///
    /// The default is [`engine::assign_standard`], which ignores unknown
    /// names.
    #[inline]
    fn set_field(&mut self, internal: &str, value: &Value) -> Result<(), MappingError> {
        engine::assign_standard(self, internal, value)
    }
}

impl dyn Mappable {
    /// Returns `true` if the underlying type is `T`.
    #[inline]
    pub fn is<T: Mappable>(&self) -> bool {
        self.as_any().is::<T>()
    }

    #[inline]
    pub fn downcast_ref<T: Mappable>(&self) -> Option<&T> {
        self.as_any().downcast_ref()
    }

    #[inline]
    pub fn downcast_mut<T: Mappable>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut()
    }

    /// Downcasts a boxed object, handing it back on mismatch.
    pub fn downcast<T: Mappable>(self: Box<Self>) -> Result<Box<T>, Box<Self>> {
        if self.is::<T>() {
            #[expect(unsafe_code, reason = "type is already checked")]
            Ok(unsafe { <Box<dyn Any>>::downcast::<T>(self).unwrap_unchecked() })
        } else {
            Err(self)
        }
    }

    /// Downcasts and unboxes the object, handing it back on mismatch.
    pub fn take<T: Mappable>(self: Box<Self>) -> Result<T, Box<Self>> {
        self.downcast::<T>().map(|object| *object)
    }
}

impl fmt::Debug for dyn Mappable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("dyn Mappable")
            .field(&self.object_info().type_path())
            .finish()
    }
}

// -----------------------------------------------------------------------------
// MappableExt

/// Conversions available on every mappable object.
pub trait MappableExt: Mappable {
    /// See [`engine::to_dictionary`].
    #[inline]
    fn to_dictionary(&self) -> Result<Dictionary, MappingError> {
        engine::to_dictionary(self)
    }

    /// Serializes the object to compact JSON text.
    #[inline]
    fn to_json_string(&self) -> Result<String, JsonError> {
        json::to_json_string(self)
    }

    /// Serializes the object to JSON bytes.
    #[inline]
    fn to_json_data(&self) -> Result<Vec<u8>, JsonError> {
        json::to_json_data(self)
    }
}

impl<T: Mappable + ?Sized> MappableExt for T {}

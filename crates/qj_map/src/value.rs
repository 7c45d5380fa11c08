//! The dictionary model and the conversion of field values.
//!
//! Dictionaries are plain [`serde_json`] maps. A field takes part in the
//! mapping through [`FieldValue`]: it exposes a [`FieldRef`] for
//! serialization and accepts a [`FieldInput`] for deserialization.

use alloc::boxed::Box;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::any::Any;
use core::fmt;
use core::ops::Deref;

use crate::info::FieldKind;
use crate::temporal::Temporal;
use crate::{Mappable, MappingError};

pub use serde_json::Value;

/// A JSON-compatible dictionary: string keys, JSON values.
pub type Dictionary = serde_json::Map<String, Value>;

/// Describes the JSON type of `value` for diagnostics, e.g. `"a string"`.
pub fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "a dictionary",
    }
}

// -----------------------------------------------------------------------------
// FieldRef

/// Borrowed view of a field value, consumed by the serializer.
pub enum FieldRef<'a> {
    /// No value; top-level fields are omitted, sequence elements become `null`.
    Null,
    /// A value already in dictionary form.
    Scalar(Value),
    /// A temporal value, written in its canonical textual form.
    Temporal(&'a dyn Temporal),
    /// A nested object, written as a dictionary.
    Object(&'a dyn Mappable),
    /// An ordered sequence, written as an array.
    Sequence(Vec<FieldRef<'a>>),
}

impl fmt::Debug for FieldRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("Null"),
            Self::Scalar(value) => f.debug_tuple("Scalar").field(value).finish(),
            Self::Temporal(value) => f.debug_tuple("Temporal").field(&value.to_db_string()).finish(),
            Self::Object(object) => f
                .debug_tuple("Object")
                .field(&object.object_info().type_path())
                .finish(),
            Self::Sequence(items) => f.debug_tuple("Sequence").field(items).finish(),
        }
    }
}

// -----------------------------------------------------------------------------
// FieldInput

/// A value about to be assigned to a field.
pub enum FieldInput<'a> {
    /// A raw dictionary value.
    Raw(&'a Value),
    /// An object built from a nested type handle.
    Object(Box<dyn Mappable>),
    /// A sequence of objects built from a nested type handle.
    Objects(Vec<Box<dyn Mappable>>),
}

impl FieldInput<'_> {
    /// Describes the input for diagnostics, e.g. `"a number"`.
    pub fn describe(&self) -> &'static str {
        match self {
            Self::Raw(value) => describe(value),
            Self::Object(_) => "a nested object",
            Self::Objects(_) => "a sequence of nested objects",
        }
    }
}

// -----------------------------------------------------------------------------
// FieldValue

/// A type that can be held by a field of a mappable object.
///
/// Implemented for booleans, integers, floats, strings, [`Identifier`], raw
/// [`Value`]s and [`Dictionary`]s, the temporal types, `Option<T>`, `Vec<T>`
/// and every type deriving [`Mappable`](crate::derive::Mappable).
///
/// `assign` treats `null` as "reset": scalar, temporal and sequence fields
/// return to their default and `Option` fields become `None`. A nested
/// object held directly (not in an `Option`) keeps its current value.
pub trait FieldValue: Any {
    /// The shape of this type, recorded in its [`FieldInfo`](crate::info::FieldInfo).
    fn field_kind() -> FieldKind
    where
        Self: Sized;

    /// Returns a borrowed view for serialization.
    fn field_ref(&self) -> FieldRef<'_>;

    /// Replaces the value with `input`.
    ///
    /// On error the value is left unchanged.
    fn assign(&mut self, input: FieldInput<'_>) -> Result<(), MappingError>;

    /// Returns the value as a mappable object, if it is one.
    #[inline]
    fn as_mappable(&self) -> Option<&dyn Mappable> {
        None
    }

    /// Returns the value as a mutable mappable object, if it is one.
    #[inline]
    fn as_mappable_mut(&mut self) -> Option<&mut dyn Mappable> {
        None
    }
}

// -----------------------------------------------------------------------------
// Scalars

impl FieldValue for bool {
    fn field_kind() -> FieldKind {
        FieldKind::Scalar
    }

    fn field_ref(&self) -> FieldRef<'_> {
        FieldRef::Scalar(Value::Bool(*self))
    }

    fn assign(&mut self, input: FieldInput<'_>) -> Result<(), MappingError> {
        match input {
            FieldInput::Raw(Value::Bool(value)) => *self = *value,
            FieldInput::Raw(Value::Null) => *self = false,
            other => return Err(MappingError::mismatched::<Self>("a boolean", &other)),
        }
        Ok(())
    }
}

macro_rules! impl_integer {
    ($($ty:ty),* $(,)?) => {$(
        impl FieldValue for $ty {
            fn field_kind() -> FieldKind {
                FieldKind::Scalar
            }

            fn field_ref(&self) -> FieldRef<'_> {
                FieldRef::Scalar(Value::from(*self))
            }

            fn assign(&mut self, input: FieldInput<'_>) -> Result<(), MappingError> {
                let parsed = match &input {
                    FieldInput::Raw(Value::Null) => Some(0),
                    FieldInput::Raw(Value::Number(number)) => number
                        .as_i64()
                        .and_then(|value| <$ty>::try_from(value).ok())
                        .or_else(|| number.as_u64().and_then(|value| <$ty>::try_from(value).ok())),
                    _ => None,
                };
                match parsed {
                    Some(value) => {
                        *self = value;
                        Ok(())
                    }
                    None => Err(MappingError::mismatched::<Self>("an integer in range", &input)),
                }
            }
        }
    )*};
}

impl_integer!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

macro_rules! impl_float {
    ($($ty:ty),* $(,)?) => {$(
        impl FieldValue for $ty {
            fn field_kind() -> FieldKind {
                FieldKind::Scalar
            }

            fn field_ref(&self) -> FieldRef<'_> {
                // Non-finite floats have no JSON form and become `null`.
                FieldRef::Scalar(Value::from(*self))
            }

            #[allow(clippy::cast_possible_truncation, reason = "JSON numbers are f64")]
            fn assign(&mut self, input: FieldInput<'_>) -> Result<(), MappingError> {
                match input {
                    FieldInput::Raw(Value::Number(number)) if number.as_f64().is_some() => {
                        *self = number.as_f64().unwrap_or_default() as $ty;
                    }
                    FieldInput::Raw(Value::Null) => *self = 0.0,
                    other => return Err(MappingError::mismatched::<Self>("a number", &other)),
                }
                Ok(())
            }
        }
    )*};
}

impl_float!(f32, f64);

impl FieldValue for String {
    fn field_kind() -> FieldKind {
        FieldKind::Scalar
    }

    fn field_ref(&self) -> FieldRef<'_> {
        FieldRef::Scalar(Value::String(self.clone()))
    }

    fn assign(&mut self, input: FieldInput<'_>) -> Result<(), MappingError> {
        match input {
            FieldInput::Raw(Value::String(text)) => self.clone_from(text),
            FieldInput::Raw(Value::Null) => self.clear(),
            other => return Err(MappingError::mismatched::<Self>("a string", &other)),
        }
        Ok(())
    }
}

impl FieldValue for Value {
    fn field_kind() -> FieldKind {
        FieldKind::Scalar
    }

    fn field_ref(&self) -> FieldRef<'_> {
        match self {
            Value::Null => FieldRef::Null,
            value => FieldRef::Scalar(value.clone()),
        }
    }

    fn assign(&mut self, input: FieldInput<'_>) -> Result<(), MappingError> {
        match input {
            FieldInput::Raw(value) => self.clone_from(value),
            other => return Err(MappingError::mismatched::<Self>("a raw value", &other)),
        }
        Ok(())
    }
}

impl FieldValue for Dictionary {
    fn field_kind() -> FieldKind {
        FieldKind::Scalar
    }

    fn field_ref(&self) -> FieldRef<'_> {
        FieldRef::Scalar(Value::Object(self.clone()))
    }

    fn assign(&mut self, input: FieldInput<'_>) -> Result<(), MappingError> {
        match input {
            FieldInput::Raw(Value::Object(dictionary)) => self.clone_from(dictionary),
            FieldInput::Raw(Value::Null) => self.clear(),
            other => return Err(MappingError::mismatched::<Self>("a dictionary", &other)),
        }
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// Containers

impl<T: FieldValue + Default> FieldValue for Option<T> {
    fn field_kind() -> FieldKind {
        T::field_kind()
    }

    fn field_ref(&self) -> FieldRef<'_> {
        match self {
            Some(value) => value.field_ref(),
            None => FieldRef::Null,
        }
    }

    fn assign(&mut self, input: FieldInput<'_>) -> Result<(), MappingError> {
        if let FieldInput::Raw(Value::Null) = input {
            *self = None;
            return Ok(());
        }
        let mut value = T::default();
        value.assign(input)?;
        *self = Some(value);
        Ok(())
    }

    fn as_mappable(&self) -> Option<&dyn Mappable> {
        self.as_ref()?.as_mappable()
    }

    fn as_mappable_mut(&mut self) -> Option<&mut dyn Mappable> {
        self.as_mut()?.as_mappable_mut()
    }
}

impl<T: FieldValue + Default> FieldValue for Vec<T> {
    fn field_kind() -> FieldKind {
        FieldKind::Sequence
    }

    fn field_ref(&self) -> FieldRef<'_> {
        FieldRef::Sequence(self.iter().map(FieldValue::field_ref).collect())
    }

    fn assign(&mut self, input: FieldInput<'_>) -> Result<(), MappingError> {
        let items = match input {
            FieldInput::Raw(Value::Null) => Vec::new(),
            FieldInput::Raw(Value::Array(values)) => values
                .iter()
                .map(|value| element(FieldInput::Raw(value)))
                .collect::<Result<_, _>>()?,
            FieldInput::Objects(objects) => objects
                .into_iter()
                .map(|object| element(FieldInput::Object(object)))
                .collect::<Result<_, _>>()?,
            other => return Err(MappingError::mismatched::<Self>("an array", &other)),
        };
        *self = items;
        Ok(())
    }
}

fn element<T: FieldValue + Default>(input: FieldInput<'_>) -> Result<T, MappingError> {
    let mut item = T::default();
    item.assign(input)?;
    Ok(item)
}

// -----------------------------------------------------------------------------
// Identifier

/// A string-backed identifier that also accepts JSON numbers.
///
/// APIs are often inconsistent about whether ids are strings or numbers;
/// both `"42"` and `42` populate an `Identifier` with the text `42`. It is
/// always written back as a string.
///
/// # Examples
///
/// ```
/// use qj_map::{derive::Mappable, engine, value::Identifier};
///
/// #[derive(Mappable, Default)]
/// struct Order {
///     id: Identifier,
/// }
///
/// let dictionary = qj_map::json::decode_dictionary(r#"{ "id": 1042 }"#).unwrap();
/// let order: Order = engine::from_dictionary(&dictionary).unwrap();
///
/// assert_eq!(order.id.as_str(), "1042");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identifier(String);

impl Identifier {
    #[inline]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[inline]
    pub fn into_string(self) -> String {
        self.0
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Deref for Identifier {
    type Target = str;

    #[inline]
    fn deref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Identifier {
    #[inline]
    fn from(id: &str) -> Self {
        Self(id.into())
    }
}

impl From<String> for Identifier {
    #[inline]
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl FieldValue for Identifier {
    fn field_kind() -> FieldKind {
        FieldKind::Scalar
    }

    fn field_ref(&self) -> FieldRef<'_> {
        FieldRef::Scalar(Value::String(self.0.clone()))
    }

    fn assign(&mut self, input: FieldInput<'_>) -> Result<(), MappingError> {
        match input {
            FieldInput::Raw(Value::String(text)) => self.0.clone_from(text),
            FieldInput::Raw(Value::Number(number)) => self.0 = number.to_string(),
            FieldInput::Raw(Value::Null) => self.0.clear(),
            other => return Err(MappingError::mismatched::<Self>("a string or a number", &other)),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn assign<T: FieldValue + Default>(value: Value) -> Result<T, MappingError> {
        let mut target = T::default();
        target.assign(FieldInput::Raw(&value))?;
        Ok(target)
    }

    #[test]
    fn scalars_accept_matching_values() {
        assert!(assign::<bool>(json!(true)).unwrap());
        assert_eq!(assign::<i32>(json!(-7)).unwrap(), -7);
        assert_eq!(assign::<u64>(json!(u64::MAX)).unwrap(), u64::MAX);
        assert_eq!(assign::<f64>(json!(4.5)).unwrap(), 4.5);
        assert_eq!(assign::<f32>(json!(3)).unwrap(), 3.0);
        assert_eq!(assign::<String>(json!("Qwik")).unwrap(), "Qwik");
    }

    #[test]
    fn out_of_range_integer_is_mismatched() {
        let err = assign::<u8>(json!(300)).unwrap_err();
        assert!(err.is_field_level());
        assert!(matches!(err, MappingError::MismatchedValue { found: "a number", .. }));

        assert!(assign::<u32>(json!(-1)).is_err());
        assert!(assign::<i64>(json!(1.5)).is_err());
    }

    #[test]
    fn wrong_shape_leaves_value_untouched() {
        let mut name = String::from("kept");
        let err = name.assign(FieldInput::Raw(&json!(12))).unwrap_err();

        assert_eq!(name, "kept");
        assert_eq!(
            err.to_string(),
            "`alloc::string::String` expects a string but received a number"
        );
    }

    #[test]
    fn null_resets() {
        let mut count = 5_u32;
        count.assign(FieldInput::Raw(&Value::Null)).unwrap();
        assert_eq!(count, 0);

        let mut name = Some(String::from("x"));
        name.assign(FieldInput::Raw(&Value::Null)).unwrap();
        assert_eq!(name, None);

        let mut tags = vec![String::from("a")];
        tags.assign(FieldInput::Raw(&Value::Null)).unwrap();
        assert!(tags.is_empty());
    }

    #[test]
    fn sequences_convert_each_element() {
        let tags: Vec<String> = assign(json!(["a", "b"])).unwrap();
        assert_eq!(tags, ["a", "b"]);

        let maybe: Vec<Option<i32>> = assign(json!([1, null, 3])).unwrap();
        assert_eq!(maybe, [Some(1), None, Some(3)]);

        assert!(assign::<Vec<i32>>(json!([1, "two"])).is_err());
    }

    #[test]
    fn sequence_refs_keep_nulls() {
        let values = vec![Some(1_i32), None];
        let FieldRef::Sequence(items) = values.field_ref() else {
            panic!("expected a sequence");
        };
        assert!(matches!(items[0], FieldRef::Scalar(_)));
        assert!(matches!(items[1], FieldRef::Null));
    }

    #[test]
    fn raw_values_and_dictionaries() {
        let raw: Value = assign(json!({"a": [1, 2]})).unwrap();
        assert_eq!(raw, json!({"a": [1, 2]}));

        let dictionary: Dictionary = assign(json!({"k": "v"})).unwrap();
        assert_eq!(dictionary["k"], "v");
        assert!(assign::<Dictionary>(json!([1])).is_err());

        assert!(matches!(Value::Null.field_ref(), FieldRef::Null));
    }

    #[test]
    fn identifier_coerces_numbers() {
        assert_eq!(assign::<Identifier>(json!(42)).unwrap().as_str(), "42");
        assert_eq!(assign::<Identifier>(json!("a-1")).unwrap().as_str(), "a-1");
        assert!(assign::<Identifier>(json!(true)).is_err());

        let FieldRef::Scalar(value) = Identifier::new("42").field_ref() else {
            panic!("expected a scalar");
        };
        assert_eq!(value, json!("42"));
    }

    #[test]
    fn kinds() {
        assert_eq!(<Option<String>>::field_kind(), FieldKind::Scalar);
        assert_eq!(<Vec<u8>>::field_kind(), FieldKind::Sequence);
    }
}

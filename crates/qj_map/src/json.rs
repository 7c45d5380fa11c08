//! JSON text in and out of the engine.
//!
//! # Examples
//!
//! ```
//! use qj_map::{derive::Mappable, json};
//!
//! #[derive(Mappable, Default, Debug, PartialEq)]
//! struct Tag {
//!     name: String,
//! }
//!
//! let tags: Vec<Tag> = json::array_from_json(r#"[{ "name": "a" }, { "name": "b" }]"#).unwrap();
//! assert_eq!(tags.len(), 2);
//!
//! assert_eq!(json::array_to_json(&tags).unwrap(), r#"[{"name":"a"},{"name":"b"}]"#);
//! assert!(matches!(json::decode("{"), Err(json::JsonError::MalformedJsonText(_))));
//! ```

use alloc::string::String;
use alloc::vec::Vec;

use thiserror::Error;

use crate::value::{Dictionary, Value, describe};
use crate::{Mappable, MappingError, engine};

// -----------------------------------------------------------------------------
// JsonError

/// Errors raised while reading or writing JSON text.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum JsonError {
    #[error("malformed JSON text: {0}")]
    MalformedJsonText(#[source] serde_json::Error),

    #[error("JSON encoding failed: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("expected {expected} but the JSON text holds {found}")]
    UnexpectedShape {
        expected: &'static str,
        found: &'static str,
    },

    #[error(transparent)]
    Mapping(#[from] MappingError),
}

// -----------------------------------------------------------------------------
// Codec

/// Encodes `value` as compact JSON text.
pub fn encode(value: &Value) -> Result<String, JsonError> {
    serde_json::to_string(value).map_err(JsonError::Encode)
}

/// Encodes `value` as indented JSON text.
pub fn encode_pretty(value: &Value) -> Result<String, JsonError> {
    serde_json::to_string_pretty(value).map_err(JsonError::Encode)
}

/// Decodes any JSON text.
pub fn decode(text: &str) -> Result<Value, JsonError> {
    serde_json::from_str(text).map_err(JsonError::MalformedJsonText)
}

/// Decodes JSON text holding a dictionary.
pub fn decode_dictionary(text: &str) -> Result<Dictionary, JsonError> {
    match decode(text)? {
        Value::Object(dictionary) => Ok(dictionary),
        other => Err(JsonError::UnexpectedShape {
            expected: "a dictionary",
            found: describe(&other),
        }),
    }
}

/// Decodes JSON text holding an array; `null` gives an empty array.
pub fn decode_array(text: &str) -> Result<Vec<Value>, JsonError> {
    match decode(text)? {
        Value::Array(items) => Ok(items),
        Value::Null => Ok(Vec::new()),
        other => Err(JsonError::UnexpectedShape {
            expected: "an array",
            found: describe(&other),
        }),
    }
}

// -----------------------------------------------------------------------------
// Objects

/// Serializes `object` to compact JSON text.
pub fn to_json_string<T: Mappable + ?Sized>(object: &T) -> Result<String, JsonError> {
    let dictionary = engine::to_dictionary(object)?;
    serde_json::to_string(&dictionary).map_err(JsonError::Encode)
}

/// Serializes `object` to JSON bytes.
pub fn to_json_data<T: Mappable + ?Sized>(object: &T) -> Result<Vec<u8>, JsonError> {
    let dictionary = engine::to_dictionary(object)?;
    serde_json::to_vec(&dictionary).map_err(JsonError::Encode)
}

/// Serializes each object and joins them in one JSON array.
pub fn array_to_json<'a, T: Mappable + 'a>(
    items: impl IntoIterator<Item = &'a T>,
) -> Result<String, JsonError> {
    let dictionaries = engine::array_to_dictionaries(items)?;
    serde_json::to_string(&dictionaries).map_err(JsonError::Encode)
}

/// Builds a `T` from JSON text holding a dictionary.
pub fn object_from_json<T: Mappable + Default>(text: &str) -> Result<T, JsonError> {
    Ok(engine::from_dictionary(&decode_dictionary(text)?)?)
}

/// Builds one `T` per dictionary of a JSON array; `null` gives an empty
/// vector.
pub fn array_from_json<T: Mappable + Default>(text: &str) -> Result<Vec<T>, JsonError> {
    match decode(text)? {
        value @ (Value::Array(_) | Value::Null) => Ok(engine::array_from_value(Some(&value))?),
        other => Err(JsonError::UnexpectedShape {
            expected: "an array",
            found: describe(&other),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MappableExt;
    use crate::derive::Mappable;

    #[derive(Mappable, Default, Debug, PartialEq)]
    struct Restaurant {
        #[mappable(rename = "id")]
        obj_id: String,
        name: Option<String>,
    }

    #[test]
    fn malformed_text() {
        assert!(matches!(decode("{ \"a\": "), Err(JsonError::MalformedJsonText(_))));
        assert!(matches!(
            object_from_json::<Restaurant>("not json"),
            Err(JsonError::MalformedJsonText(_))
        ));
    }

    #[test]
    fn unexpected_shapes() {
        assert!(matches!(
            decode_dictionary("[1, 2]"),
            Err(JsonError::UnexpectedShape { expected: "a dictionary", found: "an array" })
        ));
        assert!(matches!(
            array_from_json::<Restaurant>(r#"{"id": "x"}"#),
            Err(JsonError::UnexpectedShape { found: "a dictionary", .. })
        ));
        assert!(decode_array("null").unwrap().is_empty());
    }

    #[test]
    fn object_round_trip() {
        let restaurant = Restaurant {
            obj_id: "r-9".into(),
            name: Some("Qwik".into()),
        };

        let text = restaurant.to_json_string().unwrap();
        assert_eq!(text, r#"{"id":"r-9","name":"Qwik"}"#);
        assert_eq!(restaurant.to_json_data().unwrap(), text.as_bytes());
        assert_eq!(object_from_json::<Restaurant>(&text).unwrap(), restaurant);
    }

    #[test]
    fn null_array_is_empty() {
        assert!(array_from_json::<Restaurant>("null").unwrap().is_empty());
        assert_eq!(array_to_json::<Restaurant>(&[]).unwrap(), "[]");
    }

    #[test]
    fn encode_values() {
        let value = decode(r#"{"b": [1, null]}"#).unwrap();
        assert_eq!(encode(&value).unwrap(), r#"{"b":[1,null]}"#);
        assert!(encode_pretty(&value).unwrap().contains('\n'));
    }
}

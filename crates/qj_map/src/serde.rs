//! Bridges mappable objects to any `serde` data format.
//!
//! Objects travel through their dictionary form, so every naming, transient
//! and temporal rule of the engine applies unchanged.
//!
//! # Examples
//!
//! ```
//! use qj_map::{derive::Mappable, serde::MappableSerializer};
//!
//! #[derive(Mappable, Default)]
//! struct Restaurant {
//!     #[mappable(rename = "id")]
//!     obj_id: String,
//! }
//!
//! let restaurant = Restaurant { obj_id: "r-1".into() };
//! let text = serde_json::to_string(&MappableSerializer::new(&restaurant)).unwrap();
//!
//! assert_eq!(text, r#"{"id":"r-1"}"#);
//! ```

use serde_core::de::Error as _;
use serde_core::ser::Error as _;
use serde_core::{Deserialize, Deserializer, Serialize, Serializer};

use crate::value::Dictionary;
use crate::{Mappable, engine};

// -----------------------------------------------------------------------------
// MappableSerializer

/// Serializes a mappable object as a map of its external names.
pub struct MappableSerializer<'a, T: ?Sized> {
    object: &'a T,
}

impl<'a, T: Mappable + ?Sized> MappableSerializer<'a, T> {
    #[inline]
    pub fn new(object: &'a T) -> Self {
        Self { object }
    }
}

impl<T: Mappable + ?Sized> Serialize for MappableSerializer<'_, T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        engine::to_dictionary(self.object)
            .map_err(S::Error::custom)?
            .serialize(serializer)
    }
}

// -----------------------------------------------------------------------------
// Deserialize

/// Builds a `T` from a map read by any `serde` deserializer.
///
/// Structural mapping errors become the deserializer's custom error.
pub fn deserialize<'de, T, D>(deserializer: D) -> Result<T, D::Error>
where
    T: Mappable + Default,
    D: Deserializer<'de>,
{
    let dictionary = Dictionary::deserialize(deserializer)?;
    engine::from_dictionary(&dictionary).map_err(D::Error::custom)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::derive::Mappable;
    use crate::temporal::{DbDate, test_lock};

    #[derive(Mappable, Default, Debug, PartialEq)]
    struct Table {
        seats: u8,
        label: String,
        booked: Option<DbDate>,
        #[mappable(transient)]
        selected: bool,
    }

    fn table() -> Table {
        Table {
            seats: 4,
            label: "patio".into(),
            booked: Some(DbDate::from_db_string("2024-03-15").unwrap()),
            selected: true,
        }
    }

    #[test]
    fn ron_round_trip() {
        let _guard = test_lock();
        let text = ron::to_string(&MappableSerializer::new(&table())).unwrap();
        assert!(text.contains("2024-03-15"));
        assert!(!text.contains("selected"));

        let restored: Table = deserialize(&mut ron::Deserializer::from_str(&text).unwrap()).unwrap();
        assert_eq!(restored, Table { selected: false, ..table() });
    }

    #[test]
    fn json_matches_engine() {
        let _guard = test_lock();
        let value = serde_json::to_value(MappableSerializer::new(&table())).unwrap();
        assert_eq!(value, serde_json::Value::Object(engine::to_dictionary(&table()).unwrap()));
    }
}

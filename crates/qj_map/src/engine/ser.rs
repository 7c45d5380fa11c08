use alloc::borrow::ToOwned;
use alloc::vec::Vec;

use crate::value::{Dictionary, FieldRef, FieldValue, Value};
use crate::{Mappable, MappingError};

/// Converts `object` into a dictionary keyed by external names.
///
/// Fields are visited in declaration order, flattened bases in place.
/// Transient fields and fields without a value (`None`) are omitted; nested
/// objects become dictionaries, sequences become arrays and temporal values
/// their canonical text.
///
/// # Examples
///
/// ```
/// use qj_map::{derive::Mappable, engine};
///
/// #[derive(Mappable, Default)]
/// struct Menu {
///     title: String,
///     price: Option<f64>,
///     #[mappable(transient)]
///     selected: bool,
/// }
///
/// let menu = Menu { title: "Lunch".into(), price: None, selected: true };
/// let dictionary = engine::to_dictionary(&menu).unwrap();
///
/// assert_eq!(dictionary.len(), 1);
/// assert_eq!(dictionary["title"], "Lunch");
/// ```
pub fn to_dictionary<T: Mappable + ?Sized>(object: &T) -> Result<Dictionary, MappingError> {
    let mut dictionary = Dictionary::new();
    write_fields(object, &mut dictionary)?;
    Ok(dictionary)
}

fn write_fields<T: Mappable + ?Sized>(
    object: &T,
    dictionary: &mut Dictionary,
) -> Result<(), MappingError> {
    let info = object.object_info();
    let naming = info.naming();

    for field in info.iter() {
        let name = field.name();
        if naming.is_transient(name) {
            continue;
        }
        if field.is_flatten() {
            match object.field(name).and_then(FieldValue::as_mappable) {
                Some(base) => write_fields(base, dictionary)?,
                None => log::trace!("flattened `{name}` of `{}` is empty", info.type_path()),
            }
            continue;
        }
        object.serialize_field(name, naming.external_name(name), dictionary)?;
    }
    Ok(())
}

/// The default [`Mappable::serialize_field`]: writes the field `internal`
/// under `external`, omitting it when it has no value.
pub fn write_standard<T: Mappable + ?Sized>(
    object: &T,
    internal: &str,
    external: &str,
    dictionary: &mut Dictionary,
) -> Result<(), MappingError> {
    let Some(field) = object.field(internal) else {
        log::trace!(
            "`{}` has no field `{internal}` to serialize",
            object.object_info().type_path()
        );
        return Ok(());
    };
    if let Some(value) = to_value(field.field_ref())? {
        dictionary.insert(external.to_owned(), value);
    }
    Ok(())
}

/// Converts a field view into its dictionary form; `None` for no value.
pub fn to_value(field: FieldRef<'_>) -> Result<Option<Value>, MappingError> {
    Ok(match field {
        FieldRef::Null => None,
        FieldRef::Scalar(value) => Some(value),
        FieldRef::Temporal(temporal) => Some(temporal.to_value()),
        FieldRef::Object(object) => Some(Value::Object(to_dictionary(object)?)),
        FieldRef::Sequence(items) => Some(Value::Array(
            items
                .into_iter()
                .map(|item| Ok(to_value(item)?.unwrap_or(Value::Null)))
                .collect::<Result<_, MappingError>>()?,
        )),
    })
}

/// Converts each object into a dictionary, preserving order.
///
/// # Examples
///
/// ```
/// use qj_map::{derive::Mappable, engine};
///
/// #[derive(Mappable, Default)]
/// struct Tag {
///     name: String,
/// }
///
/// let tags = [Tag { name: "vegan".into() }, Tag { name: "spicy".into() }];
/// let dictionaries = engine::array_to_dictionaries(&tags).unwrap();
///
/// assert_eq!(dictionaries[1]["name"], "spicy");
/// assert!(engine::array_to_dictionaries::<Tag>(&[]).unwrap().is_empty());
/// ```
pub fn array_to_dictionaries<'a, T: Mappable + 'a>(
    items: impl IntoIterator<Item = &'a T>,
) -> Result<Vec<Dictionary>, MappingError> {
    items.into_iter().map(|item| to_dictionary(item)).collect()
}

#[cfg(test)]
mod tests {
    use alloc::string::String;

    use serde_json::json;

    use super::*;
    use crate::derive::Mappable;
    use crate::info::Typed;
    use crate::temporal::{DbDate, DbTimeStamp, test_lock};

    #[derive(Mappable, Default)]
    struct Entity {
        #[mappable(rename = "id")]
        obj_id: String,
        updated: Option<DbTimeStamp>,
    }

    #[derive(Mappable, Default)]
    struct Dish {
        name: String,
        price: f64,
    }

    #[derive(Mappable, Default)]
    struct Restaurant {
        #[mappable(flatten)]
        entity: Entity,
        name: String,
        opened: Option<DbDate>,
        chef: Option<Dish>,
        dishes: Vec<Dish>,
        ratings: Vec<Option<u8>>,
        #[mappable(transient)]
        selected: bool,
        description: String,
        _cache: u32,
    }

    fn restaurant() -> Restaurant {
        Restaurant {
            entity: Entity {
                obj_id: "r-1".into(),
                updated: None,
            },
            name: "Qwik".into(),
            opened: Some(DbDate::from_db_string("2015-01-01").unwrap()),
            chef: None,
            dishes: vec![Dish { name: "Soup".into(), price: 4.5 }],
            ratings: vec![Some(5), None],
            selected: true,
            description: "shown nowhere".into(),
            _cache: 3,
        }
    }

    #[test]
    fn writes_external_names() {
        let _guard = test_lock();
        let dictionary = to_dictionary(&restaurant()).unwrap();

        assert_eq!(
            Value::Object(dictionary),
            json!({
                "id": "r-1",
                "name": "Qwik",
                "opened": "2015-01-01",
                "dishes": [{ "name": "Soup", "price": 4.5 }],
                "ratings": [5, null],
            })
        );
    }

    #[test]
    fn flattened_fields_are_inlined() {
        let _guard = test_lock();
        assert!(Restaurant::object_info().field_at(0).unwrap().is_flatten());

        let mut restaurant = restaurant();
        restaurant.entity.updated = Some(DbTimeStamp::from_units(1_420_070_400).unwrap());
        let dictionary = to_dictionary(&restaurant).unwrap();

        assert_eq!(dictionary["updated"], "1420070400");
        assert!(!dictionary.contains_key("entity"));
    }

    #[test]
    fn serialize_field_hook() {
        #[derive(Mappable, Default)]
        #[mappable(Mappable = false)]
        struct Masked {
            card: String,
            holder: String,
        }

        impl Mappable for Masked {
            fn serialize_field(
                &self,
                internal: &str,
                external: &str,
                dictionary: &mut Dictionary,
            ) -> Result<(), MappingError> {
                if internal == "card" {
                    let tail = &self.card[self.card.len().saturating_sub(4)..];
                    dictionary.insert(external.into(), format!("****{tail}").into());
                    return Ok(());
                }
                write_standard(self, internal, external, dictionary)
            }
        }

        let masked = Masked {
            card: "4111111111111111".into(),
            holder: "Ana".into(),
        };
        assert_eq!(
            Value::Object(to_dictionary(&masked).unwrap()),
            json!({ "card": "****1111", "holder": "Ana" })
        );
    }

    #[test]
    fn empty_sequences_are_written() {
        #[derive(Mappable, Default)]
        struct Tags {
            tags: Vec<String>,
            extra: Option<Vec<String>>,
        }

        let dictionary = to_dictionary(&Tags::default()).unwrap();
        assert_eq!(Value::Object(dictionary), json!({ "tags": [] }));
    }

    #[test]
    fn arrays_keep_order() {
        let dishes = [
            Dish { name: "a".into(), price: 1.0 },
            Dish { name: "b".into(), price: 2.0 },
        ];
        let dictionaries = array_to_dictionaries(&dishes).unwrap();
        assert_eq!(dictionaries.len(), 2);
        assert_eq!(dictionaries[0]["name"], "a");
        assert_eq!(dictionaries[1]["price"], 2.0);
    }
}

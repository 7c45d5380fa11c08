use alloc::vec::Vec;

use crate::info::{FieldInfo, ObjectInfo};
use crate::registry::TypeHandle;
use crate::value::{Dictionary, FieldInput, FieldValue, Value, describe};
use crate::{Mappable, MappingError};

// -----------------------------------------------------------------------------
// Objects

/// Builds a `T` from `dictionary`.
///
/// Starts from `T::default()` and [`populate`]s it: keys are translated to
/// internal names, unknown keys are ignored, and missing keys keep their
/// zero value.
///
/// # Examples
///
/// ```
/// use qj_map::{derive::Mappable, engine};
///
/// #[derive(Mappable, Default)]
/// struct Restaurant {
///     #[mappable(rename = "id")]
///     obj_id: String,
///     rating: u8,
/// }
///
/// let dictionary = qj_map::json::decode_dictionary(r#"{ "id": "r-1", "owner": "x" }"#).unwrap();
/// let restaurant: Restaurant = engine::from_dictionary(&dictionary).unwrap();
///
/// assert_eq!(restaurant.obj_id, "r-1");
/// assert_eq!(restaurant.rating, 0);
/// ```
pub fn from_dictionary<T: Mappable + Default>(dictionary: &Dictionary) -> Result<T, MappingError> {
    let mut object = T::default();
    populate(&mut object, dictionary)?;
    Ok(object)
}

/// Fills an existing object from `dictionary`.
///
/// Fields whose key is absent are left untouched.
pub fn populate<T: Mappable + ?Sized>(
    object: &mut T,
    dictionary: &Dictionary,
) -> Result<(), MappingError> {
    for (key, value) in dictionary {
        populate_key(object, dictionary, key, value)?;
    }
    Ok(())
}

fn populate_key<T: Mappable + ?Sized>(
    object: &mut T,
    dictionary: &Dictionary,
    key: &str,
    value: &Value,
) -> Result<(), MappingError> {
    let info = object.object_info();
    let naming = info.naming();
    let internal = naming.internal_name(key);

    if declares(info, key) {
        if naming.is_transient(internal) {
            return Ok(());
        }
    } else {
        let owner = info.flattened().map(FieldInfo::name).find(|name| {
            object
                .field(name)
                .and_then(FieldValue::as_mappable)
                .is_some_and(|base| declares_key(base, key))
        });
        if let Some(name) = owner
            && let Some(base) = object.field_mut(name).and_then(FieldValue::as_mappable_mut)
        {
            return populate_key(base, dictionary, key, value);
        }
        if info.field(internal).is_some() {
            // A renamed field by its internal name, or a flattened base by its own name.
            log::trace!("`{key}` is not a key of `{}`", info.type_path());
            return Ok(());
        }
        log::trace!("no field of `{}` declares `{key}`", info.type_path());
    }

    let result = match object.nested_type(key) {
        Some(handle) => write_nested(object, handle, dictionary, key, internal, value),
        None => object.write_field(dictionary, key, internal),
    };
    absorb(result, info.type_path(), key)
}

// Own, non-flattened field mapped under `key`.
fn declares(info: &ObjectInfo, key: &str) -> bool {
    info.field(info.naming().internal_name(key))
        .is_some_and(|field| !field.is_flatten() && field.external_name() == key)
}

fn declares_key(object: &dyn Mappable, key: &str) -> bool {
    let info = object.object_info();
    declares(info, key)
        || info.flattened().any(|base| {
            object
                .field(base.name())
                .and_then(FieldValue::as_mappable)
                .is_some_and(|base| declares_key(base, key))
        })
}

fn write_nested<T: Mappable + ?Sized>(
    object: &mut T,
    handle: TypeHandle,
    dictionary: &Dictionary,
    key: &str,
    internal: &str,
    value: &Value,
) -> Result<(), MappingError> {
    let input = match value {
        Value::Object(nested) => FieldInput::Object(handle.from_dictionary(nested)?),
        Value::Array(items) if items.iter().all(Value::is_object) => FieldInput::Objects(
            items
                .iter()
                .filter_map(Value::as_object)
                .map(|nested| handle.from_dictionary(nested))
                .collect::<Result<_, _>>()?,
        ),
        _ => return object.write_field(dictionary, key, internal),
    };

    log::trace!("`{key}` resolved as `{}`", handle.type_path());
    match object.field_mut(internal) {
        Some(field) => field.assign(input),
        None => Err(MappingError::invalid_target(
            object.object_info().type_path(),
            alloc::format!("nested type given for `{key}`, which matches no field"),
        )),
    }
}

fn absorb(result: Result<(), MappingError>, type_path: &str, key: &str) -> Result<(), MappingError> {
    match result {
        Err(err) if err.is_field_level() => {
            log::warn!("left `{key}` of `{type_path}` unset: {err}");
            Ok(())
        }
        other => other,
    }
}

/// The default [`Mappable::set_field`]: assigns `value` to the field
/// `internal`, ignoring names that match no field.
pub fn assign_standard<T: Mappable + ?Sized>(
    object: &mut T,
    internal: &str,
    value: &Value,
) -> Result<(), MappingError> {
    match object.field_mut(internal) {
        Some(field) => field.assign(FieldInput::Raw(value)),
        None => Ok(()),
    }
}

/// Assigns `input` to a field whose type is the mappable `T`.
///
/// A dictionary populates the current value in place and `null` leaves it
/// untouched. Used by the derived [`FieldValue`] implementation.
pub fn assign_object<T: Mappable>(target: &mut T, input: FieldInput<'_>) -> Result<(), MappingError> {
    match input {
        FieldInput::Raw(Value::Object(dictionary)) => populate(target, dictionary),
        FieldInput::Raw(Value::Null) => Ok(()),
        FieldInput::Object(object) => {
            let found = object.object_info().type_path();
            match object.take::<T>() {
                Ok(object) => {
                    *target = object;
                    Ok(())
                }
                Err(_) => Err(MappingError::invalid_target(
                    found,
                    alloc::format!(
                        "resolved nested type does not match the declared `{}`",
                        target.object_info().type_path()
                    ),
                )),
            }
        }
        other => Err(MappingError::mismatched::<T>("a dictionary", &other)),
    }
}

// -----------------------------------------------------------------------------
// Arrays

/// Builds one `T` per dictionary, preserving order.
pub fn dictionaries_to_array<T: Mappable + Default>(
    dictionaries: &[Dictionary],
) -> Result<Vec<T>, MappingError> {
    dictionaries.iter().map(from_dictionary).collect()
}

/// Builds one `T` per dictionary of a raw array value.
///
/// A missing or `null` value gives an empty vector. Elements that are not
/// dictionaries are skipped with a warning.
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
/// let response = qj_map::json::decode_dictionary(
///     r#"{ "tags": [{ "name": "a" }, { "name": "b" }] }"#,
/// ).unwrap();
///
/// let tags: Vec<Tag> = engine::array_from_value(response.get("tags")).unwrap();
/// assert_eq!(tags.len(), 2);
///
/// let none: Vec<Tag> = engine::array_from_value(response.get("missing")).unwrap();
/// assert!(none.is_empty());
/// ```
pub fn array_from_value<T: Mappable + Default>(value: Option<&Value>) -> Result<Vec<T>, MappingError> {
    match value {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| match item {
                Value::Object(dictionary) => Some(from_dictionary(dictionary)),
                other => {
                    log::warn!("skipped {} in an array of dictionaries", describe(other));
                    None
                }
            })
            .collect(),
        Some(other) => Err(MappingError::MismatchedValue {
            type_path: core::any::type_name::<Vec<T>>().into(),
            expected: "an array of dictionaries",
            found: describe(other),
        }),
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;

    use serde_json::json;

    use super::*;
    use crate::MappableExt;
    use crate::derive::Mappable;
    use crate::temporal::{DbDate, DbDateTime, DbTime, DbTimeStamp, test_lock};

    fn dictionary(value: Value) -> Dictionary {
        match value {
            Value::Object(dictionary) => dictionary,
            other => panic!("not a dictionary: {other}"),
        }
    }

    #[derive(Mappable, Default, Debug, PartialEq)]
    struct Entity {
        #[mappable(rename = "id")]
        obj_id: String,
    }

    #[derive(Mappable, Default, Debug, PartialEq)]
    struct Dish {
        name: String,
        price: f64,
    }

    #[derive(Mappable, Default, Debug, PartialEq)]
    struct Restaurant {
        #[mappable(flatten)]
        entity: Entity,
        name: String,
        seats: u16,
        opened: Option<DbDate>,
        closes: Option<DbTime>,
        inspected: Option<DbDateTime>,
        updated: Option<DbTimeStamp>,
        chef: Option<Dish>,
        dishes: Vec<Dish>,
        #[mappable(transient)]
        selected: bool,
        hash: u64,
    }

    #[test]
    fn round_trip() {
        let _guard = test_lock();
        let payload = json!({
            "id": "r-1",
            "name": "Qwik",
            "seats": 40,
            "opened": "2015-01-01",
            "closes": "22:30:00",
            "inspected": "2024-03-15T10:15:00",
            "updated": "1420070400",
            "chef": { "name": "Omelette", "price": 7.0 },
            "dishes": [{ "name": "Soup", "price": 4.5 }],
        });

        let restaurant: Restaurant = from_dictionary(&dictionary(payload.clone())).unwrap();
        assert_eq!(restaurant.entity.obj_id, "r-1");
        assert_eq!(restaurant.seats, 40);
        assert_eq!(restaurant.chef.as_ref().unwrap().name, "Omelette");
        assert_eq!(restaurant.dishes[0].price, 4.5);

        assert_eq!(Value::Object(restaurant.to_dictionary().unwrap()), payload);
    }

    #[test]
    fn transient_fields_are_not_populated() {
        let restaurant: Restaurant =
            from_dictionary(&dictionary(json!({ "selected": true, "hash": 9, "name": "a" }))).unwrap();

        assert!(!restaurant.selected);
        assert_eq!(restaurant.hash, 0);
        assert_eq!(restaurant.name, "a");
    }

    #[test]
    fn unknown_and_missing_keys() {
        let restaurant: Restaurant =
            from_dictionary(&dictionary(json!({ "owner": "x", "obj_id": "internal" }))).unwrap();

        // Internal names are not keys once renamed.
        assert_eq!(restaurant, Restaurant::default());
    }

    #[test]
    fn field_level_errors_are_absorbed() {
        let _guard = test_lock();
        let restaurant: Restaurant = from_dictionary(&dictionary(json!({
            "name": "Qwik",
            "seats": "many",
            "opened": "yesterday",
            "dishes": "none",
            "chef": 3,
        })))
        .unwrap();

        assert_eq!(restaurant.name, "Qwik");
        assert_eq!(restaurant.seats, 0);
        assert!(restaurant.opened.is_none());
        assert!(restaurant.dishes.is_empty());
        assert!(restaurant.chef.is_none());
    }

    #[test]
    fn populate_keeps_absent_fields() {
        let mut restaurant = Restaurant {
            name: "kept".into(),
            seats: 12,
            ..Restaurant::default()
        };
        populate(&mut restaurant, &dictionary(json!({ "seats": 20, "chef": null }))).unwrap();

        assert_eq!(restaurant.name, "kept");
        assert_eq!(restaurant.seats, 20);
    }

    #[test]
    fn nested_objects() {
        #[derive(Mappable, Default)]
        struct Kitchen {
            chef: Dish,
            backup: Option<Dish>,
        }

        let mut kitchen = Kitchen {
            chef: Dish { name: "Tart".into(), price: 3.0 },
            backup: Some(Dish { name: "Pie".into(), price: 2.0 }),
        };
        let update = json!({ "chef": { "price": 5.0 }, "backup": { "price": 6.0 } });
        populate(&mut kitchen, &dictionary(update)).unwrap();

        // Plain fields are populated in place, `Option` fields rebuilt.
        assert_eq!(kitchen.chef, Dish { name: "Tart".into(), price: 5.0 });
        assert_eq!(kitchen.backup, Some(Dish { name: String::new(), price: 6.0 }));

        populate(&mut kitchen, &dictionary(json!({ "chef": null, "backup": null }))).unwrap();
        assert_eq!(kitchen.chef, Dish { name: "Tart".into(), price: 5.0 });
        assert_eq!(kitchen.backup, None);
    }

    // -------------------------------------------------------------------------
    // Hooks

    #[derive(Mappable, Default, Debug, PartialEq)]
    struct Pizza {
        name: String,
        slices: u8,
    }

    #[derive(Mappable, Default, Debug)]
    #[mappable(Mappable = false)]
    struct Menu {
        special: Option<Pizza>,
        courses: Vec<Pizza>,
        wrong: Option<Dish>,
        notes: Vec<String>,
        #[mappable(transient)]
        raw_keys: Vec<String>,
    }

    impl Mappable for Menu {
        fn nested_type(&self, external_key: &str) -> Option<TypeHandle> {
            match external_key {
                "special" | "courses" | "notes" => Some(TypeHandle::of::<Pizza>()),
                "wrong" => Some(TypeHandle::of::<Pizza>()),
                "orphan" => Some(TypeHandle::of::<Pizza>()),
                _ => None,
            }
        }

        fn write_field(
            &mut self,
            dictionary: &Dictionary,
            key: &str,
            internal: &str,
        ) -> Result<(), MappingError> {
            self.raw_keys.push(key.into());
            match dictionary.get(key) {
                Some(value) => self.set_field(internal, value),
                None => Ok(()),
            }
        }
    }

    #[test]
    fn nested_type_hook_builds_objects() {
        let menu: Menu = from_dictionary(&dictionary(json!({
            "special": { "name": "Margherita", "slices": 8 },
            "courses": [{ "name": "a" }, { "name": "b", "slices": 4 }],
            "notes": ["spicy", "vegan"],
        })))
        .unwrap();

        assert_eq!(menu.special.unwrap().name, "Margherita");
        assert_eq!(menu.courses.len(), 2);
        assert_eq!(menu.courses[1].slices, 4);
        // Not dictionaries: converted as raw values through `write_field`.
        assert_eq!(menu.notes, ["spicy", "vegan"]);
        assert_eq!(menu.raw_keys, ["notes"]);
    }

    #[test]
    fn unknown_keys_reach_write_field() {
        let menu: Menu = from_dictionary(&dictionary(json!({ "extra": 1 }))).unwrap();
        assert_eq!(menu.raw_keys, ["extra"]);
    }

    #[test]
    fn mismatched_nested_type_is_structural() {
        let err = from_dictionary::<Menu>(&dictionary(json!({ "wrong": { "name": "x" } }))).unwrap_err();
        assert!(matches!(err, MappingError::InvalidMappingTarget { .. }));
        assert!(!err.is_field_level());

        let err = from_dictionary::<Menu>(&dictionary(json!({ "orphan": {} }))).unwrap_err();
        assert!(err.to_string().contains("matches no field"));
    }

    #[test]
    fn unconstructible_nested_type() {
        #[derive(Mappable, Default, Debug)]
        #[mappable(Mappable = false)]
        struct Holder {
            pizza: Option<Pizza>,
        }

        impl Mappable for Holder {
            fn nested_type(&self, _: &str) -> Option<TypeHandle> {
                Some(TypeHandle::unconstructible::<Pizza>())
            }
        }

        let err = from_dictionary::<Holder>(&dictionary(json!({ "pizza": {} }))).unwrap_err();
        assert!(matches!(err, MappingError::InvalidMappingTarget { .. }));
    }

    // -------------------------------------------------------------------------
    // Flatten

    #[derive(Mappable, Default, Debug, PartialEq)]
    struct Base {
        #[mappable(rename = "id")]
        obj_id: String,
        name: String,
    }

    #[derive(Mappable, Default, Debug, PartialEq)]
    struct Middle {
        #[mappable(flatten)]
        base: Base,
        rating: u8,
    }

    #[derive(Mappable, Default, Debug, PartialEq)]
    struct Leaf {
        #[mappable(flatten)]
        middle: Middle,
        title: String,
    }

    #[test]
    fn flattened_bases_resolve_keys() {
        let payload = json!({ "id": "l-1", "name": "base", "rating": 4, "title": "leaf" });
        let leaf: Leaf = from_dictionary(&dictionary(payload.clone())).unwrap();

        assert_eq!(leaf.middle.base.obj_id, "l-1");
        assert_eq!(leaf.middle.base.name, "base");
        assert_eq!(leaf.middle.rating, 4);
        assert_eq!(leaf.title, "leaf");
        assert_eq!(Value::Object(leaf.to_dictionary().unwrap()), payload);
    }

    #[test]
    #[should_panic(expected = "external name `name` is claimed by both")]
    fn flattened_base_cannot_share_a_key() {
        #[derive(Mappable, Default)]
        struct Shadowing {
            name: String,
            #[mappable(flatten)]
            base: Base,
        }

        let _ = from_dictionary::<Shadowing>(&dictionary(json!({ "name": "own" })));
    }

    // -------------------------------------------------------------------------
    // Arrays

    #[test]
    fn arrays_of_dictionaries() {
        let dishes: Vec<Dish> = dictionaries_to_array(&[
            dictionary(json!({ "name": "a" })),
            dictionary(json!({ "name": "b" })),
        ])
        .unwrap();
        assert_eq!(dishes[1].name, "b");

        let value = json!([{ "name": "a" }, 3, { "name": "c" }]);
        let dishes: Vec<Dish> = array_from_value(Some(&value)).unwrap();
        assert_eq!(dishes.len(), 2);

        let err = array_from_value::<Dish>(Some(&json!("x"))).unwrap_err();
        assert!(matches!(err, MappingError::MismatchedValue { expected: "an array of dictionaries", .. }));
    }
}

//! Mappable objects whose storage is owned by an external context.
//!
//! A persistence layer (an object store, a cache, an ORM session) owns the
//! objects; the engine only builds and fills them. [`ObjectContext`] is the
//! seam: the engine hands it every object it creates.
//!
//! # Examples
//!
//! ```
//! use qj_map::{Mappable, MappingError, derive::Mappable};
//! use qj_map::managed::{self, ManagedObject, ObjectContext};
//!
//! #[derive(Mappable, Default)]
//! struct Reservation {
//!     party: String,
//! }
//!
//! impl ManagedObject for Reservation {
//!     const ENTITY: &'static str = "Reservation";
//! }
//!
//! #[derive(Default)]
//! struct Store(Vec<(&'static str, Box<dyn Mappable>)>);
//!
//! impl ObjectContext for Store {
//!     type Key = usize;
//!     type Error = MappingError;
//!
//!     fn insert(&mut self, entity: &'static str, object: Box<dyn Mappable>) -> Result<usize, MappingError> {
//!         self.0.push((entity, object));
//!         Ok(self.0.len() - 1)
//!     }
//!
//!     fn get(&self, key: &usize) -> Option<&dyn Mappable> {
//!         self.0.get(*key).map(|(_, object)| object.as_ref())
//!     }
//! }
//!
//! let mut store = Store::default();
//! let dictionary = qj_map::json::decode_dictionary(r#"{ "party": "Ng" }"#).unwrap();
//! let key = managed::insert_from_dictionary::<Reservation, _>(&mut store, &dictionary).unwrap();
//!
//! assert_eq!(managed::fetch::<Reservation, _>(&store, &key).unwrap().party, "Ng");
//! ```

use alloc::boxed::Box;
use alloc::vec::Vec;

use crate::info::Typed;
use crate::value::Dictionary;
use crate::{Mappable, MappingError, engine};

/// A mappable type stored in an [`ObjectContext`].
pub trait ManagedObject: Mappable + Typed + Default {
    /// The entity name the context stores this type under.
    const ENTITY: &'static str;
}

/// The external owner of managed objects.
pub trait ObjectContext {
    type Key;
    type Error: From<MappingError>;

    /// Takes ownership of `object`, returning its key.
    fn insert(&mut self, entity: &'static str, object: Box<dyn Mappable>) -> Result<Self::Key, Self::Error>;

    fn get(&self, key: &Self::Key) -> Option<&dyn Mappable>;
}

/// Builds a `T` from `dictionary` and inserts it into `context`.
pub fn insert_from_dictionary<T, C>(context: &mut C, dictionary: &Dictionary) -> Result<C::Key, C::Error>
where
    T: ManagedObject,
    C: ObjectContext + ?Sized,
{
    let object: T = engine::from_dictionary(dictionary)?;
    log::trace!("inserting `{}` built from a dictionary", T::ENTITY);
    context.insert(T::ENTITY, Box::new(object))
}

/// Builds and inserts one `T` per dictionary, preserving order.
///
/// Stops at the first error; objects inserted before it stay in the context.
pub fn insert_all_from_array<T, C>(
    context: &mut C,
    dictionaries: &[Dictionary],
) -> Result<Vec<C::Key>, C::Error>
where
    T: ManagedObject,
    C: ObjectContext + ?Sized,
{
    dictionaries
        .iter()
        .map(|dictionary| insert_from_dictionary::<T, C>(context, dictionary))
        .collect()
}

/// Returns the object stored under `key` if it is a `T`.
pub fn fetch<'c, T, C>(context: &'c C, key: &C::Key) -> Option<&'c T>
where
    T: ManagedObject,
    C: ObjectContext + ?Sized,
{
    context.get(key)?.downcast_ref()
}

#[cfg(test)]
mod tests {
    use alloc::string::String;

    use super::*;
    use crate::MappableExt;
    use crate::derive::Mappable;
    use crate::temporal::DbDate;

    #[derive(Mappable, Default)]
    struct Guest {
        name: String,
        visit: Option<DbDate>,
    }

    impl ManagedObject for Guest {
        const ENTITY: &'static str = "Guest";
    }

    #[derive(Debug)]
    enum ContextError {
        Full,
        Mapping(MappingError),
    }

    impl From<MappingError> for ContextError {
        fn from(err: MappingError) -> Self {
            Self::Mapping(err)
        }
    }

    struct Bounded {
        limit: usize,
        objects: Vec<(&'static str, Box<dyn Mappable>)>,
    }

    impl ObjectContext for Bounded {
        type Key = usize;
        type Error = ContextError;

        fn insert(&mut self, entity: &'static str, object: Box<dyn Mappable>) -> Result<usize, ContextError> {
            if self.objects.len() == self.limit {
                return Err(ContextError::Full);
            }
            self.objects.push((entity, object));
            Ok(self.objects.len() - 1)
        }

        fn get(&self, key: &usize) -> Option<&dyn Mappable> {
            self.objects.get(*key).map(|(_, object)| object.as_ref())
        }
    }

    fn guest(name: &str) -> Dictionary {
        let mut dictionary = Dictionary::new();
        dictionary.insert("name".into(), name.into());
        dictionary
    }

    #[test]
    fn inserts_in_order() {
        let mut context = Bounded { limit: 8, objects: Vec::new() };
        let keys =
            insert_all_from_array::<Guest, _>(&mut context, &[guest("a"), guest("b")]).unwrap();

        assert_eq!(keys, [0, 1]);
        assert_eq!(fetch::<Guest, _>(&context, &1).unwrap().name, "b");
        assert!(context.objects.iter().all(|(entity, _)| *entity == "Guest"));

        let dictionary = context.get(&0).unwrap().to_dictionary().unwrap();
        assert_eq!(dictionary, guest("a"));
    }

    #[test]
    fn context_errors_stop_insertion() {
        let mut context = Bounded { limit: 1, objects: Vec::new() };
        let result = insert_all_from_array::<Guest, _>(&mut context, &[guest("a"), guest("b")]);

        assert!(matches!(result, Err(ContextError::Full)));
        assert_eq!(context.objects.len(), 1);
    }

    #[test]
    fn field_errors_do_not_reach_the_context() {
        let mut context = Bounded { limit: 1, objects: Vec::new() };
        let mut dictionary = guest("c");
        dictionary.insert("visit".into(), "not a date".into());

        let key = insert_from_dictionary::<Guest, _>(&mut context, &dictionary).unwrap();
        let stored = fetch::<Guest, _>(&context, &key).unwrap();
        assert!(stored.visit.is_none());
        assert_eq!(stored.name, "c");
    }
}

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::any::TypeId;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use qj_utils::hash::{HashMap, HashSet};

use crate::info::Typed;
use crate::registry::TypeHandle;
use crate::value::Dictionary;
use crate::{Mappable, MappingError};

// -----------------------------------------------------------------------------
// TypeRegistry

/// A registry of mappable types.
///
/// Types are found by full type path (`my_app::model::Restaurant`) or by
/// short type name (`Restaurant`); a short name shared by several registered
/// types is ambiguous and resolves to nothing.
///
/// # Example
///
/// ```
/// use qj_map::{derive::Mappable, registry::TypeRegistry};
///
/// #[derive(Mappable, Default)]
/// #[mappable(type_path = "api::Restaurant")]
/// struct Restaurant {
///     name: String,
/// }
///
/// let mut registry = TypeRegistry::new();
/// registry.register::<Restaurant>();
///
/// let dictionary = qj_map::json::decode_dictionary(r#"{ "name": "Qwik" }"#).unwrap();
/// let object = registry.from_dictionary("Restaurant", &dictionary).unwrap();
///
/// assert_eq!(object.take::<Restaurant>().unwrap().name, "Qwik");
/// assert!(registry.get_with_type_path("api::Restaurant").is_some());
/// ```
#[derive(Default)]
pub struct TypeRegistry {
    handles: HashMap<TypeId, TypeHandle>,
    type_path_to_id: HashMap<&'static str, TypeId>,
    type_name_to_id: HashMap<&'static str, TypeId>,
    ambiguous_names: HashSet<&'static str>,
    auto_registered: bool,
}

impl TypeRegistry {
    /// Create an empty [`TypeRegistry`].
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    // # Validity
    // The type must **not** already exist.
    fn add_new_type_indices(&mut self, handle: &TypeHandle) {
        let info = handle.object_info();
        let type_name = info.type_name();

        if !self.ambiguous_names.contains(type_name) {
            if self.type_name_to_id.contains_key(type_name) {
                self.type_name_to_id.remove(type_name);
                self.ambiguous_names.insert(type_name);
            } else {
                self.type_name_to_id.insert(type_name, handle.ty_id());
            }
        }

        self.type_path_to_id.insert(info.type_path(), handle.ty_id());
    }

    /// Adds `handle` unless its type is already registered.
    ///
    /// Returns `true` if the handle was inserted.
    pub fn insert(&mut self, handle: TypeHandle) -> bool {
        if self.handles.contains_key(&handle.ty_id()) {
            return false;
        }
        log::debug!("registered `{}`", handle.type_path());
        self.add_new_type_indices(&handle);
        self.handles.insert(handle.ty_id(), handle);
        true
    }

    /// Registers `T`, built through `Default`.
    #[inline]
    pub fn register<T: Mappable + Typed + Default>(&mut self) -> bool {
        self.insert(TypeHandle::of::<T>())
    }

    /// Registers `T` without zero-argument construction; building it fails.
    #[inline]
    pub fn register_unconstructible<T: Mappable + Typed>(&mut self) -> bool {
        self.insert(TypeHandle::unconstructible::<T>())
    }

    /// Registers every type annotated with `#[mappable(auto_register)]`.
    ///
    /// Repeated calls are cheap and do not insert duplicates.
    ///
    /// ## Return Value
    ///
    /// Returns `true` if automatic registration works on the current
    /// platform. Without the `auto_register` feature this does nothing and
    /// returns `false`.
    #[cfg_attr(not(feature = "auto_register"), inline(always))]
    pub fn auto_register(&mut self) -> bool {
        #[cfg(feature = "auto_register")]
        {
            use crate::__macro_exports::auto_register;

            if !self.auto_registered {
                auto_register::__register_types(self);
            }
            self.auto_registered
        }
        #[cfg(not(feature = "auto_register"))]
        {
            false
        }
    }

    #[cfg(feature = "auto_register")]
    pub(crate) fn mark_auto_registered(&mut self) {
        self.auto_registered = true;
    }

    #[inline]
    pub fn contains(&self, type_id: TypeId) -> bool {
        self.handles.contains_key(&type_id)
    }

    #[inline]
    pub fn get(&self, type_id: TypeId) -> Option<TypeHandle> {
        self.handles.get(&type_id).copied()
    }

    /// Returns the handle with the given full type path.
    pub fn get_with_type_path(&self, type_path: &str) -> Option<TypeHandle> {
        self.get(*self.type_path_to_id.get(type_path)?)
    }

    /// Returns the handle with the given short type name.
    ///
    /// Returns `None` if the name is unknown or [ambiguous](Self::is_ambiguous).
    pub fn get_with_type_name(&self, type_name: &str) -> Option<TypeHandle> {
        self.get(*self.type_name_to_id.get(type_name)?)
    }

    /// Returns `true` if the short type name matches several registered types.
    #[inline]
    pub fn is_ambiguous(&self, type_name: &str) -> bool {
        self.ambiguous_names.contains(type_name)
    }

    /// Resolves `name` as a full type path first, then as a short type name.
    pub fn resolve(&self, name: &str) -> Result<TypeHandle, MappingError> {
        if let Some(handle) = self
            .get_with_type_path(name)
            .or_else(|| self.get_with_type_name(name))
        {
            return Ok(handle);
        }
        let reason = if self.is_ambiguous(name) {
            "type name matches several registered types"
        } else {
            "type is not registered"
        };
        Err(MappingError::invalid_target(String::from(name), reason))
    }

    /// Builds an object of the type registered as `name`.
    pub fn from_dictionary(
        &self,
        name: &str,
        dictionary: &Dictionary,
    ) -> Result<Box<dyn Mappable>, MappingError> {
        self.resolve(name)?.from_dictionary(dictionary)
    }

    /// Builds one object of the type registered as `name` per dictionary.
    pub fn dictionaries_to_array(
        &self,
        name: &str,
        dictionaries: &[Dictionary],
    ) -> Result<Vec<Box<dyn Mappable>>, MappingError> {
        self.resolve(name)?.dictionaries_to_array(dictionaries)
    }

    #[inline]
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &TypeHandle> {
        self.handles.values()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}

// -----------------------------------------------------------------------------
// TypeRegistryArc

/// A shareable [`TypeRegistry`].
#[derive(Clone, Default)]
pub struct TypeRegistryArc {
    /// The wrapped [`TypeRegistry`].
    pub internal: Arc<RwLock<TypeRegistry>>,
}

impl TypeRegistryArc {
    /// Takes a read lock on the underlying [`TypeRegistry`].
    pub fn read(&self) -> RwLockReadGuard<'_, TypeRegistry> {
        self.internal.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Takes a write lock on the underlying [`TypeRegistry`].
    pub fn write(&self) -> RwLockWriteGuard<'_, TypeRegistry> {
        self.internal
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl core::fmt::Debug for TypeRegistryArc {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_list().entries(self.read().type_path_to_id.keys()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::derive::Mappable;

    mod first {
        use crate::derive::Mappable;

        #[derive(Mappable, Default)]
        pub struct Item {
            pub name: String,
        }
    }

    mod second {
        use crate::derive::Mappable;

        #[derive(Mappable, Default)]
        pub struct Item {
            pub price: f64,
        }
    }

    #[derive(Mappable, Default)]
    #[mappable(auto_register)]
    struct Registered {
        code: u32,
    }

    #[derive(Mappable)]
    struct Sealed {
        code: u32,
    }

    #[test]
    fn register_once() {
        let mut registry = TypeRegistry::new();
        assert!(registry.register::<first::Item>());
        assert!(!registry.register::<first::Item>());
        assert_eq!(registry.len(), 1);
        assert!(registry.contains(TypeId::of::<first::Item>()));
    }

    #[test]
    fn ambiguous_short_names() {
        let mut registry = TypeRegistry::new();
        registry.register::<first::Item>();
        registry.register::<second::Item>();

        assert!(registry.is_ambiguous("Item"));
        assert!(registry.get_with_type_name("Item").is_none());

        let path = core::any::type_name::<second::Item>();
        let handle = registry.resolve(path).unwrap();
        assert_eq!(handle.ty_id(), TypeId::of::<second::Item>());

        let err = registry.resolve("Item").unwrap_err();
        assert!(err.to_string().contains("several"));
    }

    #[test]
    fn unknown_and_unconstructible_targets() {
        let mut registry = TypeRegistry::new();
        registry.register_unconstructible::<Sealed>();

        let missing = registry.from_dictionary("Nowhere", &Dictionary::new()).unwrap_err();
        assert!(matches!(missing, MappingError::InvalidMappingTarget { .. }));

        let sealed = registry.from_dictionary("Sealed", &Dictionary::new()).unwrap_err();
        assert!(matches!(sealed, MappingError::InvalidMappingTarget { .. }));

        assert_eq!(Sealed { code: 1 }.code, 1);
    }

    #[cfg(feature = "auto_register")]
    #[test]
    fn auto_register() {
        let mut registry = TypeRegistry::new();
        assert!(registry.auto_register());
        assert!(registry.contains(TypeId::of::<Registered>()));
        assert!(registry.auto_register());
        assert_eq!(Registered::default().code, 0);
    }

    #[test]
    fn shared_registry() {
        let shared = TypeRegistryArc::default();
        shared.write().register::<first::Item>();
        assert!(shared.read().get_with_type_name("Item").is_some());
    }
}

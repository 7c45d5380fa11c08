use alloc::boxed::Box;
use alloc::vec::Vec;
use core::any::TypeId;
use core::fmt;

use crate::info::{ObjectInfo, Typed};
use crate::value::Dictionary;
use crate::{Mappable, MappingError, engine};

fn construct_default<T: Mappable + Default>() -> Box<dyn Mappable> {
    Box::new(T::default())
}

/// Describes a mappable type the engine can build at runtime.
///
/// # Examples
///
/// ```
/// use qj_map::{derive::Mappable, registry::TypeHandle};
///
/// #[derive(Mappable, Default)]
/// struct Menu {
///     title: String,
/// }
///
/// let handle = TypeHandle::of::<Menu>();
/// let dictionary = qj_map::json::decode_dictionary(r#"{ "title": "Dinner" }"#).unwrap();
///
/// let menu = handle.from_dictionary(&dictionary).unwrap();
/// assert_eq!(menu.downcast_ref::<Menu>().unwrap().title, "Dinner");
/// ```
#[derive(Clone, Copy)]
pub struct TypeHandle {
    ty_id: TypeId,
    // `ObjectInfo` is created on first access; using a function pointer delays it.
    object_info: fn() -> &'static ObjectInfo,
    construct: Option<fn() -> Box<dyn Mappable>>,
}

impl TypeHandle {
    /// Handle of a type built through `Default`.
    #[inline]
    pub fn of<T: Mappable + Typed + Default>() -> Self {
        Self {
            ty_id: TypeId::of::<T>(),
            object_info: <T as Typed>::object_info,
            construct: Some(construct_default::<T>),
        }
    }

    /// Handle of a type without zero-argument construction.
    ///
    /// Building it fails with [`MappingError::InvalidMappingTarget`].
    #[inline]
    pub fn unconstructible<T: Mappable + Typed>() -> Self {
        Self {
            ty_id: TypeId::of::<T>(),
            object_info: <T as Typed>::object_info,
            construct: None,
        }
    }

    #[inline]
    pub fn ty_id(&self) -> TypeId {
        self.ty_id
    }

    #[inline]
    pub fn object_info(&self) -> &'static ObjectInfo {
        (self.object_info)()
    }

    #[inline]
    pub fn type_path(&self) -> &'static str {
        self.object_info().type_path()
    }

    #[inline]
    pub fn is_constructible(&self) -> bool {
        self.construct.is_some()
    }

    /// Builds a zero-initialized object.
    pub fn construct(&self) -> Result<Box<dyn Mappable>, MappingError> {
        match self.construct {
            Some(construct) => Ok(construct()),
            None => Err(MappingError::invalid_target(
                self.type_path(),
                "type has no zero-argument construction",
            )),
        }
    }

    /// Builds an object and populates it from `dictionary`.
    pub fn from_dictionary(&self, dictionary: &Dictionary) -> Result<Box<dyn Mappable>, MappingError> {
        let mut object = self.construct()?;
        engine::populate(object.as_mut(), dictionary)?;
        Ok(object)
    }

    /// Builds one object per dictionary, preserving order.
    pub fn dictionaries_to_array(
        &self,
        dictionaries: &[Dictionary],
    ) -> Result<Vec<Box<dyn Mappable>>, MappingError> {
        dictionaries
            .iter()
            .map(|dictionary| self.from_dictionary(dictionary))
            .collect()
    }
}

impl fmt::Debug for TypeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeHandle")
            .field("type_path", &self.type_path())
            .field("constructible", &self.is_constructible())
            .finish()
    }
}

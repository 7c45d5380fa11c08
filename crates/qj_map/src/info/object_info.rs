use alloc::boxed::Box;
use core::any::{Any, TypeId};

use qj_utils::hash::HashMap;

use crate::MappingError;
use crate::info::FieldInfo;
use crate::naming::NamingPolicy;

/// Descriptor table of a mappable type.
///
/// The order of fields is fixed and follows the input order (declaration
/// order for derived types).
///
/// # Examples
///
/// ```
/// use qj_map::{derive::Mappable, info::Typed};
///
/// #[derive(Mappable, Default)]
/// struct Menu {
///     title: String,
///     price: f64,
/// }
///
/// let info = Menu::object_info();
///
/// assert_eq!(info.type_name(), "Menu");
/// assert_eq!(info.field_len(), 2);
/// assert_eq!(info.index_of("price"), Some(1));
/// ```
#[derive(Debug)]
pub struct ObjectInfo {
    ty_id: TypeId,
    type_path: &'static str,
    fields: Box<[FieldInfo]>,
    indices: HashMap<&'static str, usize>,
    naming: NamingPolicy,
}

impl ObjectInfo {
    /// Creates the table for `T`.
    ///
    /// # Panics
    ///
    /// Panics if two fields claim the same external name. Derived types are
    /// rejected at compile time instead; use [`ObjectInfo::try_new`] for
    /// tables assembled at runtime.
    pub fn new<T: Any>(fields: &[FieldInfo]) -> Self {
        match Self::try_new::<T>(fields) {
            Ok(info) => info,
            Err(err) => panic!("{err}"),
        }
    }

    /// Creates the table for `T`, failing with
    /// [`MappingError::AmbiguousNaming`] on a naming collision.
    pub fn try_new<T: Any>(fields: &[FieldInfo]) -> Result<Self, MappingError> {
        let type_path = core::any::type_name::<T>();
        let naming = NamingPolicy::try_new(type_path, fields)?;
        let indices = fields
            .iter()
            .enumerate()
            .map(|(index, field)| (field.name(), index))
            .collect();

        Ok(Self {
            ty_id: TypeId::of::<T>(),
            type_path,
            fields: fields.into(),
            indices,
            naming,
        })
    }

    /// Overrides the type path used by the [`TypeRegistry`] and in errors.
    ///
    /// [`TypeRegistry`]: crate::registry::TypeRegistry
    #[inline]
    pub fn with_type_path(mut self, type_path: &'static str) -> Self {
        self.type_path = type_path;
        self
    }

    /// Returns the full type path, e.g. `my_app::model::Restaurant`.
    #[inline]
    pub const fn type_path(&self) -> &'static str {
        self.type_path
    }

    /// Returns the last segment of the type path.
    pub fn type_name(&self) -> &'static str {
        let path = self.type_path;
        path.rsplit("::").next().unwrap_or(path)
    }

    #[inline]
    pub const fn ty_id(&self) -> TypeId {
        self.ty_id
    }

    #[inline]
    pub fn type_is<T: Any>(&self) -> bool {
        self.ty_id == TypeId::of::<T>()
    }

    #[inline]
    pub const fn naming(&self) -> &NamingPolicy {
        &self.naming
    }

    /// Returns the [`FieldInfo`] for the given internal `name`, if present.
    pub fn field(&self, name: &str) -> Option<&FieldInfo> {
        self.fields.get(*self.indices.get(name)?)
    }

    /// Returns the [`FieldInfo`] at the given index, if present.
    #[inline]
    pub fn field_at(&self, index: usize) -> Option<&FieldInfo> {
        self.fields.get(index)
    }

    /// Returns the index for the given internal `name`, if present.
    #[inline]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.indices.get(name).copied()
    }

    /// Returns an iterator over the fields in declaration order.
    #[inline]
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &FieldInfo> {
        self.fields.iter()
    }

    /// Returns an iterator over the flattened base fields.
    pub fn flattened(&self) -> impl Iterator<Item = &FieldInfo> {
        self.fields.iter().filter(|field| field.is_flatten())
    }

    #[inline]
    pub fn field_len(&self) -> usize {
        self.fields.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Host;

    #[test]
    fn keeps_declaration_order() {
        let info = ObjectInfo::new::<Host>(&[
            FieldInfo::new::<u32>("b"),
            FieldInfo::new::<String>("a"),
        ]);

        let names: Vec<_> = info.iter().map(FieldInfo::name).collect();
        assert_eq!(names, ["b", "a"]);
        assert_eq!(info.field("a").unwrap().type_name(), "alloc::string::String");
        assert!(info.field("missing").is_none());
        assert_eq!(info.type_name(), "Host");
    }

    #[test]
    fn custom_type_path() {
        let info = ObjectInfo::new::<Host>(&[]).with_type_path("api::Host");
        assert_eq!(info.type_path(), "api::Host");
        assert_eq!(info.type_name(), "Host");
    }

    #[test]
    fn try_new_rejects_collisions() {
        let result = ObjectInfo::try_new::<Host>(&[
            FieldInfo::new::<String>("id"),
            FieldInfo::new::<String>("obj_id").with_external("id"),
        ]);
        assert!(matches!(
            result,
            Err(MappingError::AmbiguousNaming { external: "id", .. })
        ));
    }

    #[test]
    #[should_panic(expected = "external name `id`")]
    fn new_panics_on_collisions() {
        ObjectInfo::new::<Host>(&[
            FieldInfo::new::<String>("a").with_external("id"),
            FieldInfo::new::<String>("b").with_external("id"),
        ]);
    }
}

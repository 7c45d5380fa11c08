use std::sync::OnceLock;

use crate::info::ObjectInfo;

// -----------------------------------------------------------------------------
// Typed

/// A static accessor to the [`ObjectInfo`] of a type.
///
/// Automatically implemented by [`#[derive(Mappable)]`](crate::derive::Mappable).
///
/// # Manually Impl
///
/// Not recommended, but [`ObjectInfoCell`] keeps it short:
///
/// ```
/// use qj_map::{
///     derive::Mappable,
///     info::{FieldInfo, ObjectInfo, ObjectInfoCell, Typed},
/// };
///
/// #[derive(Mappable, Default)]
/// #[mappable(Typed = false)]
/// struct Manual {
///     name: String,
///     hidden: u32,
/// }
///
/// impl Typed for Manual {
///     fn object_info() -> &'static ObjectInfo {
///         static CELL: ObjectInfoCell = ObjectInfoCell::new();
///         CELL.get_or_init(|| {
///             ObjectInfo::new::<Self>(&[
///                 FieldInfo::new::<String>("name").with_external("title"),
///                 FieldInfo::new::<u32>("hidden").with_transient(),
///             ])
///         })
///     }
/// }
///
/// assert_eq!(Manual::object_info().naming().external_name("name"), "title");
/// ```
pub trait Typed: 'static {
    /// Returns the descriptor table of this type.
    fn object_info() -> &'static ObjectInfo;
}

// -----------------------------------------------------------------------------
// ObjectInfoCell

/// Container for the static [`ObjectInfo`] of a non-generic type.
///
/// See [`Typed`] for usage.
pub struct ObjectInfoCell(OnceLock<ObjectInfo>);

impl ObjectInfoCell {
    #[inline]
    pub const fn new() -> Self {
        Self(OnceLock::new())
    }

    /// Returns the stored info, building it with `f` on first access.
    #[inline]
    pub fn get_or_init(&self, f: impl FnOnce() -> ObjectInfo) -> &ObjectInfo {
        self.0.get_or_init(f)
    }
}

impl Default for ObjectInfoCell {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

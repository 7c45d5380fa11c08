//! Static descriptors of mappable types.
//!
//! Every mappable type owns one [`ObjectInfo`], built on first access and kept
//! for the lifetime of the process. It lists the [`FieldInfo`] of each field in
//! declaration order and carries the type's [`NamingPolicy`].
//!
//! [`NamingPolicy`]: crate::naming::NamingPolicy

mod field_info;
mod object_info;
mod typed;

pub use field_info::{FieldInfo, FieldKind};
pub use object_info::ObjectInfo;
pub use typed::{ObjectInfoCell, Typed};

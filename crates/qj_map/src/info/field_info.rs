use core::any::{Any, TypeId};
use core::fmt;

use crate::info::{ObjectInfo, Typed};
use crate::temporal::TemporalKind;
use crate::value::FieldValue;

// -----------------------------------------------------------------------------
// FieldKind

/// The shape of the value a field holds.
///
/// `Option<T>` reports the kind of `T`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// Booleans, numbers, strings, identifiers and raw JSON values.
    Scalar,
    /// A nested mappable object.
    Object,
    /// An ordered sequence of scalars or of objects.
    Sequence,
    /// One of the four temporal value kinds.
    Temporal(TemporalKind),
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar => f.write_str("scalar"),
            Self::Object => f.write_str("object"),
            Self::Sequence => f.write_str("sequence"),
            Self::Temporal(kind) => write!(f, "{kind} value"),
        }
    }
}

// -----------------------------------------------------------------------------
// FieldInfo

/// Descriptor of one named field.
///
/// # Examples
///
/// ```
/// use qj_map::{derive::Mappable, info::{FieldKind, Typed}};
///
/// #[derive(Mappable, Default)]
/// struct Foo {
///     #[mappable(rename = "id")]
///     obj_id: String,
/// }
///
/// let info = Foo::object_info().field("obj_id").unwrap();
///
/// assert!(info.type_is::<String>());
/// assert_eq!(info.external_name(), "id");
/// assert_eq!(info.kind(), FieldKind::Scalar);
/// ```
#[derive(Clone, Debug)]
pub struct FieldInfo {
    name: &'static str,
    external: Option<&'static str>,
    kind: FieldKind,
    ty_id: TypeId,
    type_name: &'static str,
    transient: bool,
    base: Option<fn() -> &'static ObjectInfo>,
}

impl FieldInfo {
    /// Creates a new [`FieldInfo`] for the field `name` of type `T`.
    #[inline]
    pub fn new<T: FieldValue>(name: &'static str) -> Self {
        Self {
            name,
            external: None,
            kind: T::field_kind(),
            ty_id: TypeId::of::<T>(),
            type_name: core::any::type_name::<T>(),
            transient: false,
            base: None,
        }
    }

    /// Creates a flattened base field: the fields of `T` share the parent
    /// dictionary instead of being nested under `name`.
    ///
    /// `T` must itself be a mappable type with a descriptor table; an
    /// optional or scalar base is rejected at compile time.
    ///
    /// ```compile_fail
    /// use qj_map::{derive::Mappable, info::FieldInfo};
    ///
    /// #[derive(Mappable, Default)]
    /// struct Entity {
    ///     id: String,
    /// }
    ///
    /// let _ = FieldInfo::flatten::<Option<Entity>>("entity");
    /// ```
    ///
    /// ```compile_fail
    /// use qj_map::derive::Mappable;
    ///
    /// #[derive(Mappable, Default)]
    /// struct Tagged {
    ///     #[mappable(flatten)]
    ///     tag: String,
    /// }
    /// ```
    #[inline]
    pub fn flatten<T: Typed + FieldValue>(name: &'static str) -> Self {
        let base: fn() -> &'static ObjectInfo = T::object_info;
        Self {
            base: Some(base),
            ..Self::new::<T>(name)
        }
    }

    /// Maps the field to an explicit external name.
    #[inline]
    pub const fn with_external(mut self, external: &'static str) -> Self {
        self.external = Some(external);
        self
    }

    /// Excludes the field from both directions of the mapping.
    #[inline]
    pub const fn with_transient(mut self) -> Self {
        self.transient = true;
        self
    }

    /// Returns the internal (Rust) field name.
    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the external name: the explicit rename, or the field name.
    #[inline]
    pub const fn external_name(&self) -> &'static str {
        match self.external {
            Some(external) => external,
            None => self.name,
        }
    }

    /// Returns `true` if the field carries an explicit rename.
    #[inline]
    pub const fn is_renamed(&self) -> bool {
        self.external.is_some()
    }

    /// Returns `true` if the field was declared transient.
    ///
    /// Baseline transient names are decided by the
    /// [`NamingPolicy`](crate::naming::NamingPolicy), not here.
    #[inline]
    pub const fn is_transient(&self) -> bool {
        self.transient
    }

    #[inline]
    pub const fn is_flatten(&self) -> bool {
        self.base.is_some()
    }

    /// Returns the descriptor table of a flattened base.
    #[inline]
    pub fn base_info(&self) -> Option<&'static ObjectInfo> {
        self.base.map(|object_info| object_info())
    }

    #[inline]
    pub const fn kind(&self) -> FieldKind {
        self.kind
    }

    /// Returns the `TypeId` of the declared field type.
    #[inline]
    pub const fn ty_id(&self) -> TypeId {
        self.ty_id
    }

    /// Returns the declared field type name, as given by [`core::any::type_name`].
    #[inline]
    pub const fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Check if the given type matches the declared field type.
    #[inline]
    pub fn type_is<T: Any>(&self) -> bool {
        self.ty_id == TypeId::of::<T>()
    }
}

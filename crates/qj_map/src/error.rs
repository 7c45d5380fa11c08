use alloc::borrow::Cow;

use thiserror::Error;

use crate::temporal::TemporalError;
use crate::value::FieldInput;

// -----------------------------------------------------------------------------
// MappingError

/// Errors raised while converting between objects and dictionaries.
///
/// Two classes of error exist:
///
/// - *Structural* errors ([`InvalidMappingTarget`], [`AmbiguousNaming`]) abort
///   the whole conversion and reach the caller.
/// - *Field-level* errors ([`MismatchedValue`], [`Temporal`]) are absorbed by
///   the engine: the field keeps its zero value and a warning is logged.
///
/// See [`MappingError::is_field_level`].
///
/// [`InvalidMappingTarget`]: MappingError::InvalidMappingTarget
/// [`AmbiguousNaming`]: MappingError::AmbiguousNaming
/// [`MismatchedValue`]: MappingError::MismatchedValue
/// [`Temporal`]: MappingError::Temporal
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum MappingError {
    #[error("`{type_path}` is not a valid mapping target: {reason}")]
    InvalidMappingTarget {
        type_path: Cow<'static, str>,
        reason: Cow<'static, str>,
    },

    #[error("external name `{external}` is claimed by both `{first}` and `{second}` in `{type_path}`")]
    AmbiguousNaming {
        type_path: &'static str,
        external: &'static str,
        first: &'static str,
        second: &'static str,
    },

    #[error("`{type_path}` expects {expected} but received {found}")]
    MismatchedValue {
        type_path: Cow<'static, str>,
        expected: &'static str,
        found: &'static str,
    },

    #[error(transparent)]
    Temporal(#[from] TemporalError),
}

impl MappingError {
    /// Returns `true` for errors that only affect a single field.
    ///
    /// The engine swallows these and leaves the field unset.
    #[inline]
    pub fn is_field_level(&self) -> bool {
        matches!(self, Self::MismatchedValue { .. } | Self::Temporal(_))
    }

    /// Creates an [`InvalidMappingTarget`](Self::InvalidMappingTarget) error.
    pub fn invalid_target(
        type_path: impl Into<Cow<'static, str>>,
        reason: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self::InvalidMappingTarget {
            type_path: type_path.into(),
            reason: reason.into(),
        }
    }

    /// Creates a [`MismatchedValue`](Self::MismatchedValue) error for a field
    /// of type `T` that only accepts `expected` but was handed `input`.
    pub fn mismatched<T: ?Sized>(expected: &'static str, input: &FieldInput<'_>) -> Self {
        Self::MismatchedValue {
            type_path: Cow::Borrowed(core::any::type_name::<T>()),
            expected,
            found: input.describe(),
        }
    }
}

use alloc::string::String;

use thiserror::Error;

use crate::temporal::TemporalKind;

/// Errors raised by the temporal value types.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum TemporalError {
    /// The text does not match the active format of its kind.
    #[error("`{text}` is not a valid {kind} in the active format")]
    InvalidTemporalFormat { kind: TemporalKind, text: String },

    /// A format description was rejected; the active format is unchanged.
    #[error("`{format}` is not a usable {kind} format: {reason}")]
    InvalidFormatDescription {
        kind: TemporalKind,
        format: String,
        reason: String,
    },
}

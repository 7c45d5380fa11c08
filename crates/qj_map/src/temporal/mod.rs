//! Date, time, date-time and timestamp values with stable textual forms.
//!
//! Each kind has one *process-wide* active format, used by every conversion
//! in every thread:
//!
//! | Type | Built-in format |
//! |---|---|
//! | [`DbDate`] | `[year]-[month]-[day]` |
//! | [`DbTime`] | `[hour]:[minute]:[second]` |
//! | [`DbDateTime`] | `[year]-[month]-[day]T[hour]:[minute]:[second]` |
//! | [`DbTimeStamp`] | seconds since the Unix epoch, e.g. `1412830948` |
//!
//! Formats use the [`time`] format description syntax. Reconfigure once at
//! startup, either per kind (`DbDate::set_format`) or through
//! [`TemporalConfig::apply`]; changing a format while other threads convert
//! is memory safe, but those conversions may observe either format.
//!
//! Times and date-times are UTC.

use core::fmt;

use crate::value::Value;

// -----------------------------------------------------------------------------
// Modules

mod config;
mod date;
mod date_time;
mod error;
mod format;
mod time_of_day;
mod timestamp;

// -----------------------------------------------------------------------------
// Exports

pub use config::{TemporalConfig, reset_formats};
pub use date::DbDate;
pub use date_time::DbDateTime;
pub use error::TemporalError;
pub use time_of_day::DbTime;
pub use timestamp::{DbTimeStamp, TimestampUnit};

// -----------------------------------------------------------------------------
// TemporalKind

/// The four temporal value kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TemporalKind {
    Date,
    Time,
    DateTime,
    TimeStamp,
}

impl fmt::Display for TemporalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Date => "date",
            Self::Time => "time",
            Self::DateTime => "date-time",
            Self::TimeStamp => "timestamp",
        })
    }
}

// -----------------------------------------------------------------------------
// Temporal

/// Object-safe access to a temporal value, used by the serializer.
pub trait Temporal {
    fn kind(&self) -> TemporalKind;

    /// Renders the value with the active format of its kind.
    fn to_db_string(&self) -> String;

    /// Renders a human-readable form, e.g. `Mar 15, 2024`.
    fn display_string(&self) -> String;

    /// Returns the dictionary form of the value.
    fn to_value(&self) -> Value {
        Value::String(self.to_db_string())
    }
}

macro_rules! impl_temporal_common {
    ($ty:ty) => {
        impl $crate::temporal::Temporal for $ty {
            #[inline]
            fn kind(&self) -> $crate::temporal::TemporalKind {
                <$ty>::KIND
            }

            #[inline]
            fn to_db_string(&self) -> String {
                <$ty>::to_db_string(self)
            }

            #[inline]
            fn display_string(&self) -> String {
                <$ty>::display_string(self)
            }
        }

        impl ::core::fmt::Display for $ty {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.to_db_string())
            }
        }

        impl ::core::str::FromStr for $ty {
            type Err = $crate::temporal::TemporalError;

            #[inline]
            fn from_str(text: &str) -> Result<Self, Self::Err> {
                Self::from_db_string(text)
            }
        }
    };
}

/// Text-based temporal fields: strings parse, `null` resets.
macro_rules! impl_temporal_field_value {
    ($ty:ty) => {
        impl $crate::value::FieldValue for $ty {
            fn field_kind() -> $crate::info::FieldKind {
                $crate::info::FieldKind::Temporal(<$ty>::KIND)
            }

            fn field_ref(&self) -> $crate::value::FieldRef<'_> {
                $crate::value::FieldRef::Temporal(self)
            }

            fn assign(
                &mut self,
                input: $crate::value::FieldInput<'_>,
            ) -> Result<(), $crate::MappingError> {
                match input {
                    $crate::value::FieldInput::Raw($crate::value::Value::String(text)) => {
                        *self = Self::from_db_string(text)?;
                    }
                    $crate::value::FieldInput::Raw($crate::value::Value::Null) => {
                        *self = Self::default();
                    }
                    other => {
                        return Err($crate::MappingError::mismatched::<Self>("a string", &other));
                    }
                }
                Ok(())
            }
        }
    };
}

use impl_temporal_common;
use impl_temporal_field_value;

/// Formats and timestamp units are process-wide; tests that touch them, or
/// that depend on the built-in formats, hold this lock.
#[cfg(test)]
pub(crate) fn test_lock() -> std::sync::MutexGuard<'static, ()> {
    use std::sync::{Mutex, PoisonError};

    static LOCK: Mutex<()> = Mutex::new(());
    LOCK.lock().unwrap_or_else(PoisonError::into_inner)
}

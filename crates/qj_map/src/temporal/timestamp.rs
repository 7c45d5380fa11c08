use alloc::borrow::ToOwned;
use alloc::string::{String, ToString};
use core::sync::atomic::{AtomicU8, Ordering};

use time::OffsetDateTime;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;

use crate::MappingError;
use crate::info::FieldKind;
use crate::temporal::{TemporalError, TemporalKind, impl_temporal_common};
use crate::value::{FieldInput, FieldRef, FieldValue, Value};

const DISPLAY: &[BorrowedFormatItem<'_>] = format_description!(
    "[month repr:short] [day padding:none], [year] [hour repr:12 padding:none]:[minute] [period]"
);

// -----------------------------------------------------------------------------
// TimestampUnit

/// Resolution of the textual and numeric form of [`DbTimeStamp`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TimestampUnit {
    #[default]
    Seconds = 0,
    Milliseconds = 1,
}

impl TimestampUnit {
    #[inline]
    const fn from_repr(repr: u8) -> Self {
        match repr {
            1 => Self::Milliseconds,
            _ => Self::Seconds,
        }
    }

    #[inline]
    const fn nanos(self) -> i128 {
        match self {
            Self::Seconds => 1_000_000_000,
            Self::Milliseconds => 1_000_000,
        }
    }
}

static UNIT: AtomicU8 = AtomicU8::new(TimestampUnit::Seconds as u8);

// -----------------------------------------------------------------------------
// DbTimeStamp

/// An instant, written as the text of an integer count of seconds (or
/// milliseconds) since the Unix epoch.
///
/// Reading accepts numeric strings, JSON numbers and fractional values.
///
/// # Examples
///
/// ```
/// use qj_map::temporal::DbTimeStamp;
///
/// let stamp = DbTimeStamp::from_db_string("1412830948").unwrap();
///
/// assert_eq!(stamp.unix_timestamp(), 1_412_830_948);
/// assert_eq!(stamp.to_db_string(), "1412830948");
/// assert_eq!(stamp.display_string(), "Oct 9, 2014 5:02 AM");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DbTimeStamp(OffsetDateTime);

impl DbTimeStamp {
    pub const KIND: TemporalKind = TemporalKind::TimeStamp;

    #[inline]
    pub const fn new(instant: OffsetDateTime) -> Self {
        Self(instant)
    }

    pub fn now() -> Self {
        Self(OffsetDateTime::now_utc())
    }

    #[inline]
    pub const fn instant(self) -> OffsetDateTime {
        self.0
    }

    /// Whole seconds since the Unix epoch, whatever the active unit.
    #[inline]
    pub const fn unix_timestamp(self) -> i64 {
        self.0.unix_timestamp()
    }

    /// Creates a timestamp from a count of the active unit.
    pub fn from_units(count: i64) -> Result<Self, TemporalError> {
        Self::from_nanos(i128::from(count) * Self::unit().nanos(), &count.to_string())
    }

    /// Returns the count of the active unit since the Unix epoch.
    pub fn to_units(self) -> i64 {
        let count = self.0.unix_timestamp_nanos().div_euclid(Self::unit().nanos());
        i64::try_from(count).unwrap_or(if count < 0 { i64::MIN } else { i64::MAX })
    }

    #[allow(clippy::cast_possible_truncation, reason = "sub-nanosecond precision is dropped")]
    fn from_fraction(count: f64, text: &str) -> Result<Self, TemporalError> {
        if !count.is_finite() {
            return Err(Self::invalid_text(text));
        }
        let unit = Self::unit().nanos();
        // Whole units and the fraction are scaled apart; scaling the sum in
        // f64 loses the fraction at epoch-sized counts.
        #[allow(clippy::cast_precision_loss, reason = "unit sizes are exact in f64")]
        let fraction = (count.fract() * unit as f64).round() as i128;
        Self::from_nanos((count.trunc() as i128).saturating_mul(unit) + fraction, text)
    }

    fn from_nanos(nanos: i128, text: &str) -> Result<Self, TemporalError> {
        OffsetDateTime::from_unix_timestamp_nanos(nanos)
            .map(Self)
            .map_err(|_| Self::invalid_text(text))
    }

    fn invalid_text(text: &str) -> TemporalError {
        TemporalError::InvalidTemporalFormat {
            kind: TemporalKind::TimeStamp,
            text: text.to_owned(),
        }
    }

    /// Parses an integer or fractional count of the active unit.
    pub fn from_db_string(text: &str) -> Result<Self, TemporalError> {
        let trimmed = text.trim();
        if let Ok(count) = trimmed.parse::<i64>() {
            return Self::from_units(count).map_err(|_| Self::invalid_text(text));
        }
        match trimmed.parse::<f64>() {
            Ok(count) => Self::from_fraction(count, text),
            Err(_) => Err(Self::invalid_text(text)),
        }
    }

    /// Renders the integer count of the active unit.
    pub fn to_db_string(&self) -> String {
        self.to_units().to_string()
    }

    /// Renders e.g. `Oct 9, 2014 5:02 AM` (UTC).
    pub fn display_string(&self) -> String {
        self.0.format(DISPLAY).unwrap_or_else(|_| self.to_db_string())
    }

    /// Replaces the process-wide timestamp unit.
    pub fn set_unit(unit: TimestampUnit) {
        log::debug!("timestamp unit set to {unit:?}");
        UNIT.store(unit as u8, Ordering::Relaxed);
    }

    /// Returns the active timestamp unit.
    pub fn unit() -> TimestampUnit {
        TimestampUnit::from_repr(UNIT.load(Ordering::Relaxed))
    }
}

impl Default for DbTimeStamp {
    #[inline]
    fn default() -> Self {
        Self(OffsetDateTime::UNIX_EPOCH)
    }
}

impl From<OffsetDateTime> for DbTimeStamp {
    #[inline]
    fn from(instant: OffsetDateTime) -> Self {
        Self(instant)
    }
}

impl_temporal_common!(DbTimeStamp);

impl FieldValue for DbTimeStamp {
    fn field_kind() -> FieldKind {
        FieldKind::Temporal(Self::KIND)
    }

    fn field_ref(&self) -> FieldRef<'_> {
        FieldRef::Temporal(self)
    }

    fn assign(&mut self, input: FieldInput<'_>) -> Result<(), MappingError> {
        *self = match input {
            FieldInput::Raw(Value::Number(number)) => match number.as_i64() {
                Some(count) => Self::from_units(count)?,
                None => Self::from_fraction(number.as_f64().unwrap_or(f64::NAN), &number.to_string())?,
            },
            FieldInput::Raw(Value::String(text)) => Self::from_db_string(text)?,
            FieldInput::Raw(Value::Null) => Self::default(),
            other => return Err(MappingError::mismatched::<Self>("a number or a string", &other)),
        };
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use time::macros::datetime;

    use super::*;
    use crate::temporal::{Temporal, test_lock};

    #[test]
    fn seconds() {
        let _guard = test_lock();
        let stamp = DbTimeStamp::from_db_string("1412830948").unwrap();
        assert_eq!(stamp.instant(), datetime!(2014-10-09 05:02:28 UTC));
        assert_eq!(stamp.to_db_string(), "1412830948");
        assert_eq!(stamp.to_value(), json!("1412830948"));
    }

    #[test]
    fn milliseconds() {
        let _guard = test_lock();
        DbTimeStamp::set_unit(TimestampUnit::Milliseconds);
        let stamp = DbTimeStamp::from_db_string("1412830948500");
        let unit = DbTimeStamp::unit();
        crate::temporal::reset_formats();

        let stamp = stamp.unwrap();
        assert_eq!(unit, TimestampUnit::Milliseconds);
        assert_eq!(stamp.unix_timestamp(), 1_412_830_948);
        assert_eq!(stamp.instant().millisecond(), 500);
        assert_eq!(DbTimeStamp::unit(), TimestampUnit::Seconds);
    }

    #[test]
    fn fractional_and_numeric_inputs() {
        let _guard = test_lock();
        let stamp = DbTimeStamp::from_db_string("1412830948.25").unwrap();
        assert_eq!(stamp.instant().millisecond(), 250);
        assert_eq!(stamp.to_db_string(), "1412830948");

        let mut field = DbTimeStamp::default();
        field.assign(FieldInput::Raw(&json!(60))).unwrap();
        assert_eq!(field.unix_timestamp(), 60);
        field.assign(FieldInput::Raw(&json!(1.5))).unwrap();
        assert_eq!(field.instant().millisecond(), 500);
        assert!(field.assign(FieldInput::Raw(&json!(true))).is_err());
    }

    #[test]
    fn fractions_keep_their_precision() {
        let _guard = test_lock();
        let stamp = DbTimeStamp::from_db_string("1700000000.001").unwrap();
        assert_eq!(stamp.unix_timestamp(), 1_700_000_000);
        assert_eq!(stamp.instant().millisecond(), 1);

        let mut field = DbTimeStamp::default();
        field.assign(FieldInput::Raw(&json!(1_412_830_948.75))).unwrap();
        assert_eq!(field.instant().millisecond(), 750);
    }

    #[test]
    fn negative_counts_round_down() {
        let _guard = test_lock();
        let stamp = DbTimeStamp::from_db_string("-1.5").unwrap();
        assert_eq!(stamp.to_units(), -2);
    }

    #[test]
    fn rejects_text() {
        let _guard = test_lock();
        assert!(DbTimeStamp::from_db_string("yesterday").is_err());
        assert!(DbTimeStamp::from_db_string("NaN").is_err());
        assert!(DbTimeStamp::from_db_string(&i64::MAX.to_string()).is_err());
    }
}

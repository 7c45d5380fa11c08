use alloc::string::{String, ToString};

use time::format_description::{BorrowedFormatItem, OwnedFormatItem};
use time::macros::{datetime, format_description};
use time::{OffsetDateTime, PrimitiveDateTime, UtcOffset};

use crate::temporal::format::FormatState;
use crate::temporal::{DbDate, DbTime, TemporalError, TemporalKind};
use crate::temporal::{impl_temporal_common, impl_temporal_field_value};

static FORMAT: FormatState = FormatState::new(
    TemporalKind::DateTime,
    "[year]-[month]-[day]T[hour]:[minute]:[second]",
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]"),
    probe,
);

const DISPLAY: &[BorrowedFormatItem<'_>] = format_description!(
    "[month repr:short] [day padding:none], [year] [hour repr:12 padding:none]:[minute] [period]"
);

fn probe(items: &OwnedFormatItem) -> Result<(), String> {
    let text = datetime!(2015-03-14 10:15:30).format(items).map_err(|err| err.to_string())?;
    PrimitiveDateTime::parse(&text, items).map_err(|err| err.to_string())?;
    Ok(())
}

/// A UTC date and time of day.
///
/// # Examples
///
/// ```
/// use qj_map::temporal::{DbDate, DbDateTime, DbTime};
///
/// let date = DbDate::from_db_string("2015-01-01").unwrap();
/// let time = DbTime::from_db_string("10:15:30").unwrap();
/// let date_time = DbDateTime::from_parts(date, time);
///
/// assert_eq!(date_time.to_db_string(), "2015-01-01T10:15:30");
/// assert_eq!(date_time.date(), date);
/// assert_eq!(date_time.display_string(), "Jan 1, 2015 10:15 AM");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DbDateTime(OffsetDateTime);

impl DbDateTime {
    pub const KIND: TemporalKind = TemporalKind::DateTime;

    /// Wraps `date_time`, converted to UTC.
    #[inline]
    pub fn new(date_time: OffsetDateTime) -> Self {
        Self(date_time.to_offset(UtcOffset::UTC))
    }

    /// Combines a date and a time of day.
    #[inline]
    pub fn from_parts(date: DbDate, time: DbTime) -> Self {
        Self(PrimitiveDateTime::new(date.date(), time.time()).assume_utc())
    }

    pub fn now() -> Self {
        Self(OffsetDateTime::now_utc())
    }

    #[inline]
    pub const fn date_time(self) -> OffsetDateTime {
        self.0
    }

    #[inline]
    pub fn date(self) -> DbDate {
        DbDate::new(self.0.date())
    }

    #[inline]
    pub fn time(self) -> DbTime {
        DbTime::new(self.0.time())
    }

    #[inline]
    fn primitive(&self) -> PrimitiveDateTime {
        PrimitiveDateTime::new(self.0.date(), self.0.time())
    }

    /// Parses `text` with the active date-time format.
    pub fn from_db_string(text: &str) -> Result<Self, TemporalError> {
        FORMAT
            .with(|items| PrimitiveDateTime::parse(text.trim(), items))
            .map(|date_time| Self(date_time.assume_utc()))
            .map_err(|_| FORMAT.invalid_text(text))
    }

    /// Renders the value with the active date-time format.
    pub fn to_db_string(&self) -> String {
        FORMAT.with(|items| self.primitive().format(items)).unwrap_or_else(|err| {
            log::error!("active date-time format failed to render {}: {err}", self.0);
            let (date, time) = (self.date(), self.time());
            alloc::format!("{}T{}", date.date(), time.to_db_string())
        })
    }

    /// Renders e.g. `Jan 1, 2015 10:15 AM`.
    pub fn display_string(&self) -> String {
        self.primitive().format(DISPLAY).unwrap_or_else(|_| self.to_db_string())
    }

    /// Replaces the process-wide date-time format.
    ///
    /// See [`DbDate::set_format`].
    pub fn set_format(description: &str) -> Result<(), TemporalError> {
        FORMAT.set(description)
    }

    /// Returns the active date-time format description.
    pub fn format() -> String {
        FORMAT.description()
    }

    pub(super) fn state() -> &'static FormatState {
        &FORMAT
    }
}

impl Default for DbDateTime {
    #[inline]
    fn default() -> Self {
        Self(OffsetDateTime::UNIX_EPOCH)
    }
}

impl From<OffsetDateTime> for DbDateTime {
    #[inline]
    fn from(date_time: OffsetDateTime) -> Self {
        Self::new(date_time)
    }
}

impl_temporal_common!(DbDateTime);
impl_temporal_field_value!(DbDateTime);

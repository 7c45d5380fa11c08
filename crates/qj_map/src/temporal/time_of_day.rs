use alloc::format;
use alloc::string::{String, ToString};

use time::format_description::{BorrowedFormatItem, OwnedFormatItem};
use time::macros::{format_description, time};
use time::{OffsetDateTime, Time};

use crate::temporal::format::FormatState;
use crate::temporal::{TemporalError, TemporalKind};
use crate::temporal::{impl_temporal_common, impl_temporal_field_value};

static FORMAT: FormatState = FormatState::new(
    TemporalKind::Time,
    "[hour]:[minute]:[second]",
    format_description!("[hour]:[minute]:[second]"),
    probe,
);

const DISPLAY: &[BorrowedFormatItem<'_>] =
    format_description!("[hour repr:12 padding:none]:[minute] [period]");

fn probe(items: &OwnedFormatItem) -> Result<(), String> {
    let text = time!(10:15:30).format(items).map_err(|err| err.to_string())?;
    Time::parse(&text, items).map_err(|err| err.to_string())?;
    Ok(())
}

/// A UTC time of day without a date.
///
/// # Examples
///
/// ```
/// use qj_map::temporal::DbTime;
///
/// let time = DbTime::from_db_string("18:05:00").unwrap();
///
/// assert_eq!(time.to_db_string(), "18:05:00");
/// assert_eq!(time.display_string(), "6:05 PM");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DbTime(Time);

impl DbTime {
    pub const KIND: TemporalKind = TemporalKind::Time;

    #[inline]
    pub const fn new(time: Time) -> Self {
        Self(time)
    }

    /// The current UTC time of day.
    pub fn now() -> Self {
        Self(OffsetDateTime::now_utc().time())
    }

    #[inline]
    pub const fn time(self) -> Time {
        self.0
    }

    /// Parses `text` with the active time format.
    pub fn from_db_string(text: &str) -> Result<Self, TemporalError> {
        FORMAT
            .with(|items| Time::parse(text.trim(), items))
            .map(Self)
            .map_err(|_| FORMAT.invalid_text(text))
    }

    /// Renders the time with the active time format.
    pub fn to_db_string(&self) -> String {
        FORMAT.with(|items| self.0.format(items)).unwrap_or_else(|err| {
            log::error!("active time format failed to render {}: {err}", self.0);
            let (hour, minute, second) = self.0.as_hms();
            format!("{hour:02}:{minute:02}:{second:02}")
        })
    }

    /// Renders e.g. `6:05 PM`.
    pub fn display_string(&self) -> String {
        self.0.format(DISPLAY).unwrap_or_else(|_| self.to_db_string())
    }

    /// Replaces the process-wide time format.
    ///
    /// See [`DbDate::set_format`](crate::temporal::DbDate::set_format).
    pub fn set_format(description: &str) -> Result<(), TemporalError> {
        FORMAT.set(description)
    }

    /// Returns the active time format description.
    pub fn format() -> String {
        FORMAT.description()
    }

    pub(super) fn state() -> &'static FormatState {
        &FORMAT
    }
}

impl Default for DbTime {
    #[inline]
    fn default() -> Self {
        Self(Time::MIDNIGHT)
    }
}

impl From<Time> for DbTime {
    #[inline]
    fn from(time: Time) -> Self {
        Self(time)
    }
}

impl_temporal_common!(DbTime);
impl_temporal_field_value!(DbTime);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::temporal::test_lock;

    #[test]
    fn round_trip() {
        let _guard = test_lock();
        let time = DbTime::from_db_string("10:15:30").unwrap();
        assert_eq!(time.time(), time!(10:15:30));
        assert_eq!(time.to_db_string(), "10:15:30");
    }

    #[test]
    fn lossy_format_is_accepted() {
        let _guard = test_lock();
        DbTime::set_format("[hour]:[minute]").unwrap();
        let rendered = DbTime::new(time!(10:15:30)).to_db_string();
        let parsed = DbTime::from_db_string("07:45");
        crate::temporal::reset_formats();

        assert_eq!(rendered, "10:15");
        assert_eq!(parsed.unwrap().time(), time!(7:45));
    }

    #[test]
    fn rejects_dates() {
        let _guard = test_lock();
        assert!(DbTime::from_db_string("2024-03-15").is_err());
    }
}

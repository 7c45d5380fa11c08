use alloc::string::{String, ToString};

use time::format_description::{BorrowedFormatItem, OwnedFormatItem};
use time::macros::{date, format_description};
use time::{Date, OffsetDateTime};

use crate::temporal::format::FormatState;
use crate::temporal::{TemporalError, TemporalKind};
use crate::temporal::{impl_temporal_common, impl_temporal_field_value};

static FORMAT: FormatState = FormatState::new(
    TemporalKind::Date,
    "[year]-[month]-[day]",
    format_description!("[year]-[month]-[day]"),
    probe,
);

const DISPLAY: &[BorrowedFormatItem<'_>] =
    format_description!("[month repr:short] [day padding:none], [year]");

fn probe(items: &OwnedFormatItem) -> Result<(), String> {
    let text = date!(2015-03-14).format(items).map_err(|err| err.to_string())?;
    Date::parse(&text, items).map_err(|err| err.to_string())?;
    Ok(())
}

/// A calendar date without a time of day.
///
/// # Examples
///
/// ```
/// use qj_map::temporal::DbDate;
///
/// let date = DbDate::from_db_string("2024-03-15").unwrap();
///
/// assert_eq!(date.to_db_string(), "2024-03-15");
/// assert_eq!(date.display_string(), "Mar 15, 2024");
/// assert!(DbDate::from_db_string("15/03/2024").is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DbDate(Date);

impl DbDate {
    pub const KIND: TemporalKind = TemporalKind::Date;

    #[inline]
    pub const fn new(date: Date) -> Self {
        Self(date)
    }

    /// Today's date in UTC.
    pub fn today() -> Self {
        Self(OffsetDateTime::now_utc().date())
    }

    #[inline]
    pub const fn date(self) -> Date {
        self.0
    }

    /// Parses `text` with the active date format.
    pub fn from_db_string(text: &str) -> Result<Self, TemporalError> {
        FORMAT
            .with(|items| Date::parse(text.trim(), items))
            .map(Self)
            .map_err(|_| FORMAT.invalid_text(text))
    }

    /// Renders the date with the active date format.
    pub fn to_db_string(&self) -> String {
        FORMAT.with(|items| self.0.format(items)).unwrap_or_else(|err| {
            log::error!("active date format failed to render {}: {err}", self.0);
            self.0.to_string()
        })
    }

    /// Renders e.g. `Mar 15, 2024`.
    pub fn display_string(&self) -> String {
        self.0.format(DISPLAY).unwrap_or_else(|_| self.to_db_string())
    }

    /// Replaces the process-wide date format.
    ///
    /// The description must be able to both render and read back a date;
    /// otherwise [`TemporalError::InvalidFormatDescription`] is returned and
    /// the active format is kept.
    ///
    /// ```
    /// use qj_map::temporal::DbDate;
    ///
    /// assert!(DbDate::set_format("[month]").is_err());
    /// assert_eq!(DbDate::format(), "[year]-[month]-[day]");
    /// ```
    pub fn set_format(description: &str) -> Result<(), TemporalError> {
        FORMAT.set(description)
    }

    /// Returns the active date format description.
    pub fn format() -> String {
        FORMAT.description()
    }

    pub(super) fn state() -> &'static FormatState {
        &FORMAT
    }
}

impl Default for DbDate {
    #[inline]
    fn default() -> Self {
        Self(date!(1970-01-01))
    }
}

impl From<Date> for DbDate {
    #[inline]
    fn from(date: Date) -> Self {
        Self(date)
    }
}

impl From<DbDate> for Date {
    #[inline]
    fn from(date: DbDate) -> Self {
        date.0
    }
}

impl_temporal_common!(DbDate);
impl_temporal_field_value!(DbDate);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::temporal::test_lock;

    #[test]
    fn parses_builtin_format() {
        let _guard = test_lock();
        let date = DbDate::from_db_string(" 2024-03-15 ").unwrap();
        assert_eq!(date.date(), date!(2024-03-15));
        assert_eq!(date.to_string(), "2024-03-15");
        assert_eq!("2024-03-15".parse::<DbDate>().unwrap(), date);
    }

    #[test]
    fn rejects_malformed_text() {
        let _guard = test_lock();
        let err = DbDate::from_db_string("2024-13-01").unwrap_err();
        assert_eq!(
            err,
            TemporalError::InvalidTemporalFormat {
                kind: TemporalKind::Date,
                text: "2024-13-01".into(),
            }
        );
    }

    #[test]
    fn format_change_is_process_wide() {
        let _guard = test_lock();
        DbDate::set_format("[day]/[month]/[year]").unwrap();

        let date = DbDate::new(date!(2024-03-15));
        let rendered = std::thread::spawn(move || date.to_db_string()).join().unwrap();
        let parsed = DbDate::from_db_string("15/03/2024");

        crate::temporal::reset_formats();
        assert_eq!(rendered, "15/03/2024");
        assert_eq!(parsed.unwrap(), date);
        assert_eq!(date.to_db_string(), "2024-03-15");
    }

    #[test]
    fn unusable_formats_are_rejected() {
        let _guard = test_lock();
        assert!(matches!(
            DbDate::set_format("[year"),
            Err(TemporalError::InvalidFormatDescription { kind: TemporalKind::Date, .. })
        ));
        assert!(DbDate::set_format("[year]-[month]").is_err());
        assert_eq!(DbDate::format(), "[year]-[month]-[day]");
    }

    #[test]
    fn display_string() {
        let date = DbDate::new(date!(2024-03-05));
        assert_eq!(date.display_string(), "Mar 5, 2024");
    }
}

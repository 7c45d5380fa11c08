use alloc::string::String;

use crate::temporal::{DbDate, DbDateTime, DbTime, DbTimeStamp, TemporalError, TimestampUnit};

/// Snapshot of the process-wide temporal configuration.
///
/// # Examples
///
/// ```
/// use qj_map::temporal::{DbDate, TemporalConfig, TimestampUnit};
///
/// let config = TemporalConfig {
///     date: "[day].[month].[year]".into(),
///     timestamp_unit: TimestampUnit::Milliseconds,
///     ..TemporalConfig::default()
/// };
/// config.apply().unwrap();
///
/// assert_eq!(DbDate::from_db_string("15.03.2024").unwrap().to_db_string(), "15.03.2024");
/// assert_eq!(TemporalConfig::current(), config);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TemporalConfig {
    pub date: String,
    pub time: String,
    pub date_time: String,
    pub timestamp_unit: TimestampUnit,
}

impl TemporalConfig {
    /// Returns the active configuration.
    pub fn current() -> Self {
        Self {
            date: DbDate::format(),
            time: DbTime::format(),
            date_time: DbDateTime::format(),
            timestamp_unit: DbTimeStamp::unit(),
        }
    }

    /// Installs this configuration.
    ///
    /// Every description is validated first; if any is rejected, nothing is
    /// changed.
    pub fn apply(&self) -> Result<(), TemporalError> {
        let date = DbDate::state().compile(&self.date)?;
        let time = DbTime::state().compile(&self.time)?;
        let date_time = DbDateTime::state().compile(&self.date_time)?;

        DbDate::state().install(date);
        DbTime::state().install(time);
        DbDateTime::state().install(date_time);
        DbTimeStamp::set_unit(self.timestamp_unit);
        Ok(())
    }
}

impl Default for TemporalConfig {
    /// The built-in formats.
    fn default() -> Self {
        Self {
            date: DbDate::state().builtin().into(),
            time: DbTime::state().builtin().into(),
            date_time: DbDateTime::state().builtin().into(),
            timestamp_unit: TimestampUnit::Seconds,
        }
    }
}

/// Restores the built-in formats and the seconds timestamp unit.
pub fn reset_formats() {
    DbDate::state().reset();
    DbTime::state().reset();
    DbDateTime::state().reset();
    DbTimeStamp::set_unit(TimestampUnit::Seconds);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::temporal::{TemporalKind, test_lock};

    #[test]
    fn default_matches_builtin() {
        let _guard = test_lock();
        assert_eq!(TemporalConfig::current(), TemporalConfig::default());
        assert_eq!(TemporalConfig::default().date, "[year]-[month]-[day]");
    }

    #[test]
    fn apply_is_all_or_nothing() {
        let _guard = test_lock();
        let config = TemporalConfig {
            date: "[day]/[month]/[year]".into(),
            time: "[hour".into(),
            ..TemporalConfig::default()
        };

        let err = config.apply().unwrap_err();
        assert!(matches!(
            err,
            TemporalError::InvalidFormatDescription { kind: TemporalKind::Time, .. }
        ));
        assert_eq!(TemporalConfig::current(), TemporalConfig::default());
    }

    #[test]
    fn apply_and_reset() {
        let _guard = test_lock();
        let config = TemporalConfig {
            time: "[hour][minute]".into(),
            timestamp_unit: TimestampUnit::Milliseconds,
            ..TemporalConfig::default()
        };
        config.apply().unwrap();
        let current = TemporalConfig::current();
        let parsed = DbTime::from_db_string("0930").map(|time| time.to_db_string());
        reset_formats();

        assert_eq!(current, config);
        assert_eq!(parsed.unwrap(), "0930");
        assert_eq!(TemporalConfig::current(), TemporalConfig::default());
    }
}

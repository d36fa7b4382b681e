//! Resolves canonical timezone names to UTC offsets and local dates.
//!
//! The text interpreter takes an explicit reference date, so every handler
//! that needs "today" derives it from the configured timezone here instead of
//! reading the wall clock ad hoc.

use time::{Date, OffsetDateTime, UtcOffset};
use time_tz::{Offset, TimeZone};

use crate::Error;

/// Get the UTC offset for a canonical timezone name, e.g. "Pacific/Auckland".
///
/// Returns `None` if the name is not a known timezone.
pub fn get_local_offset(canonical_timezone: &str) -> Option<UtcOffset> {
    time_tz::timezones::get_by_name(canonical_timezone)
        .map(|tz| tz.get_offset_utc(&OffsetDateTime::now_utc()).to_utc())
}

/// The current date in the given timezone.
///
/// # Errors
/// Returns [Error::InvalidTimezoneError] if `canonical_timezone` is not a
/// known timezone name.
pub fn local_today(canonical_timezone: &str) -> Result<Date, Error> {
    let Some(local_offset) = get_local_offset(canonical_timezone) else {
        tracing::error!("Invalid timezone {}", canonical_timezone);
        return Err(Error::InvalidTimezoneError(canonical_timezone.to_owned()));
    };

    Ok(OffsetDateTime::now_utc().to_offset(local_offset).date())
}

#[cfg(test)]
mod timezone_tests {
    use crate::{Error, timezone::local_today};

    use super::get_local_offset;

    #[test]
    fn known_timezone_resolves() {
        assert!(get_local_offset("Etc/UTC").is_some());
        assert!(get_local_offset("Pacific/Auckland").is_some());
    }

    #[test]
    fn unknown_timezone_returns_none() {
        assert!(get_local_offset("Narnia/Lantern_Waste").is_none());
    }

    #[test]
    fn local_today_fails_for_unknown_timezone() {
        let result = local_today("Narnia/Lantern_Waste");

        assert_eq!(
            result,
            Err(Error::InvalidTimezoneError(
                "Narnia/Lantern_Waste".to_owned()
            ))
        );
    }
}

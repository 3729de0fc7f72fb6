//! Resolves the configured timezone and converts local times to instants.

use time::{Date, OffsetDateTime, PrimitiveDateTime, UtcOffset};
use time_tz::{Offset, TimeZone, Tz};

/// Get the timezone for a canonical timezone name, e.g. "Pacific/Auckland".
///
/// Returns `None` if the name is not a known timezone.
pub fn get_timezone(canonical_timezone: &str) -> Option<&'static Tz> {
    time_tz::timezones::get_by_name(canonical_timezone)
}

/// Get today's date in `timezone`.
pub fn local_today(timezone: &Tz) -> Date {
    let now = OffsetDateTime::now_utc();

    now.to_offset(timezone.get_offset_utc(&now).to_utc()).date()
}

/// Something that can place a local wall clock time on the timeline.
pub trait LocalZone {
    /// The instant at which clocks in this zone read `local`.
    fn resolve(&self, local: PrimitiveDateTime) -> OffsetDateTime;
}

impl LocalZone for UtcOffset {
    fn resolve(&self, local: PrimitiveDateTime) -> OffsetDateTime {
        local.assume_offset(*self)
    }
}

impl LocalZone for Tz {
    /// Uses the offset in effect on the date of `local`, so windows that
    /// cross a daylight saving change get the right boundaries on both ends.
    fn resolve(&self, local: PrimitiveDateTime) -> OffsetDateTime {
        // Reading `local` as UTC lands within a day of the real instant, close
        // enough that a second lookup settles on the right offset.
        let guess = local.assume_offset(self.get_offset_utc(&local.assume_utc()).to_utc());

        local.assume_offset(self.get_offset_utc(&guess).to_utc())
    }
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::{LocalZone, get_timezone};

    #[test]
    fn resolves_canonical_names() {
        assert!(get_timezone("Etc/UTC").is_some());
        assert!(get_timezone("Pacific/Auckland").is_some());
    }

    #[test]
    fn unknown_names_have_no_timezone() {
        assert!(get_timezone("Middle/Earth").is_none());
    }

    #[test]
    fn uses_offset_in_effect_on_the_local_date() {
        let auckland = get_timezone("Pacific/Auckland").unwrap();

        // NZST (+12) in winter and NZDT (+13) in summer.
        assert_eq!(
            auckland.resolve(datetime!(2025-07-01 00:00:00)),
            datetime!(2025-06-30 12:00:00 UTC)
        );
        assert_eq!(
            auckland.resolve(datetime!(2025-12-01 00:00:00)),
            datetime!(2025-11-30 11:00:00 UTC)
        );
    }
}

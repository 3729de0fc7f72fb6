//! Named and custom date windows for listing a user's transactions.

use serde::Deserialize;
use time::{
    Date, Duration, OffsetDateTime, Time, format_description::BorrowedFormatItem,
    macros::{format_description, time},
};

use crate::{Error, timezone::LocalZone};

const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// The last representable millisecond of a day.
const END_OF_DAY: Time = time!(23:59:59.999);

/// The query string of a date range request, before validation.
#[derive(Debug, Default, Deserialize)]
pub struct RangeQuery {
    /// One of `today`, `last7`, `last30` or `custom`.
    pub filter: Option<String>,
    /// The first day of a `custom` window, formatted as `YYYY-MM-DD`.
    pub start: Option<String>,
    /// The last day of a `custom` window, formatted as `YYYY-MM-DD`.
    pub end: Option<String>,
}

/// A validated date range filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeFilter {
    /// The current local day.
    Today,
    /// The trailing seven days, including today.
    Last7,
    /// The trailing thirty days, including today.
    Last30,
    /// The days from `start` to `end`, inclusive.
    Custom {
        /// The first day of the window.
        start: Date,
        /// The last day of the window.
        end: Date,
    },
}

impl RangeFilter {
    /// Validate the raw query parameters of a date range request.
    ///
    /// # Errors
    /// Returns [Error::Validation] if the filter is missing or unknown, or if a
    /// `custom` filter does not have two valid dates with `start <= end`.
    pub fn parse(query: &RangeQuery) -> Result<Self, Error> {
        let filter = query
            .filter
            .as_deref()
            .map(str::trim)
            .ok_or_else(|| Error::Validation("Missing filter".to_owned()))?;

        match filter {
            "today" => Ok(Self::Today),
            "last7" => Ok(Self::Last7),
            "last30" => Ok(Self::Last30),
            "custom" => {
                let start = parse_date("start", query.start.as_deref())?;
                let end = parse_date("end", query.end.as_deref())?;

                if start > end {
                    return Err(Error::Validation(format!(
                        "start date {start} is after end date {end}"
                    )));
                }

                Ok(Self::Custom { start, end })
            }
            other => Err(Error::Validation(format!("Invalid filter \"{other}\""))),
        }
    }

    /// Compute the window of time this filter selects.
    ///
    /// `today` is the current date in the local timezone `zone`. The trailing
    /// windows count today as the first of their days, so `Last7` starts six
    /// days before `today`.
    pub fn window(self, today: Date, zone: &impl LocalZone) -> DateWindow {
        let (first_day, last_day) = match self {
            Self::Today => (today, today),
            Self::Last7 => (today.saturating_sub(Duration::days(6)), today),
            Self::Last30 => (today.saturating_sub(Duration::days(29)), today),
            Self::Custom { start, end } => (start, end),
        };

        DateWindow::from_days(first_day, last_day, zone)
    }
}

fn parse_date(name: &str, value: Option<&str>) -> Result<Date, Error> {
    let value = value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| Error::Validation(format!("Missing {name} date")))?;

    Date::parse(value, DATE_FORMAT)
        .map_err(|_| Error::Validation(format!("Invalid {name} date \"{value}\"")))
}

/// An inclusive window of time, with millisecond resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    /// The first instant in the window.
    pub start: OffsetDateTime,
    /// The last instant in the window.
    pub end: OffsetDateTime,
}

impl DateWindow {
    /// The window from the start of `first_day` to the last millisecond of
    /// `last_day`, both in local time in `zone`.
    ///
    /// Each end is resolved with the offset in effect on its own day.
    pub fn from_days(first_day: Date, last_day: Date, zone: &impl LocalZone) -> Self {
        Self {
            start: zone.resolve(first_day.with_time(Time::MIDNIGHT)),
            end: zone.resolve(last_day.with_time(END_OF_DAY)),
        }
    }

    /// Whether `instant` falls within the window.
    pub fn contains(&self, instant: OffsetDateTime) -> bool {
        self.start <= instant && instant <= self.end
    }
}

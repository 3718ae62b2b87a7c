//! Canonical calendar-date handling.
//!
//! Every date-valued field in this crate is a [`civil::Date`]. The backend
//! stores date columns without a zone and may serialize them either as a
//! plain `YYYY-MM-DD` or as an instant at UTC midnight, so matching a local
//! calendar date against server data must go through [`parse_date`] rather
//! than slicing strings at each call site.
//!
//! Normalization rules:
//! - `2024-06-10` is taken as-is.
//! - An instant with an offset (`2024-06-10T00:00:00.000Z`,
//!   `2024-06-10T02:00:00+02:00`) is converted to its UTC calendar date.
//! - A civil datetime without an offset (`2024-06-10T23:30:00`) keeps its
//!   own date part.

use jiff::civil::{Date, DateTime};
use jiff::tz::TimeZone;
use jiff::{Span, Timestamp, Zoned};

#[derive(Debug, thiserror::Error)]
pub enum DateError {
    #[error("Invalid date '{0}', expected YYYY-MM-DD")]
    Unrecognized(String),
    #[error("Date out of range")]
    OutOfRange(#[from] jiff::Error),
}

/// Normalize any date representation produced by the backend or a caller
/// into a calendar date.
pub fn parse_date(input: &str) -> Result<Date, DateError> {
    let input = input.trim();
    if let Ok(timestamp) = input.parse::<Timestamp>() {
        return Ok(timestamp.to_zoned(TimeZone::UTC).date());
    }
    if let Ok(datetime) = input.parse::<DateTime>() {
        return Ok(datetime.date());
    }
    input
        .parse::<Date>()
        .map_err(|_| DateError::Unrecognized(input.to_string()))
}

/// Format a date the way the backend expects it in paths and bodies.
pub fn format_date(date: Date) -> String {
    date.strftime("%Y-%m-%d").to_string()
}

/// Today's date in the given time zone.
pub fn today_in(tz: &TimeZone) -> Date {
    Zoned::now().with_time_zone(tz.clone()).date()
}

/// Monday and Sunday of the week containing `date`.
pub fn week_bounds(date: Date) -> Result<(Date, Date), DateError> {
    let offset = date.weekday().to_monday_zero_offset();
    let start = date.checked_sub(Span::new().days(i64::from(offset)))?;
    let end = start.checked_add(Span::new().days(6))?;
    Ok((start, end))
}

/// First and last day of the given month.
pub fn month_bounds(year: i16, month: i8) -> Result<(Date, Date), DateError> {
    let first = Date::new(year, month, 1)?;
    Ok((first, first.last_of_month()))
}

/// Serde adapters for date fields that tolerate every representation
/// accepted by [`parse_date`] while always emitting `YYYY-MM-DD`.
pub mod serde_date {
    use jiff::civil::Date;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        date: &Date,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_date(*date))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Date, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_date(&raw).map_err(serde::de::Error::custom)
    }

    pub mod option {
        use jiff::civil::Date;
        use serde::{Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(
            date: &Option<Date>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match date {
                Some(date) => {
                    serializer.serialize_str(&crate::dates::format_date(*date))
                }
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<Date>, D::Error> {
            Option::<String>::deserialize(deserializer)?
                .filter(|raw| !raw.trim().is_empty())
                .map(|raw| crate::dates::parse_date(&raw))
                .transpose()
                .map_err(serde::de::Error::custom)
        }
    }
}

//! Turning the site's year-less collection dates into calendar dates.

use chrono::{Datelike, Month, NaiveDate};

use crate::council::errors::BinDayError;

/// Resolve `"<weekday> <day> <month>"` (e.g. `"Friday 05 April"`) to a date.
///
/// The site never prints a year and only lists dates in the coming months, so
/// a month earlier than `reference`'s month belongs to the following year.
/// Only months are compared; the day never affects the chosen year. The
/// weekday is required but not checked against the resulting date.
pub fn normalize(text: &str, reference: NaiveDate) -> Result<NaiveDate, BinDayError> {
    let parts: Vec<&str> = text.split_whitespace().collect();
    let [_weekday, day, month] = parts.as_slice() else {
        return Err(BinDayError::Parse(format!(
            "expected \"<weekday> <day> <month>\", got {text:?}"
        )));
    };

    let day: u32 = day
        .parse()
        .map_err(|_| BinDayError::Parse(format!("invalid day {day:?} in {text:?}")))?;
    let month = month
        .parse::<Month>()
        .map_err(|_| BinDayError::Parse(format!("invalid month {month:?} in {text:?}")))?
        .number_from_month();

    let year = if month < reference.month() {
        reference.year() + 1
    } else {
        reference.year()
    };

    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| BinDayError::Parse(format!("{text:?} is not a valid date in {year}")))
}

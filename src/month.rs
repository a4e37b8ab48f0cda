//! The calendar month that listing and summary queries are scoped to.

use time::Month;

use crate::Error;

/// A calendar year and month, e.g. March 2024.
///
/// Years are limited to 0 through 9999 so that they always match the four
/// digit year of a stored `YYYY-MM-DD` date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct YearMonth {
    year: i32,
    month: u8,
}

impl YearMonth {
    /// Create a year-month from a year and a month number from 1 to 12.
    ///
    /// # Errors
    /// Returns [Error::InvalidYear] if `year` is outside 0 to 9999, or
    /// [Error::InvalidMonth] if `month` is outside 1 to 12.
    pub(crate) fn new(year: i32, month: u8) -> Result<Self, Error> {
        if !(0..=9999).contains(&year) {
            return Err(Error::InvalidYear(year));
        }

        Month::try_from(month).map_err(|_| Error::InvalidMonth(month))?;

        Ok(Self { year, month })
    }

    /// The year as it appears in a stored date, zero-padded to four digits.
    pub(crate) fn year_key(&self) -> String {
        format!("{:04}", self.year)
    }

    /// The month as it appears in a stored date, zero-padded to two digits.
    pub(crate) fn month_key(&self) -> String {
        format!("{:02}", self.month)
    }
}

//! Calendar due dates shared by both task systems.

use super::MirrorDomainError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// A due date reduced to its calendar-date component.
///
/// Both remote systems may attach a time-of-day; it is discarded on parse so
/// that equality is always on the calendar date alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DueDate(NaiveDate);

impl DueDate {
    /// Wraps an existing calendar date.
    #[must_use]
    pub const fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Parses `YYYY-MM-DD`, ignoring any `T...` time suffix.
    ///
    /// # Errors
    ///
    /// Returns [`MirrorDomainError::InvalidDueDate`] when the date part is
    /// not a valid calendar date.
    pub fn parse(value: &str) -> Result<Self, MirrorDomainError> {
        let trimmed = value.trim();
        let date_part = trimmed.split_once('T').map_or(trimmed, |(date, _)| date);
        NaiveDate::parse_from_str(date_part, DATE_FORMAT)
            .map(Self)
            .map_err(|_| MirrorDomainError::InvalidDueDate(value.to_owned()))
    }

    /// Returns the wrapped calendar date.
    #[must_use]
    pub const fn date(self) -> NaiveDate {
        self.0
    }
}

impl fmt::Display for DueDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DATE_FORMAT))
    }
}

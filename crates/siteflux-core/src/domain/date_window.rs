use std::fmt::{Display, Formatter};

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{Date, Duration, OffsetDateTime};

use crate::ValidationError;

const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Calendar day in UTC, formatted as `YYYY-MM-DD` on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UtcDate(Date);

impl UtcDate {
    pub fn today_utc() -> Self {
        Self(OffsetDateTime::now_utc().date())
    }

    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        Date::parse(input, DATE_FORMAT)
            .map(Self)
            .map_err(|_| ValidationError::InvalidDate {
                value: input.to_owned(),
            })
    }

    pub fn from_date(date: Date) -> Self {
        Self(date)
    }

    /// Shift backward by `days` whole days, saturating at the calendar range.
    pub fn minus_days(self, days: u32) -> Self {
        Self(self.0.saturating_sub(Duration::days(i64::from(days))))
    }

    pub fn into_inner(self) -> Date {
        self.0
    }
}

impl Display for UtcDate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let formatted = self
            .0
            .format(DATE_FORMAT)
            .expect("UtcDate must be YYYY-MM-DD formattable");
        f.write_str(&formatted)
    }
}

impl Serialize for UtcDate {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for UtcDate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Self::parse(&value).map_err(D::Error::custom)
    }
}

/// Inclusive date range a metric query targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct DateWindow {
    start: UtcDate,
    end: UtcDate,
}

impl DateWindow {
    pub fn new(start: UtcDate, end: UtcDate) -> Result<Self, ValidationError> {
        if start > end {
            return Err(ValidationError::WindowInverted {
                start: start.to_string(),
                end: end.to_string(),
            });
        }
        Ok(Self { start, end })
    }

    /// Trailing window of `days` days ending at `end`.
    pub fn trailing(end: UtcDate, days: u32) -> Result<Self, ValidationError> {
        if days == 0 {
            return Err(ValidationError::ZeroLengthWindow);
        }
        Ok(Self {
            start: end.minus_days(days),
            end,
        })
    }

    /// The window of `days` days immediately before the trailing window
    /// anchored at `basis`. Its end coincides with the trailing window's
    /// start.
    pub fn preceding(basis: UtcDate, days: u32) -> Result<Self, ValidationError> {
        if days == 0 {
            return Err(ValidationError::ZeroLengthWindow);
        }
        Ok(Self {
            start: basis.minus_days(days).minus_days(days),
            end: basis.minus_days(days),
        })
    }

    pub fn start(&self) -> UtcDate {
        self.start
    }

    pub fn end(&self) -> UtcDate {
        self.end
    }
}

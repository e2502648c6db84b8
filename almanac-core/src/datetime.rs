//! CalendarDate type and Gregorian calendar arithmetic
//!
//! A `CalendarDate` is an instant in milliseconds since the Unix epoch,
//! viewed through an optional fixed UTC offset. Every field accessor reads
//! the wall-clock ("local") fields in that offset.
//!
//! Design principles:
//! - Gregorian proleptic calendar, civil-day arithmetic (no month tables
//!   except for component validation)
//! - Instants are bounded to +/-100,000,000 days around the epoch, so every
//!   `i64` millisecond computation on a valid date stays in range
//! - Equality and ordering compare the instant, never the offset
//! - Constructors, deserialization and day arithmetic check that bound and
//!   return `DateTimeError::Overflow` instead of wrapping

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use thiserror::Error;

// ============================================================================
// Constants
// ============================================================================

pub const MILLIS_PER_SECOND: i64 = 1_000;
pub const MILLIS_PER_MINUTE: i64 = 60 * MILLIS_PER_SECOND;
pub const MILLIS_PER_HOUR: i64 = 60 * MILLIS_PER_MINUTE;
pub const MILLIS_PER_DAY: i64 = 24 * MILLIS_PER_HOUR;

/// Largest accepted UTC offset magnitude, in seconds
pub const MAX_OFFSET_SECS: i32 = 24 * 3600 - 1;

/// Largest representable distance from the epoch (100,000,000 days)
pub const MAX_MILLIS: i64 = 100_000_000 * MILLIS_PER_DAY;

/// Days in each month (non-leap year)
const DAYS_IN_MONTH: [u32; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

/// Days from 0000-03-01 to 1970-01-01
const UNIX_EPOCH_DAYS: i64 = 719_468;

/// English weekday names, Sunday first
pub const WEEKDAY_NAMES: [&str; 7] = [
    "Sunday", "Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday",
];

/// English month names, January first
pub const MONTH_NAMES: [&str; 12] = [
    "January", "February", "March", "April", "May", "June",
    "July", "August", "September", "October", "November", "December",
];

/// ISO weekday number of Friday
pub const FRIDAY: u32 = 5;

// ============================================================================
// CalendarDate
// ============================================================================

/// An instant with millisecond precision and an optional fixed offset
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(try_from = "RawCalendarDate")]
pub struct CalendarDate {
    /// Milliseconds since Unix epoch (negative for pre-1970 instants)
    millis: i64,
    /// Offset in seconds east of UTC (None = UTC)
    #[serde(skip_serializing_if = "Option::is_none")]
    tz_offset: Option<i32>,
}

impl CalendarDate {
    // ========== Construction ==========

    /// Create a UTC date from milliseconds since Unix epoch
    pub fn from_unix_millis(millis: i64) -> Result<Self, DateTimeError> {
        if !(-MAX_MILLIS..=MAX_MILLIS).contains(&millis) {
            return Err(DateTimeError::Overflow);
        }
        Ok(Self { millis, tz_offset: None })
    }

    /// Create a UTC date (time = 00:00:00)
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Result<Self, DateTimeError> {
        Self::from_ymd_hms(year, month, day, 0, 0, 0)
    }

    /// Create a UTC datetime from components
    pub fn from_ymd_hms(
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        minute: u32,
        second: u32,
    ) -> Result<Self, DateTimeError> {
        Self::from_components(&DateTimeComponents {
            year,
            month,
            day,
            hour,
            minute,
            second,
            millisecond: 0,
            tz_offset: None,
        })
    }

    /// Create a datetime whose wall-clock fields are given in `offset_secs`
    pub fn from_local_ymd_hms(
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        minute: u32,
        second: u32,
        offset_secs: i32,
    ) -> Result<Self, DateTimeError> {
        Self::from_components(&DateTimeComponents {
            year,
            month,
            day,
            hour,
            minute,
            second,
            millisecond: 0,
            tz_offset: Some(offset_secs),
        })
    }

    /// Build a date from validated wall-clock components
    pub fn from_components(c: &DateTimeComponents) -> Result<Self, DateTimeError> {
        if !(1..=12).contains(&c.month) {
            return Err(DateTimeError::InvalidMonth(c.month));
        }
        let max_day = days_in_month(c.year, c.month);
        if c.day < 1 || c.day > max_day {
            return Err(DateTimeError::InvalidDay(c.day, c.month, c.year));
        }
        if c.hour > 23 {
            return Err(DateTimeError::InvalidHour(c.hour));
        }
        if c.minute > 59 {
            return Err(DateTimeError::InvalidMinute(c.minute));
        }
        if c.second > 59 {
            return Err(DateTimeError::InvalidSecond(c.second));
        }
        if c.millisecond > 999 {
            return Err(DateTimeError::InvalidMillisecond(c.millisecond));
        }
        if let Some(offset) = c.tz_offset {
            check_offset(offset)?;
        }

        let days = days_from_civil(c.year, c.month, c.day);
        let local_millis = days
            .checked_mul(MILLIS_PER_DAY)
            .and_then(|ms| {
                ms.checked_add(
                    (c.hour as i64) * MILLIS_PER_HOUR
                        + (c.minute as i64) * MILLIS_PER_MINUTE
                        + (c.second as i64) * MILLIS_PER_SECOND
                        + c.millisecond as i64,
                )
            })
            .ok_or(DateTimeError::Overflow)?;
        let offset_millis = c.tz_offset.unwrap_or(0) as i64 * MILLIS_PER_SECOND;
        let millis = local_millis.checked_sub(offset_millis).ok_or(DateTimeError::Overflow)?;

        Ok(Self {
            tz_offset: c.tz_offset,
            ..Self::from_unix_millis(millis)?
        })
    }

    // ========== Accessors ==========

    /// Milliseconds since Unix epoch
    pub fn as_unix_millis(&self) -> i64 {
        self.millis
    }

    /// Offset in seconds (None = UTC)
    pub fn tz_offset(&self) -> Option<i32> {
        self.tz_offset
    }

    /// Same instant, viewed in another offset
    pub fn with_tz_offset(mut self, offset_secs: i32) -> Result<Self, DateTimeError> {
        check_offset(offset_secs)?;
        self.tz_offset = Some(offset_secs);
        Ok(self)
    }

    /// Same instant, viewed in UTC
    pub fn to_utc(mut self) -> Self {
        self.tz_offset = None;
        self
    }

    /// Milliseconds since epoch of the wall-clock reading
    fn local_millis(&self) -> i64 {
        self.millis + self.tz_offset.unwrap_or(0) as i64 * MILLIS_PER_SECOND
    }

    fn local_time_millis(&self) -> i64 {
        self.local_millis().rem_euclid(MILLIS_PER_DAY)
    }

    /// Index of the local civil day (0 = 1970-01-01)
    pub fn day_number(&self) -> i64 {
        self.local_millis().div_euclid(MILLIS_PER_DAY)
    }

    pub fn year(&self) -> i32 {
        self.to_ymd().0
    }

    /// Month (1-12)
    pub fn month(&self) -> u32 {
        self.to_ymd().1
    }

    /// Day of month (1-31)
    pub fn day(&self) -> u32 {
        self.to_ymd().2
    }

    pub fn hour(&self) -> u32 {
        (self.local_time_millis() / MILLIS_PER_HOUR) as u32
    }

    pub fn minute(&self) -> u32 {
        ((self.local_time_millis() % MILLIS_PER_HOUR) / MILLIS_PER_MINUTE) as u32
    }

    pub fn second(&self) -> u32 {
        ((self.local_time_millis() % MILLIS_PER_MINUTE) / MILLIS_PER_SECOND) as u32
    }

    pub fn millisecond(&self) -> u32 {
        (self.local_time_millis() % MILLIS_PER_SECOND) as u32
    }

    /// Day of week (1=Monday, 7=Sunday, ISO 8601)
    pub fn weekday(&self) -> u32 {
        iso_weekday_from_days(self.day_number())
    }

    /// English weekday name ("Sunday".."Saturday")
    pub fn weekday_name(&self) -> &'static str {
        WEEKDAY_NAMES[(self.weekday() % 7) as usize]
    }

    /// Decompose into local year, month, day
    pub fn to_ymd(&self) -> (i32, u32, u32) {
        civil_from_days(self.day_number())
    }

    /// Decompose into all local components
    pub fn to_components(&self) -> DateTimeComponents {
        let (year, month, day) = self.to_ymd();
        DateTimeComponents {
            year,
            month,
            day,
            hour: self.hour(),
            minute: self.minute(),
            second: self.second(),
            millisecond: self.millisecond(),
            tz_offset: self.tz_offset,
        }
    }

    // ========== Arithmetic ==========

    /// Add whole days, keeping the time of day and offset
    pub fn add_days(&self, days: i64) -> Result<Self, DateTimeError> {
        let millis = days
            .checked_mul(MILLIS_PER_DAY)
            .and_then(|delta| self.millis.checked_add(delta))
            .ok_or(DateTimeError::Overflow)?;
        Ok(Self {
            tz_offset: self.tz_offset,
            ..Self::from_unix_millis(millis)?
        })
    }

    /// Milliseconds from `other` to `self`
    ///
    /// Both instants lie within `MAX_MILLIS` of the epoch, so the
    /// difference always fits.
    pub fn millis_since(&self, other: &CalendarDate) -> i64 {
        self.millis - other.millis
    }

    // ========== Formatting ==========

    /// Format as ISO 8601 string
    pub fn to_iso_string(&self) -> String {
        let c = self.to_components();
        if let Some(offset) = c.tz_offset {
            let sign = if offset < 0 { '-' } else { '+' };
            let abs_offset = offset.unsigned_abs();
            format!(
                "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}{}{:02}:{:02}",
                c.year, c.month, c.day, c.hour, c.minute, c.second,
                sign, abs_offset / 3600, (abs_offset % 3600) / 60
            )
        } else {
            format!(
                "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}Z",
                c.year, c.month, c.day, c.hour, c.minute, c.second
            )
        }
    }
}

/// Unvalidated serialized form of `CalendarDate`
#[derive(Deserialize)]
struct RawCalendarDate {
    millis: i64,
    #[serde(default)]
    tz_offset: Option<i32>,
}

impl TryFrom<RawCalendarDate> for CalendarDate {
    type Error = DateTimeError;

    fn try_from(raw: RawCalendarDate) -> Result<Self, Self::Error> {
        let date = Self::from_unix_millis(raw.millis)?;
        match raw.tz_offset {
            Some(offset) => date.with_tz_offset(offset),
            None => Ok(date),
        }
    }
}

fn check_offset(offset_secs: i32) -> Result<(), DateTimeError> {
    if offset_secs.unsigned_abs() > MAX_OFFSET_SECS as u32 {
        return Err(DateTimeError::InvalidOffset(offset_secs));
    }
    Ok(())
}

impl PartialEq for CalendarDate {
    fn eq(&self, other: &Self) -> bool {
        self.millis == other.millis
    }
}

impl Eq for CalendarDate {}

impl PartialOrd for CalendarDate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CalendarDate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.millis.cmp(&other.millis)
    }
}

impl Hash for CalendarDate {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.millis.hash(state);
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_iso_string())
    }
}

// ============================================================================
// DateTimeComponents
// ============================================================================

/// Decomposed wall-clock fields, also the output of date parsing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DateTimeComponents {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
    pub millisecond: u32,
    /// Offset the fields are expressed in (None = not stated)
    pub tz_offset: Option<i32>,
}

// ============================================================================
// DateTimeError
// ============================================================================

/// Errors from date construction, parsing and calendar operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateTimeError {
    #[error("Invalid month: {0} (must be 1-12)")]
    InvalidMonth(u32),
    #[error("Invalid day: {0} for {1}/{2}")]
    InvalidDay(u32, u32, i32), // day, month, year
    #[error("Invalid hour: {0} (must be 0-23)")]
    InvalidHour(u32),
    #[error("Invalid minute: {0} (must be 0-59)")]
    InvalidMinute(u32),
    #[error("Invalid second: {0} (must be 0-59)")]
    InvalidSecond(u32),
    #[error("Invalid millisecond: {0}")]
    InvalidMillisecond(u32),
    #[error("Invalid UTC offset: {0} seconds")]
    InvalidOffset(i32),
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("Work schedule cycle must contain at least one day")]
    EmptyCycle,
    #[error("Date overflow")]
    Overflow,
}

// ============================================================================
// Calendar Utilities (Gregorian proleptic)
// ============================================================================

/// Check if year is a leap year
pub fn is_leap_year(year: i32) -> bool {
    year % 400 == 0 || (year % 4 == 0 && year % 100 != 0)
}

/// Days in a month, for component validation (0 for an invalid month)
pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        2 if is_leap_year(year) => 29,
        1..=12 => DAYS_IN_MONTH[(month - 1) as usize],
        _ => 0,
    }
}

/// ISO weekday (1=Monday, 7=Sunday) of a civil day index
pub fn iso_weekday_from_days(days: i64) -> u32 {
    // 1970-01-01 was a Thursday
    match (days + 4).rem_euclid(7) {
        0 => 7,
        d => d as u32,
    }
}

/// Convert civil date to days since Unix epoch
/// Algorithm from Howard Hinnant: http://howardhinnant.github.io/date_algorithms.html
pub fn days_from_civil(year: i32, month: u32, day: u32) -> i64 {
    let y = if month <= 2 { year as i64 - 1 } else { year as i64 };
    let era = if y >= 0 { y } else { y - 399 } / 400;
    let yoe = y - era * 400; // [0, 399]
    let m = month as i64;
    let doy = (153 * (if m > 2 { m - 3 } else { m + 9 }) + 2) / 5 + day as i64 - 1; // [0, 365]
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy; // [0, 146096]
    era * 146097 + doe - UNIX_EPOCH_DAYS
}

/// Convert days since Unix epoch to civil date
/// Algorithm from Howard Hinnant: http://howardhinnant.github.io/date_algorithms.html
pub fn civil_from_days(days: i64) -> (i32, u32, u32) {
    let z = days + UNIX_EPOCH_DAYS;
    let era = if z >= 0 { z } else { z - 146096 } / 146097;
    let doe = z - era * 146097; // [0, 146096]
    let yoe = (doe - doe / 1460 + doe / 36524 - doe / 146096) / 365; // [0, 399]
    let y = yoe + era * 400;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100); // [0, 365]
    let mp = (5 * doy + 2) / 153; // [0, 11]
    let d = doy - (153 * mp + 2) / 5 + 1; // [1, 31]
    let m = if mp < 10 { mp + 3 } else { mp - 9 }; // [1, 12]
    let year = if m <= 2 { y + 1 } else { y };
    (year as i32, m as u32, d as u32)
}

// ============================================================================
// Tests
// ============================================================================

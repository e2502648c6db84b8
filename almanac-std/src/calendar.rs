//! Calendar math
//!
//! Typed, pure calendar operations. String inputs go through a
//! `DateParser`, so callers decide how text is normalized and which
//! offset applies to strings that name no zone.
//!
//! Functions that parse or validate return `Result`; the rest cannot fail.

use almanac_core::{
    civil_from_days, days_from_civil, iso_weekday_from_days, parse_day_month_year, CalendarDate,
    DateParser, DateTimeError, FRIDAY, MILLIS_PER_DAY,
};
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Epoch as a string, parsed by the same parser as the input
const EPOCH: &str = "01 Jan 1970 00:00:00 UTC";

/// Upper bound on Friday steps when searching for a Friday the 13th
pub const MAX_FRIDAY_STEPS: usize = 7 * 12;

// ============================================================================
// Inputs
// ============================================================================

/// Inclusive pair of date strings; `start <= end` is assumed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatePeriod {
    pub start: String,
    pub end: String,
}

impl DatePeriod {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }
}

/// Repeating cycle of work days followed by off days
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WorkSchedulePattern {
    work_days: u32,
    off_days: u32,
}

impl WorkSchedulePattern {
    /// Rejects a cycle with no days at all
    pub fn new(work_days: u32, off_days: u32) -> Result<Self, DateTimeError> {
        if work_days == 0 && off_days == 0 {
            return Err(DateTimeError::EmptyCycle);
        }
        Ok(Self { work_days, off_days })
    }

    pub fn work_days(&self) -> u32 {
        self.work_days
    }

    pub fn off_days(&self) -> u32 {
        self.off_days
    }

    pub fn cycle_len(&self) -> u64 {
        self.work_days as u64 + self.off_days as u64
    }

    /// Whether the day at zero-based `index` from the cycle start is worked
    pub fn is_work_day(&self, index: u64) -> bool {
        index % self.cycle_len() < self.work_days as u64
    }
}

// ============================================================================
// Conversion
// ============================================================================

/// Milliseconds between the epoch and the parsed date
pub fn date_to_timestamp(parser: &dyn DateParser, date: &str) -> Result<i64, DateTimeError> {
    let date = parser.parse(date)?;
    let epoch = parser.parse(EPOCH)?;
    Ok(date.millis_since(&epoch))
}

/// Local time of day as `HH:MM:SS`
pub fn get_time(date: &CalendarDate) -> String {
    format!("{:02}:{:02}:{:02}", date.hour(), date.minute(), date.second())
}

/// Weekday name of the parsed date, read in the date's own offset
pub fn get_day_name(parser: &dyn DateParser, date: &str) -> Result<&'static str, DateTimeError> {
    Ok(parser.parse(date)?.weekday_name())
}

/// `M/D/YYYY, h:mm:ss AM` from the UTC fields
pub fn format_date(parser: &dyn DateParser, date: &str) -> Result<String, DateTimeError> {
    let d = parser.parse(date)?.to_utc();
    let hour = d.hour();
    let hour12 = match hour % 12 {
        0 => 12,
        h => h,
    };
    let meridiem = if hour < 12 { "AM" } else { "PM" };
    Ok(format!(
        "{}/{}/{}, {}:{:02}:{:02} {}",
        d.month(),
        d.day(),
        d.year(),
        hour12,
        d.minute(),
        d.second(),
        meridiem
    ))
}

// ============================================================================
// Counting
// ============================================================================

/// Days in a month, by subtracting consecutive month starts
pub fn get_count_days_in_month(month: u32, year: i32) -> Result<u32, DateTimeError> {
    if !(1..=12).contains(&month) {
        return Err(DateTimeError::InvalidMonth(month));
    }
    let first = days_from_civil(year, month, 1);
    let next = if month == 12 {
        days_from_civil(year.checked_add(1).ok_or(DateTimeError::Overflow)?, 1, 1)
    } else {
        days_from_civil(year, month + 1, 1)
    };
    Ok((next - first) as u32)
}

/// Whole days from start to end, counting both endpoints
pub fn get_count_days_on_period(
    parser: &dyn DateParser,
    start: &str,
    end: &str,
) -> Result<i64, DateTimeError> {
    let start = parser.parse(start)?;
    let end = parser.parse(end)?;
    Ok(end.millis_since(&start).div_euclid(MILLIS_PER_DAY) + 1)
}

/// Whether `start <= date <= end`
pub fn is_date_in_period(
    parser: &dyn DateParser,
    date: &str,
    period: &DatePeriod,
) -> Result<bool, DateTimeError> {
    let date = parser.parse(date)?;
    let start = parser.parse(&period.start)?;
    let end = parser.parse(&period.end)?;
    Ok(start <= date && date <= end)
}

/// Saturdays and Sundays in a month.
///
/// Any seven consecutive days hold exactly two weekend days, so only the
/// days past the last full week need inspecting. Those are walked backward
/// from the month's last day.
pub fn get_count_weekends_in_month(month: u32, year: i32) -> Result<u32, DateTimeError> {
    let days = get_count_days_in_month(month, year)?;
    let full_weeks = days / 7;
    let remainder = days % 7;

    let last_day = days_from_civil(year, month, days);
    let tail = (0..remainder as i64)
        .filter(|back| iso_weekday_from_days(last_day - back) >= 6)
        .count() as u32;

    Ok(full_weeks * 2 + tail)
}

// ============================================================================
// Navigation
// ============================================================================

/// Next Friday strictly after `date`, keeping time of day and offset
///
/// Fails with `Overflow` when that Friday lies past the last
/// representable day.
pub fn get_next_friday(date: &CalendarDate) -> Result<CalendarDate, DateTimeError> {
    let ahead = match (FRIDAY + 7 - date.weekday()) % 7 {
        0 => 7,
        n => n,
    };
    date.add_days(ahead as i64)
}

/// First Friday the 13th strictly after `date`
///
/// Every 14-month window holds a Friday the 13th, so the bounded search
/// finds one unless it runs off the end of the representable range first.
pub fn get_next_friday_the_13th(date: &CalendarDate) -> Result<Option<CalendarDate>, DateTimeError> {
    let mut current = *date;
    for _ in 0..MAX_FRIDAY_STEPS {
        current = get_next_friday(&current)?;
        if current.day() == 13 {
            return Ok(Some(current));
        }
    }
    Ok(None)
}

/// Week of the year, counting from the Monday of the week holding Jan 4.
///
/// Dates before that Monday clamp to week 1. Late December dates are not
/// rolled into the next year's week 1, so they may report week 53.
pub fn get_week_number_by_date(date: &CalendarDate) -> u32 {
    let jan4 = days_from_civil(date.year(), 1, 4);
    let week1_start = jan4 - (iso_weekday_from_days(jan4) as i64 - 1);
    let day = date.day_number();
    if day < week1_start {
        1
    } else {
        ((day - week1_start) / 7 + 1) as u32
    }
}

/// Quarter of the year (1-4)
pub fn get_quarter(date: &CalendarDate) -> u32 {
    (date.month() - 1) / 3 + 1
}

pub fn is_leap_year(date: &CalendarDate) -> bool {
    almanac_core::is_leap_year(date.year())
}

// ============================================================================
// Schedules
// ============================================================================

/// Work days in a `DD-MM-YYYY` period, in order, as `DD-MM-YYYY`
pub fn get_work_schedule(
    period: &DatePeriod,
    pattern: &WorkSchedulePattern,
) -> Result<Vec<String>, DateTimeError> {
    let start = parse_day_month_year(&period.start)?.day_number();
    let end = parse_day_month_year(&period.end)?.day_number();

    let mut days = Vec::new();
    for (index, day) in (start..=end).enumerate() {
        let index = index as u64;
        if index % pattern.cycle_len() == 0 {
            trace!(cycle = index / pattern.cycle_len(), day = %format_day_month_year(day), "schedule cycle");
        }
        if pattern.is_work_day(index) {
            days.push(format_day_month_year(day));
        }
    }
    Ok(days)
}

fn format_day_month_year(day_number: i64) -> String {
    let (year, month, day) = civil_from_days(day_number);
    format!("{:02}-{:02}-{:04}", day, month, year)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use almanac_core::StandardParser;

    fn utc() -> StandardParser {
        StandardParser::utc()
    }

    fn ymd(year: i32, month: u32, day: u32) -> CalendarDate {
        CalendarDate::from_ymd(year, month, day).unwrap()
    }

    #[test]
    fn test_date_to_timestamp() {
        let p = utc();
        assert_eq!(date_to_timestamp(&p, "01 Jan 1970 00:00:00 UTC").unwrap(), 0);
        assert_eq!(date_to_timestamp(&p, "2024-02-16T10:00:00Z").unwrap(), 1_708_077_600_000);
        assert_eq!(date_to_timestamp(&p, "1969-12-31").unwrap(), -MILLIS_PER_DAY);
        assert!(date_to_timestamp(&p, "not a date").is_err());
    }

    #[test]
    fn test_date_to_timestamp_local_offset() {
        let p = StandardParser::with_local_offset(3600);
        // No zone: read in local time, one hour ahead of UTC
        assert_eq!(date_to_timestamp(&p, "1970-01-01T01:00:00").unwrap(), 0);
    }

    #[test]
    fn test_get_time() {
        let dt = CalendarDate::from_ymd_hms(2024, 2, 16, 9, 5, 3).unwrap();
        assert_eq!(get_time(&dt), "09:05:03");

        let local = CalendarDate::from_local_ymd_hms(2024, 2, 16, 23, 59, 59, -5 * 3600).unwrap();
        assert_eq!(get_time(&local), "23:59:59");
    }

    #[test]
    fn test_get_day_name() {
        let p = utc();
        assert_eq!(get_day_name(&p, "2024-02-16").unwrap(), "Friday");
        assert_eq!(get_day_name(&p, "1970-01-01T00:00:00Z").unwrap(), "Thursday");
        // Weekday follows the string's own offset
        assert_eq!(get_day_name(&p, "2024-02-16T23:30:00-05:00").unwrap(), "Friday");
        assert_eq!(get_day_name(&p, "Sun, 18 Feb 2024 08:00:00 GMT").unwrap(), "Sunday");
    }

    #[test]
    fn test_format_date() {
        let p = utc();
        assert_eq!(format_date(&p, "2024-02-16T13:05:09Z").unwrap(), "2/16/2024, 1:05:09 PM");
        assert_eq!(format_date(&p, "2024-02-16T00:00:00Z").unwrap(), "2/16/2024, 12:00:00 AM");
        assert_eq!(format_date(&p, "2024-12-01T12:30:00Z").unwrap(), "12/1/2024, 12:30:00 PM");
        // Rendered in UTC, not the string's offset
        assert_eq!(format_date(&p, "2024-02-16T01:00:00+02:00").unwrap(), "2/15/2024, 11:00:00 PM");
    }

    #[test]
    fn test_get_count_days_in_month() {
        assert_eq!(get_count_days_in_month(2, 2024).unwrap(), 29);
        assert_eq!(get_count_days_in_month(2, 2023).unwrap(), 28);
        assert_eq!(get_count_days_in_month(2, 1900).unwrap(), 28);
        assert_eq!(get_count_days_in_month(2, 2000).unwrap(), 29);
        assert_eq!(get_count_days_in_month(12, 2024).unwrap(), 31);
        assert_eq!(get_count_days_in_month(4, 2024).unwrap(), 30);
        assert_eq!(get_count_days_in_month(0, 2024), Err(DateTimeError::InvalidMonth(0)));
        assert_eq!(get_count_days_in_month(13, 2024), Err(DateTimeError::InvalidMonth(13)));
    }

    #[test]
    fn test_get_count_days_on_period() {
        let p = utc();
        assert_eq!(
            get_count_days_on_period(&p, "2024-02-01T00:00:00Z", "2024-02-02T00:00:00Z").unwrap(),
            2
        );
        assert_eq!(get_count_days_on_period(&p, "2024-02-01", "2024-02-01").unwrap(), 1);
        assert_eq!(get_count_days_on_period(&p, "2024-01-01", "2024-12-31").unwrap(), 366);
        // Partial days are floored before the inclusive +1
        assert_eq!(
            get_count_days_on_period(&p, "2024-02-01T00:00:00Z", "2024-02-02T23:00:00Z").unwrap(),
            2
        );
    }

    #[test]
    fn test_is_date_in_period() {
        let p = utc();
        let period = DatePeriod::new("2024-02-02", "2024-03-02");
        assert!(is_date_in_period(&p, "2024-02-02", &period).unwrap());
        assert!(is_date_in_period(&p, "2024-03-02", &period).unwrap());
        assert!(is_date_in_period(&p, "2024-02-20", &period).unwrap());
        assert!(!is_date_in_period(&p, "2024-02-01", &period).unwrap());
        assert!(!is_date_in_period(&p, "2024-03-03", &period).unwrap());
        assert!(is_date_in_period(&p, "bogus", &period).is_err());
    }

    fn brute_force_weekends(month: u32, year: i32) -> u32 {
        let days = get_count_days_in_month(month, year).unwrap();
        (1..=days)
            .filter(|&d| iso_weekday_from_days(days_from_civil(year, month, d)) >= 6)
            .count() as u32
    }

    #[test]
    fn test_get_count_weekends_in_month() {
        assert_eq!(get_count_weekends_in_month(2, 2024).unwrap(), 8);
        // March 2024 starts on a Friday: 5 Saturdays, 5 Sundays
        assert_eq!(get_count_weekends_in_month(3, 2024).unwrap(), 10);
        assert!(get_count_weekends_in_month(13, 2024).is_err());
    }

    #[test]
    fn test_weekends_match_brute_force() {
        for year in [1900, 1999, 2000, 2023, 2024, 2025, 2100] {
            for month in 1..=12 {
                assert_eq!(
                    get_count_weekends_in_month(month, year).unwrap(),
                    brute_force_weekends(month, year),
                    "{}/{}",
                    month,
                    year
                );
            }
        }
    }

    #[test]
    fn test_get_next_friday() {
        // Friday jumps a whole week
        assert_eq!(get_next_friday(&ymd(2024, 2, 16)), Ok(ymd(2024, 2, 23)));
        assert_eq!(get_next_friday(&ymd(2024, 2, 17)), Ok(ymd(2024, 2, 23)));
        assert_eq!(get_next_friday(&ymd(2024, 2, 22)), Ok(ymd(2024, 2, 23)));
        assert_eq!(get_next_friday(&ymd(2024, 12, 30)), Ok(ymd(2025, 1, 3)));

        let dt = CalendarDate::from_local_ymd_hms(2024, 2, 14, 18, 30, 0, 3600).unwrap();
        let next = get_next_friday(&dt).unwrap();
        assert_eq!(next.to_ymd(), (2024, 2, 16));
        assert_eq!(get_time(&next), "18:30:00");
        assert_eq!(next.tz_offset(), Some(3600));
    }

    #[test]
    fn test_get_next_friday_the_13th() {
        assert_eq!(get_next_friday_the_13th(&ymd(2024, 1, 1)), Ok(Some(ymd(2024, 9, 13))));
        // Strictly after the input
        assert_eq!(get_next_friday_the_13th(&ymd(2024, 9, 13)), Ok(Some(ymd(2024, 12, 13))));
        assert_eq!(get_next_friday_the_13th(&ymd(2024, 12, 14)), Ok(Some(ymd(2025, 6, 13))));
    }

    #[test]
    fn test_navigation_at_end_of_range() {
        // 275760-09-13 is the last representable day, a Saturday
        let last = ymd(275_760, 9, 13);
        assert_eq!(get_next_friday(&last), Err(DateTimeError::Overflow));
        assert_eq!(get_next_friday(&ymd(275_760, 9, 5)), Ok(ymd(275_760, 9, 12)));
        assert_eq!(get_next_friday_the_13th(&ymd(275_760, 9, 1)), Err(DateTimeError::Overflow));

        // Local fields at the far end still read without wrapping
        let late = CalendarDate::from_local_ymd_hms(275_760, 9, 13, 20, 0, 0, -4 * 3600);
        assert_eq!(late, Err(DateTimeError::Overflow));
        let early = CalendarDate::from_local_ymd_hms(275_760, 9, 13, 23, 0, 0, 23 * 3600).unwrap();
        assert_eq!(get_time(&early), "23:00:00");
    }

    #[test]
    fn test_friday_the_13th_is_minimal() {
        let mut start = ymd(2023, 1, 1);
        while start < ymd(2031, 1, 1) {
            let found = get_next_friday_the_13th(&start).unwrap().unwrap();
            assert_eq!(found.day(), 13);
            assert_eq!(found.weekday_name(), "Friday");

            let mut d = start.add_days(1).unwrap();
            while d < found {
                assert!(!(d.day() == 13 && d.weekday() == FRIDAY), "skipped {}", d);
                d = d.add_days(1).unwrap();
            }
            start = start.add_days(5).unwrap();
        }
    }

    #[test]
    fn test_get_week_number_by_date() {
        assert_eq!(get_week_number_by_date(&ymd(2024, 1, 3)), 1);
        assert_eq!(get_week_number_by_date(&ymd(2024, 1, 31)), 5);
        assert_eq!(get_week_number_by_date(&ymd(2024, 1, 8)), 2);
        // 2021 week 1 starts on Monday Jan 4; earlier days clamp to 1
        assert_eq!(get_week_number_by_date(&ymd(2021, 1, 1)), 1);
        assert_eq!(get_week_number_by_date(&ymd(2021, 1, 4)), 1);
        assert_eq!(get_week_number_by_date(&ymd(2021, 1, 11)), 2);
        // Late December is counted in the same year
        assert_eq!(get_week_number_by_date(&ymd(2024, 12, 30)), 53);
    }

    #[test]
    fn test_get_quarter() {
        let quarters: Vec<u32> = (1..=12).map(|m| get_quarter(&ymd(2024, m, 1))).collect();
        assert_eq!(quarters, vec![1, 1, 1, 2, 2, 2, 3, 3, 3, 4, 4, 4]);
    }

    #[test]
    fn test_is_leap_year() {
        assert!(is_leap_year(&ymd(2024, 3, 1)));
        assert!(!is_leap_year(&ymd(2022, 3, 1)));
        assert!(is_leap_year(&ymd(2020, 3, 1)));
        assert!(!is_leap_year(&ymd(1900, 3, 1)));
        assert!(is_leap_year(&ymd(2000, 3, 1)));
    }

    #[test]
    fn test_get_work_schedule() {
        let period = DatePeriod::new("01-01-2024", "15-01-2024");
        let pattern = WorkSchedulePattern::new(1, 3).unwrap();
        assert_eq!(
            get_work_schedule(&period, &pattern).unwrap(),
            vec!["01-01-2024", "05-01-2024", "09-01-2024", "13-01-2024"]
        );
    }

    #[test]
    fn test_work_schedule_crosses_months() {
        let period = DatePeriod::new("27-02-2024", "03-03-2024");
        let pattern = WorkSchedulePattern::new(2, 1).unwrap();
        assert_eq!(
            get_work_schedule(&period, &pattern).unwrap(),
            vec!["27-02-2024", "28-02-2024", "01-03-2024", "02-03-2024"]
        );
    }

    #[test]
    fn test_work_schedule_edges() {
        let all_off = WorkSchedulePattern::new(0, 2).unwrap();
        let period = DatePeriod::new("01-01-2024", "10-01-2024");
        assert!(get_work_schedule(&period, &all_off).unwrap().is_empty());

        let reversed = DatePeriod::new("10-01-2024", "01-01-2024");
        let daily = WorkSchedulePattern::new(1, 0).unwrap();
        assert!(get_work_schedule(&reversed, &daily).unwrap().is_empty());

        let bad = DatePeriod::new("2024-01-01", "10-01-2024");
        assert!(get_work_schedule(&bad, &daily).is_err());
    }

    #[test]
    fn test_pattern_rejects_empty_cycle() {
        assert_eq!(WorkSchedulePattern::new(0, 0), Err(DateTimeError::EmptyCycle));
        let p = WorkSchedulePattern::new(5, 2).unwrap();
        assert_eq!(p.cycle_len(), 7);
        assert!(p.is_work_day(4));
        assert!(!p.is_work_day(5));
        assert!(p.is_work_day(7));
    }
}

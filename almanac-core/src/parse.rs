//! Date string normalization
//!
//! Parsing is a replaceable capability: every string-taking calendar
//! operation goes through a `DateParser`, which turns text into wall-clock
//! components plus an optional offset. `StandardParser` understands the
//! ISO 8601 and RFC 2822-style strings a browser date parser accepts.
//!
//! Offset rules:
//! - date-only ISO forms (`2024-02-16`) are UTC
//! - anything else without a zone designator uses the parser's local offset

use crate::datetime::{CalendarDate, DateTimeComponents, DateTimeError, MONTH_NAMES, WEEKDAY_NAMES};

/// Turns date strings into normalized components
pub trait DateParser: Send + Sync {
    /// Parse into wall-clock components; `tz_offset` is None when the
    /// string names no zone
    fn parse_components(&self, s: &str) -> Result<DateTimeComponents, DateTimeError>;

    /// Offset in seconds applied to strings without a zone
    fn local_offset(&self) -> i32;

    /// Parse into an instant, viewed in the string's own offset
    fn parse(&self, s: &str) -> Result<CalendarDate, DateTimeError> {
        let mut c = self.parse_components(s)?;
        c.tz_offset = Some(c.tz_offset.unwrap_or_else(|| self.local_offset()));
        CalendarDate::from_components(&c)
    }
}

/// ISO 8601 / RFC 2822 parser with a configurable local offset
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StandardParser {
    local_offset_secs: i32,
}

impl StandardParser {
    /// Parser whose local zone is UTC
    pub fn utc() -> Self {
        Self::default()
    }

    /// Parser whose local zone is a fixed offset east of UTC
    pub fn with_local_offset(local_offset_secs: i32) -> Self {
        Self { local_offset_secs }
    }
}

impl DateParser for StandardParser {
    fn parse_components(&self, s: &str) -> Result<DateTimeComponents, DateTimeError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(parse_err("empty date string"));
        }
        if looks_like_iso(s) {
            parse_iso(s)
        } else {
            parse_textual(s)
        }
    }

    fn local_offset(&self) -> i32 {
        self.local_offset_secs
    }
}

fn parse_err(msg: impl Into<String>) -> DateTimeError {
    DateTimeError::ParseError(msg.into())
}

// ============================================================================
// ISO 8601
// ============================================================================

/// `YYYY` followed by nothing, `-`, `T` or a space
fn looks_like_iso(s: &str) -> bool {
    let b = s.as_bytes();
    b.len() >= 4
        && b[..4].iter().all(u8::is_ascii_digit)
        && matches!(b.get(4), None | Some(b'-') | Some(b'T') | Some(b' '))
}

fn parse_iso(s: &str) -> Result<DateTimeComponents, DateTimeError> {
    let (date_part, time_part) = match s.find(['T', 't', ' ']) {
        Some(pos) => (&s[..pos], Some(s[pos + 1..].trim())),
        None => (s, None),
    };

    let parts: Vec<&str> = date_part.split('-').collect();
    if parts.is_empty() || parts.len() > 3 {
        return Err(parse_err(format!("expected YYYY[-MM[-DD]], got '{}'", date_part)));
    }
    let year: i32 = parse_number(parts[0], "year")?;
    let month: u32 = match parts.get(1) {
        Some(m) => parse_number(m, "month")?,
        None => 1,
    };
    let day: u32 = match parts.get(2) {
        Some(d) => parse_number(d, "day")?,
        None => 1,
    };

    let mut c = DateTimeComponents { year, month, day, ..Default::default() };

    match time_part {
        // Date-only forms are UTC
        None => c.tz_offset = Some(0),
        Some(time) => {
            let (clock, offset) = split_iso_zone(time)?;
            let (hour, minute, second, millisecond) = parse_clock(clock)?;
            c.hour = hour;
            c.minute = minute;
            c.second = second;
            c.millisecond = millisecond;
            c.tz_offset = offset;
        }
    }
    Ok(c)
}

/// Split a trailing `Z`, `+HH:MM` or `-HHMM` off an ISO time
fn split_iso_zone(time: &str) -> Result<(&str, Option<i32>), DateTimeError> {
    if let Some(clock) = time.strip_suffix(['Z', 'z']) {
        return Ok((clock, Some(0)));
    }
    // A sign after HH:MM marks an offset
    if let Some(pos) = time.rfind(['+', '-']) {
        if pos >= 5 {
            let offset = parse_offset(&time[pos..])?;
            return Ok((&time[..pos], Some(offset)));
        }
    }
    Ok((time, None))
}

/// Parse `HH:MM[:SS[.fff]]`
fn parse_clock(s: &str) -> Result<(u32, u32, u32, u32), DateTimeError> {
    let (hms, millis) = match s.find('.') {
        Some(dot) => (&s[..dot], parse_fraction_millis(&s[dot + 1..])?),
        None => (s, 0),
    };
    let parts: Vec<&str> = hms.split(':').collect();
    if parts.len() < 2 || parts.len() > 3 {
        return Err(parse_err(format!("expected HH:MM[:SS], got '{}'", s)));
    }
    let hour = parse_number(parts[0], "hour")?;
    let minute = parse_number(parts[1], "minute")?;
    let second = match parts.get(2) {
        Some(sec) => parse_number(sec, "second")?,
        None => 0,
    };
    Ok((hour, minute, second, millis))
}

/// Fraction digits to milliseconds (extra digits truncated)
fn parse_fraction_millis(s: &str) -> Result<u32, DateTimeError> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(parse_err(format!("invalid fractional seconds '{}'", s)));
    }
    let digits: String = s.chars().chain("000".chars()).take(3).collect();
    parse_number(&digits, "fractional seconds")
}

/// Parse a signed offset: `+05:30`, `-0800`, `+05`
fn parse_offset(s: &str) -> Result<i32, DateTimeError> {
    let (sign, rest) = match s.as_bytes().first() {
        Some(b'+') => (1, &s[1..]),
        Some(b'-') => (-1, &s[1..]),
        _ => return Err(parse_err(format!("invalid offset '{}'", s))),
    };
    let digits: String = rest.chars().filter(|c| *c != ':').collect();
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(parse_err(format!("invalid offset '{}'", s)));
    }
    let (hours, minutes): (i32, i32) = match digits.len() {
        1 | 2 => (parse_number(&digits, "offset hours")?, 0),
        4 => (
            parse_number(&digits[..2], "offset hours")?,
            parse_number(&digits[2..], "offset minutes")?,
        ),
        _ => return Err(parse_err(format!("invalid offset '{}'", s))),
    };
    if minutes > 59 {
        return Err(parse_err(format!("invalid offset minutes in '{}'", s)));
    }
    Ok(sign * (hours * 3600 + minutes * 60))
}

fn parse_number<T: std::str::FromStr>(s: &str, what: &str) -> Result<T, DateTimeError> {
    s.parse().map_err(|_| parse_err(format!("invalid {}: '{}'", what, s)))
}

// ============================================================================
// RFC 2822 and textual forms
// ============================================================================

/// North American zone abbreviations a browser date parser accepts
const NAMED_ZONES: [(&str, i32); 11] = [
    ("UT", 0),
    ("UTC", 0),
    ("GMT", 0),
    ("EST", -5),
    ("EDT", -4),
    ("CST", -6),
    ("CDT", -5),
    ("MST", -7),
    ("MDT", -6),
    ("PST", -8),
    ("PDT", -7),
];

/// Parse forms such as `01 Jan 1970 00:00:00 UTC`,
/// `Fri, 16 Feb 2024 10:00:00 +0100` or `February 16, 2024 3:04 PM`
fn parse_textual(s: &str) -> Result<DateTimeComponents, DateTimeError> {
    let cleaned = strip_comments(s);

    let mut year: Option<i32> = None;
    let mut month: Option<u32> = None;
    let mut day: Option<u32> = None;
    let mut clock: Option<(u32, u32, u32, u32)> = None;
    let mut meridiem: Option<bool> = None; // true = PM
    let mut offset: Option<i32> = None;

    for token in cleaned.split(|c: char| c.is_whitespace() || c == ',').filter(|t| !t.is_empty()) {
        if token.bytes().all(|b| b.is_ascii_digit()) {
            let value: i64 = parse_number(token, "number")?;
            if token.len() <= 2 && day.is_none() && value >= 1 {
                day = Some(u32::try_from(value).map_err(|_| parse_err(format!("day out of range '{}'", token)))?);
            } else if year.is_none() {
                year = Some(i32::try_from(value).map_err(|_| parse_err(format!("year out of range '{}'", token)))?);
            } else {
                return Err(parse_err(format!("unexpected number '{}'", token)));
            }
        } else if token.contains(':') && token.as_bytes()[0].is_ascii_digit() {
            if clock.is_some() {
                return Err(parse_err(format!("duplicate time '{}'", token)));
            }
            clock = Some(parse_clock(token)?);
        } else if token.starts_with(['+', '-']) {
            offset = Some(parse_offset(token)?);
        } else if let Some(pm) = parse_meridiem(token) {
            meridiem = Some(pm);
        } else if let Some(zone) = parse_named_zone(token)? {
            offset = Some(zone);
        } else if let Some(m) = month_from_name(token) {
            month = Some(m);
        } else if is_weekday_name(token) {
            continue;
        } else {
            return Err(parse_err(format!("unrecognized token '{}' in '{}'", token, s)));
        }
    }

    let (year, month, day) = match (year, month, day) {
        (Some(y), Some(m), Some(d)) => (y, m, d),
        _ => return Err(parse_err(format!("missing year, month or day in '{}'", s))),
    };
    let (mut hour, minute, second, millisecond) = clock.unwrap_or((0, 0, 0, 0));
    if let Some(pm) = meridiem {
        if hour == 0 || hour > 12 {
            return Err(DateTimeError::InvalidHour(hour));
        }
        hour = match (pm, hour) {
            (false, 12) => 0,
            (true, 12) => 12,
            (true, h) => h + 12,
            (false, h) => h,
        };
    }

    Ok(DateTimeComponents {
        year,
        month,
        day,
        hour,
        minute,
        second,
        millisecond,
        tz_offset: offset,
    })
}

/// Drop parenthesized comments like `(Coordinated Universal Time)`
fn strip_comments(s: &str) -> String {
    let mut depth = 0usize;
    s.chars()
        .filter(|c| match c {
            '(' => {
                depth += 1;
                false
            }
            ')' => {
                depth = depth.saturating_sub(1);
                false
            }
            _ => depth == 0,
        })
        .collect()
}

fn parse_meridiem(token: &str) -> Option<bool> {
    match token.to_ascii_uppercase().as_str() {
        "AM" | "A.M." => Some(false),
        "PM" | "P.M." => Some(true),
        _ => None,
    }
}

/// `UTC`, `GMT+0100`, `EST`; Ok(None) when the token is not a zone
fn parse_named_zone(token: &str) -> Result<Option<i32>, DateTimeError> {
    if token == "Z" || token == "z" {
        return Ok(Some(0));
    }
    let upper = token.to_ascii_uppercase();
    let split = upper.find(['+', '-']).unwrap_or(upper.len());
    let (name, rest) = upper.split_at(split);
    let Some((_, hours)) = NAMED_ZONES.iter().find(|(zone, _)| *zone == name) else {
        return Ok(None);
    };
    let base = hours * 3600;
    if rest.is_empty() {
        Ok(Some(base))
    } else {
        Ok(Some(base + parse_offset(rest)?))
    }
}

/// Match a month by its first three letters
fn month_from_name(token: &str) -> Option<u32> {
    let lower = token.trim_end_matches('.').to_ascii_lowercase();
    if lower.len() < 3 {
        return None;
    }
    MONTH_NAMES
        .iter()
        .position(|name| name.to_ascii_lowercase().starts_with(lower.as_str()))
        .map(|i| i as u32 + 1)
}

fn is_weekday_name(token: &str) -> bool {
    let lower = token.trim_end_matches('.').to_ascii_lowercase();
    lower.len() >= 3
        && WEEKDAY_NAMES
            .iter()
            .any(|name| name.to_ascii_lowercase().starts_with(lower.as_str()))
}

// ============================================================================
// Fixed-pattern parsing
// ============================================================================

/// Parse with a fixed pattern of `YYYY`, `MM`, `DD`, `HH`, `mm`, `ss`
/// tokens and literal characters. The result is UTC; missing fields
/// default to 1970-01-01 00:00:00.
pub fn parse_pattern(s: &str, pattern: &str) -> Result<CalendarDate, DateTimeError> {
    let s = s.trim();
    let mut c = DateTimeComponents { year: 1970, month: 1, day: 1, ..Default::default() };

    let mut s_pos = 0;
    let mut p_pos = 0;
    let s_bytes = s.as_bytes();
    let p_bytes = pattern.as_bytes();

    while p_pos < p_bytes.len() {
        let token = ["YYYY", "MM", "DD", "HH", "mm", "ss"]
            .into_iter()
            .find(|t| p_bytes[p_pos..].starts_with(t.as_bytes()));

        match token {
            Some(t) => {
                let field = s
                    .get(s_pos..s_pos + t.len())
                    .ok_or_else(|| parse_err(format!("'{}' is too short for '{}'", s, pattern)))?;
                if !field.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(parse_err(format!("expected digits for {} in '{}'", t, s)));
                }
                match t {
                    "YYYY" => c.year = parse_number(field, "year")?,
                    "MM" => c.month = parse_number(field, "month")?,
                    "DD" => c.day = parse_number(field, "day")?,
                    "HH" => c.hour = parse_number(field, "hour")?,
                    "mm" => c.minute = parse_number(field, "minute")?,
                    _ => c.second = parse_number(field, "second")?,
                }
                s_pos += t.len();
                p_pos += t.len();
            }
            None => {
                if s_bytes.get(s_pos) != Some(&p_bytes[p_pos]) {
                    return Err(parse_err(format!(
                        "expected '{}' at position {} of '{}'",
                        p_bytes[p_pos] as char, s_pos, s
                    )));
                }
                s_pos += 1;
                p_pos += 1;
            }
        }
    }
    if s_pos != s_bytes.len() {
        return Err(parse_err(format!("trailing characters in '{}'", s)));
    }

    CalendarDate::from_components(&c)
}

/// Parse a `DD-MM-YYYY` day as UTC midnight
pub fn parse_day_month_year(s: &str) -> Result<CalendarDate, DateTimeError> {
    parse_pattern(s, "DD-MM-YYYY")
}

// ============================================================================
// Tests
// ============================================================================

//! Almanac Core - Fundamental types
//!
//! This crate provides the core types used throughout Almanac:
//! - `CalendarDate`: millisecond instants with an optional fixed offset
//! - `DateParser`: the date string normalization seam
//! - `Value`: runtime values (numbers, text, dates, periods, errors)
//! - `AlmanacError`: structured errors for the dynamic call layer

mod datetime;
mod error;
mod parse;
mod value;

pub use datetime::{
    CalendarDate, DateTimeComponents, DateTimeError,
    is_leap_year, days_in_month, days_from_civil, civil_from_days, iso_weekday_from_days,
    MILLIS_PER_SECOND, MILLIS_PER_MINUTE, MILLIS_PER_HOUR, MILLIS_PER_DAY,
    MAX_OFFSET_SECS, MAX_MILLIS, WEEKDAY_NAMES, MONTH_NAMES, FRIDAY,
};
pub use error::{AlmanacError, ErrorContext, Severity, codes};
pub use parse::{DateParser, StandardParser, parse_pattern, parse_day_month_year};
pub use value::Value;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        AlmanacError, CalendarDate, DateParser, DateTimeError, Severity, StandardParser, Value,
    };
    pub use crate::error::codes;
}

#[cfg(test)]
mod tests {
    use super::*;

    mod value_tests {
        use super::*;

        #[test]
        fn test_from_i64() {
            let v = Value::from(42i64);
            assert_eq!(v.as_number(), Some(42));
        }

        #[test]
        fn test_from_bool() {
            assert_eq!(Value::from(true).as_bool(), Some(true));
        }

        #[test]
        fn test_type_name() {
            assert_eq!(Value::Number(1).type_name(), "Number");
            assert_eq!(Value::from("x").type_name(), "Text");
            assert_eq!(Value::Null.type_name(), "Null");
            let dt = CalendarDate::from_ymd(2024, 1, 1).unwrap();
            assert_eq!(Value::from(dt).type_name(), "Date");
        }

        #[test]
        fn test_period_field_access() {
            let p = Value::period("2024-02-02", "2024-03-02");
            assert_eq!(p.get("start").as_text(), Some("2024-02-02"));
            assert_eq!(p.to_string(), "[2024-02-02 .. 2024-03-02]");
            assert!(p.get("middle").is_error());
            assert!(Value::Number(1).get("start").is_error());
        }

        #[test]
        fn test_list_display() {
            let short = Value::from(vec!["a", "b"]);
            assert_eq!(short.to_string(), "[a, b]");
            let long = Value::from(vec![1i64, 2, 3, 4, 5, 6]);
            assert_eq!(long.to_string(), "[6]");
        }

        #[test]
        fn test_serde_tagged() {
            let v = Value::Number(7);
            let json = serde_json::to_string(&v).unwrap();
            assert_eq!(json, r#"{"type":"Number","value":7}"#);
            let back: Value = serde_json::from_str(&json).unwrap();
            assert_eq!(back, v);
        }
    }

    mod error_tests {
        use super::*;

        #[test]
        fn test_error_construction() {
            let e = AlmanacError::new("TEST", "Test error");
            assert_eq!(e.code, "TEST");
            assert_eq!(e.severity, Severity::Error);
        }

        #[test]
        fn test_error_with_context() {
            let e = AlmanacError::arg_count("getQuarter", 1, 2)
                .in_function("getQuarter")
                .with_note("called from registry");
            let ctx = e.context.unwrap();
            assert_eq!(ctx.function.as_deref(), Some("getQuarter"));
            assert_eq!(ctx.notes, vec!["called from registry".to_string()]);
        }

        #[test]
        fn test_error_display() {
            let e = AlmanacError::undefined_func("getQuartr");
            let s = e.to_string();
            assert!(s.starts_with("[UNDEFINED_FUNC] Unknown function: getQuartr"));
        }

        #[test]
        fn test_from_datetime_error() {
            let e: AlmanacError = DateTimeError::InvalidMonth(13).into();
            assert_eq!(e.code, codes::INVALID_DATE);
            let e: AlmanacError = DateTimeError::ParseError("bad".into()).into();
            assert_eq!(e.code, codes::DATE_PARSE_ERROR);
            let e: AlmanacError = DateTimeError::EmptyCycle.into();
            assert_eq!(e.code, codes::INVALID_PATTERN);
        }
    }
}

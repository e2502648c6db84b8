//! Argument extraction shared by the calendar functions

use crate::calendar::{DatePeriod, WorkSchedulePattern};
use almanac_core::{AlmanacError, CalendarDate, DateTimeError, Value};
use almanac_plugin::EvalContext;

/// Fail unless exactly `expected` arguments were passed
pub fn check_arg_count(args: &[Value], func: &str, expected: usize) -> Result<(), AlmanacError> {
    if args.len() != expected {
        return Err(AlmanacError::arg_count(func, expected, args.len()));
    }
    Ok(())
}

/// Extract a text argument
pub fn extract_text<'a>(value: &'a Value, func: &str, arg: &str) -> Result<&'a str, AlmanacError> {
    match value {
        Value::Text(s) => Ok(s.as_str()),
        Value::Error(e) => Err(e.clone()),
        other => Err(AlmanacError::arg_type(func, arg, "Text", other.type_name())),
    }
}

/// Extract a non-negative integer argument
pub fn extract_u32(value: &Value, func: &str, arg: &str) -> Result<u32, AlmanacError> {
    match value {
        Value::Number(n) => u32::try_from(*n).map_err(|_| {
            AlmanacError::domain_error(format!("{}(): {} must be in 0..={}, got {}", func, arg, u32::MAX, n))
        }),
        Value::Error(e) => Err(e.clone()),
        other => Err(AlmanacError::arg_type(func, arg, "Number", other.type_name())),
    }
}

pub fn extract_i32(value: &Value, func: &str, arg: &str) -> Result<i32, AlmanacError> {
    match value {
        Value::Number(n) => i32::try_from(*n).map_err(|_| {
            AlmanacError::domain_error(format!("{}(): {} out of range, got {}", func, arg, n))
        }),
        Value::Error(e) => Err(e.clone()),
        other => Err(AlmanacError::arg_type(func, arg, "Number", other.type_name())),
    }
}

/// Extract a date viewed in the context's local offset; text is parsed
/// with the context's parser
pub fn extract_date(
    value: &Value,
    func: &str,
    arg: &str,
    ctx: &EvalContext,
) -> Result<CalendarDate, AlmanacError> {
    let date = match value {
        Value::Date(d) => *d,
        Value::Text(s) => ctx.parse_date(s).map_err(|e| date_error(func, e))?,
        Value::Error(e) => return Err(e.clone()),
        other => return Err(AlmanacError::arg_type(func, arg, "Date", other.type_name())),
    };
    date.with_tz_offset(ctx.parser().local_offset())
        .map_err(|e| date_error(func, e))
}

/// Extract an `{start, end}` object of date strings
pub fn extract_period(value: &Value, func: &str, arg: &str) -> Result<DatePeriod, AlmanacError> {
    match value {
        Value::Object(fields) => {
            let field = |name: &str| -> Result<String, AlmanacError> {
                match fields.get(name) {
                    Some(Value::Text(s)) => Ok(s.clone()),
                    Some(Value::Error(e)) => Err(e.clone()),
                    Some(other) => Err(AlmanacError::arg_type(
                        func,
                        &format!("{}.{}", arg, name),
                        "Text",
                        other.type_name(),
                    )),
                    None => Err(AlmanacError::undefined_field(&format!("{}.{}", arg, name))
                        .in_function(func)),
                }
            };
            Ok(DatePeriod::new(field("start")?, field("end")?))
        }
        Value::Error(e) => Err(e.clone()),
        other => Err(AlmanacError::arg_type(func, arg, "Object{start, end}", other.type_name())),
    }
}

/// Work/off pattern from optional arguments, falling back to settings
pub fn extract_pattern(
    work: Option<&Value>,
    off: Option<&Value>,
    func: &str,
    ctx: &EvalContext,
) -> Result<WorkSchedulePattern, AlmanacError> {
    let work_days = match work {
        Some(v) => extract_u32(v, func, "workDays")?,
        None => ctx.settings.default_work_days,
    };
    let off_days = match off {
        Some(v) => extract_u32(v, func, "offDays")?,
        None => ctx.settings.default_off_days,
    };
    WorkSchedulePattern::new(work_days, off_days).map_err(|e| date_error(func, e))
}

/// Convert a calendar failure into an error tagged with the function name
pub fn date_error(func: &str, err: DateTimeError) -> AlmanacError {
    AlmanacError::from(err).in_function(func)
}

#[cfg(test)]
mod tests {
    use super::*;
    use almanac_core::codes;
    use almanac_plugin::CalendarSettings;

    #[test]
    fn test_check_arg_count() {
        assert!(check_arg_count(&[Value::Null], "f", 1).is_ok());
        let err = check_arg_count(&[], "f", 1).unwrap_err();
        assert_eq!(err.code, codes::ARG_COUNT);
    }

    #[test]
    fn test_extract_u32() {
        assert_eq!(extract_u32(&Value::Number(7), "f", "n").unwrap(), 7);
        assert_eq!(extract_u32(&Value::Number(-1), "f", "n").unwrap_err().code, codes::DOMAIN_ERROR);
        assert_eq!(extract_u32(&Value::from("7"), "f", "n").unwrap_err().code, codes::ARG_TYPE);
    }

    #[test]
    fn test_extract_date_from_text() {
        let ctx = EvalContext::default();
        let d = extract_date(&Value::from("2024-02-16"), "f", "date", &ctx).unwrap();
        assert_eq!(d.to_ymd(), (2024, 2, 16));

        let err = extract_date(&Value::from("nope"), "f", "date", &ctx).unwrap_err();
        assert_eq!(err.code, codes::DATE_PARSE_ERROR);
        assert_eq!(err.context.and_then(|c| c.function).as_deref(), Some("f"));
    }

    #[test]
    fn test_extract_date_uses_local_offset() {
        let ctx = EvalContext::new(CalendarSettings::new().with_local_offset(-5 * 3600));
        let d = extract_date(&Value::from("2024-02-16T03:00:00+01:00"), "f", "date", &ctx).unwrap();
        assert_eq!(d.tz_offset(), Some(-5 * 3600));
        assert_eq!((d.to_ymd(), d.hour()), ((2024, 2, 15), 21));

        let utc = CalendarDate::from_ymd_hms(2024, 2, 16, 3, 0, 0).unwrap();
        let d = extract_date(&Value::Date(utc), "f", "date", &ctx).unwrap();
        assert_eq!(d, utc);
        assert_eq!(d.hour(), 22);
    }

    #[test]
    fn test_error_argument_propagates() {
        let original = AlmanacError::domain_error("upstream");
        let v = Value::Error(original.clone());
        assert_eq!(extract_text(&v, "f", "s").unwrap_err(), original);
        assert_eq!(extract_date(&v, "f", "d", &EvalContext::default()).unwrap_err(), original);
    }

    #[test]
    fn test_extract_period() {
        let p = extract_period(&Value::period("a", "b"), "f", "period").unwrap();
        assert_eq!(p, DatePeriod::new("a", "b"));

        let mut fields = std::collections::HashMap::new();
        fields.insert("start".to_string(), Value::from("a"));
        let err = extract_period(&Value::Object(fields), "f", "period").unwrap_err();
        assert_eq!(err.code, codes::UNDEFINED_FIELD);
    }

    #[test]
    fn test_extract_pattern_defaults() {
        let ctx = EvalContext::new(CalendarSettings::new().with_default_pattern(4, 3));
        let p = extract_pattern(None, None, "f", &ctx).unwrap();
        assert_eq!((p.work_days(), p.off_days()), (4, 3));

        let p = extract_pattern(Some(&Value::Number(1)), None, "f", &ctx).unwrap();
        assert_eq!((p.work_days(), p.off_days()), (1, 3));

        let zero = Value::Number(0);
        let err = extract_pattern(Some(&zero), Some(&zero), "f", &ctx).unwrap_err();
        assert_eq!(err.code, codes::INVALID_PATTERN);
    }
}

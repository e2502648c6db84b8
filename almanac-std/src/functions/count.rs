//! Counting functions: getCountDaysInMonth, getCountDaysOnPeriod,
//! isDateInPeriod, getCountWeekendsInMonth

use super::helpers::*;
use crate::calendar;
use almanac_plugin::prelude::*;

static MONTH_YEAR_ARGS: [ArgMeta; 2] = [
    ArgMeta::required("month", "Number", "Month (1-12)"),
    ArgMeta::required("year", "Number", "Year"),
];

/// Extract `(month, year)`
fn month_year(args: &[Value], func: &str) -> Result<(u32, i32), AlmanacError> {
    check_arg_count(args, func, 2)?;
    let month = extract_u32(&args[0], func, "month")?;
    let year = extract_i32(&args[1], func, "year")?;
    Ok((month, year))
}

// ============ getCountDaysInMonth ============

pub struct GetCountDaysInMonth;

static DAYS_IN_MONTH_EXAMPLES: [&str; 2] = [
    "getCountDaysInMonth(2, 2024) → 29",
    "getCountDaysInMonth(2, 2023) → 28",
];
static DAYS_IN_MONTH_RELATED: [&str; 2] = ["getCountWeekendsInMonth", "isLeapYear"];

impl FunctionPlugin for GetCountDaysInMonth {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "getCountDaysInMonth",
            description: "Number of days in a month",
            usage: "getCountDaysInMonth(month, year)",
            args: &MONTH_YEAR_ARGS,
            returns: "Number",
            examples: &DAYS_IN_MONTH_EXAMPLES,
            category: "counting",
            related: &DAYS_IN_MONTH_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        const NAME: &str = "getCountDaysInMonth";
        let (month, year) = match month_year(args, NAME) {
            Ok(v) => v,
            Err(e) => return Value::Error(e),
        };
        match calendar::get_count_days_in_month(month, year) {
            Ok(days) => Value::from(days),
            Err(e) => Value::Error(date_error(NAME, e)),
        }
    }
}

// ============ getCountDaysOnPeriod ============

pub struct GetCountDaysOnPeriod;

static DAYS_ON_PERIOD_ARGS: [ArgMeta; 2] = [
    ArgMeta::required("start", "Text", "First day of the period"),
    ArgMeta::required("end", "Text", "Last day of the period"),
];
static DAYS_ON_PERIOD_EXAMPLES: [&str; 1] = [
    "getCountDaysOnPeriod('2024-02-01T00:00:00Z', '2024-02-02T00:00:00Z') → 2",
];
static DAYS_ON_PERIOD_RELATED: [&str; 1] = ["isDateInPeriod"];

impl FunctionPlugin for GetCountDaysOnPeriod {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "getCountDaysOnPeriod",
            description: "Days in a period, counting both endpoints",
            usage: "getCountDaysOnPeriod(start, end)",
            args: &DAYS_ON_PERIOD_ARGS,
            returns: "Number",
            examples: &DAYS_ON_PERIOD_EXAMPLES,
            category: "counting",
            related: &DAYS_ON_PERIOD_RELATED,
        }
    }

    fn call(&self, args: &[Value], ctx: &EvalContext) -> Value {
        const NAME: &str = "getCountDaysOnPeriod";
        if let Err(e) = check_arg_count(args, NAME, 2) {
            return Value::Error(e);
        }
        let start = match extract_text(&args[0], NAME, "start") {
            Ok(s) => s,
            Err(e) => return Value::Error(e),
        };
        let end = match extract_text(&args[1], NAME, "end") {
            Ok(s) => s,
            Err(e) => return Value::Error(e),
        };

        match calendar::get_count_days_on_period(ctx.parser(), start, end) {
            Ok(days) => Value::Number(days),
            Err(e) => Value::Error(date_error(NAME, e)),
        }
    }
}

// ============ isDateInPeriod ============

pub struct IsDateInPeriod;

static IN_PERIOD_ARGS: [ArgMeta; 2] = [
    ArgMeta::required("date", "Text", "Date to test"),
    ArgMeta::required("period", "Object", "{start, end} date strings, inclusive"),
];
static IN_PERIOD_EXAMPLES: [&str; 1] = [
    "isDateInPeriod('2024-02-02', {start: '2024-02-02', end: '2024-03-02'}) → true",
];
static IN_PERIOD_RELATED: [&str; 1] = ["getCountDaysOnPeriod"];

impl FunctionPlugin for IsDateInPeriod {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "isDateInPeriod",
            description: "Whether a date falls within an inclusive period",
            usage: "isDateInPeriod(date, period)",
            args: &IN_PERIOD_ARGS,
            returns: "Bool",
            examples: &IN_PERIOD_EXAMPLES,
            category: "counting",
            related: &IN_PERIOD_RELATED,
        }
    }

    fn call(&self, args: &[Value], ctx: &EvalContext) -> Value {
        const NAME: &str = "isDateInPeriod";
        if let Err(e) = check_arg_count(args, NAME, 2) {
            return Value::Error(e);
        }
        let date = match extract_text(&args[0], NAME, "date") {
            Ok(s) => s,
            Err(e) => return Value::Error(e),
        };
        let period = match extract_period(&args[1], NAME, "period") {
            Ok(p) => p,
            Err(e) => return Value::Error(e),
        };

        match calendar::is_date_in_period(ctx.parser(), date, &period) {
            Ok(inside) => Value::Bool(inside),
            Err(e) => Value::Error(date_error(NAME, e)),
        }
    }
}

// ============ getCountWeekendsInMonth ============

pub struct GetCountWeekendsInMonth;

static WEEKENDS_EXAMPLES: [&str; 2] = [
    "getCountWeekendsInMonth(2, 2024) → 8",
    "getCountWeekendsInMonth(3, 2024) → 10",
];
static WEEKENDS_RELATED: [&str; 1] = ["getCountDaysInMonth"];

impl FunctionPlugin for GetCountWeekendsInMonth {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "getCountWeekendsInMonth",
            description: "Number of Saturdays and Sundays in a month",
            usage: "getCountWeekendsInMonth(month, year)",
            args: &MONTH_YEAR_ARGS,
            returns: "Number",
            examples: &WEEKENDS_EXAMPLES,
            category: "counting",
            related: &WEEKENDS_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        const NAME: &str = "getCountWeekendsInMonth";
        let (month, year) = match month_year(args, NAME) {
            Ok(v) => v,
            Err(e) => return Value::Error(e),
        };
        match calendar::get_count_weekends_in_month(month, year) {
            Ok(count) => Value::from(count),
            Err(e) => Value::Error(date_error(NAME, e)),
        }
    }
}

//! Conversion functions: dateToTimestamp, getTime, getDayName, formatDate

use super::helpers::*;
use crate::calendar;
use almanac_plugin::prelude::*;

static DATE_STRING_ARGS: [ArgMeta; 1] = [ArgMeta::required(
    "date",
    "Text",
    "ISO 8601 or RFC 2822 date string",
)];

static DATE_ARGS: [ArgMeta; 1] = [ArgMeta::required(
    "date",
    "Date | Text",
    "Date value or date string",
)];

// ============ dateToTimestamp ============

pub struct DateToTimestamp;

static TIMESTAMP_EXAMPLES: [&str; 2] = [
    "dateToTimestamp('01 Jan 1970 00:00:00 UTC') → 0",
    "dateToTimestamp('2024-02-16T10:00:00Z') → 1708077600000",
];
static TIMESTAMP_RELATED: [&str; 1] = ["formatDate"];

impl FunctionPlugin for DateToTimestamp {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "dateToTimestamp",
            description: "Milliseconds since the Unix epoch",
            usage: "dateToTimestamp(date)",
            args: &DATE_STRING_ARGS,
            returns: "Number",
            examples: &TIMESTAMP_EXAMPLES,
            category: "conversion",
            related: &TIMESTAMP_RELATED,
        }
    }

    fn call(&self, args: &[Value], ctx: &EvalContext) -> Value {
        const NAME: &str = "dateToTimestamp";
        if let Err(e) = check_arg_count(args, NAME, 1) {
            return Value::Error(e);
        }
        let date = match extract_text(&args[0], NAME, "date") {
            Ok(s) => s,
            Err(e) => return Value::Error(e),
        };

        match calendar::date_to_timestamp(ctx.parser(), date) {
            Ok(ms) => Value::Number(ms),
            Err(e) => Value::Error(date_error(NAME, e)),
        }
    }
}

// ============ getTime ============

pub struct GetTime;

static TIME_EXAMPLES: [&str; 1] = ["getTime('2024-02-16T09:05:03Z') → '09:05:03'"];
static TIME_RELATED: [&str; 1] = ["formatDate"];

impl FunctionPlugin for GetTime {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "getTime",
            description: "Local time of day as HH:MM:SS (24-hour)",
            usage: "getTime(date)",
            args: &DATE_ARGS,
            returns: "Text",
            examples: &TIME_EXAMPLES,
            category: "conversion",
            related: &TIME_RELATED,
        }
    }

    fn call(&self, args: &[Value], ctx: &EvalContext) -> Value {
        const NAME: &str = "getTime";
        if let Err(e) = check_arg_count(args, NAME, 1) {
            return Value::Error(e);
        }
        match extract_date(&args[0], NAME, "date", ctx) {
            Ok(d) => Value::Text(calendar::get_time(&d)),
            Err(e) => Value::Error(e),
        }
    }
}

// ============ getDayName ============

pub struct GetDayName;

static DAY_NAME_EXAMPLES: [&str; 2] = [
    "getDayName('2024-02-16') → 'Friday'",
    "getDayName('Sun, 18 Feb 2024 08:00:00 GMT') → 'Sunday'",
];
static DAY_NAME_RELATED: [&str; 1] = ["getNextFriday"];

impl FunctionPlugin for GetDayName {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "getDayName",
            description: "English weekday name, read in the date's own offset",
            usage: "getDayName(date)",
            args: &DATE_STRING_ARGS,
            returns: "Text",
            examples: &DAY_NAME_EXAMPLES,
            category: "conversion",
            related: &DAY_NAME_RELATED,
        }
    }

    fn call(&self, args: &[Value], ctx: &EvalContext) -> Value {
        const NAME: &str = "getDayName";
        if let Err(e) = check_arg_count(args, NAME, 1) {
            return Value::Error(e);
        }
        let date = match extract_text(&args[0], NAME, "date") {
            Ok(s) => s,
            Err(e) => return Value::Error(e),
        };

        match calendar::get_day_name(ctx.parser(), date) {
            Ok(name) => Value::from(name),
            Err(e) => Value::Error(date_error(NAME, e)),
        }
    }
}

// ============ formatDate ============

pub struct FormatDate;

static FORMAT_EXAMPLES: [&str; 1] = ["formatDate('2024-02-16T13:05:09Z') → '2/16/2024, 1:05:09 PM'"];
static FORMAT_RELATED: [&str; 2] = ["getTime", "dateToTimestamp"];

impl FunctionPlugin for FormatDate {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "formatDate",
            description: "Format as M/D/YYYY, h:mm:ss AM/PM in UTC",
            usage: "formatDate(date)",
            args: &DATE_STRING_ARGS,
            returns: "Text",
            examples: &FORMAT_EXAMPLES,
            category: "conversion",
            related: &FORMAT_RELATED,
        }
    }

    fn call(&self, args: &[Value], ctx: &EvalContext) -> Value {
        const NAME: &str = "formatDate";
        if let Err(e) = check_arg_count(args, NAME, 1) {
            return Value::Error(e);
        }
        let date = match extract_text(&args[0], NAME, "date") {
            Ok(s) => s,
            Err(e) => return Value::Error(e),
        };

        match calendar::format_date(ctx.parser(), date) {
            Ok(s) => Value::Text(s),
            Err(e) => Value::Error(date_error(NAME, e)),
        }
    }
}

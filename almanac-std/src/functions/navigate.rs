//! Calendar position functions: getNextFriday, getNextFridayThe13th,
//! getWeekNumberByDate, getQuarter, isLeapYear

use super::helpers::*;
use crate::calendar;
use almanac_plugin::prelude::*;

static DATE_ARGS: [ArgMeta; 1] = [ArgMeta::required(
    "date",
    "Date | Text",
    "Date value or date string",
)];

/// Single date argument, for the functions below
fn single_date(args: &[Value], func: &str, ctx: &EvalContext) -> Result<CalendarDate, AlmanacError> {
    check_arg_count(args, func, 1)?;
    extract_date(&args[0], func, "date", ctx)
}

// ============ getNextFriday ============

pub struct GetNextFriday;

static NEXT_FRIDAY_EXAMPLES: [&str; 2] = [
    "getNextFriday('2024-02-14') → 2024-02-16",
    "getNextFriday('2024-02-16') → 2024-02-23",
];
static NEXT_FRIDAY_RELATED: [&str; 2] = ["getNextFridayThe13th", "getDayName"];

impl FunctionPlugin for GetNextFriday {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "getNextFriday",
            description: "Next Friday strictly after the date; a Friday moves a full week",
            usage: "getNextFriday(date)",
            args: &DATE_ARGS,
            returns: "Date",
            examples: &NEXT_FRIDAY_EXAMPLES,
            category: "calendar",
            related: &NEXT_FRIDAY_RELATED,
        }
    }

    fn call(&self, args: &[Value], ctx: &EvalContext) -> Value {
        const NAME: &str = "getNextFriday";
        let date = match single_date(args, NAME, ctx) {
            Ok(d) => d,
            Err(e) => return Value::Error(e),
        };
        match calendar::get_next_friday(&date) {
            Ok(friday) => Value::Date(friday),
            Err(e) => Value::Error(date_error(NAME, e)),
        }
    }
}

// ============ getNextFridayThe13th ============

pub struct GetNextFridayThe13th;

static FRIDAY_13_EXAMPLES: [&str; 1] = ["getNextFridayThe13th('2024-01-01') → 2024-09-13"];
static FRIDAY_13_RELATED: [&str; 1] = ["getNextFriday"];

impl FunctionPlugin for GetNextFridayThe13th {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "getNextFridayThe13th",
            description: "First Friday the 13th strictly after the date",
            usage: "getNextFridayThe13th(date)",
            args: &DATE_ARGS,
            returns: "Date",
            examples: &FRIDAY_13_EXAMPLES,
            category: "calendar",
            related: &FRIDAY_13_RELATED,
        }
    }

    fn call(&self, args: &[Value], ctx: &EvalContext) -> Value {
        const NAME: &str = "getNextFridayThe13th";
        let date = match single_date(args, NAME, ctx) {
            Ok(d) => d,
            Err(e) => return Value::Error(e),
        };
        match calendar::get_next_friday_the_13th(&date) {
            Ok(Some(found)) => Value::Date(found),
            Err(e) => Value::Error(date_error(NAME, e)),
            Ok(None) => Value::Error(
                AlmanacError::new(
                    codes::NOT_FOUND,
                    format!("no Friday the 13th within {} Fridays of {}", calendar::MAX_FRIDAY_STEPS, date),
                )
                .in_function(NAME),
            ),
        }
    }
}

// ============ getWeekNumberByDate ============

pub struct GetWeekNumberByDate;

static WEEK_EXAMPLES: [&str; 2] = [
    "getWeekNumberByDate('2024-01-03') → 1",
    "getWeekNumberByDate('2024-01-31') → 5",
];
static WEEK_RELATED: [&str; 1] = ["getQuarter"];

impl FunctionPlugin for GetWeekNumberByDate {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "getWeekNumberByDate",
            description: "Week of the year; weeks start Monday, week 1 holds January 4",
            usage: "getWeekNumberByDate(date)",
            args: &DATE_ARGS,
            returns: "Number",
            examples: &WEEK_EXAMPLES,
            category: "calendar",
            related: &WEEK_RELATED,
        }
    }

    fn call(&self, args: &[Value], ctx: &EvalContext) -> Value {
        match single_date(args, "getWeekNumberByDate", ctx) {
            Ok(d) => Value::from(calendar::get_week_number_by_date(&d)),
            Err(e) => Value::Error(e),
        }
    }
}

// ============ getQuarter ============

pub struct GetQuarter;

static QUARTER_EXAMPLES: [&str; 2] = ["getQuarter('2024-02-16') → 1", "getQuarter('2024-11-02') → 4"];
static QUARTER_RELATED: [&str; 1] = ["getWeekNumberByDate"];

impl FunctionPlugin for GetQuarter {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "getQuarter",
            description: "Quarter of the year (1-4)",
            usage: "getQuarter(date)",
            args: &DATE_ARGS,
            returns: "Number",
            examples: &QUARTER_EXAMPLES,
            category: "calendar",
            related: &QUARTER_RELATED,
        }
    }

    fn call(&self, args: &[Value], ctx: &EvalContext) -> Value {
        match single_date(args, "getQuarter", ctx) {
            Ok(d) => Value::from(calendar::get_quarter(&d)),
            Err(e) => Value::Error(e),
        }
    }
}

// ============ isLeapYear ============

pub struct IsLeapYear;

static LEAP_EXAMPLES: [&str; 2] = ["isLeapYear('2024-01-01') → true", "isLeapYear('2022-01-01') → false"];
static LEAP_RELATED: [&str; 1] = ["getCountDaysInMonth"];

impl FunctionPlugin for IsLeapYear {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "isLeapYear",
            description: "Whether the date's year is a Gregorian leap year",
            usage: "isLeapYear(date)",
            args: &DATE_ARGS,
            returns: "Bool",
            examples: &LEAP_EXAMPLES,
            category: "calendar",
            related: &LEAP_RELATED,
        }
    }

    fn call(&self, args: &[Value], ctx: &EvalContext) -> Value {
        match single_date(args, "isLeapYear", ctx) {
            Ok(d) => Value::Bool(calendar::is_leap_year(&d)),
            Err(e) => Value::Error(e),
        }
    }
}

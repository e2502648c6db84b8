//! Work schedule generation

use super::helpers::*;
use crate::calendar;
use almanac_plugin::prelude::*;

pub struct GetWorkSchedule;

static SCHEDULE_ARGS: [ArgMeta; 3] = [
    ArgMeta::required("period", "Object", "{start, end} as DD-MM-YYYY, inclusive"),
    ArgMeta::optional("workDays", "Number", "Work days per cycle", "settings.default_work_days"),
    ArgMeta::optional("offDays", "Number", "Off days per cycle", "settings.default_off_days"),
];
static SCHEDULE_EXAMPLES: [&str; 2] = [
    "getWorkSchedule({start: '01-01-2024', end: '15-01-2024'}, 1, 3) → ['01-01-2024', '05-01-2024', '09-01-2024', '13-01-2024']",
    "getWorkSchedule({start: '01-01-2024', end: '31-01-2024'})",
];
static SCHEDULE_RELATED: [&str; 1] = ["getCountDaysOnPeriod"];

impl FunctionPlugin for GetWorkSchedule {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "getWorkSchedule",
            description: "Work days of a repeating work/off cycle starting on the period's first day",
            usage: "getWorkSchedule(period, workDays?, offDays?)",
            args: &SCHEDULE_ARGS,
            returns: "List<Text>",
            examples: &SCHEDULE_EXAMPLES,
            category: "schedule",
            related: &SCHEDULE_RELATED,
        }
    }

    fn call(&self, args: &[Value], ctx: &EvalContext) -> Value {
        const NAME: &str = "getWorkSchedule";
        if args.is_empty() || args.len() > 3 {
            return Value::Error(
                AlmanacError::arg_count(NAME, 3, args.len()).with_note("workDays and offDays are optional"),
            );
        }

        let period = match extract_period(&args[0], NAME, "period") {
            Ok(p) => p,
            Err(e) => return Value::Error(e),
        };
        let pattern = match extract_pattern(args.get(1), args.get(2), NAME, ctx) {
            Ok(p) => p,
            Err(e) => return Value::Error(e),
        };

        match calendar::get_work_schedule(&period, &pattern) {
            Ok(days) => Value::from(days),
            Err(e) => Value::Error(date_error(NAME, e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(items: &[&str]) -> Value {
        Value::from(items.to_vec())
    }

    #[test]
    fn test_work_schedule() {
        let ctx = EvalContext::default();
        let args = [Value::period("01-01-2024", "15-01-2024"), Value::Number(1), Value::Number(3)];
        assert_eq!(
            GetWorkSchedule.call(&args, &ctx),
            texts(&["01-01-2024", "05-01-2024", "09-01-2024", "13-01-2024"])
        );
    }

    #[test]
    fn test_default_pattern_from_settings() {
        let ctx = EvalContext::default();
        // 5 on, 2 off starting Monday 01-01-2024
        let result = GetWorkSchedule.call(&[Value::period("01-01-2024", "09-01-2024")], &ctx);
        assert_eq!(
            result,
            texts(&["01-01-2024", "02-01-2024", "03-01-2024", "04-01-2024", "05-01-2024", "08-01-2024", "09-01-2024"])
        );
    }

    #[test]
    fn test_invalid_inputs() {
        let ctx = EvalContext::default();
        let empty_cycle = [Value::period("01-01-2024", "02-01-2024"), Value::Number(0), Value::Number(0)];
        let result = GetWorkSchedule.call(&empty_cycle, &ctx);
        assert_eq!(result.as_error().map(|e| e.code.as_str()), Some(codes::INVALID_PATTERN));

        let iso_period = [Value::period("2024-01-01", "2024-01-02"), Value::Number(1), Value::Number(1)];
        let result = GetWorkSchedule.call(&iso_period, &ctx);
        assert_eq!(result.as_error().map(|e| e.code.as_str()), Some(codes::DATE_PARSE_ERROR));

        let result = GetWorkSchedule.call(&[], &ctx);
        assert_eq!(result.as_error().map(|e| e.code.as_str()), Some(codes::ARG_COUNT));
    }
}

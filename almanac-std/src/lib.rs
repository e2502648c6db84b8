//! Almanac Standard Library
//!
//! `calendar` holds the typed operations; `functions` wraps each one as a
//! `FunctionPlugin` registered under its camelCase name.

pub mod calendar;
pub mod functions;

pub use calendar::{DatePeriod, WorkSchedulePattern};

use almanac_plugin::PluginRegistry;

/// Load standard library into registry
pub fn load_standard_library(registry: PluginRegistry) -> PluginRegistry {
    registry
        // Conversion
        .with_function(functions::DateToTimestamp)
        .with_function(functions::GetTime)
        .with_function(functions::GetDayName)
        .with_function(functions::FormatDate)
        // Counting
        .with_function(functions::GetCountDaysInMonth)
        .with_function(functions::GetCountDaysOnPeriod)
        .with_function(functions::IsDateInPeriod)
        .with_function(functions::GetCountWeekendsInMonth)
        // Calendar position
        .with_function(functions::GetNextFriday)
        .with_function(functions::GetNextFridayThe13th)
        .with_function(functions::GetWeekNumberByDate)
        .with_function(functions::GetQuarter)
        .with_function(functions::IsLeapYear)
        // Schedules
        .with_function(functions::GetWorkSchedule)
}

/// Create registry with standard library
pub fn standard_registry() -> PluginRegistry {
    load_standard_library(PluginRegistry::new())
}

//! Calendar functions exposed through the plugin registry

mod helpers;
mod convert;
mod count;
mod navigate;
mod schedule;

pub use convert::{DateToTimestamp, GetTime, GetDayName, FormatDate};
pub use count::{GetCountDaysInMonth, GetCountDaysOnPeriod, IsDateInPeriod, GetCountWeekendsInMonth};
pub use navigate::{GetNextFriday, GetNextFridayThe13th, GetWeekNumberByDate, GetQuarter, IsLeapYear};
pub use schedule::GetWorkSchedule;

//! Evaluation Context

use almanac_core::{CalendarDate, DateParser, DateTimeError};
use crate::CalendarSettings;
use std::sync::Arc;

/// Evaluation context passed to plugins
pub struct EvalContext {
    pub settings: CalendarSettings,
    parser: Arc<dyn DateParser>,
}

impl EvalContext {
    /// Context whose parser follows `settings`
    pub fn new(settings: CalendarSettings) -> Self {
        Self {
            parser: Arc::new(settings.parser()),
            settings,
        }
    }

    /// Replace the date parser
    pub fn with_parser(mut self, parser: Arc<dyn DateParser>) -> Self {
        self.parser = parser;
        self
    }

    pub fn parser(&self) -> &dyn DateParser {
        self.parser.as_ref()
    }

    pub fn parse_date(&self, s: &str) -> Result<CalendarDate, DateTimeError> {
        self.parser.parse(s)
    }
}

impl Default for EvalContext {
    fn default() -> Self {
        Self::new(CalendarSettings::default())
    }
}

//! Almanac - calendar math utilities
//!
//! Pure date/time calculations (timestamps, weekdays, weekend counts,
//! week numbers, work schedules) available two ways:
//! - typed functions in [`calendar`]
//! - named dispatch through [`Almanac::call`], which never panics and
//!   reports failures as `Value::Error`

pub mod logging;

pub use almanac_core::{
    AlmanacError, CalendarDate, DateParser, DateTimeComponents, DateTimeError, StandardParser,
    Value,
};
pub use almanac_plugin::{CalendarSettings, EvalContext, PluginRegistry};
pub use almanac_std::{calendar, DatePeriod, WorkSchedulePattern};

use std::sync::Arc;
use tracing::debug;

/// Main Almanac engine
pub struct Almanac {
    registry: Arc<PluginRegistry>,
    settings: CalendarSettings,
    parser: Option<Arc<dyn DateParser>>,
}

impl Almanac {
    pub fn new(registry: PluginRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
            settings: CalendarSettings::default(),
            parser: None,
        }
    }

    pub fn with_standard_library() -> Self {
        Self::new(almanac_std::standard_registry())
    }

    pub fn with_settings(mut self, settings: CalendarSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Apply settings from a JSON document
    pub fn with_settings_json(self, json: &str) -> Result<Self, AlmanacError> {
        let settings = CalendarSettings::from_json(json)?;
        debug!(?settings, "loaded calendar settings");
        Ok(self.with_settings(settings))
    }

    /// Replace the date parser derived from settings
    pub fn with_parser(mut self, parser: Arc<dyn DateParser>) -> Self {
        self.parser = Some(parser);
        self
    }

    pub fn settings(&self) -> &CalendarSettings {
        &self.settings
    }

    pub fn registry(&self) -> &PluginRegistry {
        &self.registry
    }

    /// Context handed to every function call
    pub fn context(&self) -> EvalContext {
        let ctx = EvalContext::new(self.settings);
        match &self.parser {
            Some(parser) => ctx.with_parser(Arc::clone(parser)),
            None => ctx,
        }
    }

    /// Call a function by name (case-insensitive)
    pub fn call(&self, name: &str, args: &[Value]) -> Value {
        self.registry.call_function(name, args, &self.context())
    }

    /// Call a function and render the result as JSON
    pub fn call_json(&self, name: &str, args: &[Value]) -> Result<String, AlmanacError> {
        let result = self.call(name, args);
        serde_json::to_string(&result).map_err(|e| AlmanacError::internal(e.to_string()))
    }

    pub fn help(&self, name: Option<&str>) -> Value {
        self.registry.help(name)
    }

    pub fn list_functions(&self, category: Option<&str>) -> Value {
        self.registry.list_functions(category)
    }
}

impl Default for Almanac {
    fn default() -> Self {
        Self::with_standard_library()
    }
}

/// Build an argument list: `args!["2024-02-16", 3]`
#[macro_export]
macro_rules! args {
    () => { Vec::<$crate::Value>::new() };
    ($($value:expr),+ $(,)?) => {
        vec![$($crate::Value::from($value)),+]
    };
}

//! Calendar settings
//!
//! Settings are plain data: built in code or deserialized from JSON.
//! Every field has a default, so `{}` is a valid settings document.

use almanac_core::{codes, AlmanacError, StandardParser, MAX_OFFSET_SECS};
use serde::{Deserialize, Serialize};

/// Settings shared by every call made through a context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarSettings {
    /// Offset (seconds east of UTC) for date strings that name no zone
    pub local_offset_secs: i32,
    /// Work days used when `getWorkSchedule` omits them
    pub default_work_days: u32,
    /// Off days used when `getWorkSchedule` omits them
    pub default_off_days: u32,
}

impl Default for CalendarSettings {
    fn default() -> Self {
        Self {
            local_offset_secs: 0,
            default_work_days: 5,
            default_off_days: 2,
        }
    }
}

impl CalendarSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_local_offset(mut self, offset_secs: i32) -> Self {
        self.local_offset_secs = offset_secs;
        self
    }

    pub fn with_default_pattern(mut self, work_days: u32, off_days: u32) -> Self {
        self.default_work_days = work_days;
        self.default_off_days = off_days;
        self
    }

    /// Parse and validate a JSON settings document
    pub fn from_json(json: &str) -> Result<Self, AlmanacError> {
        let settings: Self = serde_json::from_str(json).map_err(|e| {
            AlmanacError::new(codes::INVALID_SETTINGS, format!("Invalid settings: {}", e))
        })?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), AlmanacError> {
        if self.local_offset_secs.unsigned_abs() > MAX_OFFSET_SECS as u32 {
            return Err(AlmanacError::domain_error(format!(
                "local_offset_secs {} exceeds +/-{}",
                self.local_offset_secs, MAX_OFFSET_SECS
            )));
        }
        if self.default_work_days == 0 && self.default_off_days == 0 {
            return Err(AlmanacError::invalid_pattern("default pattern has no days"));
        }
        Ok(())
    }

    /// Parser honoring the configured local offset
    pub fn parser(&self) -> StandardParser {
        StandardParser::with_local_offset(self.local_offset_secs)
    }
}

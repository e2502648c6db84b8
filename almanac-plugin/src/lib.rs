//! Almanac Plugin System
//!
//! Provides the `FunctionPlugin` trait for calendar functions, the registry
//! that dispatches calls by name, and the context and settings passed to
//! every call.

mod traits;
mod registry;
mod context;
mod settings;

pub use traits::{FunctionPlugin, FunctionMeta, ArgMeta};
pub use registry::PluginRegistry;
pub use context::EvalContext;
pub use settings::CalendarSettings;

/// Re-export core types for plugin authors
pub mod prelude {
    pub use crate::{
        FunctionPlugin, FunctionMeta, ArgMeta,
        PluginRegistry, EvalContext, CalendarSettings,
    };
    pub use almanac_core::prelude::*;
}

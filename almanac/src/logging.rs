use tracing_subscriber::EnvFilter;

/// Workspace crate targets that should receive log output.
const CRATE_TARGETS: &[&str] = &["almanac", "almanac_core", "almanac_plugin", "almanac_std"];

/// Initialize tracing for an embedding application.
///
/// Mapping:
/// - 0 -> warn
/// - 1 -> info
/// - 2 -> debug
/// - 3+ -> trace
///
/// `RUST_LOG` overrides the verbosity if set. Calling this twice is a
/// no-op, since only one global subscriber can be installed.
pub fn init(verbosity: u8) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter(verbosity)));

    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

fn default_filter(verbosity: u8) -> String {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    CRATE_TARGETS
        .iter()
        .map(|t| format!("{t}={level}"))
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter() {
        assert_eq!(
            default_filter(0),
            "almanac=warn,almanac_core=warn,almanac_plugin=warn,almanac_std=warn"
        );
        assert!(default_filter(2).contains("almanac_std=debug"));
        assert!(default_filter(9).contains("almanac=trace"));
    }

    #[test]
    fn test_init_twice() {
        init(0);
        init(3);
    }
}

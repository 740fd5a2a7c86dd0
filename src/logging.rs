//! Diagnostic logging.
//!
//! Logs are `tracing` events written to stderr so they never mix with
//! results on stdout. `CZDS_LOG` takes an `EnvFilter` directive and wins over
//! `--verbose`.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Environment variable holding an explicit filter directive.
pub const LOG_ENV_VAR: &str = "CZDS_LOG";

/// Filter directive used when `CZDS_LOG` is unset.
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "czds_request=debug,warn"
    } else {
        "warn"
    }
}

fn build_filter(env_value: Option<String>, verbose: bool) -> EnvFilter {
    env_value
        .filter(|value| !value.trim().is_empty())
        .and_then(|value| EnvFilter::try_new(value).ok())
        .unwrap_or_else(|| EnvFilter::new(default_directive(verbose)))
}

/// Install the global subscriber. Safe to call more than once; later calls
/// are ignored.
pub fn init_logging(verbose: bool, color: bool) {
    let filter = build_filter(std::env::var(LOG_ENV_VAR).ok(), verbose);
    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(color)
        .with_target(verbose);
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::filter::LevelFilter;

    #[test]
    fn verbose_raises_level_to_debug() {
        let quiet = build_filter(None, false);
        let verbose = build_filter(None, true);
        assert_eq!(quiet.max_level_hint(), Some(LevelFilter::WARN));
        assert_eq!(verbose.max_level_hint(), Some(LevelFilter::DEBUG));
    }

    #[test]
    fn explicit_directive_wins() {
        let filter = build_filter(Some("czds_request=trace".into()), false);
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::TRACE));
    }

    #[test]
    fn blank_directive_falls_back() {
        let filter = build_filter(Some("   ".into()), true);
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::DEBUG));
    }
}

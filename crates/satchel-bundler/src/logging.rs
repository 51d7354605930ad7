//! Subscriber setup for binaries embedding satchel (`logging` feature).
//!
//! The library itself only emits `tracing` events:
//!
//! - `warn`: references that resolve to no file, dependencies that fail to
//!   load during a walk, cached bundles that no longer deserialize
//! - `debug`: walk summaries, assembled bundle size and hash, cache hits and
//!   clears
//! - `trace`: ignored paths, bare specifiers left to the host, failed probes
//!
//! Libraries should install their own subscriber. [`init_logging`] is for
//! small tools that just want readable output on stderr.

use std::sync::Once;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

static INIT: Once = Once::new();

/// Most verbose satchel event category that should be printed.
///
/// Defaults to [`LogLevel::Warn`], which shows unresolved references and
/// dependencies that could not be loaded, and nothing on a clean build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Silent,
    Error,
    #[default]
    Warn,
    Info,
    /// Adds walk and assembly summaries and cache activity.
    Debug,
    /// Adds per-reference resolution detail. Noisy on large graphs.
    Trace,
}

impl LogLevel {
    const ALL: [LogLevel; 6] = [
        LogLevel::Silent,
        LogLevel::Error,
        LogLevel::Warn,
        LogLevel::Info,
        LogLevel::Debug,
        LogLevel::Trace,
    ];

    /// `EnvFilter` directive for this level.
    pub fn directive(self) -> &'static str {
        match self {
            LogLevel::Silent => "off",
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown log level '{0}' (expected silent, error, warn, info, debug or trace)")]
pub struct ParseLogLevelError(String);

impl std::str::FromStr for LogLevel {
    type Err = ParseLogLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        match wanted.as_str() {
            "silent" => return Ok(LogLevel::Silent),
            "warning" => return Ok(LogLevel::Warn),
            _ => {}
        }
        LogLevel::ALL
            .into_iter()
            .find(|level| level.directive() == wanted)
            .ok_or_else(|| ParseLogLevelError(s.to_string()))
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.directive())
    }
}

/// Install a stderr subscriber at `level` unless `RUST_LOG` is set.
///
/// Only the first call in a process has any effect.
///
/// ```rust,no_run
/// use satchel_bundler::logging::{LogLevel, init_logging};
///
/// init_logging(LogLevel::Debug);
/// ```
pub fn init_logging(level: LogLevel) {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.directive()));

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().compact().with_target(false).without_time())
            .init();
    });
}

/// [`init_logging`] at the default level, so only `RUST_LOG` changes output.
pub fn init_logging_from_env() {
    init_logging(LogLevel::default());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepts_directives_and_aliases() {
        for level in LogLevel::ALL {
            assert_eq!(level.directive().parse::<LogLevel>().unwrap(), level);
        }
        assert_eq!("silent".parse::<LogLevel>().unwrap(), LogLevel::Silent);
        assert_eq!(" Warning ".parse::<LogLevel>().unwrap(), LogLevel::Warn);
        assert_eq!("DEBUG".parse::<LogLevel>().unwrap(), LogLevel::Debug);
    }

    #[test]
    fn test_parse_rejects_unknown() {
        let err = "loud".parse::<LogLevel>().unwrap_err();
        assert!(err.to_string().starts_with("unknown log level 'loud'"));
    }

    #[test]
    fn test_levels_are_ordered_by_verbosity() {
        assert!(LogLevel::Silent < LogLevel::Warn);
        assert!(LogLevel::Debug < LogLevel::Trace);
        assert_eq!(LogLevel::default().to_string(), "warn");
    }
}

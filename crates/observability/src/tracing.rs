//! Tracing/logging initialization.
//!
//! Filtering comes from `RUST_LOG` (default `info`).

use std::str::FromStr;

use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Output format of the fmt subscriber.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// One JSON object per event.
    #[default]
    Json,
    /// Human-readable multi-line output for local runs.
    Pretty,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown log format '{0}' (expected 'json' or 'pretty')")]
pub struct ParseLogFormatError(String);

impl FromStr for LogFormat {
    type Err = ParseLogFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "pretty" => Ok(LogFormat::Pretty),
            other => Err(ParseLogFormatError(other.to_string())),
        }
    }
}

/// Initialize tracing/logging for the process.
///
/// Safe to call multiple times (subsequent calls are no-ops).
pub fn init(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    let installed = match format {
        LogFormat::Json => builder
            .json()
            .with_timer(tracing_subscriber::fmt::time::SystemTime)
            .with_target(false)
            .try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
    };
    if installed.is_ok() {
        ::tracing::debug!(?format, "tracing subscriber installed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_formats_ignoring_case() {
        assert_eq!("json".parse(), Ok(LogFormat::Json));
        assert_eq!(" Pretty ".parse(), Ok(LogFormat::Pretty));
    }

    #[test]
    fn rejects_unknown_format() {
        assert_eq!(
            "xml".parse::<LogFormat>(),
            Err(ParseLogFormatError("xml".to_string()))
        );
    }

    #[test]
    fn init_twice_is_a_no_op() {
        init(LogFormat::Pretty);
        init(LogFormat::Json);
        ::tracing::info!("still logging after a second init");
    }
}

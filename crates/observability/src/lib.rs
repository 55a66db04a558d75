//! Tracing/logging setup shared by the catalog binaries and tests.

/// Tracing configuration (filters, layers).
pub mod tracing;

pub use self::tracing::{LogFormat, ParseLogFormatError};

/// Initialize process-wide tracing/logging.
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init(format: LogFormat) {
    self::tracing::init(format);
}

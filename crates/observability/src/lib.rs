//! Tracing setup shared by every entry point.

/// Subscriber selection and installation.
pub mod logging;

pub use logging::{LOG_FORMAT_ENV, LogFormat};

/// Initialize process-wide logging.
///
/// Safe to call multiple times; subsequent calls are no-ops.
pub fn init() {
    logging::init(LogFormat::from_env());
}

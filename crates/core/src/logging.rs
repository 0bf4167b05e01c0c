//! Logging infrastructure for Docent.
//!
//! This module initializes the tracing subscriber for structured logging.
//! All logs are emitted to stderr to keep stdout clean for answer output.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::error::AppResult;

/// Initialize the tracing subscriber with stderr output.
///
/// This sets up structured logging with:
/// - Output to stderr (stdout is reserved for answers)
/// - Environment-based filtering (RUST_LOG or provided level)
/// - Optional ANSI color control
///
/// # Arguments
/// * `log_level` - Optional log level override (e.g., "debug", "info")
/// * `no_color` - Disable colored output
pub fn init_logging(log_level: Option<&str>, no_color: bool) -> AppResult<()> {
    let default_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    let filter_str = log_level.unwrap_or(&default_level);

    let env_filter = EnvFilter::try_new(filter_str)
        .map_err(|e| crate::error::AppError::Config(format!("Invalid log filter: {}", e)))?;

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_ansi(!no_color && supports_color());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| crate::error::AppError::Config(format!("Failed to init logging: {}", e)))?;

    Ok(())
}

/// Check if the terminal supports color output.
fn supports_color() -> bool {
    std::env::var("NO_COLOR").is_err()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_logging() {
        // Note: Can only be called once per process
        let result = init_logging(None, false);
        assert!(result.is_ok() || result.is_err()); // May already be initialized
    }
}

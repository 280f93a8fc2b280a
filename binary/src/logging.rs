use tracing_subscriber::{fmt, prelude::*, EnvFilter, Registry};

/// Level used when neither `--log-level` nor `RUST_LOG` is given
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Build the log filter
///
/// An explicit level takes precedence over `RUST_LOG`.
pub fn log_filter(level: Option<&str>) -> Result<EnvFilter, tracing_subscriber::filter::ParseError> {
    match level {
        Some(level) => EnvFilter::try_new(level),
        None => Ok(EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL))),
    }
}

/// Install a compact stderr subscriber
///
/// Stdout stays reserved for DOT output.
pub fn init_logging(level: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let filter = log_filter(level)?;
    Registry::default()
        .with(filter)
        .with(
            fmt::Layer::default()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_level(true),
        )
        .try_init()?;
    Ok(())
}

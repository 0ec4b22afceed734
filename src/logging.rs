use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Installs the global subscriber. An explicit level wins over `RUST_LOG`;
/// with neither set the filter is `info`.
pub fn init(level: Option<&str>) {
    let filter = match level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };

    let stderr_layer = fmt::layer().with_writer(std::io::stderr).with_target(false);

    if tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .try_init()
        .is_err()
    {
        tracing::debug!("logging already initialized");
    }
}

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub fn init() {
    // Diagnostics go to stderr; stdout is reserved for the usage line.
    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    let filter_layer = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();
}

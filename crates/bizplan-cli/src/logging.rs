use tracing_subscriber::{fmt, EnvFilter};

/// Install the stderr subscriber. `RUST_LOG` wins over the default level;
/// `--verbose` raises the default to debug.
pub fn init_tracing(verbose: bool) {
    let default_level = if verbose { "bizplan_core=debug" } else { "bizplan_core=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "content_analyzer=info";

/// Installs the stderr fmt subscriber. `RUST_LOG` overrides the default
/// filter; `verbose` raises this crate to debug.
pub fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if verbose {
            "content_analyzer=debug"
        } else {
            DEFAULT_FILTER
        })
    });

    // A second call (e.g. from tests) keeps the first subscriber
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init();
}

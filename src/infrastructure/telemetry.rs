// Infrastructure: tracing subscriber for the binary

use tracing_subscriber::EnvFilter;

/// Install a formatting subscriber; `RUST_LOG` overrides the default filter
pub fn init_tracing(verbose: bool) {
    let default_directive = if verbose { "blendopt=debug" } else { "blendopt=info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    // a second call (tests, embedding) keeps the first subscriber
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Per-row outcomes are info/warn/error events, so the default level must
/// keep all of them; `--verbose` adds the debug trail and `RUST_LOG` wins
/// over both.
fn env_filter(verbose: bool) -> EnvFilter {
    let default = if verbose {
        "user_upload=debug,info"
    } else {
        "user_upload=info"
    };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

/// Installs the global subscriber: compact lines for a terminal, or one
/// JSON object per event when `json` is set.
pub fn init_logger(verbose: bool, json: bool) {
    let compact = (!json).then(|| fmt::layer().with_target(false).compact());
    let json = json.then(|| fmt::layer().with_target(false).json());

    tracing_subscriber::registry()
        .with(env_filter(verbose))
        .with(compact)
        .with(json)
        .init();
}

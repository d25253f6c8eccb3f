use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Default filter when `RUST_LOG` is unset.
const DEFAULT_FILTER: &str = "info,sqlx=warn";

/// Install the JSON stdout subscriber for a service binary.
///
/// `RUST_LOG` overrides [`DEFAULT_FILTER`]. Only the first call installs a
/// subscriber; it returns `false` when one was already set.
pub fn init_tracing(service: &'static str) -> bool {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().json().with_current_span(false))
        .try_init()
        .is_ok();
    if installed {
        tracing::info!(service, "tracing initialized");
    }
    installed
}

use std::sync::Once;

use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt as _};

static INIT: Once = Once::new();

/// Install the global tracing subscriber
///
/// The filter comes from `RUST_LOG` and falls back to `info`. Records emitted through the `log`
/// facade are forwarded into tracing. Calling this more than once is a no-op.
pub fn init() {
    INIT.call_once(|| {
        if let Err(error) = tracing_log::LogTracer::init() {
            eprintln!("log bridge already installed: {error}");
        }

        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let subscriber = tracing_subscriber::registry().with(filter).with(fmt::layer());

        if tracing::subscriber::set_global_default(subscriber).is_err() {
            debug!("global subscriber already set, keeping it");
        }
    });
}

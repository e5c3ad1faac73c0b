// packages/interpose-engine/src/observability/mod.rs
//! Tracing and metrics setup
//!
//! The engine logs through `tracing` and counts through the `metrics`
//! facade. Installing a metrics recorder/exporter is left to the host.

use crate::utils::config::LoggingConfig;
use crate::utils::errors::{EngineError, Result};
use once_cell::sync::OnceCell;
use tracing_subscriber::EnvFilter;

/// Wrappers installed (first attach on an operation)
pub const INSTALL_COUNTER: &str = "interpose_wrapper_installs_total";

/// Wrappers removed and originals restored
pub const UNINSTALL_COUNTER: &str = "interpose_wrapper_uninstalls_total";

/// Calls routed through a wrapper's dispatcher
pub const DISPATCH_COUNTER: &str = "interpose_dispatches_total";

static TRACING: OnceCell<()> = OnceCell::new();

/// Install the global tracing subscriber
///
/// `RUST_LOG` takes precedence over `config.filter`. Calling this more than
/// once is a no-op.
pub fn init_tracing(config: &LoggingConfig) -> Result<()> {
    TRACING
        .get_or_try_init(|| {
            let filter = EnvFilter::try_from_default_env()
                .or_else(|_| EnvFilter::try_new(&config.filter))
                .map_err(|e| EngineError::ConfigError(format!("Invalid log filter: {}", e)))?;

            let builder = tracing_subscriber::fmt().with_env_filter(filter);
            let installed = if config.json {
                builder.json().try_init()
            } else {
                builder.try_init()
            };

            installed.map_err(|e| EngineError::ConfigError(e.to_string()))
        })
        .map(|_| ())
}

/// Register descriptions for the engine's counters
pub fn init_metrics() {
    metrics::describe_counter!(INSTALL_COUNTER, "Wrappers installed on operations");
    metrics::describe_counter!(UNINSTALL_COUNTER, "Wrappers removed, originals restored");
    metrics::describe_counter!(DISPATCH_COUNTER, "Calls routed through a wrapper");
}

/// Run `f` under a scoped subscriber and return everything it logged
#[cfg(test)]
pub(crate) fn capture_logs<T>(f: impl FnOnce() -> T) -> (T, String) {
    use parking_lot::Mutex;
    use std::io;
    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct Buffer(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Buffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    let buffer = Buffer::default();
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_max_level(tracing::Level::TRACE)
        .with_ansi(false)
        .finish();

    let result = tracing::subscriber::with_default(subscriber, f);
    let output = String::from_utf8_lossy(&buffer.0.lock()).into_owned();
    (result, output)
}

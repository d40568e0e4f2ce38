//! Logging setup.
//!
//! Logs go to stderr so command output on stdout stays clean. The filter is
//! read from `RUST_LOG` and defaults to `blogdb=info`.

use std::sync::Once;

use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "blogdb=info";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Profile {
    /// Human-readable lines
    #[default]
    Pretty,
    /// One JSON object per event
    Json,
}

static INIT_ONCE: Once = Once::new();

fn filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global subscriber. Later calls are no-ops.
pub fn init(profile: Profile) {
    INIT_ONCE.call_once(|| {
        let builder = tracing_subscriber::fmt()
            .with_env_filter(filter())
            .with_writer(std::io::stderr);
        // A subscriber installed elsewhere (e.g. by a test harness) wins.
        let _ = match profile {
            Profile::Pretty => builder.try_init(),
            Profile::Json => builder.json().try_init(),
        };
    });
}

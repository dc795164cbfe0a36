//! # Logging
//!
//! Installs the stderr subscriber. `STREAMGEN_LOG` takes a plain level
//! (`trace` .. `error`) or a full filter spec such as `streamgen_core=debug`.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Environment variable holding the log level or filter spec.
pub const LOG_ENV: &str = "STREAMGEN_LOG";

const LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error", "off"];

fn is_plain_level(value: &str) -> bool {
    LEVELS.contains(&value.trim().to_ascii_lowercase().as_str())
}

/// Turns the raw `STREAMGEN_LOG` value into a filter directive.
pub fn filter_spec(raw: Option<&str>) -> String {
    match raw.map(str::trim).filter(|v| !v.is_empty()) {
        Some(level) if is_plain_level(level) => {
            let level = level.to_ascii_lowercase();
            format!("streamgen_core={level},streamgen={level}")
        }
        Some(spec) => spec.to_string(),
        None => "streamgen_core=info,streamgen=info".to_string(),
    }
}

/// Installs the global subscriber; a second call only warns.
pub fn init_tracing() {
    let raw = std::env::var(LOG_ENV).ok();
    let filter = filter_spec(raw.as_deref());

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_filter(EnvFilter::new(filter));

    if tracing_subscriber::registry().with(fmt_layer).try_init().is_err() {
        eprintln!("Warning: tracing subscriber already initialized");
    }
}

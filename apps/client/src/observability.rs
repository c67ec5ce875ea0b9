use std::sync::OnceLock;

use tracing_subscriber::EnvFilter;
use uuid::Uuid;

/// Checked in order; the first non-blank value is the filter directive.
const LOG_LEVEL_VARS: [&str; 2] = ["CAMPUS_LOG_LEVEL", "RUST_LOG"];
const DEFAULT_DIRECTIVE: &str = "info";

static PROCESS_TRACE_ID: OnceLock<String> = OnceLock::new();

fn filter_directive(lookup: impl Fn(&str) -> Option<String>) -> String {
    LOG_LEVEL_VARS
        .iter()
        .filter_map(|key| lookup(key))
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
        .unwrap_or_else(|| DEFAULT_DIRECTIVE.to_string())
}

/// JSON events on stderr. Stdout is reserved for page snapshots.
/// A second call is a no-op.
pub fn init_tracing() {
    let directive = filter_directive(|key| std::env::var(key).ok());
    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));

    let installed = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_env_filter(filter)
        .json()
        .flatten_event(true)
        .with_current_span(true)
        .with_span_list(false)
        .try_init()
        .is_ok();

    if installed {
        tracing::info!(
            component = "bootstrap",
            trace_id = %trace_id(),
            filter = %directive,
            "campus client logging ready"
        );
    }
}

/// One id for the whole process, sent with every request.
pub fn trace_id() -> &'static str {
    PROCESS_TRACE_ID.get_or_init(|| Uuid::new_v4().to_string())
}

pub fn request_id() -> String {
    Uuid::new_v4().to_string()
}

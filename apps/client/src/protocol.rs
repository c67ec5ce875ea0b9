pub const HEADER_TRACE_ID: &str = "X-Trace-Id";
pub const HEADER_REQUEST_ID: &str = "X-Request-Id";

const HTML_MARKERS: [&str; 2] = ["<!doctype", "<html"];

/// Content sniffing for bodies that should have been JSON envelopes. A session
/// redirect typically hands back the login page instead.
pub fn looks_like_html(body: &str) -> bool {
    let head: String = body
        .trim_start()
        .chars()
        .take(16)
        .flat_map(char::to_lowercase)
        .collect();

    HTML_MARKERS.iter().any(|marker| head.starts_with(marker))
}

/// Short prefix of a body for error details and logs.
pub fn body_excerpt(body: &str) -> String {
    const LIMIT: usize = 120;
    let trimmed = body.trim();
    match trimmed.char_indices().nth(LIMIT) {
        Some((idx, _)) => format!("{}...", &trimmed[..idx]),
        None => trimmed.to_string(),
    }
}

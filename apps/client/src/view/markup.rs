pub const DEFAULT_AVATAR: &str = "/static/images/default.jpg";

/// Escapes text for use in element content and quoted attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn avatar_src(avatar: Option<&str>) -> String {
    let src = avatar
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .unwrap_or(DEFAULT_AVATAR);
    escape_html(src)
}

/// Text or a placeholder when the value is missing or blank.
pub fn or_placeholder(value: Option<&str>, placeholder: &str) -> String {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(text) => escape_html(text),
        None => escape_html(placeholder),
    }
}

/// Escape text for safe embedding in HTML element content and quoted attributes.
///
/// Handles `&`, `<`, `>`, `"` and `'`. Ampersands are only ever produced by the
/// substitutions themselves, so a single call never double-escapes. Calling it
/// again on its own output does escape those ampersands a second time.
pub fn escape_html(unsafe_text: &str) -> String {
    let mut escaped = String::with_capacity(unsafe_text.len());

    for c in unsafe_text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#039;"),
            _ => escaped.push(c),
        }
    }

    escaped
}

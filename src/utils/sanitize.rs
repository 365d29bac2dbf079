//! Utilities for sanitizing header text before it is written to a socket.
//!
//! Requests are assembled by hand, so anything that ends up between a header
//! name and the terminating CRLF must not be able to start a new line.

/// Sanitizes a header value so it stays on a single line.
///
/// Carriage returns and line feeds are replaced by the two-character escapes
/// `\r` and `\n`, so an injected sequence survives as literal, non-functional
/// text. Other control characters (0x00-0x1F and DEL, including tab) are
/// removed. Non-ASCII characters are kept.
///
/// # Arguments
///
/// * `value` - The raw header value
///
/// # Returns
///
/// A value that can be placed between `": "` and CRLF without splitting the
/// header block.
pub fn sanitize_header_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\r' => out.push_str("\\r"),
            '\n' => out.push_str("\\n"),
            c if (c as u32) < 0x20 || c as u32 == 0x7F => {}
            c => out.push(c),
        }
    }
    out
}

/// Sanitizes a header name down to RFC 7230 token characters.
///
/// Anything that is not a visible ASCII token character (including `:`,
/// whitespace and control characters) is dropped.
///
/// # Arguments
///
/// * `name` - The raw header name
///
/// # Returns
///
/// The name with all non-token characters removed.
pub fn sanitize_header_name(name: &str) -> String {
    name.chars()
        .filter(|c| {
            c.is_ascii_alphanumeric()
                || matches!(
                    c,
                    '!' | '#' | '$' | '%' | '&' | '\'' | '*' | '+' | '-' | '.' | '^' | '_' | '`'
                        | '|' | '~'
                )
        })
        .collect()
}

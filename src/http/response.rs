//! Line-oriented HTTP/1.1 response parsing.
//!
//! The whole response is read before parsing (`Connection: close`), then
//! walked once line by line. Parsing is tolerant: malformed cookies are
//! skipped, a non-JSON body is ignored, and stray characters around a JSON
//! object (chunk sizes, trailing CRLFs) are sliced away.

use url::Url;

use crate::config::{
    HEADER_CONTENT_TYPE, HEADER_LOCATION, HEADER_SET_COOKIE, HEADER_TRANSFER_ENCODING,
    JSON_CONTENT_TYPES,
};
use crate::error_handling::HttpError;
use crate::http::cookies::{Cookie, CookieJar};
use crate::http::target::resolve_redirect;

/// Outcome of one socket round-trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseRecord {
    /// Status code from the status line
    pub status: u16,
    /// Next hop, set only for 3xx responses carrying a usable `Location`
    pub redirect: Option<Url>,
    /// JSON object text sliced from the body, when the content type is JSON
    pub body: Option<String>,
    /// Cookies set by this response, in header order
    pub cookies: Vec<Cookie>,
    /// MIME type from `Content-Type`, lower-cased and without parameters
    pub content_type: Option<String>,
    /// `Transfer-Encoding: chunked` was present
    pub chunked: bool,
}

impl ResponseRecord {
    pub fn is_redirect(&self) -> bool {
        (300..400).contains(&self.status)
    }
}

/// Parses a raw response received for `request_url`.
///
/// Cookies set by the response are appended to `jar` as well as returned in
/// the record.
///
/// # Errors
///
/// Returns `HttpError::EmptyResponse` when no `HTTP/` status line is found.
pub fn parse_response(
    raw: &str,
    request_url: &Url,
    jar: &mut CookieJar,
) -> Result<ResponseRecord, HttpError> {
    let mut status: Option<u16> = None;
    let mut location: Option<Url> = None;
    let mut content_type: Option<String> = None;
    let mut chunked = false;
    let mut cookies = Vec::new();
    let mut in_body = false;
    let mut body: Option<String> = None;

    for line in raw.split('\n') {
        let line = line.strip_suffix('\r').unwrap_or(line);

        if in_body {
            if let Some(b) = body.as_mut() {
                b.push_str(line);
            }
            continue;
        }

        if status.is_none() {
            if line.starts_with("HTTP/") {
                status = line
                    .split_whitespace()
                    .nth(1)
                    .and_then(|code| code.parse::<u16>().ok());
            }
            continue;
        }

        if line.is_empty() {
            in_body = true;
            if content_type
                .as_deref()
                .is_some_and(|t| JSON_CONTENT_TYPES.contains(&t))
            {
                body = Some(String::new());
            }
            continue;
        }

        let Some((name, value)) = line.split_once(':') else {
            continue;
        };
        let name = name.trim();
        let value = value.trim();

        if name.eq_ignore_ascii_case(HEADER_SET_COOKIE) {
            match Cookie::parse(value, request_url) {
                Some(cookie) => {
                    jar.add(cookie.clone());
                    cookies.push(cookie);
                }
                None => log::debug!("Skipping malformed cookie: {}", value),
            }
        } else if name.eq_ignore_ascii_case(HEADER_LOCATION) {
            location = resolve_redirect(request_url, value);
        } else if name.eq_ignore_ascii_case(HEADER_CONTENT_TYPE) {
            let mime = value.split(';').next().unwrap_or_default().trim();
            content_type = Some(mime.to_ascii_lowercase());
        } else if name.eq_ignore_ascii_case(HEADER_TRANSFER_ENCODING) {
            chunked = value.to_ascii_lowercase().contains("chunked");
        }
    }

    let status = status.ok_or_else(|| {
        HttpError::EmptyResponse(request_url.host_str().unwrap_or_default().to_string())
    })?;

    let record = ResponseRecord {
        status,
        redirect: None,
        body: body.as_deref().and_then(slice_json_object),
        cookies,
        content_type,
        chunked,
    };
    let redirect = if record.is_redirect() { location } else { None };

    Ok(ResponseRecord { redirect, ..record })
}

/// Returns the text between the first `{` and the last `}` inclusive.
///
/// Returns `None` when there is no such pair.
pub fn slice_json_object(body: &str) -> Option<String> {
    let start = body.find('{')?;
    let end = body.rfind('}')?;
    if end < start {
        return None;
    }
    Some(body[start..=end].to_string())
}

//! Hand-built HTTP/1.1 requests.
//!
//! Requests are plain data: a method, a request target, an ordered header list
//! and an optional body. `to_wire` renders them deterministically, so the same
//! inputs always produce the same bytes. Every header name and value goes
//! through the sanitizers on the way in, so no value can start a new header line.

use url::Url;

use crate::config::{
    ACCEPT_ANY, ACCEPT_GET, CONTENT_TYPE_JSON, CONTENT_TYPE_JSON_PATCH, HEADER_ACCEPT,
    HEADER_AUTHORIZATION, HEADER_CONNECTION, HEADER_CONTENT_LENGTH, HEADER_CONTENT_TYPE,
    HEADER_COOKIE, HEADER_HOST, HEADER_TRU_MODE, HEADER_TRU_OPERATOR, HEADER_TRU_REQUEST_ID,
    HEADER_USER_AGENT, TRU_MODE_SANDBOX,
};
use crate::http::cookies::CookieJar;
use crate::http::target::{host_header, request_target};
use crate::utils::{sanitize_header_name, sanitize_header_value};

const CRLF: &str = "\r\n";
const REDACTED: &str = "<redacted>";

fn is_credential_header(name: &str) -> bool {
    name.eq_ignore_ascii_case(HEADER_AUTHORIZATION) || name.eq_ignore_ascii_case(HEADER_COOKIE)
}

/// Methods the engine can send.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Patch,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Patch => "PATCH",
        }
    }
}

/// Optional headers attached to check GET requests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckHeaders {
    /// Sent as `Authorization: Bearer <token>`
    pub access_token: Option<String>,
    /// Carrier operator code hint
    pub operator: Option<String>,
    /// Correlation id
    pub request_id: Option<String>,
    /// Adds `x-tru-mode: sandbox`
    pub sandbox: bool,
}

/// An HTTP request described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: Method,
    /// Path plus optional query
    pub target: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    /// Creates a request for `url` with no headers.
    pub fn new(method: Method, url: &Url) -> Self {
        Self {
            method,
            target: request_target(url),
            headers: Vec::new(),
            body: None,
        }
    }

    /// Appends a header after sanitizing its name and value.
    ///
    /// Headers whose name is empty after sanitizing are dropped.
    pub fn push_header(&mut self, name: &str, value: &str) {
        let name = sanitize_header_name(name);
        if name.is_empty() {
            log::warn!("Dropping header with an invalid name");
            return;
        }
        self.headers.push((name, sanitize_header_value(value)));
    }

    /// Returns the value of the first header named `name` (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Renders the request as the exact text written to the socket.
    pub fn to_wire(&self) -> String {
        self.render(false)
    }

    /// Renders the request with credential headers (`Authorization`,
    /// `Cookie`) masked, for log output.
    pub fn to_log_string(&self) -> String {
        self.render(true)
    }

    fn render(&self, redact: bool) -> String {
        let mut out = String::new();
        out.push_str(self.method.as_str());
        out.push(' ');
        out.push_str(&self.target);
        out.push_str(" HTTP/1.1");
        out.push_str(CRLF);
        for (name, value) in &self.headers {
            out.push_str(name);
            out.push_str(": ");
            if redact && is_credential_header(name) {
                out.push_str(REDACTED);
            } else {
                out.push_str(value);
            }
            out.push_str(CRLF);
        }
        out.push_str(CRLF);
        if let Some(body) = &self.body {
            out.push_str(body);
        }
        out
    }
}

/// Builds a check GET request.
///
/// Header order: `Host`, `User-Agent`, `Authorization`, `x-tru-sdk-request`,
/// `x-tru-ops`, `x-tru-mode`, `Accept`, `Cookie`, `Connection`. Optional
/// headers are omitted when absent; `Cookie` carries only the jar's cookies
/// that match `url`.
pub fn build_get(
    url: &Url,
    user_agent: &str,
    headers: &CheckHeaders,
    cookies: &CookieJar,
) -> HttpRequest {
    let mut req = HttpRequest::new(Method::Get, url);
    req.push_header(HEADER_HOST, &host_header(url));
    req.push_header(HEADER_USER_AGENT, user_agent);
    if let Some(token) = &headers.access_token {
        req.push_header(HEADER_AUTHORIZATION, &format!("Bearer {}", token));
    }
    if let Some(id) = &headers.request_id {
        req.push_header(HEADER_TRU_REQUEST_ID, id);
    }
    if let Some(operator) = &headers.operator {
        req.push_header(HEADER_TRU_OPERATOR, operator);
    }
    if headers.sandbox {
        req.push_header(HEADER_TRU_MODE, TRU_MODE_SANDBOX);
    }
    req.push_header(HEADER_ACCEPT, ACCEPT_GET);
    if let Some(cookie) = cookies.header_value(url) {
        req.push_header(HEADER_COOKIE, &cookie);
    }
    req.push_header(HEADER_CONNECTION, "close");
    req
}

/// Builds a POST request with caller-supplied headers.
///
/// Caller headers follow `Host`, `User-Agent` and `Accept` in the order given;
/// any caller `Host`, `Content-Length` or `Connection` header is ignored.
/// `Content-Type` defaults to `application/json` when the caller supplies
/// none and there is a body. `Content-Length` is the UTF-8 byte length.
pub fn build_post(
    url: &Url,
    user_agent: &str,
    extra_headers: &[(String, String)],
    body: Option<&str>,
    cookies: &CookieJar,
) -> HttpRequest {
    let mut req = HttpRequest::new(Method::Post, url);
    req.push_header(HEADER_HOST, &host_header(url));
    req.push_header(HEADER_USER_AGENT, user_agent);
    req.push_header(HEADER_ACCEPT, ACCEPT_ANY);
    for (name, value) in extra_headers {
        let reserved = [HEADER_HOST, HEADER_CONTENT_LENGTH, HEADER_CONNECTION]
            .iter()
            .any(|r| name.trim().eq_ignore_ascii_case(r));
        if !reserved {
            req.push_header(name, value);
        }
    }
    if let Some(cookie) = cookies.header_value(url) {
        req.push_header(HEADER_COOKIE, &cookie);
    }
    if let Some(body) = body {
        if req.header(HEADER_CONTENT_TYPE).is_none() {
            req.push_header(HEADER_CONTENT_TYPE, CONTENT_TYPE_JSON);
        }
        req.push_header(HEADER_CONTENT_LENGTH, &body.len().to_string());
    }
    req.push_header(HEADER_CONNECTION, "close");
    req.body = body.map(str::to_string);
    req
}

/// Builds a PATCH request that adds `payload` at `/payload` as a JSON patch.
///
/// `payload` must already be JSON text; it is embedded verbatim.
pub fn build_patch(url: &Url, user_agent: &str, payload: &str) -> HttpRequest {
    let body = format!(
        "[{{\"op\":\"add\",\"path\":\"/payload\",\"value\":{}}}]",
        payload
    );
    let mut req = HttpRequest::new(Method::Patch, url);
    req.push_header(HEADER_HOST, &host_header(url));
    req.push_header(HEADER_USER_AGENT, user_agent);
    req.push_header(HEADER_ACCEPT, ACCEPT_ANY);
    req.push_header(HEADER_CONTENT_TYPE, CONTENT_TYPE_JSON_PATCH);
    req.push_header(HEADER_CONTENT_LENGTH, &body.len().to_string());
    req.push_header(HEADER_CONNECTION, "close");
    req.body = Some(body);
    req
}

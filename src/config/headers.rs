//! HTTP header name constants.
//!
//! This module defines the header names written by the request builder and
//! recognised by the response parser.

// Request headers
/// Host header
pub const HEADER_HOST: &str = "Host";
/// User-Agent header
pub const HEADER_USER_AGENT: &str = "User-Agent";
/// Authorization header (bearer access token)
pub const HEADER_AUTHORIZATION: &str = "Authorization";
/// Accept header
pub const HEADER_ACCEPT: &str = "Accept";
/// Cookie header
pub const HEADER_COOKIE: &str = "Cookie";
/// Connection header (always `close`)
pub const HEADER_CONNECTION: &str = "Connection";
/// Content-Type header
pub const HEADER_CONTENT_TYPE: &str = "Content-Type";
/// Content-Length header
pub const HEADER_CONTENT_LENGTH: &str = "Content-Length";

// Correlation and carrier headers
/// Request id used to correlate a device request with backend logs
pub const HEADER_TRU_REQUEST_ID: &str = "x-tru-sdk-request";
/// Carrier operator code hint
pub const HEADER_TRU_OPERATOR: &str = "x-tru-ops";
/// Mode header, only sent as `sandbox` on emulators
pub const HEADER_TRU_MODE: &str = "x-tru-mode";
/// Value of the mode header on emulators
pub const TRU_MODE_SANDBOX: &str = "sandbox";

// Response headers (matched case-insensitively)
/// Set-Cookie header
pub const HEADER_SET_COOKIE: &str = "Set-Cookie";
/// Location header
pub const HEADER_LOCATION: &str = "Location";
/// Transfer-Encoding header
pub const HEADER_TRANSFER_ENCODING: &str = "Transfer-Encoding";

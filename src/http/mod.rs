//! Raw-socket HTTP/1.1 engine.
//!
//! This module provides:
//! - Request construction with injection-safe headers (`request`)
//! - Socket setup with interface binding and TLS (`connection`)
//! - Tolerant response parsing with JSON body slicing (`response`)
//! - URL handling and redirect resolution (`target`)
//! - A per-chain cookie jar (`cookies`)
//! - The client tying them together (`client`)
//!
//! There is no connection reuse: every request opens a socket, sends
//! `Connection: close`, and reads until the server hangs up.

mod client;
mod connection;
mod cookies;
mod request;
mod response;
mod target;

pub use client::SocketClient;
pub use connection::{read_to_end, Connector, HttpStream};
pub use cookies::{Cookie, CookieJar};
pub use request::{build_get, build_patch, build_post, CheckHeaders, HttpRequest, Method};
pub use response::{parse_response, slice_json_object, ResponseRecord};
pub use target::{endpoint, host_header, request_target, resolve_redirect, Endpoint, Scheme};

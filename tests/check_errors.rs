// Error codes reported for failures after the network was acquired.

mod helpers;

use std::net::TcpListener;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use cellular_check::user_agent::fixed_emulator_predicate;
use cellular_check::{CheckErrorCode, CheckRequest};
use helpers::{
    fast_config, json_response, redirect_response, test_check, Behaviour, FakeProvider,
};

fn closed_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    listener.local_addr().expect("local addr").port()
}

#[test]
fn test_connection_refused_is_connection_error() {
    let port = closed_port();
    let provider = FakeProvider::new(Behaviour::Available);
    let check = test_check(provider.clone(), fast_config());

    let result = check.run_check(&format!("http://127.0.0.1:{}/check", port), None, false);

    assert_eq!(result.error, Some(CheckErrorCode::ConnectionError));
    assert!(result.used_cellular);
    assert!(result.error_description.is_some());
    assert_eq!(FakeProvider::count(&provider.unbinds), 1);
}

#[test]
fn test_connection_refused_mid_chain_is_connection_error() {
    let port = closed_port();
    let server = helpers::MockServer::start(move |_, _, _| {
        redirect_response(&format!("http://127.0.0.1:{}/gone", port), &[])
    });
    let check = test_check(FakeProvider::new(Behaviour::Available), fast_config());

    let result = check.run(&CheckRequest::new(server.url("/check")));

    assert_eq!(result.error, Some(CheckErrorCode::ConnectionError));
    assert_eq!(server.request_count(), 1);
}

#[test]
fn test_invalid_url_is_generic_error() {
    let provider = FakeProvider::new(Behaviour::Available);
    let check = test_check(provider.clone(), fast_config());

    let result = check.run_check("not a url", None, false);

    assert_eq!(result.error, Some(CheckErrorCode::Generic));
    assert!(result
        .error_description
        .as_deref()
        .is_some_and(|d| d.contains("not a url")));
    assert_eq!(FakeProvider::count(&provider.unbinds), 1);
}

#[test]
fn test_unsupported_scheme_is_generic_error() {
    let check = test_check(FakeProvider::new(Behaviour::Available), fast_config());

    let result = check.run_check("ftp://127.0.0.1/file", None, false);

    assert_eq!(result.error, Some(CheckErrorCode::Generic));
}

#[test]
fn test_empty_response_is_connection_error() {
    let server = helpers::MockServer::start(|_, _, _| String::new());
    let check = test_check(FakeProvider::new(Behaviour::Available), fast_config());

    let result = check.run(&CheckRequest::new(server.url("/check")));

    assert_eq!(result.error, Some(CheckErrorCode::ConnectionError));
    assert_eq!(server.request_count(), 1);
}

#[test]
fn test_panic_during_exchange_is_generic_error_and_releases_network() {
    let server = helpers::MockServer::start(|_, _, _| json_response(200, "{}"));
    let provider = FakeProvider::new(Behaviour::Available);
    let check = test_check(provider.clone(), fast_config())
        .with_emulator_predicate(Arc::new(|| -> bool { panic!("emulator probe exploded") }));

    let result = check.run(&CheckRequest::new(server.url("/check")).with_debug(true));

    assert_eq!(result.error, Some(CheckErrorCode::Generic));
    assert!(result
        .error_description
        .as_deref()
        .is_some_and(|d| d.contains("emulator probe exploded")));
    assert!(result.used_cellular);
    assert_eq!(FakeProvider::count(&provider.binds), 1);
    assert_eq!(FakeProvider::count(&provider.unbinds), 1);
    assert!(!provider.bound.load(Ordering::SeqCst));
    assert_eq!(server.request_count(), 0);

    // The runner stays usable after a panic
    let check = check.with_emulator_predicate(fixed_emulator_predicate(false));
    let result = check.run(&CheckRequest::new(server.url("/check")));
    assert!(result.is_success());
}

#[test]
fn test_get_json_does_not_follow_redirects() {
    let server = helpers::MockServer::start(|_, _, _| redirect_response("/elsewhere", &[]));
    let check = test_check(FakeProvider::new(Behaviour::Available), fast_config());

    let result = check.get_json(&server.url("/device_ip"), false);

    assert!(result.error.is_none());
    assert_eq!(result.http_status, Some(302));
    assert!(result.response_body.is_none());
    assert_eq!(server.request_count(), 1);
}

#[test]
fn test_post_json_sends_body_with_content_length() {
    let server = helpers::MockServer::start(|_, _, _| json_response(201, r#"{"created":true}"#));
    let check = test_check(FakeProvider::new(Behaviour::Available), fast_config());
    let headers = vec![("x-custom".to_string(), "1".to_string())];

    let result = check.post_json(&server.url("/items"), &headers, Some(r#"{"a":"é"}"#), false);

    assert_eq!(result.http_status, Some(201));
    assert_eq!(result.response_body.expect("body")["created"], true);

    let requests = server.requests();
    assert_eq!(requests[0].method(), "POST");
    assert_eq!(requests[0].header("x-custom"), Some("1"));
    assert_eq!(requests[0].header("Content-Length"), Some("10"));
    assert_eq!(requests[0].header("Content-Type"), Some("application/json"));
    assert_eq!(requests[0].body, r#"{"a":"é"}"#);
}

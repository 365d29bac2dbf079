// Caller-supplied header values must never split the request head.

mod helpers;

use cellular_check::CheckRequest;
use helpers::{fast_config, json_response, test_check, Behaviour, FakeProvider};

#[test]
fn test_operator_with_crlf_stays_in_one_header() {
    let server = helpers::MockServer::start(|_, _, _| json_response(200, "{}"));
    let check = test_check(FakeProvider::new(Behaviour::Available), fast_config());

    let request = CheckRequest::new(server.url("/check"))
        .with_operator("23410\r\nX-Injected: yes")
        .with_request_id("id\n\nGET /evil HTTP/1.1");
    let result = check.run(&request);
    assert!(result.is_success());

    let requests = server.requests();
    assert_eq!(requests.len(), 1);
    let received = &requests[0];

    assert!(received.header("X-Injected").is_none());
    assert_eq!(
        received.header("x-tru-ops"),
        Some(r"23410\r\nX-Injected: yes")
    );
    assert_eq!(
        received.header("x-tru-sdk-request"),
        Some(r"id\n\nGET /evil HTTP/1.1")
    );
    assert!(!received.raw.contains("\r\nGET /evil"));
}

#[test]
fn test_injection_in_access_token_is_neutralised() {
    let server = helpers::MockServer::start(|_, _, _| json_response(200, "{}"));
    let check = test_check(FakeProvider::new(Behaviour::Available), fast_config());

    let result = check.run_check(
        &server.url("/check"),
        Some("abc\r\nCookie: stolen=1"),
        false,
    );
    assert!(result.is_success());

    let received = &server.requests()[0];
    assert!(received.header("Cookie").is_none());
    assert_eq!(
        received.header("Authorization"),
        Some(r"Bearer abc\r\nCookie: stolen=1")
    );
}

#[test]
fn test_post_header_names_are_sanitised() {
    let server = helpers::MockServer::start(|_, _, _| json_response(200, "{}"));
    let check = test_check(FakeProvider::new(Behaviour::Available), fast_config());
    let headers = vec![(
        "X-Evil\r\nX-Injected".to_string(),
        "v".to_string(),
    )];

    let result = check.post_json(&server.url("/items"), &headers, None, false);
    assert!(result.error.is_none());

    let received = &server.requests()[0];
    assert!(received.header("X-Injected").is_none());
    assert_eq!(received.header("X-EvilX-Injected"), Some("v"));
}

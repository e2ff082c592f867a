//! Unit tests for request parsing, routing and response formatting.

#![allow(dead_code)]

#[path = "../src/occupancy.rs"]
mod occupancy;

#[path = "../src/snapshot.rs"]
mod snapshot;

#[path = "../src/http.rs"]
mod http;

use http::{request_line_complete, respond, Request, Route, Status, DASHBOARD_HTML};
use occupancy::OccupancyState;

fn get(path: &str, state: OccupancyState) -> (String, String) {
    let raw = format!("GET {} HTTP/1.1\r\nHost: 192.168.1.50\r\nAccept: */*\r\n\r\n", path);
    let request = Request::parse(raw.as_bytes()).expect("valid request");
    let response = respond(&request, state);
    (response.head().as_str().to_string(), response.body().to_string())
}

// ============================================================================
// Parsing
// ============================================================================

#[test]
fn test_parse_request_line() {
    let request = Request::parse(b"GET /status HTTP/1.1\r\nHost: x\r\n\r\n").unwrap();
    assert_eq!(request.method, "GET");
    assert_eq!(request.path, "/status");
}

#[test]
fn test_parse_strips_query_string() {
    let request = Request::parse(b"GET /status?t=1712 HTTP/1.1\r\n\r\n").unwrap();
    assert_eq!(request.path, "/status");
}

#[test]
fn test_incomplete_request_line_is_not_parsed() {
    // The rest of the line may still be in flight
    assert!(Request::parse(b"GET / HTTP/1.0").is_none());
    assert!(Request::parse(b"GET /stat").is_none());
    assert!(!request_line_complete(b"GET /stat"));
}

#[test]
fn test_request_line_complete_on_bare_lf() {
    assert!(request_line_complete(b"GET / HTTP/1.0\n"));
    assert_eq!(Request::parse(b"GET / HTTP/1.0\n").unwrap().path, "/");
    assert!(request_line_complete(b"GET /status HTTP/1.1\r\nHost"));
}

#[test]
fn test_parse_rejects_empty_and_incomplete() {
    assert!(Request::parse(b"").is_none());
    assert!(Request::parse(b"\r\n").is_none());
    assert!(Request::parse(b"GET\r\n\r\n").is_none());
}

#[test]
fn test_parse_rejects_non_utf8_request_line() {
    assert!(Request::parse(&[0xFF, 0xFE, b' ', b'/', b'\r', b'\n']).is_none());
}

#[test]
fn test_parse_ignores_non_utf8_after_request_line() {
    let mut raw = b"GET /status HTTP/1.1\r\n".to_vec();
    raw.extend_from_slice(&[0xFF, 0xFE, 0xFD]);
    let request = Request::parse(&raw).unwrap();
    assert_eq!(request.path, "/status");
}

#[test]
fn test_route_from_path() {
    assert_eq!(Route::from_path("/"), Route::Dashboard);
    assert_eq!(Route::from_path("/status"), Route::Status);
    assert_eq!(Route::from_path("/status/"), Route::NotFound);
    assert_eq!(Route::from_path("/unknown-path"), Route::NotFound);
}

// ============================================================================
// Responses
// ============================================================================

#[test]
fn test_status_occupied() {
    let (head, body) = get("/status", OccupancyState::OCCUPIED);

    assert!(head.starts_with("HTTP/1.1 200 OK\r\n"));
    assert!(head.contains("Content-Type: application/json\r\n"));
    assert_eq!(body, r#"{"slot1":1,"free":0,"total":1}"#);
}

#[test]
fn test_status_free() {
    let (head, body) = get("/status", OccupancyState::FREE);

    assert!(head.starts_with("HTTP/1.1 200 OK\r\n"));
    assert_eq!(body, r#"{"slot1":0,"free":1,"total":1}"#);
}

#[test]
fn test_status_content_length_matches_body() {
    let (head, body) = get("/status", OccupancyState::FREE);
    assert!(head.contains(&format!("Content-Length: {}\r\n", body.len())));
}

#[test]
fn test_unknown_path_is_404() {
    let (head, body) = get("/unknown-path", OccupancyState::FREE);

    assert!(head.starts_with("HTTP/1.1 404 Not Found\r\n"));
    assert!(head.contains("Content-Type: text/plain\r\n"));
    assert_eq!(body, "Not found");
}

#[test]
fn test_dashboard_page() {
    let (head, body) = get("/", OccupancyState::FREE);

    assert!(head.starts_with("HTTP/1.1 200 OK\r\n"));
    assert!(head.contains("Content-Type: text/html\r\n"));
    assert!(head.contains(&format!("Content-Length: {}\r\n", DASHBOARD_HTML.len())));
    assert_eq!(body, DASHBOARD_HTML);
}

#[test]
fn test_dashboard_polls_status_every_two_seconds() {
    assert!(DASHBOARD_HTML.contains("fetch(\"/status\""));
    assert!(DASHBOARD_HTML.contains("setInterval(refresh, 2000)"));
    assert!(DASHBOARD_HTML.contains("data.free === 0"));
}

#[test]
fn test_head_ends_with_blank_line_and_closes() {
    for path in ["/", "/status", "/nope"] {
        let (head, _) = get(path, OccupancyState::OCCUPIED);
        assert!(head.contains("Connection: close\r\n"));
        assert!(head.ends_with("\r\n\r\n"));
    }
}

#[test]
fn test_method_is_not_consulted() {
    let request = Request::parse(b"POST /status HTTP/1.1\r\n\r\n").unwrap();
    let response = respond(&request, OccupancyState::OCCUPIED);

    assert_eq!(response.status, Status::Ok);
    assert_eq!(response.body(), r#"{"slot1":1,"free":0,"total":1}"#);
}

#[test]
fn test_status_codes() {
    assert_eq!(Status::Ok.code(), 200);
    assert_eq!(Status::NotFound.code(), 404);
}

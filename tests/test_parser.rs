use getserver::http::parser::{RequestFramer, find_request_end};
use getserver::http::request::RawRequest;

#[test]
fn test_frame_simple_get_request() {
    let req = b"GET / HTTP/1.1\r\nHost: example.com\r\n\r\n";
    let mut framer = RequestFramer::new();
    let raw = framer.push(req).unwrap();

    assert_eq!(raw.as_bytes(), req);
    assert_eq!(raw.request_line(), "GET / HTTP/1.1");
    assert_eq!(framer.buffered(), 0);
}

#[test]
fn test_frame_incomplete_request_missing_blank_line() {
    let mut framer = RequestFramer::new();
    assert!(framer.push(b"GET / HTTP/1.1\r\nHost: example.com\r\n").is_none());
    assert_eq!(framer.buffered(), 35);
}

#[test]
fn test_frame_accumulates_byte_by_byte() {
    let req = b"GET /app.js HTTP/1.1\r\nAccept: */*\r\n\r\n";
    let mut framer = RequestFramer::new();

    for &b in &req[..req.len() - 1] {
        assert!(framer.push(&[b]).is_none());
    }
    let raw = framer.push(&req[req.len() - 1..]).unwrap();
    assert_eq!(raw.as_bytes(), req);
}

#[test]
fn test_frame_zero_length_push_is_noop() {
    let mut framer = RequestFramer::new();
    assert!(framer.push(b"").is_none());
    assert_eq!(framer.buffered(), 0);

    framer.push(b"GET");
    assert!(framer.push(b"").is_none());
    assert_eq!(framer.buffered(), 3);
}

#[test]
fn test_frame_keeps_bytes_trailing_terminator() {
    let mut framer = RequestFramer::new();
    let raw = framer.push(b"GET / HTTP/1.1\r\n\r\nextra").unwrap();

    assert_eq!(raw.as_bytes(), b"GET / HTTP/1.1\r\n\r\nextra");
    assert_eq!(framer.buffered(), 0);
}

#[test]
fn test_frame_resets_between_requests() {
    let mut framer = RequestFramer::new();
    framer.push(b"GET /a HTTP/1.1\r\n\r\n").unwrap();
    let second = framer.push(b"GET /b HTTP/1.1\r\n\r\n").unwrap();

    assert_eq!(second.request_line(), "GET /b HTTP/1.1");
}

#[test]
fn test_clear_discards_partial_request() {
    let mut framer = RequestFramer::new();
    framer.push(b"GET /half");
    framer.clear();

    assert_eq!(framer.buffered(), 0);
    assert!(framer.try_frame().is_none());
}

#[test]
fn test_find_request_end() {
    assert_eq!(find_request_end(b"a\r\n\r\nb"), Some(5));
    assert_eq!(find_request_end(b"\r\n\r"), None);
    assert_eq!(find_request_end(b""), None);
}

#[test]
fn test_request_line_without_line_ending() {
    let raw = RawRequest::new(&b"GET /x HTTP/1.0"[..]);
    assert_eq!(raw.request_line(), "GET /x HTTP/1.0");
}

#[test]
fn test_request_line_tolerates_bare_lf() {
    let raw = RawRequest::new(&b"GET /x HTTP/1.0\nHost: a\n\r\n\r\n"[..]);
    assert_eq!(raw.request_line(), "GET /x HTTP/1.0");
}

#[test]
fn test_request_line_lossy_on_invalid_utf8() {
    let raw = RawRequest::new(&b"GET /\xff HTTP/1.1\r\n\r\n"[..]);
    assert_eq!(raw.request_line(), "GET /\u{fffd} HTTP/1.1");
    assert_eq!(raw.len(), 19);
}

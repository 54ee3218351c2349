mod common;

use common::{response_lines, TestBody};
use curl_h1::{parse, ErrorKind};
use http_types::StatusCode;
use pretty_assertions::assert_eq;

fn fixture() -> String {
    response_lines(&[
        "HTTP/1.1 200 OK",
        "Connection: close",
        "X-Frame-Options: SAMEORIGIN",
        "Cache-Control: no-cache, no-store, must-revalidate",
        "Content-Length: 123",
        "Content-Type: application/json",
        "",
        r#"{"user":"response","flag":false,"count":5}"#,
    ])
}

#[test]
fn parse_status_headers_and_body() {
    let res = parse(fixture().as_bytes()).unwrap();

    assert_eq!(res.status(), Some(200));
    assert_eq!(res.status_text(), "OK");
    assert_eq!(res.header("Content-Type").unwrap()[0], "application/json");
    assert_eq!(
        res.header("cache-control").unwrap()[0],
        "no-cache, no-store, must-revalidate"
    );
    assert_eq!(res.headers().count(), 5);

    let body: TestBody = serde_json::from_slice(res.body()).unwrap();
    assert_eq!(
        body,
        TestBody {
            user: "response".into(),
            flag: false,
            count: 5,
        }
    );
}

#[test]
fn parse_escaped_separators() {
    let raw = fixture().replace("\r\n", "\\r\\n");
    let res = parse(raw.as_bytes()).unwrap();

    assert_eq!(res.status(), Some(200));
    assert_eq!(res.header("x-frame-options").unwrap()[0], "SAMEORIGIN");
    assert_eq!(
        res.body_string().unwrap(),
        r#"{"user":"response","flag":false,"count":5}"#
    );
}

#[test]
fn semicolon_values_stay_whole() {
    let raw = response_lines(&[
        "HTTP/1.1 200 OK",
        "Content-Type: text/plain; charset=utf-8",
        "",
        "hi",
    ]);
    let res = parse(raw.as_bytes()).unwrap();

    let values = res.header("content-type").unwrap();
    assert_eq!(values.len(), 1);
    assert_eq!(values[0], "text/plain; charset=utf-8");
}

#[test]
fn non_ascii_header_values_are_kept() {
    let raw = response_lines(&[
        "HTTP/1.1 200 OK",
        "Content-Disposition: attachment; filename=\"café.txt\"",
        "X-Grüße: hallo",
        "",
        "hello",
    ]);
    let res = parse(raw.as_bytes()).unwrap();

    assert_eq!(
        res.header("content-disposition").unwrap()[0],
        "attachment; filename=\"café.txt\""
    );
    assert_eq!(res.header("X-Grüße").unwrap()[0], "hallo");
    assert_eq!(res.body(), b"hello");

    // Only the conversion needs header text http-types accepts.
    let err = http_types::Response::try_from(res).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Parse);
}

#[test]
fn repeated_headers_append() {
    let raw = response_lines(&[
        "HTTP/1.1 200 OK",
        "set-cookie: sessionId=e8bb43229de9",
        "Set-Cookie: qwerty=219ffwef9w0f",
        "",
        "",
    ]);
    let res = parse(raw.as_bytes()).unwrap();

    let cookies = res.header("Set-Cookie").unwrap();
    assert_eq!(cookies.len(), 2);
    assert_eq!(cookies[1], "qwerty=219ffwef9w0f");
    assert!(res.body().is_empty());
}

#[test]
fn only_the_first_body_line_is_kept() {
    let raw = response_lines(&["HTTP/1.1 200 OK", "Content-Length: 11", "", "line one", "line two"]);
    let res = parse(raw.as_bytes()).unwrap();
    assert_eq!(res.body(), b"line one");
}

#[test]
fn output_without_status_line() {
    let raw = response_lines(&["Content-Type: text/plain", "", "plain"]);
    let res = parse(raw.as_bytes()).unwrap();

    assert_eq!(res.status(), None);
    assert_eq!(res.status_text(), "");
    assert_eq!(res.header("content-type").unwrap()[0], "text/plain");
    assert_eq!(res.body(), b"plain");
}

#[test]
fn headers_without_separator_have_no_body() {
    let raw = response_lines(&["HTTP/2 204", "date: Mon, 19 Oct 2026 10:00:00 GMT"]);
    let res = parse(raw.as_bytes()).unwrap();

    assert_eq!(res.status(), Some(204));
    assert_eq!(res.status_text(), "No Content");
    assert_eq!(res.header("Date").unwrap()[0], "Mon, 19 Oct 2026 10:00:00 GMT");
    assert!(res.body().is_empty());
}

#[test]
fn unregistered_status_has_empty_text() {
    let res = parse(b"HTTP/1.1 299 Whatever\r\n\r\n").unwrap();
    assert_eq!(res.status(), Some(299));
    assert_eq!(res.status_text(), "");
}

#[test]
fn empty_output_is_a_parse_error() {
    let err = parse(b"").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Parse);
}

#[test]
fn bad_status_code_is_a_parse_error() {
    let err = parse(b"HTTP/1.1 abc OK\r\n\r\n").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Parse);

    let err = parse(b"HTTP/1.1\r\n\r\n").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Parse);
}

#[test]
fn parsing_is_repeatable() {
    let raw = fixture();
    assert_eq!(parse(raw.as_bytes()).unwrap(), parse(raw.as_bytes()).unwrap());
}

#[test]
fn converts_into_http_types_response() {
    let res = parse(fixture().as_bytes()).unwrap();
    let res = http_types::Response::try_from(res).unwrap();

    assert_eq!(res.status(), StatusCode::Ok);
    assert_eq!(res["connection"], "close");

    let res = parse(b"Content-Type: text/plain\r\n\r\nx").unwrap();
    let err = http_types::Response::try_from(res).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Parse);
}

use httpwire::http::parser::{ParseError, parse_request_line};
use httpwire::http::request::{Method, ParserState, Request};

fn feed_all(req: &mut Request, data: &[u8]) -> Result<usize, ParseError> {
    req.feed(data)
}

#[test]
fn test_parse_simple_get_request() {
    let data = b"GET / HTTP/1.1\r\nHost: localhost:42069\r\nUser-Agent: curl/7.81.0\r\nAccept: */*\r\n\r\n";
    let mut req = Request::new();
    let consumed = feed_all(&mut req, data).unwrap();

    assert_eq!(consumed, data.len());
    assert_eq!(req.state(), ParserState::Done);
    assert_eq!(req.request_line.method, Method::GET);
    assert_eq!(req.request_line.request_target, "/");
    assert_eq!(req.request_line.http_version, "1.1");
    assert_eq!(req.header("host"), Some("localhost:42069"));
    assert_eq!(req.header("Accept"), Some("*/*"));
    assert!(req.body.is_empty());
}

#[test]
fn test_parse_request_line_fields() {
    let (line, consumed) = parse_request_line(b"POST /path HTTP/1.1\r\nHost: x\r\n\r\n")
        .unwrap()
        .unwrap();

    assert_eq!(line.method, Method::POST);
    assert_eq!(line.request_target, "/path");
    assert_eq!(line.http_version, "1.1");
    assert_eq!(consumed, 21);
}

#[test]
fn test_parse_request_with_path_and_query_string() {
    let mut req = Request::new();
    req.feed(b"GET /search?q=rust HTTP/1.1\r\n\r\n").unwrap();

    assert_eq!(req.target(), "/search?q=rust");
}

#[test]
fn test_parse_supported_methods() {
    let methods = vec![
        ("GET", Method::GET),
        ("POST", Method::POST),
        ("PUT", Method::PUT),
        ("DELETE", Method::DELETE),
        ("HEAD", Method::HEAD),
    ];

    for (method_str, expected_method) in methods {
        let data = format!("{} / HTTP/1.1\r\n\r\n", method_str);
        let mut req = Request::new();
        req.feed(data.as_bytes()).unwrap();
        assert_eq!(req.method(), expected_method);
    }
}

#[test]
fn test_parse_unsupported_method() {
    for method in ["PUSH", "PATCH", "OPTIONS", "get"] {
        let data = format!("{} /coffee HTTP/1.1\r\n\r\n", method);
        let mut req = Request::new();
        assert_eq!(
            req.feed(data.as_bytes()),
            Err(ParseError::UnsupportedMethod),
            "method: {}",
            method
        );
    }
}

#[test]
fn test_parse_request_line_out_of_order() {
    let mut req = Request::new();
    let result = req.feed(b"/coffee PUSH HTTP/1.1\r\n\r\n");

    assert_eq!(result, Err(ParseError::MalformedRequestLine));
}

#[test]
fn test_parse_request_line_wrong_field_count() {
    for line in [
        "/coffee HTTP/1.1\r\n",
        "GET /coffee HTTP/1.1 extra\r\n",
        "\r\n",
    ] {
        let mut req = Request::new();
        assert_eq!(
            req.feed(line.as_bytes()),
            Err(ParseError::MalformedRequestLine),
            "line: {:?}",
            line
        );
    }
}

#[test]
fn test_parse_unsupported_version() {
    for version in ["HTTP/1.0", "HTTP/2", "http/1.1"] {
        let data = format!("GET / {}\r\n\r\n", version);
        let mut req = Request::new();
        assert_eq!(req.feed(data.as_bytes()), Err(ParseError::UnsupportedVersion));
    }
}

#[test]
fn test_parse_partial_request_line_consumes_nothing() {
    let mut req = Request::new();

    assert_eq!(req.feed(b"GET /cof").unwrap(), 0);
    assert_eq!(req.state(), ParserState::Initialized);
}

#[test]
fn test_parse_stops_at_partial_header_line() {
    let mut req = Request::new();
    let consumed = req.feed(b"GET / HTTP/1.1\r\nHost: loc").unwrap();

    assert_eq!(consumed, 16);
    assert_eq!(req.state(), ParserState::ParsingHeaders);

    let consumed = req.feed(b"Host: localhost\r\n\r\n").unwrap();
    assert_eq!(consumed, 19);
    assert!(req.is_done());
    assert_eq!(req.header("host"), Some("localhost"));
}

#[test]
fn test_parse_post_request_with_body() {
    let data = b"POST /submit HTTP/1.1\r\nHost: localhost:42069\r\nContent-Length: 13\r\n\r\nhello world!\n";
    let mut req = Request::new();
    let consumed = req.feed(data).unwrap();

    assert_eq!(consumed, data.len());
    assert!(req.is_done());
    assert_eq!(req.content_length, 13);
    assert_eq!(req.body, b"hello world!\n");
}

#[test]
fn test_parse_body_across_feeds() {
    let mut req = Request::new();
    req.feed(b"PUT /x HTTP/1.1\r\nContent-Length: 10\r\n\r\nhello").unwrap();
    assert_eq!(req.state(), ParserState::ParsingBody);

    assert_eq!(req.feed(b"").unwrap(), 0);
    assert_eq!(req.feed(b"world").unwrap(), 5);
    assert!(req.is_done());
    assert_eq!(req.body, b"helloworld");
}

#[test]
fn test_parse_body_too_large() {
    let mut req = Request::new();
    let result = req.feed(b"POST /submit HTTP/1.1\r\nContent-Length: 3\r\n\r\nhello");

    assert_eq!(result, Err(ParseError::BodyTooLarge));
}

#[test]
fn test_parse_zero_content_length_is_done() {
    let mut req = Request::new();
    req.feed(b"POST /api HTTP/1.1\r\nContent-Length: 0\r\n\r\n").unwrap();

    assert!(req.is_done());
    assert!(req.body.is_empty());
}

#[test]
fn test_parse_missing_content_length_means_no_body() {
    let data = b"POST /api HTTP/1.1\r\nHost: x\r\n\r\nleftover";
    let mut req = Request::new();
    let consumed = req.feed(data).unwrap();

    assert!(req.is_done());
    assert!(req.body.is_empty());
    assert_eq!(consumed, data.len() - b"leftover".len());
}

#[test]
fn test_parse_invalid_content_length() {
    for value in ["abc", "-1", "1.5", ""] {
        let data = format!("POST / HTTP/1.1\r\nContent-Length: {}\r\n\r\n", value);
        let mut req = Request::new();
        assert_eq!(
            req.feed(data.as_bytes()),
            Err(ParseError::InvalidContentLength),
            "value: {:?}",
            value
        );
    }
}

#[test]
fn test_parse_binary_body() {
    let mut req = Request::new();
    req.feed(b"POST /upload HTTP/1.1\r\nContent-Length: 4\r\n\r\n\x00\x01\x02\x03")
        .unwrap();

    assert_eq!(req.body, vec![0, 1, 2, 3]);
}

#[test]
fn test_parse_malformed_header() {
    let mut req = Request::new();
    let result = req.feed(b"GET / HTTP/1.1\r\nBrokenHeader\r\n\r\n");

    assert_eq!(result, Err(ParseError::InvalidHeader));
}

#[test]
fn test_parse_duplicate_headers() {
    let mut req = Request::new();
    req.feed(b"GET / HTTP/1.1\r\nPlayer: Rebecca\r\nPlayer: Garry\r\n\r\n")
        .unwrap();

    assert_eq!(req.header("player"), Some("Rebecca, Garry"));
}

#[test]
fn test_feed_after_done_fails() {
    let mut req = Request::new();
    req.feed(b"GET / HTTP/1.1\r\n\r\n").unwrap();

    assert_eq!(req.feed(b"GET / HTTP/1.1\r\n\r\n"), Err(ParseError::ParsingComplete));
    assert_eq!(req.feed(b""), Err(ParseError::ParsingComplete));
}

#[test]
fn test_end_of_stream_rules() {
    let mut req = Request::new();
    req.feed(b"GET / HTT").unwrap();
    assert_eq!(req.end_of_stream(), Err(ParseError::MalformedRequestLine));

    let mut req = Request::new();
    req.feed(b"GET / HTTP/1.1\r\nHost: x\r\n").unwrap();
    assert_eq!(req.end_of_stream(), Ok(()));
    assert!(req.is_done());

    let mut req = Request::new();
    req.feed(b"POST / HTTP/1.1\r\nContent-Length: 13\r\n\r\nshort").unwrap();
    assert_eq!(req.end_of_stream(), Err(ParseError::IncompleteBody));
}

#[test]
fn test_byte_at_a_time_matches_single_feed() {
    let data = b"POST /coffee HTTP/1.1\r\nHost: localhost\r\nX-Tag: a\r\nx-tag: b\r\nContent-Length: 5\r\n\r\nbrew!";

    let mut whole = Request::new();
    whole.feed(data).unwrap();

    let mut pieces = Request::new();
    let mut pending: Vec<u8> = Vec::new();
    for &byte in data.iter() {
        pending.push(byte);
        let consumed = pieces.feed(&pending).unwrap();
        pending.drain(..consumed);
    }

    assert!(pieces.is_done());
    assert_eq!(pieces.request_line, whole.request_line);
    assert_eq!(pieces.headers, whole.headers);
    assert_eq!(pieces.body, whole.body);
}

#[test]
fn test_parse_header_value_with_obs_text() {
    let data = b"GET / HTTP/1.1\r\nX-Name: caf\xe9\r\nHost: localhost\r\n\r\n";
    let mut req = Request::new();
    let consumed = req.feed(data).unwrap();

    assert_eq!(consumed, data.len());
    assert!(req.is_done());
    assert_eq!(req.header("x-name"), Some("caf\u{fffd}"));
    assert_eq!(req.header("host"), Some("localhost"));
}

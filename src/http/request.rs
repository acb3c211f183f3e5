use crate::http::headers::Headers;

/// HTTP request methods accepted by the parser.
///
/// Anything outside this set is rejected with
/// [`ParseError::UnsupportedMethod`](crate::http::parser::ParseError::UnsupportedMethod).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Method {
    /// GET - Retrieve a resource
    #[default]
    GET,
    /// POST - Create or submit data
    POST,
    /// PUT - Replace a resource
    PUT,
    /// DELETE - Delete a resource
    DELETE,
    /// HEAD - Like GET but without the response body
    HEAD,
}

impl Method {
    /// Parses an HTTP method from a string.
    ///
    /// Matching is case-sensitive, as method tokens are on the wire.
    ///
    /// # Example
    ///
    /// ```
    /// # use httpwire::http::request::Method;
    /// assert_eq!(Method::from_str("GET"), Some(Method::GET));
    /// assert_eq!(Method::from_str("get"), None);
    /// assert_eq!(Method::from_str("PATCH"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "GET" => Some(Method::GET),
            "POST" => Some(Method::POST),
            "PUT" => Some(Method::PUT),
            "DELETE" => Some(Method::DELETE),
            "HEAD" => Some(Method::HEAD),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Method::GET => "GET",
            Method::POST => "POST",
            Method::PUT => "PUT",
            Method::DELETE => "DELETE",
            Method::HEAD => "HEAD",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The first line of a request: method, raw target and protocol version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestLine {
    pub method: Method,
    /// Raw request target, e.g. `/search?q=rust`. Not decoded.
    pub request_target: String,
    /// Always `"1.1"`; other versions are rejected.
    pub http_version: String,
}

impl Default for RequestLine {
    fn default() -> Self {
        Self {
            method: Method::default(),
            request_target: String::new(),
            http_version: "1.1".to_string(),
        }
    }
}

/// Where the incremental parser is within a request.
///
/// Transitions only move forward:
///
/// ```text
/// Initialized → ParsingHeaders → ParsingBody → Done
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ParserState {
    #[default]
    Initialized,
    ParsingHeaders,
    ParsingBody,
    Done,
}

/// An HTTP request under construction or fully parsed.
///
/// Bytes are pushed in through [`Request::feed`]; once [`Request::is_done`]
/// returns `true` the request line, headers and body are complete.
#[derive(Debug, Clone, Default)]
pub struct Request {
    pub request_line: RequestLine,
    pub headers: Headers,
    pub body: Vec<u8>,
    /// Declared `Content-Length`, or 0 when the header is absent.
    pub content_length: usize,
    pub(crate) state: ParserState,
}

impl Request {
    /// Creates an empty request in [`ParserState::Initialized`].
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ParserState {
        self.state
    }

    pub fn is_done(&self) -> bool {
        self.state == ParserState::Done
    }

    pub fn method(&self) -> Method {
        self.request_line.method
    }

    pub fn target(&self) -> &str {
        &self.request_line.request_target
    }

    /// Retrieves a header value by name, ignoring case.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }
}

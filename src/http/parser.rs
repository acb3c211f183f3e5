//! Incremental HTTP/1.1 request parser.
//!
//! Bytes may arrive in chunks of any size. Every sub-parser reports how many
//! bytes it consumed; `0` means "need more data" and is never an error.
//! The caller keeps unconsumed bytes and presents them again, together with
//! whatever arrives next, on the following call to [`Request::feed`].

use tracing::debug;

use crate::http::headers::{find_crlf, is_token_char};
use crate::http::request::{Method, ParserState, Request, RequestLine};

const SUPPORTED_VERSION: &str = "HTTP/1.1";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseError {
    /// Request line does not have exactly three fields, or they are out of place.
    MalformedRequestLine,
    /// Method outside GET, POST, PUT, DELETE, HEAD.
    UnsupportedMethod,
    /// Version token other than `HTTP/1.1`.
    UnsupportedVersion,
    /// Header name is empty or contains a non-token character.
    InvalidFieldName,
    /// Header line without a `:` separator.
    InvalidHeader,
    /// `Content-Length` is not a non-negative integer.
    InvalidContentLength,
    /// More body bytes than `Content-Length` declared.
    BodyTooLarge,
    /// Stream ended before `Content-Length` body bytes arrived.
    IncompleteBody,
    /// `feed` called after the request reached [`ParserState::Done`].
    ParsingComplete,
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let msg = match self {
            ParseError::MalformedRequestLine => "malformed request line",
            ParseError::UnsupportedMethod => "unsupported HTTP method",
            ParseError::UnsupportedVersion => "unsupported HTTP version",
            ParseError::InvalidFieldName => "invalid header field name",
            ParseError::InvalidHeader => "invalid header: missing ':' separator",
            ParseError::InvalidContentLength => "invalid content-length",
            ParseError::BodyTooLarge => "body larger than content-length",
            ParseError::IncompleteBody => "body shorter than content-length",
            ParseError::ParsingComplete => "request already fully parsed",
        };
        f.write_str(msg)
    }
}

impl std::error::Error for ParseError {}

/// Parses a request line: `METHOD SP TARGET SP HTTP/1.1 CRLF`.
///
/// Returns `Ok(None)` if no CRLF has arrived yet, otherwise the parsed line
/// together with the number of bytes consumed (CRLF included).
pub fn parse_request_line(buf: &[u8]) -> Result<Option<(RequestLine, usize)>, ParseError> {
    let Some(line_end) = find_crlf(buf) else {
        return Ok(None);
    };

    let line =
        std::str::from_utf8(&buf[..line_end]).map_err(|_| ParseError::MalformedRequestLine)?;

    let parts: Vec<&str> = line.split_whitespace().collect();
    let [method, target, version] = parts[..] else {
        return Err(ParseError::MalformedRequestLine);
    };

    // A first field that is not even a token means the fields are out of place.
    if !method.bytes().all(is_token_char) {
        return Err(ParseError::MalformedRequestLine);
    }
    let method = Method::from_str(method).ok_or(ParseError::UnsupportedMethod)?;

    if version != SUPPORTED_VERSION {
        return Err(ParseError::UnsupportedVersion);
    }

    let request_line = RequestLine {
        method,
        request_target: target.to_string(),
        http_version: "1.1".to_string(),
    };

    Ok(Some((request_line, line_end + 2)))
}

impl Request {
    /// Feeds bytes to the parser and returns how many were consumed.
    ///
    /// Keeps parsing units (request line, header lines, body bytes) until
    /// one reports it needs more data, the input is exhausted, or the
    /// request is complete. Unconsumed bytes must be presented again.
    pub fn feed(&mut self, buf: &[u8]) -> Result<usize, ParseError> {
        if self.state == ParserState::Done {
            return Err(ParseError::ParsingComplete);
        }

        let mut total = 0;
        while self.state != ParserState::Done && total < buf.len() {
            let n = self.parse_single(&buf[total..])?;
            if n == 0 {
                break;
            }
            total += n;
        }

        Ok(total)
    }

    /// Settles the request once the peer has stopped sending.
    ///
    /// A partially received header section is accepted as complete. A
    /// missing request line or a short body is not.
    pub fn end_of_stream(&mut self) -> Result<(), ParseError> {
        match self.state {
            ParserState::Initialized => Err(ParseError::MalformedRequestLine),
            ParserState::ParsingBody if self.body.len() != self.content_length => {
                Err(ParseError::IncompleteBody)
            }
            _ => {
                self.state = ParserState::Done;
                Ok(())
            }
        }
    }

    fn parse_single(&mut self, buf: &[u8]) -> Result<usize, ParseError> {
        match self.state {
            ParserState::Initialized => {
                let Some((request_line, n)) = parse_request_line(buf)? else {
                    return Ok(0);
                };
                debug!(
                    method = %request_line.method,
                    target = %request_line.request_target,
                    "Parsed request line"
                );
                self.request_line = request_line;
                self.state = ParserState::ParsingHeaders;
                Ok(n)
            }

            ParserState::ParsingHeaders => {
                let (n, done) = self.headers.parse_line(buf)?;
                if done {
                    self.state = ParserState::ParsingBody;
                    self.finish_headers()?;
                }
                Ok(n)
            }

            ParserState::ParsingBody => {
                // Reject the excess before it lands in the body.
                let remaining = self.content_length - self.body.len();
                if buf.len() > remaining {
                    return Err(ParseError::BodyTooLarge);
                }

                self.body.extend_from_slice(buf);
                if self.body.len() == self.content_length {
                    self.state = ParserState::Done;
                }
                Ok(buf.len())
            }

            ParserState::Done => Err(ParseError::ParsingComplete),
        }
    }

    fn finish_headers(&mut self) -> Result<(), ParseError> {
        let Some(value) = self.headers.get("content-length") else {
            self.state = ParserState::Done;
            return Ok(());
        };

        let content_length = value
            .parse::<usize>()
            .map_err(|_| ParseError::InvalidContentLength)?;

        self.content_length = content_length;
        if content_length == 0 {
            self.state = ParserState::Done;
        }
        Ok(())
    }
}

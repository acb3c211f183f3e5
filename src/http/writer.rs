use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::http::headers::{Headers, is_valid_field_name};
use crate::http::response::StatusCode;

const HTTP_VERSION: &str = "HTTP/1.1";
const CHUNKED_BODY_END: &[u8] = b"0\r\n\r\n";

/// Which part of the response the writer accepts next.
///
/// ```text
/// WriteStatusLine → WriteHeaders → WriteBody ─┐
///        ▲                                    │
///        └────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriterState {
    WriteStatusLine,
    WriteHeaders,
    WriteBody,
}

#[derive(Debug)]
pub enum WriteError {
    /// A step was called while the writer was in another state. Nothing was written.
    OutOfOrderCall {
        expected: WriterState,
        actual: WriterState,
    },
    /// A header name is not a token, or its value contains CR or LF. Nothing was written.
    InvalidHeader { name: String },
    Io(std::io::Error),
}

impl std::fmt::Display for WriteError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WriteError::OutOfOrderCall { expected, actual } => write!(
                f,
                "out of order call: writer is in {:?}, call requires {:?}",
                actual, expected
            ),
            WriteError::InvalidHeader { name } => {
                write!(f, "header {:?} cannot be written as a single field line", name)
            }
            WriteError::Io(e) => write!(f, "error writing response: {}", e),
        }
    }
}

impl std::error::Error for WriteError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            WriteError::Io(e) => Some(e),
            WriteError::OutOfOrderCall { .. } | WriteError::InvalidHeader { .. } => None,
        }
    }
}

impl From<std::io::Error> for WriteError {
    fn from(e: std::io::Error) -> Self {
        WriteError::Io(e)
    }
}

/// Writes an HTTP/1.1 response to a sink in wire order.
///
/// Status line, then headers, then a body (fixed or chunked). Each step
/// checks the writer state before touching the sink, so a body can never
/// go out ahead of its headers.
///
/// # Example
///
/// ```ignore
/// let mut writer = ResponseWriter::new(stream);
/// let body = b"hello";
/// writer
///     .write(StatusCode::OK, &default_headers(body.len()), body)
///     .await?;
/// ```
pub struct ResponseWriter<W> {
    sink: W,
    state: WriterState,
}

impl<W: AsyncWrite + Unpin> ResponseWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            sink,
            state: WriterState::WriteStatusLine,
        }
    }

    pub fn state(&self) -> WriterState {
        self.state
    }

    pub fn get_ref(&self) -> &W {
        &self.sink
    }

    pub fn into_inner(self) -> W {
        self.sink
    }

    /// Writes `HTTP/1.1 <code> <reason>\r\n`.
    pub async fn write_status_line(&mut self, status: StatusCode) -> Result<(), WriteError> {
        self.expect_state(WriterState::WriteStatusLine)?;

        let status_line = format!(
            "{} {} {}\r\n",
            HTTP_VERSION,
            status.as_u16(),
            status.reason_phrase()
        );
        self.sink.write_all(status_line.as_bytes()).await?;

        self.state = WriterState::WriteHeaders;
        Ok(())
    }

    /// Writes one `name: value` line per header and the blank line ending the section.
    ///
    /// Every field is checked before anything is written: names must be
    /// tokens and values must not contain CR or LF.
    pub async fn write_headers(&mut self, headers: &Headers) -> Result<(), WriteError> {
        self.expect_state(WriterState::WriteHeaders)?;

        let mut buf = Vec::new();
        for (name, value) in headers.iter() {
            if !is_valid_field_name(name.as_bytes()) || value.contains(['\r', '\n']) {
                return Err(WriteError::InvalidHeader {
                    name: name.to_string(),
                });
            }

            buf.extend_from_slice(name.as_bytes());
            buf.extend_from_slice(b": ");
            buf.extend_from_slice(value.as_bytes());
            buf.extend_from_slice(b"\r\n");
        }
        buf.extend_from_slice(b"\r\n");
        self.sink.write_all(&buf).await?;

        self.state = WriterState::WriteBody;
        Ok(())
    }

    /// Writes the body verbatim and readies the writer for another response.
    pub async fn write_body(&mut self, body: &[u8]) -> Result<usize, WriteError> {
        self.expect_state(WriterState::WriteBody)?;

        self.sink.write_all(body).await?;
        self.sink.flush().await?;

        self.state = WriterState::WriteStatusLine;
        Ok(body.len())
    }

    /// Status line, headers and body in one go. Stops at the first failure.
    pub async fn write(
        &mut self,
        status: StatusCode,
        headers: &Headers,
        body: &[u8],
    ) -> Result<(), WriteError> {
        self.write_status_line(status).await?;
        self.write_headers(headers).await?;
        self.write_body(body).await?;
        Ok(())
    }

    /// Writes one `<hex-len>\r\n<payload>\r\n` chunk.
    ///
    /// An empty payload writes nothing and returns 0; the zero-length chunk
    /// is reserved for [`write_chunked_body_done`](Self::write_chunked_body_done).
    /// The writer stays in [`WriterState::WriteBody`] so this can be called
    /// repeatedly. Chunks are body-phase writes: the status line and headers
    /// must already be out, otherwise this fails with
    /// [`WriteError::OutOfOrderCall`].
    pub async fn write_chunked_body(&mut self, payload: &[u8]) -> Result<usize, WriteError> {
        self.expect_state(WriterState::WriteBody)?;

        if payload.is_empty() {
            return Ok(0);
        }

        let size_line = format!("{:x}\r\n", payload.len());
        let mut chunk = Vec::with_capacity(size_line.len() + payload.len() + 2);
        chunk.extend_from_slice(size_line.as_bytes());
        chunk.extend_from_slice(payload);
        chunk.extend_from_slice(b"\r\n");

        self.sink.write_all(&chunk).await?;
        self.sink.flush().await?;

        Ok(payload.len())
    }

    /// Writes the terminating `0\r\n\r\n` and ends the body.
    ///
    /// After `write_chunked_body(b"hello")` the body bytes on the wire are
    /// exactly `5\r\nhello\r\n0\r\n\r\n`.
    pub async fn write_chunked_body_done(&mut self) -> Result<usize, WriteError> {
        self.expect_state(WriterState::WriteBody)?;

        self.sink.write_all(CHUNKED_BODY_END).await?;
        self.sink.flush().await?;

        self.state = WriterState::WriteStatusLine;
        Ok(CHUNKED_BODY_END.len())
    }

    fn expect_state(&self, expected: WriterState) -> Result<(), WriteError> {
        if self.state != expected {
            return Err(WriteError::OutOfOrderCall {
                expected,
                actual: self.state,
            });
        }
        Ok(())
    }
}

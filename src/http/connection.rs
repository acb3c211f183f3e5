use std::net::SocketAddr;
use std::sync::Arc;

use bytes::{Buf, BytesMut};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::{debug, error, warn};

use crate::http::parser::ParseError;
use crate::http::request::Request;
use crate::http::response::StatusCode;
use crate::http::writer::ResponseWriter;
use crate::server::{Handler, write_error};

/// Starting size of the read buffer. Doubles whenever it fills up.
pub const INITIAL_BUFFER_SIZE: usize = 8;

const BAD_REQUEST_BODY: &str = "could not process request";

/// Failure to obtain a request from a byte stream.
#[derive(Debug)]
pub enum RequestError {
    /// The peer closed the connection without sending a single byte.
    Closed,
    Parse(ParseError),
    Io(std::io::Error),
}

impl std::fmt::Display for RequestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RequestError::Closed => f.write_str("connection closed before any request bytes"),
            RequestError::Parse(e) => write!(f, "error parsing request: {}", e),
            RequestError::Io(e) => write!(f, "error reading request: {}", e),
        }
    }
}

impl std::error::Error for RequestError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RequestError::Parse(e) => Some(e),
            RequestError::Io(e) => Some(e),
            RequestError::Closed => None,
        }
    }
}

impl From<ParseError> for RequestError {
    fn from(e: ParseError) -> Self {
        RequestError::Parse(e)
    }
}

impl From<std::io::Error> for RequestError {
    fn from(e: std::io::Error) -> Self {
        RequestError::Io(e)
    }
}

/// Reads one complete request from `reader`.
///
/// Bytes are read into a buffer that starts at [`INITIAL_BUFFER_SIZE`] and
/// doubles whenever it is full. After each read the parser consumes what it
/// can and the consumed prefix is dropped from the buffer; the rest waits
/// for more bytes. A stream that ends before yielding any bytes is
/// [`RequestError::Closed`].
pub async fn read_request<R>(reader: &mut R) -> Result<Request, RequestError>
where
    R: AsyncRead + Unpin,
{
    let mut request = Request::new();
    let mut buffer = BytesMut::with_capacity(INITIAL_BUFFER_SIZE);
    let mut received = 0;

    while !request.is_done() {
        if buffer.len() == buffer.capacity() {
            buffer.reserve(buffer.capacity().max(INITIAL_BUFFER_SIZE));
        }

        let n = reader.read_buf(&mut buffer).await?;
        if n == 0 {
            if received == 0 {
                return Err(RequestError::Closed);
            }
            request.end_of_stream()?;
            break;
        }
        received += n;

        let consumed = request.feed(&buffer)?;
        buffer.advance(consumed);
    }

    Ok(request)
}

/// A single accepted connection: one request in, one response out.
pub struct Connection<H> {
    stream: TcpStream,
    peer: SocketAddr,
    handler: Arc<H>,
}

impl<H: Handler> Connection<H> {
    pub fn new(stream: TcpStream, peer: SocketAddr, handler: Arc<H>) -> Self {
        Self {
            stream,
            peer,
            handler,
        }
    }

    /// Parses the request, hands it to the handler and closes the connection.
    ///
    /// A request that fails to parse is answered with a 400 without
    /// reaching the handler.
    pub async fn run(mut self) -> anyhow::Result<()> {
        let parsed = read_request(&mut self.stream).await;

        let mut writer = ResponseWriter::new(self.stream);
        match parsed {
            Ok(request) => {
                debug!(
                    peer = %self.peer,
                    method = %request.method(),
                    target = %request.target(),
                    body_len = request.body.len(),
                    "Request parsed"
                );
                self.handler.handle(&mut writer, &request).await;
            }
            Err(RequestError::Closed) => {
                debug!(peer = %self.peer, "Connection closed without a request");
                return Ok(());
            }
            Err(RequestError::Parse(e)) => {
                warn!(peer = %self.peer, error = %e, "Rejecting malformed request");
                if let Err(e) =
                    write_error(&mut writer, StatusCode::BAD_REQUEST, BAD_REQUEST_BODY).await
                {
                    error!(peer = %self.peer, error = %e, "Failed to write 400 response");
                }
            }
            Err(e) => {
                return Err(e.into());
            }
        }

        let mut stream = writer.into_inner();
        stream.shutdown().await?;
        Ok(())
    }
}

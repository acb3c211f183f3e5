//! Connection server.
//!
//! [`Server::start`] binds a listener and spawns the accept loop; every
//! accepted connection gets its own task that parses one request, calls the
//! [`Handler`] and closes the connection. [`Server::stop`] stops accepting
//! new connections and lets in-flight ones finish.

pub mod listener;

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::Context;
use tokio::io::AsyncWrite;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tracing::info;

use crate::http::request::Request;
use crate::http::response::{StatusCode, default_headers};
use crate::http::writer::{ResponseWriter, WriteError};

/// Application logic invoked once per parsed request.
///
/// The handler owns the response: it must drive `writer` through status
/// line, headers and body itself. The connection is closed when the
/// returned future completes.
///
/// # Example
///
/// ```ignore
/// struct Hello;
///
/// impl Handler for Hello {
///     async fn handle(&self, writer: &mut ResponseWriter<TcpStream>, _req: &Request) {
///         let body = b"hello";
///         let _ = writer.write(StatusCode::OK, &default_headers(body.len()), body).await;
///     }
/// }
/// ```
pub trait Handler: Send + Sync + 'static {
    fn handle(
        &self,
        writer: &mut ResponseWriter<TcpStream>,
        request: &Request,
    ) -> impl Future<Output = ()> + Send;
}

#[derive(Debug)]
pub enum ServerError {
    /// The listening address could not be bound.
    Bind {
        addr: String,
        source: std::io::Error,
    },
    Io(std::io::Error),
}

impl std::fmt::Display for ServerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServerError::Bind { addr, source } => write!(f, "failed to bind {}: {}", addr, source),
            ServerError::Io(e) => write!(f, "server I/O error: {}", e),
        }
    }
}

impl std::error::Error for ServerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ServerError::Bind { source, .. } => Some(source),
            ServerError::Io(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for ServerError {
    fn from(e: std::io::Error) -> Self {
        ServerError::Io(e)
    }
}

/// Handle to a running server.
pub struct Server {
    local_addr: SocketAddr,
    closed: Arc<AtomicBool>,
    shutdown: Arc<Notify>,
    accept_task: Option<JoinHandle<()>>,
}

impl Server {
    /// Binds `addr` and starts accepting connections in the background.
    pub async fn start<H: Handler>(addr: &str, handler: H) -> Result<Server, ServerError> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| ServerError::Bind {
                addr: addr.to_string(),
                source,
            })?;
        let local_addr = listener.local_addr()?;
        info!("Listening on {}", local_addr);

        let closed = Arc::new(AtomicBool::new(false));
        let shutdown = Arc::new(Notify::new());

        let accept_task = tokio::spawn(listener::accept_loop(
            listener,
            Arc::new(handler),
            Arc::clone(&closed),
            Arc::clone(&shutdown),
        ));

        Ok(Server {
            local_addr,
            closed,
            shutdown,
            accept_task: Some(accept_task),
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Stops accepting connections and waits for the accept loop to exit.
    ///
    /// In-flight connections keep running. Calling this again is a no-op.
    pub async fn stop(&mut self) -> anyhow::Result<()> {
        if self.closed.swap(true, Ordering::AcqRel) {
            return Ok(());
        }
        self.shutdown.notify_one();

        if let Some(task) = self.accept_task.take() {
            task.await.context("accept loop terminated abnormally")?;
        }

        info!("Server stopped");
        Ok(())
    }
}

impl Drop for Server {
    fn drop(&mut self) {
        if !self.closed.swap(true, Ordering::AcqRel) {
            self.shutdown.notify_one();
        }
    }
}

/// Writes a complete plain-text response with `message` as the body.
pub async fn write_error<W>(
    writer: &mut ResponseWriter<W>,
    status: StatusCode,
    message: &str,
) -> Result<(), WriteError>
where
    W: AsyncWrite + Unpin,
{
    let body = message.as_bytes();
    let headers = default_headers(body.len());
    writer.write(status, &headers, body).await
}

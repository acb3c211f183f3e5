use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::net::TcpListener;
use tokio::sync::Notify;
use tracing::{debug, error, info};

use crate::http::connection::Connection;
use crate::server::Handler;

/// Accepts connections until shutdown is signalled, one task per connection.
///
/// Accept errors are logged and the loop keeps going unless the server is
/// closed. The listener is dropped, and its socket closed, when the loop
/// returns.
pub(crate) async fn accept_loop<H: Handler>(
    listener: TcpListener,
    handler: Arc<H>,
    closed: Arc<AtomicBool>,
    shutdown: Arc<Notify>,
) {
    loop {
        let accepted = tokio::select! {
            res = listener.accept() => res,
            _ = shutdown.notified() => break,
        };

        if closed.load(Ordering::Acquire) {
            break;
        }

        let (socket, peer) = match accepted {
            Ok(conn) => conn,
            Err(e) => {
                error!(error = %e, "Error accepting connection");
                continue;
            }
        };
        debug!("Accepted connection from {}", peer);

        let handler = Arc::clone(&handler);
        tokio::spawn(async move {
            let conn = Connection::new(socket, peer, handler);
            if let Err(e) = conn.run().await {
                error!("Connection error from {}: {}", peer, e);
            }
        });
    }

    info!("Accept loop stopped");
}

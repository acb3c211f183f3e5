use httpwire::config::Config;
use httpwire::http::request::Request;
use httpwire::http::response::{StatusCode, default_headers};
use httpwire::http::writer::ResponseWriter;
use httpwire::server::{Handler, Server};
use tokio::net::TcpStream;

/// Replies with the request target as plain text.
struct Echo;

impl Handler for Echo {
    async fn handle(&self, writer: &mut ResponseWriter<TcpStream>, request: &Request) {
        let body = format!("{} {}\n", request.method(), request.target());
        let headers = default_headers(body.len());

        if let Err(e) = writer.write(StatusCode::OK, &headers, body.as_bytes()).await {
            tracing::error!(error = %e, "Failed to write response");
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg = Config::load()?;

    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .with_max_level(cfg.tracing_level())
        .init();

    let mut server = Server::start(&cfg.listen_addr, Echo).await?;

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutdown signal received");

    server.stop().await
}

use tokio::net::TcpListener;
use tracing::info;

use crate::config::Config;
use crate::error::ConnectionError;
use crate::http::connection::{Connection, ConnectionContext};
use crate::server::access_log;
use crate::server::events::EventSink;
use crate::server::registry::Registry;

pub async fn run(cfg: &Config) -> anyhow::Result<()> {
    let listener = TcpListener::bind(&cfg.server.listen_addr).await?;
    info!("Listening on {}", listener.local_addr()?);

    let events = EventSink::new();
    if cfg.logging.access_log || cfg.logging.debug_responses {
        tokio::spawn(access_log::run(events.subscribe(), cfg.logging.clone()));
    }

    let registry = Registry::shared(events.clone());
    let ctx = ConnectionContext::new(cfg, registry, events);
    serve(listener, ctx).await
}

/// Accepts connections until the task is dropped.
///
/// An accept failure is logged and skipped; it never stops the loop.
pub async fn serve(listener: TcpListener, ctx: ConnectionContext) -> anyhow::Result<()> {
    loop {
        let (socket, peer) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(e) => {
                let e = ConnectionError::Accept(e);
                tracing::error!(error = %e, "Failed to accept connection");
                continue;
            }
        };

        let ctx = ctx.clone();
        tokio::spawn(async move {
            let conn = Connection::register(socket, Some(peer), &ctx).await;
            let id = conn.id();
            tracing::debug!(%id, %peer, "Accepted connection");

            if let Err(e) = conn.run(&ctx).await {
                tracing::error!(%id, %peer, kind = e.kind_name(), "Connection error: {}", e);
            }
        });
    }
}

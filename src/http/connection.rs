use std::net::SocketAddr;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::config::Config;
use crate::error::ConnectionError;
use crate::http::formulator::Formulator;
use crate::http::parser::RequestFramer;
use crate::http::request::RawRequest;
use crate::http::resolver::Resolver;
use crate::http::writer::ResponseWriter;
use crate::server::events::{ConnectionEvent, EventSink};
use crate::server::registry::{ConnectionId, ConnectionPhase, ConnectionToken, SharedRegistry};

/// Acknowledgement written right after accept when greetings are enabled.
pub const GREETING: &[u8] = b"\r\n\r\n";

const READ_CHUNK: usize = 1024;

/// Everything a connection needs besides its own stream.
#[derive(Clone)]
pub struct ConnectionContext {
    pub resolver: Resolver,
    pub formulator: Formulator,
    pub greeting: bool,
    pub registry: SharedRegistry,
    pub events: EventSink,
}

impl ConnectionContext {
    pub fn new(cfg: &Config, registry: SharedRegistry, events: EventSink) -> Self {
        Self {
            resolver: Resolver::from_config(&cfg.content),
            formulator: Formulator::from_config(&cfg.content),
            greeting: cfg.server.greeting,
            registry,
            events,
        }
    }
}

pub enum ConnectionState {
    Accepted,
    Reading,
    Responding(ResponseWriter),
    Closed,
    Errored,
}

impl ConnectionState {
    pub fn phase(&self) -> ConnectionPhase {
        match self {
            ConnectionState::Accepted => ConnectionPhase::Accepted,
            ConnectionState::Reading => ConnectionPhase::Reading,
            ConnectionState::Responding(writer) => ConnectionPhase::Responding {
                header_sent: writer.header_sent(),
            },
            ConnectionState::Closed => ConnectionPhase::Closed,
            ConnectionState::Errored => ConnectionPhase::Errored,
        }
    }
}

/// One accepted stream driven from accept to close.
///
/// `run` consumes the connection, so its registry entry is removed exactly
/// once, after the last I/O on the stream has finished.
pub struct Connection<S> {
    id: ConnectionId,
    token: ConnectionToken,
    peer: Option<SocketAddr>,
    stream: S,
    framer: RequestFramer,
    pending_request: Option<RawRequest>,
    state: ConnectionState,
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Registers `stream` and returns the connection that now owns it.
    pub async fn register(stream: S, peer: Option<SocketAddr>, ctx: &ConnectionContext) -> Self {
        let (token, id) = ctx.registry.lock().await.create(peer);
        Self {
            id,
            token,
            peer,
            stream,
            framer: RequestFramer::new(),
            pending_request: None,
            state: ConnectionState::Accepted,
        }
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    pub fn token(&self) -> ConnectionToken {
        self.token
    }

    /// Serves at most one request, then tears the connection down.
    ///
    /// A clean end-of-stream before a full request arrives is not an error:
    /// the connection closes without sending anything.
    pub async fn run(mut self, ctx: &ConnectionContext) -> Result<(), ConnectionError> {
        match self.drive(ctx).await {
            Ok(()) => {
                self.close(ctx).await;
                Ok(())
            }
            Err(e) => {
                self.fail(ctx, &e).await;
                Err(e)
            }
        }
    }

    async fn drive(&mut self, ctx: &ConnectionContext) -> Result<(), ConnectionError> {
        loop {
            match &mut self.state {
                ConnectionState::Accepted => {
                    if ctx.greeting {
                        self.stream
                            .write_all(GREETING)
                            .await
                            .map_err(ConnectionError::Write)?;
                    }
                    self.transition(ctx, ConnectionState::Reading).await;
                }

                ConnectionState::Reading => match self.read_request().await? {
                    Some(request) => {
                        self.pending_request = Some(request);
                        let next = self.respond(ctx).await;
                        self.transition(ctx, next).await;
                    }
                    None => {
                        self.transition(ctx, ConnectionState::Closed).await;
                    }
                },

                ConnectionState::Responding(writer) => {
                    let done = writer
                        .write_next(&mut self.stream)
                        .await
                        .map_err(ConnectionError::Write)?;

                    tracing::trace!(
                        id = %self.id,
                        phase = ?done.phase,
                        bytes = done.bytes,
                        is_final = done.is_final,
                        "write complete"
                    );

                    // Reading is only re-armed once Responding has been left;
                    // connections are not persistent, so leaving it means closing.
                    if done.is_final {
                        self.transition(ctx, ConnectionState::Closed).await;
                    } else {
                        self.sync_phase(ctx).await;
                    }
                }

                ConnectionState::Closed | ConnectionState::Errored => return Ok(()),
            }
        }
    }

    /// Reads until the framer delivers a request. `None` on end-of-stream.
    async fn read_request(&mut self) -> Result<Option<RawRequest>, ConnectionError> {
        if let Some(request) = self.framer.try_frame() {
            return Ok(Some(request));
        }

        let mut chunk = [0u8; READ_CHUNK];
        loop {
            let n = self
                .stream
                .read(&mut chunk)
                .await
                .map_err(ConnectionError::Read)?;

            if n == 0 {
                if self.framer.buffered() > 0 {
                    tracing::debug!(
                        id = %self.id,
                        buffered = self.framer.buffered(),
                        "peer closed mid-request, dropping partial request"
                    );
                }
                return Ok(None);
            }

            if let Some(request) = self.framer.push(&chunk[..n]) {
                return Ok(Some(request));
            }
        }
    }

    /// Formulates the response for the pending request.
    async fn respond(&mut self, ctx: &ConnectionContext) -> ConnectionState {
        let Some(request) = self.pending_request.take() else {
            return ConnectionState::Closed;
        };

        let request_line = request.request_line();
        let target = ctx.resolver.resolve(&request_line);
        let response = ctx.formulator.formulate(&target).await;

        if response.is_empty() {
            tracing::debug!(id = %self.id, request_line = %request_line, "unusable request line, closing");
            return ConnectionState::Closed;
        }

        ctx.events.emit(ConnectionEvent::Responded {
            id: self.id,
            peer: self.peer,
            request_line,
            status: response.status.map(|s| s.as_u16()),
            bytes: response.wire_len(),
            head: String::from_utf8_lossy(response.head()).into_owned(),
        });

        ConnectionState::Responding(ResponseWriter::new(response))
    }

    async fn transition(&mut self, ctx: &ConnectionContext, next: ConnectionState) {
        self.state = next;
        self.sync_phase(ctx).await;
    }

    async fn sync_phase(&self, ctx: &ConnectionContext) {
        let phase = self.state.phase();
        if let Err(e) = ctx.registry.lock().await.set_phase(self.token, phase) {
            tracing::warn!(id = %self.id, error = %e, "connection missing from registry");
        }
    }

    async fn close(&mut self, ctx: &ConnectionContext) {
        self.framer.clear();
        if let Err(e) = self.stream.shutdown().await {
            tracing::debug!(id = %self.id, error = %e, "shutdown failed");
        }
        self.state = ConnectionState::Closed;
        self.deregister(ctx).await;
    }

    async fn fail(&mut self, ctx: &ConnectionContext, error: &ConnectionError) {
        self.state = ConnectionState::Errored;
        ctx.events.emit(ConnectionEvent::Errored {
            id: self.id,
            error: error.to_string(),
        });
        let mut registry = ctx.registry.lock().await;
        if registry.contains(self.token) {
            self.framer.clear();
            if let Err(e) = registry.remove(self.token) {
                tracing::warn!(id = %self.id, error = %e, "failed to remove connection");
            }
        }
    }

    async fn deregister(&self, ctx: &ConnectionContext) {
        if let Err(e) = ctx.registry.lock().await.remove(self.token) {
            tracing::warn!(id = %self.id, error = %e, "failed to remove connection");
        }
    }
}

//! HTTP-like GET protocol engine.
//!
//! A request is everything up to a blank line; only its first line matters.
//! The response is either one text write, or a header write followed by a
//! separate binary payload write. Connections are never kept alive.
//!
//! # Architecture
//!
//! - **`parser`**: the framer, delimiting a request in the byte stream
//! - **`request`**: raw request bytes and request-line extraction
//! - **`resolver`**: request line to file path, pure string work
//! - **`mime`**: the fixed extension table
//! - **`response`**: response triple and header-block builder
//! - **`formulator`**: reads the file and builds the response
//! - **`writer`**: two-phase response writes
//! - **`connection`**: the per-connection state machine
//!
//! # Connection State Machine
//!
//! ```text
//!        ┌─────────────┐
//!        │  Accepted   │ ← optional greeting write
//!        └──────┬──────┘
//!               ▼
//!        ┌─────────────┐
//!        │   Reading   │ ← accumulate until CRLF CRLF
//!        └──────┬──────┘
//!               │ request framed          (end-of-stream → Closed)
//!               ▼
//!        ┌──────────────────────────┐
//!        │ Responding(header_sent)  │ ← head write, then payload if binary
//!        └──────┬───────────────────┘
//!               │ final write done        (empty response → Closed)
//!               ▼
//!        ┌─────────────┐
//!        │   Closed    │
//!        └─────────────┘
//!
//!   any I/O error → Errored (connection removed, nothing retried)
//! ```
//!
//! # Example
//!
//! ```ignore
//! use getserver::http::connection::{Connection, ConnectionContext};
//!
//! let conn = Connection::register(socket, Some(peer), &ctx).await;
//! if let Err(e) = conn.run(&ctx).await {
//!     tracing::error!("Connection error: {}", e);
//! }
//! ```

pub mod connection;
pub mod formulator;
pub mod mime;
pub mod parser;
pub mod request;
pub mod resolver;
pub mod response;
pub mod writer;
